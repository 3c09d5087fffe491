#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
pub mod adapter;
pub mod canon;
pub mod cardinality;
pub mod clause;
pub mod error;
pub mod graph;
pub mod literal;
pub mod queue;
pub mod theory;
pub mod trail;
