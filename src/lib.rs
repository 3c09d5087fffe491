//! External theory propagators for incremental SAT engines.
//!
//! A SAT engine explores partial assignments; a *theory propagator* watches
//! that exploration through a narrow callback protocol and enforces
//! constraints that are awkward to state as static clauses. This crate
//! provides the protocol-side bookkeeping (a backtracking trail with cached
//! explanation clauses and a propagation queue), a `Theory` trait mirroring
//! the callback surface, and two concrete theories: exactly-k cardinality
//! and graph canonical-form pruning.
//!
//! The search engine itself is an external collaborator; it drives the
//! protocol through `propagator::adapter::EngineAdapter`.

/// The `propagator` module implements the user-propagator protocol: trail and
/// reason management, the theory interface, and the concrete theories.
pub mod propagator;
