#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Fault reporting for the propagation protocol.
//!
//! A [`ProtocolFault`] is a contract violation between the engine and a
//! theory: it indicates a wiring bug, not a solving outcome, and the session
//! must be aborted. Logical rejections of a model are ordinary values
//! (`ModelVerdict::Rejected`), never errors.

use thiserror::Error;

/// An unrecoverable violation of the engine/theory protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolFault {
    /// A variable was assigned while already holding a value of either
    /// polarity.
    #[error("duplicate assignment: literal {lit} delivered while variable {var} is already assigned")]
    DuplicateAssignment {
        /// The offending literal, in signed form.
        lit: i32,
        /// The variable already carrying a value.
        var: u32,
    },

    /// The engine backtracked before draining the propagation queue.
    #[error("backtrack to level {target} with {queued} propagation(s) still queued")]
    BacktrackWithQueuedPropagation {
        /// The requested target level.
        target: usize,
        /// Number of undelivered forced literals.
        queued: usize,
    },

    /// A reason was requested for a literal with no cached explanation.
    /// Reason cache entries are single-use and purged on backtracking.
    #[error("no cached reason for literal {lit}")]
    UnknownReason {
        /// The literal the engine asked to explain.
        lit: i32,
    },

    /// A full model reached the final check carrying a constraint violation
    /// that incremental propagation should have cut earlier.
    #[error("full model admits a smaller labeling under permutation {permutation:?}; incremental propagation failed to cut it")]
    PropagationGap {
        /// The witnessing vertex relabeling.
        permutation: Vec<usize>,
    },

    /// An exactly-k constraint was configured with a target outside `0..=n`.
    #[error("cardinality target {k} exceeds universe size {n}")]
    InvalidCardinality {
        /// The requested true-count.
        k: usize,
        /// The number of constrained variables.
        n: usize,
    },
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolFault>;
