#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! The theory interface the search engine drives.
//!
//! A [`Theory`] reacts to the engine's lifecycle callbacks: it observes
//! assignments, may queue forced literals with explanation clauses, and
//! finally vets complete models. The engine holds one reference to the
//! interface and never a concrete theory, so new theories compose without
//! engine changes.
//!
//! The protocol is strictly synchronous and single-threaded: each callback
//! must complete promptly, never block, and never call back into the engine.
//! Call-ordering contracts are enforced as fatal
//! [`ProtocolFault`](crate::propagator::error::ProtocolFault)s.

use crate::propagator::clause::Clause;
use crate::propagator::error::Result;
use crate::propagator::literal::Literal;
use crate::propagator::trail::DecisionLevel;

/// Outcome of a full-model check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVerdict {
    /// The model satisfies the theory's global constraint.
    Accepted,
    /// The model is rejected; a blocking clause is pending and must be
    /// collected through [`Theory::add_clause`].
    Rejected,
}

impl ModelVerdict {
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Counters a theory keeps about its own activity.
///
/// Exposed per instance rather than process-wide so sessions stay
/// independent and observable without global state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TheoryStats {
    /// Non-empty deliveries through [`Theory::propagate`].
    pub propagate_calls: u64,
    /// Full-model checks performed.
    pub check_model_calls: u64,
    /// Conflict explanations derived from partial assignments.
    pub conflicts_derived: u64,
}

/// External constraint logic layered on a boolean search engine.
pub trait Theory {
    /// The engine opened a new decision level.
    fn on_new_level(&mut self);

    /// The engine undid every level above `to`.
    ///
    /// # Errors
    ///
    /// Faults if forced literals are still queued: the engine must drain
    /// [`Theory::propagate`] before backtracking.
    fn on_backtrack(&mut self, to: DecisionLevel) -> Result<()>;

    /// A literal was assigned. `fixed` marks assignments the engine will
    /// never undo (root-level consequences).
    ///
    /// # Errors
    ///
    /// Faults if the variable is already assigned either polarity.
    fn on_assignment(&mut self, lit: Literal, fixed: bool) -> Result<()>;

    /// Forced literals derived since the last call, in derivation order.
    /// Each returned literal has an explanation retrievable exactly once
    /// through [`Theory::provide_reason`].
    fn propagate(&mut self) -> Vec<Literal>;

    /// The explanation for a literal this theory propagated: a clause whose
    /// first element is the implied literal and whose remaining literals are
    /// all false under the current trail.
    ///
    /// # Errors
    ///
    /// Faults if no explanation is cached (already taken, or purged by
    /// backtracking).
    fn provide_reason(&mut self, lit: Literal) -> Result<Clause>;

    /// Vets a complete assignment against the theory's global constraint.
    ///
    /// # Errors
    ///
    /// Faults only on internal invariant violations; an ordinary rejection
    /// is `Ok(ModelVerdict::Rejected)`.
    fn check_model(&mut self, model: &[Literal]) -> Result<ModelVerdict>;

    /// The pending blocking clause after a rejection, or an empty clause
    /// when nothing is pending. The clause is violated by the rejected
    /// model, permanently forbidding it.
    fn add_clause(&mut self) -> Clause;

    /// A suggested branching literal, or `None` to defer to the engine's
    /// own heuristic. The default expresses no preference.
    fn decide(&mut self) -> Option<Literal> {
        None
    }
}
