#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Exactly-k cardinality as a theory: accept exactly `k` true variables out
//! of a universe of `n`.
//!
//! Counting never needs clauses while the search runs: the theory watches
//! the polarity sets and raises a conflict as soon as either bound breaks —
//! more than `k` variables true, or more than `n - k` false. The conflict
//! clause negates the offending polarity set, with the smallest variable id
//! as the implied pivot.

use crate::propagator::clause::Clause;
use crate::propagator::error::{ProtocolFault, Result};
use crate::propagator::literal::{Literal, Variable};
use crate::propagator::queue::PropagationQueue;
use crate::propagator::theory::{ModelVerdict, Theory, TheoryStats};
use crate::propagator::trail::{DecisionLevel, Trail};
use itertools::Itertools;

/// Enforces that exactly `k` of the variables `1..=n` are true.
#[derive(Debug, Clone)]
pub struct CardinalityTheory {
    n: usize,
    k: usize,
    trail: Trail,
    queue: PropagationQueue,
    pending: Option<Clause>,
    stats: TheoryStats,
}

impl CardinalityTheory {
    /// Builds an exactly-`k` constraint over the variables `1..=n`.
    ///
    /// # Errors
    ///
    /// Rejects `k > n` before any search begins.
    pub fn new(n: usize, k: usize) -> Result<Self> {
        if k > n {
            return Err(ProtocolFault::InvalidCardinality { k, n });
        }
        Ok(Self {
            n,
            k,
            trail: Trail::new(),
            queue: PropagationQueue::new(),
            pending: None,
            stats: TheoryStats::default(),
        })
    }

    /// The universe size `n`.
    #[must_use]
    pub const fn universe(&self) -> usize {
        self.n
    }

    /// The target true-count `k`.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.k
    }

    /// The variable ids this theory must observe.
    pub fn observed_variables(&self) -> impl Iterator<Item = Variable> + use<> {
        1..=u32::try_from(self.n).unwrap_or(u32::MAX)
    }

    /// Activity counters for this session.
    #[must_use]
    pub const fn stats(&self) -> TheoryStats {
        self.stats
    }

    /// Conflict over the violated bound, if either bound is broken.
    /// Detection is eager: the first violated bound wins and at most one
    /// conflict is derived per assignment event.
    fn derive_conflict(&self) -> Option<Clause> {
        if self.trail.assigned_true().len() > self.k {
            // too many trues: at least one of them has to go
            return Some(
                self.trail
                    .assigned_true()
                    .iter()
                    .copied()
                    .sorted_unstable()
                    .map(|var| Literal::new(var, false))
                    .collect(),
            );
        }

        if self.trail.assigned_false().len() > self.n - self.k {
            return Some(
                self.trail
                    .assigned_false()
                    .iter()
                    .copied()
                    .sorted_unstable()
                    .map(|var| Literal::new(var, true))
                    .collect(),
            );
        }

        None
    }

    fn enqueue_conflict(&mut self, clause: Clause) {
        let Some(pivot) = clause.implied() else {
            return;
        };
        if self.trail.has_reason(pivot) {
            // already queued for this pivot; the cache entry is single-use
            return;
        }
        log::debug!("cardinality conflict, pivot {pivot}, reason {clause}");
        self.trail.cache_reason(pivot, clause);
        self.queue.push(pivot);
        self.stats.conflicts_derived += 1;
    }
}

impl Theory for CardinalityTheory {
    fn on_new_level(&mut self) {
        self.trail.push_level();
    }

    fn on_backtrack(&mut self, to: DecisionLevel) -> Result<()> {
        if !self.queue.is_empty() {
            return Err(ProtocolFault::BacktrackWithQueuedPropagation {
                target: to,
                queued: self.queue.len(),
            });
        }
        self.trail.backtrack(to);
        Ok(())
    }

    fn on_assignment(&mut self, lit: Literal, fixed: bool) -> Result<()> {
        log::trace!("cardinality observes {lit} (fixed: {fixed})");
        self.trail.record_assignment(lit)?;

        if let Some(clause) = self.derive_conflict() {
            self.enqueue_conflict(clause);
        }
        Ok(())
    }

    fn propagate(&mut self) -> Vec<Literal> {
        if self.queue.is_empty() {
            return Vec::new();
        }
        self.stats.propagate_calls += 1;
        self.queue.drain()
    }

    fn provide_reason(&mut self, lit: Literal) -> Result<Clause> {
        self.trail.take_reason(lit)
    }

    fn check_model(&mut self, model: &[Literal]) -> Result<ModelVerdict> {
        self.stats.check_model_calls += 1;

        let trues = model
            .iter()
            .filter(|l| l.is_positive() && l.variable() as usize <= self.n)
            .count();
        if trues == self.k {
            return Ok(ModelVerdict::Accepted);
        }

        log::debug!("model rejected: {trues} true literals, target {}", self.k);
        self.pending = Some(model.iter().map(|l| l.negated()).collect());
        Ok(ModelVerdict::Rejected)
    }

    fn add_clause(&mut self) -> Clause {
        self.pending.take().unwrap_or_default()
    }
}
