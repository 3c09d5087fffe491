#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! The assignment trail and reason cache shared by all theories.
//!
//! The engine explores assignments level by level; the trail mirrors that
//! history so a theory can answer membership queries in O(1) and undo state
//! exactly on backtracking. Explanation clauses produced by a theory's own
//! propagation are cached here, tagged with the level that produced them so
//! they can be purged when that level is undone.
//!
//! Invariants enforced as fatal protocol faults:
//! - a variable is in at most one polarity set at any time
//!   ([`Trail::record_assignment`] rejects duplicates);
//! - reason entries are single-use ([`Trail::take_reason`] removes on read,
//!   a second read without re-derivation faults).

use crate::propagator::clause::Clause;
use crate::propagator::error::{ProtocolFault, Result};
use crate::propagator::literal::{Literal, Variable};
use rustc_hash::{FxHashMap, FxHashSet};

/// A backtracking level. 0 is the root.
pub type DecisionLevel = usize;

/// Per-level assignment history with derived polarity sets and a cached
/// reason map.
#[derive(Debug, Clone)]
pub struct Trail {
    levels: Vec<FxHashSet<Literal>>,
    assigned_positive: FxHashSet<Variable>,
    assigned_negative: FxHashSet<Variable>,
    reasons: FxHashMap<Literal, Clause>,
    reason_tags: Vec<FxHashSet<Literal>>,
}

impl Trail {
    /// A fresh trail at the root level with nothing assigned.
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: vec![FxHashSet::default()],
            assigned_positive: FxHashSet::default(),
            assigned_negative: FxHashSet::default(),
            reasons: FxHashMap::default(),
            reason_tags: vec![FxHashSet::default()],
        }
    }

    /// The current decision level.
    #[must_use]
    pub fn level(&self) -> DecisionLevel {
        self.levels.len() - 1
    }

    /// Opens a new decision level.
    pub fn push_level(&mut self) {
        self.levels.push(FxHashSet::default());
        self.reason_tags.push(FxHashSet::default());
    }

    /// Undoes every level above `target`, most recent first: removes its
    /// literals from the polarity sets and purges its tagged reasons.
    ///
    /// Levels at or below `target` are untouched; a `target` at or above the
    /// current level is a no-op.
    pub fn backtrack(&mut self, target: DecisionLevel) {
        while self.level() > target {
            let undone = self.levels.pop().unwrap_or_default();
            for lit in &undone {
                if lit.is_positive() {
                    self.assigned_positive.remove(&lit.variable());
                } else {
                    self.assigned_negative.remove(&lit.variable());
                }
            }

            let tags = self.reason_tags.pop().unwrap_or_default();
            for lit in &tags {
                self.reasons.remove(lit);
            }
        }
        log::trace!("trail backtracked to level {target}");
    }

    /// Records a literal at the current level.
    ///
    /// # Errors
    ///
    /// Faults if the variable already holds a value of either polarity.
    pub fn record_assignment(&mut self, lit: Literal) -> Result<()> {
        let var = lit.variable();
        if self.assigned_positive.contains(&var) || self.assigned_negative.contains(&var) {
            return Err(ProtocolFault::DuplicateAssignment {
                lit: lit.code(),
                var,
            });
        }

        if let Some(current) = self.levels.last_mut() {
            current.insert(lit);
        }
        if lit.is_positive() {
            self.assigned_positive.insert(var);
        } else {
            self.assigned_negative.insert(var);
        }
        Ok(())
    }

    /// Caches an explanation clause for `lit`, tagged to the current level.
    pub fn cache_reason(&mut self, lit: Literal, clause: Clause) {
        self.reasons.insert(lit, clause);
        if let Some(tags) = self.reason_tags.last_mut() {
            tags.insert(lit);
        }
    }

    /// Whether an explanation is currently cached for `lit`.
    #[must_use]
    pub fn has_reason(&self, lit: Literal) -> bool {
        self.reasons.contains_key(&lit)
    }

    /// Removes and returns the cached explanation for `lit`, purging its
    /// level tag. Entries are single-use.
    ///
    /// # Errors
    ///
    /// Faults if no explanation is cached.
    pub fn take_reason(&mut self, lit: Literal) -> Result<Clause> {
        let clause = self
            .reasons
            .remove(&lit)
            .ok_or(ProtocolFault::UnknownReason { lit: lit.code() })?;
        for tags in &mut self.reason_tags {
            tags.remove(&lit);
        }
        Ok(clause)
    }

    /// The value currently assigned to `var`, if any.
    #[must_use]
    pub fn value(&self, var: Variable) -> Option<bool> {
        if self.assigned_positive.contains(&var) {
            Some(true)
        } else if self.assigned_negative.contains(&var) {
            Some(false)
        } else {
            None
        }
    }

    /// Whether `var` holds a value of either polarity.
    #[must_use]
    pub fn is_assigned(&self, var: Variable) -> bool {
        self.value(var).is_some()
    }

    /// Variables currently assigned true.
    #[must_use]
    pub fn assigned_true(&self) -> &FxHashSet<Variable> {
        &self.assigned_positive
    }

    /// Variables currently assigned false.
    #[must_use]
    pub fn assigned_false(&self) -> &FxHashSet<Variable> {
        &self.assigned_negative
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}
