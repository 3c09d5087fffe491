#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Glue between a search engine's callback surface and a [`Theory`].
//!
//! The adapter owns the active theory behind the trait object, keeps the
//! set of registered (observed) variables, and routes every engine callback
//! 1:1, relaying results unmodified. Assignment notifications for
//! unregistered variables are dropped here, matching the registration
//! contract; everything else is pure protocol translation.

use crate::propagator::clause::Clause;
use crate::propagator::error::Result;
use crate::propagator::literal::{Literal, Variable};
use crate::propagator::theory::{ModelVerdict, Theory};
use crate::propagator::trail::DecisionLevel;
use rustc_hash::FxHashSet;

/// Routes engine lifecycle callbacks to the active theory.
pub struct EngineAdapter {
    theory: Box<dyn Theory>,
    observed: FxHashSet<Variable>,
}

impl EngineAdapter {
    /// Connects a theory. Observed variables must be registered before
    /// solving starts.
    #[must_use]
    pub fn new(theory: Box<dyn Theory>) -> Self {
        Self {
            theory,
            observed: FxHashSet::default(),
        }
    }

    /// Registers a variable for assignment notifications.
    pub fn observe(&mut self, var: Variable) {
        self.observed.insert(var);
    }

    /// Registers a batch of variables.
    pub fn observe_all(&mut self, vars: impl IntoIterator<Item = Variable>) {
        self.observed.extend(vars);
    }

    #[must_use]
    pub fn is_observed(&self, var: Variable) -> bool {
        self.observed.contains(&var)
    }

    /// The engine opened a new decision level.
    pub fn on_new_level(&mut self) {
        self.theory.on_new_level();
    }

    /// The engine undid every level above `to`.
    ///
    /// # Errors
    ///
    /// Relays the theory's fault if propagations are still queued.
    pub fn on_backtrack(&mut self, to: DecisionLevel) -> Result<()> {
        self.theory.on_backtrack(to)
    }

    /// Delivers an assignment, provided its variable is registered.
    ///
    /// # Errors
    ///
    /// Relays the theory's fault on a duplicate assignment.
    pub fn on_assignment(&mut self, lit: Literal, fixed: bool) -> Result<()> {
        if !self.observed.contains(&lit.variable()) {
            log::trace!("dropping assignment {lit}: variable not observed");
            return Ok(());
        }
        self.theory.on_assignment(lit, fixed)
    }

    /// Forced literals pending delivery.
    pub fn propagate(&mut self) -> Vec<Literal> {
        self.theory.propagate()
    }

    /// The explanation for a propagated literal.
    ///
    /// # Errors
    ///
    /// Relays the theory's fault when no explanation is cached.
    pub fn provide_reason(&mut self, lit: Literal) -> Result<Clause> {
        self.theory.provide_reason(lit)
    }

    /// Vets a complete assignment.
    ///
    /// # Errors
    ///
    /// Relays theory-internal invariant failures.
    pub fn check_model(&mut self, model: &[Literal]) -> Result<ModelVerdict> {
        self.theory.check_model(model)
    }

    /// The pending blocking clause after a rejection.
    pub fn add_clause(&mut self) -> Clause {
        self.theory.add_clause()
    }

    /// The theory's branching suggestion, if any.
    pub fn decide(&mut self) -> Option<Literal> {
        self.theory.decide()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagator::cardinality::CardinalityTheory;

    fn lit(code: i32) -> Literal {
        Literal::from_code(code).unwrap()
    }

    fn adapter(n: usize, k: usize) -> EngineAdapter {
        let theory = CardinalityTheory::new(n, k).unwrap();
        let vars: Vec<Variable> = theory.observed_variables().collect();
        let mut adapter = EngineAdapter::new(Box::new(theory));
        adapter.observe_all(vars);
        adapter
    }

    #[test]
    fn test_routes_callbacks() {
        let mut adapter = adapter(2, 0);
        adapter.on_new_level();
        adapter.on_assignment(lit(1), false).unwrap();

        let forced = adapter.propagate();
        assert_eq!(forced, vec![lit(-1)]);
        assert_eq!(
            adapter.provide_reason(lit(-1)).unwrap(),
            Clause::new(vec![lit(-1)])
        );
        adapter.on_backtrack(0).unwrap();
    }

    #[test]
    fn test_unobserved_assignments_are_dropped() {
        let mut adapter = adapter(2, 0);
        adapter.on_new_level();
        // variable 9 was never registered: delivery is filtered, twice over
        adapter.on_assignment(lit(9), false).unwrap();
        adapter.on_assignment(lit(9), false).unwrap();
        assert!(adapter.propagate().is_empty());
        assert!(!adapter.is_observed(9));
    }

    #[test]
    fn test_decide_defers_by_default() {
        let mut adapter = adapter(3, 1);
        assert_eq!(adapter.decide(), None);
    }
}
