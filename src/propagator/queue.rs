#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
use crate::propagator::literal::Literal;
use std::collections::VecDeque;

/// Forced literals a theory has derived, pending delivery to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationQueue(VecDeque<Literal>);

impl PropagationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, lit: Literal) {
        self.0.push_back(lit);
    }

    /// Empties the queue, returning the literals in enqueue order.
    pub fn drain(&mut self) -> Vec<Literal> {
        self.0.drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
