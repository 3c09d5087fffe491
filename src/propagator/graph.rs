#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Canonical-form pruning for undirected graphs as a theory.
//!
//! Variables are the C(n,2) potential edges of an n-vertex graph. The theory
//! accepts only assignments whose adjacency matrix is the lexicographically
//! minimal representative of its isomorphism class, so a search engine
//! enumerating models sees exactly one labeling per unlabeled graph. After
//! every assignment the partial matrix is handed to the
//! [`canon`](crate::propagator::canon) oracle; the first violation becomes a
//! conflict clause whose pivot is queued for the engine.

use crate::propagator::canon::{self, AdjacencyMatrix, Violation};
use crate::propagator::clause::Clause;
use crate::propagator::error::{ProtocolFault, Result};
use crate::propagator::literal::{Literal, Variable};
use crate::propagator::queue::PropagationQueue;
use crate::propagator::theory::{ModelVerdict, Theory, TheoryStats};
use crate::propagator::trail::{DecisionLevel, Trail};
use itertools::Itertools;
use rustc_hash::FxHashMap;

/// Bidirectional map between unordered vertex pairs and edge variable ids.
///
/// Pairs `(i, j)` with `i < j` are numbered `1..=C(n,2)` in lexicographic
/// order; lookup is symmetric.
#[derive(Debug, Clone)]
pub struct EdgeVars {
    n: usize,
    pairs: Vec<(usize, usize)>,
    ids: FxHashMap<(usize, usize), Variable>,
}

impl EdgeVars {
    #[must_use]
    pub fn new(n: usize) -> Self {
        let pairs: Vec<(usize, usize)> = (0..n).tuple_combinations().collect();
        let ids = pairs
            .iter()
            .enumerate()
            .map(|(idx, &pair)| (pair, idx as Variable + 1))
            .collect();
        Self { n, pairs, ids }
    }

    /// The number of vertices.
    #[must_use]
    pub const fn vertices(&self) -> usize {
        self.n
    }

    /// The number of edge variables, C(n,2).
    #[must_use]
    pub fn count(&self) -> usize {
        self.pairs.len()
    }

    /// The variable for the unordered pair `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i == j` or either vertex is out of range.
    #[must_use]
    pub fn var_of(&self, i: usize, j: usize) -> Variable {
        self.ids[&(i.min(j), i.max(j))]
    }

    /// The vertex pair of an edge variable, smaller index first.
    #[must_use]
    pub fn endpoints(&self, var: Variable) -> (usize, usize) {
        self.pairs[var as usize - 1]
    }
}

/// Accepts only graphs in canonical (colex-minimal) adjacency form.
#[derive(Debug, Clone)]
pub struct GraphCanonicityTheory {
    edges: EdgeVars,
    trail: Trail,
    queue: PropagationQueue,
    stats: TheoryStats,
}

impl GraphCanonicityTheory {
    /// A canonicity constraint over the edge variables of an n-vertex graph.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            edges: EdgeVars::new(n),
            trail: Trail::new(),
            queue: PropagationQueue::new(),
            stats: TheoryStats::default(),
        }
    }

    /// The edge-variable map.
    #[must_use]
    pub const fn edges(&self) -> &EdgeVars {
        &self.edges
    }

    /// The variable ids this theory must observe.
    pub fn observed_variables(&self) -> impl Iterator<Item = Variable> + use<> {
        1..=u32::try_from(self.edges.count()).unwrap_or(u32::MAX)
    }

    /// Activity counters for this session.
    #[must_use]
    pub const fn stats(&self) -> TheoryStats {
        self.stats
    }

    /// The partial adjacency matrix implied by the current trail.
    fn adjacency(&self) -> AdjacencyMatrix {
        let mut matrix = AdjacencyMatrix::unknown(self.edges.vertices());
        for (idx, &(i, j)) in self.edges.pairs.iter().enumerate() {
            if let Some(present) = self.trail.value(idx as Variable + 1) {
                matrix.set_edge(i, j, present);
            }
        }
        matrix
    }

    /// Conflict clause for a violation: positive literals for the pairs the
    /// relabeling forces to 1, negated literals for the pairs it forces
    /// to 0, each group ascending by variable id. The pivot is the first
    /// element.
    fn conflict_clause(&self, violation: &Violation) -> Clause {
        let positives = violation
            .must_be_positive
            .iter()
            .map(|&(i, j)| self.edges.var_of(i, j))
            .sorted_unstable()
            .map(|var| Literal::new(var, true));
        let negatives = violation
            .must_be_negative
            .iter()
            .map(|&(i, j)| self.edges.var_of(i, j))
            .sorted_unstable()
            .map(|var| Literal::new(var, false));
        positives.chain(negatives).collect()
    }

    fn enqueue_conflict(&mut self, clause: Clause) {
        let Some(pivot) = clause.implied() else {
            return;
        };
        if self.trail.has_reason(pivot) {
            return;
        }
        log::debug!("canonicity conflict, pivot {pivot}, reason {clause}");
        self.trail.cache_reason(pivot, clause);
        self.queue.push(pivot);
        self.stats.conflicts_derived += 1;
    }
}

impl Theory for GraphCanonicityTheory {
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
        log::trace!("canonicity observes {lit} (fixed: {fixed})");
        self.trail.record_assignment(lit)?;

        if let Some(violation) = canon::find_violation(&self.adjacency()) {
            let clause = self.conflict_clause(&violation);
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

    /// Safety net over the complete model. Incremental propagation cuts
    /// every non-canonical branch before it completes, so a violation here
    /// is an invariant failure, not a rejection.
    fn check_model(&mut self, model: &[Literal]) -> Result<ModelVerdict> {
        self.stats.check_model_calls += 1;

        let mut matrix = AdjacencyMatrix::unknown(self.edges.vertices());
        for lit in model {
            let var = lit.variable();
            if (var as usize) <= self.edges.count() {
                let (i, j) = self.edges.endpoints(var);
                matrix.set_edge(i, j, lit.is_positive());
            }
        }

        if let Some(violation) = canon::find_violation(&matrix) {
            return Err(ProtocolFault::PropagationGap {
                permutation: violation.permutation,
            });
        }
        Ok(ModelVerdict::Accepted)
    }

    /// Never rejects through the blocking-clause path, so nothing is ever
    /// pending here.
    fn add_clause(&mut self) -> Clause {
        Clause::default()
    }
}
