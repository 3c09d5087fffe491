//! Drives the propagation protocol end to end with a minimal chronological
//! engine: branch on variables in order, deliver every assignment, drain and
//! semantically check each propagation, prune on conflicts, and vet complete
//! models. This is the protocol the external CDCL engine speaks, minus the
//! clause learning.

use sat_propagator::propagator::adapter::EngineAdapter;
use sat_propagator::propagator::canon::{self, AdjacencyMatrix};
use sat_propagator::propagator::cardinality::CardinalityTheory;
use sat_propagator::propagator::graph::{EdgeVars, GraphCanonicityTheory};
use sat_propagator::propagator::literal::Literal;
use sat_propagator::propagator::theory::{ModelVerdict, Theory};
use std::collections::BTreeSet;

struct Enumerator {
    adapter: EngineAdapter,
    num_vars: u32,
    values: Vec<Option<bool>>,
    accepted: Vec<Vec<i32>>,
}

impl Enumerator {
    fn new(theory: Box<dyn Theory>, num_vars: u32) -> Self {
        let mut adapter = EngineAdapter::new(theory);
        adapter.observe_all(1..=num_vars);
        Self {
            adapter,
            num_vars,
            values: vec![None; num_vars as usize + 1],
            accepted: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<i32>> {
        self.explore(1, 0);
        self.accepted
    }

    fn value_of(&self, lit: Literal) -> Option<bool> {
        self.values[lit.variable() as usize].map(|b| b == lit.is_positive())
    }

    fn explore(&mut self, var: u32, level: usize) {
        if var > self.num_vars {
            self.finish_model();
            return;
        }

        // neither theory expresses a branching preference
        assert_eq!(self.adapter.decide(), None);

        for polarity in [true, false] {
            self.adapter.on_new_level();
            self.values[var as usize] = Some(polarity);
            let conflict = self.assign_and_drain(Literal::new(var, polarity));
            if !conflict {
                self.explore(var + 1, level + 1);
            }
            self.values[var as usize] = None;
            self.adapter
                .on_backtrack(level)
                .expect("queue is drained before backtracking");
        }
    }

    /// Delivers one assignment and pulls every forced literal, checking the
    /// reason-clause contract on each. Returns whether the branch is dead.
    fn assign_and_drain(&mut self, lit: Literal) -> bool {
        self.adapter
            .on_assignment(lit, false)
            .expect("the engine never re-assigns a variable");

        let mut conflict = false;
        for implied in self.adapter.propagate() {
            let reason = self
                .adapter
                .provide_reason(implied)
                .expect("every propagated literal carries a reason");
            assert_eq!(
                reason.implied(),
                Some(implied),
                "the implied literal must lead its reason clause"
            );
            for (idx, other) in reason.iter().enumerate() {
                if idx > 0 {
                    assert_eq!(
                        self.value_of(*other),
                        Some(false),
                        "reason clause literal {other} must be false under the trail"
                    );
                }
            }
            // both theories derive conflicts over decided variables: the
            // pivot itself is false, so the branch cannot be completed
            assert_eq!(self.value_of(implied), Some(false));
            conflict = true;
        }
        conflict
    }

    fn finish_model(&mut self) {
        let model: Vec<Literal> = (1..=self.num_vars)
            .map(|v| Literal::new(v, self.values[v as usize].unwrap()))
            .collect();

        match self
            .adapter
            .check_model(&model)
            .expect("final check must not fault")
        {
            ModelVerdict::Accepted => {
                self.accepted.push(model.iter().map(|l| l.code()).collect());
            }
            ModelVerdict::Rejected => {
                let blocking = self.adapter.add_clause();
                assert!(
                    !blocking.is_empty(),
                    "a rejection must come with a blocking clause"
                );
                for lit in &blocking {
                    assert_eq!(
                        self.value_of(*lit),
                        Some(false),
                        "the blocking clause must be violated by the rejected model"
                    );
                }
            }
        }
    }
}

fn enumerate_cardinality(n: usize, k: usize) -> Vec<Vec<i32>> {
    let theory = CardinalityTheory::new(n, k).unwrap();
    Enumerator::new(Box::new(theory), n as u32).run()
}

fn enumerate_graphs(n: usize) -> Vec<Vec<i32>> {
    let theory = GraphCanonicityTheory::new(n);
    let num_vars = theory.observed_variables().count() as u32;
    Enumerator::new(Box::new(theory), num_vars).run()
}

fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    (1..=k).fold(1, |acc, i| acc * (n - k + i) / i)
}

#[test]
fn cardinality_model_counts_match_binomial() {
    for &(n, k) in &[(1, 0), (3, 2), (4, 0), (4, 4), (5, 2), (6, 3), (7, 5)] {
        let accepted = enumerate_cardinality(n, k);
        assert_eq!(
            accepted.len() as u64,
            binomial(n as u64, k as u64),
            "C({n},{k}) model count"
        );
        for model in &accepted {
            let trues = model.iter().filter(|&&code| code > 0).count();
            assert_eq!(trues, k, "model {model:?} must have exactly {k} trues");
        }
    }
}

#[test]
fn cardinality_three_choose_two_models() {
    let accepted: BTreeSet<BTreeSet<i32>> = enumerate_cardinality(3, 2)
        .into_iter()
        .map(|m| m.into_iter().collect())
        .collect();

    let expected: BTreeSet<BTreeSet<i32>> = [
        vec![1, 2, -3],
        vec![1, -2, 3],
        vec![-1, 2, 3],
    ]
    .into_iter()
    .map(|m| m.into_iter().collect())
    .collect();

    assert_eq!(accepted, expected);
}

#[test]
fn cardinality_empty_universe() {
    assert_eq!(enumerate_cardinality(0, 0).len(), 1);
}

#[test]
fn graph_model_counts_match_unlabeled_graph_numbers() {
    // OEIS A000088
    let expected = [1usize, 1, 2, 4, 11, 34];
    for (n, &count) in expected.iter().enumerate() {
        assert_eq!(
            enumerate_graphs(n).len(),
            count,
            "unlabeled graph count for n = {n}"
        );
    }
}

#[test]
fn graph_three_vertex_representatives() {
    // vars on 3 vertices: 1=(0,1), 2=(0,2), 3=(1,2)
    let accepted: BTreeSet<Vec<i32>> = enumerate_graphs(3).into_iter().collect();

    let expected: BTreeSet<Vec<i32>> = [
        vec![-1, -2, -3], // empty graph
        vec![-1, -2, 3],  // single edge
        vec![-1, 2, 3],   // two-edge path
        vec![1, 2, 3],    // triangle
    ]
    .into_iter()
    .collect();

    assert_eq!(accepted, expected);
}

#[test]
fn graph_accepted_models_agree_with_oracle_brute_force() {
    // cross-check against the oracle over all 2^6 labelings of 4 vertices
    let n = 4;
    let edges = EdgeVars::new(n);
    let m = edges.count();

    let mut canonical = BTreeSet::new();
    for mask in 0u32..(1 << m) {
        let mut matrix = AdjacencyMatrix::unknown(n);
        let mut model = Vec::with_capacity(m);
        for var in 1..=m as u32 {
            let present = mask & (1 << (var - 1)) != 0;
            let (i, j) = edges.endpoints(var);
            matrix.set_edge(i, j, present);
            model.push(if present { var as i32 } else { -(var as i32) });
        }
        if canon::find_violation(&matrix).is_none() {
            canonical.insert(model);
        }
    }

    let accepted: BTreeSet<Vec<i32>> = enumerate_graphs(n).into_iter().collect();
    assert_eq!(accepted, canonical);
    assert_eq!(accepted.len(), 11);
}
