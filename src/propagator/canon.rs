#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Canonicity oracle for partially known adjacency matrices.
//!
//! A labeled simple graph is canonical when its colexicographic
//! upper-triangle fingerprint is lexicographically minimal over all vertex
//! relabelings. Given a *partial* matrix, the oracle decides whether some
//! relabeling is already guaranteed to beat the original — filling unknown
//! entries optimistically (0) on the original side and pessimistically (1)
//! on the permuted side — and if so derives the minimal witnessing
//! constraint.
//!
//! The permutation space is explored prefix by prefix with an explicit
//! stack: a prefix whose permuted fingerprint already exceeds the original
//! can never beat it and is pruned, and the first full violation wins.

use bit_vec::BitVec;
use std::cmp::Ordering;

/// An unordered vertex pair, stored with the smaller index first.
pub type VertexPair = (usize, usize);

/// A symmetric n×n matrix over {true, false, unknown} with a zero diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    n: usize,
    cells: Vec<Option<bool>>,
}

impl AdjacencyMatrix {
    /// An n-vertex matrix with every off-diagonal entry unknown.
    #[must_use]
    pub fn unknown(n: usize) -> Self {
        let mut cells = vec![None; n * n];
        for v in 0..n {
            cells[v * n + v] = Some(false);
        }
        Self { n, cells }
    }

    /// The number of vertices.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.n
    }

    /// Sets both symmetric entries for the pair `(i, j)`.
    pub fn set_edge(&mut self, i: usize, j: usize, present: bool) {
        debug_assert!(i != j && i < self.n && j < self.n);
        self.cells[i * self.n + j] = Some(present);
        self.cells[j * self.n + i] = Some(present);
    }

    /// The entry at `(i, j)`; `None` while unknown.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<bool> {
        self.cells[i * self.n + j]
    }
}

/// Evidence that some relabeling beats the original labeling.
///
/// The constraint reads: one of `must_be_positive` must actually be an edge,
/// or one of `must_be_negative` must not be — otherwise the relabeled matrix
/// is strictly smaller. All pairs refer to the original matrix and are
/// currently decided the opposite way, so the derived clause is falsified by
/// the assignment that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The witnessing relabeling.
    pub permutation: Vec<usize>,
    /// Pairs the relabeling forces to 1 (currently known 0).
    pub must_be_positive: Vec<VertexPair>,
    /// Pairs the relabeling forces to 0 (currently known 1).
    pub must_be_negative: Vec<VertexPair>,
}

/// Unordered pairs over `0..k` in colexicographic order:
/// (0,1), (0,2), (1,2), (0,3), (1,3), (2,3), …
#[must_use]
pub fn colex_pairs(k: usize) -> Vec<VertexPair> {
    let mut pairs = Vec::with_capacity(k * k.saturating_sub(1) / 2);
    for j in 1..k {
        for i in 0..j {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Fingerprints of the prefix of length `perm.len()`: the original matrix
/// restricted to the first k vertices with unknowns taken as 0 (best case),
/// and the matrix relabeled by `perm` with unknowns taken as 1 (worst case).
fn fingerprints(matrix: &AdjacencyMatrix, perm: &[usize]) -> (Vec<u8>, Vec<u8>) {
    let k = perm.len();
    let mut original = Vec::with_capacity(k * (k - 1) / 2);
    let mut permuted = Vec::with_capacity(k * (k - 1) / 2);
    for (i, j) in colex_pairs(k) {
        original.push(matrix.get(i, j).map_or(0, u8::from));
        permuted.push(matrix.get(perm[i], perm[j]).map_or(1, u8::from));
    }
    (original, permuted)
}

/// Searches for a relabeling already guaranteed to beat the original
/// labeling of the (possibly partial) matrix. Returns the first violation
/// found, or `None` when the matrix can still be canonical.
#[must_use]
pub fn find_violation(matrix: &AdjacencyMatrix) -> Option<Violation> {
    let n = matrix.order();
    if n == 0 {
        return None;
    }

    let mut perm: Vec<usize> = Vec::with_capacity(n);
    let mut used = BitVec::from_elem(n, false);
    // cursor[d]: next vertex to try when extending the prefix of length d
    let mut cursor: Vec<usize> = vec![0];

    loop {
        let depth = perm.len();
        let mut v = cursor[depth];
        while v < n && used[v] {
            v += 1;
        }
        if v == n {
            // prefix exhausted: retreat one step
            cursor.pop();
            match perm.pop() {
                Some(prev) => used.set(prev, false),
                None => return None,
            }
            continue;
        }

        cursor[depth] = v + 1;
        perm.push(v);
        used.set(v, true);

        let (original, permuted) = fingerprints(matrix, &perm);
        match permuted.cmp(&original) {
            Ordering::Greater => {
                // this relabeling can never become smaller
                if let Some(prev) = perm.pop() {
                    used.set(prev, false);
                }
            }
            Ordering::Less if perm.len() == n => {
                return Some(extract_violation(&perm, &original, &permuted));
            }
            _ => {
                if perm.len() == n {
                    // complete and not smaller (the identity ends up here)
                    if let Some(prev) = perm.pop() {
                        used.set(prev, false);
                    }
                } else {
                    cursor.push(0);
                }
            }
        }
    }
}

/// Scans the fingerprints up to the first differing position, accumulating
/// the decided entries the relabeling relies on. At the difference the
/// permuted entry is 0 and the original 1; everything collected is a known
/// entry of the original matrix.
fn extract_violation(perm: &[usize], original: &[u8], permuted: &[u8]) -> Violation {
    let mut must_be_positive = Vec::new();
    let mut must_be_negative = Vec::new();

    for (l, (i, j)) in colex_pairs(perm.len()).into_iter().enumerate() {
        if permuted[l] == 0 {
            let (pi, pj) = (perm[i], perm[j]);
            must_be_positive.push((pi.min(pj), pi.max(pj)));
        }
        if original[l] == 1 {
            must_be_negative.push((i, j));
        }
        if permuted[l] != original[l] {
            debug_assert!(permuted[l] == 0 && original[l] == 1);
            break;
        }
    }

    Violation {
        permutation: perm.to_vec(),
        must_be_positive,
        must_be_negative,
    }
}
