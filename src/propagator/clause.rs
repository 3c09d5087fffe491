#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
use crate::propagator::literal::Literal;
use core::ops::Index;
use smallvec::SmallVec;
use std::fmt;

/// An ordered disjunction of literals.
///
/// By convention the first element is the implied literal when the clause is
/// used as a reason or conflict explanation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clause {
    literals: SmallVec<[Literal; 8]>,
}

impl Clause {
    #[must_use]
    pub fn new(literals: Vec<Literal>) -> Self {
        Self {
            literals: SmallVec::from_vec(literals),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// The implied literal, when the clause is non-empty.
    #[must_use]
    pub fn implied(&self) -> Option<Literal> {
        self.literals.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn push(&mut self, lit: Literal) {
        self.literals.push(lit);
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Self {
            literals: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Literal>> for Clause {
    fn from(literals: Vec<Literal>) -> Self {
        Self::new(literals)
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Literal;
    type IntoIter = core::slice::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{lit}")?;
        }
        write!(f, ")")
    }
}
