#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
use core::ops::{Neg, Not};
use std::fmt;
use std::num::NonZeroI32;

/// A boolean variable id. Ids start at 1; 0 is never a variable.
pub type Variable = u32;

/// A signed reference to a boolean variable: the magnitude is the variable
/// id, the sign the assigned polarity. Negation flips the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(NonZeroI32);

impl Literal {
    /// Builds a literal from a variable id and a polarity.
    ///
    /// # Panics
    ///
    /// Panics if `var` is zero or does not fit in an `i32`.
    #[must_use]
    pub fn new(var: Variable, polarity: bool) -> Self {
        let magnitude = i32::try_from(var).expect("variable id overflowed");
        let signed = if polarity { magnitude } else { -magnitude };
        Self(NonZeroI32::new(signed).expect("variable id must be non-zero"))
    }

    /// Decodes the signed integer form used on the wire; zero is not a
    /// literal.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        NonZeroI32::new(code).map(Self)
    }

    /// The signed integer form.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0.get()
    }

    /// The variable this literal refers to.
    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.get().unsigned_abs()
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0.get() > 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.polarity()
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        !self.polarity()
    }

    /// The same variable with the opposite polarity.
    #[must_use]
    pub fn negated(self) -> Self {
        Self(-self.0)
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl From<Literal> for i32 {
    fn from(lit: Literal) -> Self {
        lit.code()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
