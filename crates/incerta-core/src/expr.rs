//! Expression node types.
//!
//! The node set is deliberately closed: the five elementary operators the
//! propagation engine differentiates, plus numeric and symbolic leaves.
//! Nothing else can appear in a parsed expression, which is what makes the
//! differentiation rules in `incerta-calculus` total over this enum.

use smallvec::SmallVec;

use crate::handle::ExprHandle;
use crate::rational::SmallRational;

/// Unique identifier for an interned variable name.
pub type SymbolId = u32;

/// An expression node stored in the arena.
///
/// Nodes are `Eq + Hash` so the arena can hash-cons them; any numeric
/// content is exact (integer or reduced rational), never a float.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    // === Leaves ===
    /// A 64-bit integer literal.
    Integer(i64),

    /// A rational literal (numerator, denominator).
    ///
    /// Invariant: denominator > 0, gcd(|num|, den) == 1. Decimal input such
    /// as `3.14` is stored this way (`157/50`) so identical text always
    /// interns to the identical node.
    Rational(i64, u64),

    /// An exact scientific-notation literal: digits × 10^exp.
    ///
    /// Invariant: digits > 0 and not divisible by 10. Holds values whose
    /// reduced rational form does not fit the 64-bit leaves, such as
    /// `6.022e23` (stored as `6022 × 10^20`).
    Scientific {
        /// The significant digits, positive.
        digits: i64,
        /// The power-of-ten exponent.
        exp: i32,
    },

    /// A free variable.
    Symbol(SymbolId),

    // === Compound expressions ===
    /// Sum of two or more terms: a + b + c + ...
    ///
    /// Subtraction is represented as addition of a [`ExprNode::Neg`] term.
    Add(SmallVec<[ExprHandle; 4]>),

    /// Product of two or more factors: a * b * c * ...
    Mul(SmallVec<[ExprHandle; 4]>),

    /// Power: base ^ exp.
    Pow {
        /// The base of the power.
        base: ExprHandle,
        /// The exponent.
        exp: ExprHandle,
    },

    /// Unary negation: -expr.
    Neg(ExprHandle),

    /// Division: num / den.
    Div {
        /// The numerator.
        num: ExprHandle,
        /// The denominator.
        den: ExprHandle,
    },
}

impl ExprNode {
    /// Returns true if this node is a leaf (no children).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            ExprNode::Integer(_)
                | ExprNode::Rational(_, _)
                | ExprNode::Scientific { .. }
                | ExprNode::Symbol(_)
        )
    }

    /// Returns the exact numeric value of a numeric leaf, if it fits in a
    /// [`SmallRational`]. Scientific leaves never do, by construction.
    #[must_use]
    pub fn as_rational(&self) -> Option<SmallRational> {
        match *self {
            ExprNode::Integer(n) => Some(SmallRational::from_integer(n)),
            // Stored rationals are already reduced with a positive
            // denominator, so reconstruction cannot fail.
            ExprNode::Rational(num, den) => {
                SmallRational::new(num, i64::try_from(den).ok()?)
            }
            _ => None,
        }
    }

    /// Returns true if this is the integer zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, ExprNode::Integer(0))
    }

    /// Returns true if this is the integer one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, ExprNode::Integer(1))
    }

    /// Returns the children of this node, leaves yielding none.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 4]> {
        match self {
            ExprNode::Integer(_)
            | ExprNode::Rational(_, _)
            | ExprNode::Scientific { .. }
            | ExprNode::Symbol(_) => SmallVec::new(),
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![*base, *exp],
            ExprNode::Neg(arg) => smallvec::smallvec![*arg],
            ExprNode::Div { num, den } => smallvec::smallvec![*num, *den],
        }
    }
}
