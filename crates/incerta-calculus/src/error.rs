//! Evaluation failures.

use thiserror::Error;

/// Errors raised while evaluating an expression or building a derivative.
///
/// All variants are recoverable at the call boundary: the computation is
/// deterministic, so retrying with unchanged input cannot succeed, but the
/// caller can surface the message and ask for corrected input.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// A free variable has no bound value.
    #[error("unbound variable '{0}'")]
    UnboundVariable(String),

    /// A denominator (or a zero base with negative exponent) was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// An operation left the reals, e.g. a negative base raised to a
    /// fractional power.
    #[error("undefined operation: {0}")]
    DomainViolation(String),

    /// The derivative of `u^v` where `v` depends on the differentiation
    /// variable is not expressible in the elementary operator set.
    #[error("cannot differentiate: exponent depends on '{0}'")]
    NonconstantExponent(String),

    /// Arithmetic overflowed to infinity or produced NaN.
    #[error("result is not a finite number")]
    NotFinite,

    /// A zero operand in a relative-uncertainty law (multiplication,
    /// division or power fast path).
    #[error("undefined: zero operand in relative-uncertainty law")]
    ZeroOperand,
}
