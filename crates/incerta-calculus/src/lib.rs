//! # incerta-calculus
//!
//! Exact symbolic differentiation and numeric substitution evaluation over
//! the `incerta-core` expression DAG.
//!
//! Derivatives are computed by the standard elementary rules (sum rule,
//! general Leibniz product rule, quotient rule, power rule with chain rule),
//! never by finite differences: results are deterministic and exact at the
//! evaluation point. Evaluation surfaces every undefined operation as a
//! typed [`EvalError`] instead of letting NaN or infinity leak out.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diff;
pub mod error;
pub mod eval;
pub mod fold;

pub use diff::differentiate;
pub use error::EvalError;
pub use eval::evaluate;
