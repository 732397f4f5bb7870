//! # incerta-propagate
//!
//! Uncertainty propagation for derived quantities.
//!
//! Given a parsed formula and a value ± uncertainty per free variable, this
//! crate computes the nominal result, the symbolic partial derivative per
//! variable, and the propagated absolute uncertainty
//!
//! ```text
//! Δf = sqrt( Σᵥ (∂f/∂v · Δv)² )
//! ```
//!
//! which is the linear, first-order approximation assuming independent
//! error sources; correlated errors and higher-order terms are not
//! captured. Percentage error is reported relative to |nominal| and is
//! explicitly absent when the nominal value is zero.
//!
//! The crate also carries the closed-form two-operand calculator for the
//! five elementary operations and the measurement-series estimators
//! (range method, standard deviation, standard error, instrument
//! precision) used to obtain per-variable uncertainties in the first
//! place.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod basic;
pub mod bindings;
pub mod error;
pub mod measurement;
pub mod propagate;

#[cfg(test)]
mod proptests;

pub use basic::{BasicOperation, BasicResult, Measured};
pub use bindings::{Binding, BindingStore};
pub use error::DomainError;
pub use measurement::{instrument_uncertainty, SeriesSummary, UncertaintyMethod};
pub use propagate::{propagate, PropagationResult};

pub use incerta_calculus::EvalError;
pub use incerta_parser::{parse, Formula, ParseError};
