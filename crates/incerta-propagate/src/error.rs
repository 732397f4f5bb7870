//! Invalid-input failures for bindings and measurement series.

use thiserror::Error;

/// Errors raised by binding mutation and measurement-series construction.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    /// An uncertainty below zero was supplied.
    #[error("uncertainty for '{name}' must be non-negative (got {value})")]
    NegativeUncertainty {
        /// The variable whose uncertainty was rejected.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// A value or uncertainty was NaN or infinite.
    #[error("value for '{name}' must be finite (got {value})")]
    NotFinite {
        /// The variable whose value was rejected.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// A variable name not present in the binding store.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// A measurement series with fewer than two finite values.
    #[error("a measurement series needs at least 2 finite values (got {0})")]
    TooFewValues(usize),

    /// An instrument precision that is zero, negative or non-finite.
    #[error("instrument precision must be a positive finite number (got {0})")]
    InvalidPrecision(f64),
}
