//! # Incerta
//!
//! A symbolic error-propagation engine for experimental uncertainty
//! analysis, written in Rust.
//!
//! Incerta parses a free-form algebraic expression, identifies its free
//! variables, and propagates per-variable uncertainties through exact
//! symbolic partial derivatives.
//!
//! ## Features
//!
//! - **Hash-Consed Expression Core**: arena-allocated DAG, structural
//!   equality in O(1)
//! - **Exact Literals**: decimal input becomes exact rationals
//! - **Symbolic Differentiation**: elementary calculus rules, never finite
//!   differences
//! - **Typed Failures**: undefined operations surface as errors, never as
//!   silent NaN
//!
//! ## Quick Start
//!
//! ```rust
//! use incerta::prelude::*;
//!
//! let mut formula = parse("m/V").unwrap();
//! let mut store = BindingStore::new();
//! store.reconcile(formula.variables());
//! store.set_value("m", 10.0).unwrap();
//! store.set_uncertainty("m", 0.05).unwrap();
//! store.set_value("V", 4.0).unwrap();
//! store.set_uncertainty("V", 0.1).unwrap();
//!
//! let result = propagate(&mut formula, &store).unwrap();
//! assert_eq!(result.nominal_value, 2.5);
//! assert_eq!(result.partials["m"], "1/V");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use incerta_calculus as calculus;
pub use incerta_core as core;
pub use incerta_parser as parser;
pub use incerta_propagate as propagate;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use incerta_calculus::{differentiate, evaluate, EvalError};
    pub use incerta_core::{ExprArena, ExprHandle, ExprNode, SmallRational};
    pub use incerta_parser::{parse, Formula, ParseError};
    pub use incerta_propagate::{
        instrument_uncertainty, propagate, BasicOperation, BasicResult, Binding, BindingStore,
        DomainError, Measured, PropagationResult, SeriesSummary, UncertaintyMethod,
    };
}
