//! # incerta-core
//!
//! Core expression engine for the Incerta error-propagation system.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Type-safe expression handles
//! - O(1) structural equality via interning
//! - Exact small-rational arithmetic for numeric literals
//! - Free-variable collection and re-parseable infix rendering
//!
//! ## Design Principles
//!
//! - **Data-Oriented Design**: Expressions stored contiguously in arena for cache efficiency
//! - **Hash-Consing**: Every structurally unique expression stored exactly once
//! - **Zero-Cost Handles**: 32-bit indices instead of pointers
//! - **Exactness**: decimal literals become exact rationals, never rounded floats

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod expr;
pub mod handle;
pub mod rational;
pub mod render;
pub mod vars;

pub use arena::ExprArena;
pub use expr::{ExprNode, SymbolId};
pub use handle::ExprHandle;
pub use rational::SmallRational;
pub use render::render;
pub use vars::{contains_symbol, free_variables};
