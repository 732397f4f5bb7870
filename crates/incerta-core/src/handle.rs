//! Type-safe expression handles.
//!
//! A handle is a 32-bit index into an [`ExprArena`](crate::arena::ExprArena).
//! Because the arena hash-conses its nodes, two handles from the same arena
//! compare equal if and only if they denote structurally identical
//! expressions.

use std::fmt;

/// A handle to an expression node in an arena.
///
/// Handles are cheap to copy and order-stable: a handle stays valid for the
/// lifetime of its arena, even as the arena grows.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Creates a handle from a raw index.
    ///
    /// Primarily for internal use by the arena.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprHandle({})", self.0)
    }
}

impl fmt::Display for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
