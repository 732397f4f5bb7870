//! Arena allocator for expression storage.
//!
//! All nodes of a formula live contiguously in one arena, with hash-consing
//! ensuring each structurally unique subexpression is stored exactly once.
//! Handles stay valid as the arena grows, so differentiation can keep
//! interning derivative nodes into the same arena that holds the original
//! expression.

use hashbrown::HashMap;
use num_traits::Zero;
use smallvec::SmallVec;

use crate::expr::{ExprNode, SymbolId};
use crate::handle::ExprHandle;
use crate::rational::SmallRational;

/// The arena holding one formula's expression DAG.
///
/// Each parsed formula owns its own arena; arenas are never shared between
/// sessions, which is what makes concurrent use from independent sessions
/// safe without any locking.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol table: maps variable names to their IDs.
    symbols: HashMap<String, SymbolId>,
    /// Reverse symbol table for rendering.
    symbol_names: Vec<String>,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, the existing handle is returned.
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "arena capacity exceeded");

        #[allow(clippy::cast_possible_truncation)]
        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this arena.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index() as usize]
    }

    /// Interns a variable name, returning its unique ID.
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.symbols.get(name) {
            return id;
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = self.symbol_names.len() as SymbolId;
        self.symbols.insert(name.to_string(), id);
        self.symbol_names.push(name.to_string());
        id
    }

    /// Gets the name of a variable by its ID.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.symbol_names.get(id as usize).map(String::as_str)
    }

    /// Gets the ID of a variable name, if it has been interned.
    #[must_use]
    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Convenience constructors ===

    /// Creates an integer literal.
    pub fn integer(&mut self, value: i64) -> ExprHandle {
        self.intern(ExprNode::Integer(value))
    }

    /// Creates a numeric literal from an exact rational.
    ///
    /// Integral values intern as [`ExprNode::Integer`] so that `2` and `2/1`
    /// are the same node.
    pub fn number(&mut self, value: SmallRational) -> ExprHandle {
        match value.to_integer() {
            Some(n) => self.integer(n),
            None => self.intern(ExprNode::Rational(value.numerator(), value.denominator())),
        }
    }

    /// Creates a scientific-notation literal `digits × 10^exp`.
    ///
    /// Trailing zeros move into the exponent, and values that fit the exact
    /// rational leaves intern as those instead, so `2e3` and `2000` are the
    /// same node.
    ///
    /// # Panics
    ///
    /// Panics on negative digits; the sign of a literal belongs in a
    /// [`ExprNode::Neg`] wrapper.
    pub fn scientific(&mut self, digits: i64, exp: i32) -> ExprHandle {
        assert!(digits >= 0, "negative scientific digits");
        if digits == 0 {
            return self.integer(0);
        }
        let mut digits = digits;
        let mut exp = exp;
        while digits % 10 == 0 {
            digits /= 10;
            exp = exp.saturating_add(1);
        }
        if let Some(ten_pow) = SmallRational::from_integer(10).checked_powi(exp) {
            if let Some(small) = SmallRational::from_integer(digits).checked_mul(ten_pow) {
                return self.number(small);
            }
        }
        self.intern(ExprNode::Scientific { digits, exp })
    }

    /// Creates a variable leaf, interning its name.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// Creates a sum. A single-element argument list collapses to that
    /// element.
    ///
    /// # Panics
    ///
    /// Panics on an empty argument list; represent zero as `integer(0)`.
    pub fn add(&mut self, args: impl Into<SmallVec<[ExprHandle; 4]>>) -> ExprHandle {
        let args = args.into();
        assert!(!args.is_empty(), "sum of no terms");
        if args.len() == 1 {
            return args[0];
        }
        self.intern(ExprNode::Add(args))
    }

    /// Creates a product. A single-element argument list collapses to that
    /// element.
    ///
    /// # Panics
    ///
    /// Panics on an empty argument list; represent one as `integer(1)`.
    pub fn mul(&mut self, args: impl Into<SmallVec<[ExprHandle; 4]>>) -> ExprHandle {
        let args = args.into();
        assert!(!args.is_empty(), "product of no factors");
        if args.len() == 1 {
            return args[0];
        }
        self.intern(ExprNode::Mul(args))
    }

    /// Creates a power expression.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Pow { base, exp })
    }

    /// Creates a negation.
    pub fn neg(&mut self, arg: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Neg(arg))
    }

    /// Creates a division.
    pub fn div(&mut self, num: ExprHandle, den: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Div { num, den })
    }

    /// Returns the exact numeric value of a handle, if it is a numeric leaf
    /// (possibly behind a negation).
    #[must_use]
    pub fn as_number(&self, handle: ExprHandle) -> Option<SmallRational> {
        match self.get(handle) {
            ExprNode::Neg(inner) => self.get(*inner).as_rational()?.checked_neg(),
            node => node.as_rational(),
        }
    }

    /// Returns true if the handle denotes the exact number zero.
    #[must_use]
    pub fn is_zero(&self, handle: ExprHandle) -> bool {
        self.as_number(handle).is_some_and(|r| r.is_zero())
    }
}
