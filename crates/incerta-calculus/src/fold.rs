//! Folding constructors for derivative expressions.
//!
//! Differentiation naively produces trees full of `1*...` and `... + 0`.
//! These constructors fold exact numeric constants and strip neutral
//! elements as nodes are built, so that a partial derivative like
//! ∂(x·y)/∂x comes out as `y` rather than `1*y + x*0`. Folding is purely
//! constructor-level; no rewriting of existing nodes ever happens.

use num_traits::{One, Zero};

use incerta_core::{ExprArena, ExprHandle, ExprNode, SmallRational};

/// Builds a sum, flattening nested sums, folding numeric terms and dropping
/// zeros. An empty or all-zero term list yields the integer zero.
pub fn add(arena: &mut ExprArena, terms: Vec<ExprHandle>) -> ExprHandle {
    let mut rest: Vec<ExprHandle> = Vec::with_capacity(terms.len());
    let mut acc = SmallRational::zero();

    let mut queue = terms;
    queue.reverse();
    while let Some(term) = queue.pop() {
        if let ExprNode::Add(args) = arena.get(term) {
            let args = args.clone();
            for &a in args.iter().rev() {
                queue.push(a);
            }
            continue;
        }
        match arena.as_number(term) {
            Some(r) => match acc.checked_add(r) {
                Some(sum) => acc = sum,
                // Overflow: keep the term symbolic.
                None => rest.push(term),
            },
            None => rest.push(term),
        }
    }

    if !acc.is_zero() || rest.is_empty() {
        let constant = arena.number(acc);
        rest.push(constant);
    }
    if rest.len() == 1 {
        rest[0]
    } else {
        arena.add(rest)
    }
}

/// Builds a product, flattening nested products, folding numeric factors
/// and dropping unit factors. Any exact-zero factor collapses the whole
/// product to zero.
pub fn mul(arena: &mut ExprArena, factors: Vec<ExprHandle>) -> ExprHandle {
    let mut rest: Vec<ExprHandle> = Vec::with_capacity(factors.len());
    let mut acc = SmallRational::one();

    let mut queue = factors;
    queue.reverse();
    while let Some(factor) = queue.pop() {
        if let ExprNode::Mul(args) = arena.get(factor) {
            let args = args.clone();
            for &a in args.iter().rev() {
                queue.push(a);
            }
            continue;
        }
        match arena.as_number(factor) {
            Some(r) if r.is_zero() => return arena.integer(0),
            Some(r) => match acc.checked_mul(r) {
                Some(product) => acc = product,
                None => rest.push(factor),
            },
            None => rest.push(factor),
        }
    }

    if rest.is_empty() {
        return arena.number(acc);
    }
    // A negative coefficient becomes a negation around the product, so
    // `-2*x^(-3)` renders without parentheses around the constant.
    let negative = acc.numerator() < 0;
    match if negative { acc.checked_neg() } else { Some(acc) } {
        Some(magnitude) => {
            if !magnitude.is_one() {
                let constant = arena.number(magnitude);
                rest.insert(0, constant);
            }
            let product = collapse_product(arena, rest);
            if negative {
                arena.neg(product)
            } else {
                product
            }
        }
        // `i64::MIN` numerator cannot be negated; keep the raw constant.
        None => {
            let constant = arena.number(acc);
            rest.insert(0, constant);
            collapse_product(arena, rest)
        }
    }
}

fn collapse_product(arena: &mut ExprArena, factors: Vec<ExprHandle>) -> ExprHandle {
    if factors.len() == 1 {
        factors[0]
    } else {
        arena.mul(factors)
    }
}

/// Builds a negation, folding numeric operands and double negations.
pub fn neg(arena: &mut ExprArena, operand: ExprHandle) -> ExprHandle {
    if let ExprNode::Neg(inner) = arena.get(operand) {
        return *inner;
    }
    if let Some(folded) = arena
        .as_number(operand)
        .and_then(SmallRational::checked_neg)
    {
        return arena.number(folded);
    }
    arena.neg(operand)
}

/// Builds a quotient. A zero numerator folds to zero, a unit denominator
/// disappears, and an exact numeric quotient folds to its value.
pub fn div(arena: &mut ExprArena, num: ExprHandle, den: ExprHandle) -> ExprHandle {
    if arena.is_zero(num) {
        return arena.integer(0);
    }
    // Hoist a negated numerator: (-u)/v becomes -(u/v).
    if let ExprNode::Neg(inner) = arena.get(num) {
        let inner = *inner;
        let quotient = div(arena, inner, den);
        return neg(arena, quotient);
    }
    if arena.get(den).is_one() {
        return num;
    }
    if let (Some(n), Some(d)) = (arena.as_number(num), arena.as_number(den)) {
        if let Some(q) = n.checked_div(d) {
            return arena.number(q);
        }
    }
    arena.div(num, den)
}

/// Builds a power. `u^0` folds to one, `u^1` to `u`, `1^v` to one, and
/// small exact integer powers of numeric bases fold to their value.
pub fn pow(arena: &mut ExprArena, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
    if arena.is_zero(exp) || arena.get(base).is_one() {
        return arena.integer(1);
    }
    if arena.get(exp).is_one() {
        return base;
    }
    if let (Some(b), Some(e)) = (arena.as_number(base), arena.as_number(exp)) {
        if let Some(small) = e.to_integer().and_then(|n| i32::try_from(n).ok()) {
            if small.abs() <= 16 {
                if let Some(folded) = b.checked_powi(small) {
                    return arena.number(folded);
                }
            }
        }
    }
    arena.pow(base, exp)
}
