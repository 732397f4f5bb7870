//! Exact symbolic differentiation.
//!
//! One recursive rule per node variant; the result is interned into the
//! same arena as the input expression, so derivative and original share
//! structure through hash-consing.

use incerta_core::{contains_symbol, ExprArena, ExprHandle, ExprNode, SmallRational, SymbolId};

use crate::error::EvalError;
use crate::fold;

/// Differentiates `expr` with respect to the variable `var`.
///
/// Derivative nodes are interned into `arena`. A variable that does not
/// occur in the expression yields the zero expression.
///
/// # Errors
///
/// Returns [`EvalError::NonconstantExponent`] for a power whose exponent
/// depends on `var` (e.g. `x^x`): its derivative needs `ln`, which the
/// elementary operator set does not contain.
pub fn differentiate(
    arena: &mut ExprArena,
    expr: ExprHandle,
    var: &str,
) -> Result<ExprHandle, EvalError> {
    let id = arena.intern_symbol(var);
    diff_node(arena, expr, id)
}

fn diff_node(
    arena: &mut ExprArena,
    expr: ExprHandle,
    var: SymbolId,
) -> Result<ExprHandle, EvalError> {
    let node = arena.get(expr).clone();
    match node {
        ExprNode::Integer(_) | ExprNode::Rational(_, _) | ExprNode::Scientific { .. } => {
            Ok(arena.integer(0))
        }

        ExprNode::Symbol(id) => Ok(arena.integer(i64::from(id == var))),

        // Sum rule: differentiate termwise.
        ExprNode::Add(args) => {
            let mut terms = Vec::with_capacity(args.len());
            for &arg in &args {
                terms.push(diff_node(arena, arg, var)?);
            }
            Ok(fold::add(arena, terms))
        }

        // General Leibniz rule: Σᵢ (f₁ ⋯ fᵢ' ⋯ fₙ).
        ExprNode::Mul(args) => {
            let mut terms = Vec::with_capacity(args.len());
            for i in 0..args.len() {
                let di = diff_node(arena, args[i], var)?;
                let mut factors: Vec<ExprHandle> = args.iter().copied().collect();
                factors[i] = di;
                terms.push(fold::mul(arena, factors));
            }
            Ok(fold::add(arena, terms))
        }

        ExprNode::Neg(inner) => {
            let d = diff_node(arena, inner, var)?;
            Ok(fold::neg(arena, d))
        }

        // Quotient rule, with shortcuts when one side is constant in `var`.
        ExprNode::Div { num, den } => {
            let dn = diff_node(arena, num, var)?;
            let dd = diff_node(arena, den, var)?;

            if arena.is_zero(dd) {
                // (u/c)' = u'/c
                return Ok(fold::div(arena, dn, den));
            }

            let u_v = fold::mul(arena, vec![dn, den]);
            let v_u = fold::mul(arena, vec![num, dd]);
            let neg_v_u = fold::neg(arena, v_u);
            let numer = fold::add(arena, vec![u_v, neg_v_u]);
            let two = arena.integer(2);
            let den_sq = fold::pow(arena, den, two);
            Ok(fold::div(arena, numer, den_sq))
        }

        // Power rule with chain rule: (u^c)' = c·u^(c-1)·u'.
        ExprNode::Pow { base, exp } => {
            if contains_symbol(arena, exp, var) {
                let name = arena
                    .symbol_name(var)
                    .expect("symbol name interned")
                    .to_string();
                return Err(EvalError::NonconstantExponent(name));
            }

            let du = diff_node(arena, base, var)?;
            let exp_minus_one = decrement(arena, exp);
            let lowered = fold::pow(arena, base, exp_minus_one);
            Ok(fold::mul(arena, vec![exp, lowered, du]))
        }
    }
}

/// Builds `exp - 1`, folding when the exponent is an exact number.
fn decrement(arena: &mut ExprArena, exp: ExprHandle) -> ExprHandle {
    if let Some(folded) = arena
        .as_number(exp)
        .and_then(|r| r.checked_sub(SmallRational::from_integer(1)))
    {
        return arena.number(folded);
    }
    let minus_one = arena.integer(-1);
    fold::add(arena, vec![exp, minus_one])
}
