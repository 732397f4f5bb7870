//! Numeric evaluation by substitution.

use rustc_hash::FxHashMap;

use incerta_core::{ExprArena, ExprHandle, ExprNode};

use crate::error::EvalError;

/// Substitutes `values` for the free variables below `expr` and evaluates.
///
/// # Errors
///
/// - [`EvalError::UnboundVariable`] if a free variable has no entry in
///   `values`;
/// - [`EvalError::DivisionByZero`] for a zero denominator, or zero raised
///   to a negative power;
/// - [`EvalError::DomainViolation`] for a negative base raised to a
///   fractional power;
/// - [`EvalError::NotFinite`] if the arithmetic overflows or cancels into
///   NaN; a silent infinity is never returned.
///
/// # Panics
///
/// Panics if `expr` did not come from `arena` (a caller contract violation,
/// not a data error).
pub fn evaluate(
    arena: &ExprArena,
    expr: ExprHandle,
    values: &FxHashMap<String, f64>,
) -> Result<f64, EvalError> {
    let result = eval_node(arena, expr, values)?;
    if result.is_finite() {
        Ok(result)
    } else {
        Err(EvalError::NotFinite)
    }
}

#[allow(clippy::cast_precision_loss)]
fn eval_node(
    arena: &ExprArena,
    expr: ExprHandle,
    values: &FxHashMap<String, f64>,
) -> Result<f64, EvalError> {
    match arena.get(expr) {
        ExprNode::Integer(n) => Ok(*n as f64),
        ExprNode::Rational(num, den) => Ok(*num as f64 / *den as f64),
        ExprNode::Scientific { digits, exp } => Ok(*digits as f64 * 10f64.powi(*exp)),
        ExprNode::Symbol(id) => {
            let name = arena.symbol_name(*id).expect("symbol name interned");
            values
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::UnboundVariable(name.to_string()))
        }
        ExprNode::Add(args) => {
            let mut sum = 0.0;
            for &arg in args {
                sum += eval_node(arena, arg, values)?;
            }
            Ok(sum)
        }
        ExprNode::Mul(args) => {
            let mut product = 1.0;
            for &arg in args {
                product *= eval_node(arena, arg, values)?;
            }
            Ok(product)
        }
        ExprNode::Neg(inner) => Ok(-eval_node(arena, *inner, values)?),
        ExprNode::Div { num, den } => {
            let divisor = eval_node(arena, *den, values)?;
            if divisor == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(eval_node(arena, *num, values)? / divisor)
        }
        ExprNode::Pow { base, exp } => {
            let b = eval_node(arena, *base, values)?;
            let e = eval_node(arena, *exp, values)?;
            apply_pow(b, e)
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn apply_pow(base: f64, exp: f64) -> Result<f64, EvalError> {
    if base == 0.0 && exp < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let integral = exp.fract() == 0.0;
    if base < 0.0 && !integral {
        return Err(EvalError::DomainViolation(format!(
            "negative base {base} raised to fractional power {exp}"
        )));
    }
    if integral && exp.abs() <= f64::from(i32::MAX) {
        Ok(base.powi(exp as i32))
    } else {
        Ok(base.powf(exp))
    }
}
