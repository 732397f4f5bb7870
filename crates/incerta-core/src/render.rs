//! Infix rendering of expressions.
//!
//! The output uses exactly the notation the parser accepts, so a rendered
//! partial derivative can be pasted back in as a new formula. Re-parsing
//! preserves the value and the operator grouping; the node encoding may
//! differ (a `1/2` leaf reads back as a division node). Parentheses are
//! inserted only where precedence or grouping demands them.

use std::fmt::Write;

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;

/// Precedence levels, loosest to tightest. A child is parenthesized when its
/// own level is below what its position requires.
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

/// Renders the expression below `root` as parser-compatible infix text.
///
/// # Panics
///
/// Panics if `root` did not come from `arena`.
#[must_use]
pub fn render(arena: &ExprArena, root: ExprHandle) -> String {
    let mut out = String::new();
    write_expr(arena, root, &mut out, 0);
    out
}

fn precedence(arena: &ExprArena, handle: ExprHandle) -> u8 {
    match arena.get(handle) {
        ExprNode::Integer(n) => {
            if *n < 0 {
                PREC_ADD
            } else {
                PREC_ATOM
            }
        }
        // A rational prints as `num/den`, textually a division.
        ExprNode::Rational(num, _) => {
            if *num < 0 {
                PREC_ADD
            } else {
                PREC_MUL
            }
        }
        ExprNode::Scientific { .. } => PREC_ATOM,
        ExprNode::Symbol(_) => PREC_ATOM,
        ExprNode::Add(_) | ExprNode::Neg(_) => PREC_ADD,
        ExprNode::Mul(_) | ExprNode::Div { .. } => PREC_MUL,
        ExprNode::Pow { .. } => PREC_POW,
    }
}

fn write_expr(arena: &ExprArena, handle: ExprHandle, out: &mut String, min_prec: u8) {
    if precedence(arena, handle) < min_prec {
        out.push('(');
        write_expr(arena, handle, out, 0);
        out.push(')');
        return;
    }

    match arena.get(handle) {
        ExprNode::Integer(n) => {
            let _ = write!(out, "{n}");
        }
        ExprNode::Rational(num, den) => {
            let _ = write!(out, "{num}/{den}");
        }
        ExprNode::Scientific { digits, exp } => {
            let _ = write!(out, "{digits}e{exp}");
        }
        ExprNode::Symbol(id) => {
            let name = arena.symbol_name(*id).expect("symbol name interned");
            out.push_str(name);
        }
        ExprNode::Add(args) => {
            for (i, &arg) in args.iter().enumerate() {
                if i == 0 {
                    write_expr(arena, arg, out, 0);
                } else if let Some(body) = subtracted_term(arena, arg, out) {
                    // `subtracted_term` wrote " - "; render the magnitude.
                    write_expr(arena, body, out, PREC_MUL);
                }
            }
        }
        ExprNode::Mul(args) => {
            // Non-leading factors need parentheses around divisions, or
            // `c*a/b` would re-parse with the wrong grouping.
            for (i, &arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push('*');
                }
                let min = if i == 0 { PREC_MUL } else { PREC_POW };
                write_expr(arena, arg, out, min);
            }
        }
        ExprNode::Div { num, den } => {
            write_expr(arena, *num, out, PREC_MUL);
            out.push('/');
            write_expr(arena, *den, out, PREC_POW);
        }
        ExprNode::Pow { base, exp } => {
            write_expr(arena, *base, out, PREC_ATOM);
            out.push('^');
            write_expr(arena, *exp, out, PREC_POW);
        }
        ExprNode::Neg(arg) => {
            out.push('-');
            write_expr(arena, *arg, out, PREC_MUL);
        }
    }
}

/// Writes " - " or " + " for a non-leading sum term and returns the handle
/// still to be rendered when the term was a negation; plain terms and
/// negative literals are written in full here.
fn subtracted_term(
    arena: &ExprArena,
    term: ExprHandle,
    out: &mut String,
) -> Option<ExprHandle> {
    match arena.get(term) {
        ExprNode::Neg(body) => {
            out.push_str(" - ");
            Some(*body)
        }
        ExprNode::Integer(n) if *n < 0 => {
            let _ = write!(out, " - {}", n.unsigned_abs());
            None
        }
        ExprNode::Rational(num, den) if *num < 0 => {
            let _ = write!(out, " - {}/{den}", num.unsigned_abs());
            None
        }
        _ => {
            out.push_str(" + ");
            write_expr(arena, term, out, PREC_MUL);
            None
        }
    }
}
