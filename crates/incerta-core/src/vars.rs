//! Free-variable collection over the expression DAG.

use hashbrown::HashSet;

use crate::arena::ExprArena;
use crate::expr::{ExprNode, SymbolId};
use crate::handle::ExprHandle;

/// Collects the free variable names referenced below `root`, sorted
/// lexicographically ascending and de-duplicated.
///
/// # Panics
///
/// Panics if `root` did not come from `arena`.
#[must_use]
pub fn free_variables(arena: &ExprArena, root: ExprHandle) -> Vec<String> {
    let mut names: Vec<String> = symbols_below(arena, root)
        .into_iter()
        .filter_map(|id| arena.symbol_name(id).map(str::to_string))
        .collect();
    names.sort();
    names
}

/// Returns true if the variable `id` occurs anywhere below `root`.
///
/// Used by differentiation to decide whether an exponent is a constant with
/// respect to the differentiation variable.
#[must_use]
pub fn contains_symbol(arena: &ExprArena, root: ExprHandle, id: SymbolId) -> bool {
    symbols_below(arena, root).contains(&id)
}

/// Walks the DAG below `root`, visiting each shared subexpression once.
fn symbols_below(arena: &ExprArena, root: ExprHandle) -> HashSet<SymbolId> {
    let mut found = HashSet::new();
    let mut seen: HashSet<ExprHandle> = HashSet::new();
    let mut stack = vec![root];

    while let Some(handle) = stack.pop() {
        if !seen.insert(handle) {
            continue;
        }
        match arena.get(handle) {
            ExprNode::Symbol(id) => {
                found.insert(*id);
            }
            node => stack.extend(node.children()),
        }
    }
    found
}
