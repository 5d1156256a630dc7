//! Purity classification of source expressions.
//!
//! Recomputed on every call; results depend only on the tree and the oracle.

use vbcs_semantic::{SemanticOracle, SymbolKind};
use vbcs_syntax::{NodeArena, NodeData, NodeIndex};

/// Evaluating `node` twice has no side effects and is cheap: literals and
/// references to locals, parameters, fields and auto-properties.
pub fn is_safely_reusable(arena: &NodeArena, oracle: &dyn SemanticOracle, node: NodeIndex) -> bool {
    let node = arena.skip_into_parens(node);
    if matches!(arena.data(node), Some(NodeData::Literal(_))) {
        return true;
    }
    let Some(symbol) = oracle.symbol(arena.original(node)) else {
        return false;
    };
    matches!(
        symbol.kind,
        SymbolKind::Local | SymbolKind::Field | SymbolKind::Parameter
    ) || symbol.is_auto_property()
}

/// Built only from safely reusable leaves combined with unary and binary
/// operators.
pub fn is_pure(arena: &NodeArena, oracle: &dyn SemanticOracle, node: NodeIndex) -> bool {
    let node = arena.skip_into_parens(node);
    if is_safely_reusable(arena, oracle, node) {
        return true;
    }
    match arena.data(node) {
        Some(NodeData::Binary { left, right, .. }) => {
            is_pure(arena, oracle, *left) && is_pure(arena, oracle, *right)
        }
        Some(NodeData::Unary { operand, .. }) => is_pure(arena, oracle, *operand),
        _ => false,
    }
}
