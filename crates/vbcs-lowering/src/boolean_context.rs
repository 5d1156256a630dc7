//! Where a null boolean behaves like `False`.
//!
//! In a condition position VB treats `Nothing` as false, so a nullable
//! boolean there can be collapsed to a plain `bool` in C#. The same holds
//! for operands of some enclosing operators that are themselves collapsible.

use crate::purity::is_pure;
use vbcs_semantic::SemanticOracle;
use vbcs_syntax::{BinaryOperator, NodeArena, NodeData, NodeIndex, PathEntry};

/// Nearest ancestor that is not a parenthesized expression, with its
/// position in `ancestors`.
pub fn parent_skipping_parens<'p>(
    arena: &NodeArena,
    ancestors: &'p [PathEntry],
) -> Option<(usize, &'p PathEntry)> {
    ancestors
        .iter()
        .enumerate()
        .rev()
        .find(|(_, entry)| !matches!(arena.data(entry.effective), Some(NodeData::Parenthesized { .. })))
}

/// `node` is the condition of an `If`, `ElseIf`, single-line `If`, loop or
/// ternary `If(c, a, b)`.
pub fn always_has_boolean_type(arena: &NodeArena, node: NodeIndex, ancestors: &[PathEntry]) -> bool {
    let Some((_, parent)) = parent_skipping_parens(arena, ancestors) else {
        return false;
    };
    let condition = match arena.data(parent.effective) {
        Some(NodeData::Condition { condition, .. }) => *condition,
        Some(NodeData::Ternary { condition, .. }) => *condition,
        _ => return false,
    };
    arena.skip_into_parens(condition) == arena.skip_into_parens(node)
}

/// True when a null result of `node` would be treated exactly like `False`
/// by whatever consumes it.
///
/// `node` is the parsed node; `ancestors` is the path from the root to its
/// parent.
pub fn can_convert_to_boolean(
    arena: &NodeArena,
    oracle: &dyn SemanticOracle,
    node: NodeIndex,
    ancestors: &[PathEntry],
) -> bool {
    if always_has_boolean_type(arena, node, ancestors) {
        return true;
    }
    let Some((index, parent)) = parent_skipping_parens(arena, ancestors) else {
        return false;
    };
    let Some((left, operator, right)) = arena.binary(parent.effective) else {
        return false;
    };
    if !can_convert_to_boolean(arena, oracle, parent.original, &ancestors[..index]) {
        return false;
    }
    match operator {
        // A null left operand still evaluates the right one.
        BinaryOperator::AndAlso => node != arena.skip_into_parens(left) || is_pure(arena, oracle, right),
        BinaryOperator::OrElse | BinaryOperator::Equals | BinaryOperator::NotEquals => true,
        _ => false,
    }
}

/// `node` or any enclosing expression sits in a condition position.
pub fn within_condition(arena: &NodeArena, node: NodeIndex, ancestors: &[PathEntry]) -> bool {
    if always_has_boolean_type(arena, node, ancestors) {
        return true;
    }
    for index in (0..ancestors.len()).rev() {
        let entry = &ancestors[index];
        if !arena.is_expression(entry.effective) {
            return false;
        }
        if always_has_boolean_type(arena, entry.original, &ancestors[..index]) {
            return true;
        }
    }
    false
}

#[cfg(test)]
#[path = "../tests/boolean_context.rs"]
mod tests;
