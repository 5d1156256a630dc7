//! Null-flow facts from enclosing short-circuit conditions.
//!
//! In `x.HasValue AndAlso x > 3` the comparison only runs when `x` has a
//! value. The lookup walks outward from an operand through enclosing
//! `AndAlso`/`OrElse` chains where the operand is on the right, and inspects
//! the left side knowing the value it must have had.

use tracing::trace;
use vbcs_common::limits::MAX_NULL_FLOW_DEPTH;
use vbcs_syntax::{
    BinaryOperator, LiteralValue, NodeArena, NodeData, NodeIndex, PathEntry, UnaryOperator,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KnownNullability {
    Null,
    NotNull,
}

/// Known nullability of `operand` (a direct child of `parent`), or `None`
/// when nothing is known. Only bare identifiers are tracked.
pub fn nullability_within_boolean_expression(
    arena: &NodeArena,
    operand: NodeIndex,
    parent: &PathEntry,
    ancestors: &[PathEntry],
) -> Option<KnownNullability> {
    let name = arena.identifier_text(arena.skip_into_parens(operand))?;

    let mut child = parent.original;
    for entry in ancestors.iter().rev() {
        let (left, operator, right) = arena.binary(entry.effective)?;
        if right == child {
            let assumed = match operator {
                BinaryOperator::AndAlso => Some(true),
                BinaryOperator::OrElse => Some(false),
                _ => None,
            };
            if let Some(result) = assumed {
                if let Some(known) = inspect(arena, name, left, result, 0) {
                    trace!(name, ?known, "null-flow fact from enclosing condition");
                    return Some(known);
                }
            }
        }
        child = entry.original;
    }
    None
}

/// What evaluating `expression` to `result` says about `name`.
fn inspect(
    arena: &NodeArena,
    name: &str,
    expression: NodeIndex,
    result: bool,
    depth: u32,
) -> Option<KnownNullability> {
    if depth > MAX_NULL_FLOW_DEPTH {
        return None;
    }
    match arena.data(expression)? {
        NodeData::MemberAccess {
            expression: receiver,
            name: member,
            ..
        } => {
            let member = arena.identifier_text(*member)?;
            let receiver = arena.identifier_text(*receiver)?;
            if member.eq_ignore_ascii_case("HasValue") && receiver.eq_ignore_ascii_case(name) {
                Some(known_if(result))
            } else {
                None
            }
        }
        NodeData::Binary {
            left,
            operator,
            right,
        } => inspect_binary(arena, name, *left, *operator, *right, result, depth),
        NodeData::Unary {
            operator: UnaryOperator::Not,
            operand,
        } => inspect(arena, name, *operand, !result, depth + 1),
        NodeData::Parenthesized { expression } => inspect(arena, name, *expression, result, depth + 1),
        _ => None,
    }
}

fn inspect_binary(
    arena: &NodeArena,
    name: &str,
    left: NodeIndex,
    operator: BinaryOperator,
    right: NodeIndex,
    result: bool,
    depth: u32,
) -> Option<KnownNullability> {
    match operator {
        BinaryOperator::Is if is_identifier_and_nothing(arena, left, right, name) => {
            Some(known_if(!result))
        }
        BinaryOperator::IsNot if is_identifier_and_nothing(arena, left, right, name) => {
            Some(known_if(result))
        }
        BinaryOperator::AndAlso | BinaryOperator::And => {
            inspect(arena, name, left, result, depth + 1)
                .or_else(|| inspect(arena, name, right, result, depth + 1))
        }
        BinaryOperator::OrElse | BinaryOperator::Or => {
            let l = inspect(arena, name, left, result, depth + 1);
            let r = inspect(arena, name, right, result, depth + 1);
            if l == r { l } else { None }
        }
        _ => None,
    }
}

fn known_if(not_null: bool) -> KnownNullability {
    if not_null {
        KnownNullability::NotNull
    } else {
        KnownNullability::Null
    }
}

/// `name Is Nothing` in either operand order, ignoring parentheses and case.
fn is_identifier_and_nothing(arena: &NodeArena, l: NodeIndex, r: NodeIndex, name: &str) -> bool {
    let matches_name = |node: NodeIndex| {
        arena
            .identifier_text(arena.skip_into_parens(node))
            .is_some_and(|text| text.eq_ignore_ascii_case(name))
    };
    let matches_nothing = |node: NodeIndex| {
        matches!(
            arena.data(arena.skip_into_parens(node)),
            Some(NodeData::Literal(LiteralValue::Nothing))
        )
    };
    (matches_name(l) && matches_nothing(r)) || (matches_nothing(l) && matches_name(r))
}
