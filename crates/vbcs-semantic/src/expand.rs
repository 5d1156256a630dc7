//! Default qualifying expander.
//!
//! Rewrites every name in an expression to the form that binds the same way
//! from any scope: shared and module members get their container's qualified
//! name, types get their namespace, and instance members get `Me.`. Nodes
//! that need nothing come back unchanged (same index).

use crate::oracle::SemanticOracle;
use crate::symbols::SymbolKind;
use tracing::trace;
use vbcs_syntax::{InstanceKind, NodeArena, NodeData, NodeIndex};

pub fn expand_qualified<O: SemanticOracle + ?Sized>(
    oracle: &O,
    arena: &mut NodeArena,
    node: NodeIndex,
) -> NodeIndex {
    let Some(data) = arena.data(node).cloned() else {
        return node;
    };
    match data {
        NodeData::Identifier { text } => expand_identifier(oracle, arena, node, &text),
        NodeData::MemberAccess {
            expression,
            name,
            kind,
        } => {
            if expression.is_none() {
                return node;
            }
            let expanded = expand_qualified(oracle, arena, expression);
            if expanded == expression {
                return node;
            }
            arena.synthesize(
                node,
                NodeData::MemberAccess {
                    expression: expanded,
                    name,
                    kind,
                },
            )
        }
        NodeData::ConditionalAccess { expression, name } => {
            let expanded = expand_qualified(oracle, arena, expression);
            if expanded == expression {
                return node;
            }
            arena.synthesize(
                node,
                NodeData::ConditionalAccess {
                    expression: expanded,
                    name,
                },
            )
        }
        NodeData::Invocation {
            expression,
            arguments,
        } => {
            let callee = expand_qualified(oracle, arena, expression);
            let expanded_args: Vec<NodeIndex> = arguments
                .iter()
                .map(|&arg| expand_qualified(oracle, arena, arg))
                .collect();
            if callee == expression && expanded_args == arguments {
                return node;
            }
            arena.synthesize(
                node,
                NodeData::Invocation {
                    expression: callee,
                    arguments: expanded_args,
                },
            )
        }
        NodeData::NamedArgument { name, expression } => {
            let expanded = expand_qualified(oracle, arena, expression);
            if expanded == expression {
                return node;
            }
            arena.synthesize(
                node,
                NodeData::NamedArgument {
                    name,
                    expression: expanded,
                },
            )
        }
        NodeData::Binary {
            left,
            operator,
            right,
        } => {
            let new_left = expand_qualified(oracle, arena, left);
            let new_right = expand_qualified(oracle, arena, right);
            if new_left == left && new_right == right {
                return node;
            }
            arena.synthesize(
                node,
                NodeData::Binary {
                    left: new_left,
                    operator,
                    right: new_right,
                },
            )
        }
        NodeData::Unary { operator, operand } => {
            let expanded = expand_qualified(oracle, arena, operand);
            if expanded == operand {
                return node;
            }
            arena.synthesize(
                node,
                NodeData::Unary {
                    operator,
                    operand: expanded,
                },
            )
        }
        NodeData::Parenthesized { expression } => {
            let expanded = expand_qualified(oracle, arena, expression);
            if expanded == expression {
                return node;
            }
            arena.synthesize(node, NodeData::Parenthesized { expression: expanded })
        }
        NodeData::Ternary {
            condition,
            when_true,
            when_false,
        } => {
            let c = expand_qualified(oracle, arena, condition);
            let t = expand_qualified(oracle, arena, when_true);
            let f = expand_qualified(oracle, arena, when_false);
            if c == condition && t == when_true && f == when_false {
                return node;
            }
            arena.synthesize(
                node,
                NodeData::Ternary {
                    condition: c,
                    when_true: t,
                    when_false: f,
                },
            )
        }
        _ => node,
    }
}

fn expand_identifier<O: SemanticOracle + ?Sized>(
    oracle: &O,
    arena: &mut NodeArena,
    node: NodeIndex,
    text: &str,
) -> NodeIndex {
    let Some(symbol) = oracle.symbol(arena.original(node)) else {
        return node;
    };

    let needs_container = symbol.is_static()
        || matches!(symbol.kind, SymbolKind::NamedType | SymbolKind::Namespace);
    if needs_container {
        let Some(container) = symbol.containing_symbol else {
            return node;
        };
        let qualifier = oracle.symbols().qualified_name(container);
        if qualifier.is_empty() {
            return node;
        }
        trace!(name = text, qualifier = %qualifier, "qualifying with container");
        let trivia = arena.leading_trivia(node).to_string();
        let mut parts = qualifier.split('.');
        let first = parts.next().unwrap_or_default();
        let mut chain = arena.identifier(first);
        arena.set_leading_trivia(chain, &trivia);
        for part in parts {
            chain = arena.member_access(chain, part);
        }
        return wrap_in_member_access(arena, node, chain);
    }

    if symbol.is_qualifiable_instance_reference() && symbol.containing_type.is_some() {
        trace!(name = text, "qualifying with Me");
        let trivia = arena.leading_trivia(node).to_string();
        let me = arena.instance(InstanceKind::Me);
        arena.set_leading_trivia(me, &trivia);
        return wrap_in_member_access(arena, node, me);
    }

    node
}

/// `receiver.<node without trivia>`, standing in for `node`.
fn wrap_in_member_access(arena: &mut NodeArena, node: NodeIndex, receiver: NodeIndex) -> NodeIndex {
    let name = arena.without_trivia(node);
    arena.synthesize(
        node,
        NodeData::MemberAccess {
            expression: receiver,
            name,
            kind: vbcs_syntax::MemberAccessKind::Simple,
        },
    )
}
