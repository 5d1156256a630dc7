//! Qualification decisions.
//!
//! The driver asks a [`SyntaxExpander`] about every node it visits, top
//! down. The expander either leaves the node alone and lets the driver keep
//! asking about its children, stops qualification below the node, or hands
//! back a replacement. A replacement is either already fully qualified or a
//! rewritten node whose children still need qualifying.
//!
//! [`NameExpander`] qualifies each reference once, at the highest node where
//! the right qualification is known: `b.c` becomes `a.b.c`, and neither `b`
//! nor `c` is then looked at alone. It routes around shapes where the generic
//! expander produces invalid code (instance receivers, dictionary access,
//! anonymous types, generic methods).

use crate::boolean_context::within_condition;
use crate::purity::is_pure;
use tracing::{debug, trace};
use vbcs_semantic::{Operation, SemanticOracle, Symbol, TypeId};
use vbcs_syntax::{
    BinaryOperator, InstanceKind, MemberAccessKind, NodeArena, NodeData, NodeIndex, PathEntry,
};

/// Result of expanding one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    /// Replacement node. Equal to the input when nothing changed.
    pub node: NodeIndex,
    /// Qualified container name to import statically into the compilation
    /// unit (module members).
    pub extra_import: Option<String>,
}

impl Expansion {
    pub fn new(node: NodeIndex) -> Self {
        Expansion {
            node,
            extra_import: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpansionDecision {
    /// Keep the node and carry on visiting its children.
    UseDefault,
    /// Keep the node and do not qualify anything below it.
    Skip,
    /// Replace the node. Its subtree is final.
    Custom(Expansion),
    /// Replace the node and keep visiting the replacement's children.
    Rewrite(Expansion),
}

/// Per-node qualification hook.
///
/// `node` is the index the parent's child slot refers to and `ancestors`
/// the path from the root to that parent.
pub trait SyntaxExpander {
    fn should_expand_within_node(
        &self,
        arena: &NodeArena,
        oracle: &dyn SemanticOracle,
        node: NodeIndex,
        ancestors: &[PathEntry],
    ) -> bool;

    fn should_expand_node(
        &self,
        arena: &NodeArena,
        oracle: &dyn SemanticOracle,
        node: NodeIndex,
        ancestors: &[PathEntry],
    ) -> bool;

    fn expand_node(
        &self,
        arena: &mut NodeArena,
        oracle: &dyn SemanticOracle,
        node: NodeIndex,
        ancestors: &[PathEntry],
    ) -> Expansion;

    fn decide(
        &self,
        arena: &mut NodeArena,
        oracle: &dyn SemanticOracle,
        node: NodeIndex,
        ancestors: &[PathEntry],
    ) -> ExpansionDecision {
        if self.should_expand_node(arena, oracle, node, ancestors) {
            ExpansionDecision::Custom(self.expand_node(arena, oracle, node, ancestors))
        } else if self.should_expand_within_node(arena, oracle, node, ancestors) {
            ExpansionDecision::UseDefault
        } else {
            ExpansionDecision::Skip
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NameExpander;

impl SyntaxExpander for NameExpander {
    fn should_expand_within_node(
        &self,
        arena: &NodeArena,
        oracle: &dyn SemanticOracle,
        node: NodeIndex,
        ancestors: &[PathEntry],
    ) -> bool {
        !self.should_expand_node(arena, oracle, node, ancestors) && !has_instance_receiver(arena, node)
    }

    fn should_expand_node(
        &self,
        arena: &NodeArena,
        oracle: &dyn SemanticOracle,
        node: NodeIndex,
        ancestors: &[PathEntry],
    ) -> bool {
        should_expand_name(arena, node, ancestors)
            || should_expand_member_access(arena, oracle, node, ancestors)
            || should_expand_binary(arena, node)
    }

    /// Eager `And`/`Or` only swaps its operator. The operands are left to the
    /// driver so they go through the same rules as any other name.
    fn decide(
        &self,
        arena: &mut NodeArena,
        oracle: &dyn SemanticOracle,
        node: NodeIndex,
        ancestors: &[PathEntry],
    ) -> ExpansionDecision {
        if should_expand_binary(arena, node) {
            return match normalize_eager_boolean(arena, oracle, node, ancestors) {
                Some(rewritten) => ExpansionDecision::Rewrite(Expansion::new(rewritten)),
                None => ExpansionDecision::UseDefault,
            };
        }
        if self.should_expand_node(arena, oracle, node, ancestors) {
            ExpansionDecision::Custom(self.expand_node(arena, oracle, node, ancestors))
        } else if self.should_expand_within_node(arena, oracle, node, ancestors) {
            ExpansionDecision::UseDefault
        } else {
            ExpansionDecision::Skip
        }
    }

    #[tracing::instrument(level = "trace", skip(self, arena, oracle, ancestors))]
    fn expand_node(
        &self,
        arena: &mut NodeArena,
        oracle: &dyn SemanticOracle,
        node: NodeIndex,
        ancestors: &[PathEntry],
    ) -> Expansion {
        if should_expand_binary(arena, node) {
            let rewritten = normalize_eager_boolean(arena, oracle, node, ancestors);
            return Expansion::new(rewritten.unwrap_or(node));
        }

        let symbol = oracle.symbol(arena.original(node));

        if let Some(symbol) = symbol
            && arena.data(node).is_some_and(NodeData::is_simple_name)
            && let Some(enclosing) = default_implicit_instance(arena, oracle, node, symbol, ancestors)
            && let Some(expansion) = qualify_implicit_instance(arena, oracle, node, symbol, enclosing)
        {
            return expansion;
        }

        if let Some(symbol) = symbol
            && is_type_promotion(arena, oracle, node, symbol)
            && let Some(Operation::MemberReference {
                instance: Some(instance),
                member,
            }) = oracle.operation(arena.original(node))
            && let Some(member) = oracle.symbols().get(*member)
        {
            debug!(member = %member.name, "qualifying promoted member through its operation receiver");
            let name = arena.identifier(&member.name);
            let promoted = arena.synthesize(
                node,
                NodeData::MemberAccess {
                    expression: *instance,
                    name,
                    kind: MemberAccessKind::Simple,
                },
            );
            return Expansion::new(promoted);
        }

        let keep = symbol.is_some_and(Symbol::is_generic_method)
            || is_anonymous_member_access(arena, oracle, node);
        let result = if keep {
            trace!("keeping node unexpanded");
            node
        } else {
            oracle.expand_name(arena, node)
        };

        let extra_import = match symbol {
            Some(symbol)
                if matches!(arena.data(node), Some(NodeData::Identifier { .. }))
                    && oracle.is_module_member(symbol) =>
            {
                symbol
                    .containing_symbol
                    .map(|module| oracle.symbols().qualified_name(module))
            }
            _ => None,
        };
        if let Some(import) = &extra_import {
            debug!(import = %import, "module member needs a static import");
        }

        Expansion {
            node: result,
            extra_import,
        }
    }
}

/// Implicit receiver for a bare name: `Me.name` when the enclosing type has
/// the member, the receiver from the bound operation, or `Me.name` for a
/// reduced extension on the enclosing type.
fn qualify_implicit_instance(
    arena: &mut NodeArena,
    oracle: &dyn SemanticOracle,
    node: NodeIndex,
    symbol: &Symbol,
    enclosing: TypeId,
) -> Option<Expansion> {
    let types = oracle.types();
    let trivia = arena.leading_trivia(node).to_string();

    let inherits_container = symbol
        .containing_type
        .is_some_and(|container| types.inherits_from_or_equals(enclosing, container));
    if inherits_container {
        debug!(name = %symbol.name, "qualifying with Me");
        return Some(Expansion::new(me_access(arena, node, &trivia)));
    }

    if let Some(Operation::MemberReference {
        instance: Some(instance),
        ..
    }) = oracle.operation(arena.original(node))
    {
        debug!(name = %symbol.name, "qualifying with the operation receiver");
        let receiver = arena.with_prepended_trivia(*instance, &trivia);
        let name = arena.without_trivia(node);
        let access = arena.synthesize(
            node,
            NodeData::MemberAccess {
                expression: receiver,
                name,
                kind: MemberAccessKind::Simple,
            },
        );
        return Some(Expansion::new(access));
    }

    let extends_enclosing = symbol.is_reduced_extension()
        && symbol
            .receiver_type
            .is_some_and(|receiver| types.inherits_from_or_equals(enclosing, receiver));
    if extends_enclosing {
        debug!(name = %symbol.name, "qualifying reduced extension with Me");
        return Some(Expansion::new(me_access(arena, node, &trivia)));
    }

    None
}

/// `Me.<node>` with the node's leading trivia moved onto `Me`.
fn me_access(arena: &mut NodeArena, node: NodeIndex, trivia: &str) -> NodeIndex {
    let me = arena.instance(InstanceKind::Me);
    arena.set_leading_trivia(me, trivia);
    let name = arena.without_trivia(node);
    arena.synthesize(
        node,
        NodeData::MemberAccess {
            expression: me,
            name,
            kind: MemberAccessKind::Simple,
        },
    )
}

/// Eager `And`/`Or` with a pure right operand, `Boolean` operands and a
/// condition position, restated as `AndAlso`/`OrElse` over the same operand
/// nodes. `None` leaves the node eager.
fn normalize_eager_boolean(
    arena: &mut NodeArena,
    oracle: &dyn SemanticOracle,
    node: NodeIndex,
    ancestors: &[PathEntry],
) -> Option<NodeIndex> {
    let (left, operator, right) = arena.binary(node)?;
    let short_circuit = operator.short_circuit_form()?;
    let types = oracle.types();
    let is_boolean = |operand: NodeIndex| {
        oracle
            .type_info(arena.original(operand))
            .converted_type
            .is_some_and(|ty| types.is_boolean(ty))
    };
    if !is_pure(arena, oracle, right)
        || !is_boolean(left)
        || !is_boolean(right)
        || !within_condition(arena, node, ancestors)
    {
        return None;
    }

    debug!(from = operator.text(), to = short_circuit.text(), "short-circuiting boolean condition");
    Some(arena.synthesize(
        node,
        NodeData::Binary {
            left,
            operator: short_circuit,
            right,
        },
    ))
}

fn should_expand_name(arena: &NodeArena, node: NodeIndex, ancestors: &[PathEntry]) -> bool {
    if !arena.data(node).is_some_and(NodeData::is_simple_name) {
        return false;
    }
    match ancestors.last().and_then(|parent| arena.data(parent.effective)) {
        // These slots cannot hold a qualified name.
        Some(NodeData::NamedArgument { name, .. })
        | Some(NodeData::NamedFieldInitializer { name, .. }) => *name != node,
        // Expanding would duplicate the inferred field name.
        Some(NodeData::InferredFieldInitializer { .. }) => false,
        _ => true,
    }
}

fn should_expand_member_access(
    arena: &NodeArena,
    oracle: &dyn SemanticOracle,
    node: NodeIndex,
    ancestors: &[PathEntry],
) -> bool {
    let Some(NodeData::MemberAccess { kind, .. }) = arena.data(node) else {
        return false;
    };
    if has_instance_receiver(arena, node) || *kind == MemberAccessKind::Dictionary {
        return false;
    }
    should_be_qualified(arena, oracle, node, oracle.symbol(arena.original(node)), ancestors)
}

fn should_expand_binary(arena: &NodeArena, node: NodeIndex) -> bool {
    arena
        .binary(node)
        .is_some_and(|(_, op, _)| matches!(op, BinaryOperator::And | BinaryOperator::Or))
}

/// Member access on `Me`, `MyBase`, `MyClass` or a `New` expression. The
/// generic expander rewrites these receivers into invalid identifiers.
pub fn has_instance_receiver(arena: &NodeArena, node: NodeIndex) -> bool {
    let Some(NodeData::MemberAccess { expression, .. }) = arena.data(node) else {
        return false;
    };
    matches!(
        arena.data(*expression),
        Some(NodeData::Instance(_)) | Some(NodeData::ObjectCreation { .. })
    )
}

fn should_be_qualified(
    arena: &NodeArena,
    oracle: &dyn SemanticOracle,
    node: NodeIndex,
    symbol: Option<&Symbol>,
    ancestors: &[PathEntry],
) -> bool {
    let Some(symbol) = symbol else {
        return false;
    };
    symbol.is_static()
        || could_be_my_base_defect(arena, oracle, node, symbol, ancestors)
        || is_type_promotion(arena, oracle, node, symbol)
}

/// The generic expander sometimes picks `MyBase` instead of `Me` for an
/// implicit receiver, so these names are qualified here.
fn could_be_my_base_defect(
    arena: &NodeArena,
    oracle: &dyn SemanticOracle,
    node: NodeIndex,
    symbol: &Symbol,
    ancestors: &[PathEntry],
) -> bool {
    arena.data(node).is_some_and(NodeData::is_simple_name)
        && default_implicit_instance(arena, oracle, node, symbol, ancestors).is_some()
}

/// First name of an access chain (`a` in `a.b.c` and `a?.b`).
pub fn is_leftmost_qualifier(arena: &NodeArena, node: NodeIndex, ancestors: &[PathEntry]) -> bool {
    match ancestors.last().and_then(|parent| arena.data(parent.effective)) {
        Some(NodeData::MemberAccess { expression, .. })
        | Some(NodeData::ConditionalAccess { expression, .. }) => *expression == node,
        _ => true,
    }
}

/// Named type whose instance an unqualified reference implicitly uses.
fn default_implicit_instance(
    arena: &NodeArena,
    oracle: &dyn SemanticOracle,
    node: NodeIndex,
    symbol: &Symbol,
    ancestors: &[PathEntry],
) -> Option<TypeId> {
    if symbol.is_qualifiable_instance_reference() && is_leftmost_qualifier(arena, node, ancestors) {
        oracle.enclosing_named_type(arena.pos(node))
    } else {
        None
    }
}

/// `receiver.member` where the receiver's type does not itself declare the
/// member (the front end promoted the access to another instance).
fn is_type_promotion(
    arena: &NodeArena,
    oracle: &dyn SemanticOracle,
    node: NodeIndex,
    symbol: &Symbol,
) -> bool {
    if !symbol.is_qualifiable_instance_reference() {
        return false;
    }
    let Some(NodeData::MemberAccess { expression, .. }) = arena.data(node) else {
        return false;
    };
    if expression.is_none() {
        return false;
    }
    match oracle.type_info(arena.original(*expression)).ty {
        None => true,
        Some(receiver) => !oracle.types().contains_member(receiver, &symbol.name),
    }
}

/// Member access on an anonymous type instance. The generic expander turns
/// these into `Global.` references.
fn is_anonymous_member_access(arena: &NodeArena, oracle: &dyn SemanticOracle, node: NodeIndex) -> bool {
    let Some(NodeData::MemberAccess { expression, .. }) = arena.data(node) else {
        return false;
    };
    oracle
        .type_info(arena.original(*expression))
        .ty
        .is_some_and(|ty| oracle.types().is_anonymous(ty))
}

#[cfg(test)]
#[path = "../tests/qualify.rs"]
mod tests;
