use super::*;
use vbcs_semantic::{SemanticModel, SymbolFlags, SymbolId, SymbolKind};
use vbcs_syntax::TextRange;

/// Class `Form1` with Boolean fields `ready` and `visible`, shared method
/// `Create`, and a method body covering every test node.
struct Fixture {
    arena: NodeArena,
    model: SemanticModel,
    ready: SymbolId,
    visible: SymbolId,
    create: SymbolId,
}

fn fixture() -> Fixture {
    let mut model = SemanticModel::new();
    let form_type = model
        .types_mut()
        .add_class("Form1", None, &["ready", "visible", "Create"]);
    let symbols = model.symbols_mut();
    let ns = symbols.add("App", SymbolKind::Namespace, SymbolFlags::empty(), None);
    let form = symbols.add_type("Form1", form_type, Some(ns));
    let ready = symbols.add("ready", SymbolKind::Field, SymbolFlags::empty(), Some(form));
    let visible = symbols.add("visible", SymbolKind::Field, SymbolFlags::empty(), Some(form));
    let create = symbols.add("Create", SymbolKind::Method, SymbolFlags::STATIC, Some(form));
    let method = symbols.add("Run", SymbolKind::Method, SymbolFlags::empty(), Some(form));
    model.add_scope(TextRange::new(0, 10_000), form);
    model.add_scope(TextRange::new(0, 5_000), method);

    Fixture {
        arena: NodeArena::new(),
        model,
        ready,
        visible,
        create,
    }
}

impl Fixture {
    fn name(&mut self, text: &str, symbol: SymbolId) -> NodeIndex {
        let node = self.arena.identifier(text);
        self.model.bind(node, symbol);
        self.model.set_type(node, TypeId::BOOLEAN);
        node
    }

    fn decide(&mut self, node: NodeIndex, ancestors: &[NodeIndex]) -> ExpansionDecision {
        let path: Vec<PathEntry> = ancestors.iter().copied().map(PathEntry::new).collect();
        NameExpander.decide(&mut self.arena, &self.model, node, &path)
    }
}

fn receiver_of(arena: &NodeArena, node: NodeIndex) -> Option<&NodeData> {
    match arena.data(node)? {
        NodeData::MemberAccess { expression, .. } => arena.data(*expression),
        _ => None,
    }
}

#[test]
fn test_instance_field_is_replaced_by_me_access() {
    let mut f = fixture();
    let ready = f.name("ready", f.ready);
    let statement = f.arena.return_statement(ready);

    let ExpansionDecision::Custom(expansion) = f.decide(ready, &[statement]) else {
        panic!("expected a replacement");
    };
    assert_ne!(expansion.node, ready);
    assert_eq!(f.arena.original(expansion.node), ready);
    assert!(matches!(
        receiver_of(&f.arena, expansion.node),
        Some(NodeData::Instance(InstanceKind::Me))
    ));
    assert_eq!(expansion.extra_import, None);
}

#[test]
fn test_shared_member_gets_qualified_container() {
    let mut f = fixture();
    let create = f.name("Create", f.create);
    let call = f.arena.invocation(create, vec![]);

    let ExpansionDecision::Custom(expansion) = f.decide(create, &[call]) else {
        panic!("expected a replacement");
    };
    let Some(NodeData::MemberAccess { expression, .. }) = f.arena.data(expansion.node) else {
        panic!("expected a member access");
    };
    assert!(matches!(
        f.arena.data(*expression),
        Some(NodeData::MemberAccess { .. })
    ));
}

#[test]
fn test_unbound_name_comes_back_unchanged() {
    let mut f = fixture();
    let unknown = f.arena.identifier("unknown");
    let statement = f.arena.return_statement(unknown);
    assert_eq!(
        f.decide(unknown, &[statement]),
        ExpansionDecision::Custom(Expansion::new(unknown))
    );
}

#[test]
fn test_instance_receiver_stops_qualification() {
    let mut f = fixture();
    let me = f.arena.instance(InstanceKind::Me);
    let access = f.arena.member_access(me, "ready");
    assert!(has_instance_receiver(&f.arena, access));
    assert_eq!(f.decide(access, &[]), ExpansionDecision::Skip);

    let creation = f.arena.object_creation("Form1", vec![]);
    let access = f.arena.member_access(creation, "ready");
    assert!(has_instance_receiver(&f.arena, access));
}

#[test]
fn test_unbound_member_access_visits_children() {
    let mut f = fixture();
    let text = f.arena.identifier("text");
    let access = f.arena.member_access(text, "Length");
    assert!(!has_instance_receiver(&f.arena, access));
    assert_eq!(f.decide(access, &[]), ExpansionDecision::UseDefault);
}

#[test]
fn test_name_slots_are_not_expanded() {
    let mut arena = NodeArena::new();
    let value = arena.identifier("ready");
    let named = arena.named_argument("ready", value);
    let Some(NodeData::NamedArgument { name, .. }) = arena.data(named).cloned() else {
        panic!("expected a named argument");
    };
    let path = [PathEntry::new(named)];
    assert!(!should_expand_name(&arena, name, &path));
    assert!(should_expand_name(&arena, value, &path));

    let value = arena.identifier("ready");
    let field = arena.named_field("Total", value);
    let Some(NodeData::NamedFieldInitializer { name, .. }) = arena.data(field).cloned() else {
        panic!("expected a named field");
    };
    let path = [PathEntry::new(field)];
    assert!(!should_expand_name(&arena, name, &path));
    assert!(should_expand_name(&arena, value, &path));

    let value = arena.identifier("ready");
    let inferred = arena.inferred_field(value);
    assert!(!should_expand_name(&arena, value, &[PathEntry::new(inferred)]));
}

#[test]
fn test_leftmost_qualifier() {
    let mut arena = NodeArena::new();
    let a = arena.identifier("a");
    let access = arena.member_access(a, "b");
    let Some(NodeData::MemberAccess { name, .. }) = arena.data(access).cloned() else {
        panic!("expected a member access");
    };
    let path = [PathEntry::new(access)];
    assert!(is_leftmost_qualifier(&arena, a, &path));
    assert!(!is_leftmost_qualifier(&arena, name, &path));
    assert!(is_leftmost_qualifier(&arena, a, &[]));
}

#[test]
fn test_eager_and_in_condition_short_circuits() {
    let mut f = fixture();
    let ready = f.name("ready", f.ready);
    let visible = f.name("visible", f.visible);
    let node = f.arena.binary_expr(ready, BinaryOperator::And, visible);
    let statement = f.arena.if_statement(node);
    let path = [PathEntry::new(statement)];

    let rewritten = normalize_eager_boolean(&mut f.arena, &f.model, node, &path)
        .expect("eager boolean rule applies");
    assert_eq!(
        f.arena.binary(rewritten),
        Some((ready, BinaryOperator::AndAlso, visible))
    );
    assert_eq!(f.arena.original(rewritten), node);

    // The operands are qualified later, by the driver.
    let ExpansionDecision::Rewrite(expansion) = f.decide(node, &[statement]) else {
        panic!("expected a rewrite");
    };
    assert_eq!(f.arena.binary(expansion.node).map(|(_, op, _)| op), Some(BinaryOperator::AndAlso));
}

#[test]
fn test_eager_or_outside_condition_visits_operands() {
    let mut f = fixture();
    let ready = f.name("ready", f.ready);
    let visible = f.name("visible", f.visible);
    let node = f.arena.binary_expr(ready, BinaryOperator::Or, visible);
    let target = f.arena.identifier("res");
    let statement = f.arena.assignment(target, node);
    let path = [PathEntry::new(statement)];

    assert!(normalize_eager_boolean(&mut f.arena, &f.model, node, &path).is_none());
    assert_eq!(f.decide(node, &[statement]), ExpansionDecision::UseDefault);
    assert_eq!(
        NameExpander.expand_node(&mut f.arena, &f.model, node, &path),
        Expansion::new(node)
    );
}

#[test]
fn test_eager_and_with_impure_right_is_not_normalized() {
    let mut f = fixture();
    let ready = f.name("ready", f.ready);
    let callee = f.arena.identifier("Check");
    let call = f.arena.invocation(callee, vec![]);
    f.model.set_type(call, TypeId::BOOLEAN);
    let node = f.arena.binary_expr(ready, BinaryOperator::And, call);
    let statement = f.arena.if_statement(node);

    let path = [PathEntry::new(statement)];
    assert!(normalize_eager_boolean(&mut f.arena, &f.model, node, &path).is_none());
    assert_eq!(f.decide(node, &[statement]), ExpansionDecision::UseDefault);
}
