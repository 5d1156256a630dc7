use super::*;
use vbcs_semantic::{SemanticModel, SymbolFlags, SymbolId, SymbolKind};
use vbcs_syntax::ConditionKind;

fn local(model: &mut SemanticModel) -> SymbolId {
    model
        .symbols_mut()
        .add("a", SymbolKind::Local, SymbolFlags::empty(), None)
}

fn entries(nodes: &[NodeIndex]) -> Vec<PathEntry> {
    nodes.iter().copied().map(PathEntry::new).collect()
}

#[test]
fn test_condition_slot_through_parens() {
    let mut arena = NodeArena::new();
    let a = arena.identifier("a");
    let parens = arena.parens(a);
    let statement = arena.if_statement(parens);

    assert!(always_has_boolean_type(&arena, parens, &entries(&[statement])));
    assert!(always_has_boolean_type(&arena, a, &entries(&[statement, parens])));
}

#[test]
fn test_ternary_condition_but_not_branches() {
    let mut arena = NodeArena::new();
    let c = arena.identifier("c");
    let x = arena.identifier("x");
    let y = arena.identifier("y");
    let ternary = arena.ternary(c, x, y);
    let path = entries(&[ternary]);

    assert!(always_has_boolean_type(&arena, c, &path));
    assert!(!always_has_boolean_type(&arena, x, &path));
    assert!(!always_has_boolean_type(&arena, y, &path));
}

#[test]
fn test_and_also_left_depends_on_right_purity() {
    let mut arena = NodeArena::new();
    let mut model = SemanticModel::new();
    let symbol = local(&mut model);

    let a = arena.identifier("a");
    model.bind(a, symbol);
    let callee = arena.identifier("f");
    let call = arena.invocation(callee, vec![]);
    let and_also = arena.binary_expr(a, BinaryOperator::AndAlso, call);
    let statement = arena.condition_statement(ConditionKind::While, and_also);
    let path = entries(&[statement, and_also]);

    assert!(!can_convert_to_boolean(&arena, &model, a, &path));
    assert!(can_convert_to_boolean(&arena, &model, call, &path));

    let b = arena.identifier("a");
    model.bind(b, symbol);
    let pure = arena.binary_expr(a, BinaryOperator::AndAlso, b);
    let statement = arena.if_statement(pure);
    assert!(can_convert_to_boolean(&arena, &model, a, &entries(&[statement, pure])));
}

#[test]
fn test_enclosing_operator_must_itself_collapse() {
    let mut arena = NodeArena::new();
    let model = SemanticModel::new();

    let a = arena.identifier("a");
    let b = arena.identifier("b");
    let or_else = arena.binary_expr(a, BinaryOperator::OrElse, b);
    let target = arena.identifier("res");
    let assignment = arena.assignment(target, or_else);
    assert!(!can_convert_to_boolean(&arena, &model, a, &entries(&[assignment, or_else])));

    let statement = arena.if_statement(or_else);
    assert!(can_convert_to_boolean(&arena, &model, a, &entries(&[statement, or_else])));
    assert!(can_convert_to_boolean(&arena, &model, b, &entries(&[statement, or_else])));
}

#[test]
fn test_eager_and_xor_do_not_collapse() {
    let mut arena = NodeArena::new();
    let model = SemanticModel::new();
    for operator in [BinaryOperator::And, BinaryOperator::Or, BinaryOperator::Xor] {
        let a = arena.identifier("a");
        let b = arena.identifier("b");
        let node = arena.binary_expr(a, operator, b);
        let statement = arena.if_statement(node);
        assert!(
            !can_convert_to_boolean(&arena, &model, b, &entries(&[statement, node])),
            "{operator:?}"
        );
    }
}

#[test]
fn test_equality_parent_collapses() {
    let mut arena = NodeArena::new();
    let model = SemanticModel::new();
    let a = arena.identifier("a");
    let b = arena.identifier("b");
    let equals = arena.binary_expr(a, BinaryOperator::Equals, b);
    let statement = arena.if_statement(equals);
    assert!(can_convert_to_boolean(&arena, &model, a, &entries(&[statement, equals])));
}

#[test]
fn test_within_condition_stops_at_statements() {
    let mut arena = NodeArena::new();
    let a = arena.identifier("a");
    let one = arena.number("1");
    let sum = arena.binary_expr(a, BinaryOperator::Add, one);
    let callee = arena.identifier("Check");
    let call = arena.invocation(callee, vec![sum]);
    let statement = arena.if_statement(call);
    assert!(within_condition(&arena, a, &entries(&[statement, call, sum])));

    let returned = arena.return_statement(call);
    assert!(!within_condition(&arena, a, &entries(&[returned, call, sum])));
    assert!(!within_condition(&arena, a, &[]));
}
