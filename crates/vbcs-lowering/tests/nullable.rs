use super::*;
use vbcs_semantic::{SemanticModel, SymbolFlags, SymbolKind, TypeId};
use vbcs_syntax::{CsBinaryOperator, CsPrinter};

struct Fixture {
    arena: NodeArena,
    model: SemanticModel,
    options: LoweringOptions,
    temps: TempNames,
}

fn fixture() -> Fixture {
    Fixture {
        arena: NodeArena::new(),
        model: SemanticModel::new(),
        options: LoweringOptions::default(),
        temps: TempNames::default(),
    }
}

impl Fixture {
    fn local(&mut self, name: &str) -> NodeIndex {
        let symbol = self
            .model
            .symbols_mut()
            .add(name, SymbolKind::Local, SymbolFlags::empty(), None);
        let node = self.arena.identifier(name);
        self.model.bind(node, symbol);
        node
    }

    fn lowering(&self) -> NullableLogicLowering<'_> {
        NullableLogicLowering::new(&self.arena, &self.model, &self.temps, &self.options)
    }
}

#[test]
fn test_supported_operators() {
    for operator in [
        BinaryOperator::AndAlso,
        BinaryOperator::OrElse,
        BinaryOperator::And,
        BinaryOperator::Or,
        BinaryOperator::Equals,
        BinaryOperator::NotEquals,
        BinaryOperator::LessThan,
        BinaryOperator::GreaterThanOrEqual,
    ] {
        assert!(is_supported(operator), "{operator:?}");
    }
    for operator in [
        BinaryOperator::Xor,
        BinaryOperator::Is,
        BinaryOperator::Add,
        BinaryOperator::Concatenate,
    ] {
        assert!(!is_supported(operator), "{operator:?}");
    }
}

#[test]
fn test_tagged_marks_proven_non_null() {
    let lowered = LoweredExpr::new(CsExpr::id("a"));
    assert!(!lowered.proven_not_null);
    let tagged = lowered.tagged();
    assert!(tagged.proven_not_null);
    assert_eq!(tagged.expr, CsExpr::id("a"));
}

#[test]
fn test_conversion_runs_only_with_a_value() {
    let f = fixture();
    let converted = f.lowering().invoke_conversion_when_not_null(
        CsExpr::id("x"),
        CsExpr::id("Convert").member("ToInt32"),
        "int?",
    );
    assert_eq!(
        CsPrinter::emit_to_string(&converted),
        "x is { } arg1 ? (int?)Convert.ToInt32(arg1) : null"
    );
    assert_eq!(f.temps.issued(), 1);
}

#[test]
fn test_unlifted_operands_keep_default() {
    let mut f = fixture();
    let x = f.local("x");
    let y = f.local("y");
    let node = f.arena.binary_expr(x, BinaryOperator::Equals, y);
    let statement = f.arena.return_statement(node);
    let default = CsExpr::bin(CsExpr::id("x"), CsBinaryOperator::Equals, CsExpr::id("y"));

    let lowered = f.lowering().lower_binary(
        &PathEntry::new(node),
        &[PathEntry::new(statement)],
        TypeInfo::of(TypeId::INTEGER),
        TypeInfo::of(TypeId::INTEGER),
        default.clone(),
        LoweredExpr::new(CsExpr::id("x")),
        LoweredExpr::new(CsExpr::id("y")),
    );
    assert_eq!(lowered, LoweredExpr::new(default));
    assert_eq!(f.temps.issued(), 0);
}

#[test]
fn test_proven_operands_need_no_guard() {
    let mut f = fixture();
    let x = f.local("x");
    let y = f.local("y");
    let node = f.arena.binary_expr(x, BinaryOperator::LessThan, y);
    let statement = f.arena.return_statement(node);
    let default = CsExpr::bin(CsExpr::id("x"), CsBinaryOperator::LessThan, CsExpr::id("y"));

    let lowered = f.lowering().lower_binary(
        &PathEntry::new(node),
        &[PathEntry::new(statement)],
        TypeInfo::of(TypeId::NULLABLE_INTEGER),
        TypeInfo::of(TypeId::NULLABLE_INTEGER),
        default.clone(),
        LoweredExpr::new(CsExpr::id("x")).tagged(),
        LoweredExpr::new(CsExpr::id("y")).tagged(),
    );
    assert_eq!(lowered, LoweredExpr::not_null(default));
}

#[test]
fn test_tri_state_comparison_guards_both_operands() {
    let mut f = fixture();
    let x = f.local("x");
    let y = f.local("y");
    let node = f.arena.binary_expr(x, BinaryOperator::NotEquals, y);
    let statement = f.arena.return_statement(node);
    let default = CsExpr::bin(CsExpr::id("x"), CsBinaryOperator::NotEquals, CsExpr::id("y"));

    let lowered = f.lowering().lower_binary(
        &PathEntry::new(node),
        &[PathEntry::new(statement)],
        TypeInfo::of(TypeId::NULLABLE_INTEGER),
        TypeInfo::of(TypeId::NULLABLE_INTEGER),
        default,
        LoweredExpr::new(CsExpr::id("x")),
        LoweredExpr::new(CsExpr::id("y")),
    );
    assert!(!lowered.proven_not_null);
    assert_eq!(
        CsPrinter::emit_to_string(&lowered.expr),
        "x.HasValue && y.HasValue ? x != y : (bool?)null"
    );
}
