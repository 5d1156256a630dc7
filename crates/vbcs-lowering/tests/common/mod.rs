//! Shared test fixtures for the lowering test suites.
//!
//! `TestContext` builds a small bound tree by hand: one class `Form1` in
//! namespace `App` with a method body that covers every node created through
//! the context. Helpers bind names and record types the way the front end
//! would, including lifting operands of nullable comparisons and logical
//! operators.

#![allow(dead_code)]

pub mod eval;

use std::collections::HashMap;
use vbcs_common::LoweringOptions;
use vbcs_lowering::tracing_config::init_tracing;
use vbcs_lowering::{ExpressionConverter, NameExpander, TempNames};
use vbcs_semantic::{
    SemanticModel, SemanticOracle, SymbolFlags, SymbolId, SymbolKind, TypeId, TypeInfo, TypeKind,
};
use vbcs_syntax::{BinaryOperator, CsPrinter, CsStmt, NodeArena, NodeIndex, TextRange};

pub struct TestContext {
    pub arena: NodeArena,
    pub model: SemanticModel,
    pub options: LoweringOptions,
    pub temps: TempNames,
    pub namespace: SymbolId,
    pub form: SymbolId,
    pub form_type: TypeId,
    pub method: SymbolId,
    names: HashMap<String, (SymbolId, TypeId)>,
}

impl TestContext {
    /// Context with bare `true`/`false`/`null` in conditional arms.
    pub fn new() -> Self {
        Self::with_options(LoweringOptions {
            explicit_nullable_casts: false,
            ..LoweringOptions::default()
        })
    }

    pub fn with_options(options: LoweringOptions) -> Self {
        init_tracing();
        let mut model = SemanticModel::new();
        let form_type = model.types_mut().add_class("Form1", None, &[]);
        let symbols = model.symbols_mut();
        let ns = symbols.add("App", SymbolKind::Namespace, SymbolFlags::empty(), None);
        let form = symbols.add_type("Form1", form_type, Some(ns));
        let method = symbols.add("Run", SymbolKind::Method, SymbolFlags::empty(), Some(form));
        model.add_scope(TextRange::new(0, 1_000_000), form);
        model.add_scope(TextRange::new(0, 500_000), method);

        let temps = TempNames::from_options(&options);
        TestContext {
            arena: NodeArena::new(),
            model,
            options,
            temps,
            namespace: ns,
            form,
            form_type,
            method,
            names: HashMap::new(),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Local variable of the run method.
    pub fn local(&mut self, name: &str, ty: TypeId) -> SymbolId {
        self.declare(name, SymbolKind::Local, SymbolFlags::empty(), Some(self.method), ty)
    }

    /// Instance field of `Form1`.
    pub fn field(&mut self, name: &str, ty: TypeId) -> SymbolId {
        self.model.types_mut().add_member(self.form_type, name);
        self.declare(name, SymbolKind::Field, SymbolFlags::empty(), Some(self.form), ty)
    }

    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        flags: SymbolFlags,
        containing: Option<SymbolId>,
        ty: TypeId,
    ) -> SymbolId {
        let id = self.model.symbols_mut().add(name, kind, flags, containing);
        self.names.insert(name.to_string(), (id, ty));
        id
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Reference to a declared name.
    pub fn id(&mut self, name: &str) -> NodeIndex {
        let node = self.arena.identifier(name);
        if let Some(&(symbol, ty)) = self.names.get(name) {
            self.model.bind(node, symbol);
            self.model.set_type(node, ty);
        }
        node
    }

    /// `name()` where `name` is a local delegate returning `ty`.
    pub fn call(&mut self, name: &str, ty: TypeId) -> NodeIndex {
        if !self.names.contains_key(name) {
            let delegate = self.model.types_mut().add(&format!("Func({name})"), TypeKind::Delegate);
            self.local(name, delegate);
        }
        let callee = self.id(name);
        let node = self.arena.invocation(callee, vec![]);
        self.model.set_type(node, ty);
        node
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        let node = self.arena.boolean(value);
        self.model.set_type(node, TypeId::BOOLEAN);
        node
    }

    pub fn number(&mut self, text: &str) -> NodeIndex {
        let node = self.arena.number(text);
        self.model.set_type(node, TypeId::INTEGER);
        node
    }

    pub fn nothing(&mut self) -> NodeIndex {
        self.arena.nothing()
    }

    pub fn parens(&mut self, expression: NodeIndex) -> NodeIndex {
        let node = self.arena.parens(expression);
        let info = self.model.type_info(expression);
        self.model.set_type_info(node, info);
        node
    }

    pub fn not(&mut self, operand: NodeIndex) -> NodeIndex {
        let node = self.arena.not(operand);
        let info = self.model.type_info(operand);
        self.model.set_type_info(node, info);
        node
    }

    /// `x.HasValue`
    pub fn has_value(&mut self, name: &str) -> NodeIndex {
        let receiver = self.id(name);
        let node = self.arena.member_access(receiver, "HasValue");
        self.model.set_type(node, TypeId::BOOLEAN);
        node
    }

    /// Binary expression typed the way VB binds it: logical and comparison
    /// operators over a nullable operand are lifted, converting the other
    /// operand to its nullable form and producing `Boolean?`.
    pub fn bin(&mut self, left: NodeIndex, operator: BinaryOperator, right: NodeIndex) -> NodeIndex {
        let node = self.arena.binary_expr(left, operator, right);
        let lhs = self.model.type_info(left).ty;
        let rhs = self.model.type_info(right).ty;

        let lifting = operator.is_relational()
            || matches!(
                operator,
                BinaryOperator::AndAlso
                    | BinaryOperator::OrElse
                    | BinaryOperator::And
                    | BinaryOperator::Or
            );
        let nullable = [lhs, rhs]
            .into_iter()
            .flatten()
            .any(|ty| self.model.types().is_nullable(ty));

        if lifting {
            if nullable {
                for (operand, ty) in [(left, lhs), (right, rhs)] {
                    if let Some(ty) = ty {
                        let lifted = if self.model.types().is_nullable(ty) {
                            ty
                        } else {
                            self.model.types_mut().nullable(ty)
                        };
                        self.model.set_type_info(operand, TypeInfo::converted(ty, lifted));
                    }
                }
                self.model.set_type(node, TypeId::NULLABLE_BOOLEAN);
            } else {
                self.model.set_type(node, TypeId::BOOLEAN);
            }
        } else if matches!(operator, BinaryOperator::Is | BinaryOperator::IsNot) {
            self.model.set_type(node, TypeId::BOOLEAN);
        } else if let Some(ty) = lhs {
            self.model.set_type(node, ty);
        }
        node
    }

    // =========================================================================
    // Statements and conversion
    // =========================================================================

    pub fn if_stmt(&mut self, condition: NodeIndex) -> NodeIndex {
        self.arena.if_statement(condition)
    }

    /// `name = value` where `name` is a declared local.
    pub fn assign(&mut self, name: &str, value: NodeIndex) -> NodeIndex {
        let target = self.id(name);
        self.arena.assignment(target, value)
    }

    pub fn ret(&mut self, value: NodeIndex) -> NodeIndex {
        self.arena.return_statement(value)
    }

    /// Convert a statement to target IR with the default name expander.
    pub fn lower(&mut self, statement: NodeIndex) -> CsStmt {
        let expander = NameExpander;
        let mut converter = ExpressionConverter::new(
            &mut self.arena,
            &self.model,
            &self.options,
            &expander,
            &self.temps,
        );
        converter
            .convert_statement(statement)
            .unwrap_or_else(|err| panic!("conversion failed: {err}"))
    }

    /// Convert and print a statement with the default name expander.
    pub fn convert(&mut self, statement: NodeIndex) -> String {
        let stmt = self.lower(statement);
        CsPrinter::emit_stmt_to_string(&stmt)
    }

    /// Convert and print a statement, also returning requested imports.
    pub fn convert_with_imports(&mut self, statement: NodeIndex) -> (String, Vec<String>) {
        let expander = NameExpander;
        let mut converter = ExpressionConverter::new(
            &mut self.arena,
            &self.model,
            &self.options,
            &expander,
            &self.temps,
        );
        let stmt = converter
            .convert_statement(statement)
            .unwrap_or_else(|err| panic!("conversion failed: {err}"));
        let imports = converter.into_extra_imports().into_iter().collect();
        (CsPrinter::emit_stmt_to_string(&stmt), imports)
    }

    /// Convert `If condition Then`.
    pub fn convert_if(&mut self, condition: NodeIndex) -> String {
        let statement = self.if_stmt(condition);
        self.convert(statement)
    }

    /// Convert `res = value`, declaring `res` as `Boolean?`.
    pub fn convert_assignment(&mut self, value: NodeIndex) -> String {
        if !self.names.contains_key("res") {
            self.local("res", TypeId::NULLABLE_BOOLEAN);
        }
        let statement = self.assign("res", value);
        self.convert(statement)
    }
}

/// Locals shared by most scenarios: `a`, `b` (`Boolean?`), `x`,
/// `y` (`Integer?`), `c` (`Boolean`).
pub fn scenario() -> TestContext {
    let mut ctx = TestContext::new();
    ctx.local("a", TypeId::NULLABLE_BOOLEAN);
    ctx.local("b", TypeId::NULLABLE_BOOLEAN);
    ctx.local("x", TypeId::NULLABLE_INTEGER);
    ctx.local("y", TypeId::NULLABLE_INTEGER);
    ctx.local("c", TypeId::BOOLEAN);
    ctx
}
