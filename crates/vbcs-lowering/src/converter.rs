//! Reference conversion driver.
//!
//! `ExpressionConverter` walks a statement top down, keeping an explicit
//! [`AncestorPath`]. At every expression slot it first asks the
//! [`SyntaxExpander`] whether the node should be qualified, then converts the
//! (possibly replaced) node to [`CsExpr`]. Binary expressions go through
//! [`NullableLogicLowering`] once both operands are converted.
//!
//! The driver owns no state beyond one statement's traversal; the temp-name
//! counter and the collected imports belong to the caller's session.

use crate::nullable::{LoweredExpr, NullableLogicLowering, is_supported};
use crate::qualify::{ExpansionDecision, SyntaxExpander};
use crate::temp_names::TempNames;
use indexmap::IndexSet;
use tracing::{debug, trace};
use vbcs_common::limits::MAX_CONVERSION_DEPTH;
use vbcs_common::{ConversionError, LoweringOptions};
use vbcs_semantic::SemanticOracle;
use vbcs_syntax::{
    AncestorPath, BinaryOperator, ConditionKind, CsBinaryOperator, CsExpr, CsPattern, CsStmt,
    CsUnaryOperator, InstanceKind, LiteralValue, MemberAccessKind, NodeArena, NodeData, NodeIndex,
    PathEntry, UnaryOperator,
};

type Result<T> = std::result::Result<T, ConversionError>;

pub struct ExpressionConverter<'a> {
    arena: &'a mut NodeArena,
    oracle: &'a dyn SemanticOracle,
    options: &'a LoweringOptions,
    expander: &'a dyn SyntaxExpander,
    temps: &'a TempNames,
    /// Static imports requested by qualified module members, in first-seen order.
    extra_imports: IndexSet<String>,
    path: AncestorPath,
}

impl<'a> ExpressionConverter<'a> {
    pub fn new(
        arena: &'a mut NodeArena,
        oracle: &'a dyn SemanticOracle,
        options: &'a LoweringOptions,
        expander: &'a dyn SyntaxExpander,
        temps: &'a TempNames,
    ) -> Self {
        ExpressionConverter {
            arena,
            oracle,
            options,
            expander,
            temps,
            extra_imports: IndexSet::new(),
            path: AncestorPath::new(),
        }
    }

    pub fn extra_imports(&self) -> &IndexSet<String> {
        &self.extra_imports
    }

    pub fn into_extra_imports(self) -> IndexSet<String> {
        self.extra_imports
    }

    /// Convert a statement. Only the statement's expression slots are
    /// rewritten; bodies belong to the caller.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn convert_statement(&mut self, statement: NodeIndex) -> Result<CsStmt> {
        let data = self.node_data(statement)?;
        if !data.is_statement() {
            return Err(ConversionError::ExpectedStatement {
                kind: data.kind_name(),
                pos: self.arena.pos(statement),
            });
        }

        let entry = PathEntry::new(statement);
        self.path = AncestorPath::new();
        let stmt = match data {
            NodeData::Condition { kind, condition } => {
                let lowered = self.convert_child(entry, condition)?;
                let expr = self.collapse_condition(condition, lowered);
                match kind {
                    ConditionKind::If | ConditionKind::SingleLineIf => CsStmt::If(expr),
                    ConditionKind::ElseIf => CsStmt::ElseIf(expr),
                    ConditionKind::While => CsStmt::While(expr),
                    ConditionKind::DoLoop => CsStmt::DoWhile(expr),
                }
            }
            NodeData::Return { expression } if expression.is_none() => CsStmt::Return(None),
            NodeData::Return { expression } => {
                CsStmt::Return(Some(self.convert_child(entry, expression)?.expr))
            }
            NodeData::LocalDeclaration { name, initializer } => {
                let initializer = if initializer.is_none() {
                    None
                } else {
                    Some(self.convert_child(entry, initializer)?.expr)
                };
                CsStmt::LocalDeclaration { name, initializer }
            }
            NodeData::Assignment { target, value } => {
                let target = self.convert_child(entry, target)?.expr;
                let value = self.convert_child(entry, value)?.expr;
                CsStmt::Assignment { target, value }
            }
            NodeData::ExpressionStatement { expression } => {
                CsStmt::Expression(self.convert_child(entry, expression)?.expr)
            }
            other => {
                return Err(ConversionError::ExpectedStatement {
                    kind: other.kind_name(),
                    pos: self.arena.pos(statement),
                });
            }
        };
        Ok(stmt)
    }

    /// Convert a free-standing expression with an empty ancestor path.
    pub fn convert_expression(&mut self, expression: NodeIndex) -> Result<LoweredExpr> {
        self.path = AncestorPath::new();
        self.convert_slot(expression, true)
    }

    /// A nullable boolean left in a condition is compared with `true`; C#
    /// conditions do not accept `bool?`.
    fn collapse_condition(&self, condition: NodeIndex, lowered: LoweredExpr) -> CsExpr {
        let types = self.oracle.types();
        let nullable_boolean = self
            .oracle
            .type_info(self.arena.original(condition))
            .converted_type
            .is_some_and(|ty| types.is_nullable(ty) && types.is_boolean_or_nullable_boolean(ty));
        if nullable_boolean && !lowered.proven_not_null {
            lowered.expr.equals_true()
        } else {
            lowered.expr
        }
    }

    fn node_data(&self, index: NodeIndex) -> Result<NodeData> {
        self.arena
            .data(index)
            .cloned()
            .ok_or(ConversionError::MissingNode { index: index.0 })
    }

    /// Convert `slot` as a child of `parent`, with qualification enabled.
    fn convert_child(&mut self, parent: PathEntry, slot: NodeIndex) -> Result<LoweredExpr> {
        self.convert_child_with(parent, slot, true)
    }

    fn convert_child_with(
        &mut self,
        parent: PathEntry,
        slot: NodeIndex,
        qualify: bool,
    ) -> Result<LoweredExpr> {
        self.path.push(parent);
        let result = self.convert_slot(slot, qualify);
        self.path.pop();
        result
    }

    /// Run the qualification hook on the node in `slot`, then convert the
    /// node it settles on. The path holds the ancestors of `slot`.
    fn convert_slot(&mut self, slot: NodeIndex, qualify: bool) -> Result<LoweredExpr> {
        if self.arena.get(slot).is_none() {
            return Err(ConversionError::MissingNode { index: slot.0 });
        }
        if self.path.depth() as u32 >= MAX_CONVERSION_DEPTH {
            return Err(ConversionError::TooDeep {
                limit: MAX_CONVERSION_DEPTH,
                pos: self.arena.pos(slot),
            });
        }

        let (effective, qualify_children) = if qualify && self.options.qualify_names {
            match self
                .expander
                .decide(self.arena, self.oracle, slot, &self.path)
            {
                ExpansionDecision::UseDefault => (slot, true),
                ExpansionDecision::Skip => {
                    trace!(node = slot.0, "qualification skipped below node");
                    (slot, false)
                }
                ExpansionDecision::Custom(expansion) => {
                    if let Some(import) = expansion.extra_import {
                        self.extra_imports.insert(import);
                    }
                    if expansion.node != slot {
                        debug!(
                            from = self.arena.kind_name(slot),
                            to = self.arena.kind_name(expansion.node),
                            "node replaced by qualification"
                        );
                    }
                    (expansion.node, false)
                }
                ExpansionDecision::Rewrite(expansion) => {
                    if let Some(import) = expansion.extra_import {
                        self.extra_imports.insert(import);
                    }
                    debug!(
                        from = self.arena.kind_name(slot),
                        "node rewritten, qualifying its children"
                    );
                    (expansion.node, true)
                }
            }
        } else {
            (slot, false)
        };

        self.convert_node(PathEntry::replaced(slot, effective), qualify_children)
    }

    fn convert_node(&mut self, entry: PathEntry, qualify: bool) -> Result<LoweredExpr> {
        let node = entry.effective;
        let data = self.node_data(node)?;
        let lowered = match data {
            NodeData::Identifier { text } => LoweredExpr::new(CsExpr::Identifier(text)),
            NodeData::Literal(value) => LoweredExpr::new(convert_literal(value)),
            NodeData::Instance(InstanceKind::MyBase) => LoweredExpr::not_null(CsExpr::Base),
            NodeData::Instance(_) => LoweredExpr::not_null(CsExpr::This),
            NodeData::Parenthesized { expression } => {
                // Parentheses are reinserted by the printer from precedence.
                self.convert_child_with(entry, expression, qualify)?
            }
            NodeData::MemberAccess {
                expression,
                name,
                kind,
            } => {
                let object = self.convert_child_with(entry, expression, qualify)?.expr;
                let name = self.name_text(name)?;
                match kind {
                    MemberAccessKind::Simple => LoweredExpr::new(object.member(name)),
                    MemberAccessKind::Dictionary => LoweredExpr::new(CsExpr::ElementAccess {
                        object: Box::new(object),
                        index: Box::new(CsExpr::StringLiteral(name)),
                    }),
                }
            }
            NodeData::ConditionalAccess { expression, name } => {
                let object = self.convert_child_with(entry, expression, qualify)?.expr;
                LoweredExpr::new(CsExpr::ConditionalAccess {
                    object: Box::new(object),
                    member: self.name_text(name)?,
                })
            }
            NodeData::Invocation {
                expression,
                arguments,
            } => {
                let callee = self.convert_child_with(entry, expression, qualify)?.expr;
                let arguments = self.convert_list(entry, &arguments, qualify)?;
                LoweredExpr::new(CsExpr::call(callee, arguments))
            }
            NodeData::NamedArgument { name, expression } => {
                let value = self.convert_child_with(entry, expression, qualify)?.expr;
                LoweredExpr::new(CsExpr::NamedArgument {
                    name: self.name_text(name)?,
                    expression: Box::new(value),
                })
            }
            NodeData::ObjectCreation {
                type_name,
                arguments,
            } => {
                let arguments = self.convert_list(entry, &arguments, qualify)?;
                LoweredExpr::not_null(CsExpr::New {
                    type_name,
                    arguments,
                })
            }
            NodeData::AnonymousObjectCreation { initializers } => {
                let mut members = Vec::with_capacity(initializers.len());
                for initializer in initializers {
                    self.path.push(entry);
                    let member = self.convert_initializer(initializer, qualify);
                    self.path.pop();
                    members.push(member?);
                }
                LoweredExpr::not_null(CsExpr::AnonymousObject { members })
            }
            NodeData::Unary { operator, operand } => {
                let converted = self.convert_child_with(entry, operand, qualify)?;
                self.convert_unary(operator, operand, converted)
            }
            NodeData::TypeOfIs {
                expression,
                type_name,
                negated,
            } => {
                let expr = self.convert_child_with(entry, expression, qualify)?.expr;
                let pattern = CsPattern::Type(type_name);
                let pattern = if negated {
                    CsPattern::Not(Box::new(pattern))
                } else {
                    pattern
                };
                LoweredExpr::not_null(expr.is_pattern(pattern))
            }
            NodeData::Ternary {
                condition,
                when_true,
                when_false,
            } => {
                let condition = self.convert_child_with(entry, condition, qualify)?;
                let condition = self.collapse_condition_operand(entry, condition);
                let when_true = self.convert_child_with(entry, when_true, qualify)?;
                let when_false = self.convert_child_with(entry, when_false, qualify)?;
                LoweredExpr {
                    expr: CsExpr::conditional(condition, when_true.expr, when_false.expr),
                    proven_not_null: when_true.proven_not_null && when_false.proven_not_null,
                }
            }
            NodeData::Binary {
                left,
                operator,
                right,
            } => self.convert_binary(entry, left, operator, right, qualify)?,
            other => {
                return Err(ConversionError::ExpectedExpression {
                    kind: other.kind_name(),
                    pos: self.arena.pos(node),
                });
            }
        };
        Ok(lowered)
    }

    fn convert_list(
        &mut self,
        parent: PathEntry,
        slots: &[NodeIndex],
        qualify: bool,
    ) -> Result<Vec<CsExpr>> {
        slots
            .iter()
            .map(|slot| Ok(self.convert_child_with(parent, *slot, qualify)?.expr))
            .collect()
    }

    /// One member of `New With { }`. The path already ends at the creation.
    fn convert_initializer(
        &mut self,
        initializer: NodeIndex,
        qualify: bool,
    ) -> Result<(Option<String>, CsExpr)> {
        let entry = PathEntry::new(initializer);
        match self.node_data(initializer)? {
            NodeData::NamedFieldInitializer { name, expression } => {
                let value = self.convert_child_with(entry, expression, qualify)?.expr;
                Ok((Some(self.name_text(name)?), value))
            }
            NodeData::InferredFieldInitializer { expression } => {
                let value = self.convert_child_with(entry, expression, qualify)?.expr;
                Ok((None, value))
            }
            other => Err(ConversionError::ExpectedExpression {
                kind: other.kind_name(),
                pos: self.arena.pos(initializer),
            }),
        }
    }

    /// Ternary conditions are condition positions too.
    fn collapse_condition_operand(&self, parent: PathEntry, condition: LoweredExpr) -> CsExpr {
        match self.arena.data(parent.effective) {
            Some(NodeData::Ternary { condition: slot, .. }) => {
                self.collapse_condition(*slot, condition)
            }
            _ => condition.expr,
        }
    }

    fn convert_unary(
        &self,
        operator: UnaryOperator,
        operand: NodeIndex,
        converted: LoweredExpr,
    ) -> LoweredExpr {
        let cs_operator = match operator {
            UnaryOperator::Not => {
                let types = self.oracle.types();
                let boolean = self
                    .oracle
                    .type_info(self.arena.original(operand))
                    .ty
                    .is_some_and(|ty| types.is_boolean_or_nullable_boolean(ty));
                if boolean {
                    CsUnaryOperator::LogicalNot
                } else {
                    CsUnaryOperator::BitwiseNot
                }
            }
            UnaryOperator::Minus => CsUnaryOperator::Minus,
            UnaryOperator::Plus => CsUnaryOperator::Plus,
        };
        LoweredExpr {
            expr: CsExpr::Prefix {
                operator: cs_operator,
                operand: Box::new(converted.expr),
            },
            proven_not_null: converted.proven_not_null,
        }
    }

    fn convert_binary(
        &mut self,
        entry: PathEntry,
        left: NodeIndex,
        operator: BinaryOperator,
        right: NodeIndex,
        qualify: bool,
    ) -> Result<LoweredExpr> {
        if matches!(operator, BinaryOperator::Is | BinaryOperator::IsNot) {
            if let Some(operand) = self.compared_with_nothing(left, right) {
                let expr = self.convert_child_with(entry, operand, qualify)?.expr;
                let pattern = if operator == BinaryOperator::Is {
                    CsPattern::Null
                } else {
                    CsPattern::Not(Box::new(CsPattern::Null))
                };
                return Ok(LoweredExpr::not_null(expr.is_pattern(pattern)));
            }
        }

        let lhs = self.convert_child_with(entry, left, qualify)?;
        let rhs = self.convert_child_with(entry, right, qualify)?;
        let cs_operator = convert_operator(operator);
        let default = CsExpr::bin(lhs.expr.clone(), cs_operator, rhs.expr.clone());

        if !self.options.lower_nullable_logic || !is_supported(operator) {
            return Ok(LoweredExpr::new(default));
        }
        let lhs_type = self.oracle.type_info(self.arena.original(left));
        let rhs_type = self.oracle.type_info(self.arena.original(right));
        let lowering = NullableLogicLowering::new(self.arena, self.oracle, self.temps, self.options);
        Ok(lowering.lower_binary(&entry, &self.path, lhs_type, rhs_type, default, lhs, rhs))
    }

    /// The operand of `x Is Nothing` / `Nothing IsNot x`, if either side is `Nothing`.
    fn compared_with_nothing(&self, left: NodeIndex, right: NodeIndex) -> Option<NodeIndex> {
        let is_nothing = |node: NodeIndex| {
            matches!(
                self.arena.data(self.arena.skip_into_parens(node)),
                Some(NodeData::Literal(LiteralValue::Nothing))
            )
        };
        if is_nothing(right) {
            Some(left)
        } else if is_nothing(left) {
            Some(right)
        } else {
            None
        }
    }

    fn name_text(&self, name: NodeIndex) -> Result<String> {
        match self.arena.data(name) {
            Some(NodeData::Identifier { text }) => Ok(text.clone()),
            Some(other) => Err(ConversionError::ExpectedExpression {
                kind: other.kind_name(),
                pos: self.arena.pos(name),
            }),
            None => Err(ConversionError::MissingNode { index: name.0 }),
        }
    }
}

fn convert_literal(value: LiteralValue) -> CsExpr {
    match value {
        LiteralValue::Boolean(value) => CsExpr::BooleanLiteral(value),
        LiteralValue::Numeric(text) => CsExpr::NumericLiteral(text),
        LiteralValue::String(text) => CsExpr::StringLiteral(text),
        LiteralValue::Nothing => CsExpr::NullLiteral,
    }
}

/// Target operator for a source operator. `Is`/`IsNot` between two
/// references become reference equality.
pub fn convert_operator(operator: BinaryOperator) -> CsBinaryOperator {
    match operator {
        BinaryOperator::AndAlso => CsBinaryOperator::LogicalAnd,
        BinaryOperator::OrElse => CsBinaryOperator::LogicalOr,
        BinaryOperator::And => CsBinaryOperator::BitwiseAnd,
        BinaryOperator::Or => CsBinaryOperator::BitwiseOr,
        BinaryOperator::Xor => CsBinaryOperator::ExclusiveOr,
        BinaryOperator::Equals | BinaryOperator::Is => CsBinaryOperator::Equals,
        BinaryOperator::NotEquals | BinaryOperator::IsNot => CsBinaryOperator::NotEquals,
        BinaryOperator::LessThan => CsBinaryOperator::LessThan,
        BinaryOperator::LessThanOrEqual => CsBinaryOperator::LessThanOrEqual,
        BinaryOperator::GreaterThan => CsBinaryOperator::GreaterThan,
        BinaryOperator::GreaterThanOrEqual => CsBinaryOperator::GreaterThanOrEqual,
        BinaryOperator::Add | BinaryOperator::Concatenate => CsBinaryOperator::Add,
        BinaryOperator::Subtract => CsBinaryOperator::Subtract,
        BinaryOperator::Multiply => CsBinaryOperator::Multiply,
        BinaryOperator::Divide | BinaryOperator::IntegerDivide => CsBinaryOperator::Divide,
        BinaryOperator::Modulo => CsBinaryOperator::Modulo,
    }
}
