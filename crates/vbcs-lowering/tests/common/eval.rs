//! Reference evaluator for converted C# expressions.
//!
//! Follows the C# rules for lifted operators on `bool?` and `int?`: `&` and
//! `|` are three-valued, `==` treats two nulls as equal, ordering comparisons
//! with a null operand are false and `!` keeps null. Shapes C# rejects, such
//! as a null `&&` operand or a null conditional test, panic.

use std::collections::BTreeMap;
use vbcs_syntax::{CsBinaryOperator, CsExpr, CsPattern, CsStmt, CsUnaryOperator};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
}

impl Value {
    fn truth(self, position: &str) -> bool {
        match self {
            Value::Bool(value) => value,
            other => panic!("{position} needs a bool, got {other:?}"),
        }
    }
}

/// Locals, parameterless functions and a count of calls made to each.
#[derive(Debug, Default)]
pub struct Evaluator {
    locals: BTreeMap<String, Value>,
    functions: BTreeMap<String, Value>,
    pub calls: BTreeMap<String, usize>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local(&mut self, name: &str, value: Value) {
        self.locals.insert(name.to_string(), value);
    }

    pub fn function(&mut self, name: &str, value: Value) {
        self.functions.insert(name.to_string(), value);
    }

    /// Whether the statement's condition holds.
    pub fn condition(&mut self, statement: &CsStmt) -> bool {
        match statement {
            CsStmt::If(expr)
            | CsStmt::ElseIf(expr)
            | CsStmt::While(expr)
            | CsStmt::DoWhile(expr) => self.eval(expr).truth("condition"),
            other => panic!("not a condition statement: {other:?}"),
        }
    }

    /// Value stored by an assignment statement.
    pub fn assigned(&mut self, statement: &CsStmt) -> Value {
        match statement {
            CsStmt::Assignment { value, .. } => self.eval(value),
            other => panic!("not an assignment: {other:?}"),
        }
    }

    pub fn eval(&mut self, expr: &CsExpr) -> Value {
        match expr {
            CsExpr::Identifier(name) => *self
                .locals
                .get(name)
                .unwrap_or_else(|| panic!("unbound name {name}")),
            CsExpr::NullLiteral => Value::Null,
            CsExpr::BooleanLiteral(value) => Value::Bool(*value),
            CsExpr::NumericLiteral(text) => Value::Int(
                text.parse()
                    .unwrap_or_else(|_| panic!("not an integer literal: {text}")),
            ),
            CsExpr::Cast { expression, .. } => self.eval(expression),
            CsExpr::Call { callee, arguments } => {
                let CsExpr::Identifier(name) = callee.as_ref() else {
                    panic!("unsupported callee {callee:?}");
                };
                assert!(arguments.is_empty(), "functions take no arguments");
                *self.calls.entry(name.clone()).or_default() += 1;
                *self
                    .functions
                    .get(name)
                    .unwrap_or_else(|| panic!("unknown function {name}"))
            }
            CsExpr::MemberAccess { object, member } => {
                let value = self.eval(object);
                match member.as_str() {
                    "HasValue" => Value::Bool(value != Value::Null),
                    "Value" => {
                        assert_ne!(value, Value::Null, "`.Value` read on null");
                        value
                    }
                    other => panic!("unsupported member {other}"),
                }
            }
            CsExpr::Prefix { operator, operand } => match (operator, self.eval(operand)) {
                (CsUnaryOperator::LogicalNot, Value::Null) => Value::Null,
                (CsUnaryOperator::LogicalNot, Value::Bool(value)) => Value::Bool(!value),
                (operator, value) => panic!("unsupported {operator:?} on {value:?}"),
            },
            CsExpr::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                if self.eval(condition).truth("conditional test") {
                    self.eval(when_true)
                } else {
                    self.eval(when_false)
                }
            }
            CsExpr::IsPattern {
                expression,
                pattern,
            } => {
                let value = self.eval(expression);
                Value::Bool(self.matches(value, pattern))
            }
            CsExpr::Binary {
                left,
                operator,
                right,
            } => self.binary(left, *operator, right),
            other => panic!("unsupported expression {other:?}"),
        }
    }

    fn matches(&mut self, value: Value, pattern: &CsPattern) -> bool {
        match pattern {
            CsPattern::Var(name) => {
                self.locals.insert(name.clone(), value);
                true
            }
            CsPattern::NotNullObject(name) => {
                if value == Value::Null {
                    return false;
                }
                if let Some(name) = name {
                    self.locals.insert(name.clone(), value);
                }
                true
            }
            CsPattern::Null => value == Value::Null,
            CsPattern::Not(inner) => !self.matches(value, inner),
            CsPattern::Type(name) => panic!("type pattern {name} is not evaluated"),
        }
    }

    fn binary(&mut self, left: &CsExpr, operator: CsBinaryOperator, right: &CsExpr) -> Value {
        match operator {
            CsBinaryOperator::LogicalAnd => {
                let value = self.eval(left).truth("`&&` operand") && self.eval(right).truth("`&&` operand");
                return Value::Bool(value);
            }
            CsBinaryOperator::LogicalOr => {
                let value = self.eval(left).truth("`||` operand") || self.eval(right).truth("`||` operand");
                return Value::Bool(value);
            }
            _ => {}
        }

        let lhs = self.eval(left);
        let rhs = self.eval(right);
        match operator {
            CsBinaryOperator::BitwiseAnd => match (boolean(lhs), boolean(rhs)) {
                (Some(false), _) | (_, Some(false)) => Value::Bool(false),
                (Some(true), Some(true)) => Value::Bool(true),
                _ => Value::Null,
            },
            CsBinaryOperator::BitwiseOr => match (boolean(lhs), boolean(rhs)) {
                (Some(true), _) | (_, Some(true)) => Value::Bool(true),
                (Some(false), Some(false)) => Value::Bool(false),
                _ => Value::Null,
            },
            CsBinaryOperator::ExclusiveOr => match (boolean(lhs), boolean(rhs)) {
                (Some(l), Some(r)) => Value::Bool(l ^ r),
                _ => Value::Null,
            },
            CsBinaryOperator::Equals => Value::Bool(lhs == rhs),
            CsBinaryOperator::NotEquals => Value::Bool(lhs != rhs),
            CsBinaryOperator::LessThan
            | CsBinaryOperator::LessThanOrEqual
            | CsBinaryOperator::GreaterThan
            | CsBinaryOperator::GreaterThanOrEqual => match (lhs, rhs) {
                (Value::Int(l), Value::Int(r)) => Value::Bool(match operator {
                    CsBinaryOperator::LessThan => l < r,
                    CsBinaryOperator::LessThanOrEqual => l <= r,
                    CsBinaryOperator::GreaterThan => l > r,
                    _ => l >= r,
                }),
                (Value::Null, _) | (_, Value::Null) => Value::Bool(false),
                (l, r) => panic!("cannot order {l:?} and {r:?}"),
            },
            other => panic!("unsupported operator {other:?}"),
        }
    }
}

/// `bool?` operand of a logical operator; `None` is null.
fn boolean(value: Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(value) => Some(value),
        Value::Int(_) => panic!("logical operator applied to an integer"),
    }
}
