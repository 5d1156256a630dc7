//! Precedence-aware printer for the C# IR.
//!
//! Parentheses are never stored in the IR. Each child is printed at the
//! precedence its slot requires and wrapped only when the child binds looser.

use super::ir::{CsBinaryOperator, CsExpr, CsPattern, CsStmt, CsUnaryOperator};

/// C# operator precedence levels, loosest first.
mod prec {
    pub const CONDITIONAL: u8 = 3;
    pub const LOGICAL_OR: u8 = 5;
    pub const LOGICAL_AND: u8 = 6;
    pub const BITWISE_OR: u8 = 7;
    pub const EXCLUSIVE_OR: u8 = 8;
    pub const BITWISE_AND: u8 = 9;
    pub const EQUALITY: u8 = 10;
    /// Relational comparisons and type testing (`is`).
    pub const RELATIONAL: u8 = 11;
    pub const ADDITIVE: u8 = 13;
    pub const MULTIPLICATIVE: u8 = 14;
    pub const UNARY: u8 = 15;
    pub const PRIMARY: u8 = 16;
}

fn binary_precedence(operator: CsBinaryOperator) -> u8 {
    match operator {
        CsBinaryOperator::LogicalOr => prec::LOGICAL_OR,
        CsBinaryOperator::LogicalAnd => prec::LOGICAL_AND,
        CsBinaryOperator::BitwiseOr => prec::BITWISE_OR,
        CsBinaryOperator::ExclusiveOr => prec::EXCLUSIVE_OR,
        CsBinaryOperator::BitwiseAnd => prec::BITWISE_AND,
        CsBinaryOperator::Equals | CsBinaryOperator::NotEquals => prec::EQUALITY,
        CsBinaryOperator::LessThan
        | CsBinaryOperator::LessThanOrEqual
        | CsBinaryOperator::GreaterThan
        | CsBinaryOperator::GreaterThanOrEqual => prec::RELATIONAL,
        CsBinaryOperator::Add | CsBinaryOperator::Subtract => prec::ADDITIVE,
        CsBinaryOperator::Multiply | CsBinaryOperator::Divide | CsBinaryOperator::Modulo => {
            prec::MULTIPLICATIVE
        }
    }
}

/// Precedence of the operator at the root of `expr`.
pub fn precedence(expr: &CsExpr) -> u8 {
    match expr {
        CsExpr::Binary { operator, .. } => binary_precedence(*operator),
        CsExpr::Conditional { .. } => prec::CONDITIONAL,
        CsExpr::IsPattern { .. } => prec::RELATIONAL,
        CsExpr::Prefix { .. } | CsExpr::Cast { .. } => prec::UNARY,
        // Only valid inside argument lists, never nested in an operator.
        CsExpr::NamedArgument { .. } => 0,
        _ => prec::PRIMARY,
    }
}

#[derive(Default)]
pub struct CsPrinter {
    output: String,
}

impl CsPrinter {
    pub fn new() -> Self {
        CsPrinter::default()
    }

    /// Print a single expression.
    pub fn emit_to_string(expr: &CsExpr) -> String {
        let mut printer = CsPrinter::new();
        printer.emit_expr(expr);
        printer.output
    }

    /// Print a statement header, e.g. `if (a == true)` or `return x;`.
    pub fn emit_stmt_to_string(stmt: &CsStmt) -> String {
        let mut printer = CsPrinter::new();
        printer.emit_stmt(stmt);
        printer.output
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    pub fn emit_stmt(&mut self, stmt: &CsStmt) {
        match stmt {
            CsStmt::If(condition) => self.emit_header("if", condition),
            CsStmt::ElseIf(condition) => self.emit_header("else if", condition),
            CsStmt::While(condition) => self.emit_header("while", condition),
            CsStmt::DoWhile(condition) => {
                self.emit_header("while", condition);
                self.write(";");
            }
            CsStmt::Return(None) => self.write("return;"),
            CsStmt::Return(Some(expr)) => {
                self.write("return ");
                self.emit_expr(expr);
                self.write(";");
            }
            CsStmt::LocalDeclaration { name, initializer } => {
                self.write("var ");
                self.write(name);
                if let Some(init) = initializer {
                    self.write(" = ");
                    self.emit_expr(init);
                }
                self.write(";");
            }
            CsStmt::Assignment { target, value } => {
                self.emit_expr(target);
                self.write(" = ");
                self.emit_expr(value);
                self.write(";");
            }
            CsStmt::Expression(expr) => {
                self.emit_expr(expr);
                self.write(";");
            }
        }
    }

    fn emit_header(&mut self, keyword: &str, condition: &CsExpr) {
        self.write(keyword);
        self.write(" (");
        self.emit_expr(condition);
        self.write(")");
    }

    pub fn emit_expr(&mut self, expr: &CsExpr) {
        match expr {
            CsExpr::Identifier(name) => self.write(name),
            CsExpr::This => self.write("this"),
            CsExpr::Base => self.write("base"),
            CsExpr::NullLiteral => self.write("null"),
            CsExpr::BooleanLiteral(true) => self.write("true"),
            CsExpr::BooleanLiteral(false) => self.write("false"),
            CsExpr::NumericLiteral(text) => self.write(text),
            CsExpr::StringLiteral(text) => self.emit_string_literal(text),
            CsExpr::MemberAccess { object, member } => {
                self.emit_operand(object, prec::PRIMARY);
                self.write(".");
                self.write(member);
            }
            CsExpr::ConditionalAccess { object, member } => {
                self.emit_operand(object, prec::PRIMARY);
                self.write("?.");
                self.write(member);
            }
            CsExpr::ElementAccess { object, index } => {
                self.emit_operand(object, prec::PRIMARY);
                self.write("[");
                self.emit_expr(index);
                self.write("]");
            }
            CsExpr::Call { callee, arguments } => {
                self.emit_operand(callee, prec::PRIMARY);
                self.emit_arguments(arguments);
            }
            CsExpr::NamedArgument { name, expression } => {
                self.write(name);
                self.write(": ");
                self.emit_expr(expression);
            }
            CsExpr::New {
                type_name,
                arguments,
            } => {
                self.write("new ");
                self.write(type_name);
                self.emit_arguments(arguments);
            }
            CsExpr::AnonymousObject { members } => {
                if members.is_empty() {
                    self.write("new { }");
                    return;
                }
                self.write("new { ");
                for (i, (name, value)) in members.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(name) = name {
                        self.write(name);
                        self.write(" = ");
                    }
                    self.emit_expr(value);
                }
                self.write(" }");
            }
            CsExpr::Binary {
                left,
                operator,
                right,
            } => {
                let p = binary_precedence(*operator);
                // Left-associative: an equal-precedence left child needs no
                // parentheses, an equal-precedence right child does.
                self.emit_operand(left, p);
                self.write(" ");
                self.write(operator.text());
                self.write(" ");
                self.emit_operand(right, p + 1);
            }
            CsExpr::Prefix { operator, operand } => {
                self.write(operator.text());
                // `- -x` must not print as `--x`
                let doubled = matches!(
                    (operator, operand.as_ref()),
                    (
                        CsUnaryOperator::Minus,
                        CsExpr::Prefix {
                            operator: CsUnaryOperator::Minus,
                            ..
                        }
                    ) | (
                        CsUnaryOperator::Plus,
                        CsExpr::Prefix {
                            operator: CsUnaryOperator::Plus,
                            ..
                        }
                    )
                );
                if doubled {
                    self.write(" ");
                }
                self.emit_operand(operand, prec::UNARY);
            }
            CsExpr::Cast {
                type_name,
                expression,
            } => {
                self.write("(");
                self.write(type_name);
                self.write(")");
                self.emit_operand(expression, prec::UNARY);
            }
            CsExpr::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.emit_operand(condition, prec::CONDITIONAL + 1);
                self.write(" ? ");
                self.emit_operand(when_true, prec::CONDITIONAL);
                self.write(" : ");
                self.emit_operand(when_false, prec::CONDITIONAL);
            }
            CsExpr::IsPattern {
                expression,
                pattern,
            } => {
                self.emit_operand(expression, prec::RELATIONAL);
                self.write(" is ");
                self.emit_pattern(pattern);
            }
        }
    }

    /// Emit `expr`, parenthesized when it binds looser than `min_precedence`.
    fn emit_operand(&mut self, expr: &CsExpr, min_precedence: u8) {
        if precedence(expr) < min_precedence {
            self.write("(");
            self.emit_expr(expr);
            self.write(")");
        } else {
            self.emit_expr(expr);
        }
    }

    fn emit_arguments(&mut self, arguments: &[CsExpr]) {
        self.write("(");
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(arg);
        }
        self.write(")");
    }

    fn emit_pattern(&mut self, pattern: &CsPattern) {
        match pattern {
            CsPattern::Var(name) => {
                self.write("var ");
                self.write(name);
            }
            CsPattern::NotNullObject(None) => self.write("{ }"),
            CsPattern::NotNullObject(Some(name)) => {
                self.write("{ } ");
                self.write(name);
            }
            CsPattern::Null => self.write("null"),
            CsPattern::Type(name) => self.write(name),
            CsPattern::Not(inner) => {
                self.write("not ");
                self.emit_pattern(inner);
            }
        }
    }

    fn emit_string_literal(&mut self, text: &str) {
        self.output.push('"');
        for ch in text.chars() {
            match ch {
                '"' => self.write("\\\""),
                '\\' => self.write("\\\\"),
                '\n' => self.write("\\n"),
                '\r' => self.write("\\r"),
                '\t' => self.write("\\t"),
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }
}
