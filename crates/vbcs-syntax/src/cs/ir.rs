//! Target IR for converted C# expressions and statements.
//!
//! The lowering passes build `CsExpr` trees instead of strings. The printer in
//! [`super::printer`] walks them and inserts parentheses from operator
//! precedence, so builders never wrap operands by hand.

/// C# binary operators produced by the converter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CsBinaryOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    ExclusiveOr,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl CsBinaryOperator {
    pub fn text(self) -> &'static str {
        match self {
            CsBinaryOperator::Equals => "==",
            CsBinaryOperator::NotEquals => "!=",
            CsBinaryOperator::LessThan => "<",
            CsBinaryOperator::LessThanOrEqual => "<=",
            CsBinaryOperator::GreaterThan => ">",
            CsBinaryOperator::GreaterThanOrEqual => ">=",
            CsBinaryOperator::LogicalAnd => "&&",
            CsBinaryOperator::LogicalOr => "||",
            CsBinaryOperator::BitwiseAnd => "&",
            CsBinaryOperator::BitwiseOr => "|",
            CsBinaryOperator::ExclusiveOr => "^",
            CsBinaryOperator::Add => "+",
            CsBinaryOperator::Subtract => "-",
            CsBinaryOperator::Multiply => "*",
            CsBinaryOperator::Divide => "/",
            CsBinaryOperator::Modulo => "%",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CsUnaryOperator {
    /// `!`
    LogicalNot,
    /// `~`
    BitwiseNot,
    Minus,
    Plus,
}

impl CsUnaryOperator {
    pub fn text(self) -> &'static str {
        match self {
            CsUnaryOperator::LogicalNot => "!",
            CsUnaryOperator::BitwiseNot => "~",
            CsUnaryOperator::Minus => "-",
            CsUnaryOperator::Plus => "+",
        }
    }
}

/// Patterns on the right of `is`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CsPattern {
    /// `var name`: always matches, binds the value.
    Var(String),
    /// `{ }` or `{ } name`: matches non-null values.
    NotNullObject(Option<String>),
    /// `null`
    Null,
    /// `TypeName`
    Type(String),
    /// `not pattern`
    Not(Box<CsPattern>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CsExpr {
    // =========================================================================
    // Literals and names
    // =========================================================================
    Identifier(String),
    This,
    Base,
    NullLiteral,
    BooleanLiteral(bool),
    NumericLiteral(String),
    StringLiteral(String),

    // =========================================================================
    // Expressions
    // =========================================================================
    /// `object.member`
    MemberAccess {
        object: Box<Self>,
        member: String,
    },
    /// `object?.member`
    ConditionalAccess {
        object: Box<Self>,
        member: String,
    },
    /// `object[index]`
    ElementAccess {
        object: Box<Self>,
        index: Box<Self>,
    },
    Call {
        callee: Box<Self>,
        arguments: Vec<Self>,
    },
    /// `name: expression` inside an argument list.
    NamedArgument {
        name: String,
        expression: Box<Self>,
    },
    /// `new TypeName(arguments)`
    New {
        type_name: String,
        arguments: Vec<Self>,
    },
    /// `new { A = 1, b }`; members without a name are inferred.
    AnonymousObject {
        members: Vec<(Option<String>, Self)>,
    },
    Binary {
        left: Box<Self>,
        operator: CsBinaryOperator,
        right: Box<Self>,
    },
    Prefix {
        operator: CsUnaryOperator,
        operand: Box<Self>,
    },
    /// `condition ? when_true : when_false`
    Conditional {
        condition: Box<Self>,
        when_true: Box<Self>,
        when_false: Box<Self>,
    },
    /// `expression is pattern`
    IsPattern {
        expression: Box<Self>,
        pattern: CsPattern,
    },
    /// `(TypeName)expression`
    Cast {
        type_name: String,
        expression: Box<Self>,
    },
}

impl CsExpr {
    pub fn id(name: impl Into<String>) -> Self {
        CsExpr::Identifier(name.into())
    }

    pub fn boolean(value: bool) -> Self {
        CsExpr::BooleanLiteral(value)
    }

    pub fn number(text: impl Into<String>) -> Self {
        CsExpr::NumericLiteral(text.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        CsExpr::StringLiteral(text.into())
    }

    /// `self.member`
    pub fn member(self, member: impl Into<String>) -> Self {
        CsExpr::MemberAccess {
            object: Box::new(self),
            member: member.into(),
        }
    }

    pub fn call(callee: Self, arguments: Vec<Self>) -> Self {
        CsExpr::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn cast(type_name: impl Into<String>, expression: Self) -> Self {
        CsExpr::Cast {
            type_name: type_name.into(),
            expression: Box::new(expression),
        }
    }

    pub fn bin(left: Self, operator: CsBinaryOperator, right: Self) -> Self {
        CsExpr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn conditional(condition: Self, when_true: Self, when_false: Self) -> Self {
        CsExpr::Conditional {
            condition: Box::new(condition),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        }
    }

    pub fn is_pattern(self, pattern: CsPattern) -> Self {
        CsExpr::IsPattern {
            expression: Box::new(self),
            pattern,
        }
    }

    /// `self && rhs`
    pub fn and(self, rhs: Self) -> Self {
        Self::bin(self, CsBinaryOperator::LogicalAnd, rhs)
    }

    /// `self || rhs`
    pub fn or(self, rhs: Self) -> Self {
        Self::bin(self, CsBinaryOperator::LogicalOr, rhs)
    }

    /// `!self`
    pub fn negate(self) -> Self {
        CsExpr::Prefix {
            operator: CsUnaryOperator::LogicalNot,
            operand: Box::new(self),
        }
    }

    /// `self.HasValue`
    pub fn has_value(self) -> Self {
        self.member("HasValue")
    }

    /// `!self.HasValue`
    pub fn has_no_value(self) -> Self {
        self.has_value().negate()
    }

    /// `self.Value`
    pub fn get_value(self) -> Self {
        self.member("Value")
    }

    /// `self == true`
    pub fn equals_true(self) -> Self {
        Self::bin(self, CsBinaryOperator::Equals, CsExpr::BooleanLiteral(true))
    }

    /// `self == false`
    pub fn equals_false(self) -> Self {
        Self::bin(self, CsBinaryOperator::Equals, CsExpr::BooleanLiteral(false))
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            CsExpr::NullLiteral
                | CsExpr::BooleanLiteral(_)
                | CsExpr::NumericLiteral(_)
                | CsExpr::StringLiteral(_)
        )
    }
}

/// Statement headers the converter emits. Bodies belong to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CsStmt {
    If(CsExpr),
    ElseIf(CsExpr),
    While(CsExpr),
    /// Trailing condition of `do { } while (condition);`
    DoWhile(CsExpr),
    Return(Option<CsExpr>),
    LocalDeclaration {
        name: String,
        initializer: Option<CsExpr>,
    },
    Assignment {
        target: CsExpr,
        value: CsExpr,
    },
    Expression(CsExpr),
}
