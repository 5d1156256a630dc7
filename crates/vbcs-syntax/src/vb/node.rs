//! Visual Basic source nodes.
//!
//! Each node is a small header (`range`, `leading_trivia`, `origin`) plus a
//! closed [`NodeData`] variant carrying only the fields that kind needs.
//! Children are referenced by [`NodeIndex`] into the owning arena.


/// Index of a node in a [`super::NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Absent child (e.g. `Return` without a value, a synthesized node's origin).
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

/// Source range (character offsets), used for diagnostics and for asking the
/// oracle which symbol encloses a position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextRange {
    pub pos: u32,
    pub end: u32,
}

impl TextRange {
    pub fn new(pos: u32, end: u32) -> Self {
        TextRange { pos, end }
    }

    pub fn contains(&self, position: u32) -> bool {
        self.pos <= position && position < self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    AndAlso,
    OrElse,
    /// Eager `And`: both operands are always evaluated.
    And,
    /// Eager `Or`: both operands are always evaluated.
    Or,
    Xor,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Is,
    IsNot,
    Add,
    Subtract,
    Multiply,
    Divide,
    IntegerDivide,
    Modulo,
    Concatenate,
}

impl BinaryOperator {
    pub fn text(self) -> &'static str {
        match self {
            BinaryOperator::AndAlso => "AndAlso",
            BinaryOperator::OrElse => "OrElse",
            BinaryOperator::And => "And",
            BinaryOperator::Or => "Or",
            BinaryOperator::Xor => "Xor",
            BinaryOperator::Equals => "=",
            BinaryOperator::NotEquals => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::Is => "Is",
            BinaryOperator::IsNot => "IsNot",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::IntegerDivide => "\\",
            BinaryOperator::Modulo => "Mod",
            BinaryOperator::Concatenate => "&",
        }
    }

    /// `<`, `<=`, `>`, `>=`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }

    /// Equality and ordering comparisons.
    pub fn is_relational(self) -> bool {
        self.is_ordering() || matches!(self, BinaryOperator::Equals | BinaryOperator::NotEquals)
    }

    pub fn is_and(self) -> bool {
        matches!(self, BinaryOperator::AndAlso | BinaryOperator::And)
    }

    pub fn is_or(self) -> bool {
        matches!(self, BinaryOperator::OrElse | BinaryOperator::Or)
    }

    /// The short-circuiting counterpart of an eager logical operator.
    pub fn short_circuit_form(self) -> Option<BinaryOperator> {
        match self {
            BinaryOperator::And => Some(BinaryOperator::AndAlso),
            BinaryOperator::Or => Some(BinaryOperator::OrElse),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
    Plus,
}

/// `Me`, `MyBase` and `MyClass`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceKind {
    Me,
    MyBase,
    MyClass,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LiteralValue {
    Boolean(bool),
    Numeric(String),
    String(String),
    Nothing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberAccessKind {
    /// `a.b`
    Simple,
    /// `a!b`, sugar for the default indexer `a("b")`.
    Dictionary,
}

/// Statements that own a condition slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionKind {
    If,
    ElseIf,
    SingleLineIf,
    While,
    DoLoop,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub range: TextRange,
    /// Whitespace and comments preceding the node.
    pub leading_trivia: String,
    /// For synthesized nodes, the node this one replaces. `NONE` for parsed nodes.
    pub origin: NodeIndex,
    pub data: NodeData,
}

#[derive(Clone, Debug)]
pub enum NodeData {
    // =========================================================================
    // Expressions
    // =========================================================================
    Identifier {
        text: String,
    },
    MemberAccess {
        expression: NodeIndex,
        /// Always an `Identifier`.
        name: NodeIndex,
        kind: MemberAccessKind,
    },
    /// `expression?.name`
    ConditionalAccess {
        expression: NodeIndex,
        name: NodeIndex,
    },
    Binary {
        left: NodeIndex,
        operator: BinaryOperator,
        right: NodeIndex,
    },
    Unary {
        operator: UnaryOperator,
        operand: NodeIndex,
    },
    Literal(LiteralValue),
    Parenthesized {
        expression: NodeIndex,
    },
    Invocation {
        expression: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
    /// `name:=expression` inside an argument list.
    NamedArgument {
        name: NodeIndex,
        expression: NodeIndex,
    },
    /// `New TypeName(arguments)`
    ObjectCreation {
        type_name: String,
        arguments: Vec<NodeIndex>,
    },
    /// `New With { .A = 1, b }`
    AnonymousObjectCreation {
        initializers: Vec<NodeIndex>,
    },
    /// `.name = expression` inside `New With { }`
    NamedFieldInitializer {
        name: NodeIndex,
        expression: NodeIndex,
    },
    /// `expression` inside `New With { }`, the field name is inferred.
    InferredFieldInitializer {
        expression: NodeIndex,
    },
    Instance(InstanceKind),
    /// `TypeOf expression Is TypeName` / `TypeOf expression IsNot TypeName`
    TypeOfIs {
        expression: NodeIndex,
        type_name: String,
        negated: bool,
    },
    /// `If(condition, when_true, when_false)`
    Ternary {
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    },

    // =========================================================================
    // Statements (only their expression slots matter to the converter)
    // =========================================================================
    Condition {
        kind: ConditionKind,
        condition: NodeIndex,
    },
    Return {
        expression: NodeIndex,
    },
    LocalDeclaration {
        name: String,
        initializer: NodeIndex,
    },
    Assignment {
        target: NodeIndex,
        value: NodeIndex,
    },
    ExpressionStatement {
        expression: NodeIndex,
    },
}

impl NodeData {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeData::Identifier { .. } => "Identifier",
            NodeData::MemberAccess { .. } => "MemberAccess",
            NodeData::ConditionalAccess { .. } => "ConditionalAccess",
            NodeData::Binary { .. } => "Binary",
            NodeData::Unary { .. } => "Unary",
            NodeData::Literal(_) => "Literal",
            NodeData::Parenthesized { .. } => "Parenthesized",
            NodeData::Invocation { .. } => "Invocation",
            NodeData::NamedArgument { .. } => "NamedArgument",
            NodeData::ObjectCreation { .. } => "ObjectCreation",
            NodeData::AnonymousObjectCreation { .. } => "AnonymousObjectCreation",
            NodeData::NamedFieldInitializer { .. } => "NamedFieldInitializer",
            NodeData::InferredFieldInitializer { .. } => "InferredFieldInitializer",
            NodeData::Instance(_) => "Instance",
            NodeData::TypeOfIs { .. } => "TypeOfIs",
            NodeData::Ternary { .. } => "Ternary",
            NodeData::Condition { .. } => "Condition",
            NodeData::Return { .. } => "Return",
            NodeData::LocalDeclaration { .. } => "LocalDeclaration",
            NodeData::Assignment { .. } => "Assignment",
            NodeData::ExpressionStatement { .. } => "ExpressionStatement",
        }
    }

    /// True for nodes that produce a value.
    ///
    /// Argument and initializer wrappers are not expressions, matching the
    /// host grammar where they are separate syntax categories.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeData::Identifier { .. }
                | NodeData::MemberAccess { .. }
                | NodeData::ConditionalAccess { .. }
                | NodeData::Binary { .. }
                | NodeData::Unary { .. }
                | NodeData::Literal(_)
                | NodeData::Parenthesized { .. }
                | NodeData::Invocation { .. }
                | NodeData::ObjectCreation { .. }
                | NodeData::AnonymousObjectCreation { .. }
                | NodeData::Instance(_)
                | NodeData::TypeOfIs { .. }
                | NodeData::Ternary { .. }
        )
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeData::Condition { .. }
                | NodeData::Return { .. }
                | NodeData::LocalDeclaration { .. }
                | NodeData::Assignment { .. }
                | NodeData::ExpressionStatement { .. }
        )
    }

    /// Simple names are the nodes the host grammar calls `SimpleNameSyntax`.
    pub fn is_simple_name(&self) -> bool {
        matches!(self, NodeData::Identifier { .. })
    }
}
