//! Node arena for Visual Basic source trees.
//!
//! The arena is append-only: rewrites add replacement nodes and leave the
//! original tree untouched, so analysis can always be re-run against it.

use super::node::*;

/// Arena-based storage for source nodes.
/// Nodes are stored contiguously and referenced by index.
#[derive(Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    /// Next synthetic source offset handed out by the builder methods.
    cursor: u32,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Add a node to the arena and return its index
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.cursor = self.cursor.max(node.range.end);
        self.nodes.push(node);
        NodeIndex(index)
    }

    /// Get a node by index
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|node| &node.data)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a parsed node at the next free offset.
    pub fn push(&mut self, data: NodeData) -> NodeIndex {
        let pos = self.cursor;
        self.add(Node {
            range: TextRange::new(pos, pos + 1),
            leading_trivia: String::new(),
            origin: NodeIndex::NONE,
            data,
        })
    }

    /// Add a node that replaces `origin`. It takes the origin's range so
    /// diagnostics still point at the user's code.
    pub fn synthesize(&mut self, origin: NodeIndex, data: NodeData) -> NodeIndex {
        let range = self.get(origin).map(|n| n.range).unwrap_or_default();
        self.add(Node {
            range,
            leading_trivia: String::new(),
            origin,
            data,
        })
    }

    /// Copy of `index` with `trivia` in front of its own leading trivia.
    pub fn with_prepended_trivia(&mut self, index: NodeIndex, trivia: &str) -> NodeIndex {
        let Some(node) = self.get(index) else {
            return index;
        };
        if trivia.is_empty() {
            return index;
        }
        let mut copy = node.clone();
        copy.leading_trivia = format!("{trivia}{}", node.leading_trivia);
        copy.origin = index;
        self.add(copy)
    }

    /// Copy of `index` with its leading trivia removed.
    pub fn without_trivia(&mut self, index: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(index) else {
            return index;
        };
        if node.leading_trivia.is_empty() {
            return index;
        }
        let mut copy = node.clone();
        copy.leading_trivia.clear();
        copy.origin = index;
        self.add(copy)
    }

    pub fn leading_trivia(&self, index: NodeIndex) -> &str {
        self.get(index).map_or("", |n| n.leading_trivia.as_str())
    }

    /// The parsed node a synthesized node ultimately stands for.
    pub fn original(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(node) = self.get(index) {
            if node.origin.is_none() {
                break;
            }
            index = node.origin;
        }
        index
    }

    /// Strip any number of enclosing parentheses.
    pub fn skip_into_parens(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(NodeData::Parenthesized { expression }) = self.data(index) {
            index = *expression;
        }
        index
    }

    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::Identifier { text } => Some(text),
            _ => None,
        }
    }

    pub fn binary(&self, index: NodeIndex) -> Option<(NodeIndex, BinaryOperator, NodeIndex)> {
        match self.data(index)? {
            NodeData::Binary {
                left,
                operator,
                right,
            } => Some((*left, *operator, *right)),
            _ => None,
        }
    }

    pub fn is_expression(&self, index: NodeIndex) -> bool {
        self.data(index).is_some_and(NodeData::is_expression)
    }

    pub fn kind_name(&self, index: NodeIndex) -> &'static str {
        self.data(index).map_or("<missing>", NodeData::kind_name)
    }

    pub fn pos(&self, index: NodeIndex) -> u32 {
        self.get(index).map_or(0, |n| n.range.pos)
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn identifier(&mut self, text: &str) -> NodeIndex {
        self.push(NodeData::Identifier {
            text: text.to_string(),
        })
    }

    /// `expression.name`
    pub fn member_access(&mut self, expression: NodeIndex, name: &str) -> NodeIndex {
        let name = self.identifier(name);
        self.push(NodeData::MemberAccess {
            expression,
            name,
            kind: MemberAccessKind::Simple,
        })
    }

    /// `expression!key`
    pub fn dictionary_access(&mut self, expression: NodeIndex, key: &str) -> NodeIndex {
        let name = self.identifier(key);
        self.push(NodeData::MemberAccess {
            expression,
            name,
            kind: MemberAccessKind::Dictionary,
        })
    }

    pub fn conditional_access(&mut self, expression: NodeIndex, name: &str) -> NodeIndex {
        let name = self.identifier(name);
        self.push(NodeData::ConditionalAccess { expression, name })
    }

    pub fn binary_expr(
        &mut self,
        left: NodeIndex,
        operator: BinaryOperator,
        right: NodeIndex,
    ) -> NodeIndex {
        self.push(NodeData::Binary {
            left,
            operator,
            right,
        })
    }

    pub fn unary_expr(&mut self, operator: UnaryOperator, operand: NodeIndex) -> NodeIndex {
        self.push(NodeData::Unary { operator, operand })
    }

    pub fn not(&mut self, operand: NodeIndex) -> NodeIndex {
        self.unary_expr(UnaryOperator::Not, operand)
    }

    pub fn literal(&mut self, value: LiteralValue) -> NodeIndex {
        self.push(NodeData::Literal(value))
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.literal(LiteralValue::Boolean(value))
    }

    pub fn number(&mut self, text: &str) -> NodeIndex {
        self.literal(LiteralValue::Numeric(text.to_string()))
    }

    pub fn nothing(&mut self) -> NodeIndex {
        self.literal(LiteralValue::Nothing)
    }

    pub fn parens(&mut self, expression: NodeIndex) -> NodeIndex {
        self.push(NodeData::Parenthesized { expression })
    }

    pub fn invocation(&mut self, expression: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.push(NodeData::Invocation {
            expression,
            arguments,
        })
    }

    pub fn named_argument(&mut self, name: &str, expression: NodeIndex) -> NodeIndex {
        let name = self.identifier(name);
        self.push(NodeData::NamedArgument { name, expression })
    }

    pub fn object_creation(&mut self, type_name: &str, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.push(NodeData::ObjectCreation {
            type_name: type_name.to_string(),
            arguments,
        })
    }

    pub fn anonymous_object(&mut self, initializers: Vec<NodeIndex>) -> NodeIndex {
        self.push(NodeData::AnonymousObjectCreation { initializers })
    }

    pub fn named_field(&mut self, name: &str, expression: NodeIndex) -> NodeIndex {
        let name = self.identifier(name);
        self.push(NodeData::NamedFieldInitializer { name, expression })
    }

    pub fn inferred_field(&mut self, expression: NodeIndex) -> NodeIndex {
        self.push(NodeData::InferredFieldInitializer { expression })
    }

    pub fn instance(&mut self, kind: InstanceKind) -> NodeIndex {
        self.push(NodeData::Instance(kind))
    }

    pub fn type_of_is(&mut self, expression: NodeIndex, type_name: &str, negated: bool) -> NodeIndex {
        self.push(NodeData::TypeOfIs {
            expression,
            type_name: type_name.to_string(),
            negated,
        })
    }

    pub fn ternary(
        &mut self,
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    ) -> NodeIndex {
        self.push(NodeData::Ternary {
            condition,
            when_true,
            when_false,
        })
    }

    pub fn condition_statement(&mut self, kind: ConditionKind, condition: NodeIndex) -> NodeIndex {
        self.push(NodeData::Condition { kind, condition })
    }

    pub fn if_statement(&mut self, condition: NodeIndex) -> NodeIndex {
        self.condition_statement(ConditionKind::If, condition)
    }

    pub fn return_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.push(NodeData::Return { expression })
    }

    pub fn local_declaration(&mut self, name: &str, initializer: NodeIndex) -> NodeIndex {
        self.push(NodeData::LocalDeclaration {
            name: name.to_string(),
            initializer,
        })
    }

    pub fn assignment(&mut self, target: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.push(NodeData::Assignment { target, value })
    }

    pub fn expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.push(NodeData::ExpressionStatement { expression })
    }

    /// Set the leading trivia of a freshly built node.
    pub fn set_leading_trivia(&mut self, index: NodeIndex, trivia: &str) {
        debug_assert!(
            self.get(index).is_some_and(|n| n.origin.is_none()),
            "trivia is only set while building the parsed tree"
        );
        if let Some(node) = self.nodes.get_mut(index.0 as usize) {
            node.leading_trivia = trivia.to_string();
        }
    }
}
