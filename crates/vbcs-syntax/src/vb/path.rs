//! Explicit ancestor path for top-down traversal.
//!
//! The source arena has no parent pointers. Passes that need to look at
//! enclosing nodes receive the path from the root to the parent of the node
//! being processed.

use super::arena::NodeArena;
use super::node::{NodeData, NodeIndex};
use smallvec::SmallVec;
use std::ops::Deref;

/// One step of the path.
///
/// `original` is the parsed node at this position and is what child slots of
/// the enclosing node refer to. `effective` is the node actually being
/// converted there, which differs from `original` once a rewrite has replaced
/// it (e.g. `And` normalized to `AndAlso`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathEntry {
    pub original: NodeIndex,
    pub effective: NodeIndex,
}

impl PathEntry {
    pub fn new(node: NodeIndex) -> Self {
        PathEntry {
            original: node,
            effective: node,
        }
    }

    pub fn replaced(original: NodeIndex, effective: NodeIndex) -> Self {
        PathEntry {
            original,
            effective,
        }
    }
}

/// Root-to-parent stack of [`PathEntry`] values.
///
/// Derefs to a slice so analyses can recurse on `&path[..path.len() - 1]`
/// when they move one level outward.
#[derive(Clone, Debug, Default)]
pub struct AncestorPath {
    entries: SmallVec<[PathEntry; 16]>,
}

impl AncestorPath {
    pub fn new() -> Self {
        AncestorPath::default()
    }

    pub fn push(&mut self, entry: PathEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<PathEntry> {
        self.entries.pop()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn parent(&self) -> Option<&PathEntry> {
        self.entries.last()
    }

    /// Build a path from explicit parsed nodes, outermost first.
    pub fn from_nodes(nodes: &[NodeIndex]) -> Self {
        AncestorPath {
            entries: nodes.iter().copied().map(PathEntry::new).collect(),
        }
    }

    /// Path from `root` down to the parent of `target`, following child slots
    /// of parsed nodes. Returns `None` when `target` is not under `root`.
    pub fn locate(arena: &NodeArena, root: NodeIndex, target: NodeIndex) -> Option<Self> {
        let mut path = AncestorPath::new();
        if find_path(arena, root, target, &mut path) {
            Some(path)
        } else {
            None
        }
    }
}

impl Deref for AncestorPath {
    type Target = [PathEntry];

    fn deref(&self) -> &[PathEntry] {
        &self.entries
    }
}

fn find_path(arena: &NodeArena, node: NodeIndex, target: NodeIndex, path: &mut AncestorPath) -> bool {
    if node == target {
        return true;
    }
    let Some(data) = arena.data(node) else {
        return false;
    };
    path.push(PathEntry::new(node));
    for child in children(data) {
        if find_path(arena, child, target, path) {
            return true;
        }
    }
    path.pop();
    false
}

/// Child slots of a node in source order. Absent slots are skipped.
pub fn children(data: &NodeData) -> SmallVec<[NodeIndex; 4]> {
    let mut out: SmallVec<[NodeIndex; 4]> = SmallVec::new();
    match data {
        NodeData::Identifier { .. } | NodeData::Literal(_) | NodeData::Instance(_) => {}
        NodeData::MemberAccess {
            expression, name, ..
        }
        | NodeData::ConditionalAccess { expression, name } => {
            out.push(*expression);
            out.push(*name);
        }
        NodeData::Binary { left, right, .. } => {
            out.push(*left);
            out.push(*right);
        }
        NodeData::Unary { operand, .. } => out.push(*operand),
        NodeData::Parenthesized { expression }
        | NodeData::InferredFieldInitializer { expression }
        | NodeData::TypeOfIs { expression, .. }
        | NodeData::Return { expression }
        | NodeData::ExpressionStatement { expression } => out.push(*expression),
        NodeData::Invocation {
            expression,
            arguments,
        } => {
            out.push(*expression);
            out.extend(arguments.iter().copied());
        }
        NodeData::NamedArgument { name, expression }
        | NodeData::NamedFieldInitializer { name, expression } => {
            out.push(*name);
            out.push(*expression);
        }
        NodeData::ObjectCreation { arguments, .. } => out.extend(arguments.iter().copied()),
        NodeData::AnonymousObjectCreation { initializers } => {
            out.extend(initializers.iter().copied())
        }
        NodeData::Ternary {
            condition,
            when_true,
            when_false,
        } => {
            out.push(*condition);
            out.push(*when_true);
            out.push(*when_false);
        }
        NodeData::Condition { condition, .. } => out.push(*condition),
        NodeData::LocalDeclaration { initializer, .. } => out.push(*initializer),
        NodeData::Assignment { target, value } => {
            out.push(*target);
            out.push(*value);
        }
    }
    out.retain(|child| child.is_some());
    out
}
