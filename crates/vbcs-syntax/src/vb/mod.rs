//! Visual Basic source tree.

pub mod arena;
pub mod node;
pub mod path;

pub use arena::NodeArena;
pub use node::{
    BinaryOperator, ConditionKind, InstanceKind, LiteralValue, MemberAccessKind, Node, NodeData,
    NodeIndex, TextRange, UnaryOperator,
};
pub use path::{AncestorPath, PathEntry, children};

#[cfg(test)]
#[path = "../../tests/node_arena.rs"]
mod tests;
