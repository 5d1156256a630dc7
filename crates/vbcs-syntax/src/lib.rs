//! Syntax trees for the vbcs converter.
//!
//! - [`vb`]: the Visual Basic source tree, stored in an append-only
//!   [`vb::NodeArena`] and addressed by [`vb::NodeIndex`]. Rewrites never
//!   mutate a node; they append replacement nodes that remember their origin.
//! - [`cs`]: the C# target IR produced by the lowering passes, plus a
//!   precedence-aware printer used for diagnostics and tests.

pub mod cs;
pub mod vb;

pub use cs::{CsBinaryOperator, CsExpr, CsPattern, CsPrinter, CsStmt, CsUnaryOperator};
pub use vb::{
    AncestorPath, BinaryOperator, ConditionKind, InstanceKind, LiteralValue, MemberAccessKind,
    Node, NodeArena, NodeData, NodeIndex, PathEntry, TextRange, UnaryOperator,
};
