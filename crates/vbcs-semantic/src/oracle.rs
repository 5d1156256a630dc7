//! The contract between the conversion engines and the compiler front end.
//!
//! All lookups take the index of a parsed node. Passes that work on
//! synthesized replacement nodes map them back with
//! [`NodeArena::original`] before asking.

use crate::symbols::{Symbol, SymbolId, SymbolKind, SymbolTable};
use crate::types::{TypeId, TypeTable};
use vbcs_syntax::{NodeArena, NodeIndex};

/// Type of an expression before and after implicit conversions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeInfo {
    pub ty: Option<TypeId>,
    pub converted_type: Option<TypeId>,
}

impl TypeInfo {
    pub fn of(ty: TypeId) -> Self {
        TypeInfo {
            ty: Some(ty),
            converted_type: Some(ty),
        }
    }

    pub fn converted(ty: TypeId, converted_type: TypeId) -> Self {
        TypeInfo {
            ty: Some(ty),
            converted_type: Some(converted_type),
        }
    }
}

/// Bound operation for a node, as far as the converter needs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Reference to a field, property, method or event.
    MemberReference {
        /// Receiver syntax when the front end attached one. For implicit
        /// receivers this may be a node outside the reference itself (e.g. the
        /// `With` target).
        instance: Option<NodeIndex>,
        member: SymbolId,
    },
    Other,
}

pub trait SemanticOracle {
    fn symbols(&self) -> &SymbolTable;

    fn types(&self) -> &TypeTable;

    /// Symbol the node binds to.
    fn symbol(&self, node: NodeIndex) -> Option<&Symbol>;

    fn type_info(&self, node: NodeIndex) -> TypeInfo;

    fn operation(&self, node: NodeIndex) -> Option<&Operation>;

    /// Innermost declared symbol whose body contains `position`.
    fn enclosing_symbol(&self, position: u32) -> Option<SymbolId>;

    /// Innermost named type containing `position`.
    fn enclosing_named_type(&self, position: u32) -> Option<TypeId> {
        let start = self.enclosing_symbol(position)?;
        self.symbols()
            .containers(start)
            .find(|s| s.kind == SymbolKind::NamedType)
            .and_then(|s| s.declared_type)
    }

    /// Generic qualification: rewrite `node` into its fully qualified form.
    /// Returns `node` itself when nothing needs qualifying.
    fn expand_name(&self, arena: &mut NodeArena, node: NodeIndex) -> NodeIndex;

    /// Member declared directly in a VB `Module`.
    fn is_module_member(&self, symbol: &Symbol) -> bool {
        symbol
            .containing_type
            .is_some_and(|ty| self.types().is_module(ty))
    }
}
