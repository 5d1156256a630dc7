//! Semantic information for the vbcs converter.
//!
//! The conversion engines never resolve names themselves. They ask a
//! [`SemanticOracle`] for symbols, types, bound operations and enclosing
//! declarations. [`SemanticModel`] is a complete in-memory implementation.

pub mod expand;
pub mod model;
pub mod oracle;
pub mod symbols;
pub mod types;

pub use model::SemanticModel;
pub use oracle::{Operation, SemanticOracle, TypeInfo};
pub use symbols::{Symbol, SymbolFlags, SymbolId, SymbolKind, SymbolTable};
pub use types::{TypeData, TypeId, TypeKind, TypeTable};
