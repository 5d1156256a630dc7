//! In-memory semantic model.
//!
//! `SemanticModel` is the oracle used by tests, benchmarks and hosts that
//! bind trees themselves: symbols, types and operations are recorded per
//! node, and enclosing-symbol queries are answered from registered scopes.

use crate::expand;
use crate::oracle::{Operation, SemanticOracle, TypeInfo};
use crate::symbols::{Symbol, SymbolId, SymbolTable};
use crate::types::{TypeId, TypeTable};
use rustc_hash::FxHashMap;
use vbcs_syntax::{NodeArena, NodeIndex, TextRange};

#[derive(Debug, Default)]
pub struct SemanticModel {
    symbols: SymbolTable,
    types: TypeTable,
    node_symbols: FxHashMap<NodeIndex, SymbolId>,
    node_types: FxHashMap<NodeIndex, TypeInfo>,
    operations: FxHashMap<NodeIndex, Operation>,
    /// Declaration bodies, in registration order.
    scopes: Vec<(TextRange, SymbolId)>,
}

impl SemanticModel {
    pub fn new() -> Self {
        SemanticModel::default()
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    pub fn bind(&mut self, node: NodeIndex, symbol: SymbolId) {
        self.node_symbols.insert(node, symbol);
    }

    /// Record a node whose type needs no conversion.
    pub fn set_type(&mut self, node: NodeIndex, ty: TypeId) {
        self.node_types.insert(node, TypeInfo::of(ty));
    }

    pub fn set_type_info(&mut self, node: NodeIndex, info: TypeInfo) {
        self.node_types.insert(node, info);
    }

    pub fn set_operation(&mut self, node: NodeIndex, operation: Operation) {
        self.operations.insert(node, operation);
    }

    /// Register the body of `symbol` as covering `range`.
    pub fn add_scope(&mut self, range: TextRange, symbol: SymbolId) {
        self.scopes.push((range, symbol));
    }
}

impl SemanticOracle for SemanticModel {
    fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn types(&self) -> &TypeTable {
        &self.types
    }

    fn symbol(&self, node: NodeIndex) -> Option<&Symbol> {
        let id = self.node_symbols.get(&node)?;
        self.symbols.get(*id)
    }

    fn type_info(&self, node: NodeIndex) -> TypeInfo {
        self.node_types.get(&node).copied().unwrap_or_default()
    }

    fn operation(&self, node: NodeIndex) -> Option<&Operation> {
        self.operations.get(&node)
    }

    fn enclosing_symbol(&self, position: u32) -> Option<SymbolId> {
        // Innermost wins; for equal ranges the later registration wins.
        self.scopes
            .iter()
            .rev()
            .filter(|(range, _)| range.contains(position))
            .min_by_key(|(range, _)| range.end - range.pos)
            .map(|(_, symbol)| *symbol)
    }

    fn expand_name(&self, arena: &mut NodeArena, node: NodeIndex) -> NodeIndex {
        expand::expand_qualified(self, arena, node)
    }
}

#[cfg(test)]
#[path = "../tests/model.rs"]
mod tests;
