//! Resolved symbols.

use crate::types::TypeId;
use bitflags::bitflags;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Method,
    Field,
    Property,
    Local,
    Parameter,
    NamedType,
    Namespace,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        /// `Shared` member, or any member of a `Module`.
        const STATIC = 1 << 0;
        /// Extension method seen through its receiver (`x.Ext()` rather than `Ext(x)`).
        const REDUCED_EXTENSION = 1 << 1;
        /// Property with a compiler-generated backing field.
        const AUTO_PROPERTY = 1 << 2;
        const GENERIC_METHOD = 1 << 3;
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub flags: SymbolFlags,
    pub containing_symbol: Option<SymbolId>,
    /// Type that declares this member.
    pub containing_type: Option<TypeId>,
    /// Type extended by a reduced extension method.
    pub receiver_type: Option<TypeId>,
    /// For named types, the type they declare.
    pub declared_type: Option<TypeId>,
}

impl Symbol {
    pub fn is_static(&self) -> bool {
        self.flags.contains(SymbolFlags::STATIC)
    }

    pub fn is_reduced_extension(&self) -> bool {
        self.flags.contains(SymbolFlags::REDUCED_EXTENSION)
    }

    pub fn is_auto_property(&self) -> bool {
        self.kind == SymbolKind::Property && self.flags.contains(SymbolFlags::AUTO_PROPERTY)
    }

    pub fn is_generic_method(&self) -> bool {
        self.kind == SymbolKind::Method && self.flags.contains(SymbolFlags::GENERIC_METHOD)
    }

    /// Non-static method, field or property: a reference can carry an
    /// implicit instance receiver.
    pub fn is_qualifiable_instance_reference(&self) -> bool {
        !self.is_static()
            && matches!(
                self.kind,
                SymbolKind::Method | SymbolKind::Field | SymbolKind::Property
            )
    }
}

/// Flat symbol storage, indexed by [`SymbolId`].
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn add(
        &mut self,
        name: &str,
        kind: SymbolKind,
        flags: SymbolFlags,
        containing_symbol: Option<SymbolId>,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        let containing_type = containing_symbol
            .and_then(|c| self.get(c))
            .and_then(|c| c.declared_type);
        self.symbols.push(Symbol {
            id,
            name: name.to_string(),
            kind,
            flags,
            containing_symbol,
            containing_type,
            receiver_type: None,
            declared_type: None,
        });
        id
    }

    /// Add a named type symbol declaring `declared`.
    pub fn add_type(&mut self, name: &str, declared: TypeId, containing: Option<SymbolId>) -> SymbolId {
        let id = self.add(name, SymbolKind::NamedType, SymbolFlags::empty(), containing);
        if let Some(symbol) = self.get_mut(id) {
            symbol.declared_type = Some(declared);
        }
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Walk the containing symbols of `id` outward, starting at `id` itself.
    pub fn containers(&self, id: SymbolId) -> impl Iterator<Item = &Symbol> + '_ {
        let mut next = self.get(id);
        let mut remaining = self.symbols.len() + 1;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let current = next?;
            next = current.containing_symbol.and_then(|c| self.get(c));
            Some(current)
        })
    }

    /// Dotted name from the outermost named container, e.g. `Ns.Outer.Inner`.
    /// Namespaces with an empty name (the global namespace) are skipped.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let mut parts: Vec<&str> = self
            .containers(id)
            .map(|s| s.name.as_str())
            .filter(|name| !name.is_empty())
            .collect();
        parts.reverse();
        parts.join(".")
    }
}
