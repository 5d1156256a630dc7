//! Type table.
//!
//! Types are interned in a flat table and referenced by [`TypeId`]. The
//! first few slots are pre-registered primitives so fixtures and hosts can
//! refer to them without a lookup.

use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const BOOLEAN: TypeId = TypeId(0);
    pub const INTEGER: TypeId = TypeId(1);
    pub const STRING: TypeId = TypeId(2);
    pub const OBJECT: TypeId = TypeId(3);
    /// `Boolean?`
    pub const NULLABLE_BOOLEAN: TypeId = TypeId(4);
    /// `Integer?`
    pub const NULLABLE_INTEGER: TypeId = TypeId(5);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Boolean,
    Numeric,
    String,
    Object,
    Class,
    Structure,
    Interface,
    /// VB `Module`: every member is implicitly shared.
    Module,
    /// Compiler-generated type of a `New With { }` expression.
    Anonymous,
    Delegate,
    /// `Nullable(Of T)`, carrying `T`.
    Nullable(TypeId),
}

#[derive(Clone, Debug)]
pub struct TypeData {
    pub name: String,
    pub kind: TypeKind,
    pub base: Option<TypeId>,
    /// Declared member names. Lookup is case-insensitive.
    pub members: Vec<String>,
}

#[derive(Debug)]
pub struct TypeTable {
    types: Vec<TypeData>,
    nullable_of: FxHashMap<TypeId, TypeId>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = TypeTable {
            types: Vec::new(),
            nullable_of: FxHashMap::default(),
        };
        let boolean = table.add("Boolean", TypeKind::Boolean);
        let integer = table.add("Integer", TypeKind::Numeric);
        table.add("String", TypeKind::String);
        table.add("Object", TypeKind::Object);
        let nullable_boolean = table.nullable(boolean);
        let nullable_integer = table.nullable(integer);
        debug_assert_eq!(boolean, TypeId::BOOLEAN);
        debug_assert_eq!(nullable_boolean, TypeId::NULLABLE_BOOLEAN);
        debug_assert_eq!(nullable_integer, TypeId::NULLABLE_INTEGER);
        table
    }

    pub fn add(&mut self, name: &str, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeData {
            name: name.to_string(),
            kind,
            base: None,
            members: Vec::new(),
        });
        id
    }

    /// Add a class-like type with a base type and member names.
    pub fn add_class(&mut self, name: &str, base: Option<TypeId>, members: &[&str]) -> TypeId {
        let id = self.add(name, TypeKind::Class);
        if let Some(data) = self.types.get_mut(id.0 as usize) {
            data.base = base;
            data.members = members.iter().map(|m| m.to_string()).collect();
        }
        id
    }

    pub fn add_member(&mut self, ty: TypeId, member: &str) {
        if let Some(data) = self.types.get_mut(ty.0 as usize) {
            data.members.push(member.to_string());
        }
    }

    /// `Nullable(Of underlying)`, interned.
    pub fn nullable(&mut self, underlying: TypeId) -> TypeId {
        if let Some(&existing) = self.nullable_of.get(&underlying) {
            return existing;
        }
        let name = format!("{}?", self.name(underlying));
        let id = self.add(&name, TypeKind::Nullable(underlying));
        self.nullable_of.insert(underlying, id);
        id
    }

    pub fn get(&self, ty: TypeId) -> Option<&TypeData> {
        self.types.get(ty.0 as usize)
    }

    pub fn name(&self, ty: TypeId) -> &str {
        self.get(ty).map_or("<unknown>", |t| t.name.as_str())
    }

    pub fn kind(&self, ty: TypeId) -> Option<&TypeKind> {
        self.get(ty).map(|t| &t.kind)
    }

    pub fn is_nullable(&self, ty: TypeId) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Nullable(_)))
    }

    /// Underlying type of a nullable, or the type itself.
    pub fn underlying(&self, ty: TypeId) -> TypeId {
        match self.kind(ty) {
            Some(TypeKind::Nullable(inner)) => *inner,
            _ => ty,
        }
    }

    /// Exactly `Boolean`; `Boolean?` is not a boolean type.
    pub fn is_boolean(&self, ty: TypeId) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Boolean))
    }

    /// `Boolean` or `Boolean?`.
    pub fn is_boolean_or_nullable_boolean(&self, ty: TypeId) -> bool {
        self.is_boolean(self.underlying(ty))
    }

    pub fn is_module(&self, ty: TypeId) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Module))
    }

    pub fn is_anonymous(&self, ty: TypeId) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Anonymous))
    }

    pub fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        self.get(ty).and_then(|t| t.base)
    }

    /// True when `derived` is `base` or has it somewhere up its base chain.
    pub fn inherits_from_or_equals(&self, derived: TypeId, base: TypeId) -> bool {
        let mut current = Some(derived);
        let mut steps = 0usize;
        while let Some(ty) = current {
            if ty == base {
                return true;
            }
            steps += 1;
            if steps > self.types.len() {
                // cyclic base chain
                return false;
            }
            current = self.base_type(ty);
        }
        false
    }

    /// Member lookup through the base chain, ignoring case.
    pub fn contains_member(&self, ty: TypeId, member: &str) -> bool {
        let mut current = Some(ty);
        let mut steps = 0usize;
        while let Some(t) = current {
            let Some(data) = self.get(t) else {
                return false;
            };
            if data.members.iter().any(|m| m.eq_ignore_ascii_case(member)) {
                return true;
            }
            steps += 1;
            if steps > self.types.len() {
                return false;
            }
            current = data.base;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/types.rs"]
mod tests;
