//! Type model: the metadata side of expansion.
//!
//! [`TypeRegistry`] is the host-populated description of the types whose
//! members may be expanded: base chains, implemented interfaces, member
//! declarations with their modifier flags, expansion markers, and named
//! inline-body providers. It answers three questions for the engine:
//!
//! - does this member carry the expansion marker (and an alternate body
//!   name)?
//! - which declaration of this signature is the most derived one reachable
//!   from a given receiver type?
//! - which inline-body provider does a marker's `use_member_body` name refer
//!   to?
//!
//! Entries are stored by [`TypeKey`] of their open definition, so closed
//! generic receivers find their definition's entry without normalization at
//! every call.
//!
//! # Thread Safety
//!
//! `TypeRegistry` is not thread-safe by design: it is populated
//! single-threaded during host setup and effectively read-only afterwards,
//! the same registration-then-use split the factory table follows.

use rustc_hash::FxHashMap;

use veneer_core::{
    MemberFlags, MemberKind, MemberRef, NamedType, RegistryError, TypeKey, TypeRef,
};

use crate::factories::ExpressionFactory;

/// The expansion marker on a member declaration.
///
/// Presence of the marker is what makes a member virtual; `use_member_body`
/// optionally names a co-located inline-body provider to prefer over the
/// generated factory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpandMarker {
    /// Name of an inline-body provider registered on the declaring type.
    pub use_member_body: Option<String>,
}

impl ExpandMarker {
    /// Plain marker: body comes from the generated factory table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker naming an inline-body provider.
    pub fn with_member_body(name: impl Into<String>) -> Self {
        Self {
            use_member_body: Some(name.into()),
        }
    }
}

/// Whether a type entry describes a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Concrete (or abstract) class.
    Class,
    /// Interface; members are re-anchored to implementing declarations.
    Interface,
}

/// A member declaration on a registered type.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDef {
    /// Member name.
    pub name: String,
    /// Property or method.
    pub kind: MemberKind,
    /// Modifier flags.
    pub flags: MemberFlags,
    /// Declared parameter types (generic definition's), excluding receiver.
    pub param_types: Vec<TypeRef>,
    /// Generic arity of the member itself.
    pub generic_arity: usize,
    /// Declared return type.
    pub return_type: TypeRef,
    /// Expansion marker, if the member is virtual.
    pub marker: Option<ExpandMarker>,
}

impl MemberDef {
    /// Declare an instance property.
    pub fn property(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            flags: MemberFlags::empty(),
            param_types: Vec::new(),
            generic_arity: 0,
            return_type,
            marker: None,
        }
    }

    /// Declare an instance method.
    pub fn method(
        name: impl Into<String>,
        param_types: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            flags: MemberFlags::empty(),
            param_types,
            generic_arity: 0,
            return_type,
            marker: None,
        }
    }

    /// Mark static.
    pub fn static_member(mut self) -> Self {
        self.flags |= MemberFlags::STATIC;
        self
    }

    /// Mark overridable.
    pub fn overridable(mut self) -> Self {
        self.flags |= MemberFlags::OVERRIDABLE;
        self
    }

    /// Declare generic arity on the member itself.
    pub fn generic(mut self, arity: usize) -> Self {
        self.generic_arity = arity;
        self
    }

    /// Attach a plain expansion marker.
    pub fn expandable(mut self) -> Self {
        self.marker = Some(ExpandMarker::new());
        self
    }

    /// Attach a marker naming an inline-body provider.
    pub fn expandable_via(mut self, body_name: impl Into<String>) -> Self {
        self.marker = Some(ExpandMarker::with_member_body(body_name));
        self
    }

    /// Whether this declaration has the same signature as a use-site
    /// reference: name, kind, declared parameter types, and member generic
    /// arity.
    pub fn matches(&self, member: &MemberRef) -> bool {
        self.name == member.name
            && self.kind == member.kind
            && self.generic_arity == member.generic_arity
            && self.param_types == member.param_types
    }

    /// Build the use-site identity of this declaration on a declaring type.
    pub fn to_ref(&self, declaring_type: NamedType) -> MemberRef {
        MemberRef {
            declaring_type,
            name: self.name.clone(),
            kind: self.kind,
            flags: self.flags,
            param_types: self.param_types.clone(),
            generic_arity: self.generic_arity,
            type_args: Vec::new(),
            return_type: self.return_type.clone(),
        }
    }
}

/// A registered type: shape, hierarchy, members, inline-body providers.
pub struct TypeEntry {
    ty: NamedType,
    kind: TypeKind,
    base: Option<NamedType>,
    interfaces: Vec<NamedType>,
    members: Vec<MemberDef>,
    inline_bodies: FxHashMap<String, ExpressionFactory>,
}

impl TypeEntry {
    /// Describe a class. The reference is normalized to its open definition.
    pub fn class(ty: NamedType) -> Self {
        Self {
            ty: ty.definition(),
            kind: TypeKind::Class,
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            inline_bodies: FxHashMap::default(),
        }
    }

    /// Describe an interface.
    pub fn interface(ty: NamedType) -> Self {
        Self {
            kind: TypeKind::Interface,
            ..Self::class(ty)
        }
    }

    /// Set the base type.
    pub fn with_base(mut self, base: NamedType) -> Self {
        self.base = Some(base.definition());
        self
    }

    /// Add an implemented interface.
    pub fn implements(mut self, interface: NamedType) -> Self {
        self.interfaces.push(interface.definition());
        self
    }

    /// Add a member declaration.
    pub fn with_member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    /// Register an inline-body provider under a name that markers'
    /// `use_member_body` can refer to.
    pub fn with_inline_body(mut self, name: impl Into<String>, factory: ExpressionFactory) -> Self {
        self.inline_bodies.insert(name.into(), factory);
        self
    }

    /// The type's open definition.
    pub fn ty(&self) -> &NamedType {
        &self.ty
    }

    /// Class or interface.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Base type, if declared.
    pub fn base(&self) -> Option<&NamedType> {
        self.base.as_ref()
    }

    /// Implemented interfaces.
    pub fn interfaces(&self) -> &[NamedType] {
        &self.interfaces
    }

    /// Member declarations.
    pub fn members(&self) -> &[MemberDef] {
        &self.members
    }

    /// First member declaration matching the reference's signature.
    pub fn find_member(&self, member: &MemberRef) -> Option<&MemberDef> {
        self.members.iter().find(|m| m.matches(member))
    }
}

/// Host-populated type model.
#[derive(Default)]
pub struct TypeRegistry {
    types: FxHashMap<TypeKey, TypeEntry>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type entry.
    ///
    /// Rejects duplicate type identities and duplicate member signatures
    /// within the entry.
    pub fn register(&mut self, entry: TypeEntry) -> Result<(), RegistryError> {
        let key = entry.ty.key();
        if self.types.contains_key(&key) {
            return Err(RegistryError::DuplicateType(entry.ty.to_string()));
        }
        for (i, member) in entry.members.iter().enumerate() {
            let duplicated = entry.members[..i].iter().any(|m| {
                m.name == member.name
                    && m.kind == member.kind
                    && m.param_types == member.param_types
                    && m.generic_arity == member.generic_arity
            });
            if duplicated {
                return Err(RegistryError::DuplicateMember {
                    type_name: entry.ty.to_string(),
                    member: member.name.clone(),
                });
            }
        }
        self.types.insert(key, entry);
        Ok(())
    }

    /// Entry for a type reference (closed or open; lookup is by definition).
    pub fn entry(&self, ty: &NamedType) -> Option<&TypeEntry> {
        self.types.get(&ty.key())
    }

    /// Entry by precomputed key.
    pub fn entry_by_key(&self, key: TypeKey) -> Option<&TypeEntry> {
        self.types.get(&key)
    }

    /// The expansion marker on a member, if its declaration carries one.
    ///
    /// This is the marker authority: a member whose declaration is unknown
    /// to the model, or known but unmarked, is not virtual.
    pub fn marker(&self, member: &MemberRef) -> Option<&ExpandMarker> {
        self.entry(&member.declaring_type)?
            .find_member(member)?
            .marker
            .as_ref()
    }

    /// Inline-body provider registered on a type under `name`.
    pub fn inline_body(&self, ty: &NamedType, name: &str) -> Option<ExpressionFactory> {
        self.entry(ty)?.inline_bodies.get(name).copied()
    }

    /// Register an inline-body provider on an already-registered type.
    pub fn register_inline_body(
        &mut self,
        ty: &NamedType,
        name: impl Into<String>,
        factory: ExpressionFactory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let entry = self
            .types
            .get_mut(&ty.key())
            .ok_or_else(|| RegistryError::TypeNotFound(ty.to_string()))?;
        if entry.inline_bodies.contains_key(&name) {
            return Err(RegistryError::DuplicateInlineBody {
                type_name: entry.ty.to_string(),
                name,
            });
        }
        entry.inline_bodies.insert(name, factory);
        Ok(())
    }

    /// Whether the reference names a registered interface.
    pub fn is_interface(&self, ty: &NamedType) -> bool {
        self.entry(ty)
            .is_some_and(|e| e.kind() == TypeKind::Interface)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
