//! Member identity.
//!
//! [`MemberRef`] is the disambiguating identity of a property or method at a
//! use-site: declaring type, name, kind, declared parameter types, generic
//! shape, and return type. Two references are equal iff all fields match
//! structurally, which is what makes `MemberRef` usable as a cache key.
//!
//! The declared parameter types are always the *generic definition's* types:
//! open positions appear as [`TypeRef::Param`] by name, never as the concrete
//! arguments of a particular call-site. Call-site generic arguments travel
//! separately in `type_args`.

use std::fmt;

use bitflags::bitflags;

use crate::key::SigKey;
use crate::types::{NamedType, TypeRef};

bitflags! {
    /// Modifier flags on a member declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: u8 {
        /// Static member: no receiver parameter.
        const STATIC = 1 << 0;
        /// Overridable member: derived types may supply their own declaration.
        const OVERRIDABLE = 1 << 1;
    }
}

/// What kind of member a reference names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Property (getter): no declared parameters of its own.
    Property,
    /// Method: zero or more declared parameters.
    Method,
}

/// The identity of a property or method at a use-site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    /// The type declaring the member. Closed generic instantiations carry
    /// their concrete arguments here.
    pub declaring_type: NamedType,
    /// Member name.
    pub name: String,
    /// Property or method.
    pub kind: MemberKind,
    /// Modifier flags.
    pub flags: MemberFlags,
    /// Declared parameter types (generic definition's types), excluding any
    /// receiver. Always empty for properties.
    pub param_types: Vec<TypeRef>,
    /// Generic arity of the member itself.
    pub generic_arity: usize,
    /// Call-site generic arguments; length equals `generic_arity` when the
    /// use-site is closed.
    pub type_args: Vec<TypeRef>,
    /// Declared return type.
    pub return_type: TypeRef,
}

impl MemberRef {
    /// Reference an instance property.
    pub fn property(
        declaring_type: NamedType,
        name: impl Into<String>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            kind: MemberKind::Property,
            flags: MemberFlags::empty(),
            param_types: Vec::new(),
            generic_arity: 0,
            type_args: Vec::new(),
            return_type,
        }
    }

    /// Reference an instance method.
    pub fn method(
        declaring_type: NamedType,
        name: impl Into<String>,
        param_types: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            kind: MemberKind::Method,
            flags: MemberFlags::empty(),
            param_types,
            generic_arity: 0,
            type_args: Vec::new(),
            return_type,
        }
    }

    /// Mark the member static.
    pub fn static_member(mut self) -> Self {
        self.flags |= MemberFlags::STATIC;
        self
    }

    /// Mark the member overridable.
    pub fn overridable(mut self) -> Self {
        self.flags |= MemberFlags::OVERRIDABLE;
        self
    }

    /// Close a generic member with call-site arguments.
    pub fn with_generic_args(mut self, args: Vec<TypeRef>) -> Self {
        self.generic_arity = args.len();
        self.type_args = args;
        self
    }

    /// Whether the member is static.
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    /// Whether the member is overridable.
    pub fn is_overridable(&self) -> bool {
        self.flags.contains(MemberFlags::OVERRIDABLE)
    }

    /// Signature key: name, kind, and declared parameter types. Declaring
    /// type is excluded so a base declaration and its override share a key.
    pub fn sig_key(&self) -> SigKey {
        SigKey::from_signature(&self.name, self.kind, &self.param_types)
    }

    /// Fully-qualified member name for diagnostics.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}::{}", self.declaring_type, self.name)
    }

    /// Re-anchor this identity onto another declaring type, keeping the
    /// signature and call-site generic arguments.
    pub fn anchored_to(&self, declaring_type: NamedType, flags: MemberFlags) -> MemberRef {
        MemberRef {
            declaring_type,
            name: self.name.clone(),
            kind: self.kind,
            flags,
            param_types: self.param_types.clone(),
            generic_arity: self.generic_arity,
            type_args: self.type_args.clone(),
            return_type: self.return_type.clone(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_reference() {
        let ty = NamedType::new("App", "Order");
        let member = MemberRef::property(ty, "Total", TypeRef::int());
        assert_eq!(member.kind, MemberKind::Property);
        assert!(member.param_types.is_empty());
        assert_eq!(member.fully_qualified_name(), "App::Order::Total");
    }

    #[test]
    fn method_reference() {
        let ty = NamedType::global("Order");
        let member = MemberRef::method(ty, "Calculate", vec![TypeRef::int()], TypeRef::int());
        assert_eq!(member.kind, MemberKind::Method);
        assert_eq!(member.param_types.len(), 1);
    }

    #[test]
    fn structural_equality_is_the_cache_key() {
        let a = MemberRef::property(NamedType::global("Order"), "Total", TypeRef::int());
        let b = MemberRef::property(NamedType::global("Order"), "Total", TypeRef::int());
        assert_eq!(a, b);

        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn overloads_are_distinct_identities() {
        let ty = NamedType::global("Order");
        let by_int = MemberRef::method(ty.clone(), "Calculate", vec![TypeRef::int()], TypeRef::int());
        let by_str =
            MemberRef::method(ty, "Calculate", vec![TypeRef::string()], TypeRef::int());
        assert_ne!(by_int, by_str);
        assert_ne!(by_int.sig_key(), by_str.sig_key());
    }

    #[test]
    fn flags() {
        let ty = NamedType::global("Order");
        let member = MemberRef::property(ty, "Total", TypeRef::int())
            .static_member()
            .overridable();
        assert!(member.is_static());
        assert!(member.is_overridable());
    }

    #[test]
    fn anchored_to_keeps_signature() {
        let base = NamedType::global("Entity");
        let derived = NamedType::global("Order");
        let member = MemberRef::method(base, "Describe", vec![TypeRef::int()], TypeRef::string())
            .overridable();
        let anchored = member.anchored_to(derived.clone(), member.flags);
        assert_eq!(anchored.declaring_type, derived);
        assert_eq!(anchored.sig_key(), member.sig_key());
    }
}
