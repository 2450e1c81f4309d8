//! Deterministic hash-based identities.
//!
//! This module provides [`TypeKey`] and [`SigKey`], 64-bit hashes identifying
//! type definitions and member signatures. Hashes are computed from names and
//! shapes rather than assigned sequentially, so the same declaration always
//! produces the same key regardless of registration order. The expansion
//! engine uses the pair `(TypeKey, SigKey)` to memoize overriding-member
//! resolution per distinct receiver type.
//!
//! # Examples
//!
//! ```
//! use veneer_core::{NamedType, TypeKey, TypeRef};
//!
//! let a = TypeKey::from_named(&NamedType::global("Order"));
//! let b = TypeKey::from_named(&NamedType::global("Order"));
//! assert_eq!(a, b); // deterministic
//!
//! // Arguments don't participate: a closed instantiation keys like its definition
//! let open = NamedType::global("List").with_arity(1);
//! let closed = NamedType::generic("List", vec![TypeRef::int()]);
//! assert_eq!(TypeKey::from_named(&open), TypeKey::from_named(&closed));
//! ```

use std::fmt;

use xxhash_rust::xxh64::xxh64;

use crate::member::MemberKind;
use crate::types::{NamedType, TypeRef};

/// Domain-mixing constants for key computation.
///
/// Distinct domains (types vs. member signatures) start from distinct seeds
/// so that a type and a member sharing a name never collide.
pub mod hash_constants {
    /// Seed for path-component string hashing
    pub const SEP: u64 = 0x8c72_4c3e_9b1d_55a7;

    /// Domain marker for type keys
    pub const TYPE: u64 = 0x41f6_0e8b_2d97_c135;

    /// Domain marker for member signature keys
    pub const MEMBER: u64 = 0xd29a_7b40_63ce_18f9;

    /// Parameter position mixing constants; each position gets a distinct
    /// constant so that parameter order matters.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9216_d5d9_8979_fb1b,
        0x4528_21e6_38d0_1377,
        0xbe54_66cf_34e9_0c6c,
        0xc0ac_29b7_c97c_50dd,
        0x3f84_d5b5_b547_0917,
        0x9b30_952c_cfd3_6f1d,
        0x1b56_c339_df1e_8a41,
        0x7ef8_4f78_fd95_5cb1,
    ];
}

fn mix(h: u64, v: u64) -> u64 {
    (h.rotate_left(5) ^ v).wrapping_mul(0x517c_c1b7_2722_0a95)
}

/// Deterministic identity of a type definition.
///
/// Computed from namespace, nested-type path, and per-segment generic arity.
/// Generic arguments do not participate, so open and closed references to the
/// same type share a key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeKey(pub u64);

impl TypeKey {
    /// Empty/invalid key constant.
    pub const EMPTY: TypeKey = TypeKey(0);

    /// Compute the key for a nominal type.
    pub fn from_named(ty: &NamedType) -> Self {
        let mut h = hash_constants::TYPE;
        for ns in &ty.namespace {
            h = mix(h, xxh64(ns.as_bytes(), hash_constants::SEP));
        }
        for seg in &ty.path {
            h = mix(h, xxh64(seg.name.as_bytes(), hash_constants::SEP));
            h = mix(h, seg.arity as u64);
        }
        TypeKey(h)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({:#018x})", self.0)
    }
}

/// Deterministic identity of a member signature.
///
/// Computed from member name, member kind, and the declared parameter type
/// list; declaring type is intentionally excluded so that a base declaration
/// and its override share a signature key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SigKey(pub u64);

impl SigKey {
    /// Compute the key for a member signature.
    pub fn from_signature(name: &str, kind: MemberKind, params: &[TypeRef]) -> Self {
        let mut h = hash_constants::MEMBER;
        h = mix(h, xxh64(name.as_bytes(), hash_constants::SEP));
        h = mix(h, kind as u64);
        for (i, param) in params.iter().enumerate() {
            let ph = xxh64(param.to_string().as_bytes(), hash_constants::SEP);
            let marker =
                hash_constants::PARAM_MARKERS[i % hash_constants::PARAM_MARKERS.len()];
            h = mix(h, ph ^ marker.wrapping_add(i as u64));
        }
        SigKey(h)
    }
}

impl fmt::Debug for SigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigKey({:#018x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeSegment;

    #[test]
    fn type_key_deterministic() {
        let a = TypeKey::from_named(&NamedType::new("App", "Order"));
        let b = TypeKey::from_named(&NamedType::new("App", "Order"));
        assert_eq!(a, b);
    }

    #[test]
    fn type_key_distinguishes_namespace() {
        let a = TypeKey::from_named(&NamedType::new("App", "Order"));
        let b = TypeKey::from_named(&NamedType::global("Order"));
        assert_ne!(a, b);
    }

    #[test]
    fn type_key_distinguishes_arity() {
        let plain = TypeKey::from_named(&NamedType::global("List"));
        let generic = TypeKey::from_named(&NamedType::global("List").with_arity(1));
        assert_ne!(plain, generic);
    }

    #[test]
    fn type_key_distinguishes_nesting_from_namespace_flattening() {
        // App::Outer::Inner as a nested path vs. as a namespace must differ
        let nested = NamedType::new("App", "Outer").nested("Inner", 0);
        let flat = NamedType::new("App::Outer", "Inner");
        assert_eq!(nested.path.len(), 2);
        assert_eq!(flat.path, vec![TypeSegment::new("Inner", 0)]);
        assert_ne!(TypeKey::from_named(&nested), TypeKey::from_named(&flat));
    }

    #[test]
    fn sig_key_distinguishes_overloads() {
        let a = SigKey::from_signature("Calculate", MemberKind::Method, &[TypeRef::int()]);
        let b = SigKey::from_signature("Calculate", MemberKind::Method, &[TypeRef::string()]);
        assert_ne!(a, b);
    }

    #[test]
    fn sig_key_parameter_order_matters() {
        let ab = SigKey::from_signature(
            "Combine",
            MemberKind::Method,
            &[TypeRef::int(), TypeRef::string()],
        );
        let ba = SigKey::from_signature(
            "Combine",
            MemberKind::Method,
            &[TypeRef::string(), TypeRef::int()],
        );
        assert_ne!(ab, ba);
    }

    #[test]
    fn sig_key_distinguishes_kind() {
        let prop = SigKey::from_signature("Total", MemberKind::Property, &[]);
        let method = SigKey::from_signature("Total", MemberKind::Method, &[]);
        assert_ne!(prop, method);
    }
}
