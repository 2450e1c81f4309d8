//! Semantic type references.
//!
//! This module provides [`TypeRef`], the type vocabulary used by expression
//! nodes and member identities. A `TypeRef` is a value describing a type, not
//! a handle into any runtime: nominal types carry their namespace, their
//! nested-type path, and (when closed) their generic arguments; open generic
//! positions are referred to by parameter name so that the same reference can
//! describe both a generic definition and a closed instantiation.
//!
//! # Examples
//!
//! ```
//! use veneer_core::{NamedType, TypeRef};
//!
//! // Simple type in the global namespace
//! let order = NamedType::global("Order");
//! assert_eq!(order.to_string(), "Order");
//!
//! // Namespaced, nested, generic
//! let cell = NamedType::new("Storage::Model", "Container")
//!     .nested("Cell", 1)
//!     .with_args(vec![TypeRef::int()]);
//! assert_eq!(cell.to_string(), "Storage::Model::Container::Cell<int>");
//! assert_eq!(cell.total_arity(), 1);
//! ```

use std::fmt;

use crate::TypeKey;

/// One segment of a nested-type path.
///
/// The segment name never carries an arity suffix; generic arity is kept
/// alongside it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSegment {
    /// Simple type name (e.g., "Container", "Cell")
    pub name: String,
    /// Number of generic parameters declared by this segment
    pub arity: usize,
}

impl TypeSegment {
    /// Create a path segment.
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// A nominal (possibly generic, possibly nested) type reference.
///
/// The path runs outer-to-inner; the last segment is the type itself. The
/// `args` list holds concrete generic arguments when the reference is closed
/// and is empty for an open generic definition. Total arity is the sum of
/// per-segment arities, mirroring how a nested generic type accumulates the
/// parameters of its enclosing types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    /// Namespace path (e.g., ["Storage", "Model"]). Empty for global.
    pub namespace: Vec<String>,
    /// Nested-type path, outer-to-inner. Never empty.
    pub path: Vec<TypeSegment>,
    /// Concrete generic arguments; empty for an open definition.
    pub args: Vec<TypeRef>,
}

impl NamedType {
    /// Create a non-generic type in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            namespace: Vec::new(),
            path: vec![TypeSegment::new(name, 0)],
            args: Vec::new(),
        }
    }

    /// Create a non-generic type in a `::`-separated namespace.
    pub fn new(namespace: &str, name: impl Into<String>) -> Self {
        let namespace = namespace
            .split("::")
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        Self {
            namespace,
            path: vec![TypeSegment::new(name, 0)],
            args: Vec::new(),
        }
    }

    /// Create a closed generic type in the global namespace.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            namespace: Vec::new(),
            path: vec![TypeSegment::new(name, args.len())],
            args,
        }
    }

    /// Append a nested type segment, returning the inner type.
    pub fn nested(mut self, name: impl Into<String>, arity: usize) -> Self {
        self.path.push(TypeSegment::new(name, arity));
        self
    }

    /// Replace the generic arguments.
    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.args = args;
        self
    }

    /// Declare generic arity on the innermost segment without closing it.
    pub fn with_arity(mut self, arity: usize) -> Self {
        if let Some(last) = self.path.last_mut() {
            last.arity = arity;
        }
        self
    }

    /// Simple (innermost) type name.
    pub fn simple_name(&self) -> &str {
        self.path.last().map(|s| s.name.as_str()).unwrap_or("")
    }

    /// Total generic arity accumulated across the nested path.
    pub fn total_arity(&self) -> usize {
        self.path.iter().map(|s| s.arity).sum()
    }

    /// Whether this reference carries concrete generic arguments.
    pub fn is_closed(&self) -> bool {
        !self.args.is_empty()
    }

    /// The open generic definition: same namespace and path, no arguments.
    ///
    /// For a non-generic type this is a plain copy.
    pub fn definition(&self) -> NamedType {
        NamedType {
            namespace: self.namespace.clone(),
            path: self.path.clone(),
            args: Vec::new(),
        }
    }

    /// Deterministic identity of the open definition.
    ///
    /// Arguments do not participate, so a closed instantiation and its
    /// definition share a key.
    pub fn key(&self) -> TypeKey {
        TypeKey::from_named(self)
    }

    /// Re-close this type shape with another reference's arguments when the
    /// arities line up; otherwise keep it open.
    pub fn close_like(&self, other: &NamedType) -> NamedType {
        if self.total_arity() == other.total_arity() && other.is_closed() {
            NamedType {
                namespace: self.namespace.clone(),
                path: self.path.clone(),
                args: other.args.clone(),
            }
        } else {
            self.definition()
        }
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ns in &self.namespace {
            write!(f, "{ns}::")?;
        }
        for (i, seg) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, "::")?;
            }
            write!(f, "{}", seg.name)?;
        }
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// A semantic type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Nominal type (class, interface, primitive)
    Named(NamedType),
    /// Open generic parameter, referred to by name (e.g., "T")
    Param(String),
    /// Array type with element type and rank
    Array {
        /// Element type
        elem: Box<TypeRef>,
        /// Number of dimensions (1 for a plain array)
        rank: usize,
    },
}

impl TypeRef {
    /// Nominal type in a `::`-separated namespace.
    pub fn named(namespace: &str, name: impl Into<String>) -> Self {
        TypeRef::Named(NamedType::new(namespace, name))
    }

    /// Open generic parameter.
    pub fn param(name: impl Into<String>) -> Self {
        TypeRef::Param(name.into())
    }

    /// Single-dimensional array of `elem`.
    pub fn array(elem: TypeRef) -> Self {
        TypeRef::Array {
            elem: Box::new(elem),
            rank: 1,
        }
    }

    /// Array of `elem` with the given rank.
    pub fn array_with_rank(elem: TypeRef, rank: usize) -> Self {
        TypeRef::Array {
            elem: Box::new(elem),
            rank,
        }
    }

    /// The `bool` primitive.
    pub fn boolean() -> Self {
        TypeRef::Named(NamedType::global("bool"))
    }

    /// The `int` primitive.
    pub fn int() -> Self {
        TypeRef::Named(NamedType::global("int"))
    }

    /// The `long` primitive.
    pub fn long() -> Self {
        TypeRef::Named(NamedType::global("long"))
    }

    /// The `double` primitive.
    pub fn double() -> Self {
        TypeRef::Named(NamedType::global("double"))
    }

    /// The `string` primitive.
    pub fn string() -> Self {
        TypeRef::Named(NamedType::global("string"))
    }

    /// The nominal type behind this reference, if any.
    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            TypeRef::Named(named) => Some(named),
            _ => None,
        }
    }
}

impl From<NamedType> for TypeRef {
    fn from(named: NamedType) -> Self {
        TypeRef::Named(named)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(named) => write!(f, "{named}"),
            TypeRef::Param(name) => write!(f, "{name}"),
            TypeRef::Array { elem, rank } => {
                write!(f, "{elem}[")?;
                for _ in 1..*rank {
                    write!(f, ",")?;
                }
                write!(f, "]")
            }
        }
    }
}
