//! Core data model for veneer: expression trees, semantic type references,
//! member identities, deterministic keys, and error types.
//!
//! ## Modules
//!
//! - [`arena`]: Arena allocation for expression trees
//! - [`expr`]: Expression tree nodes
//! - [`ops`]: Binary and unary operator enums
//! - [`types`]: Semantic type references
//! - [`member`]: Member identity (the expansion cache key)
//! - [`key`]: Deterministic type/signature hashes
//! - [`error`]: Unified error types

pub mod arena;
pub mod error;
pub mod expr;
pub mod key;
pub mod member;
pub mod ops;
pub mod types;

pub use arena::ExprArena;
pub use error::{ExpandError, RegistryError, VeneerError};
pub use expr::{
    BinaryExpr, CallExpr, ConditionalExpr, Expr, LambdaExpr, LiteralExpr, LiteralValue,
    MemberExpr, NewArrayExpr, ParamExpr, UnaryExpr,
};
pub use key::{SigKey, TypeKey};
pub use member::{MemberFlags, MemberKind, MemberRef};
pub use ops::{BinaryOp, UnaryOp};
pub use types::{NamedType, TypeRef, TypeSegment};
