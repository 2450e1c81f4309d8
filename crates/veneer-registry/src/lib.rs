//! Host-facing registries for veneer.
//!
//! Two read-mostly tables populated during host setup:
//!
//! - [`TypeRegistry`]: the type model — hierarchy, member declarations,
//!   expansion markers, inline-body providers. The marker authority the
//!   engine consults before any lookup.
//! - [`FactoryRegistry`]: the generated-expression table — namer-produced
//!   key to body factory, the product of a code-generation collaborator.
//!
//! Both are plain `&self` lookups after setup and are shared freely across
//! engine instances.

pub mod factories;
pub mod model;

pub use factories::{ExpressionFactory, FactoryContext, FactoryRegistry};
pub use model::{ExpandMarker, MemberDef, TypeEntry, TypeKind, TypeRegistry};
