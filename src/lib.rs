//! veneer — virtual computed members for expression trees.
//!
//! A *virtual member* is a property or method whose declared shape is a
//! contract and whose behavior is a separately registered expression body.
//! [`Expander`] rewrites any expression tree so that every use-site of such
//! a member is replaced by its body, with the use-site's receiver and
//! arguments substituted for the body's formal parameters — recursively,
//! until no virtual members remain.
//!
//! The host supplies two read-only registries: a [`TypeRegistry`] describing
//! types, members, and expansion markers, and a [`FactoryRegistry`] mapping
//! namer-produced keys to generated body factories.
//!
//! # Example
//!
//! ```
//! use veneer::{
//!     BinaryOp, Expander, Expr, ExprArena, FactoryContext, FactoryRegistry, LambdaExpr,
//!     MemberDef, MemberRef, NamedType, TypeEntry, TypeRegistry, TypeRef,
//! };
//!
//! fn order() -> NamedType {
//!     NamedType::new("App", "Order")
//! }
//!
//! // Generated body for Order::Total: |this| this.Amount + 1
//! fn total<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
//!     let arena = ctx.arena;
//!     let this = arena.param(Some("this"), TypeRef::Named(order()));
//!     let amount = arena.member(
//!         Some(Expr::Param(this)),
//!         MemberRef::property(order(), "Amount", TypeRef::int()),
//!     );
//!     arena.lambda(&[this], arena.binary(amount, BinaryOp::Add, arena.int(1)))
//! }
//!
//! let mut types = TypeRegistry::new();
//! types
//!     .register(
//!         TypeEntry::class(order())
//!             .with_member(MemberDef::property("Amount", TypeRef::int()))
//!             .with_member(MemberDef::property("Total", TypeRef::int()).expandable()),
//!     )
//!     .unwrap();
//! let mut factories = FactoryRegistry::new();
//! factories
//!     .register("veneer::generated::App_Order_Total", total)
//!     .unwrap();
//!
//! // x.Total  ==>  x.Amount + 1
//! let arena = ExprArena::new();
//! let x = arena.param(Some("x"), TypeRef::Named(order()));
//! let tree = arena.member(
//!     Some(Expr::Param(x)),
//!     MemberRef::property(order(), "Total", TypeRef::int()),
//! );
//!
//! let mut expander = Expander::new(&arena, &types, &factories);
//! let expanded = expander.expand(tree).unwrap();
//! assert!(matches!(expanded, Expr::Binary(_)));
//! ```

pub use veneer_core::{
    BinaryExpr, BinaryOp, CallExpr, ConditionalExpr, ExpandError, Expr, ExprArena, LambdaExpr,
    LiteralExpr, LiteralValue, MemberExpr, MemberFlags, MemberKind, MemberRef, NamedType,
    NewArrayExpr, ParamExpr, RegistryError, SigKey, TypeKey, TypeRef, TypeSegment, UnaryExpr,
    UnaryOp, VeneerError,
};
pub use veneer_engine::{namer, Expander, ExpressionResolver, ParameterBindings};
pub use veneer_registry::{
    ExpandMarker, ExpressionFactory, FactoryContext, FactoryRegistry, MemberDef, TypeEntry,
    TypeKind, TypeRegistry,
};
