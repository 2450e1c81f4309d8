//! Generated-expression factory table.
//!
//! A code-generation collaborator materializes each virtual member's body as
//! a factory function and registers it here under a key produced by the
//! symbol namer. The table is populated during host setup and read-only
//! afterwards; factories are plain `fn` pointers, which is exactly the shape
//! generated code emits (no captures, no state).
//!
//! Generic members are handled at invocation rather than by constructing
//! closed factories: the [`FactoryContext`] carries the declaring type's
//! concrete arguments and the call-site's method arguments, and the factory
//! closes its body over them itself.

use rustc_hash::FxHashMap;

use veneer_core::{ExprArena, LambdaExpr, RegistryError, TypeRef};

/// Everything a factory needs to build a body: the arena to allocate into
/// plus the generic arguments the use-site closed over.
pub struct FactoryContext<'ast> {
    /// Arena the produced body must be allocated in.
    pub arena: &'ast ExprArena,
    /// Concrete generic arguments of the declaring type; empty when the
    /// declaring type is not generic.
    pub type_args: Vec<TypeRef>,
    /// Call-site generic arguments of the member itself; empty when the
    /// member is not generic.
    pub method_type_args: Vec<TypeRef>,
}

impl<'ast> FactoryContext<'ast> {
    /// Context with no generic arguments.
    pub fn new(arena: &'ast ExprArena) -> Self {
        Self {
            arena,
            type_args: Vec::new(),
            method_type_args: Vec::new(),
        }
    }

    /// Attach the declaring type's concrete arguments.
    pub fn with_type_args(mut self, args: Vec<TypeRef>) -> Self {
        self.type_args = args;
        self
    }

    /// Attach the call-site's method generic arguments.
    pub fn with_method_type_args(mut self, args: Vec<TypeRef>) -> Self {
        self.method_type_args = args;
        self
    }

    /// Declaring-type argument at `index`, if closed.
    pub fn type_arg(&self, index: usize) -> Option<&TypeRef> {
        self.type_args.get(index)
    }

    /// Method generic argument at `index`, if closed.
    pub fn method_type_arg(&self, index: usize) -> Option<&TypeRef> {
        self.method_type_args.get(index)
    }
}

/// A generated expression factory.
///
/// Invoked by the resolver to obtain a member's body as a parameterized
/// lambda allocated in the caller's arena.
pub type ExpressionFactory = for<'ast> fn(&FactoryContext<'ast>) -> &'ast LambdaExpr<'ast>;

/// Name-keyed factory table.
///
/// Keys are produced exclusively by the symbol namer, so the namer and the
/// code-generation collaborator agree on a single key space. Populated once
/// during host setup; shared freely afterwards (lookup takes `&self`).
#[derive(Default)]
pub struct FactoryRegistry {
    factories: FxHashMap<String, ExpressionFactory>,
}

impl FactoryRegistry {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a namer-produced key.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: ExpressionFactory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(RegistryError::DuplicateFactory(name));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Look up a factory by key.
    pub fn lookup(&self, name: &str) -> Option<ExpressionFactory> {
        self.factories.get(name).copied()
    }

    /// Whether a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_core::{Expr, NamedType};

    fn identity_body<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
        let arena = ctx.arena;
        let this = arena.param(Some("this"), TypeRef::Named(NamedType::global("Order")));
        arena.lambda(&[this], Expr::Param(this))
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = FactoryRegistry::new();
        registry.register("Order_Total", identity_body).unwrap();

        assert!(registry.contains("Order_Total"));
        let factory = registry.lookup("Order_Total").unwrap();

        let arena = ExprArena::new();
        let ctx = FactoryContext::new(&arena);
        let lambda = factory(&ctx);
        assert_eq!(lambda.params.len(), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = FactoryRegistry::new();
        registry.register("Order_Total", identity_body).unwrap();
        let err = registry.register("Order_Total", identity_body).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateFactory("Order_Total".to_string())
        );
    }

    #[test]
    fn missing_lookup_is_none() {
        let registry = FactoryRegistry::new();
        assert!(registry.lookup("Nope").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn context_carries_generic_arguments() {
        let arena = ExprArena::new();
        let ctx = FactoryContext::new(&arena)
            .with_type_args(vec![TypeRef::int()])
            .with_method_type_args(vec![TypeRef::string()]);
        assert_eq!(ctx.type_arg(0), Some(&TypeRef::int()));
        assert_eq!(ctx.method_type_arg(0), Some(&TypeRef::string()));
        assert!(ctx.type_arg(1).is_none());
    }
}
