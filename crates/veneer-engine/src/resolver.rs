//! Symbol resolver: member identity to expression body.
//!
//! The resolver answers one question: does this member have an expression
//! body, and if so, what is it? A member with no expansion marker resolves
//! to "not virtual" without any lookup. A marked member resolves through two
//! paths, in order:
//!
//! 1. **Inline body** — the marker names a co-located expression provider on
//!    the declaring type. Used only when the provided lambda's shape matches
//!    the member's declared shape exactly; a mismatched provider is treated
//!    as absent and lookup falls through.
//! 2. **Generated factory** — the declaring type is normalized to its open
//!    generic definition, the symbol namer produces the lookup key (using
//!    the definition's parameter types, so open positions encode by
//!    parameter name), and the factory table is consulted. The original
//!    concrete type arguments, and the call-site's method generic
//!    arguments, are handed to the factory so it can close the body itself.
//!
//! A marked member that neither path can satisfy is a hard resolution
//! failure naming the fully-qualified member: a code-generation omission on
//! the host side, not a normal runtime condition.
//!
//! The resolver is stateless; per-member memoization lives in the engine
//! instance that owns the expansion pass.

use veneer_core::{
    ExpandError, ExprArena, LambdaExpr, MemberKind, MemberRef, ParamExpr, TypeRef,
};
use veneer_registry::{FactoryContext, FactoryRegistry, TypeRegistry};

use crate::namer;

/// Resolves member identities to expression bodies.
pub struct ExpressionResolver<'reg> {
    types: &'reg TypeRegistry,
    factories: &'reg FactoryRegistry,
}

impl<'reg> ExpressionResolver<'reg> {
    /// Create a resolver over the host's registries.
    pub fn new(types: &'reg TypeRegistry, factories: &'reg FactoryRegistry) -> Self {
        Self { types, factories }
    }

    /// Resolve a member to its expression body.
    ///
    /// Returns `Ok(None)` when the member carries no expansion marker,
    /// `Ok(Some(body))` when a body was found, and an error when the marker
    /// is present but no body can be located by either path.
    pub fn resolve<'ast>(
        &self,
        arena: &'ast ExprArena,
        member: &MemberRef,
    ) -> Result<Option<&'ast LambdaExpr<'ast>>, ExpandError> {
        let Some(marker) = self.types.marker(member) else {
            return Ok(None);
        };

        if let Some(body_name) = marker.use_member_body.clone() {
            if let Some(lambda) = self.inline_body(arena, member, &body_name) {
                return Ok(Some(lambda));
            }
        }

        if let Some(lambda) = self.generated_body(arena, member) {
            return Ok(Some(lambda));
        }

        Err(ExpandError::UnresolvedVirtualMember {
            member: member.fully_qualified_name(),
        })
    }

    /// Inline-body path: invoke the named provider and accept its lambda
    /// only when the shape matches the member's declared shape.
    fn inline_body<'ast>(
        &self,
        arena: &'ast ExprArena,
        member: &MemberRef,
        body_name: &str,
    ) -> Option<&'ast LambdaExpr<'ast>> {
        let factory = self
            .types
            .inline_body(&member.declaring_type, body_name)?;
        let ctx = FactoryContext::new(arena)
            .with_type_args(member.declaring_type.args.clone())
            .with_method_type_args(member.type_args.clone());
        let lambda = factory(&ctx);
        self.validate_inline_shape(arena, member, lambda)
    }

    /// Shape check for an inline body.
    ///
    /// Instance properties take exactly the receiver; static members take no
    /// receiver. Instance methods accept the receiver in first or last
    /// position — receiver-last providers are normalized to the canonical
    /// receiver-first order so binding at use-sites is uniform.
    fn validate_inline_shape<'ast>(
        &self,
        arena: &'ast ExprArena,
        member: &MemberRef,
        lambda: &'ast LambdaExpr<'ast>,
    ) -> Option<&'ast LambdaExpr<'ast>> {
        if lambda.body.ty() != member.return_type {
            return None;
        }

        let is_receiver = |param: &ParamExpr| match &param.ty {
            TypeRef::Named(named) => named.key() == member.declaring_type.key(),
            _ => false,
        };
        let params_match = |params: &[&ParamExpr]| {
            params.len() == member.param_types.len()
                && params
                    .iter()
                    .zip(&member.param_types)
                    .all(|(param, declared)| &param.ty == declared)
        };

        match (member.kind, member.is_static()) {
            (MemberKind::Property, false) => {
                (lambda.params.len() == 1 && is_receiver(lambda.params[0])).then_some(lambda)
            }
            (MemberKind::Property, true) => lambda.params.is_empty().then_some(lambda),
            (MemberKind::Method, false) => {
                let own = member.param_types.len();
                if lambda.params.len() != own + 1 {
                    return None;
                }
                if is_receiver(lambda.params[0]) && params_match(&lambda.params[1..]) {
                    return Some(lambda);
                }
                if is_receiver(lambda.params[own]) && params_match(&lambda.params[..own]) {
                    // Receiver-last form: rotate the receiver to the front.
                    let mut reordered = Vec::with_capacity(own + 1);
                    reordered.push(lambda.params[own]);
                    reordered.extend_from_slice(&lambda.params[..own]);
                    return Some(arena.lambda(&reordered, lambda.body));
                }
                None
            }
            (MemberKind::Method, true) => params_match(lambda.params).then_some(lambda),
        }
    }

    /// Generated-factory path: normalize to the open definition, encode the
    /// lookup key, and re-close via the factory context.
    fn generated_body<'ast>(
        &self,
        arena: &'ast ExprArena,
        member: &MemberRef,
    ) -> Option<&'ast LambdaExpr<'ast>> {
        let definition = member.declaring_type.definition();
        let parameter_types = match member.kind {
            MemberKind::Method => Some(member.param_types.as_slice()),
            MemberKind::Property => None,
        };
        let key = namer::generate_full_name(
            &definition.namespace,
            &definition.path,
            &member.name,
            parameter_types,
        );

        let factory = self.factories.lookup(&key)?;
        let ctx = FactoryContext::new(arena)
            .with_type_args(member.declaring_type.args.clone())
            .with_method_type_args(member.type_args.clone());
        Some(factory(&ctx))
    }
}
