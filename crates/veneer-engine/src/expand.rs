//! The expansion engine.
//!
//! [`Expander::expand`] rewrites an arbitrary expression tree into one with
//! no virtual-member use-sites remaining. For every member-access and call
//! node it:
//!
//! 1. re-anchors the member identity to the most-derived declaration
//!    reachable from the receiver's static type (overriding declarations
//!    and interface implementations supply the body, not the base
//!    declaration),
//! 2. asks the resolver for the member's body, memoizing the answer —
//!    including "not virtual" — per member identity for the lifetime of
//!    this engine instance,
//! 3. binds the body's formal parameters to the receiver and arguments,
//!    substitutes, and immediately re-expands the substituted body so
//!    nested virtual members expand in the same pass.
//!
//! Non-candidate nodes are rewritten structurally, reconstructing a node
//! only when a child changed; unchanged subtrees keep their identity.
//!
//! Expansion chains that re-enter a member already being expanded are
//! cycles; the engine tracks an explicit in-progress stack and fails with a
//! descriptive [`ExpandError::ExpansionCycle`] instead of recursing without
//! bound.
//!
//! One engine instance serves one arena and must not be shared across
//! threads; the registries it borrows are read-only and shared freely.

use rustc_hash::FxHashMap;

use veneer_core::{
    CallExpr, ExpandError, Expr, ExprArena, LambdaExpr, MemberExpr, MemberRef, NamedType, SigKey,
    TypeKey, TypeRef,
};
use veneer_registry::{FactoryRegistry, TypeRegistry};

use crate::resolver::ExpressionResolver;
use crate::substitute::{ArgumentReplacer, ParameterBindings};

/// Rewrites expression trees until no virtual-member use-sites remain.
pub struct Expander<'ast, 'reg> {
    arena: &'ast ExprArena,
    resolver: ExpressionResolver<'reg>,
    types: &'reg TypeRegistry,
    /// Per-member resolution results; `None` = resolved, not virtual.
    cache: FxHashMap<MemberRef, Option<&'ast LambdaExpr<'ast>>>,
    /// Overriding-declaration resolution per (receiver type, signature).
    dispatch: FxHashMap<(TypeKey, SigKey), MemberRef>,
    /// Scratch binding map, cleared after every substitution.
    bindings: ParameterBindings<'ast>,
    /// Members currently being expanded on this recursion stack.
    in_progress: Vec<MemberRef>,
}

impl<'ast, 'reg> Expander<'ast, 'reg> {
    /// Create an engine over an arena and the host's registries.
    pub fn new(
        arena: &'ast ExprArena,
        types: &'reg TypeRegistry,
        factories: &'reg FactoryRegistry,
    ) -> Self {
        Self {
            arena,
            resolver: ExpressionResolver::new(types, factories),
            types,
            cache: FxHashMap::default(),
            dispatch: FxHashMap::default(),
            bindings: ParameterBindings::new(),
            in_progress: Vec::new(),
        }
    }

    /// Expand every virtual-member use-site in `expr`.
    ///
    /// Idempotent: re-expanding an already-expanded tree returns it
    /// unchanged (and, subtree for subtree, reference-identical).
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn expand(&mut self, expr: Expr<'ast>) -> Result<Expr<'ast>, ExpandError> {
        self.visit(expr)
    }

    fn visit(&mut self, expr: Expr<'ast>) -> Result<Expr<'ast>, ExpandError> {
        match expr {
            Expr::Literal(_) | Expr::Param(_) => Ok(expr),
            Expr::Member(node) => self.visit_member(node, expr),
            Expr::Call(node) => self.visit_call(node, expr),
            Expr::Binary(node) => {
                let left = self.visit(node.left)?;
                let right = self.visit(node.right)?;
                if left.ptr_eq(node.left) && right.ptr_eq(node.right) {
                    Ok(expr)
                } else {
                    Ok(self.arena.binary(left, node.op, right))
                }
            }
            Expr::Unary(node) => {
                let operand = self.visit(node.operand)?;
                if operand.ptr_eq(node.operand) {
                    Ok(expr)
                } else {
                    Ok(self.arena.unary(node.op, operand))
                }
            }
            Expr::Conditional(node) => {
                let condition = self.visit(node.condition)?;
                let then_branch = self.visit(node.then_branch)?;
                let else_branch = self.visit(node.else_branch)?;
                if condition.ptr_eq(node.condition)
                    && then_branch.ptr_eq(node.then_branch)
                    && else_branch.ptr_eq(node.else_branch)
                {
                    Ok(expr)
                } else {
                    Ok(self
                        .arena
                        .conditional(condition, then_branch, else_branch))
                }
            }
            Expr::Lambda(node) => {
                let body = self.visit(node.body)?;
                if body.ptr_eq(node.body) {
                    Ok(expr)
                } else {
                    Ok(self.arena.lambda_expr(node.params, body))
                }
            }
            Expr::NewArray(node) => {
                let mut elems = Vec::with_capacity(node.elems.len());
                for elem in node.elems {
                    elems.push(self.visit(*elem)?);
                }
                let changed = elems
                    .iter()
                    .zip(node.elems)
                    .any(|(new, old)| !new.ptr_eq(*old));
                if !changed {
                    Ok(expr)
                } else {
                    Ok(self.arena.new_array(node.elem_ty.clone(), &elems))
                }
            }
        }
    }

    fn visit_member(
        &mut self,
        node: &'ast MemberExpr<'ast>,
        original: Expr<'ast>,
    ) -> Result<Expr<'ast>, ExpandError> {
        let member = match node.receiver {
            Some(receiver) => self.dispatch(&receiver.ty(), &node.member),
            None => node.member.clone(),
        };

        let Some(body) = self.body_for(&member)? else {
            // Not virtual: keep the node, still recurse into the receiver.
            return match node.receiver {
                Some(receiver) => {
                    let rewritten = self.visit(receiver)?;
                    if rewritten.ptr_eq(receiver) {
                        Ok(original)
                    } else {
                        Ok(self.arena.member(Some(rewritten), node.member.clone()))
                    }
                }
                None => Ok(original),
            };
        };

        match node.receiver {
            Some(receiver) => {
                if body.params.len() != 1 {
                    return Err(ExpandError::ArityMismatch {
                        member: member.fully_qualified_name(),
                        expected: body.params.len(),
                        got: 1,
                    });
                }
                self.bindings.bind(body.params[0], receiver);
                let substituted =
                    ArgumentReplacer::new(self.arena, &mut self.bindings).visit(body.body);
                self.bindings.clear();
                self.expand_body(&member, substituted)
            }
            None => {
                if !body.params.is_empty() {
                    return Err(ExpandError::ArityMismatch {
                        member: member.fully_qualified_name(),
                        expected: body.params.len(),
                        got: 0,
                    });
                }
                self.expand_body(&member, body.body)
            }
        }
    }

    fn visit_call(
        &mut self,
        node: &'ast CallExpr<'ast>,
        original: Expr<'ast>,
    ) -> Result<Expr<'ast>, ExpandError> {
        let member = match node.receiver {
            Some(receiver) => self.dispatch(&receiver.ty(), &node.method),
            None => node.method.clone(),
        };

        let Some(body) = self.body_for(&member)? else {
            // Not virtual: keep the node, still recurse into receiver and
            // arguments.
            let receiver = match node.receiver {
                Some(receiver) => Some(self.visit(receiver)?),
                None => None,
            };
            let mut args = Vec::with_capacity(node.args.len());
            for arg in node.args {
                args.push(self.visit(*arg)?);
            }
            let receiver_changed = match (receiver, node.receiver) {
                (Some(new), Some(old)) => !new.ptr_eq(old),
                _ => false,
            };
            let args_changed = args
                .iter()
                .zip(node.args)
                .any(|(new, old)| !new.ptr_eq(*old));
            return if !receiver_changed && !args_changed {
                Ok(original)
            } else {
                Ok(self.arena.call(receiver, node.method.clone(), &args))
            };
        };

        let receiver_slots = usize::from(node.receiver.is_some());
        if body.params.len() != node.args.len() + receiver_slots {
            return Err(ExpandError::ArityMismatch {
                member: member.fully_qualified_name(),
                expected: body.params.len().saturating_sub(receiver_slots),
                got: node.args.len(),
            });
        }

        for (index, &param) in body.params.iter().enumerate() {
            let bound = match (index, node.receiver) {
                (0, Some(receiver)) => receiver,
                (_, Some(_)) => node.args[index - 1],
                (_, None) => node.args[index],
            };
            self.bindings.bind(param, bound);
        }
        let substituted = ArgumentReplacer::new(self.arena, &mut self.bindings).visit(body.body);
        self.bindings.clear();
        self.expand_body(&member, substituted)
    }

    /// Re-expand a substituted body, guarding against expansion cycles.
    fn expand_body(
        &mut self,
        member: &MemberRef,
        body: Expr<'ast>,
    ) -> Result<Expr<'ast>, ExpandError> {
        if self.in_progress.contains(member) {
            let mut chain: Vec<String> = self
                .in_progress
                .iter()
                .map(MemberRef::fully_qualified_name)
                .collect();
            chain.push(member.fully_qualified_name());
            return Err(ExpandError::ExpansionCycle { chain });
        }
        self.in_progress.push(member.clone());
        let result = self.visit(body);
        self.in_progress.pop();
        result
    }

    /// Resolution result for a member, memoized per engine instance.
    fn body_for(
        &mut self,
        member: &MemberRef,
    ) -> Result<Option<&'ast LambdaExpr<'ast>>, ExpandError> {
        if let Some(cached) = self.cache.get(member) {
            return Ok(*cached);
        }
        let resolved = self.resolver.resolve(self.arena, member)?;
        self.cache.insert(member.clone(), resolved);
        Ok(resolved)
    }

    /// Re-anchor a member identity to the most-derived declaration of its
    /// signature reachable from the receiver's static type.
    ///
    /// Applies to overridable members and to members declared on an
    /// interface the receiver implements; everything else dispatches
    /// statically. Resolution is memoized per (receiver type, signature).
    fn dispatch(&mut self, receiver_ty: &TypeRef, member: &MemberRef) -> MemberRef {
        let Some(receiver) = receiver_ty.as_named() else {
            return member.clone();
        };
        if receiver.key() == member.declaring_type.key() {
            return member.clone();
        }

        let on_interface = self.types.is_interface(&member.declaring_type);
        if !member.is_overridable() && !on_interface {
            return member.clone();
        }
        if on_interface && !self.chain_implements(receiver, member.declaring_type.key()) {
            return member.clone();
        }

        let cache_key = (receiver.key(), member.sig_key());
        if let Some(anchored) = self.dispatch.get(&cache_key) {
            return Self::close_declaring(anchored, receiver);
        }

        let mut current = Some(receiver.definition());
        while let Some(ty) = current {
            let Some(entry) = self.types.entry(&ty) else {
                break;
            };
            if let Some(def) = entry.find_member(member) {
                let anchored = member.anchored_to(entry.ty().clone(), def.flags);
                self.dispatch.insert(cache_key, anchored.clone());
                return Self::close_declaring(&anchored, receiver);
            }
            current = entry.base().cloned();
        }

        member.clone()
    }

    /// Whether the receiver's chain declares the interface.
    fn chain_implements(&self, receiver: &NamedType, interface: TypeKey) -> bool {
        let mut current = Some(receiver.definition());
        while let Some(ty) = current {
            let Some(entry) = self.types.entry(&ty) else {
                return false;
            };
            if entry.interfaces().iter().any(|i| i.key() == interface) {
                return true;
            }
            current = entry.base().cloned();
        }
        false
    }

    /// Close a dispatch-cached identity over the receiver's concrete
    /// arguments. The cache is keyed by definition, so the arguments are
    /// re-applied per use-site.
    fn close_declaring(anchored: &MemberRef, receiver: &NamedType) -> MemberRef {
        let mut closed = anchored.clone();
        closed.declaring_type = anchored.declaring_type.close_like(receiver);
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_core::BinaryOp;
    use veneer_registry::{FactoryContext, MemberDef, TypeEntry};

    fn order() -> NamedType {
        NamedType::new("App", "Order")
    }

    fn order_ty() -> TypeRef {
        TypeRef::Named(order())
    }

    fn amount_of<'ast>(arena: &'ast ExprArena, receiver: Expr<'ast>) -> Expr<'ast> {
        arena.member(
            Some(receiver),
            MemberRef::property(order(), "Amount", TypeRef::int()),
        )
    }

    // |this| this.Amount + 1
    fn total_factory<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
        let arena = ctx.arena;
        let this = arena.param(Some("this"), TypeRef::Named(NamedType::new("App", "Order")));
        let body = arena.binary(
            amount_of(arena, Expr::Param(this)),
            BinaryOp::Add,
            arena.int(1),
        );
        arena.lambda(&[this], body)
    }

    fn setup() -> (TypeRegistry, FactoryRegistry) {
        let mut types = TypeRegistry::new();
        types
            .register(
                TypeEntry::class(order())
                    .with_member(MemberDef::property("Amount", TypeRef::int()))
                    .with_member(MemberDef::property("Total", TypeRef::int()).expandable()),
            )
            .unwrap();
        let mut factories = FactoryRegistry::new();
        factories
            .register("veneer::generated::App_Order_Total", total_factory)
            .unwrap();
        (types, factories)
    }

    #[test]
    fn expands_property_access() {
        let (types, factories) = setup();
        let arena = ExprArena::new();
        let mut expander = Expander::new(&arena, &types, &factories);

        let x = arena.param(Some("x"), order_ty());
        let tree = arena.member(
            Some(Expr::Param(x)),
            MemberRef::property(order(), "Total", TypeRef::int()),
        );

        let expanded = expander.expand(tree).unwrap();
        match expanded {
            Expr::Binary(b) => {
                assert_eq!(b.op, BinaryOp::Add);
                // Receiver substituted by reference, not by copy
                match b.left {
                    Expr::Member(m) => assert!(m.receiver.unwrap().ptr_eq(Expr::Param(x))),
                    _ => panic!("expected member access"),
                }
            }
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn non_virtual_member_is_left_alone() {
        let (types, factories) = setup();
        let arena = ExprArena::new();
        let mut expander = Expander::new(&arena, &types, &factories);

        let x = arena.param(Some("x"), order_ty());
        let tree = amount_of(&arena, Expr::Param(x));

        let expanded = expander.expand(tree).unwrap();
        assert!(expanded.ptr_eq(tree));
    }

    #[test]
    fn virtual_receiver_of_non_virtual_member_is_still_expanded() {
        // Parent is virtual with an identity body; Amount is plain.
        // x.Parent.Amount must collapse to x.Amount.
        let mut types = TypeRegistry::new();
        types
            .register(
                TypeEntry::class(order())
                    .with_member(MemberDef::property("Amount", TypeRef::int()))
                    .with_member(
                        MemberDef::property("Parent", TypeRef::Named(order())).expandable(),
                    ),
            )
            .unwrap();
        fn parent_factory<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
            let arena = ctx.arena;
            let this = arena.param(Some("this"), TypeRef::Named(NamedType::new("App", "Order")));
            arena.lambda(&[this], Expr::Param(this))
        }
        let mut factories = FactoryRegistry::new();
        factories
            .register("veneer::generated::App_Order_Parent", parent_factory)
            .unwrap();

        let arena = ExprArena::new();
        let mut expander = Expander::new(&arena, &types, &factories);

        let x = arena.param(Some("x"), order_ty());
        let parent = arena.member(
            Some(Expr::Param(x)),
            MemberRef::property(order(), "Parent", TypeRef::Named(order())),
        );
        let tree = amount_of(&arena, parent);

        let expanded = expander.expand(tree).unwrap();
        // x.Parent.Amount -> x.Amount (Parent's body is identity)
        match expanded {
            Expr::Member(m) => {
                assert_eq!(m.member.name, "Amount");
                assert!(m.receiver.unwrap().ptr_eq(Expr::Param(x)));
            }
            _ => panic!("expected member access"),
        }
    }

    #[test]
    fn method_call_binds_receiver_then_arguments() {
        // Offset(n) => |this, n| this.Amount + n
        fn offset_factory<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
            let arena = ctx.arena;
            let this = arena.param(Some("this"), TypeRef::Named(NamedType::new("App", "Order")));
            let n = arena.param(Some("n"), TypeRef::int());
            let body = arena.binary(
                amount_of(arena, Expr::Param(this)),
                BinaryOp::Add,
                Expr::Param(n),
            );
            arena.lambda(&[this, n], body)
        }

        let mut types = TypeRegistry::new();
        types
            .register(
                TypeEntry::class(order())
                    .with_member(MemberDef::property("Amount", TypeRef::int()))
                    .with_member(
                        MemberDef::method("Offset", vec![TypeRef::int()], TypeRef::int())
                            .expandable(),
                    ),
            )
            .unwrap();
        let mut factories = FactoryRegistry::new();
        factories
            .register(
                "veneer::generated::App_Order_Offset_P0_int",
                offset_factory,
            )
            .unwrap();

        let arena = ExprArena::new();
        let mut expander = Expander::new(&arena, &types, &factories);

        let y = arena.param(Some("y"), order_ty());
        let call = arena.call(
            Some(Expr::Param(y)),
            MemberRef::method(order(), "Offset", vec![TypeRef::int()], TypeRef::int()),
            &[arena.int(5)],
        );

        let expanded = expander.expand(call).unwrap();
        match expanded {
            Expr::Binary(b) => {
                match b.left {
                    Expr::Member(m) => assert!(m.receiver.unwrap().ptr_eq(Expr::Param(y))),
                    _ => panic!("expected member access"),
                }
                assert_eq!(b.right, arena.int(5));
            }
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn argument_arity_mismatch_fails_fast() {
        // Factory for a method that declares one parameter but whose body
        // takes none besides the receiver: a resolver contract violation.
        fn broken_factory<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
            let arena = ctx.arena;
            let this = arena.param(Some("this"), TypeRef::Named(NamedType::new("App", "Order")));
            arena.lambda(&[this], arena.int(0))
        }
        let mut types = TypeRegistry::new();
        let mut factories = FactoryRegistry::new();
        types
            .register(
                TypeEntry::class(order()).with_member(
                    MemberDef::method("Broken", vec![TypeRef::int()], TypeRef::int())
                        .expandable(),
                ),
            )
            .unwrap();
        factories
            .register(
                "veneer::generated::App_Order_Broken_P0_int",
                broken_factory,
            )
            .unwrap();

        let arena = ExprArena::new();
        let mut expander = Expander::new(&arena, &types, &factories);

        let y = arena.param(Some("y"), order_ty());
        let call = arena.call(
            Some(Expr::Param(y)),
            MemberRef::method(order(), "Broken", vec![TypeRef::int()], TypeRef::int()),
            &[arena.int(5)],
        );

        let err = expander.expand(call).unwrap_err();
        assert!(matches!(err, ExpandError::ArityMismatch { .. }));
    }

    #[test]
    fn static_method_binds_positionally() {
        // Order::Scale(n) => |n| n * 2, no receiver parameter
        fn scale_factory<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
            let arena = ctx.arena;
            let n = arena.param(Some("n"), TypeRef::int());
            let body = arena.binary(Expr::Param(n), BinaryOp::Multiply, arena.int(2));
            arena.lambda(&[n], body)
        }

        let mut types = TypeRegistry::new();
        types
            .register(
                TypeEntry::class(order()).with_member(
                    MemberDef::method("Scale", vec![TypeRef::int()], TypeRef::int())
                        .static_member()
                        .expandable(),
                ),
            )
            .unwrap();
        let mut factories = FactoryRegistry::new();
        factories
            .register("veneer::generated::App_Order_Scale_P0_int", scale_factory)
            .unwrap();

        let arena = ExprArena::new();
        let mut expander = Expander::new(&arena, &types, &factories);

        let call = arena.call(
            None,
            MemberRef::method(order(), "Scale", vec![TypeRef::int()], TypeRef::int())
                .static_member(),
            &[arena.int(21)],
        );

        let expanded = expander.expand(call).unwrap();
        match expanded {
            Expr::Binary(b) => {
                assert_eq!(b.left, arena.int(21));
                assert_eq!(b.op, BinaryOp::Multiply);
            }
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn self_referential_member_is_a_cycle() {
        // Loop => |this| this.Loop + 1
        fn loop_factory<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
            let arena = ctx.arena;
            let order = NamedType::new("App", "Order");
            let this = arena.param(Some("this"), TypeRef::Named(order.clone()));
            let again = arena.member(
                Some(Expr::Param(this)),
                MemberRef::property(order, "Loop", TypeRef::int()),
            );
            arena.lambda(&[this], arena.binary(again, BinaryOp::Add, arena.int(1)))
        }

        let mut types = TypeRegistry::new();
        types
            .register(
                TypeEntry::class(order())
                    .with_member(MemberDef::property("Loop", TypeRef::int()).expandable()),
            )
            .unwrap();
        let mut factories = FactoryRegistry::new();
        factories
            .register("veneer::generated::App_Order_Loop", loop_factory)
            .unwrap();

        let arena = ExprArena::new();
        let mut expander = Expander::new(&arena, &types, &factories);

        let x = arena.param(Some("x"), order_ty());
        let tree = arena.member(
            Some(Expr::Param(x)),
            MemberRef::property(order(), "Loop", TypeRef::int()),
        );

        let err = expander.expand(tree).unwrap_err();
        match err {
            ExpandError::ExpansionCycle { chain } => {
                assert_eq!(chain.first().map(String::as_str), Some("App::Order::Loop"));
                assert_eq!(chain.last().map(String::as_str), Some("App::Order::Loop"));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn overriding_declaration_supplies_the_body() {
        // Entity.Describe is overridable and expandable; Order overrides
        // it. A call-site declared against Entity but received on Order
        // must use Order's body.
        let entity = NamedType::new("App", "Entity");

        fn entity_factory<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
            let arena = ctx.arena;
            let this = arena.param(
                Some("this"),
                TypeRef::Named(NamedType::new("App", "Entity")),
            );
            arena.lambda(&[this], arena.string("entity"))
        }
        fn order_factory<'ast>(ctx: &FactoryContext<'ast>) -> &'ast LambdaExpr<'ast> {
            let arena = ctx.arena;
            let this = arena.param(Some("this"), TypeRef::Named(NamedType::new("App", "Order")));
            arena.lambda(&[this], arena.string("order"))
        }

        let mut types = TypeRegistry::new();
        types
            .register(TypeEntry::class(entity.clone()).with_member(
                MemberDef::property("Describe", TypeRef::string())
                    .overridable()
                    .expandable(),
            ))
            .unwrap();
        types
            .register(
                TypeEntry::class(order()).with_base(entity.clone()).with_member(
                    MemberDef::property("Describe", TypeRef::string())
                        .overridable()
                        .expandable(),
                ),
            )
            .unwrap();
        let mut factories = FactoryRegistry::new();
        factories
            .register("veneer::generated::App_Entity_Describe", entity_factory)
            .unwrap();
        factories
            .register("veneer::generated::App_Order_Describe", order_factory)
            .unwrap();

        let arena = ExprArena::new();
        let mut expander = Expander::new(&arena, &types, &factories);

        let x = arena.param(Some("x"), order_ty());
        let tree = arena.member(
            Some(Expr::Param(x)),
            MemberRef::property(entity.clone(), "Describe", TypeRef::string()).overridable(),
        );

        let expanded = expander.expand(tree).unwrap();
        assert_eq!(expanded, arena.string("order"));

        // Same member on an Entity-typed receiver keeps the base body
        let e = arena.param(Some("e"), TypeRef::Named(entity.clone()));
        let base_site = arena.member(
            Some(Expr::Param(e)),
            MemberRef::property(entity, "Describe", TypeRef::string()).overridable(),
        );
        let mut fresh = Expander::new(&arena, &types, &factories);
        let expanded = fresh.expand(base_site).unwrap();
        assert_eq!(expanded, arena.string("entity"));
    }

    #[test]
    fn interface_member_re_anchors_to_implementation() {
        let iface = NamedType::new("App", "IHasTotal");

        let mut types = TypeRegistry::new();
        types
            .register(
                TypeEntry::interface(iface.clone())
                    .with_member(MemberDef::property("Total", TypeRef::int())),
            )
            .unwrap();
        types
            .register(
                TypeEntry::class(order())
                    .with_member(MemberDef::property("Amount", TypeRef::int()))
                    .with_member(MemberDef::property("Total", TypeRef::int()).expandable())
                    .implements(iface.clone()),
            )
            .unwrap();
        let mut factories = FactoryRegistry::new();
        factories
            .register("veneer::generated::App_Order_Total", total_factory)
            .unwrap();

        let arena = ExprArena::new();
        let mut expander = Expander::new(&arena, &types, &factories);

        // Use-site declared against the interface, receiver typed Order
        let x = arena.param(Some("x"), order_ty());
        let tree = arena.member(
            Some(Expr::Param(x)),
            MemberRef::property(iface, "Total", TypeRef::int()),
        );

        let expanded = expander.expand(tree).unwrap();
        assert!(matches!(expanded, Expr::Binary(_)));
    }
}
