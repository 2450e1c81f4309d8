//! Parameter substitution: applying a binding map to a body.
//!
//! [`ParameterBindings`] maps formal-parameter identities (addresses) to the
//! sub-expressions bound at a use-site; [`ArgumentReplacer`] walks a body
//! and replaces every reference to a mapped parameter with its binding.
//! Everything else is rewritten structurally, reconstructing a node only
//! when a child actually changed so untouched subtrees keep their identity.
//!
//! A binding map is scoped to a single substitution. The engine clears it
//! immediately after each use; parameter identities are only unique within
//! one body, so a leaked binding would silently misattribute parameters of
//! an unrelated body.
//!
//! Nested lambda literals that re-declare a mapped parameter shadow it:
//! the replacer never substitutes inside a lambda whose own parameter list
//! contains the mapped identity.

use rustc_hash::FxHashMap;

use veneer_core::{Expr, ExprArena, ParamExpr};

/// Address-identity key for a formal parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ParamKey(*const ParamExpr);

impl ParamKey {
    fn of(param: &ParamExpr) -> Self {
        Self(param as *const ParamExpr)
    }
}

/// Binding from formal parameters to substituting sub-expressions.
#[derive(Default)]
pub struct ParameterBindings<'ast> {
    map: FxHashMap<ParamKey, Expr<'ast>>,
}

impl<'ast> ParameterBindings<'ast> {
    /// Create an empty binding map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a parameter to the expression substituting it.
    pub fn bind(&mut self, param: &'ast ParamExpr, expr: Expr<'ast>) {
        self.map.insert(ParamKey::of(param), expr);
    }

    /// Remove all bindings.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no parameters are bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn get(&self, param: &ParamExpr) -> Option<Expr<'ast>> {
        self.map.get(&ParamKey::of(param)).copied()
    }

    fn remove(&mut self, param: &ParamExpr) -> Option<Expr<'ast>> {
        self.map.remove(&ParamKey::of(param))
    }
}

/// Rewrites a body, replacing bound parameter references.
pub struct ArgumentReplacer<'ast, 'b> {
    arena: &'ast ExprArena,
    bindings: &'b mut ParameterBindings<'ast>,
}

impl<'ast, 'b> ArgumentReplacer<'ast, 'b> {
    /// Create a replacer over a binding map.
    pub fn new(arena: &'ast ExprArena, bindings: &'b mut ParameterBindings<'ast>) -> Self {
        Self { arena, bindings }
    }

    /// Rewrite `expr`, substituting bound parameters.
    pub fn visit(&mut self, expr: Expr<'ast>) -> Expr<'ast> {
        match expr {
            Expr::Param(param) => self.bindings.get(param).unwrap_or(expr),
            Expr::Literal(_) => expr,
            Expr::Binary(node) => {
                let left = self.visit(node.left);
                let right = self.visit(node.right);
                if left.ptr_eq(node.left) && right.ptr_eq(node.right) {
                    expr
                } else {
                    self.arena.binary(left, node.op, right)
                }
            }
            Expr::Unary(node) => {
                let operand = self.visit(node.operand);
                if operand.ptr_eq(node.operand) {
                    expr
                } else {
                    self.arena.unary(node.op, operand)
                }
            }
            Expr::Conditional(node) => {
                let condition = self.visit(node.condition);
                let then_branch = self.visit(node.then_branch);
                let else_branch = self.visit(node.else_branch);
                if condition.ptr_eq(node.condition)
                    && then_branch.ptr_eq(node.then_branch)
                    && else_branch.ptr_eq(node.else_branch)
                {
                    expr
                } else {
                    self.arena.conditional(condition, then_branch, else_branch)
                }
            }
            Expr::Member(node) => match node.receiver {
                Some(receiver) => {
                    let rewritten = self.visit(receiver);
                    if rewritten.ptr_eq(receiver) {
                        expr
                    } else {
                        self.arena.member(Some(rewritten), node.member.clone())
                    }
                }
                None => expr,
            },
            Expr::Call(node) => {
                let receiver = node.receiver.map(|r| self.visit(r));
                let args: Vec<Expr<'ast>> = node.args.iter().map(|a| self.visit(*a)).collect();
                let receiver_changed = match (receiver, node.receiver) {
                    (Some(new), Some(old)) => !new.ptr_eq(old),
                    _ => false,
                };
                let args_changed = args
                    .iter()
                    .zip(node.args)
                    .any(|(new, old)| !new.ptr_eq(*old));
                if !receiver_changed && !args_changed {
                    expr
                } else {
                    self.arena.call(receiver, node.method.clone(), &args)
                }
            }
            Expr::NewArray(node) => {
                let elems: Vec<Expr<'ast>> = node.elems.iter().map(|e| self.visit(*e)).collect();
                let changed = elems
                    .iter()
                    .zip(node.elems)
                    .any(|(new, old)| !new.ptr_eq(*old));
                if !changed {
                    expr
                } else {
                    self.arena.new_array(node.elem_ty.clone(), &elems)
                }
            }
            Expr::Lambda(node) => {
                // Shadowing: a parameter this lambda re-declares is not
                // substituted inside its body.
                let mut shadowed: Vec<(&'ast ParamExpr, Expr<'ast>)> = Vec::new();
                for &param in node.params {
                    if let Some(bound) = self.bindings.remove(param) {
                        shadowed.push((param, bound));
                    }
                }
                let body = self.visit(node.body);
                for (param, bound) in shadowed {
                    self.bindings.bind(param, bound);
                }
                if body.ptr_eq(node.body) {
                    expr
                } else {
                    self.arena.lambda_expr(node.params, body)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_core::{BinaryOp, MemberRef, NamedType, TypeRef};

    #[test]
    fn substitutes_bound_parameter_with_same_reference() {
        let arena = ExprArena::new();
        let this = arena.param(Some("this"), TypeRef::int());
        let replacement = arena.int(42);

        let mut bindings = ParameterBindings::new();
        bindings.bind(this, replacement);

        let body = arena.binary(Expr::Param(this), BinaryOp::Add, arena.int(1));
        let result = ArgumentReplacer::new(&arena, &mut bindings).visit(body);

        match result {
            Expr::Binary(b) => assert!(b.left.ptr_eq(replacement)),
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn unbound_parameter_is_untouched() {
        let arena = ExprArena::new();
        let p = arena.param(Some("x"), TypeRef::int());
        let mut bindings = ParameterBindings::new();

        let result = ArgumentReplacer::new(&arena, &mut bindings).visit(Expr::Param(p));
        assert!(result.ptr_eq(Expr::Param(p)));
    }

    #[test]
    fn unchanged_subtrees_keep_identity() {
        let arena = ExprArena::new();
        let p = arena.param(Some("x"), TypeRef::int());
        let untouched = arena.binary(arena.int(1), BinaryOp::Add, arena.int(2));
        let tree = arena.binary(Expr::Param(p), BinaryOp::Multiply, untouched);

        let replacement = arena.int(9);
        let mut bindings = ParameterBindings::new();
        bindings.bind(p, replacement);

        let result = ArgumentReplacer::new(&arena, &mut bindings).visit(tree);
        match result {
            Expr::Binary(b) => {
                assert!(b.left.ptr_eq(replacement));
                // The right operand had no bound parameters: same allocation
                assert!(b.right.ptr_eq(untouched));
            }
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn fully_unchanged_tree_is_returned_as_is() {
        let arena = ExprArena::new();
        let tree = arena.binary(arena.int(1), BinaryOp::Add, arena.int(2));
        let mut bindings = ParameterBindings::new();
        let result = ArgumentReplacer::new(&arena, &mut bindings).visit(tree);
        assert!(result.ptr_eq(tree));
    }

    #[test]
    fn nested_lambda_shadowing_takes_precedence() {
        let arena = ExprArena::new();
        let p = arena.param(Some("x"), TypeRef::int());

        // Body: p + (|p| p)(…) — the inner lambda re-declares the same
        // parameter identity, so only the outer reference is substituted.
        let inner = arena.lambda_expr(&[p], Expr::Param(p));
        let tree = arena.binary(Expr::Param(p), BinaryOp::Add, inner);

        let replacement = arena.int(7);
        let mut bindings = ParameterBindings::new();
        bindings.bind(p, replacement);

        let result = ArgumentReplacer::new(&arena, &mut bindings).visit(tree);
        match result {
            Expr::Binary(b) => {
                assert!(b.left.ptr_eq(replacement));
                match b.right {
                    Expr::Lambda(l) => assert!(l.body.ptr_eq(Expr::Param(p))),
                    _ => panic!("expected lambda"),
                }
            }
            _ => panic!("expected binary"),
        }

        // Shadowed binding restored after the lambda
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn receiver_and_arguments_are_rewritten() {
        let arena = ExprArena::new();
        let order = NamedType::global("Order");
        let p = arena.param(Some("o"), TypeRef::Named(order.clone()));
        let n = arena.param(Some("n"), TypeRef::int());

        let method = MemberRef::method(order, "Calc", vec![TypeRef::int()], TypeRef::int());
        let call = arena.call(Some(Expr::Param(p)), method, &[Expr::Param(n)]);

        let recv = arena.param(Some("actual"), p.ty.clone());
        let mut bindings = ParameterBindings::new();
        bindings.bind(p, Expr::Param(recv));
        bindings.bind(n, arena.int(5));

        let result = ArgumentReplacer::new(&arena, &mut bindings).visit(call);
        match result {
            Expr::Call(c) => {
                assert!(c.receiver.unwrap().ptr_eq(Expr::Param(recv)));
                assert_eq!(c.args[0], arena.int(5));
            }
            _ => panic!("expected call"),
        }
    }
}
