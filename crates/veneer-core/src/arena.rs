//! Arena allocation for expression trees.
//!
//! [`ExprArena`] owns every node of the trees built in it; handles returned
//! from its methods borrow the arena, so a whole tree (and everything an
//! expansion pass adds to it) is freed in one drop. Rewriting passes allocate
//! replacement nodes into the same arena and keep handles to unchanged
//! subtrees, which is what makes reference-preserving reconstruction cheap.
//!
//! # Examples
//!
//! ```
//! use veneer_core::{BinaryOp, Expr, ExprArena, TypeRef};
//!
//! let arena = ExprArena::new();
//! let x = arena.param(Some("x"), TypeRef::int());
//! let body = arena.binary(Expr::Param(x), BinaryOp::Add, arena.int(1));
//! let lambda = arena.lambda(&[x], body);
//! assert_eq!(lambda.params.len(), 1);
//! ```

use bumpalo::Bump;

use crate::expr::{
    BinaryExpr, CallExpr, ConditionalExpr, Expr, LambdaExpr, LiteralExpr, LiteralValue,
    MemberExpr, NewArrayExpr, ParamExpr, UnaryExpr,
};
use crate::member::MemberRef;
use crate::ops::{BinaryOp, UnaryOp};
use crate::types::TypeRef;

/// Owning arena for expression nodes.
#[derive(Default)]
pub struct ExprArena {
    bump: Bump,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Allocate a formal parameter. Identity is the returned address.
    pub fn param(&self, name: Option<&str>, ty: TypeRef) -> &ParamExpr {
        self.bump.alloc(ParamExpr {
            name: name.map(|n| n.to_string()),
            ty,
        })
    }

    /// Allocate a literal with an explicit type.
    pub fn literal(&self, value: LiteralValue, ty: TypeRef) -> Expr<'_> {
        Expr::Literal(self.bump.alloc(LiteralExpr { value, ty }))
    }

    /// Allocate a boolean literal.
    pub fn boolean(&self, value: bool) -> Expr<'_> {
        self.literal(LiteralValue::Bool(value), TypeRef::boolean())
    }

    /// Allocate an integer literal.
    pub fn int(&self, value: i64) -> Expr<'_> {
        self.literal(LiteralValue::Int(value), TypeRef::int())
    }

    /// Allocate a floating-point literal.
    pub fn double(&self, value: f64) -> Expr<'_> {
        self.literal(LiteralValue::Double(value), TypeRef::double())
    }

    /// Allocate a string literal.
    pub fn string(&self, value: impl Into<String>) -> Expr<'_> {
        self.literal(LiteralValue::Str(value.into()), TypeRef::string())
    }

    /// Allocate a typed null literal.
    pub fn null(&self, ty: TypeRef) -> Expr<'_> {
        self.literal(LiteralValue::Null, ty)
    }

    /// Allocate a binary operation.
    pub fn binary<'a>(&'a self, left: Expr<'a>, op: BinaryOp, right: Expr<'a>) -> Expr<'a> {
        Expr::Binary(self.bump.alloc(BinaryExpr { left, op, right }))
    }

    /// Allocate a unary operation.
    pub fn unary<'a>(&'a self, op: UnaryOp, operand: Expr<'a>) -> Expr<'a> {
        Expr::Unary(self.bump.alloc(UnaryExpr { op, operand }))
    }

    /// Allocate a conditional.
    pub fn conditional<'a>(
        &'a self,
        condition: Expr<'a>,
        then_branch: Expr<'a>,
        else_branch: Expr<'a>,
    ) -> Expr<'a> {
        Expr::Conditional(self.bump.alloc(ConditionalExpr {
            condition,
            then_branch,
            else_branch,
        }))
    }

    /// Allocate a member access.
    pub fn member<'a>(&'a self, receiver: Option<Expr<'a>>, member: MemberRef) -> Expr<'a> {
        Expr::Member(self.bump.alloc(MemberExpr { receiver, member }))
    }

    /// Allocate a method call. The argument slice is copied into the arena.
    pub fn call<'a>(
        &'a self,
        receiver: Option<Expr<'a>>,
        method: MemberRef,
        args: &[Expr<'a>],
    ) -> Expr<'a> {
        let args = self.bump.alloc_slice_copy(args);
        Expr::Call(self.bump.alloc(CallExpr {
            receiver,
            method,
            args,
        }))
    }

    /// Allocate a lambda. The parameter slice is copied into the arena.
    pub fn lambda<'a>(&'a self, params: &[&'a ParamExpr], body: Expr<'a>) -> &'a LambdaExpr<'a> {
        let params = self.bump.alloc_slice_copy(params);
        self.bump.alloc(LambdaExpr { params, body })
    }

    /// Allocate a lambda as an expression node.
    pub fn lambda_expr<'a>(&'a self, params: &[&'a ParamExpr], body: Expr<'a>) -> Expr<'a> {
        Expr::Lambda(self.lambda(params, body))
    }

    /// Allocate an array construction. The element slice is copied into the
    /// arena.
    pub fn new_array<'a>(&'a self, elem_ty: TypeRef, elems: &[Expr<'a>]) -> Expr<'a> {
        let elems = self.bump.alloc_slice_copy(elems);
        Expr::NewArray(self.bump.alloc(NewArrayExpr { elem_ty, elems }))
    }

    /// Copy a slice of expressions into the arena.
    pub fn exprs<'a>(&'a self, exprs: &[Expr<'a>]) -> &'a [Expr<'a>] {
        self.bump.alloc_slice_copy(exprs)
    }

    /// Copy a slice of parameters into the arena.
    pub fn params<'a>(&'a self, params: &[&'a ParamExpr]) -> &'a [&'a ParamExpr] {
        self.bump.alloc_slice_copy(params)
    }

    /// Bytes currently allocated, for diagnostics.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_trees() {
        let arena = ExprArena::new();
        let x = arena.param(Some("x"), TypeRef::int());
        let cond = arena.binary(Expr::Param(x), BinaryOp::Greater, arena.int(0));
        let tree = arena.conditional(cond, Expr::Param(x), arena.int(0));
        match tree {
            Expr::Conditional(c) => {
                assert_eq!(c.else_branch, arena.int(0));
            }
            _ => panic!("expected conditional"),
        }
    }

    #[test]
    fn call_copies_argument_slice() {
        let arena = ExprArena::new();
        let order = crate::types::NamedType::global("Order");
        let method = MemberRef::method(order, "Calculate", vec![TypeRef::int()], TypeRef::int());
        let local_args = vec![arena.int(10)];
        let call = arena.call(None, method, &local_args);
        match call {
            Expr::Call(c) => assert_eq!(c.args.len(), 1),
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn lambda_parameters_keep_identity() {
        let arena = ExprArena::new();
        let p = arena.param(None, TypeRef::int());
        let lambda = arena.lambda(&[p], Expr::Param(p));
        assert!(std::ptr::eq(lambda.params[0], p));
    }
}
