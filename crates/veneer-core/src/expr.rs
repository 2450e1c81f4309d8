//! Expression tree nodes.
//!
//! Nodes are arena-allocated: an [`Expr`] is a small `Copy` handle whose
//! variants reference node payloads owned by an [`crate::ExprArena`]. Two
//! consequences matter to everything built on top:
//!
//! - **Identity is the address.** A [`ParamExpr`] is a name-free synthetic
//!   variable; two parameters are "the same parameter" iff they are the same
//!   allocation ([`std::ptr::eq`]). Parameter binding during expansion maps
//!   addresses, never names.
//! - **Rewrites preserve unchanged subtrees.** A rewriting pass returns the
//!   original `Expr` handle whenever no child changed, so downstream
//!   consumers can rely on pointer identity for caching. [`Expr::ptr_eq`]
//!   makes that observable.
//!
//! Derived `PartialEq` compares trees structurally (through references),
//! which is what "structurally equals" means in the engine's idempotence
//! guarantee.

use crate::member::MemberRef;
use crate::ops::{BinaryOp, UnaryOp};
use crate::types::TypeRef;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(&'ast LiteralExpr),
    /// Reference to a formal parameter / variable (identity by address)
    Param(&'ast ParamExpr),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Conditional (ternary)
    Conditional(&'ast ConditionalExpr<'ast>),
    /// Member access
    Member(&'ast MemberExpr<'ast>),
    /// Method call
    Call(&'ast CallExpr<'ast>),
    /// Lambda literal
    Lambda(&'ast LambdaExpr<'ast>),
    /// Array construction
    NewArray(&'ast NewArrayExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Static type of this expression, reconstructed from the node shape.
    pub fn ty(&self) -> TypeRef {
        match self {
            Expr::Literal(e) => e.ty.clone(),
            Expr::Param(e) => e.ty.clone(),
            Expr::Binary(e) => {
                if e.op.yields_bool() {
                    TypeRef::boolean()
                } else {
                    e.left.ty()
                }
            }
            Expr::Unary(e) => match e.op {
                UnaryOp::Not => TypeRef::boolean(),
                UnaryOp::Negate => e.operand.ty(),
            },
            Expr::Conditional(e) => e.then_branch.ty(),
            Expr::Member(e) => e.member.return_type.clone(),
            Expr::Call(e) => e.method.return_type.clone(),
            Expr::Lambda(e) => e.body.ty(),
            Expr::NewArray(e) => TypeRef::array(e.elem_ty.clone()),
        }
    }

    /// Whether two handles reference the same node allocation.
    ///
    /// This is the reference-identity counterpart of the derived structural
    /// `PartialEq`.
    pub fn ptr_eq(self, other: Expr<'ast>) -> bool {
        match (self, other) {
            (Expr::Literal(a), Expr::Literal(b)) => std::ptr::eq(a, b),
            (Expr::Param(a), Expr::Param(b)) => std::ptr::eq(a, b),
            (Expr::Binary(a), Expr::Binary(b)) => std::ptr::eq(a, b),
            (Expr::Unary(a), Expr::Unary(b)) => std::ptr::eq(a, b),
            (Expr::Conditional(a), Expr::Conditional(b)) => std::ptr::eq(a, b),
            (Expr::Member(a), Expr::Member(b)) => std::ptr::eq(a, b),
            (Expr::Call(a), Expr::Call(b)) => std::ptr::eq(a, b),
            (Expr::Lambda(a), Expr::Lambda(b)) => std::ptr::eq(a, b),
            (Expr::NewArray(a), Expr::NewArray(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }
}

/// A literal value with its static type.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    /// The value
    pub value: LiteralValue,
    /// Static type of the literal
    pub ty: TypeRef,
}

/// The kind of literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating-point literal
    Double(f64),
    /// String literal
    Str(String),
    /// Null literal (type supplied at construction)
    Null,
}

/// A formal parameter / variable.
///
/// Parameters are synthetic: the optional name exists for diagnostics only
/// and never participates in identity or binding.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamExpr {
    /// Optional diagnostic name
    pub name: Option<String>,
    /// Semantic type
    pub ty: TypeRef,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Left operand
    pub left: Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: Expr<'ast>,
}

/// A unary prefix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    /// Operator
    pub op: UnaryOp,
    /// Operand
    pub operand: Expr<'ast>,
}

/// A conditional (ternary) expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionalExpr<'ast> {
    /// Condition
    pub condition: Expr<'ast>,
    /// Value when the condition holds
    pub then_branch: Expr<'ast>,
    /// Value otherwise
    pub else_branch: Expr<'ast>,
}

/// A member (property) access.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr<'ast> {
    /// Receiver; `None` for a static member
    pub receiver: Option<Expr<'ast>>,
    /// Identity of the accessed member
    pub member: MemberRef,
}

/// A method call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr<'ast> {
    /// Receiver; `None` for a static method
    pub receiver: Option<Expr<'ast>>,
    /// Identity of the called method
    pub method: MemberRef,
    /// Arguments in declaration order (receiver excluded)
    pub args: &'ast [Expr<'ast>],
}

/// A lambda literal: ordered formal parameters plus a body referencing them.
///
/// This is also the shape of a virtual member's expression body: an instance
/// property body has exactly one parameter (the receiver); an instance method
/// body has the receiver parameter followed by the method's own parameters; a
/// static member body has no receiver parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaExpr<'ast> {
    /// Formal parameters, identified by address
    pub params: &'ast [&'ast ParamExpr],
    /// Body expression
    pub body: Expr<'ast>,
}

/// An array construction from element expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArrayExpr<'ast> {
    /// Element type
    pub elem_ty: TypeRef,
    /// Element expressions
    pub elems: &'ast [Expr<'ast>],
}
