//! Expression AST nodes

use super::{Span, Spanned};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Number literal
    Number(f64),
    /// String literal (quotes already stripped)
    Str(String),

    /// Variable reference
    Var(String),

    /// Binary operation
    Binary {
        left: Box<Spanned<Expr>>,
        op: BinOp,
        right: Box<Spanned<Expr>>,
    },

    /// Conditional: if (cond) then_branch else else_branch
    ///
    /// Only the selected branch is ever evaluated.
    If {
        cond: Box<Spanned<Expr>>,
        then_branch: Box<Spanned<Expr>>,
        else_branch: Box<Spanned<Expr>>,
    },

    /// Assignment: [let|const] name = value
    Assign {
        kind: DeclKind,
        name: String,
        value: Box<Spanned<Expr>>,
    },

    /// Function literal: fn(a, b) => body
    ///
    /// The body is shared with every function value built from this node.
    Lambda {
        params: Vec<String>,
        body: Rc<Spanned<Expr>>,
    },

    /// Function call: callee(args...)
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
}

impl Expr {
    /// Build a spanned binary node
    pub fn binary(left: Spanned<Expr>, op: BinOp, right: Spanned<Expr>, span: Span) -> Spanned<Expr> {
        Spanned::new(
            Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    /// Unary minus, lowered to `0 - operand`
    pub fn negate(operand: Spanned<Expr>, span: Span) -> Spanned<Expr> {
        let zero = Spanned::new(Expr::Number(0.0), Span::new(span.start, span.start));
        Expr::binary(zero, BinOp::Sub, operand, span)
    }
}

/// How an assignment treats the target name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    /// Ordinary write; overwrites unless the name is locked
    Let,
    /// Constant write; locks the name afterwards
    Const,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclKind::Let => write!(f, "let"),
            DeclKind::Const => write!(f, "const"),
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,

    // Logical
    And,
    Or,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Mod => write!(f, "%"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::Lt => write!(f, "<"),
            BinOp::Gt => write!(f, ">"),
            BinOp::Le => write!(f, "<="),
            BinOp::Ge => write!(f, ">="),
            BinOp::And => write!(f, "&&"),
            BinOp::Or => write!(f, "||"),
        }
    }
}
