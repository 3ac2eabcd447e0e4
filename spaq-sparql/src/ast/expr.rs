//! Expression nodes for FILTER, BIND, projection, and modifiers.

use crate::ast::pattern::GraphPattern;
use crate::ast::term::{Iri, Literal, Var};
use crate::lex::{AggregateFn, BuiltinFn};
use crate::span::SourceSpan;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Var(Var),
    Literal(Literal),
    Iri(Iri),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        span: SourceSpan,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        span: SourceSpan,
    },
    /// Built-in call, e.g. `REGEX(?s, "^a")`
    Builtin {
        func: BuiltinFn,
        args: Vec<Expression>,
        span: SourceSpan,
    },
    /// Custom function call by IRI, e.g. `ex:distance(?a, ?b)`
    FunctionCall {
        name: Iri,
        args: Vec<Expression>,
        span: SourceSpan,
    },
    /// `EXISTS { ... }` / `NOT EXISTS { ... }`
    Exists {
        pattern: Box<GraphPattern>,
        negated: bool,
        span: SourceSpan,
    },
    /// `?x IN (...)` / `?x NOT IN (...)`
    In {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
        span: SourceSpan,
    },
    Aggregate {
        func: AggregateFn,
        /// `None` means `COUNT(*)`
        expr: Option<Box<Expression>>,
        distinct: bool,
        /// GROUP_CONCAT separator, when given
        separator: Option<Arc<str>>,
        span: SourceSpan,
    },
    /// An explicitly parenthesized subexpression, kept so formatting
    /// reproduces the parentheses the author wrote.
    Bracketed {
        inner: Box<Expression>,
        span: SourceSpan,
    },
}

impl Expression {
    pub fn span(&self) -> SourceSpan {
        match self {
            Expression::Var(v) => v.span,
            Expression::Literal(l) => l.span,
            Expression::Iri(i) => i.span,
            Expression::Binary { span, .. }
            | Expression::Unary { span, .. }
            | Expression::Builtin { span, .. }
            | Expression::FunctionCall { span, .. }
            | Expression::Exists { span, .. }
            | Expression::In { span, .. }
            | Expression::Aggregate { span, .. }
            | Expression::Bracketed { span, .. } => *span,
        }
    }
}
