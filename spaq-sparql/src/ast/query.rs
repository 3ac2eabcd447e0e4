//! Top-level query structure: prologue, query forms, solution modifiers.

use crate::ast::expr::Expression;
use crate::ast::pattern::{GraphPattern, TriplePattern};
use crate::ast::term::{Iri, Var, VarOrIri};
use crate::span::SourceSpan;
use std::sync::Arc;

/// A complete parsed query.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub prologue: Prologue,
    pub body: QueryBody,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QueryBody {
    Select(SelectQuery),
    Construct(ConstructQuery),
    Ask(AskQuery),
    Describe(DescribeQuery),
}

/// BASE and PREFIX declarations, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prologue {
    pub base: Option<BaseDecl>,
    pub prefixes: Vec<PrefixDecl>,
}

impl Prologue {
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.prefixes.is_empty()
    }

    /// Look up a declared prefix, last declaration winning.
    pub fn get_prefix(&self, prefix: &str) -> Option<&PrefixDecl> {
        self.prefixes
            .iter()
            .rev()
            .find(|p| p.prefix.as_ref() == prefix)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BaseDecl {
    pub iri: Arc<str>,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrefixDecl {
    pub prefix: Arc<str>,
    pub iri: Arc<str>,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectQuery {
    pub select: SelectClause,
    pub datasets: Vec<DatasetClause>,
    pub where_clause: WhereClause,
    pub modifiers: SolutionModifiers,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectClause {
    pub modifier: Option<SelectModifier>,
    pub variables: SelectVariables,
    pub span: SourceSpan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectModifier {
    Distinct,
    Reduced,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectVariables {
    /// `SELECT *`
    Star,
    /// One or more projection items
    Explicit(Vec<SelectVariable>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectVariable {
    Var(Var),
    /// `(expr AS ?alias)`
    Expr {
        expr: Expression,
        alias: Var,
        span: SourceSpan,
    },
}

/// `FROM <iri>` or `FROM NAMED <iri>`.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetClause {
    pub named: bool,
    pub iri: Iri,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhereClause {
    pub pattern: GraphPattern,
    pub span: SourceSpan,
}

/// GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolutionModifiers {
    pub group_by: Option<GroupByClause>,
    pub having: Option<HavingClause>,
    pub order_by: Option<OrderByClause>,
    pub limit: Option<LimitClause>,
    pub offset: Option<OffsetClause>,
}

impl SolutionModifiers {
    pub fn is_empty(&self) -> bool {
        self.group_by.is_none()
            && self.having.is_none()
            && self.order_by.is_none()
            && self.limit.is_none()
            && self.offset.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupByClause {
    pub conditions: Vec<GroupCondition>,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GroupCondition {
    Var(Var),
    /// `(expr)` or `(expr AS ?alias)`
    Expr {
        expr: Expression,
        alias: Option<Var>,
        span: SourceSpan,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct HavingClause {
    pub constraints: Vec<Expression>,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderByClause {
    pub conditions: Vec<OrderCondition>,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderCondition {
    /// `ASC(...)`/`DESC(...)` when written; bare expressions have no
    /// explicit direction
    pub direction: Option<OrderDirection>,
    pub expr: Expression,
    pub span: SourceSpan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LimitClause {
    pub value: u64,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OffsetClause {
    pub value: u64,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstructQuery {
    pub template: Vec<TriplePattern>,
    pub datasets: Vec<DatasetClause>,
    pub where_clause: WhereClause,
    pub modifiers: SolutionModifiers,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AskQuery {
    pub datasets: Vec<DatasetClause>,
    pub where_clause: WhereClause,
    pub modifiers: SolutionModifiers,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DescribeQuery {
    pub targets: DescribeTargets,
    pub datasets: Vec<DatasetClause>,
    pub where_clause: Option<WhereClause>,
    pub modifiers: SolutionModifiers,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DescribeTargets {
    /// `DESCRIBE *`
    Star,
    Resources(Vec<VarOrIri>),
}
