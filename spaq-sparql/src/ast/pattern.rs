//! Graph patterns: the contents of WHERE clauses.

use crate::ast::expr::Expression;
use crate::ast::query::SelectQuery;
use crate::ast::term::{PredicateTerm, Term, Var, VarOrIri};
use crate::span::SourceSpan;

/// One `subject predicate object` pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct TriplePattern {
    pub subject: Term,
    pub predicate: PredicateTerm,
    pub object: Term,
    pub span: SourceSpan,
}

/// A graph pattern element.
///
/// A group with a single basic graph pattern collapses to `Bgp` directly;
/// `Group` only appears when a brace block holds more than one element.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphPattern {
    /// A run of triple patterns with no intervening operators
    Bgp {
        triples: Vec<TriplePattern>,
        span: SourceSpan,
    },
    /// `{ A B ... }` with at least two elements
    Group {
        patterns: Vec<GraphPattern>,
        span: SourceSpan,
    },
    Optional {
        pattern: Box<GraphPattern>,
        span: SourceSpan,
    },
    Union {
        left: Box<GraphPattern>,
        right: Box<GraphPattern>,
        span: SourceSpan,
    },
    /// `MINUS { ... }`; the left side is whatever precedes it in the group
    Minus {
        pattern: Box<GraphPattern>,
        span: SourceSpan,
    },
    Graph {
        graph: VarOrIri,
        pattern: Box<GraphPattern>,
        span: SourceSpan,
    },
    Filter {
        expr: Expression,
        span: SourceSpan,
    },
    Bind {
        expr: Expression,
        var: Var,
        span: SourceSpan,
    },
    SubSelect {
        query: Box<SelectQuery>,
        span: SourceSpan,
    },
}

impl GraphPattern {
    pub fn span(&self) -> SourceSpan {
        match self {
            GraphPattern::Bgp { span, .. }
            | GraphPattern::Group { span, .. }
            | GraphPattern::Optional { span, .. }
            | GraphPattern::Union { span, .. }
            | GraphPattern::Minus { span, .. }
            | GraphPattern::Graph { span, .. }
            | GraphPattern::Filter { span, .. }
            | GraphPattern::Bind { span, .. }
            | GraphPattern::SubSelect { span, .. } => *span,
        }
    }

    /// Whether this is an empty basic graph pattern (an empty `{}`).
    pub fn is_empty_bgp(&self) -> bool {
        matches!(self, GraphPattern::Bgp { triples, .. } if triples.is_empty())
    }
}
