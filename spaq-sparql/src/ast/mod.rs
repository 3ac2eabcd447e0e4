//! The abstract syntax tree.
//!
//! Every node carries the [`SourceSpan`](crate::span::SourceSpan) it was
//! parsed from. Variants are tagged; nothing is stringly typed except
//! opaque property paths, which are deliberately preserved as text.

pub mod expr;
pub mod pattern;
pub mod query;
pub mod term;

pub use expr::{BinaryOp, Expression, UnaryOp};
pub use pattern::{GraphPattern, TriplePattern};
pub use query::{
    AskQuery, BaseDecl, ConstructQuery, DatasetClause, DescribeQuery, DescribeTargets,
    GroupByClause, GroupCondition, HavingClause, LimitClause, OffsetClause, OrderByClause,
    OrderCondition, OrderDirection, PrefixDecl, Prologue, Query, QueryBody, SelectClause,
    SelectModifier, SelectQuery, SelectVariable, SelectVariables, SolutionModifiers, WhereClause,
};
pub use term::{
    BlankNode, BlankNodeValue, Iri, IriValue, Literal, LiteralValue, OpaquePath, PredicateTerm,
    Term, Var, VarOrIri, RDF_TYPE,
};
