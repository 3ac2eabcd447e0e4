//! RDF terms as they appear in query patterns.

use crate::span::SourceSpan;
use std::sync::Arc;

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// A query variable (`?name` or `$name`); the sigil is not stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Var {
    pub name: Arc<str>,
    pub span: SourceSpan,
}

impl Var {
    pub fn new(name: impl Into<Arc<str>>, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// An IRI, either written out in angle brackets or abbreviated.
#[derive(Clone, Debug, PartialEq)]
pub enum IriValue {
    /// `<http://example.org/x>` without the brackets
    Full(Arc<str>),
    /// `prefix:local`; either part may be empty
    Prefixed { prefix: Arc<str>, local: Arc<str> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Iri {
    pub value: IriValue,
    pub span: SourceSpan,
}

impl Iri {
    pub fn full(iri: impl Into<Arc<str>>, span: SourceSpan) -> Self {
        Self {
            value: IriValue::Full(iri.into()),
            span,
        }
    }

    pub fn prefixed(
        prefix: impl Into<Arc<str>>,
        local: impl Into<Arc<str>>,
        span: SourceSpan,
    ) -> Self {
        Self {
            value: IriValue::Prefixed {
                prefix: prefix.into(),
                local: local.into(),
            },
            span,
        }
    }

    /// The IRI behind the `a` shorthand.
    pub fn rdf_type(span: SourceSpan) -> Self {
        Self::full(RDF_TYPE, span)
    }

    pub fn is_rdf_type(&self) -> bool {
        matches!(&self.value, IriValue::Full(v) if v.as_ref() == RDF_TYPE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BlankNodeValue {
    /// `_:label` without the `_:`
    Label(Arc<str>),
    /// `[]`
    Anon,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlankNode {
    pub value: BlankNodeValue,
    pub span: SourceSpan,
}

/// Literal payloads. Numeric literals keep their source spelling so that
/// formatting does not change `1.50` into `1.5`.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Simple(Arc<str>),
    LangTagged { value: Arc<str>, lang: Arc<str> },
    Typed { value: Arc<str>, datatype: Iri },
    Integer(i64),
    Decimal(Arc<str>),
    Double(Arc<str>),
    Boolean(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub span: SourceSpan,
}

/// Any term in subject or object position.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Var(Var),
    Iri(Iri),
    Literal(Literal),
    BlankNode(BlankNode),
}

impl Term {
    pub fn span(&self) -> SourceSpan {
        match self {
            Term::Var(v) => v.span,
            Term::Iri(i) => i.span,
            Term::Literal(l) => l.span,
            Term::BlankNode(b) => b.span,
        }
    }
}

/// A property path kept as uninterpreted text.
///
/// Paths are not given structure; the verbatim token run is preserved so
/// the formatter can reproduce it exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct OpaquePath {
    pub text: Arc<str>,
    pub span: SourceSpan,
}

/// Predicate position: an IRI, a variable, or an opaque property path.
#[derive(Clone, Debug, PartialEq)]
pub enum PredicateTerm {
    Iri(Iri),
    Var(Var),
    Path(OpaquePath),
}

impl PredicateTerm {
    pub fn span(&self) -> SourceSpan {
        match self {
            PredicateTerm::Iri(i) => i.span,
            PredicateTerm::Var(v) => v.span,
            PredicateTerm::Path(p) => p.span,
        }
    }
}

/// Either a variable or an IRI (GRAPH names, DESCRIBE targets).
#[derive(Clone, Debug, PartialEq)]
pub enum VarOrIri {
    Var(Var),
    Iri(Iri),
}

impl VarOrIri {
    pub fn span(&self) -> SourceSpan {
        match self {
            VarOrIri::Var(v) => v.span,
            VarOrIri::Iri(i) => i.span,
        }
    }
}
