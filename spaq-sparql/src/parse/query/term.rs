//! Triple blocks, terms, predicates, and dataset clauses.

use crate::ast::{
    BlankNode, BlankNodeValue, DatasetClause, Iri, Literal, LiteralValue, OpaquePath,
    PredicateTerm, Term, TriplePattern,
};
use crate::diag::DiagCode;
use crate::lex::TokenKind;
use crate::parse::query::Parser;
use std::sync::Arc;

impl Parser {
    /// A triples block: one subject with its predicate-object list
    /// (`;`-chained predicates, `,`-chained objects), plus the optional
    /// terminating dot.
    pub(crate) fn parse_triples_into(&mut self, triples: &mut Vec<TriplePattern>) -> Option<()> {
        let subject = self.parse_subject()?;
        loop {
            let predicate = self.parse_verb()?;
            loop {
                let object = self.parse_object()?;
                let span = subject.span().union(object.span());
                triples.push(TriplePattern {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    object,
                    span,
                });
                if !self.stream.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            if self.stream.match_token(&TokenKind::Semicolon) {
                // a trailing semicolon before `.` or `}` is legal
                if self.is_verb_start() {
                    continue;
                }
            }
            break;
        }
        self.stream.match_token(&TokenKind::Dot);
        Some(())
    }

    fn is_verb_start(&self) -> bool {
        matches!(
            self.stream.peek_kind(),
            TokenKind::KwA
                | TokenKind::Var(_)
                | TokenKind::Iri(_)
                | TokenKind::PrefixedName { .. }
                | TokenKind::Caret
                | TokenKind::Bang
                | TokenKind::LParen
        )
    }

    fn parse_subject(&mut self) -> Option<Term> {
        match self.stream.peek_kind() {
            TokenKind::Var(_) => Some(Term::Var(self.stream.consume_var()?)),
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => {
                Some(Term::Iri(self.stream.consume_iri()?))
            }
            TokenKind::BlankNodeLabel(_) | TokenKind::Anon => self.parse_blank_node().map(Term::BlankNode),
            TokenKind::LBracket => {
                self.stream.error_at_current(
                    DiagCode::UnsupportedConstruct,
                    "blank node property lists are not supported",
                );
                None
            }
            kind if kind.is_term_start() => {
                self.stream.error_at_current(
                    DiagCode::UnexpectedToken,
                    "a literal cannot be the subject of a triple",
                );
                None
            }
            _ => {
                self.stream.error_expected("a triple subject");
                None
            }
        }
    }

    /// Predicate position: `a`, a variable, an IRI, or a property path.
    ///
    /// Paths get no structure of their own; the token run is kept verbatim
    /// so formatting reproduces it unchanged.
    pub(crate) fn parse_verb(&mut self) -> Option<PredicateTerm> {
        match self.stream.peek_kind() {
            TokenKind::Var(_) => Some(PredicateTerm::Var(self.stream.consume_var()?)),
            TokenKind::KwA | TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => {
                if path_continues(self.stream.peek_n(1).kind.clone()) {
                    return self.parse_opaque_path().map(PredicateTerm::Path);
                }
                if self.stream.match_token(&TokenKind::KwA) {
                    return Some(PredicateTerm::Iri(Iri::rdf_type(
                        self.stream.previous_span(),
                    )));
                }
                Some(PredicateTerm::Iri(self.stream.consume_iri()?))
            }
            TokenKind::Caret | TokenKind::Bang | TokenKind::LParen => {
                self.parse_opaque_path().map(PredicateTerm::Path)
            }
            _ => {
                self.stream.error_expected("a predicate");
                None
            }
        }
    }

    /// Collect a property-path token run.
    ///
    /// Stops at the first token that cannot belong to a path, or when two
    /// path primaries sit adjacent at depth zero: the second one is the
    /// object of the triple, not part of the path.
    fn parse_opaque_path(&mut self) -> Option<OpaquePath> {
        let start = self.stream.current_span();
        let mut text = String::new();
        let mut span = start;
        let mut depth = 0usize;
        let mut primary_done = false;

        loop {
            let kind = self.stream.peek_kind().clone();
            let in_path = matches!(
                kind,
                TokenKind::Iri(_)
                    | TokenKind::PrefixedName { .. }
                    | TokenKind::KwA
                    | TokenKind::Caret
                    | TokenKind::Bang
                    | TokenKind::Slash
                    | TokenKind::Pipe
                    | TokenKind::Star
                    | TokenKind::Plus
                    | TokenKind::Question
                    | TokenKind::LParen
                    | TokenKind::RParen
            );
            if !in_path {
                break;
            }
            let starts_primary = matches!(
                kind,
                TokenKind::Iri(_)
                    | TokenKind::PrefixedName { .. }
                    | TokenKind::KwA
                    | TokenKind::Caret
                    | TokenKind::Bang
                    | TokenKind::LParen
            );
            if depth == 0 && primary_done && starts_primary {
                break;
            }
            match kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            let token = self.stream.advance();
            text.push_str(&token.kind.to_string());
            span = span.union(token.span);
            primary_done = matches!(
                token.kind,
                TokenKind::Iri(_)
                    | TokenKind::PrefixedName { .. }
                    | TokenKind::KwA
                    | TokenKind::Star
                    | TokenKind::Plus
                    | TokenKind::Question
                    | TokenKind::RParen
            );
        }

        if text.is_empty() {
            self.stream.error_expected("a property path");
            return None;
        }
        Some(OpaquePath {
            text: Arc::from(text.as_str()),
            span,
        })
    }

    pub(crate) fn parse_object(&mut self) -> Option<Term> {
        match self.stream.peek_kind() {
            TokenKind::Var(_) => Some(Term::Var(self.stream.consume_var()?)),
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => {
                Some(Term::Iri(self.stream.consume_iri()?))
            }
            TokenKind::BlankNodeLabel(_) | TokenKind::Anon => {
                self.parse_blank_node().map(Term::BlankNode)
            }
            TokenKind::String(_)
            | TokenKind::Integer(_)
            | TokenKind::Decimal(_)
            | TokenKind::Double(_)
            | TokenKind::KwTrue
            | TokenKind::KwFalse
            | TokenKind::Plus
            | TokenKind::Minus => self.parse_literal().map(Term::Literal),
            TokenKind::LParen => {
                self.stream.error_at_current(
                    DiagCode::UnsupportedConstruct,
                    "RDF collections are not supported",
                );
                None
            }
            TokenKind::LBracket => {
                self.stream.error_at_current(
                    DiagCode::UnsupportedConstruct,
                    "blank node property lists are not supported",
                );
                None
            }
            _ => {
                self.stream.error_expected("a triple object");
                None
            }
        }
    }

    fn parse_blank_node(&mut self) -> Option<BlankNode> {
        match self.stream.peek_kind() {
            TokenKind::BlankNodeLabel(label) => {
                let label = label.clone();
                let token = self.stream.advance();
                Some(BlankNode {
                    value: BlankNodeValue::Label(label),
                    span: token.span,
                })
            }
            TokenKind::Anon => {
                let token = self.stream.advance();
                Some(BlankNode {
                    value: BlankNodeValue::Anon,
                    span: token.span,
                })
            }
            _ => {
                self.stream.error_expected("a blank node");
                None
            }
        }
    }

    /// A literal in term position. A leading sign folds into numeric
    /// literals here; in expressions the sign is a unary operator instead.
    pub(crate) fn parse_literal(&mut self) -> Option<Literal> {
        let negative = if self.stream.check(&TokenKind::Minus) {
            self.stream.advance();
            true
        } else {
            self.stream.match_token(&TokenKind::Plus);
            false
        };
        let sign_span = if negative {
            Some(self.stream.previous_span())
        } else {
            None
        };

        match self.stream.peek_kind().clone() {
            TokenKind::String(value) => {
                let token = self.stream.advance();
                let mut span = token.span;
                let value = match self.stream.peek_kind().clone() {
                    TokenKind::LangTag(lang) => {
                        let tag = self.stream.advance();
                        span = span.union(tag.span);
                        LiteralValue::LangTagged { value, lang }
                    }
                    TokenKind::DoubleCaret => {
                        self.stream.advance();
                        let datatype = self.stream.consume_iri()?;
                        span = span.union(datatype.span);
                        LiteralValue::Typed { value, datatype }
                    }
                    _ => LiteralValue::Simple(value),
                };
                Some(Literal { value, span })
            }
            TokenKind::Integer(v) => {
                let token = self.stream.advance();
                let span = sign_span.unwrap_or(token.span).union(token.span);
                let value = if negative { -v } else { v };
                Some(Literal {
                    value: LiteralValue::Integer(value),
                    span,
                })
            }
            TokenKind::Decimal(text) => {
                let token = self.stream.advance();
                let span = sign_span.unwrap_or(token.span).union(token.span);
                let text = if negative {
                    Arc::from(format!("-{text}").as_str())
                } else {
                    text
                };
                Some(Literal {
                    value: LiteralValue::Decimal(text),
                    span,
                })
            }
            TokenKind::Double(text) => {
                let token = self.stream.advance();
                let span = sign_span.unwrap_or(token.span).union(token.span);
                let text = if negative {
                    Arc::from(format!("-{text}").as_str())
                } else {
                    text
                };
                Some(Literal {
                    value: LiteralValue::Double(text),
                    span,
                })
            }
            TokenKind::KwTrue | TokenKind::KwFalse => {
                let is_true = self.stream.check(&TokenKind::KwTrue);
                let token = self.stream.advance();
                Some(Literal {
                    value: LiteralValue::Boolean(is_true),
                    span: token.span,
                })
            }
            _ => {
                self.stream.error_expected("a literal");
                None
            }
        }
    }

    /// `FROM <g>` and `FROM NAMED <g>` clauses, in order.
    pub(crate) fn parse_dataset_clauses(&mut self) -> Vec<DatasetClause> {
        let mut clauses = Vec::new();
        while self.stream.check(&TokenKind::KwFrom) {
            let kw = self.stream.advance();
            let named = self.stream.match_token(&TokenKind::KwNamed);
            let Some(iri) = self.stream.consume_iri() else {
                break;
            };
            let span = kw.span.union(iri.span);
            clauses.push(DatasetClause { named, iri, span });
        }
        clauses
    }
}

fn path_continues(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Slash
            | TokenKind::Pipe
            | TokenKind::Star
            | TokenKind::Plus
            | TokenKind::Question
    )
}
