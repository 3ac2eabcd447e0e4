//! Group graph patterns: braces, OPTIONAL, UNION, MINUS, GRAPH, FILTER, BIND.

use crate::ast::{GraphPattern, TriplePattern, VarOrIri};
use crate::diag::DiagCode;
use crate::lex::TokenKind;
use crate::parse::query::Parser;
use crate::span::SourceSpan;

impl Parser {
    /// `{ ... }`, including the sub-select form.
    pub(crate) fn parse_group_graph_pattern(&mut self) -> Option<GraphPattern> {
        let open = self
            .stream
            .expect(&TokenKind::LBrace, "`{` to open a group pattern")?;

        if self.stream.check(&TokenKind::KwSelect) {
            let query = self.parse_select_query()?;
            let close = self
                .stream
                .expect(&TokenKind::RBrace, "`}` to close the sub-select")?;
            return Some(GraphPattern::SubSelect {
                query: Box::new(query),
                span: open.span.union(close.span),
            });
        }

        let mut patterns: Vec<GraphPattern> = Vec::new();
        let mut triples: Vec<TriplePattern> = Vec::new();

        loop {
            let before = self.stream.position();
            match self.stream.peek_kind() {
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Dot => {
                    self.stream.advance();
                }
                TokenKind::KwOptional => {
                    flush_triples(&mut patterns, &mut triples);
                    let kw = self.stream.advance();
                    let inner = self.parse_group_graph_pattern()?;
                    let span = kw.span.union(inner.span());
                    patterns.push(GraphPattern::Optional {
                        pattern: Box::new(inner),
                        span,
                    });
                }
                TokenKind::KwMinus => {
                    flush_triples(&mut patterns, &mut triples);
                    let kw = self.stream.advance();
                    let inner = self.parse_group_graph_pattern()?;
                    let span = kw.span.union(inner.span());
                    patterns.push(GraphPattern::Minus {
                        pattern: Box::new(inner),
                        span,
                    });
                }
                TokenKind::KwGraph => {
                    flush_triples(&mut patterns, &mut triples);
                    let kw = self.stream.advance();
                    let graph = self.parse_var_or_iri()?;
                    let inner = self.parse_group_graph_pattern()?;
                    let span = kw.span.union(inner.span());
                    patterns.push(GraphPattern::Graph {
                        graph,
                        pattern: Box::new(inner),
                        span,
                    });
                }
                TokenKind::KwFilter => {
                    flush_triples(&mut patterns, &mut triples);
                    let kw = self.stream.advance();
                    let expr = self.parse_constraint()?;
                    let span = kw.span.union(expr.span());
                    patterns.push(GraphPattern::Filter { expr, span });
                }
                TokenKind::KwBind => {
                    flush_triples(&mut patterns, &mut triples);
                    let kw = self.stream.advance();
                    self.stream
                        .expect(&TokenKind::LParen, "`(` after BIND")?;
                    let expr = self.parse_expression()?;
                    self.stream
                        .expect(&TokenKind::KwAs, "`AS` in the BIND assignment")?;
                    let var = self.stream.consume_var()?;
                    let close = self
                        .stream
                        .expect(&TokenKind::RParen, "`)` to close BIND")?;
                    patterns.push(GraphPattern::Bind {
                        expr,
                        var,
                        span: kw.span.union(close.span),
                    });
                }
                TokenKind::KwValues => {
                    flush_triples(&mut patterns, &mut triples);
                    self.skip_values_block();
                }
                TokenKind::LBrace => {
                    flush_triples(&mut patterns, &mut triples);
                    let mut left = self.parse_group_graph_pattern()?;
                    while self.stream.match_token(&TokenKind::KwUnion) {
                        let right = self.parse_group_graph_pattern()?;
                        let span = left.span().union(right.span());
                        left = GraphPattern::Union {
                            left: Box::new(left),
                            right: Box::new(right),
                            span,
                        };
                    }
                    patterns.push(left);
                }
                kind if kind.is_term_start() => {
                    if self.parse_triples_into(&mut triples).is_none() {
                        // keep checking the rest of the group
                        self.stream.synchronize();
                        if self.stream.position() == before {
                            return None;
                        }
                    }
                }
                _ => {
                    self.stream
                        .error_expected("a triple pattern, a keyword like OPTIONAL or FILTER, or `}`");
                    self.stream.synchronize();
                    if self.stream.position() == before {
                        // no progress; bail out of the group
                        return None;
                    }
                }
            }
        }

        let close = self
            .stream
            .expect(&TokenKind::RBrace, "`}` to close the group pattern")?;
        flush_triples(&mut patterns, &mut triples);

        let span = open.span.union(close.span);
        Some(collapse_group(patterns, span))
    }

    pub(crate) fn parse_var_or_iri(&mut self) -> Option<VarOrIri> {
        match self.stream.peek_kind() {
            TokenKind::Var(_) => Some(VarOrIri::Var(self.stream.consume_var()?)),
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => {
                Some(VarOrIri::Iri(self.stream.consume_iri()?))
            }
            _ => {
                self.stream.error_expected("a variable or IRI");
                None
            }
        }
    }

    /// VALUES is outside the supported grammar; report it once and skip the
    /// whole block so later elements still get checked.
    fn skip_values_block(&mut self) {
        let kw = self.stream.advance();
        self.stream.error_at(
            kw.span,
            DiagCode::UnsupportedConstruct,
            "VALUES blocks are not supported",
        );
        while !self.stream.is_eof() && !self.stream.check(&TokenKind::LBrace) {
            if self.stream.check(&TokenKind::RBrace) {
                return;
            }
            self.stream.advance();
        }
        if self.stream.match_token(&TokenKind::LBrace) {
            let mut depth = 1usize;
            while depth > 0 && !self.stream.is_eof() {
                match self.stream.advance().kind {
                    TokenKind::LBrace => depth += 1,
                    TokenKind::RBrace => depth -= 1,
                    _ => {}
                }
            }
        }
    }
}

fn flush_triples(patterns: &mut Vec<GraphPattern>, triples: &mut Vec<TriplePattern>) {
    if triples.is_empty() {
        return;
    }
    let drained = std::mem::take(triples);
    let span = triples_span(&drained);
    patterns.push(GraphPattern::Bgp {
        triples: drained,
        span,
    });
}

fn triples_span(triples: &[TriplePattern]) -> SourceSpan {
    triples
        .iter()
        .map(|t| t.span)
        .reduce(SourceSpan::union)
        .unwrap_or_default()
}

/// A group with exactly one element is that element; everything else stays
/// a group. An empty group is an empty BGP.
fn collapse_group(mut patterns: Vec<GraphPattern>, span: SourceSpan) -> GraphPattern {
    match patterns.len() {
        0 => GraphPattern::Bgp {
            triples: Vec::new(),
            span,
        },
        1 => patterns.remove(0),
        _ => GraphPattern::Group { patterns, span },
    }
}
