//! Query entry point: prologue and query-form dispatch.

mod modifier;
mod pattern;
mod select;
mod term;


use crate::ast::{
    AskQuery, BaseDecl, ConstructQuery, DescribeQuery, DescribeTargets, PrefixDecl, Prologue,
    Query, QueryBody, VarOrIri, WhereClause,
};
use crate::diag::{DiagCode, Diagnostic, ParseOutput};
use crate::lex::{lex, TokenKind};
use crate::parse::stream::TokenStream;
use crate::span::SourceSpan;

/// Parse a complete SPARQL query.
///
/// Always returns every diagnostic found; `ast` is `None` whenever any of
/// them is an error.
pub fn parse_query(source: &str) -> ParseOutput<Query> {
    let (tokens, mut diagnostics) = lex(source);
    let mut parser = Parser {
        stream: TokenStream::new(tokens),
    };
    let ast = parser.parse();
    diagnostics.extend(parser.stream.take_diagnostics());
    let failed = diagnostics.iter().any(Diagnostic::is_error);
    ParseOutput::new(if failed { None } else { ast }, diagnostics)
}

pub(crate) struct Parser {
    pub(crate) stream: TokenStream,
}

impl Parser {
    fn parse(&mut self) -> Option<Query> {
        let start = self.stream.current_span();
        let prologue = self.parse_prologue();
        let body = self.parse_query_body()?;
        if !self.stream.is_eof() {
            self.stream
                .error_expected("end of input after the query");
        }
        let span = start.union(self.stream.previous_span());
        Some(Query {
            prologue,
            body,
            span,
        })
    }

    /// Zero or more BASE / PREFIX declarations, in any order.
    fn parse_prologue(&mut self) -> Prologue {
        let mut prologue = Prologue::default();
        loop {
            match self.stream.peek_kind() {
                TokenKind::KwBase => {
                    let kw = self.stream.advance();
                    if let Some((iri, iri_span)) = self.stream.consume_full_iri() {
                        // a later BASE overrides an earlier one
                        prologue.base = Some(BaseDecl {
                            iri,
                            span: kw.span.union(iri_span),
                        });
                    }
                }
                TokenKind::KwPrefix => {
                    let kw = self.stream.advance();
                    let Some(decl) = self.parse_prefix_decl(kw.span) else {
                        self.stream.synchronize();
                        continue;
                    };
                    prologue.prefixes.push(decl);
                }
                _ => break,
            }
        }
        prologue
    }

    fn parse_prefix_decl(&mut self, kw_span: SourceSpan) -> Option<PrefixDecl> {
        let TokenKind::PrefixedName { prefix, local } = self.stream.peek_kind() else {
            self.stream.error_expected("a prefix label like `ex:`");
            return None;
        };
        let (prefix, local) = (prefix.clone(), local.clone());
        let label = self.stream.advance();
        if !local.is_empty() {
            self.stream.error_at(
                label.span,
                DiagCode::UnexpectedToken,
                format!("prefix declarations take a bare label, not `{prefix}:{local}`"),
            );
            return None;
        }
        let (iri, iri_span) = self.stream.consume_full_iri()?;
        Some(PrefixDecl {
            prefix,
            iri,
            span: kw_span.union(iri_span),
        })
    }

    fn parse_query_body(&mut self) -> Option<QueryBody> {
        match self.stream.peek_kind() {
            TokenKind::KwSelect => self.parse_select_query().map(QueryBody::Select),
            TokenKind::KwConstruct => self.parse_construct_query().map(QueryBody::Construct),
            TokenKind::KwAsk => self.parse_ask_query().map(QueryBody::Ask),
            TokenKind::KwDescribe => self.parse_describe_query().map(QueryBody::Describe),
            _ => {
                self.stream
                    .error_expected("a query form (SELECT, CONSTRUCT, ASK, or DESCRIBE)");
                None
            }
        }
    }

    fn parse_construct_query(&mut self) -> Option<ConstructQuery> {
        let kw = self.stream.advance();
        self.stream.expect(
            &TokenKind::LBrace,
            "`{` to open the CONSTRUCT template",
        )?;
        let mut template = Vec::new();
        loop {
            match self.stream.peek_kind() {
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Dot => {
                    self.stream.advance();
                }
                kind if kind.is_term_start() => {
                    self.parse_triples_into(&mut template)?;
                }
                _ => {
                    self.stream.error_expected("a triple pattern or `}`");
                    return None;
                }
            }
        }
        self.stream
            .expect(&TokenKind::RBrace, "`}` to close the CONSTRUCT template")?;
        let datasets = self.parse_dataset_clauses();
        let where_clause = self.parse_where_clause()?;
        let modifiers = self.parse_solution_modifiers();
        let span = kw.span.union(self.stream.previous_span());
        Some(ConstructQuery {
            template,
            datasets,
            where_clause,
            modifiers,
            span,
        })
    }

    fn parse_ask_query(&mut self) -> Option<AskQuery> {
        let kw = self.stream.advance();
        let datasets = self.parse_dataset_clauses();
        let where_clause = self.parse_where_clause()?;
        let modifiers = self.parse_solution_modifiers();
        let span = kw.span.union(self.stream.previous_span());
        Some(AskQuery {
            datasets,
            where_clause,
            modifiers,
            span,
        })
    }

    fn parse_describe_query(&mut self) -> Option<DescribeQuery> {
        let kw = self.stream.advance();
        let targets = if self.stream.match_token(&TokenKind::Star) {
            DescribeTargets::Star
        } else {
            let mut resources = Vec::new();
            loop {
                match self.stream.peek_kind() {
                    TokenKind::Var(_) => {
                        resources.push(VarOrIri::Var(self.stream.consume_var()?));
                    }
                    TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => {
                        resources.push(VarOrIri::Iri(self.stream.consume_iri()?));
                    }
                    _ => break,
                }
            }
            if resources.is_empty() {
                self.stream
                    .error_expected("`*` or at least one variable or IRI");
                return None;
            }
            DescribeTargets::Resources(resources)
        };
        let datasets = self.parse_dataset_clauses();
        let where_clause = if matches!(
            self.stream.peek_kind(),
            TokenKind::KwWhere | TokenKind::LBrace
        ) {
            Some(self.parse_where_clause()?)
        } else {
            None
        };
        let modifiers = self.parse_solution_modifiers();
        let span = kw.span.union(self.stream.previous_span());
        Some(DescribeQuery {
            targets,
            datasets,
            where_clause,
            modifiers,
            span,
        })
    }

    /// `WHERE` is optional before the group; the group itself is not.
    pub(crate) fn parse_where_clause(&mut self) -> Option<WhereClause> {
        let start = self.stream.current_span();
        self.stream.match_token(&TokenKind::KwWhere);
        let pattern = self.parse_group_graph_pattern()?;
        let span = start.union(pattern.span());
        Some(WhereClause { pattern, span })
    }
}
