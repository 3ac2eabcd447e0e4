//! Cursor over the token vector, with diagnostic collection and backtracking.

use crate::ast::term::{Iri, Var};
use crate::diag::{DiagCode, Diagnostic};
use crate::lex::{Token, TokenKind};
use crate::span::SourceSpan;
use std::mem::discriminant;
use std::sync::Arc;

/// The parser's view of the token list.
///
/// The stream never runs past the trailing `Eof` token: `advance` at the
/// end keeps returning it. Diagnostics accumulate here so that helpers at
/// any level can report without threading a sink around.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(TokenKind::Eof)
        ));
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    // Position management

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn restore(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    // Diagnostics

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    // Inspection

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub fn peek_n(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    pub fn current_span(&self) -> SourceSpan {
        self.peek().span
    }

    pub fn previous_span(&self) -> SourceSpan {
        if self.pos == 0 {
            SourceSpan::point(0)
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    // Consumption

    /// Take the current token and move forward (except at `Eof`).
    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    /// Does the current token have the same kind (payload ignored)?
    pub fn check(&self, kind: &TokenKind) -> bool {
        discriminant(self.peek_kind()) == discriminant(kind)
    }

    /// Consume the current token if it matches.
    pub fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a required token, reporting an error when absent.
    pub fn expect(&mut self, kind: &TokenKind, what: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_expected(what);
            None
        }
    }

    pub fn error_at(&mut self, span: SourceSpan, code: DiagCode, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::error(code, message, span));
    }

    pub fn error_at_current(&mut self, code: DiagCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(span, code, message);
    }

    /// Standard "expected X, found Y" report at the current token.
    pub fn error_expected(&mut self, what: &str) {
        let found = self.peek();
        let (code, message) = if matches!(found.kind, TokenKind::Eof) {
            (
                DiagCode::UnexpectedEof,
                format!("expected {what}, found end of input"),
            )
        } else {
            (
                DiagCode::ExpectedToken,
                format!("expected {what}, found {}", found.kind.describe()),
            )
        };
        let span = found.span;
        self.error_at(span, code, message);
    }

    /// Skip ahead to a plausible recovery point: after a `.`, or at a
    /// brace or a clause-starting keyword.
    pub fn synchronize(&mut self) {
        while !self.is_eof() {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::KwSelect
                | TokenKind::KwConstruct
                | TokenKind::KwDescribe
                | TokenKind::KwAsk
                | TokenKind::KwWhere
                | TokenKind::KwOptional
                | TokenKind::KwFilter
                | TokenKind::KwBind
                | TokenKind::KwUnion
                | TokenKind::KwMinus
                | TokenKind::KwGraph
                | TokenKind::KwGroup
                | TokenKind::KwOrder
                | TokenKind::KwHaving
                | TokenKind::KwLimit
                | TokenKind::KwOffset => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Run `f`; on `None`, rewind both position and diagnostics.
    pub fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let pos = self.pos;
        let diag_len = self.diagnostics.len();
        let result = f(self);
        if result.is_none() {
            self.pos = pos;
            self.diagnostics.truncate(diag_len);
        }
        result
    }

    // Typed consumption helpers

    pub fn consume_var(&mut self) -> Option<Var> {
        if let TokenKind::Var(name) = self.peek_kind() {
            let name = name.clone();
            let token = self.advance();
            Some(Var::new(name, token.span))
        } else {
            self.error_expected("a variable");
            None
        }
    }

    /// Consume `<iri>` or `prefix:local` into an [`Iri`].
    pub fn consume_iri(&mut self) -> Option<Iri> {
        match self.peek_kind() {
            TokenKind::Iri(value) => {
                let value = value.clone();
                let token = self.advance();
                Some(Iri::full(value, token.span))
            }
            TokenKind::PrefixedName { prefix, local } => {
                let (prefix, local) = (prefix.clone(), local.clone());
                let token = self.advance();
                Some(Iri::prefixed(prefix, local, token.span))
            }
            _ => {
                self.error_expected("an IRI");
                None
            }
        }
    }

    /// Consume a full `<iri>` only (prologue declarations).
    pub fn consume_full_iri(&mut self) -> Option<(Arc<str>, SourceSpan)> {
        if let TokenKind::Iri(value) = self.peek_kind() {
            let value = value.clone();
            let token = self.advance();
            Some((value, token.span))
        } else {
            self.error_expected("an IRI in angle brackets");
            None
        }
    }

    pub fn consume_string(&mut self) -> Option<(Arc<str>, SourceSpan)> {
        if let TokenKind::String(value) = self.peek_kind() {
            let value = value.clone();
            let token = self.advance();
            Some((value, token.span))
        } else {
            self.error_expected("a string literal");
            None
        }
    }

    pub fn consume_integer(&mut self) -> Option<(i64, SourceSpan)> {
        if let TokenKind::Integer(value) = self.peek_kind() {
            let value = *value;
            let token = self.advance();
            Some((value, token.span))
        } else {
            self.error_expected("an integer");
            None
        }
    }
}
