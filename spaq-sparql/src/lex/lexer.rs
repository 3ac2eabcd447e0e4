//! Hand-written SPARQL lexer.
//!
//! Scans the whole input into a token vector, reporting problems as
//! diagnostics and `TokenKind::Error` placeholders rather than stopping at
//! the first bad character. The parser decides what to do with errors.

use crate::diag::{DiagCode, Diagnostic};
use crate::lex::chars;
use crate::lex::token::{keyword_from_str, Token, TokenKind};
use crate::span::SourceSpan;
use std::sync::Arc;

/// Tokenize `source`, returning the tokens (always ending in `Eof`) and any
/// diagnostics produced along the way.
pub fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer {
        source,
        pos: 0,
        tokens: Vec::new(),
        diagnostics: Vec::new(),
    };
    lexer.run();
    (lexer.tokens, lexer.diagnostics)
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) {
        loop {
            self.skip_trivia();
            let start = self.pos;
            let Some(c) = self.peek() else {
                self.tokens
                    .push(Token::new(TokenKind::Eof, SourceSpan::point(self.pos)));
                return;
            };
            match c {
                '<' => self.angle(start),
                '>' => {
                    self.bump();
                    if self.eat('=') {
                        self.push(TokenKind::Ge, start);
                    } else {
                        self.push(TokenKind::Gt, start);
                    }
                }
                '?' | '$' => self.variable(start, c),
                '"' | '\'' => self.string(start, c),
                '@' => self.lang_tag(start),
                '_' => self.blank_node(start),
                ':' => self.prefixed_name(start, String::new()),
                '0'..='9' => self.number(start),
                '.' => {
                    if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                        self.number(start);
                    } else {
                        self.bump();
                        self.push(TokenKind::Dot, start);
                    }
                }
                '{' => self.single(TokenKind::LBrace, start),
                '}' => self.single(TokenKind::RBrace, start),
                '(' => self.single(TokenKind::LParen, start),
                ')' => self.single(TokenKind::RParen, start),
                '[' => self.bracket(start),
                ']' => self.single(TokenKind::RBracket, start),
                ';' => self.single(TokenKind::Semicolon, start),
                ',' => self.single(TokenKind::Comma, start),
                '*' => self.single(TokenKind::Star, start),
                '/' => self.single(TokenKind::Slash, start),
                '+' => self.single(TokenKind::Plus, start),
                '-' => self.single(TokenKind::Minus, start),
                '=' => self.single(TokenKind::Eq, start),
                '!' => {
                    self.bump();
                    if self.eat('=') {
                        self.push(TokenKind::Ne, start);
                    } else {
                        self.push(TokenKind::Bang, start);
                    }
                }
                '^' => {
                    self.bump();
                    if self.eat('^') {
                        self.push(TokenKind::DoubleCaret, start);
                    } else {
                        self.push(TokenKind::Caret, start);
                    }
                }
                '|' => {
                    self.bump();
                    if self.eat('|') {
                        self.push(TokenKind::OrOr, start);
                    } else {
                        self.push(TokenKind::Pipe, start);
                    }
                }
                '&' => {
                    self.bump();
                    if self.eat('&') {
                        self.push(TokenKind::AndAnd, start);
                    } else {
                        self.error_token(start, DiagCode::UnexpectedCharacter, "stray `&`");
                    }
                }
                c if chars::is_pn_chars_base(c) => self.word(start),
                other => {
                    self.bump();
                    self.error_token(
                        start,
                        DiagCode::UnexpectedCharacter,
                        format!("unexpected character `{other}`"),
                    );
                }
            }
        }
    }

    // Cursor primitives

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens
            .push(Token::new(kind, SourceSpan::new(start, self.pos)));
    }

    fn single(&mut self, kind: TokenKind, start: usize) {
        self.bump();
        self.push(kind, start);
    }

    fn error_token(&mut self, start: usize, code: DiagCode, message: impl Into<String>) {
        let message = message.into();
        let span = SourceSpan::new(start, self.pos.max(start + 1).min(self.source.len().max(start)));
        self.diagnostics
            .push(Diagnostic::error(code, message.clone(), span));
        self.push(TokenKind::Error(Arc::from(message.as_str())), start);
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if chars::is_ws(c) {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.peek() {
                    self.bump();
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    // Token scanners

    /// `<` starts either an IRI, `<=`, or the less-than operator.
    fn angle(&mut self, start: usize) {
        if self.peek_at(1) == Some('=') {
            self.bump();
            self.bump();
            self.push(TokenKind::Le, start);
            return;
        }
        // Try an IRIREF: every char to the closing `>` must be legal.
        let mut probe = self.pos + 1;
        for c in self.source[self.pos + 1..].chars() {
            if c == '>' {
                let value = &self.source[self.pos + 1..probe];
                self.pos = probe + 1;
                self.push(TokenKind::Iri(Arc::from(value)), start);
                return;
            }
            if !chars::is_iri_char(c) {
                break;
            }
            probe += c.len_utf8();
        }
        self.bump();
        self.push(TokenKind::Lt, start);
    }

    fn variable(&mut self, start: usize, sigil: char) {
        self.bump();
        if self.peek().is_some_and(chars::is_varname_start) {
            let name_start = self.pos;
            while self.peek().is_some_and(chars::is_varname_char) {
                self.bump();
            }
            let name = &self.source[name_start..self.pos];
            self.push(TokenKind::Var(Arc::from(name)), start);
        } else if sigil == '?' {
            self.push(TokenKind::Question, start);
        } else {
            self.error_token(start, DiagCode::UnexpectedCharacter, "stray `$`");
        }
    }

    fn string(&mut self, start: usize, quote: char) {
        self.bump();
        let long = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if long {
            self.bump();
            self.bump();
        }
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    self.error_token(start, DiagCode::UnterminatedString, "unterminated string");
                    return;
                }
                Some('\n') if !long => {
                    self.error_token(
                        start,
                        DiagCode::UnterminatedString,
                        "string not closed before end of line",
                    );
                    return;
                }
                Some('\\') => {
                    self.bump();
                    self.escape(start, &mut value);
                }
                Some(c) if c == quote => {
                    self.bump();
                    if !long {
                        break;
                    }
                    if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                        self.bump();
                        self.bump();
                        break;
                    }
                    value.push(quote);
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
        self.push(TokenKind::String(Arc::from(value.as_str())), start);
    }

    fn escape(&mut self, token_start: usize, value: &mut String) {
        let esc_start = self.pos.saturating_sub(1);
        match self.bump() {
            Some('t') => value.push('\t'),
            Some('b') => value.push('\u{0008}'),
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('f') => value.push('\u{000C}'),
            Some('"') => value.push('"'),
            Some('\'') => value.push('\''),
            Some('\\') => value.push('\\'),
            Some('u') => self.unicode_escape(esc_start, 4, value),
            Some('U') => self.unicode_escape(esc_start, 8, value),
            Some(other) => {
                self.diagnostics.push(Diagnostic::error(
                    DiagCode::InvalidEscape,
                    format!("unknown escape `\\{other}`"),
                    SourceSpan::new(esc_start, self.pos),
                ));
            }
            None => {
                self.diagnostics.push(Diagnostic::error(
                    DiagCode::UnterminatedString,
                    "unterminated string",
                    SourceSpan::new(token_start, self.pos),
                ));
            }
        }
    }

    fn unicode_escape(&mut self, esc_start: usize, digits: usize, value: &mut String) {
        let hex_start = self.pos;
        for _ in 0..digits {
            if self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            } else {
                self.diagnostics.push(Diagnostic::error(
                    DiagCode::InvalidEscape,
                    format!("expected {digits} hex digits"),
                    SourceSpan::new(esc_start, self.pos),
                ));
                return;
            }
        }
        let code = u32::from_str_radix(&self.source[hex_start..self.pos], 16).unwrap_or(0);
        match char::from_u32(code) {
            Some(c) => value.push(c),
            None => self.diagnostics.push(Diagnostic::error(
                DiagCode::InvalidEscape,
                "escape is not a valid code point",
                SourceSpan::new(esc_start, self.pos),
            )),
        }
    }

    fn lang_tag(&mut self, start: usize) {
        self.bump();
        let tag_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
        }
        if self.pos == tag_start {
            self.error_token(start, DiagCode::UnexpectedCharacter, "empty language tag");
            return;
        }
        while self.peek() == Some('-') {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
                self.bump();
            }
        }
        let tag = &self.source[tag_start..self.pos];
        self.push(TokenKind::LangTag(Arc::from(tag)), start);
    }

    fn blank_node(&mut self, start: usize) {
        self.bump();
        if !self.eat(':') {
            self.error_token(
                start,
                DiagCode::UnexpectedCharacter,
                "`_` must start a blank node label `_:name`",
            );
            return;
        }
        let label_start = self.pos;
        if !self
            .peek()
            .is_some_and(|c| chars::is_pn_chars_u(c) || c.is_ascii_digit())
        {
            self.error_token(start, DiagCode::UnexpectedCharacter, "empty blank node label");
            return;
        }
        self.bump();
        let mut end = self.pos;
        while let Some(c) = self.peek() {
            if chars::is_pn_chars(c) {
                self.bump();
                end = self.pos;
            } else if c == '.' {
                // dots are allowed inside a label but never at the end
                self.bump();
            } else {
                break;
            }
        }
        self.pos = end;
        let label = &self.source[label_start..end];
        self.push(TokenKind::BlankNodeLabel(Arc::from(label)), start);
    }

    fn number(&mut self, start: usize) {
        let mut is_decimal = false;
        let mut is_double = false;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_decimal = true;
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let save = self.pos;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_double = true;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            } else {
                // `12e` is `12` followed by a word; back off
                self.pos = save;
            }
        }
        let text = &self.source[start..self.pos];
        if is_double {
            self.push(TokenKind::Double(Arc::from(text)), start);
        } else if is_decimal {
            self.push(TokenKind::Decimal(Arc::from(text)), start);
        } else {
            match text.parse::<i64>() {
                Ok(v) => self.push(TokenKind::Integer(v), start),
                Err(_) => self.error_token(
                    start,
                    DiagCode::InvalidNumber,
                    format!("integer `{text}` is out of range"),
                ),
            }
        }
    }

    /// A bare word: keyword, or the prefix part of a prefixed name.
    fn word(&mut self, start: usize) {
        self.bump();
        let mut end = self.pos;
        while let Some(c) = self.peek() {
            if chars::is_pn_chars(c) {
                self.bump();
                end = self.pos;
            } else if c == '.' {
                self.bump();
            } else {
                break;
            }
        }
        self.pos = end;
        let word = &self.source[start..end];
        if self.peek() == Some(':') {
            self.prefixed_name(start, word.to_string());
            return;
        }
        match keyword_from_str(word) {
            Some(kind) => self.push(kind, start),
            None => self.error_token(
                start,
                DiagCode::UnexpectedToken,
                format!("`{word}` is not a keyword; prefixed names need a colon"),
            ),
        }
    }

    /// Scan the `:local` part after a prefix (which may be empty).
    fn prefixed_name(&mut self, start: usize, prefix: String) {
        self.bump(); // ':'
        let local_start = self.pos;
        let mut end = self.pos;
        if self
            .peek()
            .is_some_and(|c| chars::is_pn_local_start(c) || c == '%' || c == '\\')
        {
            loop {
                match self.peek() {
                    Some(c) if chars::is_pn_chars(c) || c == ':' => {
                        self.bump();
                        end = self.pos;
                    }
                    Some('.') => {
                        // only valid mid-name
                        self.bump();
                    }
                    Some('%')
                        if self.peek_at(1).is_some_and(|c| c.is_ascii_hexdigit())
                            && self.peek_at(2).is_some_and(|c| c.is_ascii_hexdigit()) =>
                    {
                        self.bump();
                        self.bump();
                        self.bump();
                        end = self.pos;
                    }
                    Some('\\') if self.peek_at(1).is_some() => {
                        self.bump();
                        self.bump();
                        end = self.pos;
                    }
                    _ => break,
                }
            }
            self.pos = end;
        }
        let local = &self.source[local_start..end];
        self.push(
            TokenKind::PrefixedName {
                prefix: Arc::from(prefix.as_str()),
                local: Arc::from(local),
            },
            start,
        );
    }

    /// `[` is either ANON (`[]`, possibly with inner whitespace) or an
    /// opening bracket.
    fn bracket(&mut self, start: usize) {
        let mut probe = self.pos + 1;
        for c in self.source[self.pos + 1..].chars() {
            if chars::is_ws(c) {
                probe += c.len_utf8();
            } else if c == ']' {
                self.pos = probe + 1;
                self.push(TokenKind::Anon, start);
                return;
            } else {
                break;
            }
        }
        self.single(TokenKind::LBracket, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::token::{AggregateFn, BuiltinFn};

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, diagnostics) = lex(source);
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_basic_select() {
        let kinds = kinds("SELECT ?s WHERE { ?s ?p ?o }");
        assert_eq!(
            kinds,
            vec![
                TokenKind::KwSelect,
                TokenKind::Var("s".into()),
                TokenKind::KwWhere,
                TokenKind::LBrace,
                TokenKind::Var("s".into()),
                TokenKind::Var("p".into()),
                TokenKind::Var("o".into()),
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn iri_vs_less_than() {
        let kinds = kinds("<http://example.org/x> < <= ?x");
        assert_eq!(kinds[0], TokenKind::Iri("http://example.org/x".into()));
        assert_eq!(kinds[1], TokenKind::Lt);
        assert_eq!(kinds[2], TokenKind::Le);
    }

    #[test]
    fn prefixed_names() {
        let kinds = kinds("foaf:name ex: :bare rdf:type");
        assert_eq!(
            kinds[0],
            TokenKind::PrefixedName {
                prefix: "foaf".into(),
                local: "name".into()
            }
        );
        assert_eq!(
            kinds[1],
            TokenKind::PrefixedName {
                prefix: "ex".into(),
                local: "".into()
            }
        );
        assert_eq!(
            kinds[2],
            TokenKind::PrefixedName {
                prefix: "".into(),
                local: "bare".into()
            }
        );
    }

    #[test]
    fn local_name_with_inner_dot() {
        let kinds = kinds("ex:a.b .");
        assert_eq!(
            kinds[0],
            TokenKind::PrefixedName {
                prefix: "ex".into(),
                local: "a.b".into()
            }
        );
        // the trailing dot stays a statement terminator
        assert_eq!(kinds[1], TokenKind::Dot);
    }

    #[test]
    fn numbers() {
        let kinds = kinds("42 3.14 1e6 2.5E-3 .5");
        assert_eq!(kinds[0], TokenKind::Integer(42));
        assert_eq!(kinds[1], TokenKind::Decimal("3.14".into()));
        assert_eq!(kinds[2], TokenKind::Double("1e6".into()));
        assert_eq!(kinds[3], TokenKind::Double("2.5E-3".into()));
        assert_eq!(kinds[4], TokenKind::Decimal(".5".into()));
    }

    #[test]
    fn strings_and_tags() {
        let kinds = kinds(r#""hello" 'world' "esc\"d" "x"@en-US "y"^^<http://t>"#);
        assert_eq!(kinds[0], TokenKind::String("hello".into()));
        assert_eq!(kinds[1], TokenKind::String("world".into()));
        assert_eq!(kinds[2], TokenKind::String("esc\"d".into()));
        assert_eq!(kinds[3], TokenKind::String("x".into()));
        assert_eq!(kinds[4], TokenKind::LangTag("en-US".into()));
        assert_eq!(kinds[5], TokenKind::String("y".into()));
        assert_eq!(kinds[6], TokenKind::DoubleCaret);
        assert_eq!(kinds[7], TokenKind::Iri("http://t".into()));
    }

    #[test]
    fn long_string_spans_lines() {
        let kinds = kinds("\"\"\"two\nlines\"\"\"");
        assert_eq!(kinds[0], TokenKind::String("two\nlines".into()));
    }

    #[test]
    fn unterminated_string_reports() {
        let (tokens, diagnostics) = lex("\"open\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagCode::UnterminatedString);
        assert!(matches!(tokens[0].kind, TokenKind::Error(_)));
    }

    #[test]
    fn comments_are_skipped() {
        let kinds = kinds("SELECT # trailing comment\n?x");
        assert_eq!(kinds[0], TokenKind::KwSelect);
        assert_eq!(kinds[1], TokenKind::Var("x".into()));
    }

    #[test]
    fn anon_and_brackets() {
        let kinds = kinds("[] [ ] ?x");
        assert_eq!(kinds[0], TokenKind::Anon);
        assert_eq!(kinds[1], TokenKind::Anon);
        assert_eq!(kinds[2], TokenKind::Var("x".into()));
    }

    #[test]
    fn blank_node_labels() {
        let kinds = kinds("_:b1 _:x.y .");
        assert_eq!(kinds[0], TokenKind::BlankNodeLabel("b1".into()));
        assert_eq!(kinds[1], TokenKind::BlankNodeLabel("x.y".into()));
        assert_eq!(kinds[2], TokenKind::Dot);
    }

    #[test]
    fn builtins_and_aggregates() {
        let kinds = kinds("REGEX(?x) count(*)");
        assert_eq!(kinds[0], TokenKind::Builtin(BuiltinFn::Regex));
        assert_eq!(kinds[4], TokenKind::Aggregate(AggregateFn::Count));
    }

    #[test]
    fn operators() {
        let kinds = kinds("= != <= >= && || ! ^ ^^ | /");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Eq,
                TokenKind::Ne,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::Caret,
                TokenKind::DoubleCaret,
                TokenKind::Pipe,
                TokenKind::Slash,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bare_question_mark_is_path_modifier() {
        let kinds = kinds("ex:p? ?x");
        assert_eq!(kinds[1], TokenKind::Question);
        assert_eq!(kinds[2], TokenKind::Var("x".into()));
    }

    #[test]
    fn spans_are_byte_accurate() {
        let (tokens, _) = lex("SELECT ?abc");
        assert_eq!(tokens[0].span, SourceSpan::new(0, 6));
        assert_eq!(tokens[1].span, SourceSpan::new(7, 11));
    }
}
