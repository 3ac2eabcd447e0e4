//! Structured diagnostics for lexing and parsing.
//!
//! Failures never panic and never abort at the first problem: the lexer and
//! parser push [`Diagnostic`] values and keep going, so one pass reports as
//! much as possible. Each diagnostic carries a stable code, a severity, and
//! a byte span into the original source.

pub mod render;

use crate::span::SourceSpan;
use serde::{Deserialize, Serialize};

pub use render::{render_diagnostic, render_diagnostics};

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

/// Stable diagnostic codes.
///
/// Codes are part of the public surface: tools match on them, so variants
/// may be added but existing codes never change meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DiagCode {
    /// A specific token was required but something else was found
    #[serde(rename = "S001")]
    ExpectedToken,
    /// A token that cannot appear here
    #[serde(rename = "S002")]
    UnexpectedToken,
    /// Input ended mid-construct
    #[serde(rename = "S003")]
    UnexpectedEof,
    /// A character the lexer cannot start any token with
    #[serde(rename = "S004")]
    UnexpectedCharacter,
    /// String literal not closed before end of line or input
    #[serde(rename = "S005")]
    UnterminatedString,
    /// `<` opened an IRI that never closes
    #[serde(rename = "S006")]
    UnterminatedIri,
    /// Numeric literal that does not fit or is malformed
    #[serde(rename = "S007")]
    InvalidNumber,
    /// LIMIT or OFFSET with a negative argument
    #[serde(rename = "S008")]
    NegativeLimit,
    /// Grammar this parser deliberately does not cover
    #[serde(rename = "S009")]
    UnsupportedConstruct,
    /// Bad escape sequence in a string literal
    #[serde(rename = "S010")]
    InvalidEscape,
}

impl DiagCode {
    /// The stable code string, e.g. `"S001"`.
    pub fn code(&self) -> &'static str {
        match self {
            DiagCode::ExpectedToken => "S001",
            DiagCode::UnexpectedToken => "S002",
            DiagCode::UnexpectedEof => "S003",
            DiagCode::UnexpectedCharacter => "S004",
            DiagCode::UnterminatedString => "S005",
            DiagCode::UnterminatedIri => "S006",
            DiagCode::InvalidNumber => "S007",
            DiagCode::NegativeLimit => "S008",
            DiagCode::UnsupportedConstruct => "S009",
            DiagCode::InvalidEscape => "S010",
        }
    }

    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }
}

/// A secondary span attached to a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub span: SourceSpan,
    pub message: String,
}

impl Label {
    pub fn new(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A single problem found in the source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagCode,
    pub severity: Severity,
    pub message: String,
    pub span: SourceSpan,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Diagnostic {
    pub fn new(
        code: DiagCode,
        severity: Severity,
        message: impl Into<String>,
        span: SourceSpan,
    ) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            span,
            labels: Vec::new(),
            help: None,
            note: None,
        }
    }

    pub fn error(code: DiagCode, message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(code, Severity::Error, message, span)
    }

    pub fn warning(code: DiagCode, message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(code, Severity::Warning, message, span)
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Result of a parse: the AST (when recoverable) plus everything reported
/// along the way.
#[derive(Clone, Debug)]
pub struct ParseOutput<T> {
    /// The parsed value; `None` when errors made the input unusable.
    pub ast: Option<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> ParseOutput<T> {
    pub fn new(ast: Option<T>, diagnostics: Vec<Diagnostic>) -> Self {
        Self { ast, diagnostics }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}
