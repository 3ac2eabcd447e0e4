//! SPARQL 1.1 query parsing and formatting.
//!
//! A hand-written lexer feeds a recursive-descent parser that builds a
//! fully spanned AST and reports problems as structured diagnostics
//! instead of panicking or bailing at the first error. A canonical
//! formatter turns the AST back into stable, pretty-printed text.
//!
//! Property paths are deliberately left unstructured: the parser keeps the
//! verbatim token run and the formatter reproduces it unchanged.
//!
//! # Quick start
//!
//! ```
//! use spaq_sparql::{parse_query, format_query, FormatOptions};
//!
//! let out = parse_query("select ?who where { ?who a foaf:Person }");
//! assert!(!out.has_errors());
//!
//! let query = out.ast.unwrap();
//! let pretty = format_query(&query, &FormatOptions::default());
//! assert_eq!(pretty, "SELECT ?who\nWHERE {\n  ?who a foaf:Person .\n}\n");
//! ```

pub mod ast;
pub mod diag;
pub mod fmt;
pub mod lex;
pub mod parse;
pub mod span;

pub use diag::{render_diagnostic, render_diagnostics, DiagCode, Diagnostic, ParseOutput, Severity};
pub use fmt::{format_query, FormatOptions};
pub use parse::parse_query;
pub use span::{LineCol, LineIndex, SourceSpan};
