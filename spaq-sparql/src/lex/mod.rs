//! Lexical analysis: source text to tokens.

pub mod chars;
mod lexer;
mod token;

pub use lexer::lex;
pub use token::{keyword_from_str, AggregateFn, BuiltinFn, Token, TokenKind};
