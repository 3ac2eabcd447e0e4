//! Recursive-descent parsing of the token stream into the AST.

mod expr;
pub mod query;
pub mod stream;

pub use query::parse_query;
pub use stream::TokenStream;
