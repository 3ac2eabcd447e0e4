//! Typed failures and non-fatal warnings.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A placeholder had no named binding, no positional value left, and
    /// no declared default.
    #[error("missing value for parameter `{name}`")]
    MissingParameter { name: String },

    /// A positional value appeared after a named one; the assignment
    /// would be ambiguous.
    #[error("positional value `{value}` appears after a named binding")]
    PositionalAfterNamed { value: String },

    /// A limit that does not parse as a non-negative integer.
    #[error("invalid limit `{value}`: expected a non-negative integer")]
    InvalidLimit { value: String },
}

/// Conditions worth surfacing without failing the operation.
///
/// An unresolvable prefix in a shortcut term is deliberately not an error:
/// the token is passed through as a bare IRI and the caller decides how
/// loudly to complain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    UnresolvedPrefix { token: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnresolvedPrefix { token } => {
                write!(f, "no namespace registered for `{token}`; treating it as an IRI")
            }
        }
    }
}
