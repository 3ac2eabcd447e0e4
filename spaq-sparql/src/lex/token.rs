//! Token definitions for the SPARQL lexer.

use crate::span::SourceSpan;
use std::fmt;
use std::sync::Arc;

/// A lexed token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(kind: TokenKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }
}

/// Built-in call names the expression grammar recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinFn {
    Str,
    Lang,
    LangMatches,
    Datatype,
    Bound,
    Iri,
    Uri,
    Abs,
    Ceil,
    Floor,
    Round,
    Concat,
    SubStr,
    StrLen,
    Replace,
    UCase,
    LCase,
    Contains,
    StrStarts,
    StrEnds,
    StrBefore,
    StrAfter,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Now,
    If,
    Coalesce,
    SameTerm,
    IsIri,
    IsUri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Regex,
}

impl BuiltinFn {
    /// Canonical (uppercase) spelling used when rendering.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinFn::Str => "STR",
            BuiltinFn::Lang => "LANG",
            BuiltinFn::LangMatches => "LANGMATCHES",
            BuiltinFn::Datatype => "DATATYPE",
            BuiltinFn::Bound => "BOUND",
            BuiltinFn::Iri => "IRI",
            BuiltinFn::Uri => "URI",
            BuiltinFn::Abs => "ABS",
            BuiltinFn::Ceil => "CEIL",
            BuiltinFn::Floor => "FLOOR",
            BuiltinFn::Round => "ROUND",
            BuiltinFn::Concat => "CONCAT",
            BuiltinFn::SubStr => "SUBSTR",
            BuiltinFn::StrLen => "STRLEN",
            BuiltinFn::Replace => "REPLACE",
            BuiltinFn::UCase => "UCASE",
            BuiltinFn::LCase => "LCASE",
            BuiltinFn::Contains => "CONTAINS",
            BuiltinFn::StrStarts => "STRSTARTS",
            BuiltinFn::StrEnds => "STRENDS",
            BuiltinFn::StrBefore => "STRBEFORE",
            BuiltinFn::StrAfter => "STRAFTER",
            BuiltinFn::Year => "YEAR",
            BuiltinFn::Month => "MONTH",
            BuiltinFn::Day => "DAY",
            BuiltinFn::Hours => "HOURS",
            BuiltinFn::Minutes => "MINUTES",
            BuiltinFn::Seconds => "SECONDS",
            BuiltinFn::Now => "NOW",
            BuiltinFn::If => "IF",
            BuiltinFn::Coalesce => "COALESCE",
            BuiltinFn::SameTerm => "SAMETERM",
            BuiltinFn::IsIri => "ISIRI",
            BuiltinFn::IsUri => "ISURI",
            BuiltinFn::IsBlank => "ISBLANK",
            BuiltinFn::IsLiteral => "ISLITERAL",
            BuiltinFn::IsNumeric => "ISNUMERIC",
            BuiltinFn::Regex => "REGEX",
        }
    }
}

/// Aggregate function names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateFn {
    Count,
    Sum,
    Min,
    Max,
    Avg,
    Sample,
    GroupConcat,
}

impl AggregateFn {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFn::Count => "COUNT",
            AggregateFn::Sum => "SUM",
            AggregateFn::Min => "MIN",
            AggregateFn::Max => "MAX",
            AggregateFn::Avg => "AVG",
            AggregateFn::Sample => "SAMPLE",
            AggregateFn::GroupConcat => "GROUP_CONCAT",
        }
    }
}

/// The kinds of token the lexer produces.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Terms
    /// `<http://example.org/x>` (without the angle brackets)
    Iri(Arc<str>),
    /// `ex:name`, `ex:`, or `:name` (prefix without the colon)
    PrefixedName { prefix: Arc<str>, local: Arc<str> },
    /// `?x` or `$x` (without the sigil)
    Var(Arc<str>),
    /// String literal contents, escapes resolved
    String(Arc<str>),
    /// `@en`, `@en-US` (without the `@`)
    LangTag(Arc<str>),
    /// Integer literal
    Integer(i64),
    /// Decimal literal, kept verbatim
    Decimal(Arc<str>),
    /// Double literal, kept verbatim
    Double(Arc<str>),
    /// `_:label` (without the `_:`)
    BlankNodeLabel(Arc<str>),
    /// `[]`
    Anon,

    // Keywords
    KwSelect,
    KwConstruct,
    KwDescribe,
    KwAsk,
    KwWhere,
    KwPrefix,
    KwBase,
    KwDistinct,
    KwReduced,
    KwOptional,
    KwUnion,
    KwMinus,
    KwGraph,
    KwFilter,
    KwBind,
    KwValues,
    KwAs,
    KwFrom,
    KwNamed,
    KwGroup,
    KwOrder,
    KwBy,
    KwHaving,
    KwLimit,
    KwOffset,
    KwAsc,
    KwDesc,
    KwIn,
    KwNot,
    KwExists,
    KwSeparator,
    KwTrue,
    KwFalse,
    /// `a` (rdf:type), lowercase only
    KwA,
    /// Built-in function keyword
    Builtin(BuiltinFn),
    /// Aggregate function keyword
    Aggregate(AggregateFn),

    // Punctuation and operators
    Dot,
    Semicolon,
    Comma,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Star,
    Slash,
    Pipe,
    Caret,
    DoubleCaret,
    Bang,
    Plus,
    Minus,
    /// Bare `?` (path modifier position)
    Question,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,

    /// End of input
    Eof,
    /// Lexer error; the message describes the problem
    Error(Arc<str>),
}

impl TokenKind {
    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    /// Tokens that can begin a triple subject or object.
    pub fn is_term_start(&self) -> bool {
        matches!(
            self,
            TokenKind::Iri(_)
                | TokenKind::PrefixedName { .. }
                | TokenKind::Var(_)
                | TokenKind::String(_)
                | TokenKind::Integer(_)
                | TokenKind::Decimal(_)
                | TokenKind::Double(_)
                | TokenKind::BlankNodeLabel(_)
                | TokenKind::Anon
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::Plus
                | TokenKind::Minus
        )
    }

    /// Tokens that can begin a query form.
    pub fn is_query_form_start(&self) -> bool {
        matches!(
            self,
            TokenKind::KwSelect | TokenKind::KwConstruct | TokenKind::KwDescribe | TokenKind::KwAsk
        )
    }

    /// Short description used in "expected X, found Y" diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Iri(v) => format!("IRI `<{v}>`"),
            TokenKind::PrefixedName { prefix, local } => format!("`{prefix}:{local}`"),
            TokenKind::Var(v) => format!("variable `?{v}`"),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::LangTag(t) => format!("language tag `@{t}`"),
            TokenKind::Integer(v) => format!("`{v}`"),
            TokenKind::Decimal(v) | TokenKind::Double(v) => format!("`{v}`"),
            TokenKind::BlankNodeLabel(l) => format!("`_:{l}`"),
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Error(msg) => format!("invalid token ({msg})"),
            other => format!("`{other}`"),
        }
    }
}

/// Map a bare word to its keyword token, if it is one.
///
/// Keywords are case-insensitive except `a`, which the grammar only admits
/// in lowercase.
pub fn keyword_from_str(word: &str) -> Option<TokenKind> {
    if word == "a" {
        return Some(TokenKind::KwA);
    }
    let upper = word.to_ascii_uppercase();
    let kind = match upper.as_str() {
        "SELECT" => TokenKind::KwSelect,
        "CONSTRUCT" => TokenKind::KwConstruct,
        "DESCRIBE" => TokenKind::KwDescribe,
        "ASK" => TokenKind::KwAsk,
        "WHERE" => TokenKind::KwWhere,
        "PREFIX" => TokenKind::KwPrefix,
        "BASE" => TokenKind::KwBase,
        "DISTINCT" => TokenKind::KwDistinct,
        "REDUCED" => TokenKind::KwReduced,
        "OPTIONAL" => TokenKind::KwOptional,
        "UNION" => TokenKind::KwUnion,
        "MINUS" => TokenKind::KwMinus,
        "GRAPH" => TokenKind::KwGraph,
        "FILTER" => TokenKind::KwFilter,
        "BIND" => TokenKind::KwBind,
        "VALUES" => TokenKind::KwValues,
        "AS" => TokenKind::KwAs,
        "FROM" => TokenKind::KwFrom,
        "NAMED" => TokenKind::KwNamed,
        "GROUP" => TokenKind::KwGroup,
        "ORDER" => TokenKind::KwOrder,
        "BY" => TokenKind::KwBy,
        "HAVING" => TokenKind::KwHaving,
        "LIMIT" => TokenKind::KwLimit,
        "OFFSET" => TokenKind::KwOffset,
        "ASC" => TokenKind::KwAsc,
        "DESC" => TokenKind::KwDesc,
        "IN" => TokenKind::KwIn,
        "NOT" => TokenKind::KwNot,
        "EXISTS" => TokenKind::KwExists,
        "SEPARATOR" => TokenKind::KwSeparator,
        "TRUE" => TokenKind::KwTrue,
        "FALSE" => TokenKind::KwFalse,
        "STR" => TokenKind::Builtin(BuiltinFn::Str),
        "LANG" => TokenKind::Builtin(BuiltinFn::Lang),
        "LANGMATCHES" => TokenKind::Builtin(BuiltinFn::LangMatches),
        "DATATYPE" => TokenKind::Builtin(BuiltinFn::Datatype),
        "BOUND" => TokenKind::Builtin(BuiltinFn::Bound),
        "IRI" => TokenKind::Builtin(BuiltinFn::Iri),
        "URI" => TokenKind::Builtin(BuiltinFn::Uri),
        "ABS" => TokenKind::Builtin(BuiltinFn::Abs),
        "CEIL" => TokenKind::Builtin(BuiltinFn::Ceil),
        "FLOOR" => TokenKind::Builtin(BuiltinFn::Floor),
        "ROUND" => TokenKind::Builtin(BuiltinFn::Round),
        "CONCAT" => TokenKind::Builtin(BuiltinFn::Concat),
        "SUBSTR" => TokenKind::Builtin(BuiltinFn::SubStr),
        "STRLEN" => TokenKind::Builtin(BuiltinFn::StrLen),
        "REPLACE" => TokenKind::Builtin(BuiltinFn::Replace),
        "UCASE" => TokenKind::Builtin(BuiltinFn::UCase),
        "LCASE" => TokenKind::Builtin(BuiltinFn::LCase),
        "CONTAINS" => TokenKind::Builtin(BuiltinFn::Contains),
        "STRSTARTS" => TokenKind::Builtin(BuiltinFn::StrStarts),
        "STRENDS" => TokenKind::Builtin(BuiltinFn::StrEnds),
        "STRBEFORE" => TokenKind::Builtin(BuiltinFn::StrBefore),
        "STRAFTER" => TokenKind::Builtin(BuiltinFn::StrAfter),
        "YEAR" => TokenKind::Builtin(BuiltinFn::Year),
        "MONTH" => TokenKind::Builtin(BuiltinFn::Month),
        "DAY" => TokenKind::Builtin(BuiltinFn::Day),
        "HOURS" => TokenKind::Builtin(BuiltinFn::Hours),
        "MINUTES" => TokenKind::Builtin(BuiltinFn::Minutes),
        "SECONDS" => TokenKind::Builtin(BuiltinFn::Seconds),
        "NOW" => TokenKind::Builtin(BuiltinFn::Now),
        "IF" => TokenKind::Builtin(BuiltinFn::If),
        "COALESCE" => TokenKind::Builtin(BuiltinFn::Coalesce),
        "SAMETERM" => TokenKind::Builtin(BuiltinFn::SameTerm),
        "ISIRI" => TokenKind::Builtin(BuiltinFn::IsIri),
        "ISURI" => TokenKind::Builtin(BuiltinFn::IsUri),
        "ISBLANK" => TokenKind::Builtin(BuiltinFn::IsBlank),
        "ISLITERAL" => TokenKind::Builtin(BuiltinFn::IsLiteral),
        "ISNUMERIC" => TokenKind::Builtin(BuiltinFn::IsNumeric),
        "REGEX" => TokenKind::Builtin(BuiltinFn::Regex),
        "COUNT" => TokenKind::Aggregate(AggregateFn::Count),
        "SUM" => TokenKind::Aggregate(AggregateFn::Sum),
        "MIN" => TokenKind::Aggregate(AggregateFn::Min),
        "MAX" => TokenKind::Aggregate(AggregateFn::Max),
        "AVG" => TokenKind::Aggregate(AggregateFn::Avg),
        "SAMPLE" => TokenKind::Aggregate(AggregateFn::Sample),
        "GROUP_CONCAT" => TokenKind::Aggregate(AggregateFn::GroupConcat),
        _ => return None,
    };
    Some(kind)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Iri(v) => write!(f, "<{v}>"),
            TokenKind::PrefixedName { prefix, local } => write!(f, "{prefix}:{local}"),
            TokenKind::Var(v) => write!(f, "?{v}"),
            TokenKind::String(v) => write!(f, "\"{v}\""),
            TokenKind::LangTag(t) => write!(f, "@{t}"),
            TokenKind::Integer(v) => write!(f, "{v}"),
            TokenKind::Decimal(v) | TokenKind::Double(v) => write!(f, "{v}"),
            TokenKind::BlankNodeLabel(l) => write!(f, "_:{l}"),
            TokenKind::Anon => write!(f, "[]"),
            TokenKind::KwSelect => write!(f, "SELECT"),
            TokenKind::KwConstruct => write!(f, "CONSTRUCT"),
            TokenKind::KwDescribe => write!(f, "DESCRIBE"),
            TokenKind::KwAsk => write!(f, "ASK"),
            TokenKind::KwWhere => write!(f, "WHERE"),
            TokenKind::KwPrefix => write!(f, "PREFIX"),
            TokenKind::KwBase => write!(f, "BASE"),
            TokenKind::KwDistinct => write!(f, "DISTINCT"),
            TokenKind::KwReduced => write!(f, "REDUCED"),
            TokenKind::KwOptional => write!(f, "OPTIONAL"),
            TokenKind::KwUnion => write!(f, "UNION"),
            TokenKind::KwMinus => write!(f, "MINUS"),
            TokenKind::KwGraph => write!(f, "GRAPH"),
            TokenKind::KwFilter => write!(f, "FILTER"),
            TokenKind::KwBind => write!(f, "BIND"),
            TokenKind::KwValues => write!(f, "VALUES"),
            TokenKind::KwAs => write!(f, "AS"),
            TokenKind::KwFrom => write!(f, "FROM"),
            TokenKind::KwNamed => write!(f, "NAMED"),
            TokenKind::KwGroup => write!(f, "GROUP"),
            TokenKind::KwOrder => write!(f, "ORDER"),
            TokenKind::KwBy => write!(f, "BY"),
            TokenKind::KwHaving => write!(f, "HAVING"),
            TokenKind::KwLimit => write!(f, "LIMIT"),
            TokenKind::KwOffset => write!(f, "OFFSET"),
            TokenKind::KwAsc => write!(f, "ASC"),
            TokenKind::KwDesc => write!(f, "DESC"),
            TokenKind::KwIn => write!(f, "IN"),
            TokenKind::KwNot => write!(f, "NOT"),
            TokenKind::KwExists => write!(f, "EXISTS"),
            TokenKind::KwSeparator => write!(f, "SEPARATOR"),
            TokenKind::KwTrue => write!(f, "true"),
            TokenKind::KwFalse => write!(f, "false"),
            TokenKind::KwA => write!(f, "a"),
            TokenKind::Builtin(b) => write!(f, "{}", b.as_str()),
            TokenKind::Aggregate(a) => write!(f, "{}", a.as_str()),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::DoubleCaret => write!(f, "^^"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Question => write!(f, "?"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Ne => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Le => write!(f, "<="),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Ge => write!(f, ">="),
            TokenKind::AndAnd => write!(f, "&&"),
            TokenKind::OrOr => write!(f, "||"),
            TokenKind::Eof => write!(f, "<eof>"),
            TokenKind::Error(msg) => write!(f, "<error: {msg}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        assert_eq!(keyword_from_str("select"), Some(TokenKind::KwSelect));
        assert_eq!(keyword_from_str("Select"), Some(TokenKind::KwSelect));
        assert_eq!(keyword_from_str("OPTIONAL"), Some(TokenKind::KwOptional));
        assert_eq!(keyword_from_str("nothing"), None);
    }

    #[test]
    fn rdf_type_shorthand_is_lowercase_only() {
        assert_eq!(keyword_from_str("a"), Some(TokenKind::KwA));
        assert_eq!(keyword_from_str("A"), None);
    }

    #[test]
    fn builtin_and_aggregate_keywords() {
        assert_eq!(
            keyword_from_str("regex"),
            Some(TokenKind::Builtin(BuiltinFn::Regex))
        );
        assert_eq!(
            keyword_from_str("group_concat"),
            Some(TokenKind::Aggregate(AggregateFn::GroupConcat))
        );
    }

    #[test]
    fn display_round_trips_punctuation() {
        assert_eq!(TokenKind::DoubleCaret.to_string(), "^^");
        assert_eq!(TokenKind::Ne.to_string(), "!=");
        assert_eq!(
            TokenKind::PrefixedName {
                prefix: "ex".into(),
                local: "p".into()
            }
            .to_string(),
            "ex:p"
        );
    }
}
