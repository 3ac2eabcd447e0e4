//! Character classes from the SPARQL 1.1 grammar.
//!
//! Covers the productions the lexer needs: PN_CHARS_BASE and friends for
//! prefixed names, VARNAME for variables, and the IRIREF character set.

/// PN_CHARS_BASE
///
/// ```text
/// PN_CHARS_BASE ::= [A-Z] | [a-z] | [#x00C0-#x00D6] | [#x00D8-#x00F6]
///                 | [#x00F8-#x02FF] | [#x0370-#x037D] | [#x037F-#x1FFF]
///                 | [#x200C-#x200D] | [#x2070-#x218F] | [#x2C00-#x2FEF]
///                 | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD]
///                 | [#x10000-#xEFFFF]
/// ```
pub fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
        'A'..='Z' |
        'a'..='z' |
        '\u{00C0}'..='\u{00D6}' |
        '\u{00D8}'..='\u{00F6}' |
        '\u{00F8}'..='\u{02FF}' |
        '\u{0370}'..='\u{037D}' |
        '\u{037F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' |
        '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' |
        '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' |
        '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// PN_CHARS_U ::= PN_CHARS_BASE | '_'
pub fn is_pn_chars_u(c: char) -> bool {
    is_pn_chars_base(c) || c == '_'
}

/// PN_CHARS ::= PN_CHARS_U | '-' | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]
pub fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c)
        || c == '-'
        || c.is_ascii_digit()
        || c == '\u{00B7}'
        || matches!(c, '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// First character of PN_LOCAL (percent escapes handled by the lexer).
pub fn is_pn_local_start(c: char) -> bool {
    is_pn_chars_u(c) || c == ':' || c.is_ascii_digit()
}

/// WS ::= #x20 | #x9 | #xD | #xA
pub fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters permitted inside an IRIREF without escaping.
pub fn is_iri_char(c: char) -> bool {
    !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\x00'..='\x20')
}

/// First character of a VARNAME.
pub fn is_varname_start(c: char) -> bool {
    is_pn_chars_u(c) || c.is_ascii_digit()
}

/// Continuation character of a VARNAME.
pub fn is_varname_char(c: char) -> bool {
    is_pn_chars_u(c)
        || c.is_ascii_digit()
        || c == '\u{00B7}'
        || matches!(c, '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pn_classes() {
        assert!(is_pn_chars_base('q'));
        assert!(is_pn_chars_base('É'));
        assert!(!is_pn_chars_base('_'));
        assert!(is_pn_chars_u('_'));
        assert!(is_pn_chars('-'));
        assert!(is_pn_chars('7'));
        assert!(!is_pn_chars('.'));
        assert!(!is_pn_chars(':'));
    }

    #[test]
    fn varname_allows_leading_digit() {
        assert!(is_varname_start('0'));
        assert!(is_varname_start('_'));
        assert!(!is_varname_start('-'));
        assert!(is_varname_char('x'));
        assert!(!is_varname_char('-'));
    }

    #[test]
    fn iri_chars() {
        assert!(is_iri_char('/'));
        assert!(is_iri_char('#'));
        assert!(!is_iri_char(' '));
        assert!(!is_iri_char('>'));
    }
}
