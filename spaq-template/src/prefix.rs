//! The prefix registry: namespace declarations merged from layered sources.

use std::collections::HashMap;
use tracing::debug;

/// An owned, explicitly threaded registry of prefix declarations.
///
/// Sources are loaded in order and merged label-by-label, the most recent
/// declaration winning. `abbreviate` prefers the longest matching
/// namespace; equal lengths resolve to the most recently loaded entry.
#[derive(Debug, Clone, Default)]
pub struct PrefixRegistry {
    entries: HashMap<String, Entry>,
    next_order: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    namespace: String,
    order: usize,
}

impl PrefixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register one declaration; replaces any earlier one for `label`.
    pub fn insert(&mut self, label: impl Into<String>, namespace: impl Into<String>) {
        let order = self.next_order;
        self.next_order += 1;
        self.entries.insert(
            label.into(),
            Entry {
                namespace: namespace.into(),
                order,
            },
        );
    }

    /// Load declarations from one source text, line by line.
    ///
    /// Accepted line shapes (comments and blanks skipped):
    ///
    /// ```text
    /// PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
    /// @prefix foaf: <http://xmlns.com/foaf/0.1/> .
    /// ex: <http://example.org/>
    /// ex http://example.org/
    /// ```
    ///
    /// Returns how many declarations the source contributed.
    pub fn load_source(&mut self, source: &str) -> usize {
        let mut loaded = 0;
        for line in source.lines() {
            if let Some((label, namespace)) = parse_prefix_line(line) {
                self.insert(label, namespace);
                loaded += 1;
            }
        }
        debug!(loaded, "merged prefix source");
        loaded
    }

    /// The namespace registered for `label`, if any.
    pub fn namespace(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(|e| e.namespace.as_str())
    }

    /// Expand `label:local` to a full IRI.
    ///
    /// Returns `None` for unknown labels, for tokens without a colon, and
    /// for tokens that are already absolute IRIs (`scheme://...`).
    pub fn expand(&self, qname: &str) -> Option<String> {
        let (label, local) = qname.split_once(':')?;
        if local.starts_with("//") {
            return None;
        }
        let namespace = self.namespace(label)?;
        Some(format!("{namespace}{local}"))
    }

    /// Abbreviate a full IRI to `label:local` when a registered namespace
    /// prefixes it and the remainder is a clean local name.
    ///
    /// Returns `None` when no namespace matches; callers emitting SPARQL
    /// text must wrap such IRIs in angle brackets themselves, as
    /// `shortcut::normalize_term` does. Unmatched IRIs are never valid
    /// bare.
    pub fn abbreviate(&self, iri: &str) -> Option<String> {
        let mut best: Option<(&str, &Entry)> = None;
        for (label, entry) in &self.entries {
            if !iri.starts_with(&entry.namespace) {
                continue;
            }
            if !is_clean_local(&iri[entry.namespace.len()..]) {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, b)) => {
                    entry.namespace.len() > b.namespace.len()
                        || (entry.namespace.len() == b.namespace.len() && entry.order > b.order)
                }
            };
            if better {
                best = Some((label, entry));
            }
        }
        best.map(|(label, entry)| format!("{label}:{}", &iri[entry.namespace.len()..]))
    }
}

/// Whether a namespace remainder can stand as the local part of a
/// prefixed name.
fn is_clean_local(local: &str) -> bool {
    !local.contains(['/', '#', '<', '>', '"', ' '])
}

/// Parse one prefix-file line into `(label, namespace)`.
fn parse_prefix_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    if let Some(first) = tokens.first() {
        if first.eq_ignore_ascii_case("prefix") || first.eq_ignore_ascii_case("@prefix") {
            tokens.remove(0);
        }
    }
    // a trailing Turtle dot may be its own token
    if tokens.last() == Some(&".") {
        tokens.pop();
    }
    if tokens.len() != 2 {
        return None;
    }
    let label = tokens[0].strip_suffix(':').unwrap_or(tokens[0]);
    if label.contains(':') {
        return None;
    }
    let mut namespace = tokens[1];
    namespace = namespace.strip_suffix('.').unwrap_or(namespace);
    namespace = namespace
        .strip_prefix('<')
        .and_then(|n| n.strip_suffix('>'))
        .unwrap_or(namespace);
    if namespace.is_empty() {
        return None;
    }
    Some((label.to_string(), namespace.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(sources: &[&str]) -> PrefixRegistry {
        let mut reg = PrefixRegistry::new();
        for source in sources {
            reg.load_source(source);
        }
        reg
    }

    #[test]
    fn accepts_mixed_line_shapes() {
        let reg = registry(&[
            "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>\n\
             @prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\
             ex: <http://example.org/>\n\
             plain http://plain.org/\n\
             # a comment\n\
             \n\
             not a prefix line at all",
        ]);
        assert_eq!(reg.len(), 4);
        assert_eq!(
            reg.namespace("rdfs"),
            Some("http://www.w3.org/2000/01/rdf-schema#")
        );
        assert_eq!(reg.namespace("plain"), Some("http://plain.org/"));
    }

    #[test]
    fn later_sources_win() {
        let reg = registry(&[
            "ex: <http://one.example/>",
            "ex: <http://two.example/>",
        ]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.namespace("ex"), Some("http://two.example/"));
    }

    #[test]
    fn expand_joins_namespace_and_local() {
        let reg = registry(&["foaf: <http://xmlns.com/foaf/0.1/>"]);
        assert_eq!(
            reg.expand("foaf:name").as_deref(),
            Some("http://xmlns.com/foaf/0.1/name")
        );
        assert_eq!(reg.expand("unknown:name"), None);
        assert_eq!(reg.expand("nocolon"), None);
        // absolute IRIs are never qnames
        assert_eq!(reg.expand("http://already.absolute/x"), None);
    }

    #[test]
    fn abbreviate_prefers_longest_namespace() {
        let reg = registry(&[
            "base: <http://example.org/>",
            "deep: <http://example.org/vocab/>",
        ]);
        assert_eq!(
            reg.abbreviate("http://example.org/vocab/Thing").as_deref(),
            Some("deep:Thing")
        );
        assert_eq!(
            reg.abbreviate("http://example.org/other").as_deref(),
            Some("base:other")
        );
    }

    #[test]
    fn abbreviate_tie_goes_to_most_recent() {
        let reg = registry(&[
            "first: <http://example.org/>",
            "second: <http://example.org/>",
        ]);
        assert_eq!(
            reg.abbreviate("http://example.org/x").as_deref(),
            Some("second:x")
        );
    }

    #[test]
    fn abbreviate_rejects_messy_remainders() {
        let reg = registry(&["ex: <http://example.org/>"]);
        assert_eq!(reg.abbreviate("http://example.org/a/b"), None);
        assert_eq!(reg.abbreviate("http://elsewhere.org/x"), None);
    }

    #[test]
    fn empty_label_is_allowed() {
        let reg = registry(&[": <http://default.example/>"]);
        assert_eq!(reg.namespace(""), Some("http://default.example/"));
        assert_eq!(
            reg.expand(":thing").as_deref(),
            Some("http://default.example/thing")
        );
    }
}
