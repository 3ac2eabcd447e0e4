//! Shortcut queries: a SELECT built from subject/predicate/object flags
//! without a template file.

use tracing::warn;

use crate::error::{TemplateError, Warning};
use crate::prefix::PrefixRegistry;

/// What the caller asked for on the command line.
#[derive(Debug, Clone, Default)]
pub struct ShortcutSpec {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
    pub graph: Option<String>,
    pub limit: Option<String>,
    pub count: bool,
    pub list_graphs: bool,
}

impl ShortcutSpec {
    /// Whether any shortcut flag was given at all.
    pub fn is_requested(&self) -> bool {
        self.subject.is_some()
            || self.predicate.is_some()
            || self.object.is_some()
            || self.graph.is_some()
            || self.count
            || self.list_graphs
    }
}

/// A generated query plus anything worth telling the user about it.
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub query: String,
    pub warnings: Vec<Warning>,
}

/// Build a SELECT from the shortcut flags.
///
/// Terms that already look like SPARQL (`?var`, `<iri>`, a quoted
/// literal, `_:b`, the keyword `a`) pass through untouched. A
/// `prefix:local` term is expanded through the registry; when the label
/// is unknown the token is wrapped as `<token>` and a warning is
/// recorded. A limit that is not a non-negative integer fails with
/// `TemplateError::InvalidLimit` before any text is produced.
pub fn build_query(
    spec: &ShortcutSpec,
    prefixes: &PrefixRegistry,
) -> Result<BuiltQuery, TemplateError> {
    let limit = match &spec.limit {
        Some(value) => Some(validate_limit(value)?),
        None => None,
    };

    let mut warnings = Vec::new();

    let subject = term_or(&spec.subject, "?s", prefixes, &mut warnings);
    let predicate = term_or(&spec.predicate, "?p", prefixes, &mut warnings);
    let object = term_or(&spec.object, "?o", prefixes, &mut warnings);

    let triple = format!("{subject} {predicate} {object} .");

    let mut query = String::new();
    if spec.list_graphs {
        query.push_str("SELECT DISTINCT ?g\nWHERE {\n  GRAPH ?g {\n    ");
        query.push_str(&triple);
        query.push_str("\n  }\n}\n");
    } else {
        if spec.count {
            query.push_str("SELECT (COUNT(*) AS ?count)\n");
        } else {
            query.push_str("SELECT *\n");
        }
        query.push_str("WHERE {\n");
        match &spec.graph {
            Some(graph) => {
                let graph = normalize_term(graph, prefixes, &mut warnings);
                query.push_str("  GRAPH ");
                query.push_str(&graph);
                query.push_str(" {\n    ");
                query.push_str(&triple);
                query.push_str("\n  }\n");
            }
            None => {
                query.push_str("  ");
                query.push_str(&triple);
                query.push('\n');
            }
        }
        query.push_str("}\n");
    }

    if let Some(n) = limit {
        query.push_str(&format!("LIMIT {n}\n"));
    }

    for warning in &warnings {
        warn!("{warning}");
    }
    Ok(BuiltQuery { query, warnings })
}

/// Check a `--limit` value before splicing it into a query.
pub fn validate_limit(value: &str) -> Result<u64, TemplateError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| TemplateError::InvalidLimit {
            value: value.to_string(),
        })
}

fn term_or(
    term: &Option<String>,
    fallback: &str,
    prefixes: &PrefixRegistry,
    warnings: &mut Vec<Warning>,
) -> String {
    match term {
        Some(t) => normalize_term(t, prefixes, warnings),
        None => fallback.to_string(),
    }
}

/// Turn one command-line term into valid SPARQL.
fn normalize_term(term: &str, prefixes: &PrefixRegistry, warnings: &mut Vec<Warning>) -> String {
    if term.starts_with('?')
        || term.starts_with('$')
        || term.starts_with('<')
        || term.starts_with('"')
        || term.starts_with("_:")
        || term == "a"
    {
        return term.to_string();
    }
    match term.split_once(':') {
        Some((_, local)) if local.starts_with("//") => format!("<{term}>"),
        Some(_) => match prefixes.expand(term) {
            Some(iri) => format!("<{iri}>"),
            None => {
                warnings.push(Warning::UnresolvedPrefix {
                    token: term.to_string(),
                });
                format!("<{term}>")
            }
        },
        None => format!("<{term}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> PrefixRegistry {
        let mut reg = PrefixRegistry::new();
        reg.insert("foaf", "http://xmlns.com/foaf/0.1/");
        reg
    }

    #[test]
    fn default_shortcut_selects_everything() {
        let built = build_query(&ShortcutSpec::default(), &PrefixRegistry::new()).unwrap();
        assert_eq!(built.query, "SELECT *\nWHERE {\n  ?s ?p ?o .\n}\n");
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn prefixed_terms_expand() {
        let spec = ShortcutSpec {
            predicate: Some("foaf:name".to_string()),
            ..Default::default()
        };
        let built = build_query(&spec, &prefixes()).unwrap();
        assert!(built
            .query
            .contains("?s <http://xmlns.com/foaf/0.1/name> ?o ."));
    }

    #[test]
    fn unresolved_prefix_warns_and_wraps() {
        let spec = ShortcutSpec {
            predicate: Some("mystery:thing".to_string()),
            ..Default::default()
        };
        let built = build_query(&spec, &prefixes()).unwrap();
        assert!(built.query.contains("<mystery:thing>"));
        assert_eq!(
            built.warnings,
            vec![Warning::UnresolvedPrefix {
                token: "mystery:thing".to_string()
            }]
        );
    }

    #[test]
    fn absolute_iris_wrap_without_warning() {
        let spec = ShortcutSpec {
            object: Some("http://example.org/x".to_string()),
            ..Default::default()
        };
        let built = build_query(&spec, &prefixes()).unwrap();
        assert!(built.query.contains("<http://example.org/x>"));
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn sparql_shaped_terms_pass_through() {
        let spec = ShortcutSpec {
            subject: Some("?who".to_string()),
            predicate: Some("a".to_string()),
            object: Some("\"Alice\"".to_string()),
            ..Default::default()
        };
        let built = build_query(&spec, &prefixes()).unwrap();
        assert!(built.query.contains("?who a \"Alice\" ."));
    }

    #[test]
    fn count_replaces_projection() {
        let spec = ShortcutSpec {
            count: true,
            ..Default::default()
        };
        let built = build_query(&spec, &PrefixRegistry::new()).unwrap();
        assert!(built.query.starts_with("SELECT (COUNT(*) AS ?count)\n"));
    }

    #[test]
    fn graph_wraps_the_triple() {
        let spec = ShortcutSpec {
            graph: Some("?g".to_string()),
            ..Default::default()
        };
        let built = build_query(&spec, &PrefixRegistry::new()).unwrap();
        assert_eq!(
            built.query,
            "SELECT *\nWHERE {\n  GRAPH ?g {\n    ?s ?p ?o .\n  }\n}\n"
        );
    }

    #[test]
    fn list_graphs_selects_distinct_g() {
        let spec = ShortcutSpec {
            list_graphs: true,
            ..Default::default()
        };
        let built = build_query(&spec, &PrefixRegistry::new()).unwrap();
        assert_eq!(
            built.query,
            "SELECT DISTINCT ?g\nWHERE {\n  GRAPH ?g {\n    ?s ?p ?o .\n  }\n}\n"
        );
    }

    #[test]
    fn limit_appends_after_the_pattern() {
        let spec = ShortcutSpec {
            limit: Some("10".to_string()),
            ..Default::default()
        };
        let built = build_query(&spec, &PrefixRegistry::new()).unwrap();
        assert!(built.query.ends_with("}\nLIMIT 10\n"));
    }

    #[test]
    fn invalid_limit_fails_the_build() {
        let spec = ShortcutSpec {
            limit: Some("ten".to_string()),
            ..Default::default()
        };
        let err = build_query(&spec, &PrefixRegistry::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::InvalidLimit {
                value: "ten".to_string()
            }
        );
    }

    #[test]
    fn limit_validation() {
        assert_eq!(validate_limit("42"), Ok(42));
        assert_eq!(validate_limit(" 7 "), Ok(7));
        assert_eq!(
            validate_limit("-1"),
            Err(TemplateError::InvalidLimit {
                value: "-1".to_string()
            })
        );
        assert!(validate_limit("ten").is_err());
    }
}
