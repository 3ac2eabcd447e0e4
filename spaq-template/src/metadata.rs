//! The template metadata header: `# key: value` comment lines at the top
//! of a query file.

use serde::Serialize;

/// Metadata collected from a template's leading comment lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDecl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// One `# param: name=default` declaration. A bare `# param: name` has no
/// default; `name=` declares an empty-string default as absent too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl TemplateMetadata {
    pub fn param(&self, name: &str) -> Option<&ParamDecl> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Split a template into its metadata header and query body.
///
/// The header is the maximal run of leading lines of the form
/// `# key: value` where `key` is a single word. Recognized keys are
/// `title`, `param`, `endpoint`, `input` and `option`; lines with other
/// keys still belong to the header but contribute nothing. The first
/// line that does not fit the shape ends the header, and the returned
/// body is the remainder of `text`, byte for byte.
pub fn extract(text: &str) -> (TemplateMetadata, &str) {
    let mut metadata = TemplateMetadata::default();
    let mut consumed = 0;

    for line in text.split_inclusive('\n') {
        let Some((key, value)) = parse_header_line(line) else {
            break;
        };
        consumed += line.len();
        match key {
            "title" => metadata.title = Some(value.to_string()),
            "param" => metadata.params.push(parse_param(value)),
            "endpoint" => metadata.endpoint = Some(value.to_string()),
            "input" => metadata.input = Some(value.to_string()),
            "option" => metadata
                .options
                .extend(value.split_whitespace().map(str::to_string)),
            _ => {}
        }
    }

    (metadata, &text[consumed..])
}

/// `# key: value` with a single-word key, or `None` if the line does not
/// belong to the header.
fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_end_matches(['\n', '\r']).strip_prefix('#')?;
    let rest = rest.trim_start();
    let (key, value) = rest.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value.trim()))
}

fn parse_param(value: &str) -> ParamDecl {
    match value.split_once('=') {
        Some((name, default)) => ParamDecl {
            name: name.trim().to_string(),
            default: if default.is_empty() {
                None
            } else {
                Some(default.to_string())
            },
        },
        None => ParamDecl {
            name: value.to_string(),
            default: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_recognized_keys() {
        let text = "# title: People by name\n\
                    # param: name=Alice\n\
                    # param: limit\n\
                    # endpoint: https://query.example.org/sparql\n\
                    # option: --fmt --count\n\
                    SELECT * WHERE { ?s ?p ?o }\n";
        let (meta, body) = extract(text);
        assert_eq!(meta.title.as_deref(), Some("People by name"));
        assert_eq!(meta.params.len(), 2);
        assert_eq!(meta.params[0].name, "name");
        assert_eq!(meta.params[0].default.as_deref(), Some("Alice"));
        assert_eq!(meta.params[1].name, "limit");
        assert_eq!(meta.params[1].default, None);
        assert_eq!(
            meta.endpoint.as_deref(),
            Some("https://query.example.org/sparql")
        );
        assert_eq!(meta.options, vec!["--fmt", "--count"]);
        assert_eq!(body, "SELECT * WHERE { ?s ?p ?o }\n");
    }

    #[test]
    fn header_ends_at_first_non_matching_line() {
        let text = "# title: T\n\
                    # just a comment without a colon\n\
                    # param: after=1\n\
                    SELECT * WHERE { ?s ?p ?o }";
        let (meta, body) = extract(text);
        assert_eq!(meta.title.as_deref(), Some("T"));
        // the param line sits below a plain comment, so it is body text
        assert!(meta.params.is_empty());
        assert!(body.starts_with("# just a comment"));
    }

    #[test]
    fn unrecognized_keys_stay_in_header() {
        let text = "# author: someone\n# title: T\nASK { ?s ?p ?o }";
        let (meta, body) = extract(text);
        assert_eq!(meta.title.as_deref(), Some("T"));
        assert_eq!(body, "ASK { ?s ?p ?o }");
    }

    #[test]
    fn empty_default_means_no_default() {
        let (meta, _) = extract("# param: name=\nSELECT * WHERE { ?s ?p ?o }");
        assert_eq!(meta.params[0].default, None);
    }

    #[test]
    fn body_is_byte_identical() {
        let text = "# title: T\n\nSELECT ?s # trailing: colon\nWHERE { ?s ?p ?o }";
        let (_, body) = extract(text);
        assert_eq!(body, &text["# title: T\n".len()..]);
    }

    #[test]
    fn no_header_returns_whole_text() {
        let text = "SELECT * WHERE { ?s ?p ?o }";
        let (meta, body) = extract(text);
        assert_eq!(meta, TemplateMetadata::default());
        assert_eq!(body, text);
    }

    #[test]
    fn metadata_serializes_without_empty_fields() {
        let (meta, _) = extract("# title: T\nASK { ?s ?p ?o }");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "T" }));
    }
}
