//! Parameter bindings and `{{name}}` placeholder substitution.

use std::collections::HashMap;

use tracing::debug;

use crate::error::TemplateError;
use crate::metadata::TemplateMetadata;

/// The reserved placeholder fed from raw input rather than a binding.
pub const INPUT_PARAM: &str = "input";

/// Values supplied for a template's parameters, either by name or by
/// position.
#[derive(Debug, Clone, Default)]
pub struct ParameterBindings {
    named: HashMap<String, String>,
    positional: Vec<String>,
}

impl ParameterBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_named(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.named.insert(name.into(), value.into());
    }

    pub fn push_positional(&mut self, value: impl Into<String>) {
        self.positional.push(value.into());
    }

    pub fn named(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// Classify raw command-line arguments into bindings.
    ///
    /// `name=value` is a named binding when the part before the first `=`
    /// is a non-empty token without whitespace; anything else is
    /// positional. Positional values must all come before the first named
    /// one.
    pub fn from_args<I, S>(args: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bindings = Self::new();
        let mut seen_named = false;
        for arg in args {
            let arg = arg.as_ref();
            match split_named(arg) {
                Some((name, value)) => {
                    seen_named = true;
                    bindings.bind_named(name, value);
                }
                None => {
                    if seen_named {
                        return Err(TemplateError::PositionalAfterNamed {
                            value: arg.to_string(),
                        });
                    }
                    bindings.push_positional(arg);
                }
            }
        }
        Ok(bindings)
    }
}

fn split_named(arg: &str) -> Option<(&str, &str)> {
    let (name, value) = arg.split_once('=')?;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, value))
}

/// Replace every `{{name}}` placeholder in `body`.
///
/// Declared parameters resolve named binding first, then the next unused
/// positional value, then the declared default. `{{input}}` is reserved
/// for the raw input text and never consumes a positional value.
/// Undeclared placeholders may still be satisfied by a named binding.
/// Any placeholder left without a value fails the whole substitution.
pub fn substitute(
    body: &str,
    metadata: &TemplateMetadata,
    bindings: &ParameterBindings,
    input: Option<&str>,
) -> Result<String, TemplateError> {
    // Assign declared parameters up front so positional order follows the
    // declaration order, not placeholder order in the body.
    let mut values: HashMap<&str, String> = HashMap::new();
    let mut next_positional = 0;
    for decl in &metadata.params {
        let value = if let Some(v) = bindings.named(&decl.name) {
            v.to_string()
        } else if let Some(v) = bindings.positional.get(next_positional) {
            next_positional += 1;
            v.clone()
        } else if let Some(v) = &decl.default {
            v.clone()
        } else {
            return Err(TemplateError::MissingParameter {
                name: decl.name.clone(),
            });
        };
        values.insert(decl.name.as_str(), value);
    }

    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(open) = rest.find("{{") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            break;
        };
        let name = &after[..close];
        if !is_placeholder_name(name) {
            // not a placeholder; keep the braces and move past them
            out.push_str(&rest[..open + 2]);
            rest = after;
            continue;
        }
        out.push_str(&rest[..open]);
        if name == INPUT_PARAM {
            let value = input.ok_or_else(|| TemplateError::MissingParameter {
                name: INPUT_PARAM.to_string(),
            })?;
            out.push_str(value);
        } else if let Some(value) = values.get(name) {
            out.push_str(value);
        } else if let Some(value) = bindings.named(name) {
            out.push_str(value);
        } else {
            return Err(TemplateError::MissingParameter {
                name: name.to_string(),
            });
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);

    debug!(
        declared = metadata.params.len(),
        positional_used = next_positional,
        "substituted template parameters"
    );
    Ok(out)
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::extract;

    fn meta(header: &str) -> TemplateMetadata {
        extract(header).0
    }

    #[test]
    fn named_binding_wins_over_default() {
        let metadata = meta("# param: name=Alice\n");
        let bindings = ParameterBindings::from_args(["name=Bob"]).unwrap();
        let out = substitute("SELECT {{name}}", &metadata, &bindings, None).unwrap();
        assert_eq!(out, "SELECT Bob");
    }

    #[test]
    fn positional_values_fill_declaration_order() {
        let metadata = meta("# param: first\n# param: second\n");
        let bindings = ParameterBindings::from_args(["a", "b"]).unwrap();
        let out = substitute("{{second}} {{first}}", &metadata, &bindings, None).unwrap();
        assert_eq!(out, "b a");
    }

    #[test]
    fn default_fills_the_gap() {
        let metadata = meta("# param: lang=en\n");
        let bindings = ParameterBindings::new();
        let out = substitute("FILTER (LANG(?l) = \"{{lang}}\")", &metadata, &bindings, None)
            .unwrap();
        assert_eq!(out, "FILTER (LANG(?l) = \"en\")");
    }

    #[test]
    fn missing_parameter_fails_whole_substitution() {
        let metadata = meta("# param: a\n# param: b\n");
        let bindings = ParameterBindings::from_args(["x"]).unwrap();
        let err = substitute("{{a}} {{b}}", &metadata, &bindings, None).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingParameter {
                name: "b".to_string()
            }
        );
    }

    #[test]
    fn undeclared_placeholder_uses_named_binding() {
        let metadata = TemplateMetadata::default();
        let bindings = ParameterBindings::from_args(["extra=42"]).unwrap();
        let out = substitute("LIMIT {{extra}}", &metadata, &bindings, None).unwrap();
        assert_eq!(out, "LIMIT 42");
    }

    #[test]
    fn input_is_reserved_and_skips_positional() {
        let metadata = meta("# param: name\n");
        let bindings = ParameterBindings::from_args(["Alice"]).unwrap();
        let out = substitute(
            "{{input}} {{name}}",
            &metadata,
            &bindings,
            Some("piped text"),
        )
        .unwrap();
        assert_eq!(out, "piped text Alice");
    }

    #[test]
    fn input_without_a_source_is_missing() {
        let err = substitute(
            "{{input}}",
            &TemplateMetadata::default(),
            &ParameterBindings::new(),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingParameter {
                name: "input".to_string()
            }
        );
    }

    #[test]
    fn malformed_placeholders_pass_through() {
        let metadata = TemplateMetadata::default();
        let bindings = ParameterBindings::new();
        let out = substitute("{{not a name}} {{}} {{9lives}}", &metadata, &bindings, None)
            .unwrap();
        assert_eq!(out, "{{not a name}} {{}} {{9lives}}");
    }

    #[test]
    fn positional_after_named_is_rejected() {
        let err = ParameterBindings::from_args(["name=x", "stray"]).unwrap_err();
        assert_eq!(
            err,
            TemplateError::PositionalAfterNamed {
                value: "stray".to_string()
            }
        );
    }

    #[test]
    fn equals_in_value_belongs_to_the_value() {
        let bindings = ParameterBindings::from_args(["expr=a=b"]).unwrap();
        assert_eq!(bindings.named("expr"), Some("a=b"));
    }
}
