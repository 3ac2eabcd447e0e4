//! SPARQL query templates: metadata headers, `{{name}}` parameter
//! substitution, prefix registries and shortcut query building.
//!
//! ```
//! use spaq_template::{extract, substitute, ParameterBindings};
//!
//! let text = "# param: name=Alice\nSELECT ?s WHERE { ?s foaf:name \"{{name}}\" }";
//! let (metadata, body) = extract(text);
//! let bindings = ParameterBindings::from_args(["name=Bob"]).unwrap();
//! let query = substitute(body, &metadata, &bindings, None).unwrap();
//! assert_eq!(query, "SELECT ?s WHERE { ?s foaf:name \"Bob\" }");
//! ```

pub mod error;
pub mod metadata;
pub mod params;
pub mod prefix;
pub mod shortcut;

pub use error::{TemplateError, Warning};
pub use metadata::{extract, ParamDecl, TemplateMetadata};
pub use params::{substitute, ParameterBindings, INPUT_PARAM};
pub use prefix::PrefixRegistry;
pub use shortcut::{build_query, validate_limit, BuiltQuery, ShortcutSpec};
