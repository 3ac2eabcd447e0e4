use crate::error::{CliError, CliResult};
use std::io::{self, IsTerminal, Read};
use std::path::Path;

/// Where the template text comes from.
pub enum TemplateSource {
    /// From a file on disk.
    File(String),
    /// Inline query text on the command line.
    Inline(String),
    /// From stdin (piped).
    Stdin,
}

/// Resolve the template source from the positional argument.
///
/// An argument naming an existing file is a template file; anything else
/// is inline query text. With no argument, piped stdin is the template.
pub fn resolve_template(arg: Option<&str>) -> CliResult<TemplateSource> {
    if let Some(arg) = arg {
        if Path::new(arg).is_file() {
            return Ok(TemplateSource::File(arg.to_string()));
        }
        return Ok(TemplateSource::Inline(arg.to_string()));
    }
    if !io::stdin().is_terminal() {
        return Ok(TemplateSource::Stdin);
    }
    Err(CliError::Usage(format!(
        "no query provided\n  {} pass a template file or inline query, pipe one via stdin, or use shortcut flags like -S/-P/-O",
        colored::Colorize::bold(colored::Colorize::cyan("help:"))
    )))
}

/// Read the template text from the resolved source.
pub fn read_template(source: &TemplateSource) -> CliResult<String> {
    match source {
        TemplateSource::File(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::Input(format!("failed to read {path}: {e}"))),
        TemplateSource::Inline(text) => Ok(text.clone()),
        TemplateSource::Stdin => read_stdin(),
    }
}

/// Raw input for the `{{input}}` placeholder: piped stdin, when the
/// template itself did not come from stdin.
pub fn read_raw_input(source: &TemplateSource) -> CliResult<Option<String>> {
    if matches!(source, TemplateSource::Stdin) || io::stdin().is_terminal() {
        return Ok(None);
    }
    read_stdin().map(|text| if text.is_empty() { None } else { Some(text) })
}

fn read_stdin() -> CliResult<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
