mod cli;
mod config;
mod error;
mod input;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::{exit_with_error, CliError, CliResult};
use input::TemplateSource;
use spaq_sparql::{format_query, parse_query, render_diagnostics, FormatOptions};
use spaq_template::{
    build_query, extract, substitute, validate_limit, ParameterBindings, PrefixRegistry,
    ShortcutSpec, Warning,
};

fn init_tracing(cli: &Cli) {
    // CLI tracing policy:
    //   --quiet  → always "off" (no logs, no matter what)
    //   --verbose → "info" level (useful diagnostics)
    //   default  → "off" (clean output for piping into other tools)
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        // --verbose: honour RUST_LOG if set, otherwise show info.
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into())
    } else {
        // Default: suppress all logs. RUST_LOG is intentionally ignored so
        // developer env vars don't leak log lines into stdout consumers.
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    // Disable color when --no-color flag or NO_COLOR env var is set.
    // Errors go to stderr, so piping stdout should not strip color there.
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = run(cli) {
        exit_with_error(e);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if let Some(endpoint) = &cli.endpoint {
        // Recorded for the user's pipeline; spaq itself never sends queries.
        tracing::debug!(%endpoint, "endpoint noted");
    }

    if cli.shortcut_requested() && cli.template.is_none() {
        let prefixes = config::load_prefixes(&cli.prefix);
        return run_shortcut(&cli, &prefixes);
    }
    run_template(cli)
}

/// Build a query straight from the shortcut flags.
fn run_shortcut(cli: &Cli, prefixes: &PrefixRegistry) -> CliResult<()> {
    let spec = ShortcutSpec {
        subject: cli.subject.clone(),
        predicate: cli.predicate.clone(),
        object: cli.object.clone(),
        graph: cli.graph.clone(),
        limit: cli.limit.clone(),
        count: cli.count,
        list_graphs: cli.graphs,
    };
    let built = build_query(&spec, prefixes)?;
    if !cli.quiet {
        print_warnings(&built.warnings);
    }
    emit_query(cli, &built.query, None)
}

/// Expand a template (file, inline text, or stdin) into a query.
fn run_template(cli: Cli) -> CliResult<()> {
    let source = input::resolve_template(cli.template.as_deref())?;
    let text = input::read_template(&source)?;
    let (metadata, body) = extract(&text);

    // A template's `option:` line supplies default flags; re-parse argv
    // with them injected ahead of the user's own flags so explicit flags
    // still win. --reset-option opts out.
    let cli = if !cli.reset_option && !metadata.options.is_empty() {
        let mut argv: Vec<String> = std::env::args().collect();
        let injected = metadata.options.clone();
        argv.splice(1..1, injected);
        Cli::try_parse_from(&argv)
            .map_err(|e| CliError::Usage(format!("bad `option:` metadata line: {e}")))?
    } else {
        cli
    };

    if cli.show_metadata {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    let bindings = ParameterBindings::from_args(&cli.params)?;
    let raw_input = match source {
        TemplateSource::Stdin => None,
        _ => input::read_raw_input(&source)?,
    };
    let mut query = substitute(body, &metadata, &bindings, raw_input.as_deref())?;

    if let Some(value) = &cli.limit {
        let n = validate_limit(value)?;
        if !query.ends_with('\n') {
            query.push('\n');
        }
        query.push_str(&format!("LIMIT {n}\n"));
    }

    let filename = match &source {
        TemplateSource::File(path) => Some(path.as_str()),
        _ => None,
    };
    emit_query(&cli, &query, filename)
}

/// Print the assembled query, reformatting it first when --fmt is set.
fn emit_query(cli: &Cli, query: &str, filename: Option<&str>) -> CliResult<()> {
    if !cli.fmt {
        print!("{query}");
        if !query.ends_with('\n') {
            println!();
        }
        return Ok(());
    }

    let output = parse_query(query);
    if output.has_errors() {
        return Err(CliError::Syntax(render_diagnostics(
            &output.diagnostics,
            query,
            filename,
        )));
    }
    let query = output
        .ast
        .ok_or_else(|| CliError::Input("parser produced no query".to_string()))?;
    print!(
        "{}",
        format_query(&query, &FormatOptions::new(cli.indent))
    );
    Ok(())
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
}
