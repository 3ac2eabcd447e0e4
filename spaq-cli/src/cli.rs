use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "spaq",
    about = "Assemble, parameterize and format SPARQL queries",
    version
)]
pub struct Cli {
    /// Template file, inline query text, or omitted to read stdin
    pub template: Option<String>,

    /// Parameter values: positional values first, then name=value pairs
    pub params: Vec<String>,

    /// Shortcut query: subject term
    #[arg(short = 'S', long)]
    pub subject: Option<String>,

    /// Shortcut query: predicate term
    #[arg(short = 'P', long)]
    pub predicate: Option<String>,

    /// Shortcut query: object term
    #[arg(short = 'O', long)]
    pub object: Option<String>,

    /// Shortcut query: wrap the pattern in GRAPH <g> { }
    #[arg(short = 'F', long = "graph")]
    pub graph: Option<String>,

    /// Append LIMIT n to the query (shortcut or template)
    #[arg(short = 'L', long)]
    pub limit: Option<String>,

    /// Shortcut query: SELECT (COUNT(*) AS ?count) instead of SELECT *
    #[arg(short = 'N', long)]
    pub count: bool,

    /// Shortcut query: list the named graphs instead of solutions
    #[arg(short = 'G', long)]
    pub graphs: bool,

    /// Extra prefix files, merged after ~/.spaq/prefix (later wins)
    #[arg(long = "prefix", value_name = "FILE")]
    pub prefix: Vec<PathBuf>,

    /// Reformat the assembled query instead of printing it verbatim
    #[arg(long)]
    pub fmt: bool,

    /// Indent width for --fmt
    #[arg(short = 'i', long, default_value_t = 2, allow_negative_numbers = true)]
    pub indent: i64,

    /// Print the template's metadata header as JSON and exit
    #[arg(long)]
    pub show_metadata: bool,

    /// Ignore the template's `option:` metadata line
    #[arg(long)]
    pub reset_option: bool,

    /// Endpoint recorded for the query; spaq prints queries, it never sends them
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Enable verbose output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Whether any shortcut-query flag was given.
    pub fn shortcut_requested(&self) -> bool {
        self.subject.is_some()
            || self.predicate.is_some()
            || self.object.is_some()
            || self.graph.is_some()
            || self.count
            || self.graphs
    }
}
