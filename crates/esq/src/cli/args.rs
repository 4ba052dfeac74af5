//! Clap argument definitions for the `esq` CLI.

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "esq")]
#[command(about = "Translate search queries into bool/terms query documents")]
pub struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by commands that translate a query.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Query text, joined with spaces; read from stdin when omitted
    pub query: Vec<String>,

    /// Field searched by groups without a `field:` prefix (can be specified multiple times)
    /// [default: title, body]
    #[arg(short = 'f', long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Offset of the first hit [default: 0]
    #[arg(long)]
    pub from: Option<usize>,

    /// Maximum number of hits [default: 50]
    #[arg(long)]
    pub size: Option<usize>,
}

/// Arguments for `esq translate`.
#[derive(Args, Debug, Clone)]
pub struct TranslateCommand {
    #[command(flatten)]
    /// Query text and translation settings.
    pub query: QueryArgs,

    /// Additional query that must also match (can be specified multiple times)
    #[arg(long, value_name = "QUERY")]
    pub must: Vec<String>,

    /// Additional query that may match instead (can be specified multiple times)
    #[arg(long, value_name = "QUERY")]
    pub should: Vec<String>,

    /// Print the document as single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for `esq inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectCommand {
    #[command(flatten)]
    /// Query text and translation settings.
    pub query: QueryArgs,
}

/// Arguments for `esq init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.esq.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `esq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Translate a query into a JSON query document
    #[command(after_help = "\
QUERY SYNTAX:
  term              Search the default fields
  field: term       Search one field
  f1,f2: term       Search either field
  a b / a or b      Any of the terms
  a and b           All of the terms; binds looser than or
  \"and\" 'it\\'s'     Quoted terms; backslash escapes the next character
  f1: a f2: b       Groups are always combined with AND

EXAMPLES:
  esq translate 'title: rust async'
  esq translate -f name -f summary 'rust and tokio'
  esq translate 'title,body: \"and\" or both'
  esq translate --must 'tenant: acme' 'title: rust'
  echo 'title: rust' | esq translate --compact")]
    Translate(TranslateCommand),

    /// Show the syntax tree, query tree and document for a query
    Inspect(InspectCommand),

    /// Initialize esq configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}
