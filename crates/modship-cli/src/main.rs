#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]

mod commands;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use modship_core::{Config, Matcher};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modship")]
#[command(author, version, about = "Resolve, wrap and bundle server-side modules for the browser", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Root directory module ids resolve under (defaults to cwd)
    #[arg(long, global = true, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Refuse to serve paths under this prefix (repeatable)
    #[arg(long, global = true, value_name = "PREFIX")]
    forbid: Vec<String>,

    /// Emit these ids without loader boilerplate (repeatable)
    #[arg(long, global = true, value_name = "ID")]
    nowrap: Vec<String>,

    /// Cache max-age in seconds advertised to the routing layer
    #[arg(long, global = true, default_value_t = 0, value_name = "SECONDS")]
    max_age: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print one module wrapped in loader boilerplate
    Module {
        /// Module id (trailing .js is insignificant)
        id: String,

        /// Write the payload to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Print several modules as one payload with a bootstrap prologue
    Aggregate {
        /// Module ids, in delivery order
        #[arg(required = true)]
        ids: Vec<String>,

        /// Write the payload to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Print the dependency manifest for a seed id
    Deps {
        /// Seed module id
        id: String,
    },

    /// Plan bundles from a declaration file
    Bundles {
        /// Bundle declaration file (JSON, name to {modules, dependencies})
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    let root = match &cli.root {
        Some(path) => path.clone(),
        None => std::env::current_dir().into_diagnostic()?,
    };
    let mut config = Config::new(root)
        .with_max_age(cli.max_age)
        .with_bundles(matches!(cli.command, Commands::Bundles { .. }));
    for prefix in &cli.forbid {
        config = config.forbid(Matcher::Prefix(prefix.clone()));
    }
    for id in &cli.nowrap {
        config = config.nowrap(Matcher::Prefix(id.clone()));
    }
    let config = config.normalize();

    match cli.command {
        Commands::Module { id, out } => commands::module::run(&id, out, &config, cli.json).await,
        Commands::Aggregate { ids, out } => {
            commands::aggregate::run(&ids, out, &config, cli.json).await
        }
        Commands::Deps { id } => commands::deps::run(&id, &config, cli.json).await,
        Commands::Bundles { file } => commands::bundles::run(&file, &config, cli.json).await,
    }
}
