mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    defaults, edit, export, init, inspect, visibility, DefaultsArgs, EditArgs, ExportArgs,
    InitArgs, InspectArgs, VisibilityArgs,
};
use tracing_subscriber::EnvFilter;

/// Patternflow CLI - inspect, evaluate and edit pattern flows
#[derive(Parser, Debug)]
#[command(name = "patternflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log editor activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default patternflow.config.json
    Init(InitArgs),

    /// Print the edit pages of a flow as a tree
    Inspect(InspectArgs),

    /// Print the default field values declared in a flow
    Defaults(DefaultsArgs),

    /// List the pages and elements visible for a set of field values
    Visibility(VisibilityArgs),

    /// Re-export a flow as its canonical document
    Export(ExportArgs),

    /// Replay a script of edit commands against a flow
    Edit(EditArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Inspect(args) => inspect(args, &cwd),
        Command::Defaults(args) => defaults(args, &cwd),
        Command::Visibility(args) => visibility(args, &cwd),
        Command::Export(args) => export(args, &cwd),
        Command::Edit(args) => edit(args, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
