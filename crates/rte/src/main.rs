//! RTE CLI - Rich-text editor widget renderer.
//!
//! Provides commands for:
//! - `editor`: Render an editor widget fragment
//! - `viewer`: Render a read-only viewer fragment
//! - `dependencies`: Render third-party dependency tags
//! - `template`: Render a minijinja template with the widget functions
//! - `check`: Validate the configuration and print a summary

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, DependenciesArgs, GlobalArgs, TemplateArgs, WidgetArgs, WidgetKind};
use output::Output;

/// RTE - Rich-text editor widget renderer.
#[derive(Parser)]
#[command(name = "rte", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an editor widget.
    Editor(WidgetArgs),
    /// Render a read-only viewer widget.
    Viewer(WidgetArgs),
    /// Render dependency script and stylesheet tags.
    Dependencies(DependenciesArgs),
    /// Render a template with the widget functions registered.
    Template(TemplateArgs),
    /// Validate the configuration.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Editor(args) => args.execute(&cli.global, WidgetKind::Editor),
        Commands::Viewer(args) => args.execute(&cli.global, WidgetKind::Viewer),
        Commands::Dependencies(args) => args.execute(&cli.global),
        Commands::Template(args) => args.execute(&cli.global),
        Commands::Check(args) => args.execute(&cli.global),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
