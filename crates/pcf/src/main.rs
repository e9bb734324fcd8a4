//! pcf CLI - Preserve code formatting.
//!
//! Provides commands for:
//! - `extract`: Replace preserve tags with placeholders
//! - `restore`: Turn placeholders back into markup
//! - `render`: Run extract, an optional filter, and restore in one go

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CommonArgs, ExtractArgs, RenderArgs, RestoreArgs};
use output::Output;

/// pcf - Shield code and pre tag contents from text beautifiers.
#[derive(Parser)]
#[command(name = "pcf", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace preserve tags with placeholders.
    Extract(ExtractArgs),
    /// Replace placeholders with formatted markup.
    Restore(RestoreArgs),
    /// Extract, run a filter, and restore.
    Render(RenderArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // Logs go to stderr; stdout carries the processed content
    let filter = if cli.common.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Extract(args) => args.execute(&cli.common),
        Commands::Restore(args) => args.execute(&cli.common),
        Commands::Render(args) => args.execute(&cli.common),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
