//! RET CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::check::OutputFormat;

mod commands;

#[derive(Parser)]
#[command(name = "ret")]
#[command(version)]
#[command(about = "Linter and language server for RET email templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check template files and report diagnostics
    Check {
        /// Template files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Run the language server over stdio
    Lsp,
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr; stdout carries check output and the LSP protocol.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ret=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { files, format } => {
            let outcome = commands::check::execute(&files, format)?;
            Ok(if outcome.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Lsp => {
            commands::lsp::execute()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
