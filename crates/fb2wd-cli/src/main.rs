//! fb2wd CLI
//!
//! Batch utilities for re-targeting the WebQuestionsSP benchmark from
//! Freebase to Wikidata:
//! - cross-checks between dataset splits (template overlap, repeated
//!   annotation work)
//! - Freebase→Wikidata identifier mapping construction and the
//!   convertibility report
//! - format conversion (JSON → TSV, fixed-size annotation batches)
//!
//! Every command is a single linear pass: inputs in, counts or derived
//! files out, non-zero exit on any malformed input.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod check;
mod export;
mod mappings;
mod split;

#[derive(Parser)]
#[command(name = "fb2wd")]
#[command(version, about = "WebQuestionsSP Freebase→Wikidata preparation tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cross-check dataset splits (template overlap, repeated annotation work).
    Check {
        #[command(subcommand)]
        command: check::CheckCommands,
    },

    /// Build Freebase→Wikidata identifier mappings and report convertibility.
    Mappings {
        #[command(subcommand)]
        command: mappings::MappingsCommands,
    },

    /// Convert datasets between formats.
    Export {
        #[command(subcommand)]
        command: export::ExportCommands,
    },

    /// Split a flat example file into fixed-size annotation batches.
    Split(split::SplitArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { command } => check::cmd_check(command),
        Commands::Mappings { command } => mappings::cmd_mappings(command),
        Commands::Export { command } => export::cmd_export(command),
        Commands::Split(args) => split::cmd_split(args),
    }
}
