//! Format conversion.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use fb2wd_core::{flatten, webq};

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Flatten a wrapped dataset into `<id>\t<question>\t<first-parse-sparql>`.
    Tsv {
        /// Input dataset (wrapped `{"Questions": [...]}` shape).
        input: PathBuf,

        /// Output TSV file.
        #[arg(short, long, default_value = "train.tsv")]
        out: PathBuf,
    },
}

pub fn cmd_export(command: ExportCommands) -> Result<()> {
    match command {
        ExportCommands::Tsv { input, out } => cmd_tsv(&input, &out),
    }
}

fn cmd_tsv(input: &Path, out: &Path) -> Result<()> {
    let examples = webq::load_wrapped(input)?;
    let file = fs::File::create(out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    let written = flatten::write_tsv(&examples, file)?;
    eprintln!(
        "{} {} ({} rows)",
        "wrote".green().bold(),
        out.display().to_string().bold(),
        written
    );
    Ok(())
}
