//! Annotation batch splitting.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use fb2wd_core::{split, webq};

#[derive(Args)]
pub struct SplitArgs {
    /// Number of examples per batch.
    #[arg(long, default_value_t = 50)]
    batch_size: usize,

    /// Prefix of the output file names.
    #[arg(long, default_value = "train")]
    prefix: String,

    /// Input flat example file; batches are written next to it.
    input: PathBuf,
}

pub fn cmd_split(args: SplitArgs) -> Result<()> {
    let examples = webq::load_flat(&args.input)?;
    let dir = args.input.parent().unwrap_or(Path::new("."));
    let written = split::write_batches(&examples, dir, &args.prefix, args.batch_size)?;
    eprintln!(
        "{} {} batches of ≤{} examples under {}",
        "wrote".green().bold(),
        written.len(),
        args.batch_size,
        dir.display()
    );
    Ok(())
}
