//! Cross-checks between dataset splits.
//!
//! Both commands print their machine-readable counts (and nothing else) to
//! stdout; human context goes to stderr.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use fb2wd_core::normalize::SparqlNormalizer;
use fb2wd_core::{overlap, repeats, webq};

#[derive(Subcommand)]
pub enum CheckCommands {
    /// Count test examples whose SPARQL template was seen during training.
    ///
    /// Prints `<unseen> <seen>` to stdout.
    Overlap {
        /// Training split (wrapped `{"Questions": [...]}` shape).
        #[arg(long, default_value = "data/train.json")]
        train: PathBuf,

        /// Test split (wrapped shape).
        #[arg(long, default_value = "data/test.json")]
        test: PathBuf,
    },

    /// Count leftover parses whose template is already annotated.
    ///
    /// Prints the repeat count to stdout.
    Repeats {
        /// Training split (wrapped shape) the annotation batches were cut from.
        #[arg(long, default_value = "data/train.json")]
        train: PathBuf,

        /// Annotated batch file (flat array shape; repeatable).
        #[arg(long = "annotated", required = true)]
        annotated: Vec<PathBuf>,

        /// Leftover examples to check (flat array shape).
        #[arg(long, default_value = "data/train-rest.json")]
        rest: PathBuf,
    },
}

pub fn cmd_check(command: CheckCommands) -> Result<()> {
    match command {
        CheckCommands::Overlap { train, test } => cmd_overlap(&train, &test),
        CheckCommands::Repeats {
            train,
            annotated,
            rest,
        } => cmd_repeats(&train, &annotated, &rest),
    }
}

fn cmd_overlap(train: &Path, test: &Path) -> Result<()> {
    let normalizer = SparqlNormalizer::new();

    let train_examples = webq::load_wrapped(train)?;
    let templates = overlap::training_templates(&train_examples, &normalizer);
    let test_examples = webq::load_wrapped(test)?;
    let report = overlap::check_overlap(&templates, &test_examples, &normalizer);

    eprintln!(
        "{} templates={} test_examples={} unseen={} seen={}",
        "overlap".green().bold(),
        templates.len(),
        test_examples.len(),
        report.unseen,
        report.seen
    );
    println!("{} {}", report.unseen, report.seen);
    Ok(())
}

fn cmd_repeats(train: &Path, annotated: &[PathBuf], rest: &Path) -> Result<()> {
    let normalizer = SparqlNormalizer::new();

    let batches = annotated
        .iter()
        .map(|path| webq::load_flat(path))
        .collect::<Result<Vec<_>>>()?;
    let index = repeats::annotation_index(&batches)?;

    let train_examples = webq::load_wrapped(train)?;
    let matcher = repeats::build_exact_matcher(&train_examples, &index, &normalizer)?;

    let rest_examples = webq::load_flat(rest)?;
    let count = repeats::count_repeats(&rest_examples, &matcher, &normalizer);

    eprintln!(
        "{} annotated={} templates={} rest_examples={} repeats={}",
        "repeats".green().bold(),
        index.len(),
        matcher.wd_sparql.len(),
        rest_examples.len(),
        count
    );
    println!("{count}");
    Ok(())
}
