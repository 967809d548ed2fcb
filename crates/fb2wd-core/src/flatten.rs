//! JSON → TSV export.
//!
//! Seq2seq toolchains want one example per line: id, utterance, target
//! SPARQL. Only the first parse is exported. Embedded newlines are stripped
//! from the query so the row stays a single line.

use std::io::Write;

use anyhow::{bail, Result};

use crate::webq::WebQuestionExample;

/// Write one tab-separated row per example. An example without parses is
/// fatal; its identity is logged before the error propagates so the bad
/// record can be found in the source file.
pub fn write_tsv<W: Write>(examples: &[WebQuestionExample], out: W) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    for example in examples {
        let Some(first) = example.parses.first() else {
            tracing::error!(
                question_id = %example.question_id,
                raw_question = %example.raw_question,
                "example has no parses; aborting TSV export"
            );
            bail!("example {} has no parses", example.question_id);
        };
        let sparql = first.sparql.replace('\n', "");
        writer.write_record([
            example.question_id.as_str(),
            example.raw_question.as_str(),
            sparql.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(examples.len())
}
