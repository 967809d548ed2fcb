//! Fixed-size annotation batches.
//!
//! Annotators work through files of ~50 examples at a time. The splitter
//! cuts a flat example file into consecutive batches named
//! `<prefix>-NNN.json`, pretty-printed so they stay hand-editable.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::webq::WebQuestionExample;

/// `train`, 7 → `train-007.json`.
pub fn batch_file_name(prefix: &str, index: usize) -> String {
    format!("{prefix}-{index:03}.json")
}

/// Write consecutive batches of `batch_size` examples into `dir`. Returns
/// the written paths in order.
pub fn write_batches(
    examples: &[WebQuestionExample],
    dir: &Path,
    prefix: &str,
    batch_size: usize,
) -> Result<Vec<PathBuf>> {
    if batch_size == 0 {
        bail!("batch size must be > 0");
    }
    let mut written = Vec::new();
    for (index, batch) in examples.chunks(batch_size).enumerate() {
        let path = dir.join(batch_file_name(prefix, index));
        let json = serde_json::to_string_pretty(batch)?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webq::{self, WebQuestionParse};

    fn examples(n: usize) -> Vec<WebQuestionExample> {
        (0..n)
            .map(|i| WebQuestionExample {
                question_id: format!("q-{i}"),
                raw_question: format!("question {i}"),
                processed_question: None,
                parses: vec![WebQuestionParse {
                    sparql: format!("SELECT ?x {{ ns:m.{i:x} ?p ?x }}"),
                    answers: None,
                }],
            })
            .collect()
    }

    #[test]
    fn batch_names_are_zero_padded() {
        assert_eq!(batch_file_name("train", 0), "train-000.json");
        assert_eq!(batch_file_name("train", 42), "train-042.json");
    }

    #[test]
    fn splits_into_consecutive_batches() {
        let dir = tempfile::tempdir().expect("tempdir");
        let all = examples(5);
        let written = write_batches(&all, dir.path(), "train", 2).expect("split");
        assert_eq!(written.len(), 3);
        assert_eq!(
            written[2].file_name().and_then(|n| n.to_str()),
            Some("train-002.json")
        );

        let first = webq::load_flat(&written[0]).expect("reload batch");
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].question_id, "q-0");
        let last = webq::load_flat(&written[2]).expect("reload batch");
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].question_id, "q-4");
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(write_batches(&examples(1), dir.path(), "train", 0).is_err());
    }
}
