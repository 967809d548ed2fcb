//! Train/test template overlap.
//!
//! A test example whose SPARQL template was already seen among training
//! parses tells us nothing about generalization; the split quality check
//! counts how many of those exist.

use std::collections::HashSet;

use crate::normalize::SparqlNormalizer;
use crate::webq::WebQuestionExample;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapReport {
    pub unseen: usize,
    pub seen: usize,
}

/// The set of normalized templates over every parse of the training set.
pub fn training_templates(
    train: &[WebQuestionExample],
    normalizer: &SparqlNormalizer,
) -> HashSet<String> {
    let mut templates = HashSet::new();
    for example in train {
        for parse in &example.parses {
            templates.insert(normalizer.normalize(&parse.sparql));
        }
    }
    templates
}

/// Classify each test example as "seen" (some parse normalizes into the
/// training template set) or "unseen".
pub fn check_overlap(
    templates: &HashSet<String>,
    test: &[WebQuestionExample],
    normalizer: &SparqlNormalizer,
) -> OverlapReport {
    let mut report = OverlapReport::default();
    for example in test {
        let seen = example
            .parses
            .iter()
            .any(|parse| templates.contains(&normalizer.normalize(&parse.sparql)));
        if seen {
            report.seen += 1;
        } else {
            report.unseen += 1;
        }
    }
    report
}
