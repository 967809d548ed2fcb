//! Duplicate-annotation detection across batches.
//!
//! Annotation happens in batches. Before handing out the leftover ("rest")
//! examples, we want to know how many of them share a template with work
//! that is already done: those can be auto-filled from the existing
//! annotation instead of being re-annotated by hand.
//!
//! Only the *first* parse of an annotated example feeds the lookup: the
//! first parse is the canonical one in the annotated batches.

use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::normalize::SparqlNormalizer;
use crate::webq::WebQuestionExample;

/// `QuestionId` → annotated Wikidata SPARQL (first parse) over a set of
/// annotated batch files.
pub fn annotation_index(batches: &[Vec<WebQuestionExample>]) -> Result<HashMap<String, String>> {
    let mut index = HashMap::new();
    for batch in batches {
        for example in batch {
            let first = example
                .parses
                .first()
                .with_context(|| format!("annotated example {} has no parses", example.question_id))?;
            index.insert(example.question_id.clone(), first.sparql.clone());
        }
    }
    Ok(index)
}

/// Lookup from a normalized Freebase template to the already-annotated
/// Wikidata SPARQL and the utterance it was annotated for.
#[derive(Debug, Default)]
pub struct ExactMatcher {
    pub wd_sparql: HashMap<String, String>,
    pub utterance: HashMap<String, String>,
}

impl ExactMatcher {
    pub fn contains(&self, template: &str) -> bool {
        self.wd_sparql.contains_key(template)
    }
}

/// Build the matcher from the training split, restricted to examples present
/// in the annotation index.
pub fn build_exact_matcher(
    train: &[WebQuestionExample],
    annotated: &HashMap<String, String>,
    normalizer: &SparqlNormalizer,
) -> Result<ExactMatcher> {
    let mut matcher = ExactMatcher::default();
    for example in train {
        let Some(wd_sparql) = annotated.get(&example.question_id) else {
            continue;
        };
        let first = example
            .parses
            .first()
            .with_context(|| format!("train example {} has no parses", example.question_id))?;
        let template = normalizer.normalize(&first.sparql);
        matcher
            .utterance
            .insert(template.clone(), example.raw_question.clone());
        matcher.wd_sparql.insert(template, wd_sparql.clone());
    }
    Ok(matcher)
}

/// How many parses in the rest file already have an annotated template.
pub fn count_repeats(
    rest: &[WebQuestionExample],
    matcher: &ExactMatcher,
    normalizer: &SparqlNormalizer,
) -> usize {
    let mut count = 0;
    for example in rest {
        for parse in &example.parses {
            if matcher.contains(&normalizer.normalize(&parse.sparql)) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webq::WebQuestionParse;

    fn example(id: &str, question: &str, sparqls: &[&str]) -> WebQuestionExample {
        WebQuestionExample {
            question_id: id.to_string(),
            raw_question: question.to_string(),
            processed_question: None,
            parses: sparqls
                .iter()
                .map(|s| WebQuestionParse {
                    sparql: s.to_string(),
                    answers: None,
                })
                .collect(),
        }
    }

    #[test]
    fn index_keeps_first_parse_only() {
        let batches = vec![vec![example(
            "q-0",
            "who?",
            &["SELECT ?x { wd:Q1 wdt:P26 ?x }", "SELECT ?x { wd:Q1 wdt:P40 ?x }"],
        )]];
        let index = annotation_index(&batches).expect("index");
        assert_eq!(index["q-0"], "SELECT ?x { wd:Q1 wdt:P26 ?x }");
    }

    #[test]
    fn index_rejects_empty_parses() {
        let batches = vec![vec![example("q-0", "who?", &[])]];
        assert!(annotation_index(&batches).is_err());
    }

    #[test]
    fn matcher_is_restricted_to_annotated_train_examples() {
        let norm = SparqlNormalizer::new();
        let mut annotated = HashMap::new();
        annotated.insert("q-0".to_string(), "SELECT ?x { wd:Q1 wdt:P26 ?x }".to_string());

        let train = vec![
            example("q-0", "who is A married to?", &["SELECT ?x { ns:m.0a ns:people.person.spouse_s ?x }"]),
            example("q-1", "where is B?", &["SELECT ?x { ns:m.0b ns:location.location.containedby ?x }"]),
        ];
        let matcher = build_exact_matcher(&train, &annotated, &norm).expect("matcher");
        assert_eq!(matcher.wd_sparql.len(), 1);

        let template = norm.normalize("SELECT ?x { ns:m.0a ns:people.person.spouse_s ?x }");
        assert_eq!(matcher.wd_sparql[&template], "SELECT ?x { wd:Q1 wdt:P26 ?x }");
        assert_eq!(matcher.utterance[&template], "who is A married to?");
    }

    #[test]
    fn counts_rest_parses_with_known_templates() {
        let norm = SparqlNormalizer::new();
        let mut annotated = HashMap::new();
        annotated.insert("q-0".to_string(), "wd".to_string());

        let train = vec![example(
            "q-0",
            "who?",
            &["SELECT ?x { ns:m.0a ns:people.person.spouse_s ?x }"],
        )];
        let matcher = build_exact_matcher(&train, &annotated, &norm).expect("matcher");

        // Same template with a different entity counts; a novel template
        // does not. Both parses of the first example are counted
        // individually.
        let rest = vec![
            example(
                "r-0",
                "who else?",
                &[
                    "SELECT ?x { ns:m.0c ns:people.person.spouse_s ?x }",
                    "SELECT ?x { ns:m.0d ns:people.person.spouse_s ?x }",
                ],
            ),
            example("r-1", "where?", &["SELECT ?x { ns:m.0c ns:location.location.containedby ?x }"]),
        ];
        assert_eq!(count_repeats(&rest, &matcher, &norm), 2);
    }
}
