//! WebQuestionsSP data model and loaders.
//!
//! Two on-disk shapes exist in the dataset drops:
//! - "wrapped": `{"Questions": [...]}`, the official train/test splits.
//! - "flat": `[...]`, annotation batches and leftover files.
//!
//! Field names stay in the dataset's PascalCase on disk.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One QA example: a question plus its candidate logical forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebQuestionExample {
    pub question_id: String,
    pub raw_question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_question: Option<String>,
    pub parses: Vec<WebQuestionParse>,
}

/// One candidate logical form (a SPARQL translation of the question).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebQuestionParse {
    pub sparql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<WebQuestionAnswer>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebQuestionAnswer {
    pub answer_type: String,
    pub answer_argument: String,
    pub entity_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WrappedDataset {
    #[serde(rename = "Questions")]
    questions: Vec<WebQuestionExample>,
}

/// Load a `{"Questions": [...]}` dataset (official splits).
pub fn load_wrapped(path: &Path) -> Result<Vec<WebQuestionExample>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let data: WrappedDataset = serde_json::from_str(&text)
        .with_context(|| format!("invalid wrapped dataset {}", path.display()))?;
    Ok(data.questions)
}

/// Load a flat `[...]` example file (annotation batches, leftovers).
pub fn load_flat(path: &Path) -> Result<Vec<WebQuestionExample>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let examples: Vec<WebQuestionExample> = serde_json::from_str(&text)
        .with_context(|| format!("invalid flat dataset {}", path.display()))?;
    Ok(examples)
}

/// Patch a raw WebQuestionsSP SPARQL string so a standards-compliant parser
/// accepts it.
///
/// The dataset's queries miss the `xsd:` prefix and carry fixed boilerplate
/// filters (mentioned-entity exclusion, English-or-entity result filter) that
/// add nothing to the logical form. One query in the wild has an unbracketed
/// `HAVING` clause.
pub fn preprocess_sparql(sparql: &str) -> String {
    static ENTITY_FILTER: OnceLock<Regex> = OnceLock::new();
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    let entity_filter =
        ENTITY_FILTER.get_or_init(|| Regex::new(r"FILTER \(\?x != ns:m\.[^)]+\)").unwrap());
    let blank_lines = BLANK_LINES.get_or_init(|| Regex::new(r"\n+").unwrap());

    let mut out = format!("PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>\n{sparql}");
    out = out.replace("\\n", "\n");
    out = entity_filter.replace_all(&out, "").into_owned();
    out = out.replace(
        "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))",
        "",
    );
    out = out.replace(
        "FILTER (!isLiteral(?x) OR (lang(?x) = '' OR lang(?x) = 'en'))",
        "",
    );
    out = blank_lines.replace_all(&out, "\n").into_owned();
    out = out.replace(" OR ", "||");
    out = out.replace("Having COUNT(?city) = 2", "Having (COUNT(?city) = 2)");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_and_flat_shapes_round_trip() {
        let wrapped = r#"{
            "Questions": [
                {
                    "QuestionId": "WebQTrn-0",
                    "RawQuestion": "what is the name of justin bieber brother?",
                    "Parses": [{"Sparql": "SELECT ?x WHERE { ns:m.06w2sn5 ns:people.person.sibling_s ?x }"}]
                }
            ]
        }"#;
        let data: WrappedDataset = serde_json::from_str(wrapped).expect("wrapped parses");
        assert_eq!(data.questions.len(), 1);
        assert_eq!(data.questions[0].question_id, "WebQTrn-0");
        assert_eq!(data.questions[0].parses.len(), 1);

        let flat = serde_json::to_string(&data.questions).expect("serialize flat");
        let back: Vec<WebQuestionExample> = serde_json::from_str(&flat).expect("flat parses");
        assert_eq!(back[0].raw_question, data.questions[0].raw_question);
    }

    #[test]
    fn missing_parses_is_an_error() {
        let bad = r#"{"Questions": [{"QuestionId": "q", "RawQuestion": "?"}]}"#;
        assert!(serde_json::from_str::<WrappedDataset>(bad).is_err());
    }

    #[test]
    fn preprocess_adds_xsd_prefix_and_strips_fixed_filters() {
        let raw = "SELECT ?x WHERE {\nFILTER (?x != ns:m.06w2sn5)\nFILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))\nns:m.06w2sn5 ns:people.person.sibling_s ?x .\n}";
        let cleaned = preprocess_sparql(raw);
        assert!(cleaned.starts_with("PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>"));
        assert!(!cleaned.contains("FILTER (?x != ns:m.06w2sn5)"));
        assert!(!cleaned.contains("isLiteral"));
        assert!(cleaned.contains("ns:people.person.sibling_s"));
    }

    #[test]
    fn preprocess_unescapes_newlines_and_rewrites_or() {
        let raw = "SELECT ?x\\nWHERE { ?x ?p ?o FILTER (?a = 1 OR ?b = 2) }";
        let cleaned = preprocess_sparql(raw);
        assert!(!cleaned.contains("\\n"));
        assert!(cleaned.contains("||"));
        assert!(!cleaned.contains(" OR "));
    }
}
