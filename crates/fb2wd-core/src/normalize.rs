//! SPARQL template normalization.
//!
//! Queries are compared as *templates*: whitespace-collapsed, with every
//! Freebase entity reference (`ns:m.<id>`) masked to `ns:ENTITY`. Two parses
//! are equivalent for overlap/repeat detection iff their templates are equal.
//! Normalization is pure and idempotent, so the template is safe to use as a
//! set-membership key.

use regex::Regex;

/// Placeholder substituted for masked entity identifiers.
pub const ENTITY_PLACEHOLDER: &str = "ENTITY";

/// Compiled normalization patterns. Build one and reuse it; the regexes are
/// the whole cost.
pub struct SparqlNormalizer {
    whitespace: Regex,
    entity: Regex,
    namespaced: Regex,
}

impl SparqlNormalizer {
    pub fn new() -> Self {
        SparqlNormalizer {
            whitespace: Regex::new(r"\s+").unwrap(),
            // `regex` has no look-behind, so the `ns:` prefix is part of the
            // match and restored in the replacement. A token is a maximal run
            // excluding whitespace, parentheses and backslash.
            entity: Regex::new(r"ns:(m\.[^\s()\\]*)").unwrap(),
            namespaced: Regex::new(r"ns:([^\s()\\]+)").unwrap(),
        }
    }

    /// Canonical template form: collapse whitespace runs to a single space,
    /// trim, mask every `ns:m.<id>` to `ns:ENTITY`.
    pub fn normalize(&self, sparql: &str) -> String {
        let collapsed = self.whitespace.replace_all(sparql, " ");
        self.entity
            .replace_all(collapsed.trim(), format!("ns:{ENTITY_PLACEHOLDER}").as_str())
            .into_owned()
    }

    /// Every Freebase entity id (`m.<token>`) referenced via the `ns:` prefix.
    pub fn entity_ids<'a>(&self, sparql: &'a str) -> Vec<&'a str> {
        self.entity
            .captures_iter(sparql)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Every non-entity namespaced token (property/type ids such as
    /// `people.person.sibling_s`).
    pub fn property_ids<'a>(&self, sparql: &'a str) -> Vec<&'a str> {
        self.namespaced
            .captures_iter(sparql)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|id| !id.starts_with("m."))
            .collect()
    }
}

impl Default for SparqlNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_entities_preserving_prefix() {
        let norm = SparqlNormalizer::new();
        let out = norm.normalize("SELECT ?x WHERE { ns:m.ABC123 ?p ?x }");
        assert!(out.contains("ns:ENTITY"));
        assert!(!out.contains("ABC123"));
    }

    #[test]
    fn collapses_whitespace() {
        let norm = SparqlNormalizer::new();
        assert_eq!(
            norm.normalize("SELECT  ?x\n WHERE {...}"),
            "SELECT ?x WHERE {...}"
        );
    }

    #[test]
    fn masks_only_entity_tokens() {
        let norm = SparqlNormalizer::new();
        assert_eq!(
            norm.normalize("ns:m.02mjmr ns:people.person.date_of_birth ?x"),
            "ns:ENTITY ns:people.person.date_of_birth ?x"
        );
    }

    #[test]
    fn entity_token_stops_at_parenthesis() {
        let norm = SparqlNormalizer::new();
        assert_eq!(
            norm.normalize("FILTER (?x != ns:m.06w2sn5)"),
            "FILTER (?x != ns:ENTITY)"
        );
    }

    #[test]
    fn idempotent() {
        let norm = SparqlNormalizer::new();
        let once = norm.normalize("  SELECT ?x\nWHERE { ns:m.02mjmr ns:people.person.spouse_s ?x }  ");
        assert_eq!(norm.normalize(&once), once);
    }

    #[test]
    fn extracts_entity_and_property_ids() {
        let norm = SparqlNormalizer::new();
        let sparql = "ns:m.02mjmr ns:people.person.date_of_birth ?x . ?x ns:type.object.name ns:m.0d05w3";
        assert_eq!(norm.entity_ids(sparql), vec!["m.02mjmr", "m.0d05w3"]);
        assert_eq!(
            norm.property_ids(sparql),
            vec!["people.person.date_of_birth", "type.object.name"]
        );
    }

    #[test]
    fn no_tokens_means_empty_extraction() {
        let norm = SparqlNormalizer::new();
        assert!(norm.entity_ids("SELECT ?x WHERE { ?x ?p ?o }").is_empty());
        assert!(norm.property_ids("SELECT ?x WHERE { ?x ?p ?o }").is_empty());
    }
}
