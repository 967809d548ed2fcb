//! Freebase→Wikidata identifier mappings.
//!
//! Two static sources feed the mappings:
//! - the Wikidata WikiProject Freebase mapping page (an HTML table of
//!   Freebase property URLs against Wikidata `P<n>` ids), and
//! - the `fb2w.nt` dump (tab-separated `owl:sameAs` triples linking Freebase
//!   entity URIs to Wikidata entity URIs).
//!
//! Builders parse those into plain string→string maps, serialized as
//! pretty-printed JSON. [`Fb2WdMapper`] merges the official maps with
//! hand-curated overlays and answers membership/lookup queries, including
//! the convertibility report over a test split.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;

use crate::normalize::SparqlNormalizer;
use crate::webq::WebQuestionExample;

pub const FB_PROPERTY_PREFIX: &str = "https://www.freebase.com/";
pub const FB_ENTITY_PREFIX: &str = "http://rdf.freebase.com/ns/";
pub const WD_ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

// ============================================================================
// Builders
// ============================================================================

/// Extract the Freebase property → Wikidata property map from the
/// WikiProject mapping page.
///
/// A row qualifies when its first cell is a `freebase.com` URL and its
/// second cell mentions a `P<digits>` id anywhere. The Freebase id keeps the
/// URL path with slashes turned into dots (`m/02mjmr` → `m.02mjmr`).
pub fn property_mappings_from_html(html: &str) -> BTreeMap<String, String> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td, th").unwrap();
    let wd_property = Regex::new(r"P[0-9]+").unwrap();

    let mut mappings = BTreeMap::new();
    for table in doc.select(&table_sel) {
        for row in table.select(&row_sel) {
            let cells: Vec<String> = row
                .select(&cell_sel)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            if cells.len() < 2 || !cells[0].starts_with(FB_PROPERTY_PREFIX) {
                continue;
            }
            let Some(wd_id) = wd_property.find(&cells[1]) else {
                continue;
            };
            let fb_id = cells[0][FB_PROPERTY_PREFIX.len()..].replace('/', ".");
            mappings.insert(fb_id, wd_id.as_str().to_string());
        }
    }
    mappings
}

/// Extract the Freebase entity → Wikidata entity map from a `fb2w.nt`
/// dump: tab-separated triples `<fb-uri> <owl:sameAs> <wd-uri> .`.
pub fn entity_mappings_from_ntriples<R: io::Read>(reader: R) -> Result<BTreeMap<String, String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut mappings = BTreeMap::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("bad fb2w row {}", line + 1))?;
        if record.len() != 3 {
            bail!(
                "fb2w row {} has {} columns, expected 3",
                line + 1,
                record.len()
            );
        }
        let fb_id = strip_uri(&record[0], FB_ENTITY_PREFIX, ">")
            .with_context(|| format!("bad Freebase URI on fb2w row {}: {}", line + 1, &record[0]))?;
        // The object column carries the N-Triples terminator: `<uri> .`
        let wd_id = strip_uri(&record[2], WD_ENTITY_PREFIX, "> .")
            .with_context(|| format!("bad Wikidata URI on fb2w row {}: {}", line + 1, &record[2]))?;
        mappings.insert(fb_id.to_string(), wd_id.to_string());
    }
    Ok(mappings)
}

fn strip_uri<'a>(field: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    field
        .strip_prefix('<')?
        .strip_prefix(prefix)?
        .strip_suffix(suffix)
}

/// Pretty-printed JSON object, the on-disk form of every mapping file.
pub fn write_mapping_file(path: &Path, mappings: &BTreeMap<String, String>) -> Result<()> {
    let json = serde_json::to_string_pretty(mappings)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

// ============================================================================
// Merged mapper
// ============================================================================

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("cannot read mapping file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("mapping file {path} is not a string-to-string object")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load one `{"fb-id": "wd-id", ...}` file.
pub fn load_mapping_file(path: &Path) -> Result<HashMap<String, String>, MappingError> {
    let text = fs::read_to_string(path).map_err(|source| MappingError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| MappingError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Mapping files backing a [`Fb2WdMapper`]. Manual overlays win over the
/// official maps.
#[derive(Debug, Clone, Default)]
pub struct MappingFiles {
    pub entities: PathBuf,
    pub properties: PathBuf,
    pub manual_entities: Option<PathBuf>,
    pub manual_properties: Option<PathBuf>,
    pub reverse_properties: Option<PathBuf>,
}

/// Merged Freebase→Wikidata identifier translation, held in memory for one
/// run.
#[derive(Debug, Default)]
pub struct Fb2WdMapper {
    entities: HashMap<String, String>,
    properties: HashMap<String, String>,
    reverse_properties: HashMap<String, String>,
}

impl Fb2WdMapper {
    pub fn load(files: &MappingFiles) -> Result<Self, MappingError> {
        let mut entities = load_mapping_file(&files.entities)?;
        if let Some(path) = &files.manual_entities {
            entities.extend(load_mapping_file(path)?);
        }
        let mut properties = load_mapping_file(&files.properties)?;
        if let Some(path) = &files.manual_properties {
            properties.extend(load_mapping_file(path)?);
        }
        let reverse_properties = match &files.reverse_properties {
            Some(path) => load_mapping_file(path)?,
            None => HashMap::new(),
        };
        Ok(Fb2WdMapper {
            entities,
            properties,
            reverse_properties,
        })
    }

    pub fn from_maps(
        entities: HashMap<String, String>,
        properties: HashMap<String, String>,
    ) -> Self {
        Fb2WdMapper {
            entities,
            properties,
            reverse_properties: HashMap::new(),
        }
    }

    pub fn add_entity(&mut self, fb_id: impl Into<String>, wd_id: impl Into<String>) {
        self.entities.insert(fb_id.into(), wd_id.into());
    }

    pub fn has_entity(&self, fb_id: &str) -> bool {
        self.entities.contains_key(fb_id)
    }

    pub fn has_property(&self, fb_id: &str) -> bool {
        self.properties.contains_key(fb_id)
    }

    pub fn has_reverse_property(&self, fb_id: &str) -> bool {
        self.reverse_properties.contains_key(fb_id)
    }

    /// Translate one id, entity map first, then property, then reverse
    /// property.
    pub fn map(&self, fb_id: &str) -> Option<&str> {
        self.entities
            .get(fb_id)
            .or_else(|| self.properties.get(fb_id))
            .or_else(|| self.reverse_properties.get(fb_id))
            .map(String::as_str)
    }
}

// ============================================================================
// Convertibility
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertibilityReport {
    pub convertible: usize,
    pub not_convertible: usize,
}

/// A parse is convertible iff every entity it references is in the entity
/// map and every property token is in the property map. A parse with no
/// tokens is vacuously convertible.
pub fn parse_is_convertible(
    mapper: &Fb2WdMapper,
    normalizer: &SparqlNormalizer,
    sparql: &str,
) -> bool {
    normalizer
        .entity_ids(sparql)
        .iter()
        .all(|id| mapper.has_entity(id))
        && normalizer
            .property_ids(sparql)
            .iter()
            .all(|id| mapper.has_property(id))
}

/// An example is convertible if at least one of its parses is.
pub fn check_convertibility(
    mapper: &Fb2WdMapper,
    normalizer: &SparqlNormalizer,
    examples: &[WebQuestionExample],
) -> ConvertibilityReport {
    let mut report = ConvertibilityReport::default();
    for example in examples {
        let convertible = example
            .parses
            .iter()
            .any(|parse| parse_is_convertible(mapper, normalizer, &parse.sparql));
        if convertible {
            report.convertible += 1;
        } else {
            report.not_convertible += 1;
        }
    }
    report
}
