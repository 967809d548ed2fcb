//! Identifier mapping construction and the convertibility report.
//!
//! `properties` scrapes the WikiProject Freebase mapping page,
//! `entities` parses the `fb2w.nt` dump, and `convertibility` reports how
//! much of a test split the resulting maps can translate. Network or parse
//! failures are fatal; there is no retry.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use fb2wd_core::mappings::{self, Fb2WdMapper, MappingFiles};
use fb2wd_core::normalize::SparqlNormalizer;
use fb2wd_core::webq;

pub const MAPPING_PAGE_URL: &str =
    "https://www.wikidata.org/wiki/Wikidata:WikiProject_Freebase/Mapping";

#[derive(Subcommand)]
pub enum MappingsCommands {
    /// Build `property-mappings.json` from the WikiProject mapping page.
    Properties {
        /// Mapping page to fetch.
        #[arg(long, default_value = MAPPING_PAGE_URL)]
        url: String,

        /// Parse a saved copy of the page instead of fetching.
        #[arg(long, conflicts_with = "url")]
        html: Option<PathBuf>,

        /// Output mapping file.
        #[arg(short, long, default_value = "property-mappings.json")]
        out: PathBuf,

        /// Per-request timeout in seconds.
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,

        /// HTTP User-Agent.
        #[arg(long, default_value = "fb2wd/0.2 (+https://github.com/fb2wd/fb2wd)")]
        user_agent: String,
    },

    /// Build `entity-mappings.json` from a `fb2w.nt` dump.
    Entities {
        /// Tab-separated `owl:sameAs` triples (`fb2w.nt`).
        input: PathBuf,

        /// Output mapping file.
        #[arg(short, long, default_value = "entity-mappings.json")]
        out: PathBuf,
    },

    /// Count test examples fully translatable under the mappings.
    ///
    /// Prints `<convertible> <not_convertible>` to stdout.
    Convertibility {
        /// Test split (wrapped `{"Questions": [...]}` shape).
        #[arg(long, default_value = "data/test.json")]
        test: PathBuf,

        /// Entity mapping file.
        #[arg(long, default_value = "entity-mappings.json")]
        entities: PathBuf,

        /// Property mapping file.
        #[arg(long, default_value = "property-mappings.json")]
        properties: PathBuf,

        /// Hand-curated entity overlay (wins over the official map).
        #[arg(long)]
        manual_entities: Option<PathBuf>,

        /// Hand-curated property overlay (wins over the official map).
        #[arg(long)]
        manual_properties: Option<PathBuf>,
    },
}

pub fn cmd_mappings(command: MappingsCommands) -> Result<()> {
    match command {
        MappingsCommands::Properties {
            url,
            html,
            out,
            timeout_secs,
            user_agent,
        } => cmd_properties(&url, html.as_deref(), &out, timeout_secs, &user_agent),
        MappingsCommands::Entities { input, out } => cmd_entities(&input, &out),
        MappingsCommands::Convertibility {
            test,
            entities,
            properties,
            manual_entities,
            manual_properties,
        } => cmd_convertibility(&test, entities, properties, manual_entities, manual_properties),
    }
}

fn cmd_properties(
    url: &str,
    html: Option<&Path>,
    out: &Path,
    timeout_secs: u64,
    user_agent: &str,
) -> Result<()> {
    let page = match html {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let url = Url::parse(url).with_context(|| format!("invalid url: {url}"))?;
            fetch_page(&url, timeout_secs, user_agent)?
        }
    };

    let property_mappings = mappings::property_mappings_from_html(&page);
    mappings::write_mapping_file(out, &property_mappings)?;
    eprintln!(
        "{} {} ({} properties)",
        "wrote".green().bold(),
        out.display().to_string().bold(),
        property_mappings.len()
    );
    Ok(())
}

fn cmd_entities(input: &Path, out: &Path) -> Result<()> {
    let file = fs::File::open(input)
        .with_context(|| format!("failed to open {}", input.display()))?;
    let entity_mappings = mappings::entity_mappings_from_ntriples(file)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    mappings::write_mapping_file(out, &entity_mappings)?;
    eprintln!(
        "{} {} ({} entities)",
        "wrote".green().bold(),
        out.display().to_string().bold(),
        entity_mappings.len()
    );
    Ok(())
}

fn cmd_convertibility(
    test: &Path,
    entities: PathBuf,
    properties: PathBuf,
    manual_entities: Option<PathBuf>,
    manual_properties: Option<PathBuf>,
) -> Result<()> {
    let normalizer = SparqlNormalizer::new();
    let mapper = Fb2WdMapper::load(&MappingFiles {
        entities,
        properties,
        manual_entities,
        manual_properties,
        reverse_properties: None,
    })?;

    let examples = webq::load_wrapped(test)?;
    let report = mappings::check_convertibility(&mapper, &normalizer, &examples);

    eprintln!(
        "{} examples={} convertible={} not_convertible={}",
        "convertibility".green().bold(),
        examples.len(),
        report.convertible,
        report.not_convertible
    );
    println!("{} {}", report.convertible, report.not_convertible);
    Ok(())
}

fn fetch_page(url: &Url, timeout_secs: u64, user_agent: &str) -> Result<String> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent).unwrap_or_else(|_| HeaderValue::from_static("fb2wd")),
    );
    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| anyhow!("failed to build http client: {e}"))?;

    let resp = client
        .get(url.clone())
        .send()
        .with_context(|| format!("failed to fetch {url}"))?;
    if !resp.status().is_success() {
        return Err(anyhow!("http status {} fetching {url}", resp.status()));
    }
    resp.text().with_context(|| format!("failed to read body of {url}"))
}
