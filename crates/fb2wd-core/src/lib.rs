//! Core library for the fb2wd benchmark-preparation toolkit.
//!
//! The WebQuestionsSP dataset annotates natural-language questions with
//! Freebase SPARQL. Freebase is dead; the annotation effort re-targets the
//! dataset at Wikidata. Everything in this crate supports that effort:
//!
//! - [`webq`]: the dataset's on-disk shapes and loaders.
//! - [`normalize`]: SPARQL template normalization (the comparison key used
//!   by every cross-check).
//! - [`overlap`]: train/test template overlap counting.
//! - [`repeats`]: duplicate-annotation detection across batches.
//! - [`mappings`]: Freebase→Wikidata identifier mapping construction and
//!   the convertibility report built on top of it.
//! - [`flatten`]: JSON → TSV export.
//! - [`split`]: fixed-size annotation batch splitting.
//!
//! All of this is batch tooling: one pass over the inputs, counts or derived
//! files out, and any malformed input is a fatal error.

pub mod flatten;
pub mod mappings;
pub mod normalize;
pub mod overlap;
pub mod repeats;
pub mod split;
pub mod webq;

pub use mappings::Fb2WdMapper;
pub use normalize::SparqlNormalizer;
pub use webq::{WebQuestionExample, WebQuestionParse};
