//! Hidden-service search engine registry
//!
//! Each engine pairs a query-URL template with the extractor strategy that
//! understands its result markup. Adding an engine means adding a registry
//! entry and an extractor arm; the crawl orchestrator never branches on
//! engine identity.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Extractor strategy tag, resolved to an implementation by the crawl layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Structured result blocks (`div.result` with heading/paragraph tags)
    Tordex,
    /// Anchor scan for redirect-wrapper URLs with sibling-text descriptions
    Tor66,
}

/// A hidden-service search engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEngine {
    /// Human-readable name
    pub name: &'static str,
    /// URL template with {query} placeholder
    pub url_template: &'static str,
    /// Which extractor understands this engine's result markup
    pub extractor: ExtractorKind,
    /// Whether this engine is currently active/reliable
    pub active: bool,
}

impl SearchEngine {
    /// Build the search URL for a query, percent-encoding the term
    pub fn build_url(&self, query: &str) -> String {
        self.url_template
            .replace("{query}", &urlencoding::encode(query))
    }
}

/// Default registry of hidden-service search engines
pub static DEFAULT_SEARCH_ENGINES: &[SearchEngine] = &[
    SearchEngine {
        name: "Tordex",
        url_template: "http://tordexu73joywapk2txdr54jed4imqledpcvcuf75qsas2gwdgksvnyd.onion/search?query={query}",
        extractor: ExtractorKind::Tordex,
        active: true,
    },
    SearchEngine {
        name: "Tor66",
        url_template: "http://kn3hl4xwon63tc6hpjrwza2npb7d4w5yhbzq7jjewpfzyhsd65tm6dad.onion/search.php?search={query}&submit=Search&rt=",
        extractor: ExtractorKind::Tor66,
        active: true,
    },
];

/// All active engines, in registry order
pub fn active_engines() -> impl Iterator<Item = &'static SearchEngine> {
    DEFAULT_SEARCH_ENGINES.iter().filter(|e| e.active)
}

/// Registry misconfiguration, fatal at startup only
#[derive(Debug, Error)]
pub enum EngineConfigError {
    #[error("engine with empty name")]
    EmptyName,

    #[error("duplicate engine name: {0}")]
    DuplicateName(String),

    #[error("engine {0} template is missing the {{query}} placeholder")]
    MissingPlaceholder(String),
}

/// Validate a registry before any crawling starts
pub fn validate_engines(engines: &[SearchEngine]) -> Result<(), EngineConfigError> {
    let mut seen = HashSet::new();
    for engine in engines {
        if engine.name.is_empty() {
            return Err(EngineConfigError::EmptyName);
        }
        if !seen.insert(engine.name) {
            return Err(EngineConfigError::DuplicateName(engine.name.to_string()));
        }
        if !engine.url_template.contains("{query}") {
            return Err(EngineConfigError::MissingPlaceholder(engine.name.to_string()));
        }
    }
    Ok(())
}
