//! Search result records harvested from hidden-service search engines

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Fallback title when a result block carries none
pub const NO_TITLE: &str = "No Title";

/// Fallback description when a result block carries none
pub const NO_DESCRIPTION: &str = "No Description";

/// Domain placeholder for URLs without a parsable host
pub const UNKNOWN_DOMAIN: &str = "Unknown";

/// One search result extracted from an engine's result page
///
/// The domain is derived from the URL's host component at construction and
/// cannot be set independently. `alive` stays `None` unless a liveness check
/// was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub url: String,
    pub description: String,
    domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alive: Option<bool>,
}

impl ResultRecord {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let domain = derive_domain(&url);
        Self {
            title: title.into(),
            url,
            description: description.into(),
            domain,
            alive: None,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

/// Host component of a URL, or the `Unknown` placeholder
fn derive_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

/// Results of one crawl, keyed by engine name
///
/// Every active engine gets exactly one entry; engines that errored map to
/// an empty list. Record order within an engine is extraction order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    pub results: BTreeMap<String, Vec<ResultRecord>>,
}

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one engine's result set (empty on failure)
    pub fn insert(&mut self, engine: &str, records: Vec<ResultRecord>) {
        self.results.insert(engine.to_string(), records);
    }

    pub fn get(&self, engine: &str) -> Option<&[ResultRecord]> {
        self.results.get(engine).map(Vec::as_slice)
    }

    /// Total records across all engines
    pub fn total(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
