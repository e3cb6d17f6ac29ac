//! Multi-engine crawl orchestrator
//!
//! Queries every active engine sequentially, isolating per-engine failures:
//! a dead engine records an empty result set and never aborts the others.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use vigil_core::{CrawlResult, ExportFormat, Exporter, SearchEngine, DEFAULT_SEARCH_ENGINES};

use crate::client::{HttpClient, RequestOptions};
use crate::extract::extractor_for;
use crate::liveness;

/// Producer name stamped on exported crawl results
pub const PRODUCER: &str = "crawler";

/// Per-engine request timeout in seconds
const ENGINE_TIMEOUT_SECS: u64 = 15;

/// Crawl orchestrator configuration
pub struct CrawlConfig {
    /// Engines to query; defaults to the built-in registry
    pub engines: &'static [SearchEngine],
    /// Export results after the crawl in this format
    pub export_format: Option<ExportFormat>,
    /// Directory exported files are written to
    pub export_path: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            engines: DEFAULT_SEARCH_ENGINES,
            export_format: None,
            export_path: PathBuf::from("."),
        }
    }
}

/// Drives the engine registry, extractors and liveness checker for one term
pub struct Crawler {
    client: Arc<dyn HttpClient>,
    config: CrawlConfig,
    exporter: Option<Arc<dyn Exporter>>,
}

impl Crawler {
    pub fn new(client: Arc<dyn HttpClient>, config: CrawlConfig) -> Self {
        Self {
            client,
            config,
            exporter: None,
        }
    }

    /// Attach the export collaborator invoked after each crawl
    pub fn with_exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Search every active engine for `term`
    ///
    /// When `check_alive` is set, each non-empty result set is annotated
    /// with reachability before being stored. Inactive engines are never
    /// queried and get no entry.
    pub async fn crawl(&self, term: &str, check_alive: bool) -> CrawlResult {
        let mut all_results = CrawlResult::new();

        for engine in self.config.engines.iter().filter(|e| e.active) {
            let url = engine.build_url(term);
            info!(engine = engine.name, url = %url, "Fetching search results");

            let opts = RequestOptions::with_timeout(ENGINE_TIMEOUT_SECS);
            let response = match self.client.get(&url, opts).await {
                Ok(response) => response,
                Err(e) => {
                    error!(engine = engine.name, error = %e, "Engine request failed");
                    all_results.insert(engine.name, Vec::new());
                    continue;
                }
            };

            if !response.is_success() {
                warn!(
                    engine = engine.name,
                    status = response.status,
                    "Engine returned non-success status"
                );
                all_results.insert(engine.name, Vec::new());
                continue;
            }

            let mut records = extractor_for(engine.extractor).extract(&response.body);

            if check_alive && !records.is_empty() {
                info!(
                    engine = engine.name,
                    count = records.len(),
                    "Checking result liveness"
                );
                records = liveness::check_all(self.client.as_ref(), records).await;
            }

            info!(
                engine = engine.name,
                count = records.len(),
                "Engine crawl finished"
            );
            all_results.insert(engine.name, records);
        }

        if let (Some(format), Some(exporter)) = (self.config.export_format, &self.exporter) {
            exporter.export(&all_results, format, &self.config.export_path, PRODUCER);
        }

        all_results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TorClient;
    use crate::proxy::TorConfig;
    use vigil_core::ExtractorKind;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TORDEX_PAGE: &str = r##"
        <html><body>
            <div class="result">
                <h5>First</h5>
                <h6><a href="#">http://first1234567890abcde.onion</a></h6>
                <p>one</p>
            </div>
            <div class="result">
                <h5>Second</h5>
                <h6><a href="#">http://second123456789abcde.onion</a></h6>
                <p>two</p>
            </div>
        </body></html>
    "##;

    fn test_engines(base: &str) -> &'static [SearchEngine] {
        let engines = vec![
            SearchEngine {
                name: "Alpha",
                url_template: Box::leak(
                    format!("{base}/alpha/search?q={{query}}").into_boxed_str(),
                ),
                extractor: ExtractorKind::Tordex,
                active: true,
            },
            SearchEngine {
                name: "Beta",
                url_template: Box::leak(format!("{base}/beta/search?q={{query}}").into_boxed_str()),
                extractor: ExtractorKind::Tordex,
                active: true,
            },
            SearchEngine {
                name: "Dormant",
                url_template: Box::leak(
                    format!("{base}/dormant/search?q={{query}}").into_boxed_str(),
                ),
                extractor: ExtractorKind::Tordex,
                active: false,
            },
        ];
        Box::leak(engines.into_boxed_slice())
    }

    #[tokio::test]
    async fn test_engine_failure_is_isolated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alpha/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TORDEX_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/beta/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = Arc::new(TorClient::new(&TorConfig::direct()).unwrap());
        let config = CrawlConfig {
            engines: test_engines(&server.uri()),
            ..CrawlConfig::default()
        };
        let crawler = Crawler::new(client, config);

        let results = crawler.crawl("drugs", false).await;

        assert_eq!(results.get("Alpha").unwrap().len(), 2);
        assert_eq!(results.get("Beta").unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_inactive_engines_are_never_queried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alpha/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TORDEX_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/beta/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TORDEX_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dormant/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TORDEX_PAGE))
            .expect(0)
            .mount(&server)
            .await;

        let client = Arc::new(TorClient::new(&TorConfig::direct()).unwrap());
        let config = CrawlConfig {
            engines: test_engines(&server.uri()),
            ..CrawlConfig::default()
        };
        let crawler = Crawler::new(client, config);

        let results = crawler.crawl("forums", false).await;

        assert!(results.get("Dormant").is_none());
        assert_eq!(results.results.len(), 2);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_search_term_is_percent_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alpha/search"))
            .and(query_param("q", "two words"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TORDEX_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/beta/search"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = Arc::new(TorClient::new(&TorConfig::direct()).unwrap());
        let config = CrawlConfig {
            engines: test_engines(&server.uri()),
            ..CrawlConfig::default()
        };
        let crawler = Crawler::new(client, config);

        let results = crawler.crawl("two words", false).await;
        assert_eq!(results.get("Alpha").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_check_alive_annotates_results() {
        let server = MockServer::start().await;
        // Result URLs point at the mock server so probes can reach them
        let page = format!(
            r##"<div class="result">
                <h5>Probe</h5>
                <h6><a href="#">{}/probe</a></h6>
                <p>target</p>
            </div>"##,
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/alpha/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/beta/search"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/probe"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = Arc::new(TorClient::new(&TorConfig::direct()).unwrap());
        let config = CrawlConfig {
            engines: test_engines(&server.uri()),
            ..CrawlConfig::default()
        };
        let crawler = Crawler::new(client, config);

        let results = crawler.crawl("probe", true).await;

        let alpha = results.get("Alpha").unwrap();
        assert_eq!(alpha.len(), 1);
        assert_eq!(alpha[0].alive, Some(true));
        // Failed engines are stored without any liveness pass
        assert!(results.get("Beta").unwrap().is_empty());
    }
}
