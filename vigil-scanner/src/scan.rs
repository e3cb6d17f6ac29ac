//! Scan orchestrator
//!
//! One fetch, the mandatory passes in fixed order, optional deep probes,
//! then risk aggregation into a single report.

use scraper::Html;
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

use vigil_core::{score_findings, FindingCategory, ProbeStatus, ScanReport};
use vigil_tor::{HttpClient, RequestOptions};

use crate::{content, cookies, deep, headers, tls};

/// Initial page fetch timeout in seconds
const FETCH_TIMEOUT_SECS: u64 = 10;

/// Layered vulnerability scanner for one target
pub struct Scanner {
    url: String,
    detail: bool,
    client: Arc<dyn HttpClient>,
}

impl Scanner {
    /// The target URL is normalized exactly once here: a bare host gets an
    /// `http://` prefix.
    pub fn new(target: &str, detail: bool, client: Arc<dyn HttpClient>) -> Self {
        Self {
            url: normalize(target),
            detail,
            client,
        }
    }

    pub fn target(&self) -> &str {
        &self.url
    }

    /// Run the layered analysis and produce one report
    ///
    /// A failed initial fetch short-circuits into an error-only report; a
    /// failed individual pass never aborts the scan.
    pub async fn analyze(&self) -> ScanReport {
        info!(url = %self.url, "Starting analysis");
        let mut report = ScanReport::new(&self.url);

        let opts = RequestOptions::with_timeout(FETCH_TIMEOUT_SECS);
        let response = match self.client.get(&self.url, opts).await {
            Ok(response) => response,
            Err(e) => {
                error!(url = %self.url, error = %e, "Initial fetch failed");
                report.error = Some(format!("Failed to fetch page: {e}"));
                return report;
            }
        };
        info!(url = %self.url, status = response.status, "Page fetched");

        // Document-dependent findings are collected in one sync scope; the
        // parsed document is not Send and must not be held across awaits.
        let (meta, forms, scripts, invisible) = {
            let document = Html::parse_document(&response.body);
            (
                content::analyze_meta(&document),
                content::analyze_forms(&document),
                content::analyze_scripts(&document),
                content::invisible_element_findings(&document),
            )
        };

        report.record(
            FindingCategory::Headers,
            headers::analyze_headers(&response.headers),
        );
        self.run_tls_pass(&mut report).await;
        report.record(
            FindingCategory::Cookies,
            cookies::analyze_cookies(&response.cookies()),
        );
        report.record(FindingCategory::Meta, meta);
        report.record(FindingCategory::Forms, forms);
        report.record(FindingCategory::Scripts, scripts);

        if self.detail {
            info!(url = %self.url, "Running deep inspection");
            self.run_deep_passes(&mut report, invisible).await;
        }

        let verdict = score_findings(&report.findings);
        report.risk_score = verdict.score;
        report.threat_level = Some(verdict.level);

        info!(url = %self.url, threat = %verdict.level, "Scan complete");
        report
    }

    /// TLS pass: success records issuer/expiry on the report, any failure
    /// files a single `ssl` finding
    async fn run_tls_pass(&self, report: &mut ScanReport) {
        let host = Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));
        let Some(host) = host else {
            report.record(
                FindingCategory::Ssl,
                vec!["SSL check failed: no host in URL".to_string()],
            );
            return;
        };

        match tls::read_certificate(&host).await {
            Ok(summary) => {
                report.ssl_issuer = Some(summary.issuer);
                report.ssl_expiry = Some(summary.expiry);
            }
            Err(e) => {
                warn!(host = %host, error = %e, "TLS check failed");
                report.record(FindingCategory::Ssl, vec![format!("SSL check failed: {e}")]);
            }
        }
    }

    async fn run_deep_passes(&self, report: &mut ScanReport, invisible: Vec<String>) {
        let client = self.client.as_ref();

        match deep::check_redirect_behavior(client, &self.url).await {
            Ok(findings) => {
                report
                    .deep_status
                    .insert(FindingCategory::Redirect, ProbeStatus::Completed);
                // The category appears only when the chain actually looked
                // like a trap
                if !findings.is_empty() {
                    report.record(FindingCategory::Redirect, findings);
                }
            }
            Err(e) => {
                warn!(error = %e, "Redirect probe suppressed");
                report.deep_status.insert(
                    FindingCategory::Redirect,
                    ProbeStatus::Failed {
                        reason: e.to_string(),
                    },
                );
            }
        }

        let found = deep::detect_hidden_paths(client, &self.url).await;
        report
            .deep_status
            .insert(FindingCategory::HiddenPaths, ProbeStatus::Completed);
        report.record(FindingCategory::HiddenPaths, found);

        match deep::detect_honeypot(client, &self.url, invisible).await {
            Ok(red_flags) => {
                report
                    .deep_status
                    .insert(FindingCategory::Honeypot, ProbeStatus::Completed);
                report.record(FindingCategory::Honeypot, red_flags);
            }
            Err(e) => {
                warn!(error = %e, "Honeypot probe suppressed");
                report.deep_status.insert(
                    FindingCategory::Honeypot,
                    ProbeStatus::Failed {
                        reason: e.to_string(),
                    },
                );
                report.record(FindingCategory::Honeypot, Vec::new());
            }
        }
    }
}

/// Prefix `http://` when the target has no scheme
fn normalize(target: &str) -> String {
    if target.starts_with("http") {
        target.to_string()
    } else {
        format!("http://{target}")
    }
}
