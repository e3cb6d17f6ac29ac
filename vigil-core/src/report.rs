//! Scan findings and the per-target report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::risk::ThreatLevel;

/// Category a finding is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Headers,
    Ssl,
    Cookies,
    Meta,
    Forms,
    Scripts,
    Redirect,
    HiddenPaths,
    Honeypot,
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Headers => "headers",
            Self::Ssl => "ssl",
            Self::Cookies => "cookies",
            Self::Meta => "meta",
            Self::Forms => "forms",
            Self::Scripts => "scripts",
            Self::Redirect => "redirect",
            Self::HiddenPaths => "hidden_paths",
            Self::Honeypot => "honeypot",
        };
        f.write_str(s)
    }
}

/// Outcome of a best-effort deep probe pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// The pass ran to completion (its findings may still be empty)
    Completed,
    /// The pass was suppressed by a transport failure; findings withheld
    Failed { reason: String },
}

/// Report produced by one `analyze()` invocation
///
/// Mutated only by analyzer passes and the aggregator during that single
/// invocation; callers treat it as immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Normalized (scheme-prefixed) target URL
    pub url: String,
    /// When the scan started
    pub timestamp: DateTime<Utc>,
    /// Findings grouped by category, extraction order preserved per category
    pub findings: BTreeMap<FindingCategory, Vec<String>>,
    /// Certificate issuer, when the TLS pass could read one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_issuer: Option<String>,
    /// Certificate expiry (notAfter), when the TLS pass could read one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_expiry: Option<String>,
    /// Clamped risk score in [0, 100]
    pub risk_score: u32,
    /// Threat tier; absent when the initial fetch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<ThreatLevel>,
    /// Fatal fetch error; when set, no passes ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-pass outcome of the deep probes (empty unless detail mode ran)
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub deep_status: BTreeMap<FindingCategory, ProbeStatus>,
}

impl ScanReport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timestamp: Utc::now(),
            findings: BTreeMap::new(),
            ssl_issuer: None,
            ssl_expiry: None,
            risk_score: 0,
            threat_level: None,
            error: None,
            deep_status: BTreeMap::new(),
        }
    }

    /// File a pass's findings, creating the category entry even when empty
    pub fn record(&mut self, category: FindingCategory, findings: Vec<String>) {
        self.findings.insert(category, findings);
    }

    /// Total finding count across all categories
    pub fn finding_count(&self) -> usize {
        self.findings.values().map(Vec::len).sum()
    }
}
