//! Tor SOCKS5h proxy client
//!
//! Creates HTTP clients that route through Tor for .onion access.

use reqwest::{redirect, Client, Proxy};
use std::time::Duration;
use thiserror::Error;

/// Transport configuration
#[derive(Debug, Clone)]
pub struct TorConfig {
    /// SOCKS5 proxy address; `None` builds a direct client (clearnet
    /// targets, tests)
    pub socks_addr: Option<String>,
    /// Default request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TorConfig {
    fn default() -> Self {
        Self {
            socks_addr: Some("socks5h://127.0.0.1:9050".to_string()),
            timeout_secs: 15,
        }
    }
}

impl TorConfig {
    /// Configuration for a direct (proxyless) client
    pub fn direct() -> Self {
        Self {
            socks_addr: None,
            ..Self::default()
        }
    }
}

/// Errors from the transport layer
#[derive(Debug, Error)]
pub enum TorError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// User agents for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:137.0) Gecko/20100101 Firefox/137.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.7; rv:137.0) Gecko/20100101 Firefox/137.0",
];

/// Get a random user agent
pub fn random_user_agent() -> &'static str {
    use rand::Rng;
    let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Build an HTTP client for the given transport configuration
///
/// The redirect policy is fixed at build time, so callers that need both
/// behaviors hold two clients.
pub fn build_client(config: &TorConfig, follow_redirects: bool) -> Result<Client, TorError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(random_user_agent())
        .danger_accept_invalid_certs(true); // Many .onion sites have self-signed certs

    builder = if follow_redirects {
        builder.redirect(redirect::Policy::limited(10))
    } else {
        builder.redirect(redirect::Policy::none())
    };

    if let Some(addr) = &config.socks_addr {
        let proxy = Proxy::all(addr).map_err(|e| TorError::ClientBuild(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| TorError::ClientBuild(e.to_string()))
}

/// Check if the Tor proxy is reachable
pub async fn check_tor_connection(config: &TorConfig) -> Result<bool, TorError> {
    let client = build_client(config, true)?;

    // Try to reach a known .onion address (Tor Project's)
    let result = client
        .get("http://2gzyxa5ihm7nsggfxnu52rck2vv4rvmdlkiu3ber7fzs2xqxczfebsid.onion/")
        .send()
        .await;

    match result {
        Ok(resp) => Ok(resp.status().is_success() || resp.status().is_redirection()),
        Err(_) => Ok(false),
    }
}
