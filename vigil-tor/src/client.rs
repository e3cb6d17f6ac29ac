//! HTTP client port
//!
//! The transport contract both orchestrators depend on: one GET with an
//! explicit timeout and a redirect policy. Swappable for anything that can
//! satisfy it, proxied or not.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, SET_COOKIE};
use std::time::Duration;

use crate::proxy::{build_client, TorConfig, TorError};

/// Options for a single request
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    pub timeout: Duration,
    pub follow_redirects: bool,
}

impl RequestOptions {
    pub fn with_timeout(secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(secs),
            follow_redirects: true,
        }
    }

    pub fn no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }
}

/// A fetched HTTP response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// A response header as text, when present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Cookies set by the response, parsed from `Set-Cookie` headers
    pub fn cookies(&self) -> Vec<SetCookie> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(SetCookie::parse)
            .collect()
    }
}

/// One cookie from a `Set-Cookie` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
}

impl SetCookie {
    /// Parse a raw `Set-Cookie` value; attribute matching is
    /// case-insensitive
    pub fn parse(raw: &str) -> Self {
        let mut segments = raw.split(';').map(str::trim);
        let name = segments
            .next()
            .unwrap_or("")
            .split('=')
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        let mut secure = false;
        let mut http_only = false;
        for attr in segments {
            if attr.eq_ignore_ascii_case("secure") {
                secure = true;
            } else if attr.eq_ignore_ascii_case("httponly") {
                http_only = true;
            }
        }

        Self {
            name,
            secure,
            http_only,
        }
    }
}

/// Transport contract both orchestrators depend on
///
/// Failures surface as errors, never as panics; there are no retries.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, opts: RequestOptions) -> Result<FetchResponse, TorError>;
}

/// Tor-routed `HttpClient` backed by reqwest
///
/// Holds one redirect-following and one redirect-suppressing client, since
/// reqwest fixes the redirect policy at build time.
pub struct TorClient {
    following: reqwest::Client,
    manual: reqwest::Client,
}

impl TorClient {
    pub fn new(config: &TorConfig) -> Result<Self, TorError> {
        Ok(Self {
            following: build_client(config, true)?,
            manual: build_client(config, false)?,
        })
    }
}

#[async_trait]
impl HttpClient for TorClient {
    async fn get(&self, url: &str, opts: RequestOptions) -> Result<FetchResponse, TorError> {
        let client = if opts.follow_redirects {
            &self.following
        } else {
            &self.manual
        };

        let response = client.get(url).timeout(opts.timeout).send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}
