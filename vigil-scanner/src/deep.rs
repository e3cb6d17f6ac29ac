//! Deep-probe passes: redirect behavior, hidden paths, honeypot heuristics
//!
//! All three issue additional requests against the target and are
//! best-effort: a transport failure suppresses the failing pass's findings
//! and is reported through the pass status, never as an error to the
//! caller.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use vigil_tor::{HttpClient, RequestOptions, TorError};

/// Hop ceiling for manual redirect following
const MAX_REDIRECT_HOPS: usize = 10;

/// Distinct redirect targets beyond which the chain looks like a trap
const REDIRECT_TRAP_THRESHOLD: usize = 5;

/// Sensitive paths probed relative to the target
pub const HIDDEN_PATHS: &[&str] = &["/.git", "/.env", "/admin", "/config", "/backup.zip"];

/// Timeout in seconds for redirect and honeypot probes
const DEEP_TIMEOUT_SECS: u64 = 10;

/// Shorter timeout in seconds for the hidden-path sweep
const PATH_TIMEOUT_SECS: u64 = 5;

/// Follow `Location` headers manually and flag suspiciously long chains
///
/// Stops on a missing or repeated target; more than
/// `REDIRECT_TRAP_THRESHOLD` distinct targets yields the single trap
/// finding.
pub async fn check_redirect_behavior(
    client: &dyn HttpClient,
    url: &str,
) -> Result<Vec<String>, TorError> {
    let opts = RequestOptions::with_timeout(DEEP_TIMEOUT_SECS).no_redirects();

    let mut seen: HashSet<String> = HashSet::new();
    let mut current = url.to_string();

    for _ in 0..MAX_REDIRECT_HOPS {
        let response = client.get(&current, opts).await?;
        let Some(location) = response.header("location").map(str::to_string) else {
            break;
        };
        if seen.contains(&location) {
            break;
        }

        // Location may be relative; resolve against the page it came from
        let next = match Url::parse(&current).and_then(|base| base.join(&location)) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => break,
        };
        seen.insert(location);
        current = next;
    }

    debug!(distinct = seen.len(), "Redirect chain finished");
    if seen.len() > REDIRECT_TRAP_THRESHOLD {
        Ok(vec![
            "Multiple chained redirects (possible trap)".to_string()
        ])
    } else {
        Ok(Vec::new())
    }
}

/// Probe the fixed list of sensitive paths; 200 responses become findings
///
/// Individual request failures are skipped, so the sweep itself never
/// fails.
pub async fn detect_hidden_paths(client: &dyn HttpClient, url: &str) -> Vec<String> {
    let opts = RequestOptions::with_timeout(PATH_TIMEOUT_SECS);

    let mut found = Vec::new();
    for path in HIDDEN_PATHS {
        let full_url = match Url::parse(url).and_then(|base| base.join(path)) {
            Ok(u) => u.to_string(),
            Err(_) => continue,
        };
        match client.get(&full_url, opts).await {
            Ok(response) if response.status == 200 => found.push((*path).to_string()),
            _ => {}
        }
    }
    found
}

/// Fetch the target with two unrelated query strings and compare bodies
///
/// Identical trimmed bodies are one finding. `invisible` carries the
/// invisible-element findings computed from the originally fetched
/// document; they ride along here because a transport failure withholds
/// all of this pass's findings.
pub async fn detect_honeypot(
    client: &dyn HttpClient,
    url: &str,
    invisible: Vec<String>,
) -> Result<Vec<String>, TorError> {
    let opts = RequestOptions::with_timeout(DEEP_TIMEOUT_SECS);

    let first = client.get(&format!("{url}?q=test1"), opts).await?;
    let second = client.get(&format!("{url}?q=test2"), opts).await?;

    let mut red_flags = Vec::new();
    if body_digest(&first.body) == body_digest(&second.body) {
        red_flags.push("Identical response for unrelated queries".to_string());
    }
    red_flags.extend(invisible);
    Ok(red_flags)
}

/// Digest of a trimmed response body
fn body_digest(body: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(body.trim().as_bytes());
    hasher.finalize().into()
}
