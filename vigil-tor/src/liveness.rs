//! Bounded-concurrency liveness checker
//!
//! Probes every record's URL through a fixed-size worker pool; pending
//! probes beyond the ceiling queue rather than spawn unboundedly.

use futures::stream::{self, StreamExt};
use tracing::debug;

use vigil_core::ResultRecord;

use crate::client::{HttpClient, RequestOptions};

/// Worker ceiling for concurrent probes
pub const MAX_CONCURRENT_PROBES: usize = 20;

/// Per-probe timeout in seconds
const PROBE_TIMEOUT_SECS: u64 = 10;

/// Probe one URL; alive means the GET completed with a status below 500
///
/// Redirects are followed; transport errors and timeouts count as dead.
pub async fn is_alive(client: &dyn HttpClient, url: &str) -> bool {
    let opts = RequestOptions::with_timeout(PROBE_TIMEOUT_SECS);
    match client.get(url, opts).await {
        Ok(response) => response.status < 500,
        Err(_) => false,
    }
}

/// Annotate every record with reachability
///
/// Every input record appears exactly once in the output with `alive` set;
/// output order follows probe completion, not input order.
pub async fn check_all(client: &dyn HttpClient, records: Vec<ResultRecord>) -> Vec<ResultRecord> {
    stream::iter(records)
        .map(|mut record| async move {
            let alive = is_alive(client, &record.url).await;
            debug!(url = %record.url, alive, "Probed result URL");
            record.alive = Some(alive);
            record
        })
        .buffer_unordered(MAX_CONCURRENT_PROBES)
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TorClient;
    use crate::proxy::TorConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_target(status: u16, route: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_status_below_500_is_alive() {
        let server = mock_target(404, "/missing").await;
        let client = TorClient::new(&TorConfig::direct()).unwrap();

        assert!(is_alive(&client, &format!("{}/missing", server.uri())).await);
    }

    #[tokio::test]
    async fn test_server_error_is_dead() {
        let server = mock_target(503, "/down").await;
        let client = TorClient::new(&TorConfig::direct()).unwrap();

        assert!(!is_alive(&client, &format!("{}/down", server.uri())).await);
    }

    #[tokio::test]
    async fn test_transport_failure_is_dead() {
        let client = TorClient::new(&TorConfig::direct()).unwrap();
        // Nothing listens on this port
        assert!(!is_alive(&client, "http://127.0.0.1:1/").await);
    }

    #[tokio::test]
    async fn test_check_all_annotates_every_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/live"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dead"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = TorClient::new(&TorConfig::direct()).unwrap();
        let records = vec![
            ResultRecord::new("live", format!("{}/live", server.uri()), "up"),
            ResultRecord::new("dead", format!("{}/dead", server.uri()), "down"),
            ResultRecord::new("gone", "http://127.0.0.1:1/", "unreachable"),
        ];

        let checked = check_all(&client, records).await;

        assert_eq!(checked.len(), 3);
        assert!(checked.iter().all(|r| r.alive.is_some()));
        for record in &checked {
            let expected = record.title == "live";
            assert_eq!(record.alive, Some(expected), "record {}", record.title);
        }
    }
}
