// crates/forge-server/src/llm/http_client.rs
// Shared HTTP execution for LLM providers (single attempt, no retries)

use anyhow::{Result, anyhow};
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Default request timeout when creating from an existing client
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
/// Default connect timeout when creating from an existing client
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
/// Error bodies longer than this are truncated in error messages
const MAX_ERROR_BODY_CHARS: usize = 500;

/// HTTP wrapper shared by LLM providers
pub struct LlmHttpClient {
    client: Client,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl LlmHttpClient {
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            request_timeout,
            connect_timeout,
        }
    }

    /// Create from an existing reqwest::Client
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Execute one HTTP request built by `build_request`.
    ///
    /// Returns the response body as text on a 2xx status. Every failure,
    /// transient or not, is returned to the caller as-is.
    pub async fn execute_request<F>(
        &self,
        request_id: &str,
        body: String,
        build_request: F,
    ) -> Result<String>
    where
        F: FnOnce(&Client, String) -> reqwest::RequestBuilder,
    {
        let response = build_request(&self.client, body)
            .send()
            .await
            .map_err(|e| anyhow!("Request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let error_body = truncate(&error_body, MAX_ERROR_BODY_CHARS);
            warn!(
                request_id = %request_id,
                status = %status,
                error = %error_body,
                "LLM API returned error status"
            );
            return Err(anyhow!("API error {}: {}", status, error_body));
        }

        Ok(response.text().await?)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_client_creation() {
        let client = LlmHttpClient::new(Duration::from_secs(10), Duration::from_secs(5));
        assert_eq!(client.request_timeout, Duration::from_secs(10));
        assert_eq!(client.connect_timeout, Duration::from_secs(5));
        let _inner = client.inner();
    }

    #[test]
    fn test_from_client() {
        let client = LlmHttpClient::from_client(Client::new());
        assert_eq!(
            client.request_timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(
            client.connect_timeout,
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    // ========================================================================
    // Execution
    // ========================================================================

    #[tokio::test]
    async fn test_execute_request_connection_refused() {
        let client = LlmHttpClient::new(Duration::from_millis(500), Duration::from_millis(200));
        let result = client
            .execute_request("test", "{}".into(), |c, body| {
                c.post("http://127.0.0.1:1").body(body)
            })
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Request failed"));
    }

    #[tokio::test]
    async fn test_execute_request_success_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"fine\":true}"))
            .mount(&server)
            .await;

        let client = LlmHttpClient::from_client(Client::new());
        let url = format!("{}/ok", server.uri());
        let body = client
            .execute_request("test", "{}".into(), |c, body| c.post(&url).body(body))
            .await
            .unwrap();
        assert_eq!(body, "{\"fine\":true}");
    }

    #[tokio::test]
    async fn test_execute_request_server_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmHttpClient::from_client(Client::new());
        let url = format!("{}/busy", server.uri());
        let err = client
            .execute_request("test", "{}".into(), |c, body| c.post(&url).body(body))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("503"), "got: {}", err);
        assert!(err.contains("overloaded"), "got: {}", err);
    }
}
