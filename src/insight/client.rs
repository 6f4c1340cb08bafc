use super::request::InsightRequest;
use crate::config::InsightConfig;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("insight service is not configured (set insight.endpoint)")]
    NotConfigured,
    #[error("invalid insight configuration: {0}")]
    InvalidConfig(String),
    #[error("insight request timed out after {0:?}")]
    Timeout(Duration),
    #[error("insight request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("insight service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed insight response: {0}")]
    MalformedResponse(String),
}

/// Free-text (markdown) summary produced by the service
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub text: String,
    pub revision: u64,
}

#[derive(Debug, Deserialize)]
struct InsightResponse {
    insight: Option<String>,
}

/// Client for the external insight service. Makes exactly one attempt per
/// request; retrying is left to the caller.
#[derive(Debug, Clone)]
pub struct InsightClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    timeout: Duration,
}

impl InsightClient {
    pub fn new(endpoint: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token,
            timeout,
        }
    }

    /// Build a client from config, reading the bearer token from the
    /// configured environment variable.
    pub fn from_config(config: &InsightConfig) -> Result<Self, InsightError> {
        let endpoint = config.endpoint.clone().ok_or(InsightError::NotConfigured)?;
        let timeout = config
            .timeout_duration()
            .map_err(|e| InsightError::InvalidConfig(format!("{:#}", e)))?;
        let token = crate::credentials::get_token_from_env(&config.token_env);
        Ok(Self::new(endpoint, token, timeout))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn request(&self, request: &InsightRequest) -> Result<Insight, InsightError> {
        debug!(endpoint = %self.endpoint, revision = request.revision, "requesting insight");

        let mut builder = self
            .http
            .post(&self.endpoint)
            .header("User-Agent", "wp-rank")
            .json(request);
        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }

        let send = async {
            let response = builder.send().await.map_err(InsightError::Transport)?;
            let status = response.status();
            let body = response.text().await.map_err(InsightError::Transport)?;
            Ok::<_, InsightError>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| InsightError::Timeout(self.timeout))??;

        if !status.is_success() {
            return Err(InsightError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let parsed: InsightResponse = serde_json::from_str(&body)
            .map_err(|e| InsightError::MalformedResponse(e.to_string()))?;

        match parsed.insight {
            Some(text) if !text.trim().is_empty() => Ok(Insight {
                text,
                revision: request.revision,
            }),
            _ => Err(InsightError::MalformedResponse(
                "missing 'insight' field".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{compute, Scores, WeightVector};
    use crate::store::types::{Employee, EmployeeId};
    use chrono::Utc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn sample_request() -> InsightRequest {
        let employees = vec![Employee {
            id: EmployeeId(1),
            name: "Sari".to_string(),
            scores: Scores::splat(8),
            created_at: Utc::now(),
        }];
        let ranking = compute(&employees, &WeightVector::default());
        InsightRequest::from_ranking(&ranking, "English", 4).unwrap()
    }

    /// Serve one canned HTTP response and hand back the raw request
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        crate::install_crypto_provider();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/insight", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_successful_insight() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", r#"{"insight":"**Sari** leads."}"#).await;
        let client = InsightClient::new(url, Some("secret".to_string()), Duration::from_secs(5));

        let insight = client.request(&sample_request()).await.unwrap();
        assert_eq!(insight.text, "**Sari** leads.");
        assert_eq!(insight.revision, 4);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /insight"));
        assert!(raw.to_lowercase().contains("authorization: bearer secret"));
        assert!(raw.contains("\"prompt\""));
    }

    #[tokio::test]
    async fn test_error_status() {
        let (url, server) =
            serve_once("HTTP/1.1 500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let client = InsightClient::new(url, None, Duration::from_secs(5));

        let err = client.request(&sample_request()).await.unwrap_err();
        match err {
            InsightError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_insight_field() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", r#"{"other":"x"}"#).await;
        let client = InsightClient::new(url, None, Duration::from_secs(5));

        let err = client.request(&sample_request()).await.unwrap_err();
        assert!(matches!(err, InsightError::MalformedResponse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        crate::install_crypto_provider();
        // Bind then drop to get a port nobody is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = InsightClient::new(format!("http://{}/", addr), None, Duration::from_secs(5));
        let err = client.request(&sample_request()).await.unwrap_err();
        assert!(matches!(err, InsightError::Transport(_)));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        crate::install_crypto_provider();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/insight", listener.local_addr().unwrap());

        // Accept and hold the connection without ever answering
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let client = InsightClient::new(url, None, Duration::from_millis(100));
        let err = client.request(&sample_request()).await.unwrap_err();
        assert!(matches!(err, InsightError::Timeout(d) if d == Duration::from_millis(100)));
        server.abort();
    }

    #[test]
    fn test_from_config_rejects_bad_timeout() {
        let config = InsightConfig {
            endpoint: Some("https://example.com/insight".to_string()),
            timeout: "whenever".to_string(),
            ..InsightConfig::default()
        };
        assert!(matches!(
            InsightClient::from_config(&config),
            Err(InsightError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = InsightConfig::default();
        assert!(matches!(
            InsightClient::from_config(&config),
            Err(InsightError::NotConfigured)
        ));
    }

    #[test]
    fn test_from_config() {
        crate::install_crypto_provider();
        let config = InsightConfig {
            endpoint: Some("https://example.com/insight".to_string()),
            timeout: "3s".to_string(),
            ..InsightConfig::default()
        };
        let client = InsightClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "https://example.com/insight");
        assert_eq!(client.timeout, Duration::from_secs(3));
    }
}
