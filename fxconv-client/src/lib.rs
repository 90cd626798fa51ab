//! # Fxconv Client
//!
//! A typed client for the OpenExchangeRates API, implementing the
//! `RateProvider` port. Every request is a single attempt bounded by a
//! timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use fxconv_types::{CurrencyTable, ProviderError, RateProvider, RateSnapshot, normalize_code};

pub const DEFAULT_BASE_URL: &str = "https://openexchangerates.org/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest slice of an error body echoed back to the user.
const BODY_EXCERPT: usize = 200;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// OpenExchangeRates API client.
pub struct OpenExchangeRatesClient {
    base_url: String,
    app_id: String,
    timeout: Duration,
    http: Client,
}

impl OpenExchangeRatesClient {
    /// Creates a new client against the public API.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: app_id.into(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Points the client at another deployment of the API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        tracing::debug!(endpoint = %self.endpoint(path), "requesting rate provider");
        let resp = self
            .http
            .get(self.endpoint(path))
            .query(query)
            .query(&[("app_id", self.app_id.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            // The API reports failures as {"error": true, "message": ..., "description": ...}
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("description")
                        .or_else(|| v.get("message"))
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or_else(|| body.chars().take(BODY_EXCERPT).collect());
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn provider_error(&self, err: ClientError) -> ProviderError {
        match err {
            ClientError::Http(e) if e.is_timeout() => ProviderError::Timeout(self.timeout),
            ClientError::Http(e) if e.is_decode() => ProviderError::InvalidResponse(e.to_string()),
            ClientError::Http(e) => ProviderError::Unavailable(e.to_string()),
            ClientError::Api { status, message } => {
                ProviderError::Unavailable(format!("HTTP {}: {}", status, message))
            }
            ClientError::Json(e) => ProviderError::InvalidResponse(e.to_string()),
        }
    }
}

#[async_trait]
impl RateProvider for OpenExchangeRatesClient {
    async fn fetch_currency_table(&self) -> Result<CurrencyTable, ProviderError> {
        let table: CurrencyTable = self
            .get("currencies.json", &[])
            .await
            .map_err(|e| self.provider_error(e))?;
        tracing::info!(currencies = table.len(), "fetched currency table");
        Ok(table)
    }

    async fn fetch_latest_rates(&self, pivot: &str) -> Result<RateSnapshot, ProviderError> {
        let pivot = normalize_code(pivot);
        let mut snapshot: RateSnapshot = self
            .get("latest.json", &[("base", pivot.as_str())])
            .await
            .map_err(|e| self.provider_error(e))?;

        if normalize_code(&snapshot.base) != pivot {
            return Err(ProviderError::InvalidResponse(format!(
                "rates quoted against {} instead of {}",
                snapshot.base, pivot
            )));
        }
        snapshot.base = pivot.clone();
        snapshot.rates.entry(pivot).or_insert(1.0);

        tracing::info!(
            rates = snapshot.rates.len(),
            timestamp = snapshot.timestamp,
            "fetched latest rates"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves a single canned HTTP response on a local port and returns
    /// the base URL plus a handle yielding the raw request text.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
        delay: Duration,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            tokio::time::sleep(delay).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_client_creation() {
        let client = OpenExchangeRatesClient::new("key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = OpenExchangeRatesClient::new("key").with_base_url("http://localhost:3000/");
        assert_eq!(client.endpoint("latest.json"), "http://localhost:3000/latest.json");
    }

    #[tokio::test]
    async fn test_fetch_latest_rates() {
        let (url, request) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"disclaimer":"x","license":"y","timestamp":1700000000,"base":"USD","rates":{"EUR":0.92}}"#,
            Duration::ZERO,
        )
        .await;
        let client = OpenExchangeRatesClient::new("secret").with_base_url(url);

        let snapshot = client.fetch_latest_rates("usd").await.unwrap();
        assert_eq!(snapshot.timestamp, 1_700_000_000);
        assert_eq!(snapshot.rates.get("EUR"), Some(&0.92));
        assert_eq!(snapshot.rates.get("USD"), Some(&1.0));

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /latest.json?base=USD&app_id=secret "));
    }

    #[tokio::test]
    async fn test_fetch_currency_table() {
        let (url, _) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"EUR":"Euro","USD":"United States Dollar"}"#,
            Duration::ZERO,
        )
        .await;
        let client = OpenExchangeRatesClient::new("secret").with_base_url(url);

        let table = client.fetch_currency_table().await.unwrap();
        assert_eq!(table.name("EUR"), Some("Euro"));
    }

    #[tokio::test]
    async fn test_api_error_is_unavailable() {
        let (url, _) = serve_once(
            "HTTP/1.1 401 Unauthorized",
            r#"{"error":true,"status":401,"message":"invalid_app_id","description":"Invalid App ID provided."}"#,
            Duration::ZERO,
        )
        .await;
        let client = OpenExchangeRatesClient::new("bad").with_base_url(url);

        let err = client.fetch_currency_table().await.unwrap_err();
        assert!(
            matches!(err, ProviderError::Unavailable(ref msg) if msg == "HTTP 401: Invalid App ID provided."),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let (url, _) = serve_once("HTTP/1.1 200 OK", "<html>oops</html>", Duration::ZERO).await;
        let client = OpenExchangeRatesClient::new("key").with_base_url(url);

        let err = client.fetch_latest_rates("USD").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_wrong_pivot_rejected() {
        let (url, _) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"timestamp":1,"base":"EUR","rates":{"USD":1.08}}"#,
            Duration::ZERO,
        )
        .await;
        let client = OpenExchangeRatesClient::new("key").with_base_url(url);

        let err = client.fetch_latest_rates("USD").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let (url, _) = serve_once("HTTP/1.1 200 OK", "{}", Duration::from_secs(5)).await;
        let client = OpenExchangeRatesClient::new("key")
            .with_base_url(url)
            .with_timeout(Duration::from_millis(200));

        let err = client.fetch_currency_table().await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(d) if d == Duration::from_millis(200)));
    }
}
