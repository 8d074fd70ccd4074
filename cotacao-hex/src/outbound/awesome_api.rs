//! Upstream quote API adapter (AwesomeAPI `json/last/USD-BRL`).

use async_trait::async_trait;
use tracing::{debug, instrument};

use cotacao_types::{Deadline, FetchError, Quote, QuoteProvider, UpstreamEnvelope};

pub const DEFAULT_UPSTREAM_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";

/// Fetches the USD-BRL quote over HTTP.
///
/// One `reqwest::Client` (and its connection pool) is reused across calls.
#[derive(Clone)]
pub struct AwesomeApiProvider {
    http: reqwest::Client,
    url: String,
}

impl AwesomeApiProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_envelope(&self) -> Result<UpstreamEnvelope, FetchError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl Default for AwesomeApiProvider {
    fn default() -> Self {
        Self::new(DEFAULT_UPSTREAM_URL)
    }
}

#[async_trait]
impl QuoteProvider for AwesomeApiProvider {
    #[instrument(
        skip(self, deadline),
        fields(url = %self.url, budget_ms = deadline.budget().as_millis() as u64),
        level = "debug"
    )]
    async fn fetch(&self, deadline: &Deadline) -> Result<Quote, FetchError> {
        let envelope = deadline.try_run(self.fetch_envelope()).await?;

        let quote = Quote::new(envelope.usd_brl.bid);

        debug!(bid = %quote.bid(), "upstream quote fetched");
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{Json, Router, http::StatusCode, routing::get};
    use cotacao_types::DeadlineError;
    use serde_json::json;

    use super::*;

    const PATH: &str = "/json/last/USD-BRL";

    /// Serves `router` on an ephemeral local port and returns the quote URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}{}", addr, PATH)
    }

    fn generous() -> Deadline {
        Deadline::after(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_fetch_extracts_bid() {
        let url = serve(Router::new().route(
            PATH,
            get(|| async {
                Json(json!({
                    "USDBRL": { "code": "USD", "codein": "BRL", "bid": "5.4321", "ask": "5.4330" }
                }))
            }),
        ))
        .await;

        let quote = AwesomeApiProvider::new(url)
            .fetch(&generous())
            .await
            .unwrap();

        assert_eq!(quote.bid(), "5.4321");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let url = serve(Router::new().route(
            PATH,
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
        ))
        .await;

        let result = AwesomeApiProvider::new(url).fetch(&generous()).await;

        assert!(matches!(result, Err(FetchError::Status(503))));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let url = serve(Router::new().route(PATH, get(|| async { "not json" }))).await;

        let result = AwesomeApiProvider::new(url).fetch(&generous()).await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_missing_ticker() {
        let url = serve(Router::new().route(
            PATH,
            get(|| async { Json(json!({ "EURBRL": { "bid": "6.01" } })) }),
        ))
        .await;

        let result = AwesomeApiProvider::new(url).fetch(&generous()).await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_passes_empty_bid_through() {
        let url = serve(Router::new().route(
            PATH,
            get(|| async { Json(json!({ "USDBRL": { "bid": "" } })) }),
        ))
        .await;

        let quote = AwesomeApiProvider::new(url)
            .fetch(&generous())
            .await
            .unwrap();

        assert_eq!(quote.bid(), "");
    }

    #[tokio::test]
    async fn test_fetch_slow_upstream_times_out() {
        let url = serve(Router::new().route(
            PATH,
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(json!({ "USDBRL": { "bid": "5.43" } }))
            }),
        ))
        .await;

        let started = std::time::Instant::now();
        let deadline = Deadline::after(Duration::from_millis(50));
        let result = AwesomeApiProvider::new(url).fetch(&deadline).await;

        assert!(matches!(
            result,
            Err(FetchError::Deadline(DeadlineError::Exceeded { .. }))
        ));
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_upstream() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = AwesomeApiProvider::new(format!("http://{}{}", addr, PATH))
            .fetch(&generous())
            .await;

        assert!(matches!(result, Err(FetchError::Request(_))));
    }
}
