//! # Cotacao Client SDK
//!
//! A typed Rust client for the quote relay. Every call runs under a
//! caller-supplied [`Deadline`]; the remaining budget is also sent to the
//! server so it never works past the client's own deadline.

use std::collections::HashMap;
use std::path::Path;

use cotacao_types::{Deadline, DeadlineError, Quote, REQUEST_TIMEOUT_HEADER};
use reqwest::Client;

/// Path of the quote endpoint.
pub const QUOTE_PATH: &str = "/cotacao";

/// Default name of the file the quote is written to.
pub const DEFAULT_OUTPUT: &str = "cotacao.txt";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Deadline(#[from] DeadlineError),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response has no bid")]
    MissingBid,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Formats the single line written to the output file.
pub fn format_quote_line(quote: &Quote) -> String {
    format!("Dólar: {}\n", quote.bid())
}

/// Quote relay API client.
pub struct CotacaoClient {
    base_url: String,
    http: Client,
}

impl CotacaoClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Fetches the current quote under `deadline`.
    #[tracing::instrument(skip(self, deadline), fields(base_url = %self.base_url))]
    pub async fn quote(&self, deadline: &Deadline) -> Result<Quote, ClientError> {
        let request = self
            .http
            .get(format!("{}{}", self.base_url, QUOTE_PATH))
            .header(
                REQUEST_TIMEOUT_HEADER,
                deadline.remaining().as_millis().to_string(),
            )
            .build()?;

        let body = deadline
            .try_run(async {
                let resp = self.http.execute(request).await?;
                self.handle_response(resp).await
            })
            .await?;

        let mut fields: HashMap<String, String> = serde_json::from_str(&body)?;
        let bid = fields.remove("bid").ok_or(ClientError::MissingBid)?;
        Ok(Quote::new(bid))
    }

    /// Fetches the current quote and overwrites `path` with it.
    ///
    /// Nothing is written unless the quote was fetched and decoded.
    pub async fn save_quote(
        &self,
        deadline: &Deadline,
        path: impl AsRef<Path>,
    ) -> Result<Quote, ClientError> {
        let quote = self.quote(deadline).await?;
        tokio::fs::write(path.as_ref(), format_quote_line(&quote)).await?;
        tracing::debug!(path = %path.as_ref().display(), bid = %quote.bid(), "quote saved");
        Ok(quote)
    }

    async fn handle_response(&self, resp: reqwest::Response) -> Result<String, ClientError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message: message.trim().to_string(),
            })
        }
    }
}
