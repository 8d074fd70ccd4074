//! Data Transfer Objects (DTOs) for the upstream API and our endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Quote;

// ─────────────────────────────────────────────────────────────────────────────
// Upstream DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Body returned by the upstream quote API.
///
/// Only the `USDBRL` ticker is read; other tickers and fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamEnvelope {
    #[serde(rename = "USDBRL")]
    pub usd_brl: UpstreamTicker,
}

/// One ticker inside the upstream body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamTicker {
    pub bid: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Service DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request header carrying the caller's remaining budget in milliseconds.
pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// Response of `GET /cotacao`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    /// Current USD-BRL bid, as decimal text
    #[schema(example = "5.4321")]
    pub bid: String,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            bid: quote.into_bid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_envelope_ignores_extra_fields() {
        let body = r#"{
            "USDBRL": {
                "code": "USD",
                "codein": "BRL",
                "name": "Dólar Americano/Real Brasileiro",
                "high": "5.46",
                "low": "5.40",
                "bid": "5.4321",
                "ask": "5.4330",
                "timestamp": "1700000000"
            }
        }"#;

        let envelope: UpstreamEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.usd_brl.bid, "5.4321");
    }

    #[test]
    fn test_upstream_envelope_requires_ticker() {
        let result = serde_json::from_str::<UpstreamEnvelope>(r#"{"EURBRL": {"bid": "6.0"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_quote_response_shape() {
        let response = QuoteResponse::from(Quote::new("5.43"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "bid": "5.43" }));
    }
}
