//! HTTP request handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use cotacao_types::{
    AppError, QuoteProvider, QuoteRepository, QuoteResponse, REQUEST_TIMEOUT_HEADER,
};

use crate::QuoteService;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<P: QuoteProvider, R: QuoteRepository> {
    pub service: QuoteService<P, R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::QuoteUnavailable(_) => StatusCode::REQUEST_TIMEOUT,
        };

        (status, self.0.to_string()).into_response()
    }
}

/// Reads the caller's remaining budget from the request headers.
///
/// A missing or unparsable header means the caller sent no budget.
pub fn inbound_budget(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(REQUEST_TIMEOUT_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_millis)
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Serves the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Current USD-BRL quote.
#[tracing::instrument(skip(state, headers))]
pub async fn get_quote<P: QuoteProvider, R: QuoteRepository>(
    State(state): State<Arc<AppState<P, R>>>,
    headers: HeaderMap,
) -> Result<Json<QuoteResponse>, ApiError> {
    let deadline = state.service.request_deadline(inbound_budget(&headers));
    let quote = state.service.current_quote(&deadline).await?;
    Ok(Json(quote.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_inbound_budget_parses_millis() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_TIMEOUT_HEADER, HeaderValue::from_static(" 250 "));
        assert_eq!(inbound_budget(&headers), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_inbound_budget_absent_or_garbage() {
        assert_eq!(inbound_budget(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_TIMEOUT_HEADER, HeaderValue::from_static("soon"));
        assert_eq!(inbound_budget(&headers), None);
    }
}
