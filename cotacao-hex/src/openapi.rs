//! OpenAPI document for the quote API.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use cotacao_types::QuoteResponse;
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Current USD-BRL quote
///
/// Fetches the quote upstream and records it on a best-effort basis.
#[utoipa::path(
    get,
    path = "/cotacao",
    tag = "quotes",
    params(
        ("x-request-timeout-ms" = Option<u64>, Header, description = "Caller's remaining budget in milliseconds")
    ),
    responses(
        (status = 200, description = "Current quote", body = QuoteResponse),
        (status = 408, description = "Upstream fetch failed or ran out of time", body = String, content_type = "text/plain")
    )
)]
async fn get_quote() {}

/// OpenAPI documentation for the quote API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cotacao API",
        version = "1.0.0",
        description = "USD-BRL quote relay. Every request runs under a deadline; the upstream fetch and the store insert each get a slice of it.",
        license(name = "MIT"),
    ),
    paths(health, get_quote),
    components(schemas(QuoteResponse)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "quotes", description = "Exchange rate quotes"),
    )
)]
pub struct ApiDoc;
