//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use cotacao_types::{QuoteProvider, QuoteRepository};

use super::handlers::{self, AppState};
use crate::QuoteService;

/// HTTP Server for the quote API.
pub struct HttpServer<P: QuoteProvider, R: QuoteRepository> {
    state: Arc<AppState<P, R>>,
}

impl<P: QuoteProvider, R: QuoteRepository> HttpServer<P, R> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: QuoteService<P, R>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Returns the service shared by every request.
    pub fn service(&self) -> &QuoteService<P, R> {
        &self.state.service
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api-docs/openapi.json", get(handlers::openapi_json))
            .route("/cotacao", get(handlers::get_quote::<P, R>))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    ///
    /// Each connection is served on its own task; requests share nothing
    /// but the service (and through it the store's connection pool).
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
