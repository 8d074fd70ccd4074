//! # Cotacao Server
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter and the upstream adapter
//! - Create the quote service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cotacao_hex::{QuoteService, inbound::HttpServer, outbound::AwesomeApiProvider};
use cotacao_repo::build_repo;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("cotacao-server"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize OpenTelemetry tracing when a collector is configured
    let (otel_tracer, otel_provider) = if config.otel_enabled {
        let (tracer, provider) = init_tracer()?;
        (Some(tracer), Some(provider))
    } else {
        (None, None)
    };
    let telemetry = otel_tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cotacao_app=debug,cotacao_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting quote server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);
    tracing::info!(
        upstream = %config.upstream_url,
        request_ms = config.budgets.request.as_millis() as u64,
        upstream_ms = config.budgets.upstream.as_millis() as u64,
        store_ms = config.budgets.store.as_millis() as u64,
        "Deadline budgets"
    );

    // Build repository (pool connects on first use)
    let repo = build_repo(&config.database_url).await?;
    if config.create_schema {
        repo.create_schema().await?;
        tracing::info!("Ensured table cotacoes exists");
    }

    // Create the quote service
    let provider = AwesomeApiProvider::new(config.upstream_url.clone());
    let service = QuoteService::with_budgets(provider, repo, config.budgets);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
