//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use cotacao_hex::Budgets;
use cotacao_hex::outbound::DEFAULT_UPSTREAM_URL;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub upstream_url: String,
    pub budgets: Budgets,
    /// Create the `cotacoes` table at startup instead of assuming it exists.
    pub create_schema: bool,
    /// Export spans over OTLP (enabled when `OTEL_EXPORTER_OTLP_ENDPOINT` is set).
    pub otel_enabled: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Budgets::default();

        let port = parse_or(&lookup, "PORT", 8080)?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://cotacoes.db".to_string());

        let upstream_url =
            lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let budgets = Budgets {
            request: millis_or(&lookup, "SERVER_BUDGET_MS", defaults.request)?,
            upstream: millis_or(&lookup, "UPSTREAM_BUDGET_MS", defaults.upstream)?,
            store: millis_or(&lookup, "STORE_BUDGET_MS", defaults.store)?,
        };

        let create_schema = parse_or(&lookup, "CREATE_SCHEMA", false)?;
        let otel_enabled = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").is_some();

        Ok(Self {
            port,
            database_url,
            upstream_url,
            budgets,
            create_schema,
            otel_enabled,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> anyhow::Result<Duration> {
    parse_or(lookup, key, default.as_millis() as u64).map(Duration::from_millis)
}
