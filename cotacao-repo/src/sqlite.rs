//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use cotacao_types::{Deadline, Quote, QuoteRecord, QuoteRepository, StoreError};

use crate::store_error;

const INSERT_QUOTE: &str = "INSERT INTO cotacoes (bid, data) VALUES (?, ?)";

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository over a lazily connected pool.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if !in_memory {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every in-memory connection is its own database, so pin a single one.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        Ok(Self {
            pool: pool_options.connect_lazy_with(options),
        })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema.
    pub async fn create_schema(&self) -> Result<(), StoreError> {
        let ddl = include_str!("../migrations/0001_create_cotacoes.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl QuoteRepository for SqliteRepo {
    #[tracing::instrument(skip(self, deadline), fields(bid = %quote.bid()))]
    async fn save(&self, quote: &Quote, deadline: &Deadline) -> Result<QuoteRecord, StoreError> {
        let record = QuoteRecord::stamp(quote, Utc::now());

        deadline
            .try_run(async {
                sqlx::query(INSERT_QUOTE)
                    .bind(&record.bid)
                    .bind(record.recorded_at)
                    .execute(&self.pool)
                    .await
                    .map_err(store_error)
            })
            .await?;

        tracing::debug!(recorded_at = %record.recorded_at, "quote persisted");
        Ok(record)
    }
}
