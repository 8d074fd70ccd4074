//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use cotacao_types::{Deadline, Quote, QuoteRecord, QuoteRepository, StoreError};

use crate::store_error;

const INSERT_QUOTE: &str = "INSERT INTO cotacoes (bid, data) VALUES ($1, $2)";

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository over a shared connection pool.
pub struct PostgresRepo {
    pool: PgPool,
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository. Connections are opened on first use.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema.
    pub async fn create_schema(&self) -> Result<(), StoreError> {
        let ddl = include_str!("../migrations/0001_create_cotacoes_pg.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(())
    }
}

#[async_trait]
impl QuoteRepository for PostgresRepo {
    #[tracing::instrument(skip(self, deadline), fields(bid = %quote.bid()))]
    async fn save(&self, quote: &Quote, deadline: &Deadline) -> Result<QuoteRecord, StoreError> {
        let record = QuoteRecord::stamp(quote, Utc::now());

        // `data` is a plain TIMESTAMP column, so bind the UTC wall time.
        deadline
            .try_run(async {
                sqlx::query(INSERT_QUOTE)
                    .bind(&record.bid)
                    .bind(record.recorded_at.naive_utc())
                    .execute(&self.pool)
                    .await
                    .map_err(store_error)
            })
            .await?;

        tracing::debug!(recorded_at = %record.recorded_at, "quote persisted");
        Ok(record)
    }
}
