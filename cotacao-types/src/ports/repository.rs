//! Repository port trait.
//!
//! Adapters (SQLite, Postgres) implement this trait.

use cotacao_deadline::Deadline;

use crate::domain::{Quote, QuoteRecord};
use crate::error::StoreError;

/// Append-only store of fetched quotes.
///
/// Implementations must tolerate concurrent calls; no serialization of
/// writes is expected from callers.
#[async_trait::async_trait]
pub trait QuoteRepository: Send + Sync + 'static {
    /// Appends `quote` stamped with the current server time.
    ///
    /// Connection, prepare and execute all happen under `deadline`.
    async fn save(&self, quote: &Quote, deadline: &Deadline) -> Result<QuoteRecord, StoreError>;
}
