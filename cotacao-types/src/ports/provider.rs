//! Upstream quote provider port.
//!
//! Implementations can be HTTP clients, canned providers for tests, etc.

use cotacao_deadline::Deadline;

use crate::domain::Quote;
use crate::error::FetchError;

/// Port trait for the upstream quote API.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync + 'static {
    /// Fetches the current USD-BRL quote, abandoning the call once
    /// `deadline` expires.
    async fn fetch(&self, deadline: &Deadline) -> Result<Quote, FetchError>;
}
