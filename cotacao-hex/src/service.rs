//! Quote Application Service
//!
//! Orchestrates one request: fetch under the upstream allowance, then a
//! best-effort insert under the store allowance, both derived from the
//! request deadline. Contains NO infrastructure logic.

use std::time::Duration;

use cotacao_types::{
    AppError, Deadline, Quote, QuoteProvider, QuoteRecord, QuoteRepository, StoreError,
};
use cotacao_types::{SERVER_BUDGET, STORE_ALLOWANCE, UPSTREAM_ALLOWANCE};

/// Time budgets applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    /// Ceiling for a whole inbound request.
    pub request: Duration,
    /// Allowance for the upstream fetch, derived from the request deadline.
    pub upstream: Duration,
    /// Allowance for the store insert, derived from the request deadline.
    pub store: Duration,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            request: SERVER_BUDGET,
            upstream: UPSTREAM_ALLOWANCE,
            store: STORE_ALLOWANCE,
        }
    }
}

/// Application service for quote requests.
///
/// Generic over the upstream provider and the store, injected at compile time.
pub struct QuoteService<P: QuoteProvider, R: QuoteRepository> {
    provider: P,
    repo: R,
    budgets: Budgets,
}

impl<P: QuoteProvider, R: QuoteRepository> QuoteService<P, R> {
    /// Creates a service with the default budgets.
    pub fn new(provider: P, repo: R) -> Self {
        Self::with_budgets(provider, repo, Budgets::default())
    }

    pub fn with_budgets(provider: P, repo: R, budgets: Budgets) -> Self {
        Self {
            provider,
            repo,
            budgets,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn budgets(&self) -> Budgets {
        self.budgets
    }

    /// Opens the deadline for one inbound request.
    ///
    /// `inbound` is the caller's own remaining budget, when it sent one; the
    /// request never runs past it, nor past the server's request budget.
    pub fn request_deadline(&self, inbound: Option<Duration>) -> Deadline {
        let budget = inbound.map_or(self.budgets.request, |b| b.min(self.budgets.request));
        Deadline::after(budget)
    }

    /// Fetches the current quote and records it.
    ///
    /// Only a fetch failure fails the request. The store insert runs after a
    /// successful fetch under `min(store allowance, request remaining)`, so a
    /// slow upstream may leave it no time at all; its outcome is logged and
    /// dropped.
    #[tracing::instrument(
        skip(self, request),
        fields(budget_ms = request.budget().as_millis() as u64)
    )]
    pub async fn current_quote(&self, request: &Deadline) -> Result<Quote, AppError> {
        let quote = self.fetch(request).await?;

        match self.persist(&quote, request).await {
            Ok(record) => tracing::debug!(recorded_at = %record.recorded_at, "quote recorded"),
            Err(e) => tracing::warn!(error = %e, "failed to persist quote"),
        }

        Ok(quote)
    }

    async fn fetch(&self, request: &Deadline) -> Result<Quote, AppError> {
        let upstream = request.derive(self.budgets.upstream);

        match self.provider.fetch(&upstream).await {
            Ok(quote) => Ok(quote),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    budget_ms = upstream.budget().as_millis() as u64,
                    "failed to fetch quote"
                );
                Err(e.into())
            }
        }
    }

    /// Best-effort insert of `quote` under a store deadline derived from `request`.
    pub async fn persist(
        &self,
        quote: &Quote,
        request: &Deadline,
    ) -> Result<QuoteRecord, StoreError> {
        let store = request.derive(self.budgets.store);
        self.repo.save(quote, &store).await
    }
}
