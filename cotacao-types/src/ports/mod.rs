//! Port traits (interfaces for adapters).
//!
//! The service depends on these traits, never on reqwest or sqlx directly.
//! Every method takes the [`Deadline`](cotacao_deadline::Deadline) it must
//! finish under.

mod provider;
mod repository;

pub use provider::QuoteProvider;
pub use repository::QuoteRepository;
