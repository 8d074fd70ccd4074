//! # Cotacao Types
//!
//! Domain types and port traits for the USD-BRL quote relay.
//! This crate has no IO dependencies: only data structures and the
//! traits adapters implement.
//!
//! ## Architecture
//!
//! - `domain/` - `Quote` and `QuoteRecord`
//! - `ports/` - `QuoteProvider` (upstream) and `QuoteRepository` (store)
//! - `dto/` - wire shapes for the upstream API and our own endpoint
//! - `error/` - fetch, store and application errors

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use cotacao_deadline::{
    CLIENT_BUDGET, Deadline, DeadlineError, SERVER_BUDGET, STORE_ALLOWANCE, UPSTREAM_ALLOWANCE,
};
pub use domain::{Quote, QuoteRecord};
pub use dto::*;
pub use error::{AppError, FetchError, StoreError};
pub use ports::{QuoteProvider, QuoteRepository};
