//! # Cotacao Hex
//!
//! Application service and adapters for the quote relay.
//!
//! ## Architecture
//!
//! - `service/` - `QuoteService`, which owns the per-request deadline chain
//! - `inbound/` - HTTP adapter (Axum server exposing `GET /cotacao`)
//! - `outbound/` - upstream quote API adapter (reqwest)
//!
//! The service is generic over `P: QuoteProvider` and `R: QuoteRepository`,
//! so tests inject canned providers and stores.

pub mod inbound;
pub mod openapi;
pub mod outbound;
pub mod service;


pub use service::{Budgets, QuoteService};
