//! Domain types for the quote relay.

mod quote;

pub use quote::{Quote, QuoteRecord};
