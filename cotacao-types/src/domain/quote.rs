//! Quote domain type.

use std::fmt;

use chrono::{DateTime, Utc};

/// A USD-BRL exchange rate as reported upstream.
///
/// The bid is kept as the decimal text the upstream sent, so the value the
/// client writes out is byte-for-byte what the upstream returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    bid: String,
}

impl Quote {
    /// Creates a quote from the bid text exactly as received.
    pub fn new(bid: impl Into<String>) -> Self {
        Self { bid: bid.into() }
    }

    pub fn bid(&self) -> &str {
        &self.bid
    }

    pub fn into_bid(self) -> String {
        self.bid
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bid)
    }
}

/// A quote as appended to the store, stamped with the server clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub bid: String,
    pub recorded_at: DateTime<Utc>,
}

impl QuoteRecord {
    pub fn stamp(quote: &Quote, recorded_at: DateTime<Utc>) -> Self {
        Self {
            bid: quote.bid().to_string(),
            recorded_at,
        }
    }
}
