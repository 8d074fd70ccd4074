//! Error types for the quote relay.

use cotacao_deadline::DeadlineError;

/// Upstream fetch errors.
///
/// The service treats every variant the same way (the request fails);
/// the variants exist so logs say what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Deadline(#[from] DeadlineError),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Malformed upstream body: {0}")]
    Decode(String),
}

/// Store errors. Never surfaced to the requester.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Deadline(#[from] DeadlineError),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Application-level errors (for HTTP responses).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch quote: {0}")]
    QuoteUnavailable(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_fetch_timeout_message() {
        let err = AppError::from(FetchError::from(DeadlineError::Exceeded {
            budget: Duration::from_millis(200),
        }));
        assert_eq!(
            err.to_string(),
            "Failed to fetch quote: deadline of 200ms exceeded"
        );
    }
}
