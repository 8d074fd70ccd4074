//! Deadline Chain
//!
//! A [`Deadline`] is an absolute expiry instant plus a cancellation signal.
//! Every outbound operation (upstream fetch, store insert, client request)
//! runs under one, so a stalled peer surfaces as a typed timeout instead of
//! a hang.
//!
//! Deadlines form a tree:
//! - [`Deadline::after`] creates a root with its own wall-clock budget.
//! - [`Deadline::derive`] creates a child whose expiry is
//!   `min(parent.expiry, now + allowance)`, so a child never outlives its parent.
//! - Dropping (or [`Deadline::cancel`]ing) a deadline releases it, aborting any
//!   in-flight wait bound to it or to anything derived from it. Releasing a
//!   child never touches the parent or its siblings.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use cotacao_deadline::Deadline;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let request = Deadline::after(Duration::from_millis(200));
//! let store = request.derive(Duration::from_millis(10));
//! assert!(store.expiry() <= request.expiry());
//!
//! let value = store.run(async { 42 }).await.unwrap();
//! assert_eq!(value, 42);
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

// ─────────────────────────────────────────────────────────────────────────────
// Budgets
// ─────────────────────────────────────────────────────────────────────────────

/// Root budget for a whole client run.
pub const CLIENT_BUDGET: Duration = Duration::from_millis(300);

/// Budget the server grants a single inbound request.
pub const SERVER_BUDGET: Duration = Duration::from_millis(200);

/// Allowance for the upstream quote fetch, derived from the request deadline.
pub const UPSTREAM_ALLOWANCE: Duration = Duration::from_millis(200);

/// Allowance for the best-effort store insert, derived from the request deadline.
pub const STORE_ALLOWANCE: Duration = Duration::from_millis(10);

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Why an operation bound to a deadline did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeadlineError {
    #[error("deadline of {}ms exceeded", .budget.as_millis())]
    Exceeded { budget: Duration },

    #[error("operation cancelled")]
    Cancelled,
}

impl DeadlineError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DeadlineError::Exceeded { .. })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Deadline
// ─────────────────────────────────────────────────────────────────────────────

/// Absolute expiry plus cancellation signal bounding one operation.
///
/// Not `Clone`: a deadline is owned by the operation it bounds and released
/// when that operation ends. Share it by reference, or [`derive`](Self::derive)
/// a child for a sub-operation.
#[derive(Debug)]
pub struct Deadline {
    expiry: Instant,
    budget: Duration,
    token: CancellationToken,
}

impl Deadline {
    /// Creates a root deadline expiring `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            expiry: expiry_from(Instant::now(), budget),
            budget,
            token: CancellationToken::new(),
        }
    }

    /// Derives a child deadline for a sub-operation.
    ///
    /// The child's expiry is `min(self.expiry, now + allowance)`, and its
    /// effective budget is therefore `min(allowance, self.remaining())`.
    pub fn derive(&self, allowance: Duration) -> Self {
        let now = Instant::now();
        let expiry = self.expiry.min(expiry_from(now, allowance));
        Self {
            expiry,
            budget: expiry.saturating_duration_since(now),
            token: self.token.child_token(),
        }
    }

    /// The instant after which work under this deadline is abandoned.
    pub fn expiry(&self) -> Instant {
        self.expiry
    }

    /// The effective budget this deadline was created with.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left before expiry (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.expiry.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expiry
    }

    /// True once this deadline or any ancestor has been released.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Releases the deadline early. Children are cancelled too.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns an error if work should not start under this deadline.
    pub fn check(&self) -> Result<(), DeadlineError> {
        if self.is_cancelled() {
            return Err(DeadlineError::Cancelled);
        }
        if self.is_expired() {
            return Err(DeadlineError::Exceeded {
                budget: self.budget,
            });
        }
        Ok(())
    }

    /// Drives `op` until it completes, the deadline expires, or the deadline
    /// is released.
    ///
    /// An already-expired or released deadline fails without polling `op`.
    pub async fn run<F>(&self, op: F) -> Result<F::Output, DeadlineError>
    where
        F: Future,
    {
        self.check()?;

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(DeadlineError::Cancelled),
            out = tokio::time::timeout_at(self.expiry, op) => {
                out.map_err(|_| DeadlineError::Exceeded { budget: self.budget })
            }
        }
    }

    /// Like [`run`](Self::run) for fallible operations, folding the deadline
    /// failure into the operation's own error type.
    pub async fn try_run<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<DeadlineError>,
    {
        self.run(op).await.map_err(E::from)?
    }
}

/// `now + budget`, saturating at roughly thirty years out.
fn expiry_from(now: Instant, budget: Duration) -> Instant {
    now.checked_add(budget)
        .unwrap_or_else(|| now + Duration::from_secs(86400 * 365 * 30))
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
