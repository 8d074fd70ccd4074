//! Outbound adapters.

mod awesome_api;

pub use awesome_api::{AwesomeApiProvider, DEFAULT_UPSTREAM_URL};
