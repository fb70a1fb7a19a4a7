#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Sequential, rate-limited batch fetching of LeetCode profiles.
//!
//! The LeetCode API tolerates exactly one polite client: requests are
//! made one at a time with a fixed delay between them, and a user that
//! cannot be fetched is recorded as a per-student failure rather than
//! aborting the whole batch. [`batch::BatchFetcher`] drives the loop,
//! [`ProfileLookup`] abstracts the actual API client so the loop is
//! testable against a scripted fake, and [`report`] holds the
//! result-merging and filtering helpers shared by every consumer.

pub mod batch;
pub mod cancel;
pub mod progress;
pub mod report;

use async_trait::async_trait;
use leetfetch_leetcode_models::LeetCodeData;

pub use batch::{BatchFetcher, BatchRun, FetchResult, RunStatus};
pub use cancel::CancelToken;

/// Errors from a single profile lookup against the external service.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP {status}")]
    Status {
        /// The response status code.
        status: reqwest::StatusCode,
    },

    /// The GraphQL layer reported an error for the query.
    #[error("GraphQL error: {message}")]
    GraphQl {
        /// First error message from the response's `errors` array.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed response: {message}")]
    Parse {
        /// Description of what was missing or wrong.
        message: String,
    },
}

/// Trait for looking up one user's profile on the external service.
///
/// Implementations must be `Send + Sync`; the batch loop holds one
/// implementation for the whole run and awaits a single call at a time.
///
/// Returning `Ok(None)` means the service answered but knows no such
/// user (or the profile is hidden). Returning `Err` means the call
/// itself failed; the batch loop converts either case into a per-student
/// failure without retrying.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Fetches the profile for `username`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the request or response handling fails.
    async fn lookup(&self, username: &str) -> Result<Option<LeetCodeData>, LookupError>;
}
