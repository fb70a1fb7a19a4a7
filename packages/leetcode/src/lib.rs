#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! LeetCode GraphQL API client.
//!
//! One user's data comes from three query documents against the same
//! endpoint: the public profile (authoritative; a missing `matchedUser`
//! means the account does not exist or is hidden), the contest ranking,
//! and the badge list (both best-effort; failures degrade to empty
//! defaults). [`LeetCodeClient`] implements the
//! [`ProfileLookup`](leetfetch_fetcher::ProfileLookup) seam so the batch
//! fetcher never knows it is talking to a real service.

pub mod client;
pub mod config;
pub mod graphql;
pub mod parse;

pub use client::LeetCodeClient;
pub use config::{ClientConfig, ConfigError};
