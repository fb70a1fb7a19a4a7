//! The reqwest-backed LeetCode client.

use std::time::Duration;

use async_trait::async_trait;
use leetfetch_fetcher::{LookupError, ProfileLookup};
use leetfetch_leetcode_models::LeetCodeData;

use crate::config::ClientConfig;
use crate::graphql;
use crate::parse;

/// HTTP client for the LeetCode GraphQL endpoint.
///
/// Holds one connection pool for the whole batch. The three queries for
/// a single user run concurrently; across users the batch fetcher
/// serializes calls, so the endpoint never sees more than one user's
/// worth of traffic at a time.
pub struct LeetCodeClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl LeetCodeClient {
    /// Builds a client from the given config.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the configured headers are invalid or
    /// the underlying HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, LookupError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::REFERER,
            reqwest::header::HeaderValue::from_str(&config.referer).map_err(|e| {
                LookupError::Parse {
                    message: format!("invalid referer '{}': {e}", config.referer),
                }
            })?,
        );

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Builds a client with the default public-endpoint config.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the HTTP client cannot be constructed.
    pub fn from_defaults() -> Result<Self, LookupError> {
        Self::new(ClientConfig::default())
    }

    /// POSTs one GraphQL body and returns the parsed response JSON.
    async fn post(&self, body: serde_json::Value) -> Result<serde_json::Value, LookupError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status { status });
        }

        Ok(response.json().await?)
    }

    /// Fetches everything known about `username`.
    ///
    /// The profile query is authoritative: an HTTP or GraphQL failure
    /// there fails the lookup, and a null `matchedUser` is `Ok(None)`.
    /// Contest and badge queries are best-effort; their failures degrade
    /// to an empty contest summary and an empty badge list.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the profile request or its parsing
    /// fails.
    pub async fn fetch_user(&self, username: &str) -> Result<Option<LeetCodeData>, LookupError> {
        let (profile_body, contest_body, badges_body) = tokio::join!(
            self.post(graphql::request_body(graphql::PROFILE_QUERY, username)),
            self.post(graphql::request_body(graphql::CONTEST_QUERY, username)),
            self.post(graphql::request_body(graphql::BADGES_QUERY, username)),
        );

        let Some(user) = parse::parse_profile(&profile_body?)? else {
            log::debug!("{username}: no matched user");
            return Ok(None);
        };

        let contest = match contest_body {
            Ok(body) => parse::parse_contest(&body).unwrap_or_default(),
            Err(e) => {
                log::debug!("{username}: contest data unavailable: {e}");
                leetfetch_leetcode_models::LeetCodeContest::default()
            }
        };

        let badges = match badges_body {
            Ok(body) => parse::parse_badges(&body),
            Err(e) => {
                log::debug!("{username}: badges unavailable: {e}");
                Vec::new()
            }
        };

        let data = LeetCodeData {
            profile: parse::build_profile(&user),
            stats: parse::extract_stats(&user),
            contest,
            badges,
            contest_badge: user.contest_badge,
        };

        Ok(Some(data))
    }
}

#[async_trait]
impl ProfileLookup for LeetCodeClient {
    async fn lookup(&self, username: &str) -> Result<Option<LeetCodeData>, LookupError> {
        self.fetch_user(username).await
    }
}
