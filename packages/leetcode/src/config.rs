//! Client configuration, loadable from a TOML file.
//!
//! Every field has a default that talks to the public endpoint, so a
//! config file is only needed to point at a proxy or change pacing.
//!
//! ```toml
//! endpoint = "https://leetcode.com/graphql"
//! user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
//! referer = "https://leetcode.com"
//! request_timeout_secs = 10
//! ```

use std::path::Path;

use serde::Deserialize;

/// Errors from reading a client config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`ClientConfig`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Connection settings for the LeetCode GraphQL endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// `User-Agent` header. The public endpoint rejects clients that
    /// look like bots, so this defaults to a browser string.
    pub user_agent: String,
    /// `Referer` header.
    pub referer: String,
    /// HTTP-level timeout per request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://leetcode.com/graphql".to_owned(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_owned(),
            referer: "https://leetcode.com".to_owned(),
            request_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Loads a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
