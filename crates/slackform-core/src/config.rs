// ── Runtime provider configuration ──
//
// Describes how to reach Slack and where to keep the list cache. Carries
// the token but never touches config files; the CLI builds one and hands
// it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Where list snapshots are memoized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    /// One JSON file per key in this directory.
    Directory(PathBuf),
    /// Process-local only.
    Memory,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Bot token, sent as a bearer header.
    pub token: SecretString,
    /// Web API root (`https://slack.com/api/`).
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    pub cache: CacheLocation,
}

impl ProviderConfig {
    /// Config against the public Web API with an in-memory cache.
    pub fn new(token: SecretString) -> Result<Self, url::ParseError> {
        Ok(Self {
            token,
            base_url: Url::parse(slackform_api::DEFAULT_BASE_URL)?,
            timeout: Duration::from_secs(30),
            cache: CacheLocation::Memory,
        })
    }
}
