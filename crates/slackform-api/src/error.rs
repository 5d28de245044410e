use thiserror::Error;

/// Top-level error type for the `slackform-api` crate.
///
/// Covers every failure mode of a Web API call: transport, HTTP status,
/// the `{ok: false, error: "..."}` envelope, and payload decoding.
/// `slackform-core` classifies these into idempotency-aware variants.
#[derive(Debug, Error)]
pub enum Error {
    // ── Slack envelope ──────────────────────────────────────────────
    /// The method returned `ok: false`. `code` is Slack's machine-readable
    /// error string (e.g. `already_archived`, `no_such_subteam`).
    #[error("{method} failed: {code}")]
    Slack { method: String, code: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-2xx response that is not a rate limit.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Rate limited by Slack. Includes the `Retry-After` value in seconds.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// HTTP client could not be built (bad token header, TLS backend, ...).
    #[error("Client configuration error: {0}")]
    Config(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Slack's error code, if this is an envelope error.
    pub fn slack_code(&self) -> Option<&str> {
        match self {
            Self::Slack { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns `true` if the token was rejected.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.slack_code(),
            Some("invalid_auth" | "not_authed" | "token_revoked" | "token_expired" | "account_inactive")
        ) || matches!(self, Self::Http { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slack(code: &str) -> Error {
        Error::Slack {
            method: "conversations.info".into(),
            code: code.into(),
        }
    }

    #[test]
    fn display_is_single_line_with_method_and_code() {
        assert_eq!(
            slack("channel_not_found").to_string(),
            "conversations.info failed: channel_not_found"
        );
    }

    #[test]
    fn auth_codes_are_detected() {
        assert!(slack("invalid_auth").is_auth_error());
        assert!(!slack("already_archived").is_auth_error());
    }
}
