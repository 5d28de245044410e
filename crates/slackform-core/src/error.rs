// ── Core error types ──
//
// Errors surfaced to the host runtime. Every variant renders as a single
// line carrying the resource identity and, for remote failures, Slack's
// own error code. Idempotency-tolerated codes never reach this type.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote failures ──────────────────────────────────────────────
    #[error("{resource} {operation} failed for '{id}': {message}")]
    Remote {
        resource: String,
        operation: String,
        id: String,
        message: String,
        /// Slack's error code, when the failure came from the envelope.
        code: Option<String>,
    },

    #[error("{resource} {operation} failed for '{id}': authentication failed: {message}")]
    AuthenticationFailed {
        resource: String,
        operation: String,
        id: String,
        message: String,
    },

    #[error(
        "{resource} {operation} failed for '{id}': rate limited by Slack, \
         retry after {retry_after_secs}s"
    )]
    RateLimited {
        resource: String,
        operation: String,
        id: String,
        retry_after_secs: u64,
    },

    #[error("{resource} {operation} cancelled for '{id}'")]
    Cancelled {
        resource: String,
        operation: String,
        id: String,
    },

    // ── Declared-state errors ────────────────────────────────────────
    #[error(
        "{resource} key changed from '{persisted}' to '{declared}'; \
         the key of a relation cannot be updated, replace the resource instead"
    )]
    KeyImmutable {
        resource: String,
        persisted: String,
        declared: String,
    },

    #[error("Validation failed for {resource}: {message}")]
    ValidationFailed { resource: String, message: String },

    #[error("Unknown resource type: {name}")]
    UnknownResource { name: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Slack's error code, if this wraps an envelope error.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────
//
// Only used while building the client, before any resource is involved.
// Reconcilers go through `Op::fail`, which adds resource, operation and
// identity.

impl From<slackform_api::Error> for CoreError {
    fn from(err: slackform_api::Error) -> Self {
        match err {
            slackform_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            slackform_api::Error::Config(message) => CoreError::Config { message },
            other => CoreError::Internal(other.to_string()),
        }
    }
}
