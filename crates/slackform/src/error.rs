//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use slackform_config::ConfigError;
use slackform_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const RATE_LIMITED: i32 = 7;
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(slackform::auth_failed),
        help(
            "Verify the bot token and its scopes (channels:manage, usergroups:write).\n\
             Run: slackform config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(slackform::no_credentials),
        help(
            "Configure a profile with: slackform config init\n\
             Or set the SLACKFORM_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(slackform::remote))]
    Remote {
        message: String,
        code: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(
        code(slackform::rate_limited),
        help("Retry after {retry_after_secs}s.")
    )]
    RateLimited {
        message: String,
        retry_after_secs: u64,
    },

    #[error("{message}")]
    #[diagnostic(code(slackform::cancelled))]
    Cancelled { message: String },

    // ── Declared state ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(slackform::key_immutable),
        help("Delete the resource and create it again with the new key.")
    )]
    KeyImmutable { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(slackform::validation))]
    Validation { field: String, reason: String },

    #[error("Unknown resource type '{name}'")]
    #[diagnostic(
        code(slackform::unknown_resource),
        help("Run: slackform resources to see registered types")
    )]
    UnknownResource { name: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(slackform::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: slackform config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(slackform::config))]
    Config(ConfigError),

    #[error("Internal error: {0}")]
    #[diagnostic(code(slackform::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(slackform::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. } | Self::UnknownResource { .. } => exit_code::USAGE,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::KeyImmutable { .. } => exit_code::CONFLICT,
            Self::RateLimited { .. } => exit_code::RATE_LIMITED,
            Self::Cancelled { .. } => exit_code::CANCELLED,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Remote { ref code, .. } => CliError::Remote {
                code: code.clone(),
                message: err.to_string(),
            },

            CoreError::AuthenticationFailed { .. } => CliError::AuthFailed {
                profile: "current".into(),
                message: err.to_string(),
            },

            CoreError::RateLimited {
                retry_after_secs, ..
            } => CliError::RateLimited {
                message: err.to_string(),
                retry_after_secs,
            },

            CoreError::Cancelled { .. } => CliError::Cancelled {
                message: err.to_string(),
            },

            CoreError::KeyImmutable { .. } => CliError::KeyImmutable {
                message: err.to_string(),
            },

            CoreError::ValidationFailed { resource, message } => CliError::Validation {
                field: resource,
                reason: message,
            },

            CoreError::UnknownResource { name } => CliError::UnknownResource { name },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_keep_the_single_line_message() {
        let core = CoreError::Remote {
            resource: "slack_channel".into(),
            operation: "read".into(),
            id: "C1".into(),
            message: "conversations.info failed: internal_error".into(),
            code: Some("internal_error".into()),
        };
        let cli = CliError::from(core);

        assert_eq!(
            cli.to_string(),
            "slack_channel read failed for 'C1': conversations.info failed: internal_error"
        );
        assert_eq!(cli.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn auth_and_rate_limit_keep_identity_and_map_exit_codes() {
        let auth = CliError::from(CoreError::AuthenticationFailed {
            resource: "slack_channel".into(),
            operation: "read".into(),
            id: "C1".into(),
            message: "conversations.info failed: invalid_auth".into(),
        });
        let limited = CliError::from(CoreError::RateLimited {
            resource: "slack_usergroup_channels".into(),
            operation: "read".into(),
            id: "S1".into(),
            retry_after_secs: 30,
        });

        assert!(auth.to_string().contains("'C1'"), "{auth}");
        assert!(limited.to_string().contains("'S1'"), "{limited}");
        assert_eq!(auth.exit_code(), exit_code::AUTH);
        assert_eq!(limited.exit_code(), exit_code::RATE_LIMITED);
    }

    #[test]
    fn key_change_and_cancellation_have_distinct_exit_codes() {
        let key = CliError::from(CoreError::KeyImmutable {
            resource: "slack_conversation_member".into(),
            persisted: "C1-U1".into(),
            declared: "C2-U1".into(),
        });
        let cancelled = CliError::from(CoreError::Cancelled {
            resource: "slack_channel".into(),
            operation: "read".into(),
            id: "C1".into(),
        });

        assert_eq!(key.exit_code(), exit_code::CONFLICT);
        assert_eq!(cancelled.exit_code(), exit_code::CANCELLED);
    }
}
