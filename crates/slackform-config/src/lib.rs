//! Shared configuration for slackform.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `slackform_core::ProviderConfig`. The CLI layers its
//! global flags on top of this.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use slackform_core::{CacheLocation, ProviderConfig};

/// Keyring service name; entries are keyed `<profile>/token`.
pub const KEYRING_SERVICE: &str = "slackform";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "SLACKFORM_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found in config")]
    UnknownProfile { profile: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named workspace profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit override, then `default_profile`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Cache directory shared by all profiles unless overridden.
    pub cache_dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            cache_dir: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named Slack workspace profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Web API root. Defaults to `https://slack.com/api/`.
    pub api_url: Option<String>,

    /// Bot token (plaintext, prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bot token.
    pub token_env: Option<String>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Keep list snapshots on disk between runs (default true).
    pub persist_cache: Option<bool>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "slackform", "slackform")
}

/// Resolve the config file path: `$SLACKFORM_CONFIG`, else platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("slackform");
    p
}

/// Platform cache directory for list snapshots.
pub fn default_cache_dir() -> PathBuf {
    project_dirs().map_or_else(
        || std::env::temp_dir().join("slackform"),
        |dirs| dirs.cache_dir().to_path_buf(),
    )
}

/// Effective cache directory: profile, then defaults, then platform.
pub fn cache_dir(config: &Config, profile: Option<&Profile>) -> PathBuf {
    profile
        .and_then(|p| p.cache_dir.clone())
        .or_else(|| config.defaults.cache_dir.clone())
        .unwrap_or_else(default_cache_dir)
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, then `SLACKFORM_` env overrides
/// (`SLACKFORM_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SLACKFORM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution (without CLI flags) ────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Resolve the bot token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env -> env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a token in the system keyring for `profile_name`.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?
        .set_password(token)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Build a `ProviderConfig` from a profile, given an already-resolved token.
pub fn profile_to_provider_config(
    config: &Config,
    profile: &Profile,
    token: SecretString,
) -> Result<ProviderConfig, ConfigError> {
    let mut provider = ProviderConfig::new(token).map_err(|e| ConfigError::Validation {
        field: "api_url".into(),
        reason: e.to_string(),
    })?;

    if let Some(ref api_url) = profile.api_url {
        provider.base_url = api_url.parse().map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {api_url}"),
        })?;
    }

    provider.timeout = Duration::from_secs(profile.timeout.unwrap_or(config.defaults.timeout));
    provider.cache = if profile.persist_cache.unwrap_or(true) {
        CacheLocation::Directory(cache_dir(config, Some(profile)))
    } else {
        CacheLocation::Memory
    };

    Ok(provider)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "work"

[defaults]
timeout = 45
cache_dir = "/var/cache/slackform"

[profiles.work]
api_url = "http://localhost:9999/api/"
token_env = "SLACKFORM_TEST_WORK_TOKEN"
timeout = 5

[profiles.scratch]
token = "xoxb-plain"
persist_cache = false
"#;

    fn sample(dir: &tempfile::TempDir) -> Config {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = sample(&dir);

        assert_eq!(cfg.profile_name(None), "work");
        assert_eq!(cfg.profile_name(Some("scratch")), "scratch");
        assert_eq!(cfg.defaults.timeout, 45);
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.profiles.len(), 2);
        assert!(cfg.profile("missing").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn token_env_wins_over_plaintext() {
        // PATH is always present in the test environment.
        let expected = std::env::var("PATH").unwrap();
        let profile = Profile {
            token: Some("xoxb-plain".into()),
            token_env: Some("PATH".into()),
            ..Profile::default()
        };

        let token = resolve_token(&profile, "slackform-test-env").unwrap();
        assert_eq!(token.expose_secret(), expected);
    }

    #[test]
    fn unset_token_env_falls_back_to_plaintext() {
        let profile = Profile {
            token: Some("xoxb-plain".into()),
            token_env: Some("SLACKFORM_TEST_UNSET_TOKEN_VAR".into()),
            ..Profile::default()
        };

        let token = resolve_token(&profile, "slackform-test-plaintext").unwrap();
        assert_eq!(token.expose_secret(), "xoxb-plain");
    }

    #[test]
    fn no_token_source_is_reported() {
        let err = resolve_token(&Profile::default(), "slackform-test-none").unwrap_err();
        assert!(
            matches!(err, ConfigError::NoCredentials { ref profile } if profile == "slackform-test-none")
        );
    }

    #[test]
    fn provider_config_uses_profile_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = sample(&dir);
        let work = cfg.profile("work").unwrap();

        let provider =
            profile_to_provider_config(&cfg, work, SecretString::from("xoxb-t".to_owned()))
                .unwrap();

        assert_eq!(provider.base_url.as_str(), "http://localhost:9999/api/");
        assert_eq!(provider.timeout, Duration::from_secs(5));
        assert_eq!(
            provider.cache,
            CacheLocation::Directory(PathBuf::from("/var/cache/slackform"))
        );
        assert_eq!(provider.token.expose_secret(), "xoxb-t");
    }

    #[test]
    fn provider_config_memory_cache_and_default_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = sample(&dir);
        let scratch = cfg.profile("scratch").unwrap();

        let provider =
            profile_to_provider_config(&cfg, scratch, SecretString::from("x".to_owned())).unwrap();

        assert_eq!(provider.cache, CacheLocation::Memory);
        assert_eq!(provider.timeout, Duration::from_secs(45));
        assert_eq!(provider.base_url.as_str(), slackform_api_default());
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let cfg = Config::default();
        let profile = Profile {
            api_url: Some("not a url".into()),
            ..Profile::default()
        };
        let err = profile_to_provider_config(&cfg, &profile, SecretString::from("x".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn save_then_load_round_trips_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                token_env: Some("SLACK_TOKEN".into()),
                ..Profile::default()
            },
        );

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(
            loaded.profile("default").unwrap().token_env.as_deref(),
            Some("SLACK_TOKEN")
        );
    }

    fn slackform_api_default() -> &'static str {
        "https://slack.com/api/"
    }
}
