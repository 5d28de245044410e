//! Layers global CLI flags over the shared config crate.
//!
//! Flags win over the profile, the profile wins over `[defaults]`.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use slackform_config::{Config, Profile};
use slackform_core::{CacheLocation, ProviderConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The active profile, or an empty one when none is configured and no
/// `--profile` was asked for explicitly.
fn active_profile(global: &GlobalOpts, cfg: &Config) -> Result<(String, Profile), CliError> {
    let name = cfg.profile_name(global.profile.as_deref());

    match cfg.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if global.profile.is_some() => Err(CliError::ProfileNotFound {
            available: available_profiles(cfg),
            name,
        }),
        None => Ok((name, Profile::default())),
    }
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `ProviderConfig` from the config file, profile, and CLI overrides.
pub fn build_provider_config(global: &GlobalOpts) -> Result<ProviderConfig, CliError> {
    let cfg = slackform_config::load_config_or_default();
    let (name, profile) = active_profile(global, &cfg)?;

    // 1. Token (flag/env > profile chain)
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => slackform_config::resolve_token(&profile, &name)?,
    };

    let mut provider = slackform_config::profile_to_provider_config(&cfg, &profile, token)?;

    // 2. API root
    if let Some(ref api_url) = global.api_url {
        provider.base_url = api_url.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {api_url}"),
        })?;
    }

    // 3. Timeout
    if let Some(secs) = global.timeout {
        provider.timeout = Duration::from_secs(secs);
    }

    // 4. Cache
    if global.no_persist_cache {
        provider.cache = CacheLocation::Memory;
    } else if let Some(ref dir) = global.cache_dir {
        provider.cache = CacheLocation::Directory(dir.clone());
    }

    tracing::debug!(
        profile = %name,
        base_url = %provider.base_url,
        cache = ?provider.cache,
        "resolved provider config"
    );
    Ok(provider)
}

/// Cache directory for the active profile; needs no token.
pub fn resolve_cache_dir(global: &GlobalOpts) -> Result<PathBuf, CliError> {
    if let Some(ref dir) = global.cache_dir {
        return Ok(dir.clone());
    }
    let cfg = slackform_config::load_config_or_default();
    let (_, profile) = active_profile(global, &cfg)?;
    Ok(slackform_config::cache_dir(&cfg, Some(&profile)))
}
