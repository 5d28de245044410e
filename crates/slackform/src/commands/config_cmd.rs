//! Config subcommand handlers.

use dialoguer::{Input, Select};

use slackform_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::commands::util::prompt_err;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("****".into());
        }
    }
    cfg
}

/// TOML view for `--output table`.
fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

/// Ask for a token and offer keyring storage.
///
/// Returns `Some(token)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_token(profile_name: &str) -> Result<Option<String>, CliError> {
    let token = rpassword::prompt_password("Bot token (xoxb-...): ").map_err(prompt_err)?;
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }

    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        slackform_config::store_token(profile_name, &token)?;
        eprintln!("   ✓ token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = slackform_config::config_path();
            eprintln!("slackform configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("Web API root")
                .default("https://slack.com/api/".into())
                .interact_text()
                .map_err(prompt_err)?;

            let token = prompt_token(&profile_name)?;

            let mut cfg = slackform_config::load_config_or_default();
            cfg.default_profile = Some(profile_name.clone());
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    api_url: Some(api_url),
                    token,
                    ..Profile::default()
                },
            );

            let path = slackform_config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Try it: slackform channel read --id C0123ABCD");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&slackform_config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                slackform_config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(
                &slackform_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        // ── Set token ───────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = slackform_config::load_config_or_default();
            let name = cfg.profile_name(profile.as_deref().or(global.profile.as_deref()));

            let token = rpassword::prompt_password(format!("Bot token for '{name}': "))
                .map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }

            slackform_config::store_token(&name, &token)?;
            if !global.quiet {
                eprintln!("✓ token for profile '{name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_masks_plaintext_tokens_only() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "work".into(),
            Profile {
                token: Some("xoxb-secret".into()),
                token_env: Some("SLACK_TOKEN".into()),
                ..Profile::default()
            },
        );

        let shown = format_config(&redacted(&cfg));

        assert!(!shown.contains("xoxb-secret"), "{shown}");
        assert!(shown.contains("****"), "{shown}");
        assert!(shown.contains("SLACK_TOKEN"), "{shown}");
    }
}
