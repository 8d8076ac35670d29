//! Config subcommand handlers.

use dialoguer::{Input, Select};

use tannoy_config::{self as config, Profile};
use tannoy_core::DEFAULT_USERNAME;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init { name: profile_name } => {
            let config_path = config::config_path();
            eprintln!("tannoy — speaker configuration");
            eprintln!("  Config path: {}\n", config_path.display());

            let host: String = Input::new()
                .with_prompt("Speaker host (e.g. 192.168.1.50)")
                .interact_text()
                .map_err(prompt_err)?;
            if host.is_empty() {
                return Err(CliError::Validation {
                    field: "host".into(),
                    reason: "speaker host cannot be empty".into(),
                });
            }

            let username: String = Input::new()
                .with_prompt("Username")
                .default(DEFAULT_USERNAME.into())
                .interact_text()
                .map_err(prompt_err)?;

            let friendly: String = Input::new()
                .with_prompt("Friendly name")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if pass.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            // Offer keyring storage
            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password_field = if store_selection == 0 {
                config::store_password(&profile_name, &pass)?;
                eprintln!("  Password stored in system keyring");
                None // Don't write to config file
            } else {
                Some(pass)
            };

            let profile = Profile {
                host,
                username,
                password: password_field,
                password_env: None,
                name: if friendly.is_empty() {
                    None
                } else {
                    Some(friendly)
                },
                timeout: None,
            };

            // Merge into the existing config so other profiles survive.
            let mut cfg = config::load_config_or_default();
            cfg.speakers.insert(profile_name.clone(), profile);
            if cfg.default_speaker.is_none() {
                cfg.default_speaker = Some(profile_name.clone());
            }
            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Test it: tannoy -p {profile_name} info");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            for profile in cfg.speakers.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some("<redacted>".into());
                }
            }
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| {
                    toml::to_string_pretty(c)
                        .unwrap_or_else(|e| format!("failed to render config: {e}"))
                },
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
