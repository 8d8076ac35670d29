mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use tannoy_config::{self as config, Profile};
use tannoy_core::{DEFAULT_USERNAME, Speaker, SpeakerConfig};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never talk to a speaker
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "tannoy", &mut std::io::stdout());
            Ok(())
        }

        // Everything else requires a speaker session
        cmd => {
            let speaker_config = build_speaker_config(&cli.global)?;
            let speaker = Speaker::connect(speaker_config).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &speaker, &cli.global).await;
            speaker.close();
            result
        }
    }
}

/// Build a `SpeakerConfig` from the config file, profile, and CLI overrides.
fn build_speaker_config(global: &GlobalOpts) -> Result<SpeakerConfig, CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.speakers.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global);
    }

    // No profile found -- try to build from CLI flags / env vars alone
    let host = global.host.clone().ok_or_else(|| CliError::NoConfig {
        path: config::config_path().display().to_string(),
    })?;
    let username = global
        .username
        .clone()
        .unwrap_or_else(|| DEFAULT_USERNAME.to_owned());
    let password = global
        .password
        .clone()
        .map(SecretString::from)
        .ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;

    let mut speaker_config = SpeakerConfig::new(host, username, password);
    if let Some(timeout) = global.timeout {
        speaker_config.timeout = Duration::from_secs(timeout);
    }
    Ok(speaker_config)
}

/// Resolve the active profile name from CLI flags and config.
fn active_profile_name(global: &GlobalOpts, cfg: &config::Config) -> String {
    global
        .speaker
        .clone()
        .or_else(|| cfg.default_speaker.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a profile + global flags into a `SpeakerConfig`.
///
/// Flags win over profile values; the credential chain in `tannoy-config`
/// only runs when no `--password` flag (or env var) was given.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SpeakerConfig, CliError> {
    let host = global.host.as_deref().unwrap_or(&profile.host);
    if host.is_empty() {
        return Err(CliError::Validation {
            field: "host".into(),
            reason: "speaker host is empty".into(),
        });
    }

    let username = global.username.as_deref().unwrap_or(&profile.username);

    let password = match global.password {
        Some(ref p) => SecretString::from(p.clone()),
        None => config::resolve_password(profile, profile_name)?,
    };

    let mut speaker_config = SpeakerConfig::new(host, username, password);
    speaker_config.name = profile.name.clone();
    if let Some(timeout) = global.timeout.or(profile.timeout) {
        speaker_config.timeout = Duration::from_secs(timeout);
    }
    Ok(speaker_config)
}
