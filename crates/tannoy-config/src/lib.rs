//! Shared configuration for the tannoy CLI.
//!
//! TOML speaker profiles, credential resolution (env + keyring +
//! plaintext), and translation to `tannoy_core::SpeakerConfig`. The CLI
//! adds flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tannoy_core::{DEFAULT_USERNAME, SpeakerConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for speaker '{profile}'")]
    NoCredentials { profile: String },

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default speaker profile name.
    pub default_speaker: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named speaker profiles.
    #[serde(default)]
    pub speakers: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_speaker: Some("default".into()),
            defaults: Defaults::default(),
            speakers: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    5
}

/// A named speaker profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Speaker host, optionally with port (e.g. "192.168.1.50").
    pub host: String,

    /// Login account on the speaker.
    #[serde(default = "default_username")]
    pub username: String,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Friendly display name.
    pub name: Option<String>,

    /// Override request timeout in seconds.
    pub timeout: Option<u64>,
}

fn default_username() -> String {
    DEFAULT_USERNAME.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("rs", "tannoy", "tannoy").map_or_else(
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
    p.push("tannoy");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("TANNOY_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a profile's password from the credential chain.
///
/// Order: profile's `password_env` variable, then the `TANNOY_PASSWORD`
/// variable, then the system keyring, then plaintext in the config file.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var("TANNOY_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    if let Ok(entry) = keyring::Entry::new("tannoy", &format!("{profile_name}/password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(ref password) = profile.password {
        return Ok(SecretString::from(password.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring for a profile.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new("tannoy", &format!("{profile_name}/password")).map_err(
        |e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        },
    )?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

/// Build a `SpeakerConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_speaker_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<SpeakerConfig, ConfigError> {
    if profile.host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "speaker host is empty".into(),
        });
    }

    let password = resolve_password(profile, profile_name)?;

    let mut config = SpeakerConfig::new(profile.host.clone(), profile.username.clone(), password);
    config.name = profile.name.clone();
    if let Some(timeout) = profile.timeout {
        config.timeout = Duration::from_secs(timeout);
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(host: &str) -> Profile {
        Profile {
            host: host.into(),
            username: default_username(),
            password: Some("hunter2".into()),
            password_env: None,
            name: None,
            timeout: None,
        }
    }

    #[test]
    fn profile_builds_speaker_config() {
        let config = profile_to_speaker_config(&profile("10.0.0.5"), "default").unwrap();
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.username, "admin");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn profile_timeout_override_applies() {
        let mut p = profile("10.0.0.5");
        p.timeout = Some(10);
        let config = profile_to_speaker_config(&p, "default").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn empty_host_is_a_validation_error() {
        let result = profile_to_speaker_config(&profile(""), "default");
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn missing_password_is_no_credentials() {
        let mut p = profile("10.0.0.5");
        p.password = None;
        // No env var, no keyring entry in the test environment.
        let result = resolve_password(&p, "missing-credentials-test");
        assert!(matches!(result, Err(ConfigError::NoCredentials { .. })));
    }
}
