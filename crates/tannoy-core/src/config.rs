// ── Runtime connection configuration ──
//
// Describes *how* to reach one speaker. Carries credential data and
// connection tuning, never touches disk. The CLI (or any other host)
// constructs a `SpeakerConfig` and hands it to `Speaker::connect`.

use std::time::Duration;

use secrecy::SecretString;

use tannoy_api::DEFAULT_TIMEOUT;

/// Friendly name used when the caller does not supply one.
pub const DEFAULT_NAME: &str = "Dahua Speaker";

/// Factory default account on the speaker.
pub const DEFAULT_USERNAME: &str = "admin";

/// Configuration for connecting to a single speaker.
#[derive(Debug, Clone)]
pub struct SpeakerConfig {
    /// Bare host (optionally `host:port`), e.g. `192.168.1.50`.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Friendly name; falls back to [`DEFAULT_NAME`].
    pub name: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SpeakerConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
            name: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
