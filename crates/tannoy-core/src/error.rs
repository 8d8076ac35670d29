// ── Core error types ──
//
// User-facing errors from tannoy-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<tannoy_api::Error>`
// impl translates transport-layer errors into domain-appropriate
// variants. `NotReady` and `AuthRequired` carry the setup-time contract:
// the first means "retry setup later", the second "ask for credentials".

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup / session ──────────────────────────────────────────────
    /// The speaker could not be reached during setup. Transient: the
    /// caller should retry the whole connect sequence later.
    #[error("Speaker at {host} is not ready: {reason}")]
    NotReady { host: String, reason: String },

    /// Credentials rejected or session invalid. During setup this means
    /// the user must re-enter credentials; at runtime the entity layer
    /// re-runs login before surfacing it.
    #[error("Authentication failed: {message}")]
    AuthRequired { message: String },

    // ── Runtime connection ───────────────────────────────────────────
    #[error("Cannot connect to speaker at {host}: {reason}")]
    ConnectionFailed { host: String, reason: String },

    // ── Data / validation ────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Media not found: {identifier}")]
    MediaNotFound { identifier: String },

    // ── Operations ───────────────────────────────────────────────────
    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    /// Unexpected device-reported failure code, surfaced, never retried.
    #[error("Speaker API error: {message}")]
    Api { message: String, code: Option<u16> },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` when retrying the whole setup sequence later is the
    /// right reaction.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }

    /// Returns `true` when fresh credentials are required.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tannoy_api::Error> for CoreError {
    fn from(err: tannoy_api::Error) -> Self {
        match err {
            tannoy_api::Error::Connect {
                op, host, reason, ..
            } => CoreError::ConnectionFailed {
                host,
                reason: format!("{reason} while {op}"),
            },
            tannoy_api::Error::Auth { message } => CoreError::AuthRequired { message },
            tannoy_api::Error::Api { code, message } => CoreError::Api {
                message,
                code: Some(code),
            },
            tannoy_api::Error::MissingFile { path } => CoreError::MediaNotFound {
                identifier: path.display().to_string(),
            },
            tannoy_api::Error::UnsupportedMedia { path } => CoreError::ValidationFailed {
                message: format!(
                    "{} is not an MP3; the speaker only accepts MP3 files",
                    path.display()
                ),
            },
            tannoy_api::Error::UploadMissing { name } => CoreError::OperationFailed {
                message: format!("file '{name}' is missing on the speaker after upload"),
            },
            tannoy_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid speaker host: {e}"),
            },
            tannoy_api::Error::ClientBuild(e) => {
                CoreError::Internal(format!("failed to build HTTP client: {e}"))
            }
            tannoy_api::Error::Deserialization { message } => {
                CoreError::Internal(format!("unexpected speaker response: {message}"))
            }
            tannoy_api::Error::Io(e) => CoreError::Io(e),
        }
    }
}
