//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use tannoy_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Speaker at {host} is not ready")]
    #[diagnostic(
        code(tannoy::not_ready),
        help(
            "The speaker did not answer during setup: {reason}\n\
             Check power/PoE and the host address, then try again."
        )
    )]
    NotReady { host: String, reason: String },

    #[error("Could not connect to speaker at {host}")]
    #[diagnostic(
        code(tannoy::connection_failed),
        help("Check that the speaker is reachable: {reason}")
    )]
    ConnectionFailed { host: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(tannoy::auth_failed),
        help(
            "The speaker rejected the credentials: {message}\n\
             Run: tannoy config init to update them."
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for speaker '{profile}'")]
    #[diagnostic(
        code(tannoy::no_credentials),
        help(
            "Configure credentials with: tannoy config init\n\
             Or set the TANNOY_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Media '{identifier}' not found")]
    #[diagnostic(
        code(tannoy::not_found),
        help("Run: tannoy files to see what is stored on the speaker")
    )]
    NotFound { identifier: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Speaker API error: {message}")]
    #[diagnostic(code(tannoy::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tannoy::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No speaker configured")]
    #[diagnostic(
        code(tannoy::no_config),
        help(
            "Create a profile with: tannoy config init\n\
             Or pass --host and --password directly.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(tannoy::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(tannoy::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<tannoy_config::ConfigError> for CliError {
    fn from(err: tannoy_config::ConfigError) -> Self {
        match err {
            tannoy_config::ConfigError::NoCredentials { profile } => {
                CliError::NoCredentials { profile }
            }
            tannoy_config::ConfigError::Validation { field, reason } => {
                CliError::Validation { field, reason }
            }
            tannoy_config::ConfigError::Figment(e) => CliError::Config(e),
            tannoy_config::ConfigError::Io(e) => CliError::Io(e),
            tannoy_config::ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotReady { .. } | Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotReady { host, reason } => CliError::NotReady { host, reason },

            CoreError::AuthRequired { message } => CliError::AuthFailed { message },

            CoreError::ConnectionFailed { host, reason } => {
                CliError::ConnectionFailed { host, reason }
            }

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::MediaNotFound { identifier } => CliError::NotFound { identifier },

            CoreError::OperationFailed { message } => CliError::ApiError { message },

            CoreError::Api { message, code } => CliError::ApiError {
                message: match code {
                    Some(code) => format!("{message} (code {code})"),
                    None => message,
                },
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Io(e) => CliError::Io(e),

            CoreError::Internal(message) => CliError::ApiError { message },
        }
    }
}
