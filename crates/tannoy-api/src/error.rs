use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a speaker could not be reached.
///
/// The speaker is known to drop idle connections, so the transport cause
/// matters to callers: `Disconnected` is worth one retry, the rest are not.
#[derive(Debug)]
pub enum ConnectReason {
    /// The request exceeded the per-call timeout.
    Timeout { timeout_secs: u64 },
    /// Connection could not be established (refused, unreachable, DNS).
    Refused,
    /// The connection was established but dropped before a full response.
    Disconnected,
    /// The speaker answered with a non-200 HTTP status.
    Status(u16),
    /// The speaker answered 200 but the body was not what we expect.
    BadPayload(&'static str),
}

impl fmt::Display for ConnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { timeout_secs } => write!(f, "timed out after {timeout_secs}s"),
            Self::Refused => write!(f, "connection failed"),
            Self::Disconnected => write!(f, "server disconnected"),
            Self::Status(status) => write!(f, "HTTP status {status}"),
            Self::BadPayload(what) => write!(f, "{what}"),
        }
    }
}

/// Top-level error type for the `tannoy-api` crate.
///
/// Covers every failure mode of the speaker's HTTP API plus the local
/// preconditions of file upload. `tannoy-core` maps these into user-facing
/// diagnostics and drives its retry/availability policy off the predicates.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Transport failure or non-200 HTTP status.
    #[error("Cannot reach speaker at {host} while {op}: {reason}")]
    Connect {
        op: &'static str,
        host: String,
        reason: ConnectReason,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Speaker host did not form a valid URL.
    #[error("Invalid speaker URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client itself could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    // ── Application-level ───────────────────────────────────────────
    /// Credentials rejected or session token invalid/expired.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Any other non-200 application code from the response envelope.
    #[error("Speaker API error {code}: {message}")]
    Api { code: u16, message: String },

    /// JSON body parsed but did not match the expected shape.
    #[error("Unexpected speaker response: {message}")]
    Deserialization { message: String },

    // ── Upload preconditions / post-conditions ──────────────────────
    /// Local file to upload does not exist.
    #[error("Local file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// The speaker firmware only accepts MP3 uploads.
    #[error("Unsupported media type for {}: speaker only accepts MP3", path.display())]
    UnsupportedMedia { path: PathBuf },

    /// Upload returned success but the file never appeared in the listing.
    #[error("File '{name}' is missing on speaker after upload")]
    UploadMissing { name: String },

    /// Reading the local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this error means the session is invalid and a
    /// fresh login might resolve it.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns `true` if the speaker dropped an established connection.
    ///
    /// This is the only failure the caller-side policy retries: the
    /// speaker closes idle keep-alive connections, and an immediate
    /// second attempt reconnects cleanly.
    pub fn is_server_disconnect(&self) -> bool {
        matches!(
            self,
            Self::Connect {
                reason: ConnectReason::Disconnected,
                ..
            }
        )
    }

    /// Returns `true` for errors caused by the request never reaching the
    /// speaker or the speaker answering outside the API envelope.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }

    /// Returns `true` for local validation failures that no retry or
    /// re-login will fix.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFile { .. } | Self::UnsupportedMedia { .. })
    }
}
