// Transport configuration for building reqwest::Client instances.
//
// The speaker speaks plain HTTP on the local network; the only tunable is
// the per-request timeout. Kept as a struct so the core and CLI layers can
// thread their own timeout through without touching client internals.

use std::time::Duration;

use crate::error::Error;

/// Per-request timeout applied to every speaker call.
///
/// The firmware is slow to answer while it rewrites its program flash, but
/// anything beyond a few seconds means the device is gone.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("tannoy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::ClientBuild)
    }
}
