// ── Core identity and state types ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated form
/// (`aa:bb:cc:dd:ee:ff`).
///
/// The normalized MAC is the speaker's stable unique identifier: hosts
/// key persisted entries on it so a speaker keeps its identity across IP
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or mixed-case input.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ── Playback state ──────────────────────────────────────────────────

/// Coarse playback state derived from the speaker's file listing: the
/// speaker is `Playing` when any file reports `playStatus == 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Playing => write!(f, "playing"),
        }
    }
}

// ── Identity ────────────────────────────────────────────────────────

/// Stable identity facts about a connected speaker, for registries and
/// display. Snapshot taken at connect time.
#[derive(Debug, Clone, Serialize)]
pub struct SpeakerIdentity {
    pub unique_id: MacAddress,
    pub manufacturer: &'static str,
    pub model: String,
    pub sw_version: String,
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mac_address_normalizes_dashes_and_case() {
        let mac = MacAddress::new("AA-BB-CC-DD-EE-FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_address_from_str() {
        let mac: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn playback_state_defaults_to_idle() {
        assert_eq!(PlaybackState::default(), PlaybackState::Idle);
    }
}
