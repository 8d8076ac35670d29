// Speaker API response types
//
// The speaker wraps every response in a `{code?, message?, data?}` envelope;
// the envelope itself is handled in `client.rs`, these are the `data`
// payloads. Fields use `#[serde(default)]` liberally because the firmware
// omits fields it considers uninteresting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// JSON key of the output-volume property in `DeviceInfo` and the
/// `device/edit` endpoint. Integer scale 0-10.
pub const VOLUME_KEY: &str = "aoVol";

// ── Device info ──────────────────────────────────────────────────────

/// Identity and capability data from `GET /prod-api/device/info`.
///
/// The speaker reports a few dozen fields; we model the ones the rest of
/// the stack needs and keep everything else in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub mac: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub version: String,
    /// Output volume, 0-10.
    #[serde(default, rename = "aoVol")]
    pub volume: i64,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Program files ────────────────────────────────────────────────────

/// Device-assigned identifier of an uploaded audio file.
///
/// Observed firmware returns small integers, but the field is documented
/// nowhere, so tolerate strings too. Callers treat it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileId {
    Number(i64),
    Text(String),
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One audio file resident on the speaker's internal storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub id: FileId,
    /// 1 while the speaker is playing this file, anything else otherwise.
    #[serde(default, rename = "playStatus")]
    pub play_status: i64,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FileEntry {
    pub fn is_playing(&self) -> bool {
        self.play_status == 1
    }
}

/// `data` payload of `GET /prod-api/program/info`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FileListData {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn file_entry_parses_play_status() {
        let entry: FileEntry =
            serde_json::from_str(r#"{"name":"a.mp3","id":1,"playStatus":1}"#).unwrap();
        assert_eq!(entry.name, "a.mp3");
        assert_eq!(entry.id, FileId::Number(1));
        assert!(entry.is_playing());
    }

    #[test]
    fn file_entry_defaults_play_status() {
        let entry: FileEntry = serde_json::from_str(r#"{"name":"b.mp3","id":"b7"}"#).unwrap();
        assert_eq!(entry.id, FileId::Text("b7".into()));
        assert!(!entry.is_playing());
    }

    #[test]
    fn file_id_serializes_transparently() {
        assert_eq!(serde_json::to_string(&FileId::Number(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&FileId::Text("x".into())).unwrap(), "\"x\"");
    }

    #[test]
    fn device_info_keeps_unknown_fields() {
        let info: DeviceInfo = serde_json::from_str(
            r#"{"mac":"AA:BB:CC:DD:EE:FF","model":"VCS-SH30","version":"1.2","aoVol":7,"poe":true}"#,
        )
        .unwrap();
        assert_eq!(info.volume, 7);
        assert_eq!(info.extra.get("poe"), Some(&serde_json::Value::Bool(true)));
    }
}
