// tannoy-core: speaker entity layer
//
// Sits between the raw API client (tannoy-api) and a host application
// (CLI, automation platform). Owns session lifecycle, the retry and
// availability policies, play orchestration, and the observable state a
// UI consumes.

pub mod browse;
pub mod config;
pub mod error;
pub mod media;
pub mod model;
pub mod retry;
pub mod speaker;

pub use browse::{BrowseNode, retain_playable};
pub use config::{DEFAULT_NAME, DEFAULT_USERNAME, SpeakerConfig};
pub use error::CoreError;
pub use media::{MediaLocation, ResolvedMedia};
pub use model::{MacAddress, PlaybackState, SpeakerIdentity};
pub use speaker::Speaker;

// Payload types hosts handle directly.
pub use tannoy_api::{DeviceInfo, FileEntry, FileId};
