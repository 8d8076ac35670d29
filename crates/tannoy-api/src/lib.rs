// tannoy-api: Async Rust client for the Dahua PoE speaker HTTP API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod device;
mod program;
mod session;

pub use client::SpeakerClient;
pub use error::{ConnectReason, Error};
pub use models::{DeviceInfo, FileEntry, FileId, VOLUME_KEY};
pub use transport::{DEFAULT_TIMEOUT, TransportConfig};
