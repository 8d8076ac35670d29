// Device endpoints
//
// Identity/capability read via `device/info` and the generic scalar
// property edit via `device/edit`. Volume is the only property the rest
// of the stack sets today, but `set_property` is property-agnostic.

use serde_json::Value;
use tracing::debug;

use crate::client::{SpeakerClient, decode, take_data};
use crate::error::Error;
use crate::models::{DeviceInfo, VOLUME_KEY};

impl SpeakerClient {
    /// Fetch device identity and capability data.
    ///
    /// `GET /prod-api/device/info`
    ///
    /// Requires a prior successful [`login`](Self::login); the speaker
    /// rejects a missing or expired token with an auth error code.
    pub async fn device_info(&self) -> Result<DeviceInfo, Error> {
        let url = self.api_url("device/info");
        debug!("fetching device info");
        let body = self.get(url, "fetching device info").await?;
        decode(take_data(body))
    }

    /// Set a single named scalar property and return the value the
    /// speaker confirmed.
    ///
    /// `POST /prod-api/device/edit`
    ///
    /// The speaker echoes the applied value at the *top level* of the
    /// response body (it may clamp or round the requested one). When the
    /// echo is absent the requested value is returned unchanged.
    pub async fn set_property(&self, name: &str, value: Value) -> Result<Value, Error> {
        let url = self.api_url("device/edit");
        debug!(property = name, "editing device property");

        let mut payload = serde_json::Map::new();
        payload.insert(name.to_owned(), value.clone());

        let body = self
            .post(url, &Value::Object(payload), "editing device property")
            .await?;
        Ok(body.get(name).cloned().unwrap_or(value))
    }

    /// Set the output volume (0-10) and return the device-confirmed level.
    ///
    /// Callers must use the returned value, not the requested one: the
    /// speaker clamps out-of-range values silently.
    pub async fn set_volume(&self, volume: u8) -> Result<u8, Error> {
        let echoed = self.set_property(VOLUME_KEY, Value::from(volume)).await?;
        Ok(echoed
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .unwrap_or(volume))
    }
}
