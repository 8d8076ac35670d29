// ── Speaker entity ──
//
// Owns one `SpeakerClient` plus the observable state a host UI consumes:
// availability, coarse playback state, and the cached device info that
// backs the volume level. All four network operations go through
// `guarded`, which layers the disconnect retry, the availability flag,
// and the re-login-on-auth-failure recovery around the raw client calls.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::RwLock;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use tannoy_api::{DeviceInfo, FileEntry, FileId, SpeakerClient, TransportConfig};

use crate::config::{DEFAULT_NAME, SpeakerConfig};
use crate::error::CoreError;
use crate::media::{self, MediaLocation, ResolvedMedia};
use crate::model::{MacAddress, PlaybackState, SpeakerIdentity};
use crate::retry::with_disconnect_retry;

/// A connected speaker.
///
/// Construction *is* session setup: [`connect`](Speaker::connect) logs in
/// and fetches device info, so an existing `Speaker` always had a valid
/// session at some point. Hosts serialize operations against one speaker;
/// the entity keeps no locks across awaits and relies on that contract.
#[derive(Debug)]
pub struct Speaker {
    client: SpeakerClient,
    /// Separate client without the per-call timeout, used only for
    /// streaming media downloads of unbounded size.
    media_http: reqwest::Client,
    identity: SpeakerIdentity,
    device_info: RwLock<DeviceInfo>,
    available: watch::Sender<bool>,
    state: watch::Sender<PlaybackState>,
}

impl Speaker {
    /// Open a session: login, fetch device info, derive identity.
    ///
    /// Error contract for setup: connection-level failures come back as
    /// [`CoreError::NotReady`] (retry setup later), credential rejection
    /// as [`CoreError::AuthRequired`] (re-prompt the user).
    pub async fn connect(config: SpeakerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = SpeakerClient::new(
            config.host.clone(),
            config.username.clone(),
            config.password.clone(),
            &transport,
        )?;

        client.login().await.map_err(|e| setup_error(&config.host, e))?;
        let info = client
            .device_info()
            .await
            .map_err(|e| setup_error(&config.host, e))?;

        let name = config.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_owned());
        let identity = SpeakerIdentity {
            unique_id: MacAddress::new(&info.mac),
            manufacturer: "Dahua",
            model: info.model.clone(),
            sw_version: info.version.clone(),
            name,
        };
        info!(
            host = %config.host,
            mac = %identity.unique_id,
            model = %identity.model,
            "connected to speaker"
        );

        let media_http = reqwest::Client::builder()
            .user_agent(concat!("tannoy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::Internal(format!("failed to build HTTP client: {e}")))?;

        let (available, _) = watch::channel(true);
        let (state, _) = watch::channel(PlaybackState::Idle);

        Ok(Self {
            client,
            media_http,
            identity,
            device_info: RwLock::new(info),
            available,
            state,
        })
    }

    /// End the session. The token is held in memory only, so dropping the
    /// speaker is the whole teardown; this exists to make the lifecycle
    /// explicit at call sites.
    pub fn close(self) {}

    // ── Identity / observable state ──────────────────────────────────

    pub fn identity(&self) -> &SpeakerIdentity {
        &self.identity
    }

    /// The host this speaker was connected through.
    pub fn host(&self) -> &str {
        self.client.host()
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn unique_id(&self) -> &MacAddress {
        &self.identity.unique_id
    }

    /// Snapshot of the cached device info (taken at connect, volume kept
    /// current by [`set_volume_level`](Self::set_volume_level)).
    pub fn device_info(&self) -> DeviceInfo {
        self.device_info
            .read()
            .expect("device info lock poisoned")
            .clone()
    }

    /// Volume normalized to `0.0..=1.0` from the device's 0-10 scale.
    pub fn volume_level(&self) -> f64 {
        let volume = self
            .device_info
            .read()
            .expect("device info lock poisoned")
            .volume;
        volume as f64 / 10.0
    }

    pub fn is_available(&self) -> bool {
        *self.available.borrow()
    }

    pub fn playback_state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    /// Subscribe to availability transitions.
    pub fn subscribe_availability(&self) -> watch::Receiver<bool> {
        self.available.subscribe()
    }

    /// Subscribe to playback-state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the current file listing.
    pub async fn files(&self) -> Result<HashMap<String, FileEntry>, CoreError> {
        self.guarded(|| self.client.list_files()).await
    }

    /// Poll the speaker and update playback state and availability.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let files = self.files().await?;
        let state = if files.values().any(FileEntry::is_playing) {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        };
        self.state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        Ok(())
    }

    /// Set the volume from a normalized `0.0..=1.0` level and return the
    /// normalized level the device confirmed (it may clamp or round).
    pub async fn set_volume_level(&self, level: f64) -> Result<f64, CoreError> {
        if !(0.0..=1.0).contains(&level) {
            return Err(CoreError::ValidationFailed {
                message: format!("volume level {level} is outside 0.0..=1.0"),
            });
        }
        let target = (level * 10.0).round() as u8;
        let confirmed = self.guarded(|| self.client.set_volume(target)).await?;
        self.device_info
            .write()
            .expect("device info lock poisoned")
            .volume = i64::from(confirmed);
        Ok(f64::from(confirmed) / 10.0)
    }

    /// Upload a local MP3 without playing it.
    pub async fn upload(
        &self,
        path: &std::path::Path,
        name: Option<&str>,
    ) -> Result<FileEntry, CoreError> {
        self.guarded(|| self.client.upload_file(path, name)).await
    }

    /// Play resolved media, uploading it first only if the speaker does
    /// not already hold a file of the same name.
    ///
    /// Remote media is streamed to a temp file that is removed on every
    /// exit path. The speaker is never asked to delete old files; the
    /// dedup-by-name check is what keeps repeated plays from re-uploading.
    pub async fn play(&self, media: &ResolvedMedia) -> Result<(), CoreError> {
        let mut downloaded: Option<tempfile::NamedTempFile> = None;
        let path: PathBuf = match &media.location {
            MediaLocation::Local(path) => {
                if path.extension().and_then(|e| e.to_str()) != Some("mp3") {
                    return Err(CoreError::ValidationFailed {
                        message: format!(
                            "{} is not an MP3; the speaker only accepts MP3 files",
                            path.display()
                        ),
                    });
                }
                path.clone()
            }
            MediaLocation::Remote(url) => {
                let file = media::fetch_remote(&self.media_http, url).await?;
                let path = file.path().to_path_buf();
                downloaded = Some(file);
                path
            }
        };

        let files = self.files().await?;
        let id: FileId = match files.get(&media.name) {
            Some(entry) => entry.id.clone(),
            None => {
                debug!(name = %media.name, "file not on speaker yet, uploading");
                self.guarded(|| self.client.upload_file(&path, Some(&media.name)))
                    .await?
                    .id
            }
        };

        self.guarded(|| self.client.play_file(&id)).await?;

        drop(downloaded);
        Ok(())
    }

    /// Play a file that already lives on the speaker, by name.
    pub async fn play_existing(&self, name: &str) -> Result<(), CoreError> {
        let files = self.files().await?;
        let entry = files.get(name).ok_or_else(|| CoreError::MediaNotFound {
            identifier: name.to_owned(),
        })?;
        self.guarded(|| self.client.play_file(&entry.id)).await
    }

    // ── Operation guard ──────────────────────────────────────────────

    /// Wrap one client operation with the caller-side policies:
    /// disconnect retry, availability tracking, re-login on auth failure.
    async fn guarded<T, F, Fut>(&self, mut op: F) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, tannoy_api::Error>>,
    {
        let result = match with_disconnect_retry(&mut op).await {
            Err(err) if err.is_auth() => {
                warn!(host = self.client.host(), "session token rejected, logging in again");
                match self.client.login().await {
                    Ok(()) => op().await,
                    Err(login_err) => Err(login_err),
                }
            }
            result => result,
        };

        match result {
            Ok(value) => {
                self.set_available(true);
                Ok(value)
            }
            Err(err) => {
                if err.is_connect() && !err.is_server_disconnect() {
                    if self.is_available() {
                        error!("connection error: {err}");
                    }
                    self.set_available(false);
                }
                Err(err.into())
            }
        }
    }

    fn set_available(&self, value: bool) {
        self.available.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}

/// Map a setup-time client failure onto the connect contract.
fn setup_error(host: &str, err: tannoy_api::Error) -> CoreError {
    if err.is_auth() {
        CoreError::AuthRequired {
            message: err.to_string(),
        }
    } else if err.is_connect() {
        CoreError::NotReady {
            host: host.to_owned(),
            reason: err.to_string(),
        }
    } else {
        err.into()
    }
}
