// ── Media resolution types ──
//
// A host application resolves an abstract media identifier into either a
// file already on local disk or a URL to stream from. `ResolvedMedia` is
// that contract; `fetch_remote` turns the URL case into a scoped temp
// file the upload path can consume. The temp file is deleted when the
// handle drops, on success and failure alike.

use std::io::Write;
use std::path::PathBuf;

use futures_util::StreamExt;
use tempfile::NamedTempFile;
use tracing::debug;
use url::Url;

use crate::error::CoreError;

const AUDIO_MPEG: &str = "audio/mpeg";

/// Where the resolved media bytes live.
#[derive(Debug, Clone)]
pub enum MediaLocation {
    Local(PathBuf),
    Remote(Url),
}

/// A media item resolved to a concrete location plus the display name it
/// will carry on the speaker. Names double as the dedup key for the
/// upload-if-absent check, so stable names make repeated plays cheap.
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    pub name: String,
    pub location: MediaLocation,
}

impl ResolvedMedia {
    /// Media already on local disk; the name defaults to the base name.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            location: MediaLocation::Local(path),
        }
    }

    /// Media behind a URL; the name defaults to the last path segment.
    pub fn remote(url: Url) -> Self {
        let name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_owned();
        Self {
            name,
            location: MediaLocation::Remote(url),
        }
    }

    /// Override the speaker-side file name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Download remote media into a temp file, gated on `Content-Type`.
///
/// The check happens before the first byte is written: a wrong content
/// type never produces a partial file on disk.
pub(crate) async fn fetch_remote(
    http: &reqwest::Client,
    url: &Url,
) -> Result<NamedTempFile, CoreError> {
    debug!(url = %url, "downloading media for upload");

    let host = url.host_str().unwrap_or_default().to_owned();
    let resp = http
        .get(url.clone())
        .send()
        .await
        .map_err(|e| CoreError::ConnectionFailed {
            host: host.clone(),
            reason: e.to_string(),
        })?;

    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(CoreError::OperationFailed {
            message: format!("status {status} when fetching media from {url}"),
        });
    }

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_owned())
        .unwrap_or_default();
    if content_type != AUDIO_MPEG {
        return Err(CoreError::ValidationFailed {
            message: format!("media at {url} is '{content_type}', not {AUDIO_MPEG}"),
        });
    }

    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile()?;
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| CoreError::ConnectionFailed {
            host: host.clone(),
            reason: e.to_string(),
        })?;
        file.write_all(&chunk)?;
    }
    file.flush()?;

    Ok(file)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn local_media_names_after_base_name() {
        let media = ResolvedMedia::local("/music/alerts/chime.mp3");
        assert_eq!(media.name, "chime.mp3");
    }

    #[test]
    fn remote_media_names_after_last_segment() {
        let url: Url = "http://10.0.0.2:8123/api/tts_proxy/abc123.mp3".parse().unwrap();
        let media = ResolvedMedia::remote(url);
        assert_eq!(media.name, "abc123.mp3");
    }

    #[test]
    fn named_overrides_the_default() {
        let media = ResolvedMedia::local("/tmp/dl-9912.mp3").named("doorbell.mp3");
        assert_eq!(media.name, "doorbell.mp3");
    }
}
