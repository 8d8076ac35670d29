// Program (audio file) endpoints
//
// The speaker stores uploaded audio as "programs": list via
// `program/info`, upload via multipart `program/upload`, start playback
// via `program/start`. The firmware accepts MP3 only and never deletes
// files on its own.

use std::collections::HashMap;
use std::path::Path;

use serde_json::json;
use tracing::debug;

use crate::client::{SpeakerClient, decode, take_data};
use crate::error::Error;
use crate::models::{FileEntry, FileId, FileListData};

const AUDIO_MPEG: &str = "audio/mpeg";

impl SpeakerClient {
    /// Fetch the current file listing as a name-keyed snapshot.
    ///
    /// `GET /prod-api/program/info`
    ///
    /// Names are unique per snapshot; there is no incremental variant,
    /// every call returns the full list.
    pub async fn list_files(&self) -> Result<HashMap<String, FileEntry>, Error> {
        let url = self.api_url("program/info");
        debug!("fetching file list");
        let body = self.get(url, "fetching file list").await?;
        let data = take_data(body);
        let data: FileListData = if data.is_null() {
            FileListData::default()
        } else {
            decode(data)?
        };
        Ok(data
            .files
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect())
    }

    /// Upload a local MP3 to the speaker and return its file entry.
    ///
    /// `POST /prod-api/program/upload` (multipart, field `file`)
    ///
    /// The effective name is `name` when given, else the path's base
    /// name. Preconditions (checked before any network I/O): the file
    /// exists and its content type resolves to `audio/mpeg`. The upload
    /// is unconditional; the speaker keeps duplicates, so callers that
    /// want dedup must consult [`list_files`](Self::list_files) first.
    ///
    /// The firmware silently discards uploads it dislikes while still
    /// answering 200, so the listing is re-fetched once afterwards and
    /// the absence of the expected name is an error.
    pub async fn upload_file(&self, path: &Path, name: Option<&str>) -> Result<FileEntry, Error> {
        if !path.exists() {
            return Err(Error::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.essence_str() != AUDIO_MPEG {
            return Err(Error::UnsupportedMedia {
                path: path.to_path_buf(),
            });
        }

        let name = match name {
            Some(n) => n.to_owned(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        debug!(name = %name, "pushing file to speaker");
        let bytes = tokio::fs::read(path).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(name.clone())
            .mime_str(AUDIO_MPEG)
            .map_err(|e| self.connect_error("pushing file", e))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.api_url("program/upload");
        self.post_multipart(url, form, "pushing file").await?;

        // One verification read: the listing is expected to be
        // immediately consistent after a successful upload.
        let mut files = self.list_files().await?;
        files
            .remove(&name)
            .ok_or(Error::UploadMissing { name })
    }

    /// Start playback of a file by its device-assigned identifier.
    ///
    /// `POST /prod-api/program/start`
    ///
    /// Fire-and-forget: the speaker reports no playback confirmation.
    /// Callers observe the async playback state later through
    /// [`list_files`](Self::list_files) and `FileEntry::is_playing`.
    pub async fn play_file(&self, id: &FileId) -> Result<(), Error> {
        let url = self.api_url("program/start");
        debug!(%id, "starting playback");
        self.post(url, &json!({ "id": id }), "starting playback")
            .await?;
        Ok(())
    }
}
