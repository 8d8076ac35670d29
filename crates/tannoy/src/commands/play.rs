//! Play command handler.
//!
//! The TARGET argument is deliberately loose: an `http(s)` URL streams
//! through a temp file, an existing local path uploads directly, and
//! anything else is taken as the name of a file already on the speaker.

use std::path::Path;

use tannoy_core::{ResolvedMedia, Speaker};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn handle(
    speaker: &Speaker,
    target: &str,
    name: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let media = resolve_target(target)?;

    match media {
        Some(mut media) => {
            if let Some(name) = name {
                media = media.named(name);
            }
            speaker.play(&media).await?;
            if !global.quiet {
                eprintln!("Playing '{}'", media.name);
            }
        }
        // Not a URL and not a local file: a name on the speaker.
        None => {
            if name.is_some() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "--name only applies when uploading; the target is already a \
                             speaker-side file name"
                        .into(),
                });
            }
            speaker.play_existing(target).await?;
            if !global.quiet {
                eprintln!("Playing '{target}'");
            }
        }
    }

    Ok(())
}

/// Classify the play target. `None` means "a file name on the speaker".
fn resolve_target(target: &str) -> Result<Option<ResolvedMedia>, CliError> {
    if target.starts_with("http://") || target.starts_with("https://") {
        let url: url::Url = target.parse().map_err(|_| CliError::Validation {
            field: "target".into(),
            reason: format!("invalid URL: {target}"),
        })?;
        return Ok(Some(ResolvedMedia::remote(url)));
    }

    let path = Path::new(target);
    if path.exists() {
        return Ok(Some(ResolvedMedia::local(path)));
    }

    Ok(None)
}
