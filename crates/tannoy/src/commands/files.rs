//! File listing command handler.

use tabled::Tabled;

use tannoy_core::{FileEntry, Speaker};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&FileEntry> for FileRow {
    fn from(entry: &FileEntry) -> Self {
        Self {
            name: entry.name.clone(),
            id: entry.id.to_string(),
            status: if entry.is_playing() { "playing" } else { "" },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(speaker: &Speaker, global: &GlobalOpts) -> Result<(), CliError> {
    let files = speaker.files().await?;

    let mut entries: Vec<FileEntry> = files.into_values().collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let out = output::render_list(&global.output, &entries, |e| FileRow::from(e), |e| e.name.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
