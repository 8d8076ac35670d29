//! Upload command handler.

use std::path::Path;

use tannoy_core::Speaker;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    speaker: &Speaker,
    path: &Path,
    name: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entry = speaker.upload(path, name.as_deref()).await?;

    let out = output::render_single(
        &global.output,
        &entry,
        |e| format!("Uploaded '{}' (id {})", e.name, e.id),
        |e| e.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
