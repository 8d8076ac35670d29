//! Volume command handler.

use serde::Serialize;

use tannoy_core::Speaker;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Volume readout on the device's 0-10 scale plus the normalized level.
#[derive(Serialize)]
struct VolumeReport {
    volume: u8,
    volume_level: f64,
}

impl VolumeReport {
    fn from_level(level: f64) -> Self {
        Self {
            volume: (level * 10.0).round() as u8,
            volume_level: level,
        }
    }
}

pub async fn handle(
    speaker: &Speaker,
    level: Option<u8>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let report = match level {
        // Set: the device may clamp or round, so report what it confirmed.
        Some(level) => {
            if level > 10 {
                return Err(CliError::Validation {
                    field: "level".into(),
                    reason: format!("volume is 0-10, got {level}"),
                });
            }
            let confirmed = speaker.set_volume_level(f64::from(level) / 10.0).await?;
            VolumeReport::from_level(confirmed)
        }
        // Get: the cached value is fresh, connect just fetched it.
        None => VolumeReport::from_level(speaker.volume_level()),
    };

    let out = output::render_single(
        &global.output,
        &report,
        |r| format!("Volume: {}/10 ({:.0}%)", r.volume, r.volume_level * 100.0),
        |r| r.volume.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
