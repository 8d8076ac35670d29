//! Device info command handler.

use serde::Serialize;

use tannoy_core::Speaker;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Identity snapshot rendered by `tannoy info`.
#[derive(Serialize)]
struct InfoReport {
    name: String,
    host: String,
    mac: String,
    model: String,
    version: String,
    volume: i64,
}

pub fn handle(speaker: &Speaker, global: &GlobalOpts) -> Result<(), CliError> {
    let identity = speaker.identity();
    let device = speaker.device_info();

    let report = InfoReport {
        name: identity.name.clone(),
        host: speaker.host().to_owned(),
        mac: identity.unique_id.to_string(),
        model: identity.model.clone(),
        version: identity.sw_version.clone(),
        volume: device.volume,
    };

    let out = output::render_single(
        &global.output,
        &report,
        |r| {
            format!(
                "Name:     {}\n\
                 Host:     {}\n\
                 MAC:      {}\n\
                 Model:    {}\n\
                 Firmware: {}\n\
                 Volume:   {}/10",
                r.name, r.host, r.mac, r.model, r.version, r.volume
            )
        },
        |r| r.mac.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
