//! Status command handler.

use owo_colors::OwoColorize;
use serde::Serialize;

use tannoy_core::{PlaybackState, Speaker};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Live state snapshot rendered by `tannoy status`.
#[derive(Serialize)]
struct StatusReport {
    available: bool,
    state: PlaybackState,
    volume_level: f64,
    playing: Vec<String>,
}

pub async fn handle(speaker: &Speaker, global: &GlobalOpts) -> Result<(), CliError> {
    // One listing drives the whole report; the fetch itself refreshes
    // the availability flag.
    let files = speaker.files().await?;

    let mut playing: Vec<String> = files
        .values()
        .filter(|f| f.is_playing())
        .map(|f| f.name.clone())
        .collect();
    playing.sort();

    let report = StatusReport {
        available: speaker.is_available(),
        state: if playing.is_empty() {
            PlaybackState::Idle
        } else {
            PlaybackState::Playing
        },
        volume_level: speaker.volume_level(),
        playing,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| format_detail(r, color),
        |r| r.state.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn format_detail(report: &StatusReport, color: bool) -> String {
    let availability = if report.available {
        if color {
            "available".green().to_string()
        } else {
            "available".to_owned()
        }
    } else if color {
        "unavailable".red().to_string()
    } else {
        "unavailable".to_owned()
    };

    let state = match (report.state, color) {
        (PlaybackState::Playing, true) => "playing".green().to_string(),
        (state, _) => state.to_string(),
    };

    let mut detail = format!(
        "Speaker:  {availability}\n\
         State:    {state}\n\
         Volume:   {:.0}%",
        report.volume_level * 100.0
    );
    if !report.playing.is_empty() {
        detail.push_str("\nPlaying:  ");
        detail.push_str(&report.playing.join(", "));
    }
    detail
}
