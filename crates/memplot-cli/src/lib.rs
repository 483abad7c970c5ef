//! Shared plumbing for the memplot binaries: error type, encoding argument
//! parsing, config merging, summary JSON export and viewer launch.

use std::path::Path;
use std::process::Command;

use memplot_config::validated::{PanelGeometry, ReportConfig};
use memplot_report::loader::Encoding;
use memplot_report::report::ChartGeometry;
use serde::Serialize;
use tracing::{debug, warn};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Report(#[from] memplot_report::ReportError),
    #[error(transparent)]
    Config(#[from] memplot_config::ConfigError),
    #[error("failed to write summary JSON: {path}")]
    SummaryJson {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// clap value parser for `--encoding`, accepting the common aliases
/// (`utf-8`, `utf8`, `utf-8-sig`, `utf-16`, `latin-1`, `iso-8859-1`, ...).
pub fn parse_encoding(s: &str) -> std::result::Result<Encoding, String> {
    s.parse::<Encoding>().map_err(|err| err.to_string())
}

/// Whether to launch a viewer: `--no-show` wins over the config default.
pub fn effective_show(config: &ReportConfig, no_show_flag: bool) -> bool {
    !no_show_flag && config.display.show
}

pub fn chart_geometry(panel: PanelGeometry) -> ChartGeometry {
    ChartGeometry {
        width_px: panel.width_px,
        height_px: panel.height_px,
    }
}

/// Write `payload` as pretty-printed JSON.
pub fn write_summary_json<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    std::fs::write(path, json).map_err(|source| CliError::SummaryJson {
        path: path.display().to_string(),
        source,
    })
}

/// UTC timestamp for exported summaries.
pub fn utc_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Thousands-separated integer rendering for console byte counts.
pub fn format_bytes_grouped(bytes: u64) -> String {
    let mut formatter = numfmt::Formatter::new()
        .precision(numfmt::Precision::Decimals(0))
        .separator(',')
        .unwrap_or_else(|_| numfmt::Formatter::new());
    formatter.fmt2(bytes as f64).to_string()
}

/// Open `path` in an image viewer, never failing the run.
///
/// `viewer` overrides the platform opener. The child is left running; the
/// process exits independently of it.
pub fn show_image(path: &Path, viewer: Option<&str>) {
    let mut command = match viewer {
        Some(viewer) => {
            let mut command = Command::new(viewer);
            command.arg(path);
            command
        }
        None => default_viewer_command(path),
    };

    match command.spawn() {
        Ok(_) => debug!(path = %path.display(), "launched image viewer"),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to launch image viewer");
        }
    }
}

#[cfg(target_os = "macos")]
fn default_viewer_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn default_viewer_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]);
    command.arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_viewer_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
