//! Progress line classification
//!
//! yt-dlp is invoked with `--newline`, so each progress update arrives as
//! its own line, e.g. `[download]  42.5% of ~150.00MiB at 5.20MiB/s`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker yt-dlp prefixes onto active download status lines
const DOWNLOAD_MARKER: &str = "[download]";

static PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*%").expect("hard-coded pattern"));

/// Classification of a single subprocess output line.
///
/// Every line is forwarded to the log sink regardless of classification;
/// this only decides whether the line additionally carries a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub is_progress_line: bool,
    pub percent: Option<u8>,
}

impl ProgressEvent {
    fn none() -> Self {
        Self {
            is_progress_line: false,
            percent: None,
        }
    }
}

/// Classify one output line. Pure; no side effects.
///
/// A candidate progress line must carry the download marker and a percent
/// sign. The first numeric token preceding a percent sign is truncated
/// toward zero and clamped to [0, 100].
pub fn classify_line(line: &str) -> ProgressEvent {
    if !line.contains(DOWNLOAD_MARKER) || !line.contains('%') {
        return ProgressEvent::none();
    }

    let percent = PERCENT_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|value| value.trunc().clamp(0.0, 100.0) as u8);

    ProgressEvent {
        is_progress_line: true,
        percent,
    }
}
