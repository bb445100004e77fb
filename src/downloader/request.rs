//! Download request model
//!
//! A [`DownloadRequest`] is assembled from settings and user input
//! immediately before each invocation and discarded when the subprocess
//! terminates. It carries everything the worker needs so the worker never
//! reaches back into shared state.

use crate::utils::error::ClipfetchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// What to fetch from the source URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadKind {
    AudioOnly,
    VideoOnly,
    Both,
}

impl DownloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadKind::AudioOnly => "audio",
            DownloadKind::VideoOnly => "video",
            DownloadKind::Both => "both",
        }
    }
}

impl FromStr for DownloadKind {
    type Err = ClipfetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(DownloadKind::AudioOnly),
            "video" => Ok(DownloadKind::VideoOnly),
            "both" => Ok(DownloadKind::Both),
            other => Err(ClipfetchError::InvalidRequest(format!(
                "unknown download kind '{}' (expected audio, video or both)",
                other
            ))),
        }
    }
}

/// Named quality tiers retained for backward compatibility with older
/// configuration data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    Highest,
    Medium,
    Low,
}

/// How a stream is selected for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSelection {
    /// A concrete format id from a prior analysis step, passed through
    /// verbatim (e.g. `"137"`).
    Resolved(String),
    /// Legacy named tier, mapped to a fixed filter expression.
    Preset(QualityTier),
    /// No selection made; resolves like `Preset(Highest)`.
    Auto,
}

impl Default for FormatSelection {
    fn default() -> Self {
        FormatSelection::Auto
    }
}

impl FromStr for FormatSelection {
    type Err = std::convert::Infallible;

    /// Tier names map to presets; anything else is treated as a raw
    /// format id or filter expression and passed through verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let selection = match s.trim() {
            "" => FormatSelection::Auto,
            "highest" => FormatSelection::Preset(QualityTier::Highest),
            "medium" => FormatSelection::Preset(QualityTier::Medium),
            "low" => FormatSelection::Preset(QualityTier::Low),
            other => FormatSelection::Resolved(other.to_string()),
        };
        Ok(selection)
    }
}

/// Aggregate input to the argument builder.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub kind: DownloadKind,
    /// Relevant only when `kind` includes audio
    pub audio_selection: FormatSelection,
    /// Relevant only when `kind` includes video
    pub video_selection: FormatSelection,
    /// Relevant only when `kind` is `Both`
    pub merge_into_single_file: bool,
    pub output_dir: PathBuf,
    /// Emitted only when the referenced file exists at build time
    pub cookie_file: Option<PathBuf>,
    pub concurrent_fragments: u32,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, kind: DownloadKind) -> Self {
        Self {
            url: url.into(),
            kind,
            audio_selection: FormatSelection::Auto,
            video_selection: FormatSelection::Auto,
            merge_into_single_file: true,
            output_dir: PathBuf::new(),
            cookie_file: None,
            concurrent_fragments: 1,
        }
    }

    /// Precondition checks performed before anything is spawned.
    pub fn validate(&self) -> Result<(), ClipfetchError> {
        if self.url.trim().is_empty() {
            return Err(ClipfetchError::InvalidRequest("URL is empty".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ClipfetchError::InvalidRequest(
                "output directory is not set".to_string(),
            ));
        }
        if self.concurrent_fragments < 1 {
            return Err(ClipfetchError::InvalidRequest(
                "concurrent fragments must be at least 1".to_string(),
            ));
        }
        if let Some(cookie) = &self.cookie_file {
            if !cookie.exists() {
                return Err(ClipfetchError::InvalidRequest(format!(
                    "cookie file does not exist: {}",
                    cookie.display()
                )));
            }
        }
        Ok(())
    }
}
