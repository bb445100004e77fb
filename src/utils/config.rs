//! Application configuration
//!
//! Settings are read once at startup and written back only on explicit
//! save. Workers never read them directly; the values are copied into a
//! [`DownloadRequest`](crate::downloader::DownloadRequest) before launch.

use crate::downloader::DownloadKind;
use crate::utils::error::ClipfetchError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Path to the yt-dlp executable; `None` means "discover"
    pub ytdlp_path: Option<PathBuf>,

    /// Download location
    pub output_dir: PathBuf,

    /// Netscape cookie file handed to yt-dlp
    pub cookie_file: Option<PathBuf>,

    /// Last-used download kind
    pub download_kind: DownloadKind,

    /// Last-used audio quality (tier name or raw format id)
    pub audio_quality: String,

    /// Last-used video quality (tier name or raw format id)
    pub video_quality: String,

    /// Merge video and audio into a single mp4 when both are fetched
    pub merge_output: bool,

    /// Fragment-level parallelism passed to yt-dlp
    pub concurrent_fragments: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from("./downloads")),
            cookie_file: None,
            download_kind: DownloadKind::Both,
            audio_quality: "highest".to_string(),
            video_quality: "highest".to_string(),
            merge_output: true,
            concurrent_fragments: 4,
        }
    }
}

impl AppSettings {
    /// Default settings file location: `<config dir>/clipfetch/settings.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clipfetch")
            .join("settings.json")
    }

    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<Self, ClipfetchError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&raw)?;
        Ok(settings)
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ClipfetchError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Enforce sane minimums on values read from disk.
    pub fn sanitized(mut self) -> Self {
        if self.concurrent_fragments == 0 {
            self.concurrent_fragments = 1;
        }
        self
    }
}
