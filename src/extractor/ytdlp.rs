//! yt-dlp wrapper for video analysis
//!
//! Invokes `yt-dlp <url> --dump-json` and parses the single JSON document
//! it prints. Also hosts binary discovery: configured path first, then
//! PATH, then common installation locations.

use crate::extractor::models::VideoInfo;
use crate::extractor::traits::Extractor;
use crate::utils::error::ClipfetchError;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, info, warn};

/// Metadata extractor backed by the yt-dlp executable
pub struct YtDlpExtractor {
    ytdlp_path: PathBuf,
}

impl YtDlpExtractor {
    /// Initialize with a known executable path (e.g. from settings).
    pub fn with_path(ytdlp_path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
        }
    }

    /// Initialize by discovering yt-dlp.
    pub fn new() -> Result<Self> {
        match find_ytdlp(None) {
            Some(path) => {
                info!("found yt-dlp at {}", path.display());
                Ok(Self { ytdlp_path: path })
            }
            None => Err(ClipfetchError::YtDlpNotFound.into()),
        }
    }

    pub fn ytdlp_path(&self) -> &PathBuf {
        &self.ytdlp_path
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    /// Extract video information without downloading.
    ///
    /// Analysis failures are reported as [`ClipfetchError::AnalyzeError`]
    /// so callers can keep their current quality selections instead of
    /// resetting them.
    async fn extract_info(&self, url: &str) -> Result<VideoInfo> {
        debug!("analyzing url: {}", url);

        let output = AsyncCommand::new(&self.ytdlp_path)
            .arg(url)
            .arg("--dump-json")
            .output()
            .await
            .map_err(|e| ClipfetchError::AnalyzeError(format!("failed to launch yt-dlp: {}", e)))?;

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipfetchError::AnalyzeError(format!(
                "yt-dlp exited with code {}: {}",
                code,
                stderr.trim()
            ))
            .into());
        }

        let json = String::from_utf8_lossy(&output.stdout);
        let info: VideoInfo = serde_json::from_str(json.trim()).map_err(|e| {
            ClipfetchError::AnalyzeError(format!("malformed metadata document: {}", e))
        })?;

        Ok(info)
    }
}

/// Find the yt-dlp binary.
///
/// Search order: configured path, PATH lookup, common install locations.
pub fn find_ytdlp(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        warn!("configured yt-dlp path does not exist: {}", path.display());
    }

    if let Ok(path) = which::which("yt-dlp") {
        return Some(path);
    }

    find_in_common_paths()
}

fn find_in_common_paths() -> Option<PathBuf> {
    let common_paths = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        "~/.local/bin/yt-dlp",
    ];

    for path_str in common_paths {
        let expanded = if let Some(rest) = path_str.strip_prefix("~/") {
            dirs::home_dir()?.join(rest)
        } else {
            PathBuf::from(path_str)
        };

        if expanded.exists() {
            return Some(expanded);
        }
    }

    None
}
