//! Error handling for clipfetch

use thiserror::Error;

/// Main error type for clipfetch
#[derive(Debug, Error)]
pub enum ClipfetchError {
    #[error("yt-dlp not found. Set the executable path or install yt-dlp")]
    YtDlpNotFound,

    #[error("Invalid download request: {0}")]
    InvalidRequest(String),

    #[error("Failed to analyze video: {0}")]
    AnalyzeError(String),

    #[error("Another {0} is already running")]
    SessionBusy(&'static str),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
