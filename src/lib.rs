//! clipfetch library

pub mod downloader;
pub mod extractor;
pub mod utils;

// Re-export main types for easier use
pub use downloader::{
    build_args, classify_line, DownloadKind, DownloadOutcome, DownloadRequest, DownloadRunner,
    FormatSelection, ProgressEvent, QualityTier, RunnerEvent, Session,
};
pub use extractor::{find_ytdlp, Extractor, FormatCatalog, MediaFormat, VideoInfo, YtDlpExtractor};
pub use utils::{AppSettings, ClipfetchError};
