use crate::extractor::models::VideoInfo;
use anyhow::Result;
use async_trait::async_trait;

/// Seam isolating callers from the concrete analysis mechanism.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extracts video information without downloading
    async fn extract_info(&self, url: &str) -> Result<VideoInfo>;
}
