//! Per-session invocation guard
//!
//! One downloader subprocess and, separately, at most one analysis
//! subprocess may run at a time. A second start while one is in flight is
//! rejected rather than silently overlapped.

use crate::utils::error::ClipfetchError;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks which subprocess kinds are currently in flight.
#[derive(Debug, Default)]
pub struct Session {
    download_active: AtomicBool,
    analysis_active: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the download slot; fails if a download is already running.
    pub fn begin_download(&self) -> Result<SessionGuard<'_>, ClipfetchError> {
        Self::claim(&self.download_active, "download")
    }

    /// Claim the analysis slot; fails if an analysis is already running.
    pub fn begin_analysis(&self) -> Result<SessionGuard<'_>, ClipfetchError> {
        Self::claim(&self.analysis_active, "analysis")
    }

    fn claim<'a>(
        flag: &'a AtomicBool,
        label: &'static str,
    ) -> Result<SessionGuard<'a>, ClipfetchError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClipfetchError::SessionBusy(label))?;
        Ok(SessionGuard { flag })
    }
}

/// Releases the claimed slot on drop, including on panic or cancellation.
#[derive(Debug)]
pub struct SessionGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
