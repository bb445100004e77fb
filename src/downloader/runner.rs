//! Subprocess orchestration for yt-dlp downloads
//!
//! Launches yt-dlp with the synthesized argument list, merges stderr into
//! the stdout line stream, relays every line to the caller, extracts
//! percentages for progress updates, and maps process exit to a
//! success/failure outcome. Nothing escapes the worker boundary as a raw
//! error.

use crate::downloader::args::build_args;
use crate::downloader::progress::classify_line;
use crate::downloader::request::DownloadRequest;
use crate::utils::error::ClipfetchError;
use anyhow::Result;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as AsyncCommand;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Events emitted while a download runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerEvent {
    /// One verbatim output line; every non-empty line is relayed,
    /// progress-bearing or not.
    Log(String),
    /// Percentage extracted from a progress line.
    Progress(u8),
}

/// Terminal result of one invocation, reported at the worker boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub success: bool,
    pub message: String,
}

impl DownloadOutcome {
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Runs yt-dlp download invocations.
pub struct DownloadRunner {
    ytdlp_path: PathBuf,
}

impl DownloadRunner {
    pub fn new(ytdlp_path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
        }
    }

    pub fn ytdlp_path(&self) -> &PathBuf {
        &self.ytdlp_path
    }

    /// Preconditions checked before anything is spawned.
    pub fn preflight(&self, request: &DownloadRequest) -> Result<(), ClipfetchError> {
        if self.ytdlp_path.as_os_str().is_empty() || !self.ytdlp_path.exists() {
            return Err(ClipfetchError::YtDlpNotFound);
        }
        request.validate()
    }

    /// Run one download to completion.
    ///
    /// All failure modes fold into a [`DownloadOutcome`]; the events
    /// channel receives every output line plus progress updates. The
    /// cancellation token is honored between output lines.
    pub async fn run(
        &self,
        request: &DownloadRequest,
        events: &mpsc::Sender<RunnerEvent>,
        cancel: &CancellationToken,
    ) -> DownloadOutcome {
        if let Err(e) = self.preflight(request) {
            return DownloadOutcome::failed(e.to_string());
        }

        match self.execute(request, events, cancel).await {
            Ok(outcome) => outcome,
            Err(e) => DownloadOutcome::failed(format!("download error: {}", e)),
        }
    }

    async fn execute(
        &self,
        request: &DownloadRequest,
        events: &mpsc::Sender<RunnerEvent>,
        cancel: &CancellationToken,
    ) -> Result<DownloadOutcome> {
        let argv = build_args(&self.ytdlp_path, request);
        debug!("spawning downloader: {}", argv.join(" "));
        self.emit(events, RunnerEvent::Log(format!("running: {}", argv.join(" "))))
            .await;

        let mut child = AsyncCommand::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // stderr is folded into the same line stream as stdout so the
        // caller sees one merged log, matching the downloader's own
        // interleaving as closely as two pipes allow.
        let (line_tx, mut line_rx) = mpsc::channel::<String>(64);
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(relay_lines(stdout, line_tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(relay_lines(stderr, line_tx.clone()));
        }
        drop(line_tx);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    if let Err(e) = child.kill().await {
                        warn!("failed to kill downloader after cancel: {}", e);
                    }
                    self.emit(events, RunnerEvent::Log("download cancelled".to_string())).await;
                    return Ok(DownloadOutcome::failed("download cancelled"));
                }
                line = line_rx.recv() => {
                    let Some(line) = line else { break };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let event = classify_line(line);
                    if let Some(percent) = event.percent {
                        self.emit(events, RunnerEvent::Progress(percent)).await;
                    }
                    self.emit(events, RunnerEvent::Log(line.to_string())).await;
                }
            }
        }

        let status = child.wait().await?;
        debug!("downloader exited with {:?}", status.code());

        let outcome = match status.code() {
            Some(0) => DownloadOutcome::completed("download complete"),
            Some(code) => DownloadOutcome::failed(format!("downloader exited with code {}", code)),
            None => DownloadOutcome::failed("downloader terminated by signal"),
        };
        Ok(outcome)
    }

    async fn emit(&self, events: &mpsc::Sender<RunnerEvent>, event: RunnerEvent) {
        // A dropped receiver means the front-end went away; the download
        // itself keeps running to completion.
        if events.send(event).await.is_err() {
            warn!("runner event receiver dropped");
        }
    }
}

async fn relay_lines<R: AsyncRead + Unpin>(reader: R, tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line).await.is_err() {
            break;
        }
    }
}
