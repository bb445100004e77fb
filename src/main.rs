//! clipfetch - yt-dlp front-end
//!
//! Thin command-line surface over the invocation core: `download` builds a
//! request from persisted settings plus CLI overrides and runs the worker,
//! `analyze` lists the selectable formats for a URL.

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use clipfetch::downloader::{
    DownloadKind, DownloadRequest, DownloadRunner, FormatSelection, RunnerEvent, Session,
};
use clipfetch::extractor::{find_ytdlp, Extractor, FormatCatalog, YtDlpExtractor};
use clipfetch::utils::{AppSettings, ClipfetchError};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "clipfetch", version, about = "Download media via yt-dlp")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download a URL
    Download(DownloadArgs),
    /// Analyze a URL and list selectable formats
    Analyze {
        url: String,

        /// Path to the yt-dlp executable
        #[arg(long)]
        ytdlp: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DownloadArgs {
    url: String,

    /// What to fetch: audio, video or both
    #[arg(long)]
    kind: Option<DownloadKind>,

    /// Audio quality: highest, medium, low or a raw format id
    #[arg(long)]
    audio_quality: Option<String>,

    /// Video quality: highest, medium, low or a raw format id
    #[arg(long)]
    video_quality: Option<String>,

    /// Merge video and audio into a single mp4 (kind = both)
    #[arg(long, conflicts_with = "no_merge")]
    merge: bool,

    /// Keep video and audio as separate files (kind = both)
    #[arg(long)]
    no_merge: bool,

    /// Download location
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Netscape cookie file passed to yt-dlp
    #[arg(long)]
    cookies: Option<PathBuf>,

    /// Fragment-level parallelism
    #[arg(long)]
    concurrency: Option<u32>,

    /// Path to the yt-dlp executable
    #[arg(long)]
    ytdlp: Option<PathBuf>,

    /// Persist the effective options back to the settings file
    #[arg(long)]
    save_settings: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(AppSettings::default_path);
    let settings = AppSettings::load(&settings_path)?.sanitized();

    match cli.command {
        Command::Download(args) => run_download(args, settings, &settings_path).await,
        Command::Analyze { url, ytdlp } => run_analyze(&url, ytdlp, settings).await,
    }
}

async fn run_download(
    args: DownloadArgs,
    mut settings: AppSettings,
    settings_path: &std::path::Path,
) -> Result<()> {
    if let Some(kind) = args.kind {
        settings.download_kind = kind;
    }
    if let Some(quality) = &args.audio_quality {
        settings.audio_quality = quality.clone();
    }
    if let Some(quality) = &args.video_quality {
        settings.video_quality = quality.clone();
    }
    if args.merge {
        settings.merge_output = true;
    } else if args.no_merge {
        settings.merge_output = false;
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    if let Some(cookies) = &args.cookies {
        settings.cookie_file = Some(cookies.clone());
    }
    if let Some(concurrency) = args.concurrency {
        settings.concurrent_fragments = concurrency;
    }
    if let Some(ytdlp) = &args.ytdlp {
        settings.ytdlp_path = Some(ytdlp.clone());
    }
    let settings = settings.sanitized();

    let ytdlp =
        find_ytdlp(settings.ytdlp_path.as_deref()).ok_or(ClipfetchError::YtDlpNotFound)?;

    if args.save_settings {
        let mut persisted = settings.clone();
        persisted.ytdlp_path = Some(ytdlp.clone());
        persisted.save(settings_path)?;
        info!("settings saved to {}", settings_path.display());
    }

    let request = DownloadRequest {
        url: args.url,
        kind: settings.download_kind,
        audio_selection: parse_selection(&settings.audio_quality),
        video_selection: parse_selection(&settings.video_quality),
        merge_into_single_file: settings.merge_output,
        output_dir: settings.output_dir.clone(),
        cookie_file: settings.cookie_file.clone(),
        concurrent_fragments: settings.concurrent_fragments,
    };

    let session = Session::new();
    let _guard = session.begin_download()?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    // Log lines go to stdout; progress updates to stderr so piping the
    // log stays clean.
    let (events_tx, mut events_rx) = mpsc::channel::<RunnerEvent>(64);
    let printer = tokio::spawn(async move {
        let mut last_percent = None;
        while let Some(event) = events_rx.recv().await {
            match event {
                RunnerEvent::Log(line) => println!("{}", line),
                RunnerEvent::Progress(percent) => {
                    if last_percent != Some(percent) {
                        eprintln!("progress: {}%", percent);
                        last_percent = Some(percent);
                    }
                }
            }
        }
    });

    let runner = DownloadRunner::new(ytdlp);
    let outcome = runner.run(&request, &events_tx, &cancel).await;
    drop(events_tx);
    let _ = printer.await;

    if outcome.success {
        println!("{}", outcome.message);
        Ok(())
    } else {
        bail!(outcome.message)
    }
}

async fn run_analyze(url: &str, ytdlp: Option<PathBuf>, settings: AppSettings) -> Result<()> {
    let configured = ytdlp.or(settings.ytdlp_path);
    let ytdlp =
        find_ytdlp(configured.as_deref()).ok_or(ClipfetchError::YtDlpNotFound)?;

    let session = Session::new();
    let _guard = session.begin_analysis()?;

    let extractor = YtDlpExtractor::with_path(ytdlp);
    let info = extractor.extract_info(url).await?;

    println!("title: {}", info.title);
    if let Some(duration) = info.duration {
        println!("duration: {:.0}s", duration);
    }

    let catalog = FormatCatalog::from_video_info(&info);
    if catalog.is_empty() {
        println!("no separate audio/video streams reported; quality tiers still apply");
        return Ok(());
    }

    if !catalog.video.is_empty() {
        println!("video formats:");
        for format in &catalog.video {
            println!("  {:>8}  {}", format.format_id, FormatCatalog::video_label(format));
        }
    }
    if !catalog.audio.is_empty() {
        println!("audio formats:");
        for format in &catalog.audio {
            println!("  {:>8}  {}", format.format_id, FormatCatalog::audio_label(format));
        }
    }

    Ok(())
}

fn parse_selection(raw: &str) -> FormatSelection {
    raw.parse().unwrap_or_default()
}
