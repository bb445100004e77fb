//! yt-dlp argument synthesis
//!
//! Token order is a fixed wire contract with yt-dlp and with tooling that
//! inspects our invocations; do not reorder.

use crate::downloader::request::{DownloadKind, DownloadRequest, FormatSelection, QualityTier};
use std::path::Path;

/// yt-dlp output template appended to the chosen directory
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Which stream a filter expression selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Media {
    Audio,
    Video,
}

/// Build the full token sequence for one yt-dlp invocation, executable
/// path first. Pure and total over a validated request.
pub fn build_args(ytdlp: &Path, request: &DownloadRequest) -> Vec<String> {
    let mut args: Vec<String> = vec![
        ytdlp.to_string_lossy().into_owned(),
        request.url.clone(),
        "--concurrent-fragments".to_string(),
        request.concurrent_fragments.to_string(),
    ];

    if !request.output_dir.as_os_str().is_empty() {
        args.push("-o".to_string());
        args.push(
            request
                .output_dir
                .join(OUTPUT_TEMPLATE)
                .to_string_lossy()
                .into_owned(),
        );
    }

    push_format_args(&mut args, request);

    // The cookie flag is emitted only when the file is actually there;
    // a configured-but-missing path is a precondition error upstream.
    if let Some(cookie) = &request.cookie_file {
        if cookie.exists() {
            args.push("--cookies".to_string());
            args.push(cookie.to_string_lossy().into_owned());
        }
    }

    args.push("--newline".to_string());
    args.push("--no-check-certificate".to_string());

    args
}

/// Kind-specific format tokens. Exactly one branch runs per request.
fn push_format_args(args: &mut Vec<String>, request: &DownloadRequest) {
    match request.kind {
        DownloadKind::AudioOnly => {
            args.push("-x".to_string());
            args.push("--audio-format".to_string());
            args.push("mp3".to_string());
        }
        DownloadKind::VideoOnly => {
            args.push("-f".to_string());
            args.push(resolve_selection(&request.video_selection, Media::Video, true));
        }
        DownloadKind::Both => {
            if request.merge_into_single_file {
                args.push("-f".to_string());
                args.push(resolve_selection(&request.video_selection, Media::Video, true));
                args.push("--merge-output-format".to_string());
                args.push("mp4".to_string());
            } else {
                // Comma join: two separate output files, unlike the
                // plus-joined combined-stream expression.
                let video = resolve_selection(&request.video_selection, Media::Video, false);
                let audio = resolve_selection(&request.audio_selection, Media::Audio, false);
                args.push("-f".to_string());
                args.push(format!("{},{}", video, audio));
            }
        }
    }
}

/// Map a selection to a single yt-dlp filter expression.
///
/// `combined` picks the video expression that bundles best-audio behind a
/// `+ba/b` fallback; standalone video expressions select the video stream
/// alone.
fn resolve_selection(selection: &FormatSelection, media: Media, combined: bool) -> String {
    let tier = match selection {
        FormatSelection::Resolved(id) => return id.clone(),
        FormatSelection::Preset(tier) => *tier,
        FormatSelection::Auto => QualityTier::Highest,
    };

    let expr = match (media, combined, tier) {
        (Media::Video, true, QualityTier::Highest) => "bv*+ba/b",
        (Media::Video, true, QualityTier::Medium) => "bv*[height<=720]+ba/b",
        (Media::Video, true, QualityTier::Low) => "bv*[height<=480]+ba/b",
        (Media::Video, false, QualityTier::Highest) => "bv*",
        (Media::Video, false, QualityTier::Medium) => "bv*[height<=720]",
        (Media::Video, false, QualityTier::Low) => "bv*[height<=480]",
        (Media::Audio, _, QualityTier::Highest) => "ba",
        (Media::Audio, _, QualityTier::Medium) => "ba[abr<=128]",
        (Media::Audio, _, QualityTier::Low) => "ba[abr<=64]",
    };
    expr.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request(kind: DownloadKind) -> DownloadRequest {
        let mut request = DownloadRequest::new("https://example.com/watch?v=abc", kind);
        request.output_dir = PathBuf::from("/downloads");
        request.concurrent_fragments = 4;
        request
    }

    fn build(request: &DownloadRequest) -> Vec<String> {
        build_args(Path::new("/usr/bin/yt-dlp"), request)
    }

    fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        let idx = args.iter().position(|a| a == flag)?;
        args.get(idx + 1).map(|s| s.as_str())
    }

    #[test]
    fn test_executable_then_url_lead_the_tokens() {
        let args = build(&request(DownloadKind::Both));
        assert_eq!(args[0], "/usr/bin/yt-dlp");
        assert_eq!(args[1], "https://example.com/watch?v=abc");
    }

    #[test]
    fn test_trailer_flags_close_the_tokens() {
        let args = build(&request(DownloadKind::Both));
        assert_eq!(&args[args.len() - 2..], ["--newline", "--no-check-certificate"]);
    }

    #[test]
    fn test_concurrency_flag_appears_exactly_once() {
        let mut req = request(DownloadKind::Both);
        req.concurrent_fragments = 8;
        let args = build(&req);
        assert_eq!(flag_value(&args, "--concurrent-fragments"), Some("8"));
        assert_eq!(args.iter().filter(|a| *a == "--concurrent-fragments").count(), 1);
    }

    #[test]
    fn test_output_template_joins_directory() {
        let args = build(&request(DownloadKind::Both));
        assert_eq!(flag_value(&args, "-o"), Some("/downloads/%(title)s.%(ext)s"));
    }

    #[test]
    fn test_output_flag_omitted_without_directory() {
        let mut req = request(DownloadKind::Both);
        req.output_dir = PathBuf::new();
        let args = build(&req);
        assert!(!args.iter().any(|a| a == "-o"));
    }

    #[test]
    fn test_audio_only_extracts_mp3_and_never_uses_f() {
        let args = build(&request(DownloadKind::AudioOnly));
        let x = args.iter().position(|a| a == "-x").expect("-x present");
        let fmt = args
            .iter()
            .position(|a| a == "--audio-format")
            .expect("--audio-format present");
        assert!(x < fmt);
        assert_eq!(args[fmt + 1], "mp3");
        assert!(!args.iter().any(|a| a == "-f"));
    }

    #[test]
    fn test_audio_only_ignores_selections() {
        let mut req = request(DownloadKind::AudioOnly);
        req.audio_selection = FormatSelection::Resolved("140".to_string());
        req.video_selection = FormatSelection::Resolved("137".to_string());
        let args = build(&req);
        assert!(!args.iter().any(|a| a == "140" || a == "137"));
    }

    #[test]
    fn test_video_only_medium_preset_uses_combined_expression() {
        let mut req = request(DownloadKind::VideoOnly);
        req.video_selection = FormatSelection::Preset(QualityTier::Medium);
        let args = build(&req);
        assert_eq!(flag_value(&args, "-f"), Some("bv*[height<=720]+ba/b"));
    }

    #[test]
    fn test_video_only_auto_defaults_to_highest() {
        let args = build(&request(DownloadKind::VideoOnly));
        assert_eq!(flag_value(&args, "-f"), Some("bv*+ba/b"));
    }

    #[test]
    fn test_both_unmerged_comma_joins_resolved_ids() {
        let mut req = request(DownloadKind::Both);
        req.merge_into_single_file = false;
        req.video_selection = FormatSelection::Resolved("137".to_string());
        req.audio_selection = FormatSelection::Resolved("140".to_string());
        let args = build(&req);
        assert_eq!(flag_value(&args, "-f"), Some("137,140"));
        assert!(!args.iter().any(|a| a == "--merge-output-format"));
    }

    #[test]
    fn test_both_unmerged_presets_resolve_standalone() {
        let mut req = request(DownloadKind::Both);
        req.merge_into_single_file = false;
        req.video_selection = FormatSelection::Preset(QualityTier::Low);
        req.audio_selection = FormatSelection::Preset(QualityTier::Medium);
        let args = build(&req);
        assert_eq!(flag_value(&args, "-f"), Some("bv*[height<=480],ba[abr<=128]"));
    }

    #[test]
    fn test_both_merged_emits_combined_expression_and_mp4_container() {
        let mut req = request(DownloadKind::Both);
        req.merge_into_single_file = true;
        req.video_selection = FormatSelection::Preset(QualityTier::Highest);
        let args = build(&req);
        assert_eq!(flag_value(&args, "-f"), Some("bv*+ba/b"));
        assert_eq!(flag_value(&args, "--merge-output-format"), Some("mp4"));
    }

    #[test]
    fn test_cookie_flag_requires_existing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cookie = dir.path().join("cookies.txt");
        std::fs::write(&cookie, "# Netscape HTTP Cookie File\n").expect("write");

        let mut req = request(DownloadKind::Both);
        req.cookie_file = Some(cookie.clone());
        let args = build(&req);
        assert_eq!(
            flag_value(&args, "--cookies"),
            Some(cookie.to_string_lossy().as_ref())
        );

        req.cookie_file = Some(dir.path().join("missing.txt"));
        let args = build(&req);
        assert!(!args.iter().any(|a| a == "--cookies"));
    }

    #[test]
    fn test_resolution_table_audio_tiers() {
        for (tier, expected) in [
            (QualityTier::Highest, "ba"),
            (QualityTier::Medium, "ba[abr<=128]"),
            (QualityTier::Low, "ba[abr<=64]"),
        ] {
            assert_eq!(
                resolve_selection(&FormatSelection::Preset(tier), Media::Audio, false),
                expected
            );
        }
    }

    #[test]
    fn test_resolution_table_video_tiers() {
        for (tier, combined, expected) in [
            (QualityTier::Highest, true, "bv*+ba/b"),
            (QualityTier::Medium, true, "bv*[height<=720]+ba/b"),
            (QualityTier::Low, true, "bv*[height<=480]+ba/b"),
            (QualityTier::Highest, false, "bv*"),
            (QualityTier::Medium, false, "bv*[height<=720]"),
            (QualityTier::Low, false, "bv*[height<=480]"),
        ] {
            assert_eq!(
                resolve_selection(&FormatSelection::Preset(tier), Media::Video, combined),
                expected
            );
        }
    }

    #[test]
    fn test_resolved_ids_pass_through_verbatim() {
        let selection = FormatSelection::Resolved("bestvideo[height<=?1080]".to_string());
        assert_eq!(
            resolve_selection(&selection, Media::Video, true),
            "bestvideo[height<=?1080]"
        );
    }
}
