//! Quality menus derived from an analysis result
//!
//! Splits the raw format list into the audio and video menus shown to the
//! user: audio-only entries sorted by bitrate, video-only entries sorted
//! by height with one entry per resolution.

use crate::extractor::models::{MediaFormat, VideoInfo};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Audio and video format menus for one analyzed video.
#[derive(Debug, Clone, Default)]
pub struct FormatCatalog {
    /// Audio-only formats, highest bitrate first
    pub audio: Vec<MediaFormat>,
    /// Video-only formats, highest resolution first, one per height
    pub video: Vec<MediaFormat>,
}

impl FormatCatalog {
    pub fn from_video_info(info: &VideoInfo) -> Self {
        Self::from_formats(&info.formats)
    }

    pub fn from_formats(formats: &[MediaFormat]) -> Self {
        let mut audio: Vec<MediaFormat> = formats
            .iter()
            .filter(|f| f.is_audio_only())
            .cloned()
            .collect();
        let mut video: Vec<MediaFormat> = formats
            .iter()
            .filter(|f| f.is_video_only())
            .cloned()
            .collect();

        audio.sort_by(|a, b| compare_desc(a.abr, b.abr));
        video.sort_by(|a, b| compare_desc(a.height, b.height));

        // One menu entry per resolution; the sort above makes this keep
        // the best entry for each height.
        let mut seen = HashSet::new();
        video.retain(|f| seen.insert(f.height));

        Self { audio, video }
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty() && self.video.is_empty()
    }

    /// Display label for an audio entry, e.g. `audio: 128kbps (m4a)`.
    pub fn audio_label(format: &MediaFormat) -> String {
        match format.abr {
            Some(abr) => format!("audio: {:.0}kbps ({})", abr, format.ext),
            None => format!("audio: unknown bitrate ({})", format.ext),
        }
    }

    /// Display label for a video entry, e.g. `video: 1080p (mp4)`.
    pub fn video_label(format: &MediaFormat) -> String {
        match format.height {
            Some(height) => format!("video: {}p ({})", height, format.ext),
            None => format!("video: unknown resolution ({})", format.ext),
        }
    }
}

fn compare_desc<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (b, a) {
        (Some(b), Some(a)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(id: &str, abr: Option<f32>) -> MediaFormat {
        MediaFormat {
            format_id: id.to_string(),
            ext: "m4a".to_string(),
            vcodec: Some("none".to_string()),
            acodec: Some("mp4a.40.2".to_string()),
            abr,
            ..Default::default()
        }
    }

    fn video(id: &str, height: Option<u32>, ext: &str) -> MediaFormat {
        MediaFormat {
            format_id: id.to_string(),
            ext: ext.to_string(),
            vcodec: Some("avc1".to_string()),
            acodec: Some("none".to_string()),
            height,
            ..Default::default()
        }
    }

    #[test]
    fn test_splits_by_codec_and_drops_muxed() {
        let muxed = MediaFormat {
            format_id: "22".to_string(),
            vcodec: Some("avc1".to_string()),
            acodec: Some("mp4a".to_string()),
            ..Default::default()
        };
        let formats = vec![audio("140", Some(128.0)), video("137", Some(1080), "mp4"), muxed];
        let catalog = FormatCatalog::from_formats(&formats);
        assert_eq!(catalog.audio.len(), 1);
        assert_eq!(catalog.video.len(), 1);
    }

    #[test]
    fn test_audio_sorted_by_bitrate_descending() {
        let formats = vec![
            audio("249", Some(50.0)),
            audio("140", Some(129.5)),
            audio("250", Some(70.0)),
        ];
        let catalog = FormatCatalog::from_formats(&formats);
        let ids: Vec<&str> = catalog.audio.iter().map(|f| f.format_id.as_str()).collect();
        assert_eq!(ids, ["140", "250", "249"]);
    }

    #[test]
    fn test_video_sorted_and_deduplicated_by_height() {
        let formats = vec![
            video("134", Some(360), "mp4"),
            video("137", Some(1080), "mp4"),
            video("248", Some(1080), "webm"),
            video("136", Some(720), "mp4"),
        ];
        let catalog = FormatCatalog::from_formats(&formats);
        let heights: Vec<Option<u32>> = catalog.video.iter().map(|f| f.height).collect();
        assert_eq!(heights, [Some(1080), Some(720), Some(360)]);
        // First entry for a height wins after the sort
        assert_eq!(catalog.video[0].format_id, "137");
    }

    #[test]
    fn test_missing_metrics_sort_last() {
        let formats = vec![audio("x", None), audio("140", Some(128.0))];
        let catalog = FormatCatalog::from_formats(&formats);
        assert_eq!(catalog.audio[0].format_id, "140");
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            FormatCatalog::audio_label(&audio("140", Some(129.5))),
            "audio: 130kbps (m4a)"
        );
        assert_eq!(
            FormatCatalog::video_label(&video("137", Some(1080), "mp4")),
            "video: 1080p (mp4)"
        );
    }

    #[test]
    fn test_empty_formats_give_empty_catalog() {
        let catalog = FormatCatalog::from_formats(&[]);
        assert!(catalog.is_empty());
    }
}
