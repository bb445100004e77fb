//! Data structures for video information

use serde::{Deserialize, Serialize};

/// Video information as reported by `yt-dlp --dump-json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub formats: Vec<MediaFormat>,
}

/// One downloadable format entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: String,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub abr: Option<f32>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub fps: Option<f32>,
}

impl MediaFormat {
    /// Audio-only entries report no video codec.
    pub fn is_audio_only(&self) -> bool {
        self.vcodec.as_deref() == Some("none")
    }

    /// Video-only entries report no audio codec.
    pub fn is_video_only(&self) -> bool {
        !self.is_audio_only() && self.acodec.as_deref() == Some("none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_classification() {
        let audio = MediaFormat {
            format_id: "140".to_string(),
            vcodec: Some("none".to_string()),
            acodec: Some("mp4a.40.2".to_string()),
            ..Default::default()
        };
        assert!(audio.is_audio_only());
        assert!(!audio.is_video_only());

        let video = MediaFormat {
            format_id: "137".to_string(),
            vcodec: Some("avc1.640028".to_string()),
            acodec: Some("none".to_string()),
            ..Default::default()
        };
        assert!(video.is_video_only());
        assert!(!video.is_audio_only());

        let muxed = MediaFormat {
            format_id: "22".to_string(),
            vcodec: Some("avc1.64001F".to_string()),
            acodec: Some("mp4a.40.2".to_string()),
            ..Default::default()
        };
        assert!(!muxed.is_audio_only());
        assert!(!muxed.is_video_only());
    }

    #[test]
    fn test_video_info_parses_dump_json_subset() {
        let raw = r#"{
            "id": "abc123",
            "title": "Sample",
            "duration": 63.5,
            "formats": [
                {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2", "abr": 129.5},
                {"format_id": "137", "ext": "mp4", "vcodec": "avc1", "acodec": "none", "height": 1080, "width": 1920, "fps": 30.0}
            ],
            "unconsumed_field": {"nested": true}
        }"#;
        let info: VideoInfo = serde_json::from_str(raw).expect("parse");
        assert_eq!(info.title, "Sample");
        assert_eq!(info.formats.len(), 2);
        assert_eq!(info.formats[1].height, Some(1080));
    }
}
