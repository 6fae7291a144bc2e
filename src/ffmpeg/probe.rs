use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use super::{build_poster_args, command};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub has_video: bool,
    pub has_audio: bool,
}

impl MediaInfo {
    pub fn duration_ms(&self) -> u64 {
        (self.duration.max(0.0) * 1000.0).round() as u64
    }
}

#[derive(Debug, Deserialize)]
struct FFProbeOutput {
    format: Option<FFProbeFormat>,
    streams: Option<Vec<FFProbeStream>>,
}

#[derive(Debug, Deserialize)]
struct FFProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    disposition: Option<FFProbeDisposition>,
}

#[derive(Debug, Deserialize)]
struct FFProbeDisposition {
    attached_pic: Option<u8>,
}

pub fn probe_file(path: &Path) -> Result<MediaInfo> {
    probe_uri(&path.to_string_lossy())
}

pub fn probe_uri(uri: &str) -> Result<MediaInfo> {
    let output = command("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(uri)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("ffprobe failed: {}", stderr));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_output(json_str: &str) -> Result<MediaInfo> {
    let probe_output: FFProbeOutput = serde_json::from_str(json_str)
        .map_err(|e| anyhow!("Failed to parse ffprobe output: {}", e))?;

    let mut info = MediaInfo::default();

    if let Some(format) = probe_output.format {
        info.duration = format.duration
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);
    }

    for stream in probe_output.streams.unwrap_or_default() {
        match stream.codec_type.as_deref().unwrap_or("") {
            "video" => {
                // Embedded cover art shows up as a one-frame video stream.
                let cover_art = stream.disposition
                    .and_then(|d| d.attached_pic)
                    .unwrap_or(0) == 1;
                if !cover_art {
                    info.has_video = true;
                    info.width = stream.width.unwrap_or(0);
                    info.height = stream.height.unwrap_or(0);
                }
            }
            "audio" => info.has_audio = true,
            _ => {}
        }
    }

    Ok(info)
}

/// Grab the first frame of a video as an RGBA image, scaled down to at most
/// `max_width` pixels wide.
pub fn extract_poster(uri: &str, max_width: u32) -> Result<image::RgbaImage> {
    let output = command("ffmpeg")
        .args(build_poster_args(uri, max_width))
        .stdin(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .output()?;

    if !output.status.success() || output.stdout.is_empty() {
        return Err(anyhow!("Failed to extract poster frame from {}", uri));
    }

    let image = image::load_from_memory(&output.stdout)?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_file() {
        let json = r#"{
            "format": { "duration": "12.480000" },
            "streams": [
                { "codec_type": "video", "width": 1920, "height": 1080 },
                { "codec_type": "audio" }
            ]
        }"#;

        let info = parse_probe_output(json).unwrap();
        assert!(info.has_video);
        assert!(info.has_audio);
        assert_eq!(info.width, 1920);
        assert_eq!(info.duration_ms(), 12480);
    }

    #[test]
    fn test_cover_art_is_not_video() {
        let json = r#"{
            "format": { "duration": "180.0" },
            "streams": [
                { "codec_type": "audio" },
                { "codec_type": "video", "width": 500, "height": 500,
                  "disposition": { "attached_pic": 1 } }
            ]
        }"#;

        let info = parse_probe_output(json).unwrap();
        assert!(!info.has_video);
        assert!(info.has_audio);
        assert_eq!(info.duration_ms(), 180_000);
    }

    #[test]
    fn test_missing_duration() {
        let info = parse_probe_output(r#"{ "streams": [] }"#).unwrap();
        assert_eq!(info.duration_ms(), 0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_probe_output("nope").is_err());
    }
}
