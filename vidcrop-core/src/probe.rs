//! Source metadata probing.
//!
//! Determines a video's width, height, frame rate, and duration without
//! decoding it. Strategies are tried in order until the resolution is
//! known: first a capture-library handle, then a line-oriented ffprobe
//! call on the first video stream. A later strategy only fills fields the
//! earlier ones left unknown. Duration has its own ffprobe fallback on the
//! container format.

use crate::config::FALLBACK_FPS;
use crate::error::{CoreError, CoreResult};

use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use std::path::Path;
use std::process::Command;

/// Probed source attributes. Fields stay `None` when no strategy could
/// determine them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VideoMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<f64>,
    /// Duration of the source in seconds
    pub duration: Option<f64>,
}

impl VideoMetadata {
    fn merge_missing_from(&mut self, other: VideoMetadata) {
        if self.width.is_none() {
            self.width = other.width;
        }
        if self.height.is_none() {
            self.height = other.height;
        }
        if self.fps.is_none() {
            self.fps = other.fps;
        }
        if self.duration.is_none() {
            self.duration = other.duration;
        }
    }

    fn has_resolution(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

/// Probes a video file, trying each strategy in order until the resolution
/// is known.
///
/// Returns `CoreError::ProbeFailed` if no strategy can determine width and
/// height; frame rate and duration may still be `None` on success.
pub fn probe_video(path: &Path) -> CoreResult<VideoMetadata> {
    let strategies: [(&str, fn(&Path) -> Option<VideoMetadata>); 2] = [
        ("capture library", probe_capture),
        ("ffprobe stream", probe_ffprobe_stream),
    ];

    let mut meta = VideoMetadata::default();
    for (name, strategy) in strategies {
        if meta.has_resolution() {
            break;
        }
        match strategy(path) {
            Some(found) => meta.merge_missing_from(found),
            None => log::debug!("Probe strategy '{}' failed for {}", name, path.display()),
        }
    }

    if meta.duration.is_none() {
        meta.duration = probe_ffprobe_duration(path);
    }

    if meta.has_resolution() {
        Ok(meta)
    } else {
        Err(CoreError::ProbeFailed(path.display().to_string()))
    }
}

/// Replaces a zero, negative, or NaN frame rate with the fixed fallback.
pub fn sanitize_fps(fps: Option<f64>, source: &Path) -> f64 {
    match fps {
        Some(value) if value.is_finite() && value > 0.0 => value,
        other => {
            log::warn!(
                "Invalid frame rate {:?} for {}; using fallback {} fps",
                other,
                source.display(),
                FALLBACK_FPS
            );
            FALLBACK_FPS
        }
    }
}

/// Primary strategy: open the file with a capture handle and read the
/// stream properties directly. Duration is derived from frame count / fps
/// when both are known.
fn probe_capture(path: &Path) -> Option<VideoMetadata> {
    let path_str = path.to_str()?;
    let cap = VideoCapture::from_file(path_str, videoio::CAP_ANY).ok()?;
    if !cap.is_opened().ok()? {
        return None;
    }

    let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH).ok()?;
    let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT).ok()?;
    let fps = cap.get(videoio::CAP_PROP_FPS).unwrap_or(0.0);
    let frame_count = cap.get(videoio::CAP_PROP_FRAME_COUNT).unwrap_or(0.0);

    // A handle that opens but reports zero-sized frames has not actually
    // decoded a video stream; treat the resolution as unknown.
    let width = (width > 0.0).then_some(width as u32)?;
    let height = (height > 0.0).then_some(height as u32)?;

    let fps = (fps.is_finite() && fps > 0.0).then_some(fps);
    let duration = match (frame_count > 0.0, fps) {
        (true, Some(rate)) => Some(frame_count / rate),
        _ => None,
    };

    Some(VideoMetadata {
        width: Some(width),
        height: Some(height),
        fps,
        duration,
    })
}

/// Fallback strategy: ask ffprobe for the first video stream's width,
/// height, and rational frame rate as line-oriented plain text.
fn probe_ffprobe_stream(path: &Path) -> Option<VideoMetadata> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_stream_output(&String::from_utf8_lossy(&output.stdout))
}

/// Duration fallback: a second ffprobe call on the container format,
/// parsed as a single floating-point seconds value.
fn probe_ffprobe_duration(path: &Path) -> Option<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout).trim().parse().ok()
}

/// Parses ffprobe's positional stream output: line 1 = width, line 2 =
/// height, line 3 = optional frame rate.
fn parse_stream_output(stdout: &str) -> Option<VideoMetadata> {
    let lines: Vec<&str> = stdout.trim().lines().map(str::trim).collect();
    if lines.len() < 2 {
        return None;
    }
    let width: u32 = lines[0].parse().ok()?;
    let height: u32 = lines[1].parse().ok()?;
    let fps = lines.get(2).and_then(|line| parse_frame_rate(line));

    Some(VideoMetadata {
        width: Some(width),
        height: Some(height),
        fps,
        duration: None,
    })
}

/// Parses a frame rate expressed either as a rational ("30000/1001") or a
/// plain decimal ("25").
fn parse_frame_rate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        Some(num / den)
    } else {
        raw.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rational_frame_rates() {
        let fps = parse_frame_rate("30000/1001").unwrap();
        assert!((fps - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("24"), Some(24.0));
        assert_eq!(parse_frame_rate("23.976"), Some(23.976));
    }

    #[test]
    fn rejects_malformed_frame_rates() {
        assert_eq!(parse_frame_rate("30000/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
        assert_eq!(parse_frame_rate("1/x"), None);
        assert_eq!(parse_frame_rate(""), None);
    }

    #[test]
    fn parses_positional_stream_lines() {
        let meta = parse_stream_output("1920\n1080\n30000/1001\n").unwrap();
        assert_eq!(meta.width, Some(1920));
        assert_eq!(meta.height, Some(1080));
        assert!((meta.fps.unwrap() - 29.97).abs() < 0.01);
        assert_eq!(meta.duration, None);
    }

    #[test]
    fn frame_rate_line_is_optional() {
        let meta = parse_stream_output("640\n480\n").unwrap();
        assert_eq!(meta.width, Some(640));
        assert_eq!(meta.height, Some(480));
        assert_eq!(meta.fps, None);
    }

    #[test]
    fn short_or_garbled_output_is_rejected() {
        assert_eq!(parse_stream_output("1920\n"), None);
        assert_eq!(parse_stream_output(""), None);
        assert_eq!(parse_stream_output("wide\ntall\n30/1"), None);
    }

    #[test]
    fn invalid_fps_values_fall_back() {
        let path = Path::new("clip.mp4");
        assert_eq!(sanitize_fps(Some(0.0), path), FALLBACK_FPS);
        assert_eq!(sanitize_fps(Some(-12.0), path), FALLBACK_FPS);
        assert_eq!(sanitize_fps(Some(f64::NAN), path), FALLBACK_FPS);
        assert_eq!(sanitize_fps(None, path), FALLBACK_FPS);
        assert_eq!(sanitize_fps(Some(29.97), path), 29.97);
    }

    #[test]
    fn merge_only_fills_missing_fields() {
        let mut meta = VideoMetadata {
            width: Some(1280),
            height: Some(720),
            fps: None,
            duration: None,
        };
        meta.merge_missing_from(VideoMetadata {
            width: Some(999),
            height: Some(999),
            fps: Some(25.0),
            duration: Some(12.0),
        });
        assert_eq!(meta.width, Some(1280));
        assert_eq!(meta.height, Some(720));
        assert_eq!(meta.fps, Some(25.0));
        assert_eq!(meta.duration, Some(12.0));
    }
}
