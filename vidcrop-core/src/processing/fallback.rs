//! Capture-library fallback writer.
//!
//! Used when the external encoder is absent or failed: the source is read
//! frame by frame through a capture handle, the crop sub-rectangle is
//! extracted (resized when edge rounding makes the region smaller than the
//! target), and frames are written through a `VideoWriter` opened with the
//! first codec in a fixed ordered list that initializes. This path has no
//! audio handling; the output is always silent.

use crate::error::CoreResult;
use crate::geometry::CropRect;
use crate::probe::sanitize_fps;
use crate::processing::BackendOutcome;

use log::{debug, info};
use opencv::core::{Mat, Rect, Size};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture, VideoWriter};
use opencv::imgproc;

use std::path::PathBuf;

/// Codec identifiers tried in order when opening the writer.
pub const WRITER_FOURCCS: [&str; 3] = ["mp4v", "avc1", "XVID"];

/// Parameters for one fallback-writer crop run.
#[derive(Debug, Clone)]
pub struct FallbackParams {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub crop: CropRect,
    /// Frame rate from the probe, if known; the capture handle's own value
    /// takes precedence when valid.
    pub fps_hint: Option<f64>,
    /// Cap on the output duration in seconds, if the trim policy applies
    pub max_duration: Option<f64>,
}

/// Number of frames to write for a duration cap at the given rate.
pub fn frames_for_cap(fps: f64, cap_secs: f64) -> u64 {
    (fps * cap_secs).round() as u64
}

/// Executes the capture-library backend for one file.
pub fn run_capture_crop(params: &FallbackParams) -> BackendOutcome {
    match capture_crop(params) {
        Ok(true) => BackendOutcome::Success,
        Ok(false) => BackendOutcome::Failed(
            "capture writer finished but produced no output file".to_string(),
        ),
        Err(e) => BackendOutcome::Failed(e.to_string()),
    }
}

fn capture_crop(params: &FallbackParams) -> CoreResult<bool> {
    let input = params.input_path.to_string_lossy().to_string();
    let output = params.output_path.to_string_lossy().to_string();

    let mut cap = VideoCapture::from_file(&input, videoio::CAP_ANY)?;
    if !cap.is_opened()? {
        return Err(crate::error::command_failed_error(
            "capture",
            format!("could not open {input}"),
        ));
    }

    let capture_fps = cap.get(videoio::CAP_PROP_FPS)?;
    let fps = if capture_fps.is_finite() && capture_fps > 0.0 {
        capture_fps
    } else {
        sanitize_fps(params.fps_hint, &params.input_path)
    };

    let frame_limit = params
        .max_duration
        .filter(|cap_secs| *cap_secs > 0.0)
        .map(|cap_secs| frames_for_cap(fps, cap_secs));

    let target_w = params.crop.width as i32;
    let target_h = params.crop.height as i32;
    let target = Size::new(target_w, target_h);

    let mut writer: Option<VideoWriter> = None;
    for fourcc_tag in WRITER_FOURCCS {
        let chars: Vec<char> = fourcc_tag.chars().collect();
        let fourcc = VideoWriter::fourcc(chars[0], chars[1], chars[2], chars[3])?;
        let candidate = VideoWriter::new(&output, fourcc, fps, target, true)?;
        if candidate.is_opened()? {
            info!("Capture writer opened with codec '{fourcc_tag}'");
            writer = Some(candidate);
            break;
        }
        debug!("Capture writer rejected codec '{fourcc_tag}'");
    }
    let Some(mut writer) = writer else {
        return Err(crate::error::command_failed_error(
            "capture",
            "no writer codec could be initialized",
        ));
    };

    info!(
        "Capture writer processing {} -> {}x{} @ {:.3} fps",
        params.input_path.display(),
        target_w,
        target_h,
        fps
    );

    let x = params.crop.x as i32;
    let y = params.crop.y as i32;
    let mut frame = Mat::default();
    let mut frames_written: u64 = 0;

    loop {
        if !cap.read(&mut frame)? || frame.empty() {
            break;
        }
        if let Some(limit) = frame_limit {
            if frames_written >= limit {
                break;
            }
        }

        // Clamp the sub-rectangle to the frame bounds; decoded frames can
        // be smaller than the probed resolution.
        let frame_w = frame.cols();
        let frame_h = frame.rows();
        if x >= frame_w || y >= frame_h {
            return Err(crate::error::command_failed_error(
                "capture",
                format!("crop offset ({x},{y}) outside frame {frame_w}x{frame_h}"),
            ));
        }
        let region_w = target_w.min(frame_w - x);
        let region_h = target_h.min(frame_h - y);

        let region = Mat::roi(&frame, Rect::new(x, y, region_w, region_h))?.try_clone()?;
        let cropped = if region_w != target_w || region_h != target_h {
            let mut resized = Mat::default();
            imgproc::resize(&region, &mut resized, target, 0.0, 0.0, imgproc::INTER_LINEAR)?;
            resized
        } else {
            region
        };

        writer.write(&cropped)?;
        frames_written += 1;
    }

    debug!("Capture writer wrote {frames_written} frame(s)");
    Ok(params.output_path.exists())
}
