//! FFmpeg command building and execution for the external encoder backend.
//!
//! Builds crop/re-encode invocations (H.264 + optional AAC, faststart) and
//! runs them, capturing error-level log lines for diagnostics. Success
//! requires both a zero exit status and the output file existing on disk
//! afterward; either condition failing is a backend failure, which lets the
//! orchestrator fall through to the capture-library writer.

use crate::config::AudioPolicy;
use crate::geometry::CropRect;
use crate::processing::BackendOutcome;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use log::{debug, info};

use std::path::PathBuf;

/// Parameters for one external-encoder crop invocation.
#[derive(Debug, Clone)]
pub struct EncodeParams {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub crop: CropRect,
    pub video_codec: String,
    pub preset: String,
    pub crf: u32,
    pub pixel_format: String,
    pub audio: AudioPolicy,
    /// Cap on the output duration in seconds, if the trim policy applies
    pub max_duration: Option<f64>,
}

/// Builds the ffmpeg invocation for a crop re-encode.
///
/// The crop rectangle is applied as a `-vf` filter together with a format
/// conversion to the configured pixel format; `-movflags +faststart`
/// relocates the index metadata so the output is streamable.
pub fn build_ffmpeg_command(params: &EncodeParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();
    cmd.input(params.input_path.to_string_lossy().as_ref());

    let vf = format!("{},format={}", params.crop.filter(), params.pixel_format);
    cmd.args(["-vf", &vf]);
    cmd.args(["-c:v", &params.video_codec]);
    cmd.args(["-preset", &params.preset]);
    cmd.args(["-crf", &params.crf.to_string()]);
    cmd.args(["-pix_fmt", &params.pixel_format]);

    match &params.audio {
        AudioPolicy::Strip => {
            cmd.arg("-an");
        }
        AudioPolicy::Reencode { bitrate } => {
            cmd.args(["-c:a", "aac", "-b:a", bitrate]);
        }
    }

    if let Some(max_duration) = params.max_duration {
        if max_duration > 0.0 {
            cmd.args(["-t", &max_duration.to_string()]);
        }
    }

    cmd.args(["-movflags", "+faststart"]);
    cmd.output(params.output_path.to_string_lossy().as_ref());
    cmd
}

/// Executes the external-encoder backend for one file.
///
/// Never returns `NotAttempted`; the orchestrator decides up front whether
/// ffmpeg is on the path at all.
pub fn run_ffmpeg_crop(params: &EncodeParams) -> BackendOutcome {
    info!(
        "Running ffmpeg crop: {} -> {}",
        params.input_path.display(),
        params.output_path.display()
    );
    debug!("Encode parameters: {params:?}");

    let mut cmd = build_ffmpeg_command(params);
    debug!("FFmpeg command: {cmd:?}");

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return BackendOutcome::Failed(format!("failed to start ffmpeg: {e}")),
    };

    // Collect error-level log lines so a failure carries the tool's own
    // diagnostics.
    let mut error_lines: Vec<String> = Vec::new();
    match child.iter() {
        Ok(events) => {
            for event in events {
                if let FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) = event {
                    error_lines.push(line);
                }
            }
        }
        Err(e) => {
            error_lines.push(format!("failed to read ffmpeg output: {e}"));
        }
    }

    let exit_ok = match child.wait() {
        Ok(status) => status.success(),
        Err(e) => {
            error_lines.push(format!("failed to wait for ffmpeg: {e}"));
            false
        }
    };

    encode_outcome(exit_ok, params.output_path.exists(), &error_lines.join("\n"))
}

/// Maps the observable results of an encoder run onto a backend outcome.
///
/// A zero exit status with no output file on disk is still a failure; some
/// encoder builds exit zero after writing nothing.
pub fn encode_outcome(exit_ok: bool, output_exists: bool, diagnostics: &str) -> BackendOutcome {
    if exit_ok && output_exists {
        BackendOutcome::Success
    } else if !exit_ok {
        BackendOutcome::Failed(format!("ffmpeg exited with an error: {diagnostics}"))
    } else {
        BackendOutcome::Failed(format!(
            "ffmpeg exited successfully but produced no output file: {diagnostics}"
        ))
    }
}
