//! Main batch orchestration for the watermark-crop job.
//!
//! For each file: probe the source, compute the crop rectangle, decide the
//! duration trim, dispatch to the backends in priority order, and on
//! success relocate the original into the processed directory. No per-file
//! failure aborts the batch; the loop always proceeds to the next file.

use crate::config::{CropConfig, OUTPUT_SUFFIX};
use crate::error::CoreResult;
use crate::external::check_dependency;
use crate::external::ffmpeg::{run_ffmpeg_crop, EncodeParams};
use crate::geometry::compute_crop;
use crate::probe::probe_video;
use crate::processing::fallback::{run_capture_crop, FallbackParams};
use crate::processing::{first_success, BackendKind, BackendOutcome};

use log::{error, info, warn};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Result of one successfully cropped file.
#[derive(Debug, Clone)]
pub struct CropResult {
    pub filename: String,
    pub output_path: PathBuf,
    pub backend: BackendKind,
    pub duration: Duration,
}

/// Processes a list of video files according to the provided configuration.
///
/// Returns a result entry per successfully cropped file; skipped and failed
/// files are logged and omitted. The processed/output directories must
/// exist before calling.
pub fn process_videos(config: &CropConfig, files_to_process: &[PathBuf]) -> CoreResult<Vec<CropResult>> {
    // The external encoder is preferred but optional; when absent every
    // file goes straight to the capture writer.
    let ffmpeg_available = match check_dependency("ffmpeg") {
        Ok(()) => {
            info!("ffmpeg found; external encoder path enabled.");
            true
        }
        Err(e) => {
            warn!("External encoder unavailable ({e}); using capture writer only.");
            false
        }
    };

    let mut results: Vec<CropResult> = Vec::new();

    for input_path in files_to_process {
        let file_start_time = Instant::now();

        let filename = match input_path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => {
                error!("Failed to get filename for {}; skipping.", input_path.display());
                continue;
            }
        };
        let stem = match input_path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_string(),
            None => {
                error!("Failed to get file stem for {}; skipping.", input_path.display());
                continue;
            }
        };
        let output_path = config
            .output_dir
            .join(format!("{stem}{OUTPUT_SUFFIX}.mp4"));

        let metadata = match probe_video(input_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                error!("{e}; skipping.");
                continue;
            }
        };
        // probe_video guarantees the resolution on success.
        let (src_width, src_height) = match (metadata.width, metadata.height) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                error!("Could not determine source resolution for {filename}; skipping.");
                continue;
            }
        };

        let crop = match compute_crop(input_path, src_width, src_height, &config.margins) {
            Ok(crop) => crop,
            Err(e) => {
                error!("{e}; skipping.");
                continue;
            }
        };

        let max_duration = trim_policy(metadata.duration, config.trim_threshold);
        if let (Some(source), Some(cap)) = (metadata.duration, max_duration) {
            info!("Source duration {source:.2}s exceeds threshold; trimming output to {cap}s");
        }

        info!(
            "Processing '{}': src={}x{}, crop -> {}",
            filename, src_width, src_height, crop
        );

        let encode_params = EncodeParams {
            input_path: input_path.clone(),
            output_path: output_path.clone(),
            crop,
            video_codec: config.video_codec.clone(),
            preset: config.preset.clone(),
            crf: config.crf,
            pixel_format: config.pixel_format.clone(),
            audio: config.audio.clone(),
            max_duration,
        };
        let fallback_params = FallbackParams {
            input_path: input_path.clone(),
            output_path: output_path.clone(),
            crop,
            fps_hint: metadata.fps,
            max_duration,
        };

        let external: Box<dyn FnOnce() -> BackendOutcome> = if ffmpeg_available {
            Box::new(move || run_ffmpeg_crop(&encode_params))
        } else {
            Box::new(|| BackendOutcome::NotAttempted)
        };
        let fallback: Box<dyn FnOnce() -> BackendOutcome> =
            Box::new(move || run_capture_crop(&fallback_params));

        let winner = first_success(vec![
            (BackendKind::ExternalEncoder, external),
            (BackendKind::FallbackWriter, fallback),
        ]);

        match winner {
            Some(backend) => {
                info!("Saved cropped video to {}", output_path.display());

                // Best effort: the cropped output is kept even when the
                // original cannot be relocated.
                match move_original(input_path, &config.processed_dir) {
                    Ok(dest) => info!("Moved original to {}", dest.display()),
                    Err(e) => warn!(
                        "Could not move original {} to {}: {e}",
                        input_path.display(),
                        config.processed_dir.display()
                    ),
                }

                results.push(CropResult {
                    filename,
                    output_path,
                    backend,
                    duration: file_start_time.elapsed(),
                });
            }
            None => {
                error!("Failed to produce output for {filename}; original left in place.");
            }
        }
    }

    Ok(results)
}

/// Duration-trim policy: cap the output at the threshold when the source
/// runs longer, otherwise leave it untrimmed.
pub fn trim_policy(source_duration: Option<f64>, threshold: Option<f64>) -> Option<f64> {
    match (source_duration, threshold) {
        (Some(duration), Some(threshold)) if duration > threshold => Some(threshold),
        _ => None,
    }
}

/// Relocates a processed original into the processed directory.
///
/// Renames when possible and falls back to copy-then-delete when the
/// rename fails (e.g. across filesystems).
pub fn move_original(input_path: &Path, processed_dir: &Path) -> io::Result<PathBuf> {
    let file_name = input_path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no filename in {}", input_path.display()),
        )
    })?;
    let dest = processed_dir.join(file_name);

    if fs::rename(input_path, &dest).is_err() {
        fs::copy(input_path, &dest)?;
        fs::remove_file(input_path)?;
    }
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_applies_only_above_the_threshold() {
        assert_eq!(trim_policy(Some(12.0), Some(5.0)), Some(5.0));
        assert_eq!(trim_policy(Some(5.0), Some(5.0)), None);
        assert_eq!(trim_policy(Some(3.2), Some(5.0)), None);
        assert_eq!(trim_policy(None, Some(5.0)), None);
        assert_eq!(trim_policy(Some(12.0), None), None);
    }

    #[test]
    fn move_original_relocates_the_file() {
        let root = tempfile::tempdir().unwrap();
        let input_dir = root.path().join("videos");
        let processed_dir = root.path().join("videos2");
        fs::create_dir_all(&input_dir).unwrap();
        fs::create_dir_all(&processed_dir).unwrap();

        let input = input_dir.join("clip.mp4");
        fs::write(&input, b"data").unwrap();

        let dest = move_original(&input, &processed_dir).unwrap();
        assert_eq!(dest, processed_dir.join("clip.mp4"));
        assert!(!input.exists());
        assert_eq!(fs::read(dest).unwrap(), b"data");
    }

    #[test]
    fn move_original_fails_cleanly_for_missing_source() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("absent.mp4");
        assert!(move_original(&missing, root.path()).is_err());
    }
}
