//! Configuration structures and constants for the vidcrop-core library.
//!
//! The original batch scripts carried their margins, codec names, and
//! thresholds as process-wide constants. Here they are gathered into an
//! explicit [`CropConfig`] that is passed into the probe, geometry, and
//! encode functions so each stage is independently testable.

use crate::geometry::Margins;

use std::path::PathBuf;

// Default constants

/// Default margin cropped from the top edge, in pixels.
pub const DEFAULT_CROP_TOP: f64 = 0.0;

/// Default margin cropped from the bottom edge, in pixels.
/// 50 px covers the watermark strip the source material carries.
pub const DEFAULT_CROP_BOTTOM: f64 = 50.0;

/// Aspect-ratio multiplier used to derive left/right margins from
/// top/bottom margins.
pub const WIDESCREEN_ASPECT: f64 = 16.0 / 9.0;

/// Default video codec for the external encoder path.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Default encoder speed preset.
pub const DEFAULT_PRESET: &str = "fast";

/// Default CRF quality value. Lower values produce higher quality but
/// larger files.
pub const DEFAULT_CRF: u32 = 22;

/// Pixel format forced on the output for broad player compatibility.
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";

/// Audio bitrate used when audio is re-encoded instead of stripped.
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";

/// Sources longer than this many seconds are trimmed down to exactly
/// this duration.
pub const DEFAULT_TRIM_THRESHOLD_SECS: f64 = 5.0;

/// Frame rate substituted when the probed rate is zero, negative, or NaN.
pub const FALLBACK_FPS: f64 = 25.0;

/// Suffix appended to the input file stem for the cropped output.
pub const OUTPUT_SUFFIX: &str = "_cut";

/// Audio handling policy for the external encoder path.
///
/// The fallback writer has no audio handling; its output is always silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioPolicy {
    /// Strip the audio track entirely (`-an`).
    Strip,
    /// Re-encode audio to AAC at a fixed bitrate.
    Reencode { bitrate: String },
}

impl Default for AudioPolicy {
    fn default() -> Self {
        AudioPolicy::Strip
    }
}

/// Main configuration structure for the crop batch job.
///
/// Created by the consumer (vidcrop-cli) and passed to
/// [`process_videos`](crate::process_videos).
#[derive(Debug, Clone)]
pub struct CropConfig {
    /// Directory containing input video files to process
    pub input_dir: PathBuf,

    /// Alternate input directory, tried when `input_dir` is missing or
    /// empty. When used, `input_dir` takes over the processed role.
    pub alt_input_dir: Option<PathBuf>,

    /// Directory where cropped output files will be saved
    pub output_dir: PathBuf,

    /// Directory that receives originals after successful processing
    pub processed_dir: PathBuf,

    /// Margins to crop off each edge
    pub margins: Margins,

    /// Video codec passed to the external encoder
    pub video_codec: String,

    /// Encoder speed preset
    pub preset: String,

    /// CRF quality value
    pub crf: u32,

    /// Output pixel format
    pub pixel_format: String,

    /// Audio handling policy
    pub audio: AudioPolicy,

    /// Duration threshold in seconds; sources longer than this are trimmed
    /// to exactly this length. `None` disables trimming.
    pub trim_threshold: Option<f64>,

    /// Frame rate used when the source rate cannot be determined
    pub fallback_fps: f64,
}

impl CropConfig {
    /// Creates a configuration with the default encoding parameters for the
    /// given directories.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, processed_dir: PathBuf) -> Self {
        Self {
            input_dir,
            alt_input_dir: None,
            output_dir,
            processed_dir,
            margins: Margins::widescreen(DEFAULT_CROP_TOP, DEFAULT_CROP_BOTTOM),
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            crf: DEFAULT_CRF,
            pixel_format: DEFAULT_PIXEL_FORMAT.to_string(),
            audio: AudioPolicy::default(),
            trim_threshold: Some(DEFAULT_TRIM_THRESHOLD_SECS),
            fallback_fps: FALLBACK_FPS,
        }
    }
}
