//! Core library for the watermark-crop batch job and the ratings chart job.
//!
//! The crop side discovers videos in an input directory, probes each source,
//! computes an even-dimensioned crop rectangle from configurable margins, and
//! produces a cropped output through an external ffmpeg encode with a
//! capture-library fallback. The ratings side reads grouped counts from a
//! sqlite database and renders bar charts as PNG files.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidcrop_core::{find_video_files, process_videos, resolve_io_dirs, CropConfig};
//! use std::path::PathBuf;
//!
//! let config = CropConfig::new(
//!     PathBuf::from("videos"),
//!     PathBuf::from("videos_cut"),
//!     PathBuf::from("videos2"),
//! );
//!
//! let (input_dir, _processed_dir) = resolve_io_dirs(&config);
//! let files = find_video_files(&input_dir).unwrap();
//! let results = process_videos(&config, &files).unwrap();
//! for result in results {
//!     println!("{} via {}", result.filename, result.backend);
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod geometry;
pub mod probe;
pub mod processing;
pub mod ratings;
pub mod utils;

// Re-exports for public API
pub use config::{AudioPolicy, CropConfig};
pub use discovery::{find_video_files, resolve_io_dirs};
pub use error::{CoreError, CoreResult};
pub use geometry::{compute_crop, CropRect, Margins};
pub use probe::{probe_video, VideoMetadata};
pub use processing::{process_videos, BackendKind, CropResult};
pub use ratings::{
    aggregate, fetch_rating_counts, rank_videos, render_grid, render_stacked, RatingCount,
    RatingTable,
};
pub use utils::format_duration;
