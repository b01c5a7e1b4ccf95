// vidcrop-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vidcrop_core::config::{
    DEFAULT_CRF, DEFAULT_CROP_BOTTOM, DEFAULT_CROP_TOP, DEFAULT_PRESET,
    DEFAULT_TRIM_THRESHOLD_SECS,
};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Vidcrop: watermark-crop and ratings chart batch tools",
    long_about = "Crops the watermark band off batches of videos via ffmpeg (with a \
                  capture-library fallback) and renders rating-count charts from a \
                  sqlite database."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crops every video in the input directory and moves the originals aside
    Crop(CropArgs),
    /// Renders rating-count bar charts from the ratings database
    Plot(PlotArgs),
}

#[derive(Parser, Debug)]
pub struct CropArgs {
    /// Primary input directory scanned for video files
    #[arg(short = 'i', long = "input", value_name = "INPUT_DIR", default_value = "videos")]
    pub input_dir: PathBuf,

    /// Alternate input directory, used when the primary is missing or empty
    /// (the primary then receives the processed originals)
    #[arg(long = "alt-input", value_name = "ALT_DIR", default_value = "videos2")]
    pub alt_input_dir: PathBuf,

    /// Directory where cropped outputs are written
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_DIR", default_value = "videos_cut")]
    pub output_dir: PathBuf,

    /// Directory that receives originals after successful processing
    /// (defaults to the alternate input directory)
    #[arg(long = "processed", value_name = "PROCESSED_DIR")]
    pub processed_dir: Option<PathBuf>,

    /// Pixels to crop off the top edge
    #[arg(long, value_name = "PIXELS", default_value_t = DEFAULT_CROP_TOP)]
    pub top: f64,

    /// Pixels to crop off the bottom edge (covers the watermark strip)
    #[arg(long, value_name = "PIXELS", default_value_t = DEFAULT_CROP_BOTTOM)]
    pub bottom: f64,

    /// CRF quality for the external encode (lower is higher quality)
    #[arg(long, value_name = "CRF", default_value_t = DEFAULT_CRF)]
    pub crf: u32,

    /// Encoder speed preset for the external encode
    #[arg(long, value_name = "PRESET", default_value = DEFAULT_PRESET)]
    pub preset: String,

    /// Keep the audio track (re-encoded as AAC) instead of stripping it
    #[arg(long, default_value_t = false)]
    pub keep_audio: bool,

    /// Trim outputs longer than this many seconds down to exactly this length
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TRIM_THRESHOLD_SECS)]
    pub trim: f64,

    /// Disable the duration trim entirely
    #[arg(long, default_value_t = false)]
    pub no_trim: bool,
}

#[derive(Parser, Debug)]
pub struct PlotArgs {
    /// Path to the ratings sqlite database
    #[arg(long, value_name = "DB_PATH", default_value = "data/db.sqlite")]
    pub db: PathBuf,

    /// Output PNG path for the rendered chart
    #[arg(short = 'o', long = "out", value_name = "PNG_PATH", default_value = "data/rating_counts.png")]
    pub out: PathBuf,

    /// Number of videos to chart, ranked by total count (0 charts all)
    #[arg(long, value_name = "COUNT", default_value_t = 20)]
    pub top: usize,

    /// Render one stacked chart instead of a per-video grid
    #[arg(long, default_value_t = false)]
    pub stacked: bool,

    /// Open the rendered chart with the platform viewer
    #[arg(long, default_value_t = false)]
    pub show: bool,
}
