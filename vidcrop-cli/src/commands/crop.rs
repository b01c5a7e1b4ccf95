//! Implementation of the `crop` subcommand.
//!
//! Resolves the input/processed directory convention, discovers video files,
//! and delegates the batch to `vidcrop_core::process_videos`, printing a
//! per-file summary at the end. An empty input directory is a normal,
//! successful run.

use crate::cli::CropArgs;
use crate::error::CliResult;

use vidcrop_core::config::DEFAULT_AUDIO_BITRATE;
use vidcrop_core::{
    find_video_files, format_duration, process_videos, resolve_io_dirs, AudioPolicy, CoreError,
    CropConfig, Margins,
};

use log::info;
use owo_colors::OwoColorize;

use std::fs;
use std::time::Instant;

pub fn run_crop(args: CropArgs) -> CliResult<()> {
    let total_start_time = Instant::now();

    let processed_dir = args
        .processed_dir
        .clone()
        .unwrap_or_else(|| args.alt_input_dir.clone());

    let mut config = CropConfig::new(args.input_dir, args.output_dir, processed_dir);
    config.alt_input_dir = Some(args.alt_input_dir);
    config.margins = Margins::widescreen(args.top, args.bottom);
    config.crf = args.crf;
    config.preset = args.preset;
    config.audio = if args.keep_audio {
        AudioPolicy::Reencode {
            bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
        }
    } else {
        AudioPolicy::Strip
    };
    config.trim_threshold = if args.no_trim { None } else { Some(args.trim) };

    let (input_dir, processed_dir) = resolve_io_dirs(&config);
    if processed_dir != config.processed_dir {
        info!(
            "Input directory {} is empty; reading {} instead",
            config.input_dir.display(),
            input_dir.display()
        );
        config.processed_dir = processed_dir;
    }

    fs::create_dir_all(&config.output_dir)?;
    fs::create_dir_all(&config.processed_dir)?;

    let files = match find_video_files(&input_dir) {
        Ok(files) => files,
        Err(CoreError::NoFilesFound) => {
            println!("No video files found in {}.", input_dir.display());
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    info!(
        "Found {} video file(s) in {}",
        files.len(),
        input_dir.display()
    );

    let results = process_videos(&config, &files)?;

    println!();
    for result in &results {
        println!(
            "  {} {} -> {} [{}] ({})",
            "✓".green(),
            result.filename,
            result.output_path.display(),
            result.backend,
            format_duration(result.duration.as_secs_f64())
        );
    }

    let total = format_duration(total_start_time.elapsed().as_secs_f64());
    if results.len() == files.len() {
        println!(
            "{}",
            format!("Cropped {} of {} file(s) in {}", results.len(), files.len(), total).green()
        );
    } else {
        println!(
            "{}",
            format!(
                "Cropped {} of {} file(s) in {} (see log for failures)",
                results.len(),
                files.len(),
                total
            )
            .yellow()
        );
    }

    Ok(())
}
