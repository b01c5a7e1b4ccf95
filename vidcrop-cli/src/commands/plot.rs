//! Implementation of the `plot` subcommand.
//!
//! Fetches grouped rating counts from the sqlite database, ranks the videos,
//! and renders either the per-video grid chart or the stacked chart. A
//! missing database or a failing query is an error; an empty result set is
//! a normal run that renders nothing.

use crate::cli::PlotArgs;
use crate::error::CliResult;

use vidcrop_core::ratings::{aggregate, fetch_rating_counts, rank_videos, render_grid, render_stacked};

use log::warn;
use owo_colors::OwoColorize;

use std::fs;
use std::path::Path;
use std::process::Command;

pub fn run_plot(args: PlotArgs) -> CliResult<()> {
    let rows = fetch_rating_counts(&args.db)?;
    if rows.is_empty() {
        println!("No ratings found in {}.", args.db.display());
        return Ok(());
    }

    let table = aggregate(&rows);
    let order = rank_videos(&table, args.top);

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    if args.stacked {
        render_stacked(&table, &order, &args.out)?;
    } else {
        render_grid(&table, &order, &args.out)?;
    }

    println!(
        "{}",
        format!(
            "Charted {} video(s) to {}",
            order.len(),
            args.out.display()
        )
        .green()
    );

    if args.show {
        if let Err(e) = open_chart(&args.out) {
            warn!("Could not open {}: {e}", args.out.display());
        }
    }

    Ok(())
}

/// Platform viewer used by `--show`.
fn viewer_command() -> &'static str {
    match std::env::consts::OS {
        "macos" => "open",
        "windows" => "explorer",
        _ => "xdg-open",
    }
}

fn open_chart(path: &Path) -> std::io::Result<()> {
    Command::new(viewer_command()).arg(path).spawn().map(|_| ())
}
