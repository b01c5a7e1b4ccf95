//! Chart rendering for aggregated rating counts.
//!
//! Two PNG layouts: a grid of per-video bar charts sharing one y scale, and
//! a single stacked chart with one column per video. Only ratings 1..=5 are
//! drawn; unrated counts influence ranking but never appear on an axis.

use crate::error::{CoreError, CoreResult};
use crate::ratings::{counts_for, RatingTable, RATING_KEYS};

use log::info;
use plotters::prelude::*;

use std::path::Path;

/// One color per rating value 1..=5, shared by both layouts.
pub const RATING_COLORS: [RGBColor; 5] = [
    RGBColor(214, 39, 40),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(31, 119, 180),
    RGBColor(148, 103, 189),
];

const GRID_COLS: usize = 5;
const SUBPLOT_WIDTH: u32 = 300;
const SUBPLOT_HEIGHT: u32 = 250;

const STACKED_HEIGHT: u32 = 600;
const STACKED_COLUMN_WIDTH: u32 = 60;
const LABEL_MAX_CHARS: usize = 14;

fn chart_error<E: std::fmt::Display>(e: E) -> CoreError {
    CoreError::Chart(e.to_string())
}

/// Shared y-axis ceiling: the global maximum single-bar count with 20%
/// headroom, truncated, never below 1 so empty charts still have a valid
/// range.
pub fn grid_y_ceiling(global_max: u64) -> u64 {
    (((global_max as f64) * 1.2) as u64).max(1)
}

/// Shortens a video id for use as a caption or axis label: the basename of
/// the id, truncated with an ellipsis when still too long.
pub fn axis_label(video_id: &str) -> String {
    let base = std::path::Path::new(video_id)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| video_id.to_string());
    if base.is_empty() {
        return "(unknown)".to_string();
    }
    if base.chars().count() <= LABEL_MAX_CHARS {
        return base;
    }
    let prefix: String = base.chars().take(LABEL_MAX_CHARS - 1).collect();
    format!("{prefix}\u{2026}")
}

/// Renders one bar chart per video in a fixed-width grid.
///
/// All subplots share the same y range so the charts are visually
/// comparable; each non-zero bar carries its count as an annotation.
pub fn render_grid(table: &RatingTable, order: &[String], out_path: &Path) -> CoreResult<()> {
    if order.is_empty() {
        return Ok(());
    }

    let rows = order.len().div_ceil(GRID_COLS);
    let width = (GRID_COLS as u32) * SUBPLOT_WIDTH;
    let height = (rows as u32) * SUBPLOT_HEIGHT;

    let global_max = order
        .iter()
        .flat_map(|video| counts_for(table, video))
        .max()
        .unwrap_or(0);
    let y_ceiling = grid_y_ceiling(global_max);

    let root = BitMapBackend::new(out_path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;
    let areas = root.split_evenly((rows, GRID_COLS));

    for (area, video) in areas.iter().zip(order) {
        let counts = counts_for(table, video);

        let mut chart = ChartBuilder::on(area)
            .caption(axis_label(video), ("sans-serif", 15))
            .margin(8)
            .x_label_area_size(28)
            .y_label_area_size(36)
            .build_cartesian_2d((0i32..6i32).into_segmented(), 0u64..y_ceiling)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc("Rating")
            .y_desc("Count")
            .x_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(value) if (1..=5).contains(value) => value.to_string(),
                _ => String::new(),
            })
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(RATING_KEYS.iter().enumerate().map(|(i, &rating)| {
                let r = rating as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(r), 0u64),
                        (SegmentValue::Exact(r + 1), counts[i]),
                    ],
                    RATING_COLORS[i].filled(),
                );
                bar.set_margin(0, 0, 4, 4);
                bar
            }))
            .map_err(chart_error)?;

        // Count annotations above each non-empty bar.
        chart
            .draw_series(
                RATING_KEYS
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| counts[*i] > 0)
                    .map(|(i, &rating)| {
                        Text::new(
                            counts[i].to_string(),
                            (SegmentValue::CenterOf(rating as i32), counts[i]),
                            ("sans-serif", 12),
                        )
                    }),
            )
            .map_err(chart_error)?;
    }

    root.present().map_err(chart_error)?;
    info!(
        "Wrote rating grid chart ({} video(s)) to {}",
        order.len(),
        out_path.display()
    );
    Ok(())
}

/// Renders a single chart with one stacked column per video.
///
/// Segments stack bottom-up in rating order 1..=5 using the shared palette,
/// with a legend mapping colors to ratings.
pub fn render_stacked(table: &RatingTable, order: &[String], out_path: &Path) -> CoreResult<()> {
    if order.is_empty() {
        return Ok(());
    }

    let width = ((order.len() as u32) * STACKED_COLUMN_WIDTH).clamp(800, 4000);
    let total_max = order
        .iter()
        .map(|video| counts_for(table, video).iter().sum::<u64>())
        .max()
        .unwrap_or(0);
    let y_ceiling = grid_y_ceiling(total_max);

    let root = BitMapBackend::new(out_path, (width, STACKED_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let labels: Vec<String> = order.iter().map(|video| axis_label(video)).collect();
    let mut chart = ChartBuilder::on(&root)
        .caption("Rating counts per video", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(48)
        .build_cartesian_2d((0i32..order.len() as i32).into_segmented(), 0u64..y_ceiling)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Count")
        .x_labels(order.len())
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(index) => labels
                .get(*index as usize)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(chart_error)?;

    // One series per rating so the legend gets one entry per color; each
    // column's segments stack on the running totals from lower ratings.
    let mut stack_base = vec![0u64; order.len()];
    for (i, &rating) in RATING_KEYS.iter().enumerate() {
        let color = RATING_COLORS[i];
        let bases = stack_base.clone();
        chart
            .draw_series(order.iter().enumerate().map(|(col, video)| {
                let value = counts_for(table, video)[i];
                let bottom = bases[col];
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(col as i32), bottom),
                        (SegmentValue::Exact(col as i32 + 1), bottom + value),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))
            .map_err(chart_error)?
            .label(format!("Rating {rating}"))
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });

        for (col, video) in order.iter().enumerate() {
            stack_base[col] += counts_for(table, video)[i];
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    info!(
        "Wrote stacked rating chart ({} video(s)) to {}",
        order.len(),
        out_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::{aggregate, rank_videos, RatingCount};

    fn table() -> RatingTable {
        aggregate(&[
            RatingCount {
                video_id: Some("alpha".into()),
                rating: Some(5),
                count: 10,
            },
            RatingCount {
                video_id: Some("alpha".into()),
                rating: Some(3),
                count: 2,
            },
            RatingCount {
                video_id: Some("beta".into()),
                rating: Some(1),
                count: 4,
            },
        ])
    }

    #[test]
    fn y_ceiling_adds_truncated_headroom_and_never_collapses() {
        assert_eq!(grid_y_ceiling(10), 12);
        assert_eq!(grid_y_ceiling(100), 120);
        // 7 * 1.2 = 8.4 truncates to 8.
        assert_eq!(grid_y_ceiling(7), 8);
        assert_eq!(grid_y_ceiling(1), 1);
        assert_eq!(grid_y_ceiling(0), 1);
    }

    #[test]
    fn labels_use_the_basename_and_truncate_with_an_ellipsis() {
        assert_eq!(axis_label("short"), "short");
        assert_eq!(axis_label(""), "(unknown)");
        assert_eq!(axis_label("videos/clip.mp4"), "clip.mp4");
        assert_eq!(axis_label("/data/in/clip.mp4"), "clip.mp4");

        let long = "a-very-long-video-identifier";
        let label = axis_label(long);
        assert_eq!(label.chars().count(), 14);
        assert!(label.ends_with('\u{2026}'));

        // Basename first, then truncation.
        let label = axis_label("videos/a-long-clip-name.mp4");
        assert!(label.starts_with("a-long-clip-n"));
        assert!(label.ends_with('\u{2026}'));
    }

    #[test]
    fn grid_chart_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("grid.png");
        let table = table();
        let order = rank_videos(&table, 0);

        render_grid(&table, &order, &out).unwrap();
        assert!(out.exists());
        assert!(out.metadata().unwrap().len() > 0);
    }

    #[test]
    fn stacked_chart_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("stacked.png");
        let table = table();
        let order = rank_videos(&table, 0);

        render_stacked(&table, &order, &out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn empty_order_draws_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("none.png");
        render_grid(&RatingTable::new(), &[], &out).unwrap();
        assert!(!out.exists());
    }
}
