//! Rating-count aggregation for the chart job.
//!
//! Reads per-video rating counts from a pre-existing sqlite database
//! (read-only; this crate never writes it), aggregates them in memory, and
//! ranks videos by total count for the renderers in [`chart`].

use crate::error::{CoreError, CoreResult};

use rusqlite::{Connection, OpenFlags};

use std::collections::BTreeMap;
use std::path::Path;

/// Chart rendering for aggregated rating counts
pub mod chart;

pub use chart::{render_grid, render_stacked};

/// Rating values drawn on the chart axes.
pub const RATING_KEYS: [i64; 5] = [1, 2, 3, 4, 5];

/// One row of the grouped ratings query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingCount {
    pub video_id: Option<String>,
    pub rating: Option<i64>,
    pub count: u64,
}

/// A rating value, with a sentinel for rows whose rating column is NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rating {
    Rated(i64),
    Unrated,
}

/// Aggregated counts: video id -> rating -> count.
pub type RatingTable = BTreeMap<String, BTreeMap<Rating, u64>>;

/// Fetches `(video_id, rating, count)` grouped by video and rating.
///
/// A missing database file and a failing query are both errors; the caller
/// treats an empty result set as a benign early exit.
pub fn fetch_rating_counts(db_path: &Path) -> CoreResult<Vec<RatingCount>> {
    if !db_path.exists() {
        return Err(CoreError::DatabaseMissing(db_path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let mut stmt = conn.prepare(
        "SELECT video_id, rating, COUNT(*) FROM ratings GROUP BY video_id, rating",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RatingCount {
            video_id: row.get(0)?,
            rating: row.get(1)?,
            count: row.get::<_, i64>(2)?.max(0) as u64,
        })
    })?;

    let mut counts = Vec::new();
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}

/// Aggregates query rows into a per-video rating table.
///
/// NULL video ids collapse to the empty string, NULL ratings to the
/// [`Rating::Unrated`] sentinel.
pub fn aggregate(rows: &[RatingCount]) -> RatingTable {
    let mut table = RatingTable::new();
    for row in rows {
        let video = row.video_id.clone().unwrap_or_default();
        let rating = match row.rating {
            Some(value) => Rating::Rated(value),
            None => Rating::Unrated,
        };
        *table
            .entry(video)
            .or_default()
            .entry(rating)
            .or_insert(0) += row.count;
    }
    table
}

/// Ranks videos by total count, descending, optionally truncated to the
/// top N. A `top` of 0 keeps everything.
pub fn rank_videos(table: &RatingTable, top: usize) -> Vec<String> {
    let mut totals: Vec<(&String, u64)> = table
        .iter()
        .map(|(video, counts)| (video, counts.values().sum()))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    if top > 0 {
        totals.truncate(top);
    }
    totals.into_iter().map(|(video, _)| video.clone()).collect()
}

/// Counts for ratings 1..=5 for one video, missing keys as zero.
pub(crate) fn counts_for(table: &RatingTable, video: &str) -> [u64; 5] {
    let mut values = [0u64; 5];
    if let Some(counts) = table.get(video) {
        for (i, key) in RATING_KEYS.iter().enumerate() {
            values[i] = counts.get(&Rating::Rated(*key)).copied().unwrap_or(0);
        }
    }
    values
}
