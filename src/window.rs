//! Selection of the 23-hour batch window for one local day.
//!
//! The local day starts with the 0700 file of the target date and ends with
//! the 0600 file of the next calendar date. End users read results in local
//! time, and this split falls in the lowest-demand hours so it loses the
//! fewest messages between days.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Result, SummaryError};

/// Number of hourly batches a complete window holds (0700-2300 plus 0000-0600).
pub const WINDOW_HOURS: usize = 23;

const BATCH_SUFFIX: &str = "air.csv.gz";

/// The (date, hour) pairs of the window in chronological order.
fn window_hours(target_date: NaiveDate) -> Vec<(NaiveDate, u32)> {
    // Dates are well inside chrono's range, succ_opt cannot fail here.
    let next_day = target_date.succ_opt().unwrap_or(target_date);
    (7..24)
        .map(|h| (target_date, h))
        .chain((0..7).map(|h| (next_day, h)))
        .collect()
}

/// Scans `dir` for the hourly air-message batches covering the local day
/// `target_date` and returns their paths in chronological order.
///
/// A batch for hour `HH` of date `D` is any file whose name contains
/// `{D}_{HH}00` (date formatted `YYYYMMDD`) and ends with `air.csv.gz`.
///
/// # Errors
///
/// [`SummaryError::IncompleteWindow`] if fewer than [`WINDOW_HOURS`] batches
/// match, reporting which hours have no file. The run must not proceed with
/// a partial window.
pub fn select_window(dir: &Path, target_date: NaiveDate) -> Result<Vec<PathBuf>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    let mut selected = Vec::new();
    let mut missing = Vec::new();

    for (date, hour) in window_hours(target_date) {
        let stamp = format!("{}_{:02}00", date.format("%Y%m%d"), hour);
        let mut matched = false;
        for name in &names {
            if name.contains(&stamp) && name.ends_with(BATCH_SUFFIX) {
                debug!(batch = %name, hour = %stamp, "Batch matched");
                selected.push(dir.join(name));
                matched = true;
            }
        }
        if !matched {
            missing.push(stamp);
        }
    }

    if selected.len() < WINDOW_HOURS {
        return Err(SummaryError::IncompleteWindow {
            date: target_date.format("%Y%m%d").to_string(),
            expected: WINDOW_HOURS,
            found: selected
                .iter()
                .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
                .map(|n| n.to_string())
                .collect(),
            missing,
        });
    }

    Ok(selected)
}
