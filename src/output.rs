//! Serialization of the consolidated daily summary.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::flight::SUMMARY_COLUMNS;
use crate::merge::FlightStore;

/// Path of the summary file for one target date.
pub fn summary_path(outdir: &Path, target_date: NaiveDate) -> PathBuf {
    outdir.join(format!(
        "{}_tbfm_swim_flightsummary_AIR_out.csv",
        target_date.format("%Y%m%d")
    ))
}

/// Writes one fixed-schema CSV row per flight, in store insertion order.
///
/// Pure serialization: no merging happens here. The header is written
/// unconditionally from [`SUMMARY_COLUMNS`], so a day where every record
/// was skipped still yields a header-only file with the full schema.
pub fn write_summary(path: &Path, store: &FlightStore) -> Result<()> {
    debug!(path = %path.display(), flights = store.len(), "Writing summary");

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(SUMMARY_COLUMNS)?;
    for flight in store.iter() {
        writer.serialize(flight)?;
    }
    writer.flush()?;

    Ok(())
}
