//! The incremental merge engine.
//!
//! Folds the ordered stream of partial update records into one
//! [`FlightSummary`] per flight key. "Latest" is defined purely by stream
//! position (batch order, then line order), never by comparing timestamp
//! values, so batches must be merged in the chronological order produced by
//! the window selector and rows in their original sequence.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::flight::FlightSummary;
use crate::parser::{FlightKey, UpdateRecord, open_batch};
use crate::timedelta::time_diff_secs;

/// Owns every per-flight accumulator for one run.
///
/// Accumulators are created on first sight of a key and live for the rest
/// of the run. Iteration follows key insertion order, which keeps output
/// stable within a run.
#[derive(Debug, Default)]
pub struct FlightStore {
    index: HashMap<FlightKey, usize>,
    flights: Vec<FlightSummary>,
}

impl FlightStore {
    pub fn new() -> Self {
        FlightStore::default()
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    pub fn get(&self, key: &FlightKey) -> Option<&FlightSummary> {
        self.index.get(key).map(|&i| &self.flights[i])
    }

    /// Accumulators in key insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FlightSummary> {
        self.flights.iter()
    }

    fn get_or_create(&mut self, key: &FlightKey, msg_time: &str) -> &mut FlightSummary {
        let idx = match self.index.get(key) {
            Some(&i) => i,
            None => {
                debug!(flight = %key, "New flight");
                self.flights.push(FlightSummary::new(key, msg_time));
                let i = self.flights.len() - 1;
                self.index.insert(key.clone(), i);
                i
            }
        };
        &mut self.flights[idx]
    }
}

/// Totals reported after a merge run.
#[derive(Debug, Default)]
pub struct MergeCounts {
    pub batches: usize,
    pub records: u64,
    pub skipped: u64,
}

/// Merges one record into the store.
///
/// Every populated field overwrites the stored value (last-write-wins);
/// fields absent from the record never touch the accumulator. The `std`
/// column additionally feeds the change-tracking metrics before it is
/// stored. Only `std` gets this treatment: other fields overwrite silently
/// by design.
pub fn merge_record(store: &mut FlightStore, rec: &UpdateRecord) {
    let flight = store.get_or_create(&rec.key, &rec.msg_time);
    // A blank msgtime is "no information", like any other empty column
    if !rec.msg_time.is_empty() {
        flight.lastmsgtime = rec.msg_time.clone();
    }

    for (name, value) in &rec.fields {
        if name == "std" {
            track_std_change(flight, value, &rec.msg_time);
        }
        flight.set_field(name, value);
    }
}

/// Updates the STD-derived metrics given an incoming populated `std` value,
/// before the value itself is stored.
fn track_std_change(flight: &mut FlightSummary, new_std: &str, msg_time: &str) {
    if flight.std.is_empty() {
        // First sighting of an STD for this flight
        flight.firststdtime = msg_time.to_string();
        flight.laststdtime = msg_time.to_string();
        set_std_delta(flight, new_std, msg_time);
    } else if flight.std != new_std {
        flight.laststdtime = msg_time.to_string();
        set_std_delta(flight, new_std, msg_time);
        flight.numstdupdates += 1;
    }
    // Identical repeat of the stored value: duplicate message, no update
}

fn set_std_delta(flight: &mut FlightSummary, new_std: &str, msg_time: &str) {
    match time_diff_secs(new_std, msg_time) {
        Ok(diff) => flight.stdminusnowtime = diff,
        Err(e) => {
            warn!(aid = %flight.aid, error = %e, "STD delta left unset");
        }
    }
}

/// Folds every batch, in order, into the store.
///
/// Row-level failures (unreadable line, missing key fields) are counted and
/// skipped; a batch that cannot be opened aborts the whole run because the
/// 23-batch window is a stated precondition for a valid daily summary.
pub fn merge_batches(paths: &[PathBuf], store: &mut FlightStore) -> Result<MergeCounts> {
    let mut counts = MergeCounts::default();

    for path in paths {
        info!(batch = %path.display(), "Processing batch");

        let mut reader = open_batch(path)?;
        let headers = reader.headers()?.clone();

        for result in reader.records() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    debug!(error = %e, "Unreadable row skipped");
                    counts.skipped += 1;
                    continue;
                }
            };

            match UpdateRecord::from_row(&headers, &row) {
                Some(rec) => {
                    merge_record(store, &rec);
                    counts.records += 1;
                }
                None => {
                    debug!("Row missing key fields skipped");
                    counts.skipped += 1;
                }
            }
        }

        counts.batches += 1;
    }

    Ok(counts)
}
