//! Row-level front end for flattened air-message batches.
//!
//! Each hourly batch is a gzip-compressed CSV whose first row is a header.
//! The five key columns (msgtime, aid, tmaId, dap, apt) sit at fixed early
//! positions; every other column is mapped by its header name, since the
//! header is read per batch and later columns are not guaranteed a single
//! universal order.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Result, SummaryError};

/// Composite identifier of one flight within a day's data.
///
/// All four parts are required; a message missing any of them cannot be
/// attributed to a flight and is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightKey {
    pub aid: String,
    pub tma_id: String,
    pub dap: String,
    pub apt: String,
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aid={},tmaId={},dap={},apt={}",
            self.aid, self.tma_id, self.dap, self.apt
        )
    }
}

/// One parsed partial-state update message.
///
/// `fields` holds only the populated non-key columns, as (header name,
/// value) pairs in column order. An empty column means "no information this
/// message", never "cleared value", so empties are not carried.
#[derive(Debug, Clone)]
pub struct UpdateRecord {
    pub msg_time: String,
    pub key: FlightKey,
    pub fields: Vec<(String, String)>,
}

impl UpdateRecord {
    /// Maps one CSV data row to a record, or `None` when any key column is
    /// blank or the row is too short to hold the key columns.
    pub fn from_row(headers: &csv::StringRecord, row: &csv::StringRecord) -> Option<Self> {
        let msg_time = row.get(0)?;
        let aid = row.get(1)?;
        let tma_id = row.get(2)?;
        let dap = row.get(3)?;
        let apt = row.get(4)?;

        if aid.is_empty() || tma_id.is_empty() || dap.is_empty() || apt.is_empty() {
            return None;
        }

        let fields = headers
            .iter()
            .zip(row.iter())
            .skip(5)
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Some(UpdateRecord {
            msg_time: msg_time.to_string(),
            key: FlightKey {
                aid: aid.to_string(),
                tma_id: tma_id.to_string(),
                dap: dap.to_string(),
                apt: apt.to_string(),
            },
            fields,
        })
    }
}

/// Opens one hourly batch as a CSV reader, transparently gunzipping `.gz`
/// files.
///
/// The reader is flexible because the upstream flattener leaves a trailing
/// comma on every data row, making rows one column longer than the header.
///
/// # Errors
///
/// [`SummaryError::BatchRead`] when the file cannot be opened. This is
/// fatal to the run: a missing batch would silently understate the day.
pub fn open_batch(path: &Path) -> Result<csv::Reader<Box<dyn Read>>> {
    let file = File::open(path).map_err(|source| SummaryError::BatchRead {
        path: path.display().to_string(),
        source,
    })?;

    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(csv::ReaderBuilder::new().flexible(true).from_reader(reader))
}
