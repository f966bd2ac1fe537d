//! Signed second differences between message timestamps.
//!
//! TBFM messages carry two timestamp shapes on the same reference clock:
//! second precision (`2019-11-01T08:00:00Z`) in scheduling fields and
//! sub-second precision (`2019-11-01T07:50:42.794Z`) in message times.

use chrono::NaiveDateTime;

use crate::error::SummaryError;

const FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%SZ";
const FORMAT_SUBSEC: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

fn parse_instant(value: &str) -> Result<NaiveDateTime, SummaryError> {
    NaiveDateTime::parse_from_str(value, FORMAT_SECONDS)
        .or_else(|_| NaiveDateTime::parse_from_str(value, FORMAT_SUBSEC))
        .map_err(|_| SummaryError::TimestampParse(value.to_string()))
}

/// Returns `first - second` in whole seconds, sign preserved.
///
/// Sub-second precision is truncated, not rounded. Either argument may use
/// either timestamp format.
///
/// # Errors
///
/// [`SummaryError::TimestampParse`] if either string matches neither format.
/// Callers treat this as "derived metric left unset" rather than aborting.
pub fn time_diff_secs(first: &str, second: &str) -> Result<i64, SummaryError> {
    let first = parse_instant(first)?;
    let second = parse_instant(second)?;
    Ok(first.and_utc().timestamp() - second.and_utc().timestamp())
}
