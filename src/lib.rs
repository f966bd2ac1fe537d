//! Consolidates one local day of flattened TBFM SWIM air messages into a
//! single latest-known-state record per flight.
//!
//! The pipeline selects the day's 23-hour batch window, folds every partial
//! update message into a per-flight accumulator with last-write-wins field
//! merge and STD change tracking, and writes the consolidated summary CSV.

pub mod error;
pub mod flight;
pub mod merge;
pub mod output;
pub mod parser;
pub mod timedelta;
pub mod window;
