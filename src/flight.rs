//! Per-flight accumulator for the daily summary.

use serde::Serialize;

use crate::parser::FlightKey;

/// Sentinel emitted for `stdminusnowtime` when no STD delta was ever
/// computed for a flight.
pub const STD_DELTA_UNSET: i64 = -999;

/// The summary output schema, in the exact order [`FlightSummary`]
/// serializes its fields. The header is written from this list even when a
/// run observed no flights, so the downstream filter always sees the full
/// schema.
pub const SUMMARY_COLUMNS: [&str; 61] = [
    "lastmsgtime",
    "aid",
    "tmaId",
    "dap",
    "apt",
    "mfx",
    "cat",
    "gat",
    "bcn",
    "rwy",
    "scn",
    "fps",
    "acs",
    "typ",
    "eng",
    "spd",
    "trw",
    "sfz",
    "rfz",
    "eta_rwy",
    "eta_mfx",
    "eta_oma",
    "eta_sfx",
    "eta_dfx",
    "eta_o4a",
    "eta_o3a",
    "eta_ooa",
    "sta_o4a",
    "sta_o3a",
    "sta_ooa",
    "sta_oma",
    "sta_dfx",
    "sta_sfx",
    "ara",
    "tds",
    "cfx",
    "ctm",
    "etd",
    "std",
    "etm",
    "est",
    "a10",
    "tcr",
    "dfx",
    "sfx",
    "oma",
    "ooa",
    "o3a",
    "o4a",
    "ina",
    "sus",
    "man",
    "sta_rwy",
    "sta_mfx",
    "cfg",
    "tra",
    "firstmsgtime",
    "laststdtime",
    "firststdtime",
    "stdminusnowtime",
    "numstdupdates",
];

/// The latest known state of one flight, accumulated across a day of
/// partial update messages.
///
/// Serializes to exactly one row of the consolidated summary CSV: the five
/// identifying columns, the 51 tracked message fields in canonical order,
/// then the five derived columns. Field order here is the output schema.
#[derive(Debug, Default, Serialize)]
pub struct FlightSummary {
    pub lastmsgtime: String,
    pub aid: String,
    #[serde(rename = "tmaId")]
    pub tma_id: String,
    pub dap: String,
    pub apt: String,

    pub mfx: String,
    pub cat: String,
    pub gat: String,
    pub bcn: String,
    pub rwy: String,
    pub scn: String,
    pub fps: String,
    pub acs: String,
    pub typ: String,
    pub eng: String,
    pub spd: String,
    pub trw: String,
    pub sfz: String,
    pub rfz: String,
    pub eta_rwy: String,
    pub eta_mfx: String,
    pub eta_oma: String,
    pub eta_sfx: String,
    pub eta_dfx: String,
    pub eta_o4a: String,
    pub eta_o3a: String,
    pub eta_ooa: String,
    pub sta_o4a: String,
    pub sta_o3a: String,
    pub sta_ooa: String,
    pub sta_oma: String,
    pub sta_dfx: String,
    pub sta_sfx: String,
    pub ara: String,
    pub tds: String,
    pub cfx: String,
    pub ctm: String,
    pub etd: String,
    pub std: String,
    pub etm: String,
    pub est: String,
    pub a10: String,
    pub tcr: String,
    pub dfx: String,
    pub sfx: String,
    pub oma: String,
    pub ooa: String,
    pub o3a: String,
    pub o4a: String,
    pub ina: String,
    pub sus: String,
    pub man: String,
    pub sta_rwy: String,
    pub sta_mfx: String,
    pub cfg: String,
    pub tra: String,

    pub firstmsgtime: String,
    pub laststdtime: String,
    pub firststdtime: String,
    pub stdminusnowtime: i64,
    pub numstdupdates: u32,
}

impl FlightSummary {
    /// Creates the accumulator for a flight's first observed message.
    /// `firstmsgtime` is set here once and never overwritten.
    pub fn new(key: &FlightKey, msg_time: &str) -> Self {
        FlightSummary {
            lastmsgtime: msg_time.to_string(),
            aid: key.aid.clone(),
            tma_id: key.tma_id.clone(),
            dap: key.dap.clone(),
            apt: key.apt.clone(),
            firstmsgtime: msg_time.to_string(),
            stdminusnowtime: STD_DELTA_UNSET,
            ..Default::default()
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let s = self;
        macro_rules! slots {
            ($($f:ident),* $(,)?) => {
                match name {
                    $(stringify!($f) => Some(&mut s.$f),)*
                    _ => None,
                }
            };
        }

        slots!(
            mfx, cat, gat, bcn, rwy, scn, fps, acs, typ, eng, spd, trw, sfz, rfz, eta_rwy,
            eta_mfx, eta_oma, eta_sfx, eta_dfx, eta_o4a, eta_o3a, eta_ooa, sta_o4a, sta_o3a,
            sta_ooa, sta_oma, sta_dfx, sta_sfx, ara, tds, cfx, ctm, etd, std, etm, est, a10,
            tcr, dfx, sfx, oma, ooa, o3a, o4a, ina, sus, man, sta_rwy, sta_mfx, cfg, tra,
        )
    }

    /// Stores `value` into the tracked field named by a batch header column.
    /// Returns `false` for column names outside the tracked schema, which
    /// the caller ignores.
    pub fn set_field(&mut self, name: &str, value: &str) -> bool {
        match self.field_mut(name) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }
}
