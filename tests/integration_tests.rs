//! End-to-end pipeline tests against real gzip-compressed hourly batches.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use flate2::Compression;
use flate2::write::GzEncoder;
use tbfm_daily_summary::error::SummaryError;
use tbfm_daily_summary::merge::{FlightStore, merge_batches};
use tbfm_daily_summary::output::{summary_path, write_summary};
use tbfm_daily_summary::window::select_window;

// Batches carry their own header; the merge engine maps columns by name, so
// a reduced schema is enough here.
const BATCH_HEADER: &str = "msgtime,aid,tmaId,dap,apt,cat,rwy,etd,std";

fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tbfm_integration_{}", name));
    let _ = fs::remove_dir_all(&dir); // clean up any prior run
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_batch(dir: &Path, name: &str, rows: &[&str]) {
    let file = File::create(dir.join(name)).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    writeln!(encoder, "{}", BATCH_HEADER).unwrap();
    for row in rows {
        // The upstream flattener leaves a trailing comma on data rows
        writeln!(encoder, "{},", row).unwrap();
    }
    encoder.finish().unwrap();
}

/// Creates all 23 window batches for 2019-11-01, empty except where
/// `rows_for_hour` provides content.
fn seed_window(dir: &Path, rows_for_hour: &HashMap<&str, Vec<&str>>) {
    let mut stamps: Vec<String> = (7..24).map(|h| format!("20191101_{:02}00", h)).collect();
    stamps.extend((0..7).map(|h| format!("20191102_{:02}00", h)));

    for stamp in &stamps {
        let rows = rows_for_hour
            .get(stamp.as_str())
            .cloned()
            .unwrap_or_default();
        write_batch(dir, &format!("tbfm.{}.air.csv.gz", stamp), &rows);
    }
}

fn read_summary(path: &Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (headers, rows)
}

fn col<'a>(headers: &csv::StringRecord, row: &'a csv::StringRecord, name: &str) -> &'a str {
    let idx = headers.iter().position(|h| h == name).unwrap();
    row.get(idx).unwrap()
}

#[test]
fn test_full_pipeline() {
    let dir = fixture_dir("full");
    let date = NaiveDate::from_ymd_opt(2019, 11, 1).unwrap();

    let mut rows: HashMap<&str, Vec<&str>> = HashMap::new();
    rows.insert(
        "20191101_0700",
        vec!["2019-11-01T07:10:00.123Z,AAL100,ZFW,KDFW,DFW,JET,,,"],
    );
    rows.insert(
        "20191101_0800",
        vec![
            // STD first sighting for AAL100, plus a runway
            "2019-11-01T08:05:00.000Z,AAL100,ZFW,KDFW,DFW,,17R,,2019-11-01T09:00:00Z",
            // Malformed: no aid, must be skipped without effect
            "2019-11-01T08:06:00.000Z,,ZFW,KDFW,DFW,JET,,,",
            // Second flight
            "2019-11-01T08:20:00.000Z,SWA200,ZME,KBNA,BNA,JET,,,",
        ],
    );
    rows.insert(
        "20191101_0900",
        vec![
            // Genuine STD change
            "2019-11-01T08:55:00.000Z,AAL100,ZFW,KDFW,DFW,,,,2019-11-01T09:10:00Z",
            // Duplicate of the same STD value
            "2019-11-01T08:58:00.000Z,AAL100,ZFW,KDFW,DFW,,,,2019-11-01T09:10:00Z",
        ],
    );
    seed_window(&dir, &rows);

    let batches = select_window(&dir, date).unwrap();
    assert_eq!(batches.len(), 23);

    let mut store = FlightStore::new();
    let counts = merge_batches(&batches, &mut store).unwrap();
    assert_eq!(counts.batches, 23);
    assert_eq!(counts.records, 5);
    assert_eq!(counts.skipped, 1);

    let out_path = summary_path(&dir, date);
    write_summary(&out_path, &store).unwrap();

    let (headers, summary_rows) = read_summary(&out_path);
    assert_eq!(headers.len(), 61);
    assert_eq!(summary_rows.len(), 2);

    // Insertion order: AAL100 was seen first
    let aal = &summary_rows[0];
    assert_eq!(col(&headers, aal, "aid"), "AAL100");
    assert_eq!(col(&headers, aal, "firstmsgtime"), "2019-11-01T07:10:00.123Z");
    assert_eq!(col(&headers, aal, "lastmsgtime"), "2019-11-01T08:58:00.000Z");
    // cat populated in hour one survives later silent messages
    assert_eq!(col(&headers, aal, "cat"), "JET");
    assert_eq!(col(&headers, aal, "rwy"), "17R");
    assert_eq!(col(&headers, aal, "std"), "2019-11-01T09:10:00Z");
    assert_eq!(col(&headers, aal, "firststdtime"), "2019-11-01T08:05:00.000Z");
    assert_eq!(col(&headers, aal, "laststdtime"), "2019-11-01T08:55:00.000Z");
    // 09:10:00 minus 08:55:00
    assert_eq!(col(&headers, aal, "stdminusnowtime"), "900");
    assert_eq!(col(&headers, aal, "numstdupdates"), "1");

    let swa = &summary_rows[1];
    assert_eq!(col(&headers, swa, "aid"), "SWA200");
    assert_eq!(col(&headers, swa, "std"), "");
    assert_eq!(col(&headers, swa, "stdminusnowtime"), "-999");
    assert_eq!(col(&headers, swa, "numstdupdates"), "0");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_incomplete_window_aborts_before_merge() {
    let dir = fixture_dir("incomplete");
    let date = NaiveDate::from_ymd_opt(2019, 11, 1).unwrap();

    seed_window(&dir, &HashMap::new());
    fs::remove_file(dir.join("tbfm.20191101_1500.air.csv.gz")).unwrap();

    let err = select_window(&dir, date).unwrap_err();
    match err {
        SummaryError::IncompleteWindow { missing, .. } => {
            assert_eq!(missing, vec!["20191101_1500".to_string()]);
        }
        other => panic!("expected IncompleteWindow, got {other:?}"),
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unreadable_batch_is_fatal() {
    let dir = fixture_dir("unreadable");
    seed_window(&dir, &HashMap::new());

    let date = NaiveDate::from_ymd_opt(2019, 11, 1).unwrap();
    let batches = select_window(&dir, date).unwrap();

    // Window was complete at scan time but a batch vanished before merge
    fs::remove_file(&batches[4]).unwrap();

    let mut store = FlightStore::new();
    let err = merge_batches(&batches, &mut store).unwrap_err();
    assert!(matches!(err, SummaryError::BatchRead { .. }));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_header_only_batches_produce_empty_store() {
    let dir = fixture_dir("header_only");
    let date = NaiveDate::from_ymd_opt(2019, 11, 1).unwrap();
    seed_window(&dir, &HashMap::new());

    let batches = select_window(&dir, date).unwrap();
    let mut store = FlightStore::new();
    let counts = merge_batches(&batches, &mut store).unwrap();

    assert_eq!(counts.batches, 23);
    assert_eq!(counts.records, 0);
    assert!(store.is_empty());

    fs::remove_dir_all(&dir).unwrap();
}
