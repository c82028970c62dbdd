//! No-mock history tests: write real files, read them back.

use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use tally_history::{read_history, CsvHistoryWriter, HistoryRecord, HistorySink, StationarityFlag};
use tempfile::TempDir;

fn at(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(14, minute, 0)
        .unwrap()
}

fn record(series: Vec<u64>, flag: StationarityFlag, autocorr: Option<f64>) -> HistoryRecord {
    let n = series.len();
    let lambda = series.iter().sum::<u64>() as f64 / n as f64;
    HistoryRecord {
        recorded_at: at(n as u32 % 60),
        observation_count: n,
        lambda,
        variance: 0.5,
        autocorrelation: autocorr,
        stationarity: flag,
        series,
    }
}

#[test]
fn written_history_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    let mut writer = CsvHistoryWriter::new(&path);

    let first = record(vec![1; 10], StationarityFlag::Unknown, None);
    let second = record((0..20).map(|i| i % 3).collect(), StationarityFlag::Yes, Some(0.25));
    writer.append(&first).unwrap();
    writer.append(&second).unwrap();

    let records = read_history(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].series, first.series);
    assert_eq!(records[0].autocorrelation, None);
    assert_eq!(records[0].stationarity, StationarityFlag::Unknown);
    assert_eq!(records[1].series, second.series);
    assert_eq!(records[1].observation_count, 20);
    assert_eq!(records[1].autocorrelation, Some(0.25));
    assert_eq!(records[1].recorded_at, second.recorded_at);
}

#[test]
fn header_only_file_has_no_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(
        &path,
        "Date,Time,Nb_minutes,Lambda,Variance,Autocorr(1),Stationarity,Series\n",
    )
    .unwrap();
    assert!(read_history(&path).unwrap().is_empty());
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    assert!(read_history(&dir.path().join("absent.csv")).is_err());
}
