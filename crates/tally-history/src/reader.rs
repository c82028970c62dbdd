//! History file reader.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};

use crate::format::split_row;
use crate::record::{
    parse_series_literal, HistoryRecord, StationarityFlag, DATE_FORMAT, HISTORY_COLUMNS,
    TIME_FORMAT,
};
use crate::writer::HistoryError;

/// Read every record from a history file.
///
/// The header line is skipped; blank lines are ignored. Any malformed row
/// fails the whole read with its 1-based line number.
pub fn read_history(path: &Path) -> Result<Vec<HistoryRecord>, HistoryError> {
    let content = std::fs::read_to_string(path).map_err(|e| HistoryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_history(&content)
}

/// Parse history file content.
pub fn parse_history(content: &str) -> Result<Vec<HistoryRecord>, HistoryError> {
    let mut records = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with(HISTORY_COLUMNS[0]) {
            continue;
        }
        records.push(parse_line(line, line_no)?);
    }
    Ok(records)
}

fn parse_line(line: &str, line_no: usize) -> Result<HistoryRecord, HistoryError> {
    let malformed = |message: String| HistoryError::Malformed {
        line: line_no,
        message,
    };

    let fields = split_row(line).ok_or_else(|| malformed("unterminated quote".to_string()))?;
    if fields.len() != HISTORY_COLUMNS.len() {
        return Err(malformed(format!(
            "expected {} fields, got {}",
            HISTORY_COLUMNS.len(),
            fields.len()
        )));
    }

    let date = NaiveDate::parse_from_str(&fields[0], DATE_FORMAT)
        .map_err(|e| malformed(format!("bad date {:?}: {}", fields[0], e)))?;
    let time = NaiveTime::parse_from_str(&fields[1], TIME_FORMAT)
        .map_err(|e| malformed(format!("bad time {:?}: {}", fields[1], e)))?;
    let observation_count = fields[2]
        .trim()
        .parse::<usize>()
        .map_err(|e| malformed(format!("bad count {:?}: {}", fields[2], e)))?;
    let lambda = parse_float(&fields[3], "lambda").map_err(&malformed)?;
    let variance = parse_float(&fields[4], "variance").map_err(&malformed)?;
    let autocorrelation = if fields[5].trim().is_empty() {
        None
    } else {
        Some(parse_float(&fields[5], "autocorrelation").map_err(&malformed)?)
    };
    let stationarity = StationarityFlag::from_field(&fields[6])
        .ok_or_else(|| malformed(format!("bad stationarity flag {:?}", fields[6])))?;
    let series = parse_series_literal(&fields[7])
        .ok_or_else(|| malformed(format!("bad series {:?}", fields[7])))?;

    Ok(HistoryRecord {
        recorded_at: date.and_time(time),
        observation_count,
        lambda,
        variance,
        autocorrelation,
        stationarity,
        series,
    })
}

fn parse_float(field: &str, name: &str) -> Result<f64, String> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad {} {:?}: {}", name, field, e))
}
