//! Time-window filtering of dated rows.

use crate::models::{DataRow, TimeWindow};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a row's date value.
///
/// Strings may be `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM` (first of month),
/// RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM:SS`. Integers are Unix epoch
/// milliseconds. Anything else is `None`.
pub fn parse_row_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    // year-month only
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
}

/// Keep rows whose `date_key` falls on or after the window's cutoff relative
/// to `today`. Order is preserved.
///
/// [`TimeWindow::All`] returns every row. Otherwise rows with a missing or
/// unparsable date are dropped.
pub fn filter_by_window(
    rows: &[DataRow],
    window: TimeWindow,
    date_key: &str,
    today: NaiveDate,
) -> Vec<DataRow> {
    let Some(cutoff) = window.cutoff(today) else {
        return rows.to_vec();
    };
    let mut undated = 0usize;
    let kept: Vec<DataRow> = rows
        .iter()
        .filter(|row| match row.get(date_key).and_then(parse_row_date) {
            Some(d) => d >= cutoff,
            None => {
                undated += 1;
                false
            }
        })
        .cloned()
        .collect();
    if undated > 0 {
        log::warn!("dropped {undated} row(s) without a usable `{date_key}` value");
    }
    log::debug!("window {window} from {cutoff}: kept {} of {} rows", kept.len(), rows.len());
    kept
}

/// [`filter_by_window`] against the local calendar date.
pub fn filter_by_window_now(rows: &[DataRow], window: TimeWindow, date_key: &str) -> Vec<DataRow> {
    filter_by_window(rows, window, date_key, Local::now().date_naive())
}
