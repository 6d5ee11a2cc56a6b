//! Percentage mode: rescale each row to shares of its own total.

use crate::models::DataRow;

/// Replace `row[key]` with `row[key] / total * 100` for every key in `keys`,
/// where `total` is the row's sum over `keys` (missing keys count as zero).
///
/// Rows whose total is zero come back unchanged. Keys that are missing or
/// non-numeric in a row stay as they are. The input is not modified.
pub fn normalize_to_percentage<S: AsRef<str>>(rows: &[DataRow], keys: &[S]) -> Vec<DataRow> {
    rows.iter()
        .map(|row| {
            let total: f64 = keys.iter().map(|k| row.value_or_zero(k.as_ref())).sum();
            if total == 0.0 {
                return row.clone();
            }
            let mut out = row.clone();
            for key in keys {
                let key = key.as_ref();
                if let Some(v) = row.number(key) {
                    out.set_number(key, v / total * 100.0);
                }
            }
            out
        })
        .collect()
}
