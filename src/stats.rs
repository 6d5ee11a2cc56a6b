use crate::models::{DataRow, SeriesDescriptor};
use serde::{Deserialize, Serialize};

/// Summary statistics for one series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub key: String,
    pub label: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub total: f64,
}

/// Compute per-series statistics over `rows`.
///
/// A row without a numeric value for a plain field counts as missing. The
/// "Other" bucket has a value in every row.
pub fn series_summary(rows: &[DataRow], series: &[SeriesDescriptor]) -> Vec<SeriesSummary> {
    let mut out = Vec::with_capacity(series.len());
    for s in series {
        let mut vals: Vec<f64> = rows.iter().filter_map(|r| s.value_opt(r)).collect();
        let missing = rows.len() - vals.len();
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let total: f64 = vals.iter().sum();
        let min = vals.first().copied();
        let max = vals.last().copied();
        let mean = if count > 0 { Some(total / count as f64) } else { None };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(SeriesSummary {
            key: s.key.clone(),
            label: s.label.clone(),
            count,
            missing,
            min,
            max,
            mean,
            median,
            total,
        });
    }
    out
}

/// Smallest and largest value a chart of `series` has to show.
///
/// Unstacked: extremes over all present values. Stacked: per row, positive
/// values stack upward and negative values downward, so the range spans the
/// tallest positive and deepest negative stacks. `None` when nothing is
/// plottable.
pub fn value_domain(
    rows: &[DataRow],
    series: &[SeriesDescriptor],
    stacked: bool,
) -> Option<(f64, f64)> {
    if series.is_empty() || rows.is_empty() {
        return None;
    }
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for row in rows {
        if stacked {
            let (mut neg, mut pos) = (0.0f64, 0.0f64);
            for s in series {
                let v = s.value_in(row);
                if v < 0.0 {
                    neg += v;
                } else {
                    pos += v;
                }
            }
            lo = lo.min(neg);
            hi = hi.max(pos);
        } else {
            for v in series.iter().filter_map(|s| s.value_opt(row)) {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if lo.is_finite() && hi.is_finite() {
        Some((lo, hi))
    } else {
        None
    }
}
