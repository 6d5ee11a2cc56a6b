//! Chart data shaping: turn raw dashboard rows into what a chart draws.
//!
//! - Series inference from the first row (`infer`)
//! - Category grouping with an "Other" bucket for stacked bars (`group`)
//! - Percentage mode (`normalize`)
//! - Relative time windows (`window`)
//!
//! [`prepare_chart`] runs them in order for one [`ChartConfig`].

pub mod group;
pub mod infer;
pub mod normalize;
pub mod text;
pub mod types;
pub mod window;

pub use group::{
    CategoryTotal, category_totals, group_categories, group_categories_with, materialize_other,
    other_bucket_key,
};
pub use infer::{complete_series, infer_series, infer_series_with};
pub use normalize::normalize_to_percentage;
pub use text::humanize_key;
pub use types::{
    ChartConfig, ChartKind, DEFAULT_DATE_KEY, DEFAULT_MAX_CATEGORIES, DEFAULT_MAX_SERIES,
    PreparedChart, ValueMode,
};
pub use window::{filter_by_window, filter_by_window_now, parse_row_date};

use crate::models::{DataRow, SeriesDescriptor, SeriesSource};
use crate::stats::value_domain;
use chrono::NaiveDate;

/// Shape `rows` for one chart.
///
/// Steps: window filter on `config.date_key`; series from `config.series`,
/// else category grouping (stacked bars) or first-row inference; percentage
/// rescaling when asked; the "Other" column written into each row; the value
/// domain. `today` anchors the time window.
///
/// Never fails: an empty result is a valid, displayable empty chart.
pub fn prepare_chart(rows: &[DataRow], config: &ChartConfig, today: NaiveDate) -> PreparedChart {
    let windowed = filter_by_window(rows, config.window, &config.date_key, today);

    let series = match &config.series {
        Some(explicit) => complete_series(explicit, &config.palette),
        None if config.kind.is_stacked() => {
            group_categories_with(&windowed, config.max_categories, &config.palette)
        }
        None => infer_series_with(&windowed, config.max_series, &config.palette),
    };

    let scaled = match config.mode {
        ValueMode::Absolute => windowed,
        // Members of an "Other" bucket are rescaled too, so the bucket's
        // per-row sum stays equal to its materialized column.
        ValueMode::Percentage => normalize_to_percentage(&windowed, &value_keys(&series)),
    };
    let shaped = materialize_other(&scaled, &series);

    let domain = value_domain(&shaped, &series, config.kind.is_stacked())
        .map(|d| pad_domain(d, config.kind.needs_zero_baseline()));

    log::debug!(
        "prepared {} chart: {} series over {} of {} rows",
        config.kind,
        series.len(),
        shaped.len(),
        rows.len()
    );

    PreparedChart {
        kind: config.kind,
        mode: config.mode,
        window: config.window,
        series,
        rows: shaped,
        domain,
    }
}

/// Row keys that carry the values of `series`, in order, without repeats.
fn value_keys(series: &[SeriesDescriptor]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for s in series {
        let own: Vec<&String> = match &s.source {
            SeriesSource::Field => vec![&s.key],
            SeriesSource::Other { members } => members.iter().collect(),
        };
        for k in own {
            if !keys.contains(k) {
                keys.push(k.clone());
            }
        }
    }
    keys
}

/// Include zero when a baseline is needed; widen a flat range by one each side.
fn pad_domain((mut lo, mut hi): (f64, f64), zero_baseline: bool) -> (f64, f64) {
    if zero_baseline {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    (lo, hi)
}
