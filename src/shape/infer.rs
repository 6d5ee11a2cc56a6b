//! Series inference from the first row.

use crate::models::{DataRow, SeriesDescriptor};
use crate::palette::Palette;

use super::text::humanize_key;

/// Infer up to `max_series` plottable series using the default palette.
///
/// Only the first row is inspected: a key that is `null` or non-numeric
/// there is skipped even if later rows carry numbers for it. Pass an
/// explicit series list (see [`super::ChartConfig::series`]) when that
/// matters.
pub fn infer_series(rows: &[DataRow], max_series: usize) -> Vec<SeriesDescriptor> {
    infer_series_with(rows, max_series, &Palette::default())
}

/// Same as [`infer_series`] with a caller-supplied palette.
pub fn infer_series_with(
    rows: &[DataRow],
    max_series: usize,
    palette: &Palette,
) -> Vec<SeriesDescriptor> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    first
        .numeric_fields()
        .take(max_series)
        .enumerate()
        .map(|(idx, (key, _))| SeriesDescriptor::field(key, humanize_key(key), palette.color(idx)))
        .collect()
}

/// Fill in empty labels and colors of an explicit series list.
pub fn complete_series(series: &[SeriesDescriptor], palette: &Palette) -> Vec<SeriesDescriptor> {
    series
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            let mut s = s.clone();
            if s.label.trim().is_empty() {
                s.label = humanize_key(&s.key);
            }
            if s.color.trim().is_empty() {
                s.color = if s.is_other() {
                    palette.other_color()
                } else {
                    palette.color(idx)
                };
            }
            s
        })
        .collect()
}
