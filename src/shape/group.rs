//! Category grouping for stacked bars: keep the biggest categories, fold the rest.

use crate::models::{DataRow, OTHER_KEY, SeriesDescriptor};
use crate::palette::Palette;
use ahash::AHashMap;
use std::cmp::Ordering;

use super::text::humanize_key;

/// Category total: one numeric key and the sum of its values over all rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub key: String,
    pub total: f64,
}

/// Sum every numeric, non-anchor key across all rows.
///
/// Keys come back in first-seen order (row by row, key by key). Non-numeric
/// values add nothing but still register the key if it is numeric elsewhere.
pub fn category_totals(rows: &[DataRow]) -> Vec<CategoryTotal> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for row in rows {
        for (key, value) in row.numeric_fields() {
            match index.get(key) {
                Some(&i) => totals[i].total += value,
                None => {
                    index.insert(key, totals.len());
                    totals.push(CategoryTotal {
                        key: key.to_string(),
                        total: value,
                    });
                }
            }
        }
    }
    totals
}

/// Rank categories by total and keep at most `max_categories` descriptors,
/// using the default palette.
///
/// When there are more categories than `max_categories`, the top
/// `max_categories - 1` are kept and the rest fold into one trailing "Other"
/// descriptor whose value is summed per row when read.
pub fn group_categories(rows: &[DataRow], max_categories: usize) -> Vec<SeriesDescriptor> {
    group_categories_with(rows, max_categories, &Palette::default())
}

/// Same as [`group_categories`] with a caller-supplied palette.
pub fn group_categories_with(
    rows: &[DataRow],
    max_categories: usize,
    palette: &Palette,
) -> Vec<SeriesDescriptor> {
    if max_categories == 0 {
        return Vec::new();
    }

    let mut ranked = category_totals(rows);
    // stable: equal totals keep first-seen order (-0.0 ties with 0.0)
    ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

    let keep = if ranked.len() > max_categories {
        max_categories - 1
    } else {
        ranked.len()
    };
    let folded: Vec<String> = ranked.drain(keep..).map(|c| c.key).collect();

    let mut out: Vec<SeriesDescriptor> = ranked
        .into_iter()
        .enumerate()
        .map(|(idx, c)| {
            let label = humanize_key(&c.key);
            SeriesDescriptor::field(c.key, label, palette.color(idx))
        })
        .collect();

    if !folded.is_empty() {
        log::debug!("folding {} categories into Other", folded.len());
        let key = other_bucket_key(rows);
        out.push(SeriesDescriptor::other_keyed(key, folded, palette.other_color()));
    }
    out
}

/// Key for the "Other" bucket that no row already uses.
///
/// `"other"` when free, else the first free `"other_2"`, `"other_3"`, ...
pub fn other_bucket_key(rows: &[DataRow]) -> String {
    let taken = |key: &str| rows.iter().any(|r| r.contains_key(key));
    if !taken(OTHER_KEY) {
        return OTHER_KEY.to_string();
    }
    (2..)
        .map(|n| format!("{OTHER_KEY}_{n}"))
        .find(|k| !taken(k))
        .unwrap_or_else(|| OTHER_KEY.to_string())
}

/// Copy `rows`, writing each "Other" descriptor's per-row sum under its key.
///
/// For consumers that need flat rows. Folded member fields are left in place.
pub fn materialize_other(rows: &[DataRow], series: &[SeriesDescriptor]) -> Vec<DataRow> {
    let buckets: Vec<&SeriesDescriptor> = series.iter().filter(|s| s.is_other()).collect();
    if buckets.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .map(|row| {
            let mut out = row.clone();
            for bucket in &buckets {
                out.set_number(bucket.key.clone(), bucket.value_in(row));
            }
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeriesSource;

    fn row(date: &str, vals: &[(&str, f64)]) -> DataRow {
        let mut r = DataRow::new().with("date", date);
        for (k, v) in vals {
            r.insert(*k, *v);
        }
        r
    }

    #[test]
    fn totals_follow_first_seen_order() {
        let rows = vec![
            row("2024-01-01", &[("rent", 1000.0), ("food", 300.0)]),
            row("2024-02-01", &[("food", 250.0), ("travel", 80.0)]),
        ];
        let got = category_totals(&rows);
        let keys: Vec<&str> = got.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["rent", "food", "travel"]);
        assert_eq!(got[1].total, 550.0);
    }

    #[test]
    fn fits_without_other() {
        let rows = vec![row("2024-01-01", &[("a", 1.0), ("b", 5.0)])];
        let got = group_categories(&rows, 2);
        let keys: Vec<&str> = got.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert!(got.iter().all(|s| !s.is_other()));
    }

    #[test]
    fn overflow_folds_into_other() {
        let rows = vec![row("2024-01-01", &[("a", 10.0), ("b", 20.0), ("c", 5.0)])];
        let got = group_categories(&rows, 2);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].key, "b");
        assert_eq!(got[0].value_in(&rows[0]), 20.0);
        assert_eq!(got[1].key, OTHER_KEY);
        assert_eq!(got[1].value_in(&rows[0]), 15.0);
        assert_eq!(
            got[1].source,
            SeriesSource::Other {
                members: vec!["a".into(), "c".into()]
            }
        );
    }

    #[test]
    fn zero_cap_returns_empty() {
        let rows = vec![row("2024-01-01", &[("a", 1.0)])];
        assert!(group_categories(&rows, 0).is_empty());
    }

    #[test]
    fn cap_of_one_is_all_other() {
        let rows = vec![row("2024-01-01", &[("a", 1.0), ("b", 2.0)])];
        let got = group_categories(&rows, 1);
        assert_eq!(got.len(), 1);
        assert!(got[0].is_other());
        assert_eq!(got[0].value_in(&rows[0]), 3.0);
    }

    #[test]
    fn materialize_writes_other_column() {
        let rows = vec![
            row("2024-01-01", &[("a", 10.0), ("b", 20.0), ("c", 5.0)]),
            row("2024-02-01", &[("a", 1.0), ("b", 30.0)]),
        ];
        let series = group_categories(&rows, 2);
        let flat = materialize_other(&rows, &series);
        assert_eq!(flat[0].number(OTHER_KEY), Some(15.0));
        assert_eq!(flat[1].number(OTHER_KEY), Some(1.0));
        // input untouched
        assert!(!rows[0].contains_key(OTHER_KEY));
    }

    #[test]
    fn bucket_key_avoids_real_fields() {
        let rows = vec![
            row("2024-01-01", &[("other", 100.0), ("a", 10.0), ("b", 5.0), ("c", 1.0)]),
            row("2024-02-01", &[("other_2", 3.0)]),
        ];
        assert_eq!(other_bucket_key(&rows), "other_3");

        let got = group_categories(&rows[..1], 3);
        let keys: Vec<&str> = got.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["other", "a", "other_2"]);
        assert!(!got[0].is_other());

        let flat = materialize_other(&rows[..1], &got);
        assert_eq!(flat[0].number("other"), Some(100.0));
        assert_eq!(flat[0].number("other_2"), Some(6.0));
    }

    #[test]
    fn negative_zero_ties_with_zero() {
        let rows = vec![row("2024-01-01", &[("refunds", -0.0), ("fees", 0.0), ("rent", 900.0)])];
        let got = group_categories(&rows, 3);
        let keys: Vec<&str> = got.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["rent", "refunds", "fees"]);
    }
}
