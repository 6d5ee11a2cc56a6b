use chrono::NaiveDate;
use fincharts::models::{DataRow, OTHER_KEY, TimeWindow};
use fincharts::shape::{
    filter_by_window, group_categories, infer_series, normalize_to_percentage,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Monthly spending rows with a varying set of categories.
fn spending() -> Vec<DataRow> {
    vec![
        DataRow::new()
            .with("date", "2024-01-01")
            .with("rent", 1200)
            .with("groceries", 420.5)
            .with("dining", 180)
            .with("transport", 95)
            .with("subscriptions", 42),
        DataRow::new()
            .with("date", "2024-02-01")
            .with("rent", 1200)
            .with("groceries", 390)
            .with("dining", 240)
            .with("travel", 650),
        DataRow::new()
            .with("date", "2024-03-01")
            .with("rent", 1200)
            .with("groceries", 455)
            .with("transport", 110)
            .with("utilities", 130),
    ]
}

fn monthly_rows() -> Vec<DataRow> {
    (1..=6)
        .map(|m| {
            DataRow::new()
                .with("date", format!("2024-{m:02}-01"))
                .with("balance", 1000 * m)
        })
        .collect()
}

#[test]
fn grouping_length_is_min_of_distinct_and_cap() {
    let rows = spending();
    // rent, groceries, dining, transport, subscriptions, travel, utilities
    let distinct = 7;
    for cap in 0..10 {
        let got = group_categories(&rows, cap);
        assert_eq!(got.len(), cap.min(distinct), "cap {cap}");
    }
}

#[test]
fn other_equals_row_total_minus_kept_values() {
    let rows = spending();
    for cap in 1..7 {
        let got = group_categories(&rows, cap);
        let others: Vec<_> = got.iter().filter(|s| s.is_other()).collect();
        assert_eq!(others.len(), 1, "cap {cap}");
        let other = others[0];
        assert_eq!(other.key, OTHER_KEY);
        assert!(std::ptr::eq(other, got.last().unwrap()));

        for row in &rows {
            let row_total: f64 = row.numeric_fields().map(|(_, v)| v).sum();
            let kept: f64 = got
                .iter()
                .filter(|s| !s.is_other())
                .map(|s| s.value_in(row))
                .sum();
            assert!((other.value_in(row) - (row_total - kept)).abs() < 1e-9);
        }
    }
}

#[test]
fn grouping_ties_keep_first_seen_order() {
    let rows = vec![
        DataRow::new()
            .with("date", "2024-01-01")
            .with("z", 0)
            .with("y", 0)
            .with("x", 0),
    ];
    let got = group_categories(&rows, 3);
    let keys: Vec<&str> = got.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["z", "y", "x"]);
}

#[test]
fn grouping_scenario_b_then_other() {
    let rows = vec![
        DataRow::new()
            .with("date", "2024-01-01")
            .with("a", 10)
            .with("b", 20)
            .with("c", 5),
    ];
    let got = group_categories(&rows, 2);
    assert_eq!(got.len(), 2);
    assert_eq!(got[0].key, "b");
    assert_eq!(got[0].value_in(&rows[0]), 20.0);
    assert_eq!(got[1].key, "other");
    assert_eq!(got[1].label, "Other");
    assert_eq!(got[1].value_in(&rows[0]), 15.0);
}

#[test]
fn normalized_rows_sum_to_one_hundred() {
    let rows = spending();
    let keys = ["rent", "groceries", "dining", "transport", "subscriptions", "travel", "utilities"];
    let out = normalize_to_percentage(&rows, &keys);
    assert_eq!(out.len(), rows.len());
    for row in &out {
        let sum: f64 = keys.iter().map(|k| row.value_or_zero(k)).sum();
        assert!((sum - 100.0).abs() < 1e-6, "sum was {sum}");
    }
    // source untouched
    assert_eq!(rows[0].number("rent"), Some(1200.0));
}

#[test]
fn normalize_even_split_stays_fifty_fifty() {
    let rows = vec![DataRow::new().with("date", "2024-01-01").with("x", 50).with("y", 50)];
    let out = normalize_to_percentage(&rows, &["x", "y"]);
    assert_eq!(out[0].get("date"), rows[0].get("date"));
    assert_eq!(out[0].number("x"), Some(50.0));
    assert_eq!(out[0].number("y"), Some(50.0));
}

#[test]
fn normalize_zero_total_is_identity() {
    let rows = vec![
        DataRow::new().with("date", "2024-01-01").with("x", 0).with("y", 0.0),
        DataRow::new().with("date", "2024-02-01").with("note", "no spending"),
    ];
    assert_eq!(normalize_to_percentage(&rows, &["x", "y"]), rows);
}

#[test]
fn window_all_is_identity() {
    let mut rows = monthly_rows();
    rows.push(DataRow::new().with("date", "garbage").with("balance", 1));
    rows.push(DataRow::new().with("balance", 2));
    let got = filter_by_window(&rows, TimeWindow::All, "date", ymd(2024, 6, 15));
    assert_eq!(got, rows);
}

#[test]
fn window_filter_is_idempotent() {
    let rows = monthly_rows();
    let today = ymd(2024, 6, 15);
    for w in TimeWindow::VARIANTS {
        let once = filter_by_window(&rows, w, "date", today);
        let twice = filter_by_window(&once, w, "date", today);
        assert_eq!(once, twice, "window {w}");
    }
}

#[test]
fn three_months_before_mid_june_keeps_april_to_june() {
    let rows = monthly_rows();
    let got = filter_by_window(&rows, "3M".parse().unwrap(), "date", ymd(2024, 6, 15));
    let dates: Vec<&str> = got
        .iter()
        .map(|r| r.get("date").and_then(|v| v.as_str()).unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-04-01", "2024-05-01", "2024-06-01"]);
}

#[test]
fn window_uses_the_given_date_key() {
    let rows = vec![
        DataRow::new().with("postedOn", "2024-06-10").with("amount", 5),
        DataRow::new().with("postedOn", "2023-01-10").with("amount", 7),
    ];
    let got = filter_by_window(&rows, TimeWindow::OneYear, "postedOn", ymd(2024, 6, 15));
    assert_eq!(got, vec![rows[0].clone()]);
    assert!(filter_by_window(&rows, TimeWindow::OneYear, "date", ymd(2024, 6, 15)).is_empty());
}

#[test]
fn inference_of_nothing_is_nothing() {
    for n in [0, 1, 6, usize::MAX] {
        assert!(infer_series(&[], n).is_empty());
    }
}

#[test]
fn inference_only_looks_at_first_row() {
    let rows = vec![
        DataRow::new()
            .with("date", "2024-01-01")
            .with("income", 3000)
            .with("bonus", serde_json::Value::Null),
        DataRow::new()
            .with("date", "2024-02-01")
            .with("income", 3100)
            .with("bonus", 500),
    ];
    let got = infer_series(&rows, 6);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].key, "income");
    assert_eq!(got[0].label, "Income");
}
