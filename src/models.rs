use crate::error::ShapeError;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Keys that anchor a row on the time/category axis. Never plotted as series.
pub const ANCHOR_KEYS: [&str; 2] = ["date", "label"];

/// Key of the synthetic bucket that collects folded categories.
pub const OTHER_KEY: &str = "other";
/// Display label of the synthetic bucket.
pub const OTHER_LABEL: &str = "Other";

/// True for `date` / `label`.
pub fn is_anchor_key(key: &str) -> bool {
    ANCHOR_KEYS.contains(&key)
}

/// One record of a time or category series, keyed by field name.
///
/// Keys keep insertion order. Only JSON numbers count as numeric values;
/// `null`, strings and booleans read as "no value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRow(Map<String, Value>);

impl DataRow {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert, handy for literals and tests.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Store a number. Non-finite values become `null`.
    pub fn set_number(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), Value::from(value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Numeric value under `key`, if the field exists and is a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Numeric value under `key`; missing or non-numeric reads as zero.
    pub fn value_or_zero(&self, key: &str) -> f64 {
        self.number(key).unwrap_or(0.0)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Numeric, non-anchor fields in key order.
    pub fn numeric_fields(&self) -> impl Iterator<Item = (&str, f64)> {
        self.iter()
            .filter(|(k, _)| !is_anchor_key(k))
            .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for DataRow {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DataRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Where a series takes its values from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesSource {
    /// A field of the row with the descriptor's key.
    #[default]
    Field,
    /// Synthetic bucket: the sum of the listed fields, read per row.
    Other { members: Vec<String> },
}

impl SeriesSource {
    pub fn is_field(&self) -> bool {
        matches!(self, SeriesSource::Field)
    }
}

/// Metadata identifying one plottable numeric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "SeriesSource::is_field")]
    pub source: SeriesSource,
}

impl SeriesDescriptor {
    pub fn field(key: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            color: color.into(),
            source: SeriesSource::Field,
        }
    }

    /// The "Other" bucket folding `members`.
    pub fn other(members: Vec<String>, color: impl Into<String>) -> Self {
        Self::other_keyed(OTHER_KEY, members, color)
    }

    /// The "Other" bucket stored under `key`, for rows that already use `"other"`.
    pub fn other_keyed(key: impl Into<String>, members: Vec<String>, color: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: OTHER_LABEL.to_string(),
            color: color.into(),
            source: SeriesSource::Other { members },
        }
    }

    pub fn is_other(&self) -> bool {
        !self.source.is_field()
    }

    /// Value of this series in `row`, or `None` when a plain field is absent
    /// or non-numeric. The "Other" bucket always has a value.
    pub fn value_opt(&self, row: &DataRow) -> Option<f64> {
        match &self.source {
            SeriesSource::Field => row.number(&self.key),
            SeriesSource::Other { members } => {
                Some(members.iter().map(|m| row.value_or_zero(m)).sum())
            }
        }
    }

    /// Value of this series in `row`; absent reads as zero.
    pub fn value_in(&self, row: &DataRow) -> f64 {
        self.value_opt(row).unwrap_or(0.0)
    }
}

/// Coarse relative date range used to filter rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeWindow {
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    /// No filtering.
    #[default]
    All,
}

impl TimeWindow {
    pub const VARIANTS: [TimeWindow; 6] = [
        TimeWindow::OneWeek,
        TimeWindow::OneMonth,
        TimeWindow::ThreeMonths,
        TimeWindow::SixMonths,
        TimeWindow::OneYear,
        TimeWindow::All,
    ];

    /// Short code as shown on range selector buttons.
    pub fn code(self) -> &'static str {
        match self {
            TimeWindow::OneWeek => "1W",
            TimeWindow::OneMonth => "1M",
            TimeWindow::ThreeMonths => "3M",
            TimeWindow::SixMonths => "6M",
            TimeWindow::OneYear => "1Y",
            TimeWindow::All => "ALL",
        }
    }

    /// Earliest date still inside the window, relative to `today`.
    /// `None` for [`TimeWindow::All`].
    ///
    /// Month windows step back calendar months; the day is clamped to the end
    /// of a shorter month (2024-05-31 minus 3M is 2024-02-29).
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        let back = match self {
            TimeWindow::OneWeek => today.checked_sub_days(Days::new(7)),
            TimeWindow::OneMonth => today.checked_sub_months(Months::new(1)),
            TimeWindow::ThreeMonths => today.checked_sub_months(Months::new(3)),
            TimeWindow::SixMonths => today.checked_sub_months(Months::new(6)),
            TimeWindow::OneYear => today.checked_sub_months(Months::new(12)),
            TimeWindow::All => return None,
        };
        Some(back.unwrap_or(NaiveDate::MIN))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TimeWindow {
    type Err = ShapeError;

    /// Accepts short codes (`1W`, `3M`, `ALL`) and long forms (`1 week`,
    /// `3 months`, `all`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "1w" | "1week" | "week" | "7d" => Ok(TimeWindow::OneWeek),
            "1m" | "1month" | "month" => Ok(TimeWindow::OneMonth),
            "3m" | "3months" | "quarter" => Ok(TimeWindow::ThreeMonths),
            "6m" | "6months" => Ok(TimeWindow::SixMonths),
            "1y" | "1year" | "12m" | "12months" | "year" => Ok(TimeWindow::OneYear),
            "all" | "max" => Ok(TimeWindow::All),
            _ => Err(ShapeError::unknown(
                "time window",
                s,
                "1W, 1M, 3M, 6M, 1Y, ALL",
            )),
        }
    }
}

impl TryFrom<String> for TimeWindow {
    type Error = ShapeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeWindow> for String {
    fn from(w: TimeWindow) -> Self {
        w.code().to_string()
    }
}
