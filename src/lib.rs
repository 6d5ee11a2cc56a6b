//! fincharts
//!
//! A small Rust library for shaping personal-finance dashboard rows into
//! chart-ready series. Pairs with the `fincharts` CLI.
//!
//! ### Features
//! - Infer plottable series from row data (labels and palette colors included)
//! - Group stacked-bar categories into the top N plus an "Other" bucket
//! - Percentage mode: rescale each row to shares of its total
//! - Relative time windows (1W, 1M, 3M, 6M, 1Y, ALL)
//! - Per-series summary statistics and value-axis domains
//! - Load/save rows as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use chrono::NaiveDate;
//! use fincharts::shape::{ChartConfig, ChartKind, prepare_chart};
//! use fincharts::TimeWindow;
//!
//! let rows = fincharts::storage::load_rows("spending.json")?;
//! let config = ChartConfig {
//!     kind: ChartKind::StackedBar,
//!     window: TimeWindow::ThreeMonths,
//!     max_categories: 5,
//!     ..ChartConfig::default()
//! };
//! let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let chart = prepare_chart(&rows, &config, today);
//! fincharts::storage::save_chart_json(&chart, "chart.json")?;
//! let stats = fincharts::stats::series_summary(&chart.rows, &chart.series);
//! println!("{:#?}", stats);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod error;
pub mod models;
pub mod palette;
pub mod shape;
pub mod stats;
pub mod storage;

pub use error::ShapeError;
pub use models::{DataRow, SeriesDescriptor, SeriesSource, TimeWindow};
pub use shape::{ChartConfig, ChartKind, PreparedChart, ValueMode, prepare_chart};
