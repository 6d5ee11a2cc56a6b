use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fincharts::shape::{ChartConfig, ChartKind, ValueMode, group_categories, prepare_chart};
use fincharts::{SeriesDescriptor, TimeWindow, stats, storage};
use num_format::{Locale, ToFormattedString};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "fincharts",
    version,
    about = "Shape dashboard rows into chart-ready series"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prepare one chart (window, series, percentage mode) and write it as JSON.
    Shape(ShapeArgs),
    /// Print per-series statistics for the raw rows.
    Summary(SummaryArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Line,
    Area,
    StackedBar,
}

impl From<KindArg> for ChartKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Line => ChartKind::Line,
            KindArg::Area => ChartKind::Area,
            KindArg::StackedBar => ChartKind::StackedBar,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Absolute,
    Percentage,
}

impl From<ModeArg> for ValueMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Absolute => ValueMode::Absolute,
            ModeArg::Percentage => ValueMode::Percentage,
        }
    }
}

#[derive(Args, Debug)]
struct ShapeArgs {
    /// Rows to shape (.json array of objects or .csv with header).
    #[arg(short, long)]
    input: PathBuf,
    /// Chart configuration as JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Chart kind.
    #[arg(short, long, value_enum)]
    kind: Option<KindArg>,
    /// Absolute values or per-row percentages.
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,
    /// Time window: 1W, 1M, 3M, 6M, 1Y or ALL.
    #[arg(short, long)]
    window: Option<TimeWindow>,
    /// Row key holding the date (default "date").
    #[arg(long)]
    date_key: Option<String>,
    /// Series cap for line/area charts (default 6).
    #[arg(long)]
    max_series: Option<usize>,
    /// Category cap for stacked bars, including "Other" (default 6).
    #[arg(long)]
    max_categories: Option<usize>,
    /// Explicit series keys separated by comma or semicolon; skips inference.
    #[arg(long)]
    series: Option<String>,
    /// Reference date for the window (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Write the prepared chart here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print series statistics to stderr.
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// Locale for statistics output (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Rows to summarize (.json or .csv).
    #[arg(short, long)]
    input: PathBuf,
    /// Series keys separated by comma or semicolon. Defaults to every numeric key.
    #[arg(long)]
    series: Option<String>,
    /// Locale for number output.
    #[arg(long, default_value = "en")]
    locale: String,
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Thousands separators from the locale, up to two decimals with trailing zeros trimmed.
fn fmt_num(v: f64, locale: &Locale, dec_sep: char) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let rounded = (v * 100.0).round() / 100.0;
    let whole = rounded.abs().trunc() as i64;
    let cents = (rounded.abs().fract() * 100.0).round() as u32;
    let mut s = whole.to_formatted_string(locale);
    if rounded < 0.0 {
        s.insert(0, '-');
    }
    if cents > 0 {
        let frac = format!("{:02}", cents);
        s.push(dec_sep);
        s.push_str(frac.trim_end_matches('0'));
    }
    s
}

fn fmt_opt(v: Option<f64>, locale: &Locale, dec_sep: char) -> String {
    match v {
        Some(x) => fmt_num(x, locale, dec_sep),
        None => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn explicit_series(list: &str) -> Vec<SeriesDescriptor> {
    parse_list(list)
        .into_iter()
        .map(|k| SeriesDescriptor::field(k, "", ""))
        .collect()
}

fn load_config(path: &Path) -> Result<ChartConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing chart config {}", path.display()))
}

fn print_summaries(summaries: &[stats::SeriesSummary], locale_tag: &str) {
    let (locale, dec) = map_locale(locale_tag);
    for s in summaries {
        eprintln!(
            "{} ({})  count={} missing={}  min={} max={} mean={} median={} total={}",
            s.label,
            s.key,
            s.count,
            s.missing,
            fmt_opt(s.min, locale, dec),
            fmt_opt(s.max, locale, dec),
            fmt_opt(s.mean, locale, dec),
            fmt_opt(s.median, locale, dec),
            fmt_num(s.total, locale, dec)
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Shape(args) => cmd_shape(args),
        Command::Summary(args) => cmd_summary(args),
    }
}

fn cmd_shape(args: ShapeArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ChartConfig::default(),
    };
    if let Some(kind) = args.kind {
        config.kind = kind.into();
    }
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(window) = args.window {
        config.window = window;
    }
    if let Some(key) = args.date_key {
        config.date_key = key;
    }
    if let Some(n) = args.max_series {
        config.max_series = n;
    }
    if let Some(n) = args.max_categories {
        config.max_categories = n;
    }
    if let Some(list) = args.series.as_deref() {
        config.series = Some(explicit_series(list));
    }
    log::debug!("chart config: {config:?}");

    let rows = storage::load_rows(&args.input)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let chart = prepare_chart(&rows, &config, today);

    match args.out.as_ref() {
        Some(path) => {
            storage::save_chart_json(&chart, path)?;
            eprintln!(
                "Wrote {} series over {} rows to {}",
                chart.series.len(),
                chart.rows.len(),
                path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&chart)?),
    }

    if args.stats {
        let summaries = stats::series_summary(&chart.rows, &chart.series);
        print_summaries(&summaries, &args.locale);
    }

    Ok(())
}

fn cmd_summary(args: SummaryArgs) -> Result<()> {
    let rows = storage::load_rows(&args.input)?;
    let series = match args.series.as_deref() {
        Some(list) => explicit_series(list),
        // an unbounded cap never folds, so this is every numeric key ranked by total
        None => group_categories(&rows, usize::MAX),
    };
    let summaries = stats::series_summary(&rows, &series);
    let (locale, dec) = map_locale(&args.locale);
    for s in &summaries {
        println!(
            "{}  count={} missing={}  min={} max={} mean={} median={} total={}",
            s.key,
            s.count,
            s.missing,
            fmt_opt(s.min, locale, dec),
            fmt_opt(s.max, locale, dec),
            fmt_opt(s.mean, locale, dec),
            fmt_opt(s.median, locale, dec),
            fmt_num(s.total, locale, dec)
        );
    }
    Ok(())
}
