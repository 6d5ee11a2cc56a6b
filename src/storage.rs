use crate::models::{DataRow, is_anchor_key};
use crate::shape::PreparedChart;
use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Leading characters a spreadsheet would treat as a formula.
const FORMULA_STARTERS: [char; 4] = ['=', '+', '-', '@'];

/// Load rows from a `.json` or `.csv` file, chosen by extension.
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<DataRow>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("unsupported input format: {:?} (expected .json or .csv)", other),
    }
}

/// Load rows from a JSON array of objects.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<DataRow>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let rows: Vec<DataRow> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {} as an array of row objects", path.display()))?;
    Ok(rows)
}

/// Load rows from CSV with a header row.
///
/// Numeric cells become numbers, empty cells `null`. Anchor columns (`date`,
/// `label`) always stay strings. Cells written with a formula guard by
/// [`save_csv`] are read back without it.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<DataRow>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("reading record {} of {}", i + 1, path.display()))?;
        let row: DataRow = headers
            .iter()
            .zip(rec.iter())
            .map(|(h, cell)| (h.to_string(), cell_value(h, cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn cell_value(header: &str, cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Some(rest) = cell.strip_prefix('\'')
        && rest.starts_with(FORMULA_STARTERS)
    {
        return Value::String(rest.to_string());
    }
    if is_anchor_key(header) {
        return Value::String(cell.to_string());
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::from(i);
    }
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::String(cell.to_string()),
    }
}

/// Prefix formula-like strings with a single quote so spreadsheets show them as text.
fn guard_formula(s: &str) -> String {
    if s.starts_with(FORMULA_STARTERS) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => guard_formula(s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => guard_formula(&other.to_string()),
    }
}

/// Save rows as CSV. Columns are the union of all keys in first-seen order.
pub fn save_csv<P: AsRef<Path>>(rows: &[DataRow], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }

    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("writing {}", path.display()))?;
    wtr.write_record(&columns)?;
    for row in rows {
        wtr.write_record(columns.iter().map(|c| cell_text(row.get(c))))?;
    }
    wtr.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Save rows as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(rows: &[DataRow], path: P) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    write_text(path.as_ref(), &s)
}

/// Save a prepared chart as pretty JSON.
pub fn save_chart_json<P: AsRef<Path>>(chart: &PreparedChart, path: P) -> Result<()> {
    let s = serde_json::to_string_pretty(chart)?;
    write_text(path.as_ref(), &s)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("writing {}", path.display()))?;
    f.write_all(text.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let rows = vec![DataRow::new().with("date", "2024-01-01").with("spend", 1.23)];
        save_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }

    #[test]
    fn cell_values_are_typed() {
        assert_eq!(cell_value("amount", "12"), Value::from(12));
        assert_eq!(cell_value("amount", "-3.5"), Value::from(-3.5));
        assert_eq!(cell_value("amount", ""), Value::Null);
        assert_eq!(cell_value("amount", "n/a"), Value::from("n/a"));
        assert_eq!(cell_value("label", "2024"), Value::from("2024"));
        assert_eq!(cell_value("note", "'=SUM(A1)"), Value::from("=SUM(A1)"));
    }
}
