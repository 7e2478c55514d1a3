use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Row};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a benchmark table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row of column names; the first column is the protocol
///             label, numeric cells are parsed as `f64`
/// * `.json` – records-oriented array: `[{ "Protocol": "...", ...metrics }]`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn parse_cell(s: &str) -> CellValue {
    match s.trim().parse::<f64>() {
        Ok(v) => CellValue::Number(v),
        Err(_) => CellValue::Text(s.trim().to_string()),
    }
}

/// CSV layout: header row with column names, one row per protocol.
/// The first column is taken as the label column; every other cell is
/// numeric if it parses as a float, categorical text otherwise.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no columns");
    }
    let label_column = headers[0].clone();

    let mut rows: Vec<Row> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no} has {} fields, expected {}",
                record.len(),
                headers.len()
            );
        }
        let mut row = Row::new();
        for (col_idx, value) in record.iter().enumerate() {
            let cell = if col_idx == 0 {
                // Label cells stay text even when they look numeric.
                CellValue::Text(value.trim().to_string())
            } else {
                parse_cell(value)
            };
            row.insert(headers[col_idx].clone(), cell);
        }
        rows.push(row);
    }

    Dataset::from_rows(headers, &label_column, rows).context("validating CSV table schema")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Protocol": "Kyber-512",
///     "Key Exchange Time (ms)": 20,
///     "Quantum Resistance": "High"
///   },
///   ...
/// ]
/// ```
///
/// A `"Protocol"` key is required on every record and becomes the label
/// column.  JSON objects carry no column order, so metric columns are laid
/// out alphabetically after the label.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;
    // Unlike a header-only CSV, an empty records array carries no schema at
    // all, so there is no table to build.
    if records.is_empty() {
        bail!("JSON file contains no records");
    }

    let mut rows: Vec<Row> = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        if !obj.contains_key("Protocol") {
            bail!("Row {i} is missing the 'Protocol' key");
        }

        let mut row = Row::new();
        for (key, val) in obj {
            let cell = match val {
                JsonValue::Number(n) if key != "Protocol" => {
                    CellValue::Number(n.as_f64().with_context(|| {
                        format!("Row {i}, '{key}': number out of f64 range")
                    })?)
                }
                JsonValue::String(s) => CellValue::Text(s.clone()),
                other => bail!("Row {i}, '{key}': unsupported value {other}"),
            };
            row.insert(key.clone(), cell);
        }
        rows.push(row);
    }

    let mut columns: Vec<String> = vec!["Protocol".to_string()];
    columns.extend(rows[0].keys().filter(|k| *k != "Protocol").cloned());

    Dataset::from_rows(columns, "Protocol", rows).context("validating JSON table schema")
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write a dataset back out as CSV, in display column order.  Used by the
/// "Export filtered…" menu entry.
pub fn export_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer
        .write_record(&dataset.columns)
        .context("writing CSV header")?;

    for row in dataset.rows() {
        let record: Vec<String> = dataset
            .columns
            .iter()
            .map(|col| match row.get(col) {
                Some(CellValue::Number(v)) => v.to_string(),
                Some(CellValue::Text(s)) => s.clone(),
                None => String::new(),
            })
            .collect();
        writer.write_record(&record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Built-in sample table
// ---------------------------------------------------------------------------

/// Benchmark figures for classical, post-quantum and QKD protocols, shown
/// until the user uploads their own table.
pub const SAMPLE_PROTOCOLS: [&str; 16] = [
    // Classical
    "RSA 2048",
    "RSA 4096",
    "ECC",
    "AES-256",
    // Post-quantum
    "ML-KEM (Kyber)",
    "ML-DSA (Dilithium)",
    "SLH-DSA (SPHINCS+)",
    "NTRU",
    "McEliece",
    "Rainbow",
    "Falcon",
    // Quantum key distribution
    "QKD - BB84",
    "QKD - E91",
    "QKD - B92",
    "QKD - SARG04",
    "QKD - COW",
];

const SAMPLE_NUMERIC: [(&str, [f64; 16]); 6] = [
    (
        "Key Exchange Time (ms)",
        [120.0, 230.0, 85.0, 30.0, 20.0, 25.0, 45.0, 33.0, 50.0, 35.0, 12.0, 14.0, 15.0, 18.0, 22.0, 20.0],
    ),
    (
        "Encryption Time (ms)",
        [95.0, 185.0, 70.0, 12.0, 18.0, 22.0, 38.0, 20.0, 55.0, 25.0, 11.0, 13.0, 13.0, 15.0, 16.0, 15.0],
    ),
    (
        "Decryption Time (ms)",
        [90.0, 180.0, 68.0, 10.0, 15.0, 21.0, 40.0, 19.0, 52.0, 27.0, 10.0, 12.0, 11.0, 13.0, 14.0, 13.0],
    ),
    (
        "Key Size (Bytes)",
        [256.0, 512.0, 128.0, 32.0, 800.0, 1600.0, 4100.0, 1087.0, 1357824.0, 1280.0, 1056.0, 1100.0, 1000.0, 1024.0, 1088.0, 1072.0],
    ),
    (
        "Resource Usage (MB)",
        [15.0, 30.0, 12.0, 10.0, 40.0, 60.0, 120.0, 38.0, 200.0, 50.0, 33.0, 35.0, 36.0, 38.0, 37.0, 39.0],
    ),
    (
        "Security Score (/10)",
        [5.0, 6.0, 6.0, 7.0, 9.2, 9.5, 9.3, 8.8, 9.7, 8.5, 9.0, 9.2, 9.1, 9.3, 9.4, 9.5],
    ),
];

const SAMPLE_CATEGORICAL: [(&str, [&str; 16]); 2] = [
    (
        "Anonymity Level",
        [
            "Medium", "Medium", "Medium", "Medium", "High", "High", "High", "High", "High",
            "High", "High", "Very High", "Very High", "Very High", "Very High", "Very High",
        ],
    ),
    (
        "Quantum Resistance",
        [
            "Low", "Low", "Low", "Low", "High", "High", "Very High", "High", "Very High",
            "High", "Ultra High", "Ultimate", "Ultimate", "Ultimate", "Ultimate", "Ultimate",
        ],
    ),
];

/// The built-in sample dataset.
pub fn sample_dataset() -> Dataset {
    let mut columns = vec!["Protocol".to_string()];
    columns.extend(SAMPLE_NUMERIC.iter().map(|(name, _)| name.to_string()));
    columns.extend(SAMPLE_CATEGORICAL.iter().map(|(name, _)| name.to_string()));

    let rows: Vec<Row> = SAMPLE_PROTOCOLS
        .iter()
        .enumerate()
        .map(|(i, protocol)| {
            let mut row: Row = BTreeMap::new();
            row.insert(
                "Protocol".to_string(),
                CellValue::Text(protocol.to_string()),
            );
            for (name, values) in &SAMPLE_NUMERIC {
                row.insert(name.to_string(), CellValue::Number(values[i]));
            }
            for (name, values) in &SAMPLE_CATEGORICAL {
                row.insert(name.to_string(), CellValue::Text(values[i].to_string()));
            }
            row
        })
        .collect();

    Dataset::from_rows(columns, "Protocol", rows)
        .expect("built-in sample table is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    #[test]
    fn sample_dataset_schema() {
        let ds = sample_dataset();
        assert_eq!(ds.len(), 16);
        assert_eq!(ds.label_column, "Protocol");
        assert_eq!(ds.numeric_columns().len(), 6);
        assert_eq!(
            ds.categorical_columns(),
            vec!["Anonymity Level".to_string(), "Quantum Resistance".to_string()]
        );
        assert_eq!(ds.kind_of("Protocol"), Some(ColumnKind::Label));
        // Column order follows the source table, label first.
        assert_eq!(ds.columns[0], "Protocol");
        assert_eq!(ds.columns[1], "Key Exchange Time (ms)");
    }

    #[test]
    fn csv_round_trip_through_tempfile() {
        let ds = sample_dataset();
        let dir = std::env::temp_dir();
        let path = dir.join("qsafe_bench_loader_test.csv");

        export_csv(&ds, &path).unwrap();
        let loaded = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), ds.len());
        assert_eq!(loaded.columns, ds.columns);
        assert_eq!(loaded.labels(), ds.labels());
        assert_eq!(
            loaded.numeric_range("Security Score (/10)"),
            ds.numeric_range("Security Score (/10)")
        );
    }

    #[test]
    fn json_records_load_with_label_first_then_alphabetical_metrics() {
        let path = std::env::temp_dir().join("qsafe_bench_loader_test_records.json");
        std::fs::write(
            &path,
            r#"[
                {"Protocol": "Kyber-512", "Key Exchange Time (ms)": 20, "Quantum Resistance": "High"},
                {"Protocol": "RSA 2048", "Key Exchange Time (ms)": 120, "Quantum Resistance": "Low"}
            ]"#,
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.label_column, "Protocol");
        // JSON objects carry no column order: label first, metrics sorted.
        assert_eq!(
            ds.columns,
            vec![
                "Protocol".to_string(),
                "Key Exchange Time (ms)".to_string(),
                "Quantum Resistance".to_string(),
            ]
        );
        assert_eq!(ds.labels(), vec!["Kyber-512", "RSA 2048"]);
        assert_eq!(
            ds.numeric_range("Key Exchange Time (ms)"),
            Some((20.0, 120.0))
        );
        assert_eq!(
            ds.categorical_columns(),
            vec!["Quantum Resistance".to_string()]
        );
    }

    #[test]
    fn json_record_without_protocol_key_is_rejected() {
        let path = std::env::temp_dir().join("qsafe_bench_loader_test_no_label.json");
        std::fs::write(&path, r#"[{"Name": "RSA 2048", "Score": 5}]"#).unwrap();

        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("Protocol"));
    }

    #[test]
    fn json_empty_records_array_is_rejected() {
        let path = std::env::temp_dir().join("qsafe_bench_loader_test_empty.json");
        std::fs::write(&path, "[]").unwrap();

        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("no records"));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("data.parquet")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
