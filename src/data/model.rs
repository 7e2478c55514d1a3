use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Recoverable, user-correctable data-layer errors.  Every operation that
/// takes column names validates them up front and returns one of these
/// instead of computing on a bad schema.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    /// A filter clause names a column that is absent or not numeric.
    #[error("invalid filter column '{column}': {reason}")]
    InvalidPredicate { column: String, reason: String },

    /// A metric selection names a column that is absent or not numeric.
    #[error("invalid metric '{column}': {reason}")]
    InvalidMetric { column: String, reason: String },

    /// The table itself is malformed (ragged rows, inconsistent cell types,
    /// or a required column is missing entirely).
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the benchmark table
// ---------------------------------------------------------------------------

/// A scalar table cell: either a numeric metric or a text label.
/// Used as a `BTreeMap`/`BTreeSet` key downstream, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

// -- Manual Eq/Ord so f64 cells can live in BTreeMap/BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        match (self, other) {
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Number(_), Text(_)) => std::cmp::Ordering::Less,
            (Text(_), Number(_)) => std::cmp::Ordering::Greater,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Number(v) => v.to_bits().hash(state),
            CellValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Render whole numbers without a fractional tail.
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Number(v) => write!(f, "{v:.2}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl CellValue {
    /// Interpret the cell as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column kinds
// ---------------------------------------------------------------------------

/// How a column is used.  Inferred once at dataset construction and checked
/// against every row, so downstream code never hits a surprise cell type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// The entity-identifier column (protocol name).
    Label,
    /// Every cell is a `Number`.
    Numeric,
    /// Every cell is `Text` (e.g. "Anonymity Level").
    Categorical,
}

// ---------------------------------------------------------------------------
// Row / Dataset
// ---------------------------------------------------------------------------

/// One row of the benchmark table: column name → cell.
pub type Row = BTreeMap<String, CellValue>;

/// The immutable benchmark table with a validated column registry.
///
/// Constructed once per session (from the built-in sample or an uploaded
/// file) and never mutated; the filter and chart builders produce derived
/// copies.  Column order follows the source file, not alphabetical order.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Column names in display order.  Always contains `label_column`.
    pub columns: Vec<String>,
    /// Name of the entity-identifier column.
    pub label_column: String,
    /// Validated kind of each column.
    pub kinds: BTreeMap<String, ColumnKind>,
    /// Sorted unique values per categorical column (drives pie charts,
    /// filter checkboxes and color maps).
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from rows, validating the schema in a single pass.
    ///
    /// Rules:
    /// * `label_column` must appear in `columns` and hold `Text` cells;
    /// * every row must have exactly the cells named by `columns`;
    /// * a column's cells must be all-`Number` (numeric) or all-`Text`
    ///   (categorical) — mixed columns are rejected.
    pub fn from_rows(
        columns: Vec<String>,
        label_column: &str,
        rows: Vec<Row>,
    ) -> Result<Self, DataError> {
        if !columns.iter().any(|c| c == label_column) {
            return Err(DataError::SchemaMismatch(format!(
                "label column '{label_column}' not in column list"
            )));
        }

        let mut kinds: BTreeMap<String, ColumnKind> = BTreeMap::new();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DataError::SchemaMismatch(format!(
                    "row {i} has {} cells, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
            for col in &columns {
                let cell = row.get(col).ok_or_else(|| {
                    DataError::SchemaMismatch(format!("row {i} is missing column '{col}'"))
                })?;
                let kind = match cell {
                    CellValue::Number(_) if col == label_column => {
                        return Err(DataError::SchemaMismatch(format!(
                            "label column '{col}' holds a number in row {i}"
                        )));
                    }
                    CellValue::Number(_) => ColumnKind::Numeric,
                    CellValue::Text(_) if col == label_column => ColumnKind::Label,
                    CellValue::Text(_) => ColumnKind::Categorical,
                };
                match kinds.get(col) {
                    None => {
                        kinds.insert(col.clone(), kind);
                    }
                    Some(prev) if *prev == kind => {}
                    Some(prev) => {
                        return Err(DataError::SchemaMismatch(format!(
                            "column '{col}' mixes {prev:?} and {kind:?} cells (row {i})"
                        )));
                    }
                }
            }
        }
        // An empty table still carries its schema; default the label column
        // kind so lookups stay total.
        kinds
            .entry(label_column.to_string())
            .or_insert(ColumnKind::Label);

        let unique_values = Self::collect_unique(&kinds, &rows);
        Ok(Dataset {
            columns,
            label_column: label_column.to_string(),
            kinds,
            unique_values,
            rows,
        })
    }

    fn collect_unique(
        kinds: &BTreeMap<String, ColumnKind>,
        rows: &[Row],
    ) -> BTreeMap<String, BTreeSet<CellValue>> {
        let mut unique: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();
        for (col, kind) in kinds {
            if *kind != ColumnKind::Categorical {
                continue;
            }
            let set = unique.entry(col.clone()).or_default();
            for row in rows {
                if let Some(v) = row.get(col) {
                    set.insert(v.clone());
                }
            }
        }
        unique
    }

    /// Derived dataset with the same schema but a subset of rows.
    /// Only the filter layer constructs these.
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Dataset {
        let unique_values = Self::collect_unique(&self.kinds, &rows);
        Dataset {
            columns: self.columns.clone(),
            label_column: self.label_column.clone(),
            kinds: self.kinds.clone(),
            unique_values,
            rows,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        self.kinds.get(column).copied()
    }

    /// Numeric column names, in display order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| self.kind_of(c) == Some(ColumnKind::Numeric))
            .cloned()
            .collect()
    }

    /// Categorical column names, in display order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| self.kind_of(c) == Some(ColumnKind::Categorical))
            .cloned()
            .collect()
    }

    /// The label cell of a row, rendered as text.
    pub fn label_of(&self, row: &Row) -> String {
        row.get(&self.label_column)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// The numeric value of `column` in `row`, if present and numeric.
    pub fn number(&self, row: &Row, column: &str) -> Option<f64> {
        row.get(column).and_then(CellValue::as_f64)
    }

    /// (min, max) over a numeric column; `None` for empty or non-numeric.
    pub fn numeric_range(&self, column: &str) -> Option<(f64, f64)> {
        if self.kind_of(column) != Some(ColumnKind::Numeric) {
            return None;
        }
        let mut range: Option<(f64, f64)> = None;
        for row in &self.rows {
            if let Some(v) = self.number(row, column) {
                range = Some(match range {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
        }
        range
    }

    /// All label-column values in row order.
    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| self.label_of(r)).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    pub(crate) fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Two-protocol table used across the data-layer tests.
    pub(crate) fn small_dataset() -> Dataset {
        Dataset::from_rows(
            cols(&["Protocol", "Security Score (/10)", "Quantum Resistance"]),
            "Protocol",
            vec![
                row(&[
                    ("Protocol", CellValue::Text("RSA 2048".into())),
                    ("Security Score (/10)", CellValue::Number(5.0)),
                    ("Quantum Resistance", CellValue::Text("Low".into())),
                ]),
                row(&[
                    ("Protocol", CellValue::Text("Kyber-1024".into())),
                    ("Security Score (/10)", CellValue::Number(9.5)),
                    ("Quantum Resistance", CellValue::Text("High".into())),
                ]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn infers_column_kinds() {
        let ds = small_dataset();
        assert_eq!(ds.kind_of("Protocol"), Some(ColumnKind::Label));
        assert_eq!(ds.kind_of("Security Score (/10)"), Some(ColumnKind::Numeric));
        assert_eq!(
            ds.kind_of("Quantum Resistance"),
            Some(ColumnKind::Categorical)
        );
        assert_eq!(
            ds.numeric_columns(),
            vec!["Security Score (/10)".to_string()]
        );
        assert_eq!(ds.labels(), vec!["RSA 2048", "Kyber-1024"]);
    }

    #[test]
    fn rejects_mixed_column() {
        let err = Dataset::from_rows(
            cols(&["Protocol", "Score"]),
            "Protocol",
            vec![
                row(&[
                    ("Protocol", CellValue::Text("A".into())),
                    ("Score", CellValue::Number(1.0)),
                ]),
                row(&[
                    ("Protocol", CellValue::Text("B".into())),
                    ("Score", CellValue::Text("n/a".into())),
                ]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch(_)));
    }

    #[test]
    fn rejects_ragged_row() {
        let err = Dataset::from_rows(
            cols(&["Protocol", "Score"]),
            "Protocol",
            vec![row(&[("Protocol", CellValue::Text("A".into()))])],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch(_)));
    }

    #[test]
    fn rejects_unknown_label_column() {
        let err = Dataset::from_rows(cols(&["Score"]), "Protocol", vec![]).unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch(_)));
    }

    #[test]
    fn numeric_range_spans_column() {
        let ds = small_dataset();
        assert_eq!(ds.numeric_range("Security Score (/10)"), Some((5.0, 9.5)));
        assert_eq!(ds.numeric_range("Protocol"), None);
    }

    #[test]
    fn empty_dataset_keeps_schema() {
        let ds = Dataset::from_rows(cols(&["Protocol"]), "Protocol", vec![]).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.kind_of("Protocol"), Some(ColumnKind::Label));
    }
}
