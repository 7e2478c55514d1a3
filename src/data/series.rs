use serde::Serialize;

use super::model::{ColumnKind, DataError, Dataset};

// ---------------------------------------------------------------------------
// Bar / pie / heatmap data builders (consumed by the chart widgets)
// ---------------------------------------------------------------------------

fn require_numeric(dataset: &Dataset, column: &str) -> Result<(), DataError> {
    match dataset.kind_of(column) {
        Some(ColumnKind::Numeric) => Ok(()),
        Some(_) => Err(DataError::InvalidMetric {
            column: column.to_string(),
            reason: "column is not numeric".into(),
        }),
        None => Err(DataError::InvalidMetric {
            column: column.to_string(),
            reason: "no such column".into(),
        }),
    }
}

/// One metric column as (protocol label, value) pairs in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub metric: String,
    pub points: Vec<(String, f64)>,
}

/// Extract a single numeric column for bar-chart rendering.
pub fn bar_series(dataset: &Dataset, metric: &str) -> Result<BarSeries, DataError> {
    require_numeric(dataset, metric)?;
    let points = dataset
        .rows()
        .iter()
        .map(|row| {
            (
                dataset.label_of(row),
                dataset.number(row, metric).unwrap_or(f64::NAN),
            )
        })
        .collect();
    Ok(BarSeries {
        metric: metric.to_string(),
        points,
    })
}

/// Frequency of each value in a categorical column, ordered by descending
/// count with ties broken by label.  Drives the pie charts.
pub fn value_counts(dataset: &Dataset, column: &str) -> Result<Vec<(String, usize)>, DataError> {
    match dataset.kind_of(column) {
        Some(ColumnKind::Categorical) | Some(ColumnKind::Label) => {}
        Some(_) => {
            return Err(DataError::SchemaMismatch(format!(
                "column '{column}' is numeric, expected categorical"
            )));
        }
        None => {
            return Err(DataError::SchemaMismatch(format!(
                "no such column '{column}'"
            )));
        }
    }

    let mut counts: std::collections::BTreeMap<String, usize> = std::collections::BTreeMap::new();
    for row in dataset.rows() {
        if let Some(v) = row.get(column) {
            *counts.entry(v.to_string()).or_default() += 1;
        }
    }
    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(out)
}

/// A protocol × metric sub-matrix with its global value range, for heatmap
/// rendering.  `values[r][c]` belongs to `row_labels[r]` / `columns[c]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMatrix {
    pub row_labels: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub min: f64,
    pub max: f64,
}

/// Slice the named numeric columns into a matrix keyed by protocol.
pub fn numeric_matrix(dataset: &Dataset, columns: &[String]) -> Result<HeatmapMatrix, DataError> {
    if columns.is_empty() {
        return Err(DataError::InvalidMetric {
            column: String::new(),
            reason: "metric selection is empty".into(),
        });
    }
    for column in columns {
        require_numeric(dataset, column)?;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut values = Vec::with_capacity(dataset.len());
    for row in dataset.rows() {
        let cells: Vec<f64> = columns
            .iter()
            .map(|c| dataset.number(row, c).unwrap_or(f64::NAN))
            .collect();
        for &v in &cells {
            min = min.min(v);
            max = max.max(v);
        }
        values.push(cells);
    }

    Ok(HeatmapMatrix {
        row_labels: dataset.labels(),
        columns: columns.to_vec(),
        values,
        min,
        max,
    })
}
