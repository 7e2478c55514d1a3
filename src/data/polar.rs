use std::f64::consts::TAU;

use serde::Serialize;

use super::model::{ColumnKind, DataError, Dataset};

// ---------------------------------------------------------------------------
// Radar-chart series: one closed polar polygon per protocol
// ---------------------------------------------------------------------------

/// A single radar-chart vertex.  `angle` is in radians within [0, 2π);
/// `radius` is the raw metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarVertex {
    pub angle: f64,
    pub radius: f64,
}

/// A closed metric profile for one protocol: vertices in metric order with
/// the first vertex repeated at the end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarPolygon {
    /// The owning row's label-column value.
    pub label: String,
    pub vertices: Vec<PolarVertex>,
}

/// Map each row's metric vector onto a closed polar polygon.
///
/// Metric `i` of `N` sits at angle `i/N · 2π`; the radius is the raw cell
/// value.  Radii are deliberately *not* rescaled even though the metrics mix
/// units (ms, bytes, scores) — the consuming chart decides whether to
/// normalize.  Output order matches input row order.
///
/// Fails with [`DataError::InvalidMetric`] when `metrics` is empty or names
/// a column that is absent or not numeric.
pub fn build(dataset: &Dataset, metrics: &[String]) -> Result<Vec<PolarPolygon>, DataError> {
    if metrics.is_empty() {
        return Err(DataError::InvalidMetric {
            column: String::new(),
            reason: "metric selection is empty".into(),
        });
    }
    for column in metrics {
        match dataset.kind_of(column) {
            Some(ColumnKind::Numeric) => {}
            Some(_) => {
                return Err(DataError::InvalidMetric {
                    column: column.clone(),
                    reason: "column is not numeric".into(),
                });
            }
            None => {
                return Err(DataError::InvalidMetric {
                    column: column.clone(),
                    reason: "no such column".into(),
                });
            }
        }
    }

    let n = metrics.len();
    let mut polygons = Vec::with_capacity(dataset.len());

    for row in dataset.rows() {
        let mut vertices: Vec<PolarVertex> = metrics
            .iter()
            .enumerate()
            .map(|(i, column)| PolarVertex {
                angle: i as f64 / n as f64 * TAU,
                // Kind check above guarantees the cell is numeric.
                radius: dataset.number(row, column).unwrap_or(f64::NAN),
            })
            .collect();
        // Close the loop by repeating the first vertex.
        vertices.push(vertices[0]);

        polygons.push(PolarPolygon {
            label: dataset.label_of(row),
            vertices,
        });
    }

    Ok(polygons)
}
