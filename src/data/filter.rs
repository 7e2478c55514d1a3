use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::{ColumnKind, DataError, Dataset};

// ---------------------------------------------------------------------------
// Threshold predicate: per-column comparator + threshold, AND-composed
// ---------------------------------------------------------------------------

/// Comparison operator for a threshold clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Ge,
    Le,
    Gt,
    Lt,
}

impl Comparator {
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Ge => value >= threshold,
            Comparator::Le => value <= threshold,
            Comparator::Gt => value > threshold,
            Comparator::Lt => value < threshold,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparator::Ge => "≥",
            Comparator::Le => "≤",
            Comparator::Gt => ">",
            Comparator::Lt => "<",
        };
        write!(f, "{s}")
    }
}

/// One threshold clause applied to a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clause {
    pub comparator: Comparator,
    pub threshold: f64,
}

impl Clause {
    pub fn new(comparator: Comparator, threshold: f64) -> Self {
        Clause {
            comparator,
            threshold,
        }
    }
}

/// Conjunctive filter: column name → threshold clause.  An empty map means
/// "no filter" and leaves the dataset untouched.
pub type FilterPredicate = BTreeMap<String, Clause>;

// ---------------------------------------------------------------------------
// filter
// ---------------------------------------------------------------------------

/// Retain exactly the rows satisfying every clause, in original row order.
///
/// Clause columns are validated before any row is touched: an unknown or
/// non-numeric column yields [`DataError::InvalidPredicate`] and the input
/// is returned unmodified to the caller (it is never mutated either way).
///
/// A table with zero rows (e.g. a header-only CSV) has no cells to infer
/// kinds from, so clause columns are checked against the schema's column
/// list only; the result is the empty table, never an error.
pub fn filter(dataset: &Dataset, predicate: &FilterPredicate) -> Result<Dataset, DataError> {
    for column in predicate.keys() {
        match dataset.kind_of(column) {
            Some(ColumnKind::Numeric) => {}
            Some(_) => {
                return Err(DataError::InvalidPredicate {
                    column: column.clone(),
                    reason: "column is not numeric".into(),
                });
            }
            None if dataset.is_empty() && dataset.columns.iter().any(|c| c == column) => {}
            None => {
                return Err(DataError::InvalidPredicate {
                    column: column.clone(),
                    reason: "no such column".into(),
                });
            }
        }
    }

    if predicate.is_empty() {
        return Ok(dataset.clone());
    }

    let kept = dataset
        .rows()
        .iter()
        .filter(|row| {
            predicate.iter().all(|(column, clause)| {
                dataset
                    .number(row, column)
                    .is_some_and(|v| clause.comparator.holds(v, clause.threshold))
            })
        })
        .cloned()
        .collect();

    Ok(dataset.with_rows(kept))
}

// ---------------------------------------------------------------------------
// Label selection (protocol multiselect)
// ---------------------------------------------------------------------------

/// Keep only rows whose label-column value is in `selected`, preserving
/// order.  An empty set keeps nothing — "none selected" hides everything,
/// matching the filter panel's All/None buttons.
pub fn select_labels(dataset: &Dataset, selected: &BTreeSet<String>) -> Dataset {
    let kept = dataset
        .rows()
        .iter()
        .filter(|row| selected.contains(&dataset.label_of(row)))
        .cloned()
        .collect();
    dataset.with_rows(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::small_dataset;

    const SCORE: &str = "Security Score (/10)";

    #[test]
    fn empty_predicate_is_identity() {
        let ds = small_dataset();
        let out = filter(&ds, &FilterPredicate::new()).unwrap();
        assert_eq!(out.len(), ds.len());
        assert_eq!(out.labels(), ds.labels());
    }

    #[test]
    fn threshold_keeps_only_matching_rows() {
        let ds = small_dataset();
        let mut pred = FilterPredicate::new();
        pred.insert(SCORE.into(), Clause::new(Comparator::Ge, 7.0));

        let out = filter(&ds, &pred).unwrap();
        assert_eq!(out.labels(), vec!["Kyber-1024"]);
        // Soundness: every surviving row satisfies the clause.
        for row in out.rows() {
            assert!(out.number(row, SCORE).unwrap() >= 7.0);
        }
    }

    #[test]
    fn preserves_row_order() {
        let ds = small_dataset();
        let mut pred = FilterPredicate::new();
        pred.insert(SCORE.into(), Clause::new(Comparator::Ge, 0.0));
        let out = filter(&ds, &pred).unwrap();
        assert_eq!(out.labels(), ds.labels());
    }

    #[test]
    fn unknown_column_is_invalid_predicate() {
        let ds = small_dataset();
        let mut pred = FilterPredicate::new();
        pred.insert("No Such Metric".into(), Clause::new(Comparator::Le, 1.0));

        let err = filter(&ds, &pred).unwrap_err();
        assert!(matches!(err, DataError::InvalidPredicate { .. }));
        // Input untouched.
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn non_numeric_column_is_invalid_predicate() {
        let ds = small_dataset();
        let mut pred = FilterPredicate::new();
        pred.insert(
            "Quantum Resistance".into(),
            Clause::new(Comparator::Ge, 1.0),
        );
        let err = filter(&ds, &pred).unwrap_err();
        assert!(matches!(err, DataError::InvalidPredicate { .. }));
    }

    #[test]
    fn empty_dataset_filters_to_empty() {
        let ds = small_dataset().with_rows(Vec::new());
        let mut pred = FilterPredicate::new();
        pred.insert(SCORE.into(), Clause::new(Comparator::Ge, 7.0));
        let out = filter(&ds, &pred).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn header_only_table_filters_to_empty() {
        use crate::data::model::tests::cols;
        use crate::data::model::Dataset;

        // Zero rows straight from construction, the shape a header-only
        // CSV upload produces: no cell exists to infer the Score kind from,
        // yet filtering on a schema column must succeed.
        let ds = Dataset::from_rows(cols(&["Protocol", "Score"]), "Protocol", vec![]).unwrap();
        let mut pred = FilterPredicate::new();
        pred.insert("Score".into(), Clause::new(Comparator::Ge, 7.0));

        let out = filter(&ds, &pred).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns, ds.columns);

        // A column outside the schema is still rejected.
        let mut bad = FilterPredicate::new();
        bad.insert("Latency".into(), Clause::new(Comparator::Ge, 1.0));
        let err = filter(&ds, &bad).unwrap_err();
        assert!(matches!(err, DataError::InvalidPredicate { .. }));
    }

    #[test]
    fn conjunction_requires_all_clauses() {
        use crate::data::model::tests::{cols, row};
        use crate::data::model::{CellValue, Dataset};

        let ds = Dataset::from_rows(
            cols(&["Protocol", "Score", "Resource"]),
            "Protocol",
            vec![
                row(&[
                    ("Protocol", CellValue::Text("Kyber-512".into())),
                    ("Score", CellValue::Number(9.2)),
                    ("Resource", CellValue::Number(40.0)),
                ]),
                row(&[
                    ("Protocol", CellValue::Text("McEliece".into())),
                    ("Score", CellValue::Number(9.7)),
                    ("Resource", CellValue::Number(200.0)),
                ]),
            ],
        )
        .unwrap();

        // High score AND modest resource usage: only Kyber passes both.
        let mut pred = FilterPredicate::new();
        pred.insert("Score".into(), Clause::new(Comparator::Ge, 9.0));
        pred.insert("Resource".into(), Clause::new(Comparator::Le, 100.0));
        let out = filter(&ds, &pred).unwrap();
        assert_eq!(out.labels(), vec!["Kyber-512"]);
    }

    #[test]
    fn label_selection_keeps_named_rows() {
        let ds = small_dataset();
        let selected: std::collections::BTreeSet<String> =
            ["RSA 2048".to_string()].into_iter().collect();
        let out = select_labels(&ds, &selected);
        assert_eq!(out.labels(), vec!["RSA 2048"]);

        let none = select_labels(&ds, &std::collections::BTreeSet::new());
        assert!(none.is_empty());
    }
}
