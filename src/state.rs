use std::collections::{BTreeMap, BTreeSet};

use crate::color::ColorMap;
use crate::data::filter::{filter, select_labels, Clause, Comparator, FilterPredicate};
use crate::data::loader::sample_dataset;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Radar metrics pre-selected when the dataset provides them.
const DEFAULT_RADAR_METRICS: [&str; 4] = [
    "Key Exchange Time (ms)",
    "Encryption Time (ms)",
    "Decryption Time (ms)",
    "Security Score (/10)",
];

/// Which chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Table,
    Bar,
    Pie,
    Heatmap,
    Radar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Table,
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::Heatmap,
        ChartKind::Radar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Table => "Table",
            ChartKind::Bar => "Bar chart",
            ChartKind::Pie => "Pie charts",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::Radar => "Radar",
        }
    }
}

/// UI state of one numeric threshold slider.  Only enabled controls
/// contribute a clause to the filter predicate.
#[derive(Debug, Clone)]
pub struct ThresholdControl {
    pub enabled: bool,
    pub comparator: Comparator,
    pub value: f64,
    /// Slider bounds, the column's (min, max).
    pub range: (f64, f64),
}

/// The full UI state, independent of rendering.
///
/// The dataset itself is immutable; everything the user can change lives
/// here as explicit selection state and is re-applied on each pass.
pub struct AppState {
    /// Current benchmark table (built-in sample until a file is opened).
    pub dataset: Dataset,

    /// Per-metric threshold sliders.
    pub thresholds: BTreeMap<String, ThresholdControl>,

    /// Labels ticked in the protocol multiselect.
    pub selected_protocols: BTreeSet<String>,

    /// Cached result of applying thresholds + protocol selection.
    pub filtered: Dataset,

    /// Active chart tab.
    pub chart: ChartKind,

    /// Metric plotted by the bar chart.
    pub bar_metric: String,

    /// Categorical column the pie chart counts.
    pub pie_column: Option<String>,

    /// Metrics ticked for the radar chart (unordered; axis order comes
    /// from the dataset's column order).
    pub radar_selection: BTreeSet<String>,

    /// Protocol label → colour, shared by all charts.
    pub color_map: ColorMap,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut state = AppState {
            dataset: sample_dataset(),
            thresholds: BTreeMap::new(),
            selected_protocols: BTreeSet::new(),
            filtered: sample_dataset(),
            chart: ChartKind::Table,
            bar_metric: String::new(),
            pie_column: None,
            radar_selection: BTreeSet::new(),
            color_map: ColorMap::default(),
            status_message: None,
        };
        let ds = state.dataset.clone();
        state.set_dataset(ds);
        state
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reconcile every selection with the
    /// new schema.  A chart whose column disappeared falls back to the first
    /// compatible column (or is disabled) instead of failing the session.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let numeric = dataset.numeric_columns();
        let categorical = dataset.categorical_columns();

        self.thresholds = numeric
            .iter()
            .map(|col| {
                let range = dataset.numeric_range(col).unwrap_or((0.0, 0.0));
                (
                    col.clone(),
                    ThresholdControl {
                        enabled: false,
                        comparator: Comparator::Ge,
                        value: range.0,
                        range,
                    },
                )
            })
            .collect();

        self.selected_protocols = dataset.labels().into_iter().collect();
        self.color_map = ColorMap::new(&dataset.labels());

        if !numeric.iter().any(|c| *c == self.bar_metric) {
            self.bar_metric = numeric.first().cloned().unwrap_or_default();
        }
        let pie_ok = self
            .pie_column
            .as_ref()
            .map_or(false, |c| categorical.contains(c));
        if !pie_ok {
            self.pie_column = categorical.first().cloned();
        }

        self.radar_selection = DEFAULT_RADAR_METRICS
            .iter()
            .map(|m| m.to_string())
            .filter(|m| numeric.contains(m))
            .collect();
        if self.radar_selection.is_empty() {
            self.radar_selection = numeric.iter().cloned().collect();
        }

        self.status_message = None;
        self.dataset = dataset;
        self.refilter();
    }

    /// Build the conjunctive predicate from the enabled threshold sliders.
    pub fn predicate(&self) -> FilterPredicate {
        self.thresholds
            .iter()
            .filter(|(_, ctl)| ctl.enabled)
            .map(|(col, ctl)| (col.clone(), Clause::new(ctl.comparator, ctl.value)))
            .collect()
    }

    /// Recompute the cached filtered view after any selection change.
    pub fn refilter(&mut self) {
        match filter(&self.dataset, &self.predicate()) {
            Ok(by_threshold) => {
                self.filtered = select_labels(&by_threshold, &self.selected_protocols);
            }
            Err(e) => {
                // Sliders only exist for numeric columns, so this is a
                // stale-control condition after a schema change.
                log::error!("filter failed: {e}");
                self.status_message = Some(format!("Filter error: {e}"));
                self.filtered = self.dataset.clone();
            }
        }
    }

    /// Toggle one protocol in the multiselect.
    pub fn toggle_protocol(&mut self, label: &str) {
        if !self.selected_protocols.remove(label) {
            self.selected_protocols.insert(label.to_string());
        }
        self.refilter();
    }

    /// Tick every protocol.
    pub fn select_all_protocols(&mut self) {
        self.selected_protocols = self.dataset.labels().into_iter().collect();
        self.refilter();
    }

    /// Untick every protocol (hides all rows).
    pub fn select_no_protocols(&mut self) {
        self.selected_protocols.clear();
        self.refilter();
    }

    /// Toggle a metric in the radar selection.
    pub fn toggle_radar_metric(&mut self, column: &str) {
        if !self.radar_selection.remove(column) {
            self.radar_selection.insert(column.to_string());
        }
    }

    /// Ticked radar metrics in dataset column order, so axis placement is
    /// stable across toggles.
    pub fn radar_metrics(&self) -> Vec<String> {
        self.dataset
            .numeric_columns()
            .into_iter()
            .filter(|c| self.radar_selection.contains(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::small_dataset;

    #[test]
    fn default_state_uses_sample_dataset() {
        let state = AppState::default();
        assert_eq!(state.dataset.len(), 16);
        assert_eq!(state.filtered.len(), 16);
        assert_eq!(state.bar_metric, "Key Exchange Time (ms)");
        assert_eq!(state.pie_column.as_deref(), Some("Anonymity Level"));
        assert_eq!(state.radar_metrics().len(), 4);
        assert!(state.predicate().is_empty());
    }

    #[test]
    fn enabled_threshold_narrows_filtered_view() {
        let mut state = AppState::default();
        let ctl = state
            .thresholds
            .get_mut("Security Score (/10)")
            .unwrap();
        ctl.enabled = true;
        ctl.comparator = Comparator::Ge;
        ctl.value = 9.0;
        state.refilter();

        assert!(state.filtered.len() < state.dataset.len());
        for row in state.filtered.rows() {
            assert!(state.filtered.number(row, "Security Score (/10)").unwrap() >= 9.0);
        }
    }

    #[test]
    fn protocol_selection_composes_with_thresholds() {
        let mut state = AppState::default();
        state.select_no_protocols();
        assert!(state.filtered.is_empty());
        state.toggle_protocol("ECC");
        assert_eq!(state.filtered.labels(), vec!["ECC"]);
    }

    #[test]
    fn new_dataset_reconciles_selections() {
        let mut state = AppState::default();
        state.chart = ChartKind::Radar;
        state.set_dataset(small_dataset());

        // Old bar metric is gone; falls back to the first numeric column.
        assert_eq!(state.bar_metric, "Security Score (/10)");
        assert_eq!(state.pie_column.as_deref(), Some("Quantum Resistance"));
        // None of the default radar metrics exist; all numeric columns used.
        assert_eq!(
            state.radar_metrics(),
            vec!["Security Score (/10)".to_string()]
        );
        assert_eq!(state.filtered.len(), 2);
    }

    #[test]
    fn radar_metrics_follow_column_order() {
        let mut state = AppState::default();
        state.radar_selection.clear();
        state.toggle_radar_metric("Security Score (/10)");
        state.toggle_radar_metric("Key Exchange Time (ms)");
        // Dataset order, not toggle order.
        assert_eq!(
            state.radar_metrics(),
            vec![
                "Key Exchange Time (ms)".to_string(),
                "Security Score (/10)".to_string()
            ]
        );
    }
}
