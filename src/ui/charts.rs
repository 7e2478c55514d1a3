use std::f64::consts::TAU;

use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Polygon, Text as PlotText,
};

use crate::color::{generate_palette, heat_color};
use crate::data::model::Dataset;
use crate::data::{polar, series};
use crate::state::{AppState, ChartKind};

// ---------------------------------------------------------------------------
// Central panel – chart dispatch
// ---------------------------------------------------------------------------

/// Render the active chart in the central panel.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    match state.chart {
        ChartKind::Table => table_view(ui, state),
        ChartKind::Bar => bar_chart(ui, state),
        ChartKind::Pie => pie_charts(ui, state),
        ChartKind::Heatmap => heatmap(ui, state),
        ChartKind::Radar => radar_chart(ui, state),
    }
}

/// Shown in place of a chart whose required columns are missing from the
/// loaded table.  The rest of the dashboard keeps working.
fn chart_disabled(ui: &mut Ui, reason: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!("Chart unavailable: {reason}")).color(Color32::LIGHT_RED),
        );
    });
}

// ---------------------------------------------------------------------------
// Table view
// ---------------------------------------------------------------------------

fn table_view(ui: &mut Ui, state: &AppState) {
    let ds = &state.filtered;
    ui.heading("Protocol benchmark table");
    ui.label(format!(
        "{} of {} protocols match the current filters.",
        ds.len(),
        state.dataset.len()
    ));
    ui.add_space(4.0);

    if ds.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    let columns = ds.columns.clone();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(90.0), columns.len())
        .header(22.0, |mut header| {
            for col in &columns {
                header.col(|ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, ds.len(), |mut table_row| {
                let row = &ds.rows()[table_row.index()];
                for col in &columns {
                    table_row.col(|ui| {
                        if let Some(cell) = row.get(col) {
                            ui.label(cell.to_string());
                        }
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Metric");
        egui::ComboBox::from_id_salt("bar_metric")
            .selected_text(state.bar_metric.clone())
            .show_ui(ui, |ui: &mut Ui| {
                for col in state.dataset.numeric_columns() {
                    if ui
                        .selectable_label(state.bar_metric == col, &col)
                        .clicked()
                    {
                        state.bar_metric = col.clone();
                    }
                }
            });
    });

    let data = match series::bar_series(&state.filtered, &state.bar_metric) {
        Ok(s) => s,
        Err(e) => {
            chart_disabled(ui, &e.to_string());
            return;
        }
    };

    let bars: Vec<Bar> = data
        .points
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value)
                .width(0.7)
                .name(label)
                .fill(state.color_map.color_for(label))
        })
        .collect();

    Plot::new("bar_chart")
        .legend(Legend::default())
        .y_axis_label(&data.metric)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Pie charts (one per categorical column)
// ---------------------------------------------------------------------------

fn pie_charts(ui: &mut Ui, state: &AppState) {
    let categorical = state.filtered.categorical_columns();
    if categorical.is_empty() {
        chart_disabled(ui, "this table has no categorical columns");
        return;
    }

    let n = categorical.len().min(3);
    ui.columns(n, |panes: &mut [Ui]| {
        for (i, col) in categorical.iter().take(n).enumerate() {
            let ui = &mut panes[i];
            ui.strong(format!("{col} distribution"));
            match series::value_counts(&state.filtered, col) {
                Ok(counts) => pie_plot(ui, col, &counts),
                Err(e) => chart_disabled(ui, &e.to_string()),
            }
        }
    });
}

fn pie_plot(ui: &mut Ui, id: &str, counts: &[(String, usize)]) {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        ui.label("No rows match the current filters.");
        return;
    }
    let palette = generate_palette(counts.len());

    Plot::new(format!("pie_{id}"))
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0_f64;
            for (i, (label, count)) in counts.iter().enumerate() {
                let sweep = *count as f64 / total as f64 * TAU;
                let end = start + sweep;

                // Wedge: centre plus an arc sampled densely enough to look
                // round at any share.
                let steps = ((sweep / TAU) * 64.0).ceil().max(2.0) as usize;
                let mut points = vec![[0.0, 0.0]];
                for s in 0..=steps {
                    let a = start + sweep * s as f64 / steps as f64;
                    points.push([a.cos(), a.sin()]);
                }

                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(points))
                        .name(format!("{label} ({count})"))
                        .fill_color(palette[i].gamma_multiply(0.85))
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                start = end;
            }
        });
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

/// Performance columns shown by default, mirroring the classic benchmark
/// layout.  Falls back to every numeric column for foreign tables.
const HEAT_METRICS: [&str; 5] = [
    "Key Exchange Time (ms)",
    "Encryption Time (ms)",
    "Decryption Time (ms)",
    "Resource Usage (MB)",
    "Security Score (/10)",
];

fn heat_columns(dataset: &Dataset) -> Vec<String> {
    let numeric = dataset.numeric_columns();
    let preferred: Vec<String> = HEAT_METRICS
        .iter()
        .map(|m| m.to_string())
        .filter(|m| numeric.contains(m))
        .collect();
    if preferred.is_empty() {
        numeric
    } else {
        preferred
    }
}

fn heatmap(ui: &mut Ui, state: &AppState) {
    ui.heading("Performance metric heatmap");

    let columns = heat_columns(&state.dataset);
    let matrix = match series::numeric_matrix(&state.filtered, &columns) {
        Ok(m) => m,
        Err(e) => {
            chart_disabled(ui, &e.to_string());
            return;
        }
    };
    if matrix.row_labels.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    let span = (matrix.max - matrix.min).max(f64::EPSILON);

    ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("heatmap_grid")
                .spacing([3.0, 3.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for col in &matrix.columns {
                        ui.strong(col);
                    }
                    ui.end_row();

                    for (r, label) in matrix.row_labels.iter().enumerate() {
                        ui.strong(label);
                        for c in 0..matrix.columns.len() {
                            let v = matrix.values[r][c];
                            let t = (v - matrix.min) / span;
                            let fg = if t > 0.55 {
                                Color32::WHITE
                            } else {
                                Color32::BLACK
                            };
                            ui.label(
                                RichText::new(format!(" {v:.1} "))
                                    .monospace()
                                    .background_color(heat_color(t))
                                    .color(fg),
                            );
                        }
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Radar chart
// ---------------------------------------------------------------------------

fn radar_chart(ui: &mut Ui, state: &AppState) {
    let metrics = state.radar_metrics();
    let polygons = match polar::build(&state.filtered, &metrics) {
        Ok(p) => p,
        Err(e) => {
            chart_disabled(ui, &e.to_string());
            return;
        }
    };

    // Spoke length: the largest radius on screen.  Radii are raw metric
    // values on purpose, mixed units and all.
    let max_r = polygons
        .iter()
        .flat_map(|p| p.vertices.iter())
        .map(|v| v.radius)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    Plot::new("radar_chart")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show(ui, |plot_ui| {
            let n = metrics.len();
            for (i, metric) in metrics.iter().enumerate() {
                let angle = i as f64 / n as f64 * TAU;
                let (x, y) = (angle.cos(), angle.sin());
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[0.0, 0.0], [x * max_r, y * max_r]]))
                        .color(Color32::from_gray(100))
                        .width(0.5),
                );
                plot_ui.text(PlotText::new(
                    PlotPoint::new(x * max_r * 1.1, y * max_r * 1.1),
                    RichText::new(metric.clone()).small(),
                ));
            }

            for poly in &polygons {
                let color = state.color_map.color_for(&poly.label);
                let points: Vec<[f64; 2]> = poly
                    .vertices
                    .iter()
                    .map(|v| [v.radius * v.angle.cos(), v.radius * v.angle.sin()])
                    .collect();

                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(points.clone()))
                        .fill_color(color.gamma_multiply(0.12))
                        .stroke(Stroke::NONE),
                );
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .color(color)
                        .width(1.5)
                        .name(&poly.label),
                );
            }
        });
}
