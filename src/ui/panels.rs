use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::Comparator;
use crate::data::loader;
use crate::state::{AppState, ChartKind};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            protocol_section(ui, state);
            ui.separator();
            threshold_section(ui, state);
            ui.separator();
            radar_section(ui, state);
        });
}

fn protocol_section(ui: &mut Ui, state: &mut AppState) {
    let labels = state.dataset.labels();
    let header = format!(
        "Protocols  ({}/{})",
        state.selected_protocols.len(),
        labels.len()
    );

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("protocol_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_protocols();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_protocols();
                }
            });

            for label in &labels {
                let mut checked = state.selected_protocols.contains(label);
                let text =
                    RichText::new(label).color(state.color_map.color_for(label));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_protocol(label);
                }
            }
        });
}

fn threshold_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Metric thresholds");
    ui.add_space(2.0);

    // Refilter once, and only when a control actually changed this frame.
    let mut changed = false;
    for col in state.dataset.numeric_columns() {
        let Some(ctl) = state.thresholds.get_mut(&col) else {
            continue;
        };

        changed |= ui.checkbox(&mut ctl.enabled, &col).changed();
        if !ctl.enabled {
            continue;
        }

        ui.horizontal(|ui: &mut Ui| {
            egui::ComboBox::from_id_salt(("comparator", &col))
                .selected_text(ctl.comparator.to_string())
                .width(44.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for cmp in [Comparator::Ge, Comparator::Le] {
                        if ui
                            .selectable_label(ctl.comparator == cmp, cmp.to_string())
                            .clicked()
                        {
                            ctl.comparator = cmp;
                            changed = true;
                        }
                    }
                });

            let (lo, hi) = ctl.range;
            changed |= ui.add(Slider::new(&mut ctl.value, lo..=hi)).changed();
        });
        ui.add_space(2.0);
    }

    if changed {
        state.refilter();
    }
}

fn radar_section(ui: &mut Ui, state: &mut AppState) {
    let numeric = state.dataset.numeric_columns();
    let header = format!(
        "Radar metrics  ({}/{})",
        state.radar_selection.len(),
        numeric.len()
    );

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("radar_metrics")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for col in &numeric {
                let mut checked = state.radar_selection.contains(col);
                if ui.checkbox(&mut checked, col).changed() {
                    state.toggle_radar_metric(col);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export filtered…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Reset to sample data").clicked() {
                state.set_dataset(loader::sample_dataset());
                ui.close_menu();
            }
        });

        ui.separator();

        for kind in ChartKind::ALL {
            if ui
                .selectable_label(state.chart == kind, kind.label())
                .clicked()
            {
                state.chart = kind;
            }
        }

        ui.separator();

        ui.label(format!(
            "{} protocols, {} visible",
            state.dataset.len(),
            state.filtered.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open benchmark table")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} protocols with columns {:?}",
                    dataset.len(),
                    dataset.columns
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered table")
        .set_file_name("filtered_benchmarks.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match loader::export_csv(&state.filtered, &path) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", state.filtered.len(), path.display());
                state.status_message =
                    Some(format!("Exported {} rows", state.filtered.len()));
            }
            Err(e) => {
                log::error!("Failed to export CSV: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
