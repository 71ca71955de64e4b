use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::model::TraceId;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – interactive controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(chart) = state.active_chart() else {
        ui.label("No chart loaded.");
        return;
    };

    // ---- Logo (centered) ----
    if let Some(logo) = &chart.spec.logo {
        let uri = format!("file://{}", logo.path.display());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0)
                    .rounding(4.0),
            );
        });
        ui.add_space(4.0);
    }

    // Clone what we need so we can mutate state below.
    let spec = &chart.spec;
    let selector = spec.view_selector.clone();
    let view_labels: Vec<String> = spec.views.iter().map(|v| v.label.clone()).collect();
    let active_view = chart.state.active_view();
    let toggle = spec
        .toggle
        .as_ref()
        .map(|t| (t.label.clone(), chart.state.connectors_visible()));
    let legend: Vec<(TraceId, String, bool)> = spec
        .traces
        .iter()
        .filter(|t| t.show_legend)
        .filter_map(|t| {
            let visibility = chart.state.visibility(spec, t);
            visibility
                .in_legend()
                .then(|| (t.id.clone(), t.name.clone(), visibility.is_plotted()))
        })
        .collect();

    // ---- Dropdown: one option per view ----
    ui.strong(&selector);
    let mut selected_view = None;
    egui::ComboBox::from_id_salt("view_selector")
        .selected_text(view_labels.get(active_view).cloned().unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for (i, label) in view_labels.iter().enumerate() {
                if ui.selectable_label(i == active_view, label).clicked() {
                    selected_view = Some(i);
                }
            }
        });
    if let Some(i) = selected_view {
        state.select_view(i);
    }

    // ---- Connector toggle ----
    if let Some((label, visible)) = toggle {
        ui.add_space(4.0);
        if ui.selectable_label(visible, label).clicked() {
            state.toggle_connectors();
        }
    }
    ui.separator();

    // ---- Legend: click to bring series in or out ----
    ui.heading("Series");
    let mut clicked = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (id, name, shown) in &legend {
                let mut checked = *shown;
                if ui.checkbox(&mut checked, name).changed() {
                    clicked = Some(id.clone());
                }
            }
        });
    if let Some(id) = clicked {
        state.toggle_legend_entry(&id);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / chart switcher.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open workbook…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let titles: Vec<&'static str> = state.charts.iter().map(|c| c.kind.title()).collect();
        for (i, title) in titles.into_iter().enumerate() {
            if ui.selectable_label(state.active == i, title).clicked() {
                state.select_chart(i);
            }
        }

        ui.separator();

        if let Some(chart) = state.active_chart() {
            let shown = chart
                .spec
                .traces
                .iter()
                .filter(|t| chart.state.visibility(&chart.spec, t).is_plotted())
                .count();
            ui.label(format!(
                "{} traces, {} shown",
                chart.spec.traces.len(),
                shown
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for a workbook and rebuild the active chart from it.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open OECD workbook")
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .pick_file();

    if let Some(path) = file {
        state.reload(path);
    }
}
