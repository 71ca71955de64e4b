use std::path::PathBuf;

use crate::chart::model::{ChartSpec, TraceId};
use crate::chart::state::ChartState;
use crate::config::Settings;
use crate::pipeline::{self, ChartKind};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A built chart together with what the user has selected on it.
pub struct LoadedChart {
    pub kind: ChartKind,
    pub spec: ChartSpec,
    pub state: ChartState,
}

impl LoadedChart {
    pub fn new(kind: ChartKind, spec: ChartSpec) -> Self {
        let state = ChartState::new(&spec);
        Self { kind, spec, state }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Settings the charts were built from; reloads start from these.
    pub settings: Settings,

    /// Built charts, in top-bar order.
    pub charts: Vec<LoadedChart>,

    /// Index into `charts` of the chart on screen.
    pub active: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings, charts: Vec<LoadedChart>) -> Self {
        Self {
            settings,
            charts,
            active: 0,
            status_message: None,
        }
    }

    pub fn active_chart(&self) -> Option<&LoadedChart> {
        self.charts.get(self.active)
    }

    /// Switch the chart on screen.
    pub fn select_chart(&mut self, index: usize) {
        if index < self.charts.len() {
            self.active = index;
        }
    }

    /// Dropdown selection on the active chart.
    pub fn select_view(&mut self, index: usize) {
        if let Some(chart) = self.charts.get_mut(self.active) {
            chart.state.select_view(&chart.spec, index);
        }
    }

    /// Connector toggle on the active chart.
    pub fn toggle_connectors(&mut self) {
        if let Some(chart) = self.charts.get_mut(self.active) {
            chart.state.toggle_connectors(&chart.spec);
        }
    }

    /// Legend click on the active chart.
    pub fn toggle_legend_entry(&mut self, id: &TraceId) {
        if let Some(chart) = self.charts.get_mut(self.active) {
            chart.state.toggle_legend_entry(&chart.spec, id);
        }
    }

    /// Rebuild the active chart from another workbook.
    ///
    /// On failure the current chart stays and the error goes to the status line.
    pub fn reload(&mut self, path: PathBuf) {
        let Some(kind) = self.active_chart().map(|c| c.kind) else {
            return;
        };
        let settings = kind.with_workbook(&self.settings, path);
        match pipeline::run(kind, &settings) {
            Ok(spec) => {
                log::info!(
                    "Reloaded '{}' from {}: {} traces, {} views",
                    kind.title(),
                    kind.workbook(&settings).display(),
                    spec.traces.len(),
                    spec.views.len()
                );
                self.charts[self.active] = LoadedChart::new(kind, spec);
                self.settings = settings;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load workbook: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
