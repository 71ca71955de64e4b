use std::collections::BTreeMap;

use super::model::{ChartSpec, LineStyle, TickLabel, Trace, TraceData, TraceId, TraceRole, View, Visibility};

// ---------------------------------------------------------------------------
// Interaction state of one chart
// ---------------------------------------------------------------------------

/// What the user has selected on a chart: the active view, the connector
/// toggle, and any legend clicks since the view was installed.
///
/// Transitions only happen through the methods below; nothing changes on
/// its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    active_view: usize,
    connectors_visible: bool,
    /// Legend clicks: trace → visibility chosen by the user.
    legend_overrides: BTreeMap<TraceId, Visibility>,
}

impl ChartState {
    /// Initial state: the chart's initial view, connectors visible.
    pub fn new(spec: &ChartSpec) -> Self {
        Self {
            active_view: spec.initial_view,
            connectors_visible: true,
            legend_overrides: BTreeMap::new(),
        }
    }

    pub fn active_view(&self) -> usize {
        self.active_view
    }

    pub fn connectors_visible(&self) -> bool {
        self.connectors_visible
    }

    pub fn view<'a>(&self, spec: &'a ChartSpec) -> Option<&'a View> {
        spec.views.get(self.active_view)
    }

    /// Install view `index`. Connectors come back and legend clicks are
    /// forgotten, since the view carries its own visibility.
    ///
    /// Returns `false` (state unchanged) when `index` is out of range.
    pub fn select_view(&mut self, spec: &ChartSpec, index: usize) -> bool {
        if index >= spec.views.len() {
            return false;
        }
        self.active_view = index;
        self.connectors_visible = true;
        self.legend_overrides.clear();
        true
    }

    /// Flip the connector mask. No-op on charts without a toggle.
    pub fn toggle_connectors(&mut self, spec: &ChartSpec) {
        if spec.toggle.is_some() {
            self.connectors_visible = !self.connectors_visible;
        }
    }

    /// Legend click: swap a trace between legend-only and shown.
    ///
    /// Hidden traces are not in the legend and cannot be clicked.
    pub fn toggle_legend_entry(&mut self, spec: &ChartSpec, id: &TraceId) {
        let Some(trace) = spec.trace(id) else {
            return;
        };
        let next = match self.visibility(spec, trace) {
            Visibility::Shown => Visibility::LegendOnly,
            Visibility::LegendOnly => Visibility::Shown,
            Visibility::Hidden => return,
        };
        self.legend_overrides.insert(id.clone(), next);
    }

    /// Effective visibility of a trace in the current state.
    pub fn visibility(&self, spec: &ChartSpec, trace: &Trace) -> Visibility {
        if trace.role == TraceRole::Connector && spec.toggle.is_some() && !self.connectors_visible {
            return Visibility::Hidden;
        }
        if let Some(v) = self.legend_overrides.get(&trace.id) {
            return *v;
        }
        self.view(spec)
            .and_then(|view| view.update(&trace.id))
            .and_then(|u| u.visibility)
            .unwrap_or(trace.visibility)
    }

    pub fn data<'a>(&self, spec: &'a ChartSpec, trace: &'a Trace) -> &'a TraceData {
        self.view(spec)
            .and_then(|view| view.update(&trace.id))
            .and_then(|u| u.data.as_ref())
            .unwrap_or(&trace.data)
    }

    pub fn line<'a>(&self, spec: &'a ChartSpec, trace: &'a Trace) -> Option<&'a LineStyle> {
        self.view(spec)
            .and_then(|view| view.update(&trace.id))
            .and_then(|u| u.line.as_ref())
            .or(trace.line.as_ref())
    }

    /// Category ticks of the active view, top to bottom.
    pub fn ticks<'a>(&self, spec: &'a ChartSpec) -> Option<&'a [TickLabel]> {
        self.view(spec).and_then(|v| v.ticks.as_deref())
    }
}
