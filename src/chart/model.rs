use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::chart::logo::Logo;
use crate::error::{ChartError, ChartResult};

// ---------------------------------------------------------------------------
// Identity and visibility
// ---------------------------------------------------------------------------

/// Stable identifier of a trace; views address traces through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceId(String);

impl TraceId {
    /// Connector line of one country (dot-and-connector chart).
    pub fn connector(country: &str) -> Self {
        TraceId(format!("connector/{country}"))
    }

    /// Point set of one measure (dot-and-connector chart).
    pub fn points(measure: &str) -> Self {
        TraceId(format!("points/{measure}"))
    }

    /// Line of one country within one household scenario.
    pub fn series(scenario: &str, country: &str) -> Self {
        TraceId(format!("{scenario}/{country}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TraceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Display state of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Neither plotted nor listed in the legend.
    Hidden,
    /// Listed in the legend only; the user can bring it in.
    LegendOnly,
    /// Plotted.
    Shown,
}

impl Visibility {
    pub fn is_plotted(self) -> bool {
        self == Visibility::Shown
    }

    pub fn in_legend(self) -> bool {
        self != Visibility::Hidden
    }
}

/// Plotly encodes visibility as `true`, `"legendonly"` or `false`.
impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Visibility::Hidden => serializer.serialize_bool(false),
            Visibility::LegendOnly => serializer.serialize_str("legendonly"),
            Visibility::Shown => serializer.serialize_bool(true),
        }
    }
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceRole {
    /// Line joining one category's points; subject to the connector toggle.
    Connector,
    /// Markers of one measure across all categories.
    Points,
    /// A free-standing line series.
    Series,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
    #[serde(rename = "lines+text")]
    LinesText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSymbol {
    Circle,
    Diamond,
    Square,
}

/// Y coordinates are either numbers or category labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Coords {
    Numbers(Vec<Option<f64>>),
    Categories(Vec<String>),
}

impl Coords {
    pub fn len(&self) -> usize {
        match self {
            Coords::Numbers(v) => v.len(),
            Coords::Categories(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceData {
    pub x: Vec<Option<f64>>,
    pub y: Coords,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub spline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub symbol: MarkerSymbol,
    pub size: f64,
    pub color: String,
    pub outline_color: String,
    pub outline_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub id: TraceId,
    pub name: String,
    pub role: TraceRole,
    pub mode: TraceMode,
    pub data: TraceData,
    pub line: Option<LineStyle>,
    pub marker: Option<MarkerStyle>,
    /// Per-point labels; empty strings draw nothing.
    pub text: Vec<String>,
    pub legend_group: Option<String>,
    pub show_legend: bool,
    /// `None` suppresses hover for the trace.
    pub hover_template: Option<String>,
    pub opacity: f64,
    pub visibility: Visibility,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Replacement values installed on one trace when a view is selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceUpdate {
    pub data: Option<TraceData>,
    pub line: Option<LineStyle>,
    pub visibility: Option<Visibility>,
}

impl TraceUpdate {
    /// Which fields the update replaces: (data, line, visibility).
    pub fn fields(&self) -> (bool, bool, bool) {
        (
            self.data.is_some(),
            self.line.is_some(),
            self.visibility.is_some(),
        )
    }
}

/// One category tick on the y axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickLabel {
    /// Category value the tick sits on.
    pub value: String,
    pub text: String,
    /// Colour of the emphasis marker, if the tick is emphasised.
    pub highlight: Option<String>,
}

/// A precomputed dropdown option.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub key: String,
    pub label: String,
    pub updates: IndexMap<TraceId, TraceUpdate>,
    /// Category ticks, top to bottom.
    pub ticks: Option<Vec<TickLabel>>,
}

impl View {
    pub fn update(&self, id: &TraceId) -> Option<&TraceUpdate> {
        self.updates.get(id)
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// Fractions rendered as whole percentages (0.25 → "25%").
    Percent,
    /// Values already in percent; a "%" suffix is appended.
    PercentSuffix,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axis {
    pub title: Option<String>,
    pub range: Option<(f64, f64)>,
    pub tick_format: Option<TickFormat>,
    pub tick_step: Option<f64>,
    /// Category axis drawn top to bottom.
    pub reversed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    /// Paper coordinates.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverMode {
    /// One tooltip per category row.
    YUnified,
    /// One tooltip per x position.
    XUnified,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: String,
    /// Render the title in bold.
    pub bold_title: bool,
    pub height: Option<u32>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub annotations: Vec<Annotation>,
    pub hover_mode: HoverMode,
}

/// Two-state button flipping the visibility of a subset of traces.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorToggle {
    pub label: String,
    pub targets: Vec<TraceId>,
}

// ---------------------------------------------------------------------------
// ChartSpec – everything a renderer needs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub layout: Layout,
    /// Heading of the view selector ("Sort by", "Household").
    pub view_selector: String,
    pub traces: Vec<Trace>,
    pub views: Vec<View>,
    pub initial_view: usize,
    pub toggle: Option<ConnectorToggle>,
    pub logo: Option<Logo>,
}

impl ChartSpec {
    /// Check that every view updates every trace with the same fields, and
    /// that replacement coordinates pair up.
    ///
    /// Renderers replace trace arrays wholesale on a view switch; a view that
    /// skipped a trace or a field would leave stale values behind.
    pub fn validate(&self) -> ChartResult<()> {
        let first = self.views.first().ok_or(ChartError::NoViews)?;
        if self.initial_view >= self.views.len() {
            return Err(ChartError::NoViews);
        }
        let mismatch = |view: &View, trace: &str| ChartError::ViewMismatch {
            view: view.key.clone(),
            trace: trace.to_string(),
        };

        for view in &self.views {
            if view.updates.len() != self.traces.len() {
                return Err(mismatch(view, "<extra>"));
            }
            for trace in &self.traces {
                let update = view
                    .update(&trace.id)
                    .ok_or_else(|| mismatch(view, trace.id.as_str()))?;
                let reference = first
                    .update(&trace.id)
                    .ok_or_else(|| mismatch(first, trace.id.as_str()))?;
                if update.fields() != reference.fields() {
                    return Err(mismatch(view, trace.id.as_str()));
                }
                if let Some(data) = &update.data {
                    if data.x.len() != data.y.len() {
                        return Err(mismatch(view, trace.id.as_str()));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn trace(&self, id: &TraceId) -> Option<&Trace> {
        self.traces.iter().find(|t| &t.id == id)
    }

    /// Positions of traces with the given role, in trace order.
    pub fn positions_of(&self, role: TraceRole) -> Vec<usize> {
        self.traces
            .iter()
            .enumerate()
            .filter(|(_, t)| t.role == role)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_serializes_like_plotly() {
        let json = serde_json::to_string(&[
            Visibility::Shown,
            Visibility::LegendOnly,
            Visibility::Hidden,
        ])
        .unwrap();
        assert_eq!(json, r#"[true,"legendonly",false]"#);
    }

    #[test]
    fn coords_serialize_untagged_with_nulls() {
        let data = TraceData {
            x: vec![Some(0.5), None],
            y: Coords::Categories(vec!["France".into(), "Spain".into()]),
        };
        assert_eq!(
            serde_json::to_string(&data).unwrap(),
            r#"{"x":[0.5,null],"y":["France","Spain"]}"#
        );
    }

    #[test]
    fn trace_ids_are_namespaced() {
        assert_ne!(TraceId::connector("France"), TraceId::points("France"));
        assert_eq!(
            TraceId::series("single_no_children", "Spain").as_str(),
            "single_no_children/Spain"
        );
    }
}
