use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use crate::chart::logo::Logo;
use crate::chart::model::{
    Axis, ChartSpec, HoverMode, TickFormat, Trace, TraceId, TraceUpdate, View,
};

/// Plotly build referenced by exported documents.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Write `spec` as a self-contained HTML document.
pub fn write_document(spec: &ChartSpec, path: &Path) -> Result<()> {
    let html = render_document(spec)?;
    std::fs::write(path, html)
        .with_context(|| format!("writing chart document {}", path.display()))?;
    log::info!("Wrote chart document {}", path.display());
    Ok(())
}

/// HTML page embedding the Plotly figure for `spec`.
pub fn render_document(spec: &ChartSpec) -> Result<String> {
    let figure = serde_json::to_string(&figure_json(spec)).context("serializing figure")?;
    // a "</" inside the JSON (tick markup) would close the script element
    let figure = figure.replace("</", "<\\/");
    let title = escape_html(&spec.layout.title);
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{PLOTLY_CDN}" charset="utf-8"></script>
</head>
<body>
<div id="chart" style="width:100%;height:100vh;"></div>
<script>
  var figure = {figure};
  Plotly.newPlot("chart", figure.data, figure.layout, {{responsive: true}});
</script>
</body>
</html>
"#
    ))
}

/// The Plotly figure (`{data, layout}`) for `spec`.
pub fn figure_json(spec: &ChartSpec) -> Value {
    let data: Vec<Value> = spec.traces.iter().map(trace_json).collect();
    let mut layout = layout_json(spec);
    layout["updatemenus"] = Value::Array(update_menus(spec));
    if let Some(logo) = &spec.logo {
        layout["images"] = json!([logo_json(logo)]);
    }
    json!({ "data": data, "layout": layout })
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

fn trace_json(trace: &Trace) -> Value {
    let mut t = json!({
        "type": "scatter",
        "x": trace.data.x,
        "y": trace.data.y,
        "mode": trace.mode,
        "name": trace.name,
        "showlegend": trace.show_legend,
        "visible": trace.visibility,
        "opacity": trace.opacity,
    });
    if let Some(line) = &trace.line {
        t["line"] = json!({ "color": line.color, "width": line.width });
        if line.spline {
            t["line"]["shape"] = json!("spline");
        }
    }
    if let Some(marker) = &trace.marker {
        t["marker"] = json!({
            "symbol": marker.symbol,
            "size": marker.size,
            "color": marker.color,
            "line": { "width": marker.outline_width, "color": marker.outline_color },
        });
    }
    if !trace.text.is_empty() {
        t["text"] = json!(trace.text);
        t["textposition"] = json!("middle right");
        let color = trace.line.as_ref().map(|l| l.color.clone());
        t["textfont"] = json!({ "size": 12, "color": color });
    }
    if let Some(group) = &trace.legend_group {
        t["legendgroup"] = json!(group);
    }
    match &trace.hover_template {
        Some(template) => t["hovertemplate"] = json!(template),
        None => t["hoverinfo"] = json!("skip"),
    }
    t
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

fn axis_json(axis: &Axis) -> Value {
    let mut a = json!({ "gridcolor": "lightgrey", "zeroline": false });
    if let Some(title) = &axis.title {
        a["title"] = json!({ "text": title });
    }
    if let Some((lo, hi)) = axis.range {
        a["range"] = json!([lo, hi]);
    }
    match axis.tick_format {
        Some(TickFormat::Percent) => a["tickformat"] = json!(".0%"),
        Some(TickFormat::PercentSuffix) => a["ticksuffix"] = json!("%"),
        None => {}
    }
    if let Some(step) = axis.tick_step {
        a["dtick"] = json!(step);
    }
    if axis.reversed {
        a["autorange"] = json!("reversed");
    }
    a
}

fn layout_json(spec: &ChartSpec) -> Value {
    let layout = &spec.layout;
    let title = if layout.bold_title {
        format!("<b>{}</b>", layout.title)
    } else {
        layout.title.clone()
    };
    let mut l = json!({
        "template": "plotly_white",
        "title": { "text": title, "x": 0.5, "xanchor": "center" },
        "xaxis": axis_json(&layout.x_axis),
        "yaxis": axis_json(&layout.y_axis),
        "hovermode": match layout.hover_mode {
            HoverMode::YUnified => "y unified",
            HoverMode::XUnified => "x unified",
        },
        "plot_bgcolor": "white",
        "font": { "family": "Arial", "size": 12, "color": "black" },
    });
    if let Some(height) = layout.height {
        l["height"] = json!(height);
    }
    if let Some(view) = spec.views.get(spec.initial_view) {
        if let Value::Object(ticks) = tick_relayout(view, layout.y_axis.reversed) {
            for (key, value) in ticks {
                if let Some(field) = key.strip_prefix("yaxis.") {
                    l["yaxis"][field] = value;
                }
            }
        }
    }
    if !layout.annotations.is_empty() {
        l["annotations"] = layout
            .annotations
            .iter()
            .map(|a| {
                json!({
                    "text": a.text,
                    "xref": "paper",
                    "yref": "paper",
                    "x": a.x,
                    "y": a.y,
                    "showarrow": false,
                    "xanchor": "right",
                    "yanchor": "top",
                })
            })
            .collect();
    }
    l
}

fn logo_json(logo: &Logo) -> Value {
    let p = &logo.placement;
    json!({
        "source": logo.data_uri,
        "xref": "paper",
        "yref": "paper",
        "x": p.x,
        "y": p.y,
        "sizex": p.size,
        "sizey": p.size,
        "xanchor": if p.right_anchored { "right" } else { "left" },
        "yanchor": "bottom",
        "layer": "above",
    })
}

// ---------------------------------------------------------------------------
// Interactive controls
// ---------------------------------------------------------------------------

fn update_menus(spec: &ChartSpec) -> Vec<Value> {
    let buttons: Vec<Value> = spec
        .views
        .iter()
        .map(|view| {
            json!({
                "label": view.label,
                "method": "update",
                "args": [
                    view_restyle(spec, view),
                    tick_relayout(view, spec.layout.y_axis.reversed),
                ],
            })
        })
        .collect();

    let mut menus = vec![json!({
        "type": "dropdown",
        "direction": "down",
        "x": if spec.toggle.is_some() { 0.84 } else { 0.5 },
        "xanchor": if spec.toggle.is_some() { "left" } else { "center" },
        "y": if spec.toggle.is_some() { 0.18 } else { 1.0 },
        "yanchor": "bottom",
        "showactive": true,
        "active": spec.initial_view,
        "buttons": buttons,
        "bgcolor": "white",
        "bordercolor": "lightgrey",
    })];

    if let Some(toggle) = &spec.toggle {
        let positions: HashMap<&TraceId, usize> =
            spec.traces.iter().enumerate().map(|(i, t)| (&t.id, i)).collect();
        let indices: Vec<usize> = toggle
            .targets
            .iter()
            .filter_map(|id| positions.get(id).copied())
            .collect();
        menus.push(json!({
            "type": "buttons",
            "direction": "right",
            "x": 0.84,
            "xanchor": "left",
            "y": 0.13,
            "yanchor": "bottom",
            "buttons": [{
                "label": toggle.label,
                "method": "restyle",
                "args": [{ "visible": vec![false; indices.len()] }, indices],
                "args2": [{ "visible": vec![true; indices.len()] }, indices],
            }],
            "bgcolor": "white",
            "bordercolor": "lightgrey",
        }));
    }
    menus
}

/// Restyle payload of a view: one array entry per trace, in trace order,
/// looked up by trace id.
fn view_restyle(spec: &ChartSpec, view: &View) -> Value {
    let updates: Vec<_> = spec.traces.iter().map(|t| view.update(&t.id)).collect();
    let any = |field: fn(&TraceUpdate) -> bool| updates.iter().flatten().any(|u| field(u));

    let mut restyle = Map::new();
    if any(|u| u.data.is_some()) {
        let xs: Vec<Value> = updates
            .iter()
            .map(|u| json!(u.and_then(|u| u.data.as_ref()).map(|d| &d.x)))
            .collect();
        let ys: Vec<Value> = updates
            .iter()
            .map(|u| json!(u.and_then(|u| u.data.as_ref()).map(|d| &d.y)))
            .collect();
        restyle.insert("x".into(), Value::Array(xs));
        restyle.insert("y".into(), Value::Array(ys));
    }
    if any(|u| u.line.is_some()) {
        let lines: Vec<_> = updates.iter().map(|u| u.and_then(|u| u.line.as_ref())).collect();
        restyle.insert(
            "line.color".into(),
            lines.iter().map(|l| json!(l.map(|l| &l.color))).collect(),
        );
        restyle.insert(
            "line.width".into(),
            lines.iter().map(|l| json!(l.map(|l| l.width))).collect(),
        );
    }
    if any(|u| u.visibility.is_some()) {
        restyle.insert(
            "visible".into(),
            updates
                .iter()
                .map(|u| json!(u.and_then(|u| u.visibility)))
                .collect(),
        );
    }
    Value::Object(restyle)
}

/// Relayout payload installing a view's category ticks.
fn tick_relayout(view: &View, reversed: bool) -> Value {
    let Some(ticks) = &view.ticks else {
        return json!({});
    };
    let values: Vec<&str> = ticks.iter().map(|t| t.value.as_str()).collect();
    let texts: Vec<String> = ticks
        .iter()
        .map(|t| match &t.highlight {
            Some(color) => format!("<b><span style='color:{color};'>{}</span></b>", t.text),
            None => t.text.clone(),
        })
        .collect();
    let mut relayout = json!({
        "yaxis.tickmode": "array",
        "yaxis.tickvals": values,
        "yaxis.ticktext": texts,
        "yaxis.categoryorder": "array",
        "yaxis.categoryarray": values,
    });
    if reversed {
        relayout["yaxis.autorange"] = json!("reversed");
    }
    relayout
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_escapes_markup() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
