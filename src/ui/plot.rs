use std::collections::HashMap;

use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::chart::model::{Coords, MarkerSymbol, TickFormat, TickLabel, TraceData, TraceMode};
use crate::color::css_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart plot (central panel)
// ---------------------------------------------------------------------------

/// Render the active chart in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &AppState) {
    let chart = match state.active_chart() {
        Some(chart) => chart,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("No chart loaded  (File → Open workbook…)");
            });
            return;
        }
    };
    let spec = &chart.spec;
    let view_state = &chart.state;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new(&spec.layout.title).strong());
    });

    let ticks = view_state.ticks(spec).unwrap_or(&[]);
    let rows = category_rows(ticks);
    let labels: Vec<String> = ticks.iter().map(tick_text).collect();

    let mut plot = Plot::new("chart_plot")
        .legend(Legend::default())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if let Some(title) = &spec.layout.x_axis.title {
        plot = plot.x_axis_label(title.as_str());
    }
    if let Some(title) = &spec.layout.y_axis.title {
        plot = plot.y_axis_label(title.as_str());
    }
    if let Some((lo, hi)) = spec.layout.x_axis.range {
        plot = plot.include_x(lo).include_x(hi);
    }
    if let Some(format) = spec.layout.x_axis.tick_format {
        plot = plot.x_axis_formatter(move |mark: GridMark, _| format_tick(format, mark.value));
    }
    if labels.is_empty() {
        if let Some(format) = spec.layout.y_axis.tick_format {
            plot = plot.y_axis_formatter(move |mark: GridMark, _| format_tick(format, mark.value));
        }
    } else {
        plot = plot
            .include_y(0.5)
            .include_y(-(labels.len() as f64) + 0.5)
            .y_axis_formatter(move |mark: GridMark, _| category_label(&labels, mark.value));
    }

    plot.show(ui, |plot_ui| {
        for trace in &spec.traces {
            if !view_state.visibility(spec, trace).is_plotted() {
                continue;
            }
            let points = project(view_state.data(spec, trace), &rows);

            match trace.mode {
                TraceMode::Markers => {
                    let Some(marker) = &trace.marker else {
                        continue;
                    };
                    let series: PlotPoints = points.iter().map(|(_, p)| *p).collect();
                    let color = css_color(&marker.color).gamma_multiply(trace.opacity as f32);
                    plot_ui.points(
                        Points::new(series)
                            .shape(marker_shape(marker.symbol))
                            .radius((marker.size / 2.0) as f32)
                            .filled(true)
                            .color(color)
                            .name(&trace.name),
                    );
                }
                TraceMode::Lines | TraceMode::LinesText => {
                    let Some(line) = view_state.line(spec, trace) else {
                        continue;
                    };
                    let color = css_color(&line.color).gamma_multiply(trace.opacity as f32);
                    let series: PlotPoints = points.iter().map(|(_, p)| *p).collect();
                    let mut plot_line = Line::new(series).color(color).width(line.width as f32);
                    if trace.show_legend {
                        plot_line = plot_line.name(&trace.name);
                    }
                    plot_ui.line(plot_line);

                    // end-of-line labels
                    for (i, [x, y]) in &points {
                        match trace.text.get(*i) {
                            Some(label) if !label.is_empty() => plot_ui.text(
                                Text::new(PlotPoint::new(*x, *y), RichText::new(label).color(color))
                                    .anchor(Align2::LEFT_CENTER),
                            ),
                            _ => {}
                        }
                    }
                }
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Plot row of each category, first tick on top.
fn category_rows(ticks: &[TickLabel]) -> HashMap<String, f64> {
    ticks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.value.clone(), -(i as f64)))
        .collect()
}

/// Plottable points with their source position; gaps and unknown
/// categories are skipped.
fn project(data: &TraceData, rows: &HashMap<String, f64>) -> Vec<(usize, [f64; 2])> {
    data.x
        .iter()
        .enumerate()
        .filter_map(|(i, x)| {
            let x = (*x)?;
            let y = match &data.y {
                Coords::Numbers(values) => (*values.get(i)?)?,
                Coords::Categories(values) => *rows.get(values.get(i)?)?,
            };
            Some((i, [x, y]))
        })
        .collect()
}

fn tick_text(tick: &TickLabel) -> String {
    match tick.highlight {
        Some(_) => format!("▶ {}", tick.text),
        None => tick.text.clone(),
    }
}

fn category_label(labels: &[String], value: f64) -> String {
    let row = (-value).round();
    if (value + row).abs() > 1e-6 || row < 0.0 {
        return String::new();
    }
    labels.get(row as usize).cloned().unwrap_or_default()
}

fn format_tick(format: TickFormat, value: f64) -> String {
    match format {
        TickFormat::Percent => format!("{:.0}%", value * 100.0),
        TickFormat::PercentSuffix => format!("{value:.0}%"),
    }
}

fn marker_shape(symbol: MarkerSymbol) -> MarkerShape {
    match symbol {
        MarkerSymbol::Circle => MarkerShape::Circle,
        MarkerSymbol::Diamond => MarkerShape::Diamond,
        MarkerSymbol::Square => MarkerShape::Square,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(value: &str) -> TickLabel {
        TickLabel {
            value: value.to_string(),
            text: value.to_string(),
            highlight: None,
        }
    }

    #[test]
    fn categories_project_top_to_bottom() {
        let rows = category_rows(&[tick("Spain"), tick("France")]);
        let data = TraceData {
            x: vec![Some(0.30), Some(0.45), Some(0.5)],
            y: Coords::Categories(vec!["France".into(), "Spain".into(), "Italy".into()]),
        };
        assert_eq!(project(&data, &rows), vec![(0, [0.30, -1.0]), (1, [0.45, 0.0])]);
    }

    #[test]
    fn numeric_gaps_are_skipped() {
        let data = TraceData {
            x: vec![Some(50.0), Some(100.0), None],
            y: Coords::Numbers(vec![None, Some(30.0), Some(31.0)]),
        };
        assert_eq!(project(&data, &HashMap::new()), vec![(1, [100.0, 30.0])]);
    }

    #[test]
    fn category_labels_only_on_rows() {
        let labels = vec!["Spain".to_string(), "France".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Spain");
        assert_eq!(category_label(&labels, -1.0), "France");
        assert_eq!(category_label(&labels, -0.5), "");
        assert_eq!(category_label(&labels, 1.0), "");
        assert_eq!(category_label(&labels, -7.0), "");
    }

    #[test]
    fn tick_formats() {
        assert_eq!(format_tick(TickFormat::Percent, 0.25), "25%");
        assert_eq!(format_tick(TickFormat::PercentSuffix, 150.0), "150%");
    }
}
