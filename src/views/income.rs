//! Multi-series line chart: tax wedge against income level, one line per
//! country and household scenario, with a scenario dropdown.

use indexmap::IndexMap;

use super::title_case;
use crate::chart::model::{
    Axis, ChartSpec, Coords, HoverMode, Layout, LineStyle, TickFormat, Trace, TraceData, TraceId,
    TraceMode, TraceRole, TraceUpdate, View, Visibility,
};
use crate::color::SeriesPalette;
use crate::config::IncomeChartConfig;
use crate::data::model::{income_bounds, Scenario};
use crate::error::{ChartError, ChartResult};

/// Visibility of `country` in `scenario` while `selected` is the active scenario.
pub fn scenario_visibility(
    selected: &str,
    scenario: &str,
    country: &str,
    highlight: &[String],
) -> Visibility {
    if scenario != selected {
        Visibility::Hidden
    } else if highlight.iter().any(|h| h == country) {
        Visibility::Shown
    } else {
        Visibility::LegendOnly
    }
}

/// Build the chart with one view per scenario, starting on the default one.
pub fn build_chart(scenarios: &[Scenario], config: &IncomeChartConfig) -> ChartResult<ChartSpec> {
    if scenarios.is_empty() {
        return Err(ChartError::NoViews);
    }
    let default_name = config
        .default_scenario
        .clone()
        .unwrap_or_else(|| scenarios[0].name.clone());
    let initial_view = scenarios
        .iter()
        .position(|s| s.name == default_name)
        .ok_or_else(|| ChartError::UnknownScenario(default_name.clone()))?;
    let (min_x, max_x) = income_bounds(scenarios).ok_or(ChartError::EmptyTable)?;

    let widest = scenarios
        .iter()
        .map(|s| s.table.columns.len())
        .max()
        .unwrap_or(0);
    let palette = SeriesPalette::new(&config.palette, widest);

    let mut traces = Vec::new();
    for scenario in scenarios {
        let table = &scenario.table;
        let x: Vec<Option<f64>> = table.index.iter().map(|&v| Some(v)).collect();
        for (position, country) in table.columns.iter().enumerate() {
            let color = if *country == config.red_country {
                config.red_color.clone()
            } else {
                palette.color_for(position).to_string()
            };
            traces.push(Trace {
                id: TraceId::series(&scenario.name, country),
                name: country.clone(),
                role: TraceRole::Series,
                mode: TraceMode::LinesText,
                data: TraceData {
                    x: x.clone(),
                    y: Coords::Numbers(table.column(position)),
                },
                line: Some(LineStyle {
                    color,
                    width: config.line_width,
                    spline: true,
                }),
                marker: None,
                text: end_label(country, table.len()),
                legend_group: Some(country.clone()),
                show_legend: true,
                hover_template: Some(format!("{country} %{{y:.1f}}%<extra></extra>")),
                opacity: config.opacity,
                visibility: scenario_visibility(
                    &default_name,
                    &scenario.name,
                    country,
                    &config.highlight,
                ),
            });
        }
    }

    let views = scenarios
        .iter()
        .map(|selected| {
            let updates: IndexMap<TraceId, TraceUpdate> = scenarios
                .iter()
                .flat_map(|s| s.table.columns.iter().map(move |c| (s, c)))
                .map(|(s, country)| {
                    let visibility =
                        scenario_visibility(&selected.name, &s.name, country, &config.highlight);
                    (
                        TraceId::series(&s.name, country),
                        TraceUpdate {
                            visibility: Some(visibility),
                            ..TraceUpdate::default()
                        },
                    )
                })
                .collect();
            View {
                key: selected.name.clone(),
                label: title_case(&selected.name),
                updates,
                ticks: None,
            }
        })
        .collect();

    let spec = ChartSpec {
        layout: Layout {
            title: config.title.clone(),
            bold_title: false,
            height: None,
            x_axis: Axis {
                title: Some(config.x_axis_title.clone()),
                range: Some((min_x, max_x * (1.0 + config.x_padding))),
                tick_format: Some(TickFormat::PercentSuffix),
                ..Axis::default()
            },
            y_axis: Axis {
                title: Some(config.y_axis_title.clone()),
                tick_format: Some(TickFormat::PercentSuffix),
                ..Axis::default()
            },
            annotations: Vec::new(),
            hover_mode: HoverMode::XUnified,
        },
        view_selector: "Household".to_string(),
        traces,
        views,
        initial_view,
        toggle: None,
        logo: None,
    };
    spec.validate()?;
    Ok(spec)
}

/// Text for each point: only the last one carries the country name.
fn end_label(country: &str, points: usize) -> Vec<String> {
    let mut text = vec![String::new(); points];
    if let Some(last) = text.last_mut() {
        *last = country.to_string();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Table;

    fn scenario(name: &str, countries: &[&str]) -> Scenario {
        Scenario {
            name: name.to_string(),
            table: Table::new(
                name,
                vec![50.0, 100.0, 150.0],
                countries.iter().map(|c| c.to_string()).collect(),
                vec![vec![Some(20.0); countries.len()]; 3],
            )
            .unwrap(),
        }
    }

    #[test]
    fn end_label_marks_only_the_last_point() {
        assert_eq!(end_label("France", 3), ["", "", "France"]);
        assert!(end_label("France", 0).is_empty());
    }

    #[test]
    fn x_range_is_padded_on_the_right() {
        let spec = build_chart(
            &[scenario("a", &["France"]), scenario("b", &["France"])],
            &IncomeChartConfig::default(),
        )
        .unwrap();
        let (lo, hi) = spec.layout.x_axis.range.unwrap();
        assert_eq!(lo, 50.0);
        assert!((hi - 165.0).abs() < 1e-9);
    }

    #[test]
    fn red_country_overrides_palette() {
        let spec = build_chart(
            &[scenario("a", &["France", "United Kingdom"])],
            &IncomeChartConfig::default(),
        )
        .unwrap();
        assert_eq!(spec.traces[0].line.as_ref().unwrap().color, "black");
        assert_eq!(spec.traces[1].line.as_ref().unwrap().color, "red");
    }

    #[test]
    fn unknown_default_scenario_is_rejected() {
        let config = IncomeChartConfig {
            default_scenario: Some("nope".into()),
            ..IncomeChartConfig::default()
        };
        let err = build_chart(&[scenario("a", &["France"])], &config).unwrap_err();
        assert!(matches!(err, ChartError::UnknownScenario(name) if name == "nope"));
    }

    #[test]
    fn configured_default_scenario_is_initial_view() {
        let config = IncomeChartConfig {
            default_scenario: Some("b".into()),
            ..IncomeChartConfig::default()
        };
        let spec = build_chart(
            &[scenario("a", &["France"]), scenario("b", &["France"])],
            &config,
        )
        .unwrap();
        assert_eq!(spec.initial_view, 1);
        assert_eq!(spec.traces[0].visibility, Visibility::Hidden);
        assert_eq!(spec.traces[1].visibility, Visibility::Shown);
    }
}
