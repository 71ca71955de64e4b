//! Dot-and-connector chart: one row per country, one point series per
//! taxpayer type, a sort-order dropdown and a connector toggle.

use indexmap::IndexMap;

use super::title_case;
use crate::chart::model::{
    Annotation, Axis, ChartSpec, ConnectorToggle, Coords, HoverMode, Layout, LineStyle,
    MarkerStyle, TickFormat, TickLabel, Trace, TraceData, TraceId, TraceMode, TraceRole,
    TraceUpdate, View, Visibility,
};
use crate::config::{MeasureConfig, TaxpayerChartConfig};
use crate::data::model::CountryTable;
use crate::error::{ChartError, ChartResult};

pub const TOGGLE_LABEL: &str = "Toggle Connectors";

/// Build the chart with one view per configured measure, each sorting the
/// countries by that measure, highest first.
///
/// `table` columns must include every measure key.
pub fn build_chart(table: &CountryTable, config: &TaxpayerChartConfig) -> ChartResult<ChartSpec> {
    if table.is_empty() {
        return Err(ChartError::EmptyTable);
    }
    if config.measures.is_empty() {
        return Err(ChartError::NoViews);
    }
    let columns = config
        .measures
        .iter()
        .map(|m| {
            table
                .column_position(&m.key)
                .ok_or_else(|| ChartError::UnknownColumn(m.key.clone()))
        })
        .collect::<ChartResult<Vec<usize>>>()?;

    let views: Vec<View> = config
        .measures
        .iter()
        .zip(&columns)
        .map(|(measure, &sort_column)| sort_view(table, config, &columns, measure, sort_column))
        .collect();

    let initial = &views[0];
    let mut traces = Vec::with_capacity(table.len() + config.measures.len());
    let mut connectors = Vec::with_capacity(table.len());
    for tick in initial.ticks.iter().flatten() {
        let id = TraceId::connector(&tick.value);
        let update = initial.update(&id).cloned().unwrap_or_default();
        traces.push(connector_trace(&tick.value, id.clone(), update));
        connectors.push(id);
    }
    for measure in &config.measures {
        let id = TraceId::points(&measure.key);
        let update = initial.update(&id).cloned().unwrap_or_default();
        traces.push(points_trace(measure, config, id, update));
    }

    let spec = ChartSpec {
        layout: Layout {
            title: config.title.clone(),
            bold_title: true,
            height: Some(20 * table.len() as u32 + 200),
            x_axis: Axis {
                title: Some(config.x_axis_title.clone()),
                tick_format: Some(TickFormat::Percent),
                tick_step: Some(0.05),
                ..Axis::default()
            },
            y_axis: Axis {
                reversed: true,
                ..Axis::default()
            },
            annotations: vec![Annotation {
                text: config.source_note.clone(),
                x: 1.0,
                y: -0.05,
            }],
            hover_mode: HoverMode::YUnified,
        },
        view_selector: "Sort by".to_string(),
        traces,
        views,
        initial_view: 0,
        toggle: Some(ConnectorToggle {
            label: TOGGLE_LABEL.to_string(),
            targets: connectors,
        }),
        logo: None,
    };
    spec.validate()?;
    Ok(spec)
}

/// Precompute everything the chart shows when sorted by `sort_column`.
fn sort_view(
    table: &CountryTable,
    config: &TaxpayerChartConfig,
    columns: &[usize],
    measure: &MeasureConfig,
    sort_column: usize,
) -> View {
    let order = table.order_descending_by(sort_column);
    let countries: Vec<String> = order.iter().map(|&row| table.index[row].clone()).collect();

    let mut updates = IndexMap::with_capacity(order.len() + columns.len());
    for (&row, country) in order.iter().zip(&countries) {
        let data = TraceData {
            x: columns.iter().map(|&col| table.value(row, col)).collect(),
            y: Coords::Categories(vec![country.clone(); columns.len()]),
        };
        updates.insert(
            TraceId::connector(country),
            TraceUpdate {
                data: Some(data),
                line: Some(connector_line(config, country)),
                visibility: Some(Visibility::Shown),
            },
        );
    }
    for (m, &col) in config.measures.iter().zip(columns) {
        let data = TraceData {
            x: order.iter().map(|&row| table.value(row, col)).collect(),
            y: Coords::Categories(countries.clone()),
        };
        updates.insert(
            TraceId::points(&m.key),
            TraceUpdate {
                data: Some(data),
                line: None,
                visibility: Some(Visibility::Shown),
            },
        );
    }

    let ticks = countries
        .iter()
        .map(|country| TickLabel {
            value: country.clone(),
            text: country.clone(),
            highlight: (*country == config.highlight_country)
                .then(|| config.highlight_color.clone()),
        })
        .collect();

    View {
        key: measure.key.clone(),
        label: title_case(&measure.key),
        updates,
        ticks: Some(ticks),
    }
}

fn connector_line(config: &TaxpayerChartConfig, country: &str) -> LineStyle {
    if country == config.highlight_country {
        LineStyle {
            color: config.highlight_color.clone(),
            width: config.highlight_width,
            spline: false,
        }
    } else {
        LineStyle {
            color: config.connector_color.clone(),
            width: config.connector_width,
            spline: false,
        }
    }
}

fn connector_trace(country: &str, id: TraceId, update: TraceUpdate) -> Trace {
    Trace {
        id,
        name: country.to_string(),
        role: TraceRole::Connector,
        mode: TraceMode::Lines,
        data: update.data.unwrap_or(TraceData {
            x: Vec::new(),
            y: Coords::Categories(Vec::new()),
        }),
        line: update.line,
        marker: None,
        text: Vec::new(),
        legend_group: None,
        show_legend: false,
        hover_template: None,
        opacity: 1.0,
        visibility: update.visibility.unwrap_or(Visibility::Shown),
    }
}

fn points_trace(
    measure: &MeasureConfig,
    config: &TaxpayerChartConfig,
    id: TraceId,
    update: TraceUpdate,
) -> Trace {
    Trace {
        id,
        name: measure.legend_name.clone(),
        role: TraceRole::Points,
        mode: TraceMode::Markers,
        data: update.data.unwrap_or(TraceData {
            x: Vec::new(),
            y: Coords::Categories(Vec::new()),
        }),
        line: None,
        marker: Some(MarkerStyle {
            symbol: measure.symbol,
            size: config.marker_size,
            color: measure.color.clone(),
            outline_color: "DarkSlateGrey".to_string(),
            outline_width: 0.5,
        }),
        text: Vec::new(),
        legend_group: None,
        show_legend: true,
        hover_template: Some("%{x:.1%}".to_string()),
        opacity: 1.0,
        visibility: update.visibility.unwrap_or(Visibility::Shown),
    }
}
