use approx::assert_relative_eq;
use serde_json::{json, Value};
use tax_wedge::chart::logo::Logo;
use tax_wedge::chart::model::{ChartSpec, TraceRole};
use tax_wedge::config::{IncomeChartConfig, TaxpayerChartConfig};
use tax_wedge::data::model::{Scenario, Table};
use tax_wedge::export::html::{figure_json, render_document, write_document, PLOTLY_CDN};
use tax_wedge::views::{income, taxpayer};

fn spec() -> ChartSpec {
    let config = TaxpayerChartConfig::default();
    let table = Table::new(
        "test",
        vec!["France".to_string(), "United Kingdom".to_string(), "Spain".to_string()],
        config.measures.iter().map(|m| m.key.clone()).collect(),
        vec![
            vec![Some(0.30), Some(0.35), Some(0.40)],
            vec![Some(0.31), Some(0.25), Some(0.27)],
            vec![Some(0.28), Some(0.30), Some(0.45)],
        ],
    )
    .expect("table");
    taxpayer::build_chart(&table, &config).expect("chart")
}

fn income_spec() -> ChartSpec {
    let scenario = |name: &str| Scenario {
        name: name.to_string(),
        table: Table::new(
            name,
            vec![50.0, 100.0],
            vec!["France".to_string(), "Austria".to_string()],
            vec![vec![Some(20.0), Some(25.0)], vec![Some(30.0), Some(35.0)]],
        )
        .expect("table"),
    };
    let config = IncomeChartConfig::default();
    let mut spec = income::build_chart(&[scenario("single"), scenario("couple")], &config)
        .expect("chart");
    spec.logo = Some(Logo {
        path: config.logo.path.clone(),
        data_uri: "data:image/png;base64,iVBORw0K".to_string(),
        placement: config.logo.placement,
    });
    spec
}

fn menus(figure: &Value) -> &Vec<Value> {
    figure["layout"]["updatemenus"].as_array().expect("updatemenus")
}

#[test]
fn dropdown_has_one_button_per_view() {
    let spec = spec();
    let figure = figure_json(&spec);

    let buttons = menus(&figure)[0]["buttons"].as_array().expect("buttons");
    assert_eq!(buttons.len(), spec.views.len());
    let labels: Vec<&str> = buttons.iter().filter_map(|b| b["label"].as_str()).collect();
    assert_eq!(
        labels,
        ["Single Worker", "Family Single Earner", "Family Two Earners"]
    );
    for button in buttons {
        assert_eq!(button["method"], "update");
        let restyle = &button["args"][0];
        for key in ["x", "y", "visible"] {
            assert_eq!(
                restyle[key].as_array().map(Vec::len),
                Some(spec.traces.len()),
                "{key}"
            );
        }
    }
}

#[test]
fn toggle_targets_exactly_the_connector_indices() {
    let spec = spec();
    let figure = figure_json(&spec);

    let toggle = &menus(&figure)[1]["buttons"][0];
    let connectors = spec.positions_of(TraceRole::Connector);
    assert_eq!(toggle["method"], "restyle");
    assert_eq!(toggle["args"][1], json!(connectors));
    assert_eq!(toggle["args2"][1], json!(connectors));
    assert_eq!(toggle["args"][0]["visible"], json!([false, false, false]));
    assert_eq!(toggle["args2"][0]["visible"], json!([true, true, true]));
}

#[test]
fn sort_button_installs_ticks_with_highlight_markup() {
    let spec = spec();
    let figure = figure_json(&spec);

    let relayout = &menus(&figure)[0]["buttons"][2]["args"][1];
    assert_eq!(
        relayout["yaxis.categoryarray"],
        json!(["Spain", "France", "United Kingdom"])
    );
    assert_eq!(
        relayout["yaxis.ticktext"][2],
        "<b><span style='color:red;'>United Kingdom</span></b>"
    );
    assert_eq!(relayout["yaxis.autorange"], "reversed");
}

#[test]
fn document_loads_plotly_and_escapes_closing_tags() {
    let html = render_document(&spec()).expect("render");

    assert!(html.contains(PLOTLY_CDN));
    assert!(html.contains("Plotly.newPlot"));
    assert!(!html.contains("</span>"));
    assert!(html.contains("<\\/span>"));
}

#[test]
fn document_is_written_to_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.html");

    write_document(&spec(), &path).expect("write");

    let html = std::fs::read_to_string(&path).expect("read back");
    assert!(html.starts_with("<!DOCTYPE html>"));
}

#[test]
fn income_dropdown_swaps_visibility_masks_only() {
    let figure = figure_json(&income_spec());

    let buttons = menus(&figure)[0]["buttons"].as_array().expect("buttons");
    assert_eq!(buttons.len(), 2);
    assert_eq!(
        buttons[0]["args"][0],
        json!({ "visible": [true, "legendonly", false, false] })
    );
    assert_eq!(
        buttons[1]["args"][0],
        json!({ "visible": [false, false, true, "legendonly"] })
    );
    for button in buttons {
        assert_eq!(button["args"][1], json!({}));
    }
    assert_eq!(menus(&figure).len(), 1);
}

#[test]
fn income_traces_are_labelled_splines() {
    let figure = figure_json(&income_spec());

    let austria = &figure["data"][1];
    assert_eq!(austria["name"], "Austria");
    assert_eq!(austria["mode"], "lines+text");
    assert_eq!(austria["line"]["shape"], "spline");
    assert_eq!(austria["text"], json!(["", "Austria"]));
    assert_eq!(austria["visible"], "legendonly");
    assert_eq!(figure["data"][2]["visible"], false);
}

#[test]
fn income_layout_pads_the_x_range_and_carries_the_logo() {
    let figure = figure_json(&income_spec());
    let layout = &figure["layout"];

    let range = layout["xaxis"]["range"].as_array().expect("range");
    assert_relative_eq!(range[0].as_f64().expect("lo"), 50.0);
    assert_relative_eq!(range[1].as_f64().expect("hi"), 110.0, epsilon = 1e-9);
    assert_eq!(layout["xaxis"]["ticksuffix"], "%");

    let image = &layout["images"][0];
    assert_eq!(image["source"], "data:image/png;base64,iVBORw0K");
    assert_eq!(image["xanchor"], "right");
}

#[test]
fn only_the_taxpayer_title_is_bold() {
    let taxpayer = figure_json(&spec());
    let income = figure_json(&income_spec());

    let bold = taxpayer["layout"]["title"]["text"].as_str().expect("title");
    assert!(bold.starts_with("<b>") && bold.ends_with("</b>"));
    assert_eq!(
        income["layout"]["title"]["text"],
        IncomeChartConfig::default().title
    );
}
