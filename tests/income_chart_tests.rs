use tax_wedge::chart::model::{Coords, TraceId, TraceMode, Visibility};
use tax_wedge::config::IncomeChartConfig;
use tax_wedge::data::model::{Scenario, Table};
use tax_wedge::views::income::{build_chart, scenario_visibility};

fn scenario(name: &str, countries: &[&str]) -> Scenario {
    let levels = vec![50.0, 100.0, 150.0, 200.0];
    let cells = levels
        .iter()
        .map(|level| countries.iter().map(|_| Some(level / 5.0)).collect())
        .collect();
    Scenario {
        name: name.to_string(),
        table: Table::new(
            name,
            levels,
            countries.iter().map(|c| c.to_string()).collect(),
            cells,
        )
        .expect("table"),
    }
}

fn scenarios() -> Vec<Scenario> {
    vec![
        scenario("single_no_children", &["France", "Austria", "United Kingdom"]),
        scenario("married_2_children", &["France", "Austria", "United Kingdom"]),
        scenario("married_no_children", &["Austria", "France"]),
    ]
}

#[test]
fn one_trace_per_country_and_scenario_in_column_order() {
    let spec = build_chart(&scenarios(), &IncomeChartConfig::default()).expect("chart");

    assert_eq!(spec.traces.len(), 8);
    assert_eq!(
        spec.traces[0].id,
        TraceId::series("single_no_children", "France")
    );
    assert_eq!(
        spec.traces[6].id,
        TraceId::series("married_no_children", "Austria")
    );
    assert!(spec.traces.iter().all(|t| t.mode == TraceMode::LinesText));
    assert_eq!(
        spec.traces[0].data.y,
        Coords::Numbers(vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)])
    );
}

#[test]
fn visibility_masks_cover_every_series() {
    let scenarios = scenarios();
    let config = IncomeChartConfig::default();
    let spec = build_chart(&scenarios, &config).expect("chart");

    assert_eq!(spec.views.len(), 3);
    for (view, selected) in spec.views.iter().zip(&scenarios) {
        assert_eq!(view.updates.len(), spec.traces.len());
        for s in &scenarios {
            for country in &s.table.columns {
                let visibility = view
                    .update(&TraceId::series(&s.name, country))
                    .and_then(|u| u.visibility)
                    .expect("visibility");
                let expected = if s.name != selected.name {
                    Visibility::Hidden
                } else if config.highlight.contains(country) {
                    Visibility::Shown
                } else {
                    Visibility::LegendOnly
                };
                assert_eq!(visibility, expected, "{} / {country}", s.name);
            }
        }
    }
}

#[test]
fn default_scenario_masks_serialize_as_plotly_values() {
    let spec = build_chart(&scenarios(), &IncomeChartConfig::default()).expect("chart");

    let mask: Vec<serde_json::Value> = spec
        .traces
        .iter()
        .map(|t| serde_json::to_value(t.visibility).expect("serialize"))
        .collect();
    assert_eq!(
        mask,
        vec![
            serde_json::json!(true),
            serde_json::json!("legendonly"),
            serde_json::json!(true),
            serde_json::json!(false),
            serde_json::json!(false),
            serde_json::json!(false),
            serde_json::json!(false),
            serde_json::json!(false),
        ]
    );
}

#[test]
fn views_only_change_visibility() {
    let spec = build_chart(&scenarios(), &IncomeChartConfig::default()).expect("chart");

    for view in &spec.views {
        assert!(view.ticks.is_none());
        assert!(view
            .updates
            .values()
            .all(|u| u.fields() == (false, false, true)));
    }
    assert_eq!(spec.views[1].label, "Married 2 Children");
    assert!(spec.toggle.is_none());
}

#[test]
fn only_the_last_point_is_labelled() {
    let spec = build_chart(&scenarios(), &IncomeChartConfig::default()).expect("chart");

    let text = &spec.traces[1].text;
    assert_eq!(text.len(), 4);
    assert_eq!(text[3], "Austria");
    assert!(text[..3].iter().all(String::is_empty));
}

#[test]
fn non_selected_scenarios_are_hidden_whatever_the_highlight() {
    let highlight = vec!["France".to_string()];
    assert_eq!(
        scenario_visibility("a", "b", "France", &highlight),
        Visibility::Hidden
    );
    assert_eq!(
        scenario_visibility("a", "a", "France", &highlight),
        Visibility::Shown
    );
    assert_eq!(
        scenario_visibility("a", "a", "Chile", &highlight),
        Visibility::LegendOnly
    );
}
