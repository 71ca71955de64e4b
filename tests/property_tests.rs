use proptest::prelude::*;
use tax_wedge::config::TaxpayerChartConfig;
use tax_wedge::data::model::{CountryTable, Table};
use tax_wedge::views::taxpayer;

fn country_table(values: &[[f64; 3]]) -> CountryTable {
    let config = TaxpayerChartConfig::default();
    Table::new(
        "prop",
        (0..values.len()).map(|i| format!("Country {i}")).collect(),
        config.measures.iter().map(|m| m.key.clone()).collect(),
        values
            .iter()
            .map(|row| row.iter().map(|v| Some(*v)).collect())
            .collect(),
    )
    .expect("table")
}

proptest! {
    #[test]
    fn sorted_views_are_non_increasing(
        values in prop::collection::vec(prop::array::uniform3(0.0f64..0.6), 1..40)
    ) {
        let table = country_table(&values);
        let spec = taxpayer::build_chart(&table, &TaxpayerChartConfig::default())
            .expect("chart");

        for (column, view) in spec.views.iter().enumerate() {
            let ticks = view.ticks.as_ref().expect("ticks");
            prop_assert_eq!(ticks.len(), values.len());
            let keys: Vec<f64> = ticks
                .iter()
                .map(|t| {
                    let row = table.index.iter().position(|c| *c == t.value).expect("row");
                    values[row][column]
                })
                .collect();
            prop_assert!(keys.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn sort_is_stable_on_ties(n in 1usize..30, value in 0.0f64..0.6) {
        let table = country_table(&vec![[value; 3]; n]);
        prop_assert_eq!(table.order_descending_by(2), (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn interpolation_leaves_complete_tables_alone(
        rows in prop::collection::vec(prop::collection::vec(-100.0f64..100.0, 3), 1..20)
    ) {
        let table = Table::new(
            "prop",
            (0..rows.len()).map(|i| i as f64 * 10.0).collect(),
            vec!["a".into(), "b".into(), "c".into()],
            rows.iter().map(|r| r.iter().map(|v| Some(*v)).collect()).collect(),
        )
        .expect("table");

        prop_assert_eq!(table.clone().interpolate_linear(), table);
    }

    #[test]
    fn interpolation_is_idempotent(
        column in prop::collection::vec(prop::option::of(-100.0f64..100.0), 1..30)
    ) {
        let table = Table::new(
            "prop",
            (0..column.len()).map(|i| i as f64).collect(),
            vec!["only".into()],
            column.iter().map(|v| vec![*v]).collect(),
        )
        .expect("table");

        let once = table.interpolate_linear();
        // only leading gaps may remain
        let first_valid = column.iter().position(Option::is_some).unwrap_or(column.len());
        for row in 0..column.len() {
            prop_assert_eq!(once.value(row, 0).is_some(), row >= first_valid);
        }
        prop_assert_eq!(once.clone().interpolate_linear(), once);
    }
}
