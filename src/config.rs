use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};

use crate::chart::logo::{LogoPlacement, LogoPolicy};
use crate::chart::model::MarkerSymbol;

/// Optional overrides, read from the working directory.
pub const CONFIG_FILE: &str = "tax-wedge.json";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Settings for both pipelines. Every field has a built-in default, so a
/// config file only needs the values it changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub taxpayer: TaxpayerChartConfig,
    pub income: IncomeChartConfig,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading settings {}", path_ref.display()))?;
        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("parsing settings {}", path_ref.display()))?;
        Ok(settings)
    }

    /// Load `path` if it exists, otherwise use the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        if path_ref.exists() {
            log::info!("Using settings from {}", path_ref.display());
            Self::load(path_ref)
        } else {
            log::debug!("No {} found, using built-in settings", path_ref.display());
            Ok(Self::default())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogoConfig {
    pub path: PathBuf,
    pub policy: LogoPolicy,
    pub placement: LogoPlacement,
}

/// Logo fields a config file sets; the others keep the owning chart's defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LogoOverride {
    path: Option<PathBuf>,
    policy: Option<LogoPolicy>,
    placement: Option<LogoPlacement>,
}

impl LogoOverride {
    fn apply(self, base: LogoConfig) -> LogoConfig {
        LogoConfig {
            path: self.path.unwrap_or(base.path),
            policy: self.policy.unwrap_or(base.policy),
            placement: self.placement.unwrap_or(base.placement),
        }
    }
}

fn taxpayer_logo() -> LogoConfig {
    LogoConfig {
        path: PathBuf::from("logo_full_white_on_blue.jpg"),
        policy: LogoPolicy::Optional,
        placement: LogoPlacement {
            x: 0.85,
            y: 0.05,
            size: 0.1,
            right_anchored: false,
        },
    }
}

fn income_logo() -> LogoConfig {
    LogoConfig {
        path: PathBuf::from("logo_full_white_on_blue.jpg"),
        policy: LogoPolicy::Required,
        placement: LogoPlacement {
            x: 1.1,
            y: 1.02,
            size: 0.1,
            right_anchored: true,
        },
    }
}

fn taxpayer_logo_override<'de, D: Deserializer<'de>>(d: D) -> Result<LogoConfig, D::Error> {
    Ok(LogoOverride::deserialize(d)?.apply(taxpayer_logo()))
}

fn income_logo_override<'de, D: Deserializer<'de>>(d: D) -> Result<LogoConfig, D::Error> {
    Ok(LogoOverride::deserialize(d)?.apply(income_logo()))
}

// ---------------------------------------------------------------------------
// Dot-and-connector chart (tax wedge by taxpayer type)
// ---------------------------------------------------------------------------

/// One point series: a measure column and how its markers look.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    /// Column name assigned positionally after the country column.
    pub key: String,
    pub legend_name: String,
    pub color: String,
    pub symbol: MarkerSymbol,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxpayerChartConfig {
    pub workbook: PathBuf,
    pub sheet: String,
    /// Spreadsheet columns, country column first.
    pub columns: String,
    pub header_row: u32,
    pub measures: Vec<MeasureConfig>,
    pub highlight_country: String,
    pub highlight_color: String,
    pub highlight_width: f64,
    pub connector_color: String,
    pub connector_width: f64,
    pub marker_size: f64,
    pub title: String,
    pub x_axis_title: String,
    pub source_note: String,
    #[serde(deserialize_with = "taxpayer_logo_override")]
    pub logo: LogoConfig,
    /// Write an HTML document here when set.
    pub output: Option<PathBuf>,
}

impl Default for TaxpayerChartConfig {
    fn default() -> Self {
        let measure = |key: &str, legend_name: &str, color: &str, symbol| MeasureConfig {
            key: key.to_string(),
            legend_name: legend_name.to_string(),
            color: color.to_string(),
            symbol,
        };
        Self {
            workbook: PathBuf::from("data/OECD personal tax comparisons 2025.xlsx"),
            sheet: "Tax wedges 2024".to_string(),
            columns: "A:D".to_string(),
            header_row: 0,
            measures: vec![
                measure(
                    "single_worker",
                    "Single worker",
                    "rgba(100, 149, 237, 0.9)",
                    MarkerSymbol::Circle,
                ),
                measure(
                    "family_single_earner",
                    "Single-earner family",
                    "rgba(255, 165, 0, 0.9)",
                    MarkerSymbol::Diamond,
                ),
                measure(
                    "family_two_earners",
                    "Two-earner family",
                    "rgba(255, 99, 71, 0.9)",
                    MarkerSymbol::Square,
                ),
            ],
            highlight_country: "United Kingdom".to_string(),
            highlight_color: "red".to_string(),
            highlight_width: 3.0,
            connector_color: "gray".to_string(),
            connector_width: 1.5,
            marker_size: 10.0,
            title: "% of wages paid in tax for the average worker across the OECD".to_string(),
            x_axis_title:
                "Tax wedge - all employment taxes as % of labour cost - see article for details"
                    .to_string(),
            source_note: "Source: OECD Taxing Wages report, 2025".to_string(),
            logo: taxpayer_logo(),
            output: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Multi-series line chart (tax wedge by income level)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeChartConfig {
    pub workbook: PathBuf,
    /// One household scenario per sheet, in dropdown order.
    pub sheets: Vec<String>,
    pub header_row: u32,
    /// Spreadsheet columns, income-level column first.
    pub columns: String,
    /// Text after the number in the income-level column.
    pub index_suffix: String,
    /// Scenario shown first; the first sheet when unset.
    pub default_scenario: Option<String>,
    /// Countries drawn when a scenario is selected; others are legend-only.
    pub highlight: Vec<String>,
    pub red_country: String,
    pub red_color: String,
    /// Line colours by column position.
    pub palette: Vec<String>,
    /// Extra room on the right of the x axis for end-of-line labels.
    pub x_padding: f64,
    pub line_width: f64,
    pub opacity: f64,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    #[serde(deserialize_with = "income_logo_override")]
    pub logo: LogoConfig,
    pub output: Option<PathBuf>,
}

impl Default for IncomeChartConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            workbook: PathBuf::from("data/OECD tax wedges all countries all incomes 2024.xlsx"),
            sheets: strings(&[
                "single_no_children",
                "single_two_children",
                "married_2_children",
                "married_no_children",
            ]),
            header_row: 8,
            columns: "B:AO".to_string(),
            index_suffix: "% of average wage".to_string(),
            default_scenario: None,
            highlight: strings(&[
                "United Kingdom",
                "United States",
                "France",
                "Germany",
                "Italy",
                "Spain",
                "Canada",
                "Sweden",
                "Belgium",
                "Netherlands",
                "Poland",
                "Türkiye",
            ]),
            red_country: "United Kingdom".to_string(),
            red_color: "red".to_string(),
            palette: strings(&[
                "black", "blue", "blueviolet", "brown", "cadetblue", "chocolate", "coral",
                "crimson", "cyan", "darkblue", "darkcyan", "darkgoldenrod", "darkgreen",
                "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred",
                "darksalmon", "darkslateblue", "darkslategray", "darkturquoise", "darkviolet",
                "deeppink", "deepskyblue", "dodgerblue", "firebrick", "forestgreen", "fuchsia",
                "green", "hotpink", "indianred", "indigo", "maroon", "mediumblue",
                "mediumorchid", "mediumseagreen", "mediumslateblue", "orangered", "purple",
            ]),
            x_padding: 0.1,
            line_width: 2.0,
            opacity: 0.8,
            title: "OECD tax wedge by income level for each country (2024)".to_string(),
            x_axis_title: "Income level (% of average wage)".to_string(),
            y_axis_title: "Tax wedge (%)".to_string(),
            logo: income_logo(),
            output: Some(PathBuf::from("oecd_tax_wedge_incomes_and_countries.html")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_describe_both_workbooks() {
        let settings = Settings::default();
        assert_eq!(settings.taxpayer.columns, "A:D");
        assert_eq!(settings.taxpayer.measures.len(), 3);
        assert_eq!(settings.income.sheets.len(), 4);
        assert_eq!(settings.income.palette.len(), 40);
        assert_eq!(settings.income.logo.policy, LogoPolicy::Required);
        assert_eq!(settings.taxpayer.logo.policy, LogoPolicy::Optional);
    }

    #[test]
    fn load_overrides_only_given_fields() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            br#"{"income": {"workbook": "other.xlsx", "default_scenario": "married_2_children"}}"#,
        )
        .unwrap();
        let path = temp.into_temp_path();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.income.workbook, PathBuf::from("other.xlsx"));
        assert_eq!(
            settings.income.default_scenario.as_deref(),
            Some("married_2_children")
        );
        assert_eq!(settings.income.header_row, 8);
        assert_eq!(settings.taxpayer, TaxpayerChartConfig::default());
    }

    #[test]
    fn partial_logo_keeps_the_owning_charts_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(br#"{"income": {"logo": {"path": "my_logo.jpg"}}}"#)
            .unwrap();
        let path = temp.into_temp_path();
        let settings = Settings::load(&path).unwrap();

        let logo = &settings.income.logo;
        assert_eq!(logo.path, PathBuf::from("my_logo.jpg"));
        assert_eq!(logo.policy, LogoPolicy::Required);
        assert_eq!(logo.placement, IncomeChartConfig::default().logo.placement);
        assert!(logo.placement.right_anchored);
        assert_eq!(settings.taxpayer.logo, TaxpayerChartConfig::default().logo);
    }

    #[test]
    fn taxpayer_logo_policy_can_be_overridden_alone() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(br#"{"taxpayer": {"logo": {"policy": "required"}}}"#)
            .unwrap();
        let path = temp.into_temp_path();
        let settings = Settings::load(&path).unwrap();

        let logo = &settings.taxpayer.logo;
        assert_eq!(logo.policy, LogoPolicy::Required);
        assert_eq!(logo.placement, TaxpayerChartConfig::default().logo.placement);
        assert_eq!(settings.income.logo, IncomeChartConfig::default().logo);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load_or_default("/nonexistent/tax-wedge.json").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"{not json").unwrap();
        let path = temp.into_temp_path();
        assert!(Settings::load(&path).is_err());
    }
}
