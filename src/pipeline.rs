use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};

use crate::chart::logo::load_logo;
use crate::chart::model::ChartSpec;
use crate::config::{IncomeChartConfig, Settings, TaxpayerChartConfig};
use crate::data::clean::MissingPolicy;
use crate::data::loader::{load_country_table, load_scenarios, ColumnSpan, SheetSelection};
use crate::export::html::write_document;
use crate::views::{income, taxpayer};

// ---------------------------------------------------------------------------
// The two charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Tax wedge by taxpayer type, one row per country.
    Taxpayer,
    /// Tax wedge by income level, one line per country and household.
    Income,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [ChartKind::Taxpayer, ChartKind::Income];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Taxpayer => "By taxpayer type",
            ChartKind::Income => "By income level",
        }
    }

    pub fn workbook(self, settings: &Settings) -> &Path {
        match self {
            ChartKind::Taxpayer => &settings.taxpayer.workbook,
            ChartKind::Income => &settings.income.workbook,
        }
    }

    /// Settings with this chart's workbook replaced by `path`.
    pub fn with_workbook(self, settings: &Settings, path: PathBuf) -> Settings {
        let mut settings = settings.clone();
        match self {
            ChartKind::Taxpayer => settings.taxpayer.workbook = path,
            ChartKind::Income => settings.income.workbook = path,
        }
        settings
    }
}

/// Run one pipeline: load, build, attach the logo, export if configured.
pub fn run(kind: ChartKind, settings: &Settings) -> Result<ChartSpec> {
    match kind {
        ChartKind::Taxpayer => taxpayer_chart(&settings.taxpayer),
        ChartKind::Income => income_chart(&settings.income),
    }
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

pub fn taxpayer_chart(config: &TaxpayerChartConfig) -> Result<ChartSpec> {
    let columns = ColumnSpan::parse(&config.columns)?;
    // measure columns are named by position, not by the sheet's headers
    ensure!(
        columns.measure_count() == config.measures.len(),
        "column span {} holds {} measure columns, expected {}",
        config.columns,
        columns.measure_count(),
        config.measures.len()
    );
    let selection = SheetSelection {
        sheet: config.sheet.clone(),
        header_row: config.header_row,
        columns,
    };
    let mut table = load_country_table(
        &config.workbook,
        &selection,
        MissingPolicy::DropIncompleteRows,
    )
    .with_context(|| format!("loading {}", config.workbook.display()))?;
    table.columns = config.measures.iter().map(|m| m.key.clone()).collect();

    let mut spec = taxpayer::build_chart(&table, config).context("building taxpayer chart")?;
    spec.logo = load_logo(&config.logo.path, config.logo.policy, config.logo.placement)?;
    if let Some(output) = &config.output {
        write_document(&spec, output)?;
    }
    Ok(spec)
}

pub fn income_chart(config: &IncomeChartConfig) -> Result<ChartSpec> {
    let scenarios = load_scenarios(
        &config.workbook,
        &config.sheets,
        config.header_row,
        ColumnSpan::parse(&config.columns)?,
        &config.index_suffix,
        MissingPolicy::InterpolateLinear,
    )
    .with_context(|| format!("loading {}", config.workbook.display()))?;

    let logo = load_logo(&config.logo.path, config.logo.policy, config.logo.placement)?;
    let mut spec = income::build_chart(&scenarios, config).context("building income chart")?;
    spec.logo = logo;
    if let Some(output) = &config.output {
        write_document(&spec, output)?;
    }
    Ok(spec)
}
