use anyhow::{Context, Result};
use eframe::egui;

use tax_wedge::app::TaxWedgeApp;
use tax_wedge::config::{Settings, CONFIG_FILE};
use tax_wedge::pipeline::{self, ChartKind};
use tax_wedge::state::{AppState, LoadedChart};

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::load_or_default(CONFIG_FILE)?;
    let mut charts = Vec::with_capacity(ChartKind::ALL.len());
    for kind in ChartKind::ALL {
        let spec = pipeline::run(kind, &settings)
            .with_context(|| format!("building chart '{}'", kind.title()))?;
        log::info!(
            "Built '{}': {} traces, {} views",
            kind.title(),
            spec.traces.len(),
            spec.views.len()
        );
        charts.push(LoadedChart::new(kind, spec));
    }
    let state = AppState::new(settings, charts);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tax Wedge – OECD comparisons",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(TaxWedgeApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
