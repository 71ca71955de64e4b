//! OECD tax wedge comparison charts.
//!
//! Two pipelines read OECD workbooks and build interactive charts:
//!
//! * [`views::taxpayer`]: dot-and-connector chart of the tax wedge for three
//!   taxpayer types, sortable by each, with a connector toggle.
//! * [`views::income`]: tax wedge against income level, one line per country,
//!   with a household-scenario dropdown.
//!
//! Builders are pure (`tables -> ChartSpec`); the egui viewer in [`app`] and
//! the Plotly document in [`export::html`] render the result.

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod state;
pub mod ui;
pub mod views;
