//! egui widgets: control panels and the chart plot.

pub mod panels;
pub mod plot;
