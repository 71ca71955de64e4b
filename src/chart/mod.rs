//! Renderer-agnostic chart description.
//!
//! Builders in [`crate::views`] produce a [`model::ChartSpec`]; the egui
//! viewer and the HTML export both consume it, and [`state::ChartState`]
//! tracks what the user has selected.

pub mod logo;
pub mod model;
pub mod state;
