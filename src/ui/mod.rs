//! Presentation layer: egui widgets that display precomputed views and feed
//! widget changes back into [`crate::state::AppState`].

pub mod heatmap;
pub mod panels;
pub mod plot;
pub mod table;
