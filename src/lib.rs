//! Medical diagnostic dashboard.
//!
//! [`data`] holds the record store and the filter-and-aggregate pipeline,
//! all pure functions over an immutable dataset. [`app`] and [`ui`] render
//! the derived views with egui.

pub mod app;
pub mod cli;
pub mod color;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
