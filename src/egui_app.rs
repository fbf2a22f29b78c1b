//! egui dashboard: controller, background jobs, and renderer.

pub mod controller;
pub(crate) mod jobs;
pub mod state;
pub mod ui;
