//! Library exports for reuse in tests.
/// Typed client for the Bernard backend API.
pub mod api;
/// Application directory helpers.
pub mod app_dirs;
/// Shared egui UI modules.
pub mod egui_app;
/// Client-side CSV and printable exports.
pub mod export;
/// Shared HTTP agent with bounded timeouts.
pub mod http_client;
/// Leads collection, selection, and search.
pub mod leads;
/// Tracing setup with per-launch log files.
pub mod logging;
/// Poll cadence gating.
pub mod poller;
/// Run-orchestration state machine.
pub mod run_control;
