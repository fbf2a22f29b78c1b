//! Typed access to the Bernard backend HTTP surface.

mod client;
mod models;

pub use client::{ApiClient, ApiError, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use models::{Lead, Run, ScanConfig, ScanTarget, SourceToggles, Stats, StatusSnapshot};
