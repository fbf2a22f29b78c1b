//! Shared state types for the egui UI.

use egui::Color32;

use crate::api::ScanConfig;

/// Preset target cities offered on the dashboard.
pub const CITIES: [&str; 6] = [
    "Miami",
    "Atlanta",
    "Chicago",
    "Raleigh",
    "Phoenix",
    "Los Angeles",
];
/// Preset industry niches offered on the dashboard.
pub const NICHES: [&str; 6] = [
    "Restaurants",
    "Gyms",
    "Salons",
    "Contractors",
    "Dentists",
    "Auto Repair",
];

/// Row limits offered by the database page.
pub const LEAD_LIMITS: [usize; 5] = [50, 100, 200, 500, 1000];
/// Default row limit for the leads table.
pub const DEFAULT_LEAD_LIMIT: usize = 200;
/// Default length of an auto run, in days.
pub const DEFAULT_AUTO_RUN_DAYS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Database,
    Settings,
}

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub page: Page,
    pub status: StatusBarState,
    pub dashboard: DashboardState,
    pub database: DatabaseState,
    pub settings: SettingsState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            page: Page::Dashboard,
            status: StatusBarState::idle(),
            dashboard: DashboardState::default(),
            database: DatabaseState::default(),
            settings: SettingsState::default(),
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        let (badge_label, badge_color) = status_badge(StatusTone::Idle);
        Self {
            text: "Pick a target and start a scan".into(),
            badge_label,
            badge_color,
        }
    }
}

/// Operator inputs on the dashboard. The free-text query + channel
/// filter supersede the preset pickers when both are filled.
#[derive(Clone, Debug)]
pub struct DashboardState {
    pub selected_city: String,
    pub selected_niche: String,
    pub search_query: String,
    pub channel_filter: String,
    pub auto_run_days: u32,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            selected_city: CITIES[3].to_string(),
            selected_niche: NICHES[0].to_string(),
            search_query: String::new(),
            channel_filter: String::new(),
            auto_run_days: DEFAULT_AUTO_RUN_DAYS,
        }
    }
}

/// Leads-table view state.
#[derive(Clone, Debug)]
pub struct DatabaseState {
    pub query: String,
    pub limit: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Destructive clear waits behind an explicit confirm dialog;
    /// declining is a silent no-op.
    pub confirm_clear: bool,
}

impl Default for DatabaseState {
    fn default() -> Self {
        Self {
            query: String::new(),
            limit: DEFAULT_LEAD_LIMIT,
            loading: false,
            error: None,
            confirm_clear: false,
        }
    }
}

/// Scan-config draft held by the settings page. May diverge from the
/// backend copy until a save round-trip succeeds.
#[derive(Clone, Debug, Default)]
pub struct SettingsState {
    pub draft: ScanConfig,
    pub loaded: bool,
    pub saving: bool,
    pub feedback: Option<String>,
    /// Whether `feedback` reports a failure; drives the warning color.
    pub feedback_error: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

pub fn status_badge(tone: StatusTone) -> (String, Color32) {
    match tone {
        StatusTone::Idle => ("Idle".into(), Color32::from_rgb(90, 90, 90)),
        StatusTone::Busy => ("Running".into(), Color32::from_rgb(31, 139, 255)),
        StatusTone::Info => ("OK".into(), Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning".into(), Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error".into(), Color32::from_rgb(192, 57, 43)),
    }
}
