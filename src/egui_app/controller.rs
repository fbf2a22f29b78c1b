//! UI-thread controller wiring run orchestration, polling, the leads
//! store, and exports together.
//!
//! All mutation happens here on the UI thread. Workers spawned through
//! [`ControllerJobs`] only report back over the message channel, which
//! is drained once per frame by [`DashController::tick`].

use std::time::Instant;

use time::OffsetDateTime;

use crate::api::{ApiClient, ApiError, Run, ScanTarget, Stats};
use crate::egui_app::jobs::{ControllerJobs, JobMessage};
use crate::egui_app::state::{Page, StatusTone, UiState, status_badge};
use crate::export;
use crate::leads::LeadsStore;
use crate::poller::{PollSchedule, STATS_POLL_INTERVAL, STATUS_POLL_INTERVAL};
use crate::run_control::RunControl;

/// How many recent runs the dashboard lists.
const RECENT_RUNS_LIMIT: usize = 3;

pub struct DashController {
    pub ui: UiState,
    client: ApiClient,
    jobs: ControllerJobs,
    run: RunControl,
    leads: LeadsStore,
    status_schedule: PollSchedule,
    overview_schedule: PollSchedule,
    stats: Option<Stats>,
    recent_runs: Vec<Run>,
    /// Bumped on every page switch; async results tagged with an older
    /// epoch are dropped instead of mutating a page the operator left.
    page_epoch: u64,
    last_run_message: String,
}

impl DashController {
    pub fn new(client: ApiClient) -> Self {
        Self {
            ui: UiState::default(),
            client,
            jobs: ControllerJobs::new(),
            run: RunControl::new(),
            leads: LeadsStore::new(),
            status_schedule: PollSchedule::new(STATUS_POLL_INTERVAL),
            overview_schedule: PollSchedule::new(STATS_POLL_INTERVAL),
            stats: None,
            recent_runs: Vec::new(),
            page_epoch: 0,
            last_run_message: String::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(ApiClient::from_env())
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn run(&self) -> &RunControl {
        &self.run
    }

    pub fn leads(&self) -> &LeadsStore {
        &self.leads
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn recent_runs(&self) -> &[Run] {
        &self.recent_runs
    }

    /// Drive one frame: drain worker messages, expire optimistic phases,
    /// and fire any polls that are due.
    pub fn tick(&mut self, now: Instant) {
        self.pump_messages();
        self.run.tick(now);

        if self.status_schedule.should_fire(now, self.run.polling_active()) {
            self.status_schedule.mark_started(now);
            self.jobs.begin_status_poll(self.client.clone());
        }
        if self.ui.page == Page::Dashboard
            && self.overview_schedule.should_fire(now, true)
        {
            self.overview_schedule.mark_started(now);
            self.jobs
                .begin_overview_fetch(self.client.clone(), self.page_epoch, RECENT_RUNS_LIMIT);
        }

        self.refresh_status_bar();
    }

    fn pump_messages(&mut self) {
        loop {
            match self.jobs.try_recv_message() {
                Ok(message) => self.handle_message(message),
                Err(_) => break,
            }
        }
    }

    fn handle_message(&mut self, message: JobMessage) {
        match message {
            JobMessage::StatusFetched { result } => {
                self.status_schedule.mark_settled();
                match result {
                    Ok(snapshot) => self.run.apply_status(snapshot.is_running, snapshot.logs),
                    Err(err) => {
                        tracing::warn!("Status poll failed: {err}");
                        self.run.on_status_error();
                    }
                }
            }
            JobMessage::OverviewFetched { epoch, result } => {
                self.jobs.clear_overview_fetch();
                self.overview_schedule.mark_settled();
                if epoch != self.page_epoch {
                    return;
                }
                match result {
                    Ok((stats, runs)) => {
                        self.stats = Some(stats);
                        self.recent_runs = runs;
                    }
                    // Keep the last-known-good overview on screen.
                    Err(err) => tracing::warn!("Overview fetch failed: {err}"),
                }
            }
            JobMessage::LeadsFetched { generation, result } => {
                self.jobs.clear_leads_fetch();
                self.ui.database.loading = false;
                match result {
                    Ok(leads) => {
                        if self.leads.apply_fetch(generation, leads) {
                            self.ui.database.error = None;
                        }
                    }
                    Err(err) => {
                        tracing::warn!("Leads fetch failed: {err}");
                        self.ui.database.error = Some(describe_error(&err));
                    }
                }
            }
            JobMessage::ConfigLoaded { epoch, result } => {
                self.jobs.clear_config_load();
                if epoch != self.page_epoch {
                    return;
                }
                match result {
                    Ok(config) => {
                        self.ui.settings.draft = config;
                        self.ui.settings.loaded = true;
                        self.ui.settings.feedback = None;
                        self.ui.settings.feedback_error = false;
                    }
                    Err(err) => {
                        self.ui.settings.feedback =
                            Some(format!("Failed to load settings: {}", describe_error(&err)));
                        self.ui.settings.feedback_error = true;
                    }
                }
            }
            JobMessage::ConfigSaved { result } => {
                self.jobs.clear_config_save();
                self.ui.settings.saving = false;
                match result {
                    Ok(()) => {
                        self.ui.settings.feedback = Some("Settings saved.".into());
                        self.ui.settings.feedback_error = false;
                        self.set_status("Settings saved.", StatusTone::Info);
                    }
                    Err(err) => {
                        let text = format!("Save failed: {}", describe_error(&err));
                        self.ui.settings.feedback = Some(text.clone());
                        self.ui.settings.feedback_error = true;
                        self.set_status(&text, StatusTone::Error);
                    }
                }
            }
            JobMessage::ScanStarted { result } => {
                self.jobs.clear_scan_start();
                self.run.on_start_result(result.is_ok());
                if let Err(err) = result {
                    tracing::warn!("Scan start failed: {err}");
                }
            }
            JobMessage::ScanStopped { result } => {
                self.jobs.clear_scan_stop();
                self.run.on_stop_result(result.is_ok());
                // Re-check run state right away rather than waiting out
                // the current interval.
                self.status_schedule.reset();
            }
            JobMessage::DatabaseCleared { result } => {
                self.jobs.clear_database_clear();
                match result {
                    Ok(()) => {
                        tracing::info!("Lead database cleared");
                        self.set_status("Database cleared.", StatusTone::Info);
                        self.refresh_leads();
                        self.overview_schedule.reset();
                    }
                    Err(err) => {
                        self.set_status(
                            &format!("Clear failed: {}", describe_error(&err)),
                            StatusTone::Error,
                        );
                    }
                }
            }
        }
    }

    pub fn set_page(&mut self, page: Page) {
        if self.ui.page == page {
            return;
        }
        self.page_epoch += 1;
        self.ui.page = page;
        match page {
            Page::Dashboard => self.overview_schedule.reset(),
            Page::Database => {
                if self.leads.is_empty() && !self.jobs.leads_in_flight {
                    self.refresh_leads();
                }
            }
            Page::Settings => {
                self.jobs
                    .begin_config_load(self.client.clone(), self.page_epoch);
            }
        }
    }

    /// The target the next scan would use: the free-text query pair when
    /// both fields are filled, otherwise the preset city/niche pickers.
    pub fn current_target(&self) -> ScanTarget {
        let dash = &self.ui.dashboard;
        if !dash.search_query.trim().is_empty() && !dash.channel_filter.trim().is_empty() {
            ScanTarget::Query {
                search_query: dash.search_query.trim().to_string(),
                channel_filter: dash.channel_filter.trim().to_string(),
            }
        } else {
            ScanTarget::CityNiche {
                city: dash.selected_city.clone(),
                niche: dash.selected_niche.clone(),
            }
        }
    }

    pub fn can_initiate(&self) -> bool {
        self.run.can_start(&self.current_target()) && !self.jobs.scan_request_in_flight
    }

    pub fn can_stop(&self) -> bool {
        self.run.can_stop() && !self.jobs.stop_in_flight
    }

    pub fn initiate_scan(&mut self, now: Instant) {
        let target = self.current_target();
        if !self.run.begin_single(&target, now) {
            return;
        }
        tracing::info!("Starting single scan: {}", target.describe());
        self.jobs.begin_scan_start(self.client.clone(), target, None);
    }

    pub fn initiate_auto_run(&mut self, now: Instant) {
        let target = self.current_target();
        let days = self.ui.dashboard.auto_run_days;
        if !self.run.begin_auto(&target, days, now) {
            return;
        }
        tracing::info!("Starting {days}-day auto run: {}", target.describe());
        self.jobs
            .begin_scan_start(self.client.clone(), target, Some(days));
    }

    pub fn stop_scan(&mut self, now: Instant) {
        if !self.run.begin_stop(now) {
            return;
        }
        self.jobs.begin_scan_stop(self.client.clone());
    }

    pub fn refresh_leads(&mut self) {
        let generation = self.leads.begin_fetch();
        self.ui.database.loading = true;
        self.jobs
            .begin_leads_fetch(self.client.clone(), generation, self.ui.database.limit);
    }

    pub fn set_lead_limit(&mut self, limit: usize) {
        if self.ui.database.limit == limit {
            return;
        }
        self.ui.database.limit = limit;
        self.refresh_leads();
    }

    pub fn toggle_lead_selected(&mut self, id: i64) {
        self.leads.toggle_select(id);
    }

    pub fn toggle_select_all(&mut self) {
        self.leads.select_all();
    }

    pub fn save_settings(&mut self) {
        if self.jobs.config_save_in_flight {
            return;
        }
        self.ui.settings.saving = true;
        self.ui.settings.feedback = None;
        self.ui.settings.feedback_error = false;
        self.jobs
            .begin_config_save(self.client.clone(), self.ui.settings.draft.clone());
    }

    /// Arm the destructive clear behind an explicit confirm dialog.
    pub fn request_clear_database(&mut self) {
        self.ui.database.confirm_clear = true;
    }

    /// Declining the confirm dialog is a silent no-op.
    pub fn cancel_clear_database(&mut self) {
        self.ui.database.confirm_clear = false;
    }

    pub fn confirm_clear_database(&mut self) {
        self.ui.database.confirm_clear = false;
        self.jobs.begin_database_clear(self.client.clone());
    }

    /// Export the current export set as CSV via a save dialog. The set is
    /// the selection when non-empty, otherwise every loaded lead; the
    /// search box narrows the table view, never the export.
    pub fn export_csv(&mut self) {
        let rows = self.export_rows();
        let count = rows.len();
        let csv = {
            let set: Vec<&crate::api::Lead> = rows.iter().collect();
            export::leads_to_csv(&set)
        };
        if count == 0 {
            self.set_status("No leads to export.", StatusTone::Warning);
            return;
        }
        let file_name = export::csv_file_name(now_local_or_utc().date());
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&file_name)
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, csv) {
            Ok(()) => {
                tracing::info!("Exported {count} leads to {}", path.display());
                self.set_status(
                    &format!("Exported {count} leads to {}", path.display()),
                    StatusTone::Info,
                );
            }
            Err(err) => {
                self.set_status(&format!("Export failed: {err}"), StatusTone::Error);
            }
        }
    }

    /// Render the export set as a printable HTML document and hand it to
    /// the system browser for print/save-as-PDF.
    pub fn export_printable(&mut self) {
        let rows = self.export_rows();
        let count = rows.len();
        let html = {
            let set: Vec<&crate::api::Lead> = rows.iter().collect();
            export::leads_to_html(&set, now_local_or_utc())
        };
        if count == 0 {
            self.set_status("No leads to export.", StatusTone::Warning);
            return;
        }
        let path = std::env::temp_dir().join(format!(
            "bernard-leads-{}.html",
            std::process::id()
        ));
        if let Err(err) = std::fs::write(&path, html) {
            self.set_status(&format!("Export failed: {err}"), StatusTone::Error);
            return;
        }
        match open::that(&path) {
            Ok(()) => {
                self.set_status(
                    &format!("Opened {count} leads for printing."),
                    StatusTone::Info,
                );
            }
            Err(err) => {
                self.set_status(&format!("Failed to open browser: {err}"), StatusTone::Error);
            }
        }
    }

    /// Open the backend's own CSV export in the browser: the full
    /// database, not limited by the current fetch.
    pub fn open_server_export(&mut self) {
        let url = self.client.export_csv_url();
        if let Err(err) = open::that(&url) {
            self.set_status(&format!("Failed to open browser: {err}"), StatusTone::Error);
        }
    }

    /// Resolve what an export covers: the selection when non-empty,
    /// otherwise the whole loaded collection. The database search only
    /// filters the table, so both branches ignore it.
    fn export_rows(&self) -> Vec<crate::api::Lead> {
        export::resolve_export_set(self.leads.leads(), self.leads.selection())
            .into_iter()
            .cloned()
            .collect()
    }

    fn set_status(&mut self, text: &str, tone: StatusTone) {
        let (badge_label, badge_color) = status_badge(tone);
        self.ui.status.text = text.to_string();
        self.ui.status.badge_label = badge_label;
        self.ui.status.badge_color = badge_color;
    }

    /// Run state owns the status bar, but only when its message changes;
    /// one-shot messages (export, save, clear) stay up in between.
    fn refresh_status_bar(&mut self) {
        let message = self.run.status_message().to_string();
        if message.is_empty() || message == self.last_run_message {
            return;
        }
        let tone = if self.run.backend_online() == Some(false) {
            StatusTone::Error
        } else if self.run.polling_active() {
            StatusTone::Busy
        } else {
            StatusTone::Info
        };
        self.set_status(&message, tone);
        self.last_run_message = message;
    }
}

fn describe_error(err: &ApiError) -> String {
    match err {
        ApiError::Status(code) => format!("backend returned HTTP {code}"),
        ApiError::Transport(_) => "backend unreachable".to_string(),
        ApiError::Decode(_) => "backend sent an invalid response".to_string(),
    }
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
