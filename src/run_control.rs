//! Run-orchestration state machine.
//!
//! Tracks two distinct things that are easy to conflate: the optimistic
//! "request in flight" phase set the moment the operator clicks, and the
//! authoritative running flag reported by the backend. The optimistic
//! phase expires after a fixed hold so the button shows a busy
//! affordance; it is never a substitute for polling the real run state.

use std::time::{Duration, Instant};

use crate::api::ScanTarget;

/// How long the optimistic activating phase is held before returning to
/// idle, regardless of the start request's outcome.
pub const ACTIVATION_HOLD: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Activating,
    AutoActivating,
    Stopping,
}

#[derive(Debug)]
pub struct RunControl {
    phase: RunPhase,
    phase_deadline: Option<Instant>,
    backend_running: bool,
    /// `None` until the first status poll settles: unknown, not offline.
    backend_online: Option<bool>,
    status_message: String,
    logs: Vec<String>,
}

impl Default for RunControl {
    fn default() -> Self {
        Self {
            phase: RunPhase::Idle,
            phase_deadline: None,
            backend_running: false,
            backend_online: None,
            status_message: String::new(),
            logs: Vec::new(),
        }
    }
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn backend_running(&self) -> bool {
        self.backend_running
    }

    pub fn backend_online(&self) -> Option<bool> {
        self.backend_online
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Whether status polling should run: while a start request is being
    /// held optimistically or the backend reports a run in progress.
    pub fn polling_active(&self) -> bool {
        self.backend_running
            || matches!(
                self.phase,
                RunPhase::Activating | RunPhase::AutoActivating | RunPhase::Stopping
            )
    }

    /// Whether a new scan may be started right now.
    pub fn can_start(&self, target: &ScanTarget) -> bool {
        target.is_valid() && self.phase == RunPhase::Idle && !self.backend_running
    }

    /// Enter the optimistic activating phase for a single scan. Returns
    /// false (no-op) when the target is invalid or a scan is already
    /// underway; the triggering control should already be disabled.
    pub fn begin_single(&mut self, target: &ScanTarget, now: Instant) -> bool {
        if !self.can_start(target) {
            return false;
        }
        self.enter_phase(RunPhase::Activating, now);
        self.status_message = format!("Starting single scan for {}...", target.describe());
        true
    }

    /// Enter the optimistic activating phase for a multi-day auto run.
    pub fn begin_auto(&mut self, target: &ScanTarget, days: u32, now: Instant) -> bool {
        if !self.can_start(target) {
            return false;
        }
        self.enter_phase(RunPhase::AutoActivating, now);
        self.status_message = format!(
            "Starting {days}-day auto run for {}...",
            target.describe()
        );
        true
    }

    /// Record the outcome of a scan-start request. Does not end the
    /// optimistic phase; that expires on its own hold timer.
    pub fn on_start_result(&mut self, ok: bool) {
        if ok {
            self.backend_online = Some(true);
            self.status_message = match self.phase {
                RunPhase::AutoActivating => {
                    "Auto run started. Leads will populate daily.".to_string()
                }
                _ => "Scraper running. View leads in the Database tab.".to_string(),
            };
        } else {
            self.backend_online = Some(false);
            self.status_message =
                "Cannot reach the Bernard API. Check the backend and try again.".to_string();
        }
    }

    /// Whether a stop may be requested: the backend must report running
    /// and no optimistic phase may still be held.
    pub fn can_stop(&self) -> bool {
        self.backend_running && self.phase == RunPhase::Idle
    }

    /// Request a stop. Only valid while the backend reports running.
    pub fn begin_stop(&mut self, now: Instant) -> bool {
        if !self.can_stop() {
            return false;
        }
        self.enter_phase(RunPhase::Stopping, now);
        self.status_message = "Stopping scan...".to_string();
        true
    }

    pub fn on_stop_result(&mut self, ok: bool) {
        if ok {
            self.backend_online = Some(true);
            self.status_message = "Stop requested.".to_string();
        } else {
            self.backend_online = Some(false);
            self.status_message = "Stop request failed. Backend unreachable.".to_string();
        }
    }

    /// Apply an authoritative status snapshot. Logs replace the local
    /// buffer; the backend owns ordering and retention.
    pub fn apply_status(&mut self, is_running: bool, logs: Vec<String>) {
        self.backend_running = is_running;
        self.logs = logs;
        self.backend_online = Some(true);
    }

    /// A failed status poll degrades the display but must not stop the
    /// polling loop; the next tick still fires.
    pub fn on_status_error(&mut self) {
        self.backend_online = Some(false);
    }

    /// Clear expired optimistic phases. Called once per frame.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.phase_deadline {
            if now >= deadline {
                self.phase = RunPhase::Idle;
                self.phase_deadline = None;
            }
        }
    }

    fn enter_phase(&mut self, phase: RunPhase, now: Instant) {
        self.phase = phase;
        self.phase_deadline = Some(now + ACTIVATION_HOLD);
    }
}
