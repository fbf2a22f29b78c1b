mod support;

use support::server::BernardServer;

use bernard_dash::api::ApiClient;
use bernard_dash::egui_app::controller::DashController;
use bernard_dash::egui_app::state::Page;
use bernard_dash::run_control::RunPhase;
use std::time::{Duration, Instant};

struct Harness {
    server: BernardServer,
    controller: DashController,
}

impl Harness {
    fn new() -> Self {
        let server = BernardServer::start();
        let controller = DashController::new(ApiClient::new(server.url.clone()));
        Self { server, controller }
    }

    /// Tick the controller until `done` holds or the timeout elapses.
    fn drive_until(
        &mut self,
        timeout: Duration,
        mut done: impl FnMut(&DashController, &BernardServer) -> bool,
    ) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.controller.tick(Instant::now());
            if done(&self.controller, &self.server) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

#[test]
fn single_scan_runs_end_to_end() {
    let mut h = Harness::new();
    h.controller.ui.dashboard.search_query = "Miami, FL".into();
    h.controller.ui.dashboard.channel_filter = "Dentists rating > 4.5".into();

    // Initial status + overview fetches fire on the first ticks.
    assert!(
        h.drive_until(Duration::from_secs(2), |controller, _| {
            controller.run().backend_online() == Some(true) && controller.stats().is_some()
        }),
        "backend never came online"
    );
    assert_eq!(h.server.count_requests("GET /api/status"), 1);
    assert_eq!(h.controller.stats().unwrap().total_leads, 3);

    let clicked = Instant::now();
    h.controller.initiate_scan(clicked);
    assert_eq!(h.controller.run().phase(), RunPhase::Activating);
    // Duplicate trigger is rejected while the request is in flight.
    assert!(!h.controller.can_initiate());
    h.controller.initiate_scan(clicked);

    assert!(
        h.drive_until(Duration::from_secs(2), |_, server| {
            server.count_requests("POST /api/scan/single") >= 1
        }),
        "scan start never reached the backend"
    );
    assert_eq!(h.server.count_requests("POST /api/scan/single"), 1);
    let start_request = h
        .server
        .requests()
        .into_iter()
        .find(|request| request.starts_with("POST /api/scan/single"))
        .unwrap();
    assert!(start_request.contains(r#""searchQuery":"Miami, FL""#));
    assert!(start_request.contains(r#""channelFilter":"Dentists rating > 4.5""#));
    assert!(h.server.is_running());

    // The 3s status cadence picks up the live run.
    assert!(
        h.drive_until(Duration::from_secs(6), |controller, _| {
            controller.run().backend_running()
        }),
        "status poll never observed the running scan"
    );
    assert_eq!(h.controller.run().logs(), ["Scan log line"]);

    // Optimistic activation has expired by now; the run state comes from
    // the backend alone and still only one start request went out.
    assert_eq!(h.controller.run().phase(), RunPhase::Idle);
    assert_eq!(h.server.count_requests("POST /api/scan/single"), 1);

    h.controller.stop_scan(Instant::now());
    assert!(
        h.drive_until(Duration::from_secs(6), |controller, server| {
            server.count_requests("POST /api/scan/stop") == 1
                && !controller.run().backend_running()
        }),
        "stop never settled"
    );
    assert!(!h.server.is_running());
}

#[test]
fn database_page_loads_searches_and_clears() {
    let mut h = Harness::new();

    h.controller.set_page(Page::Database);
    assert!(
        h.drive_until(Duration::from_secs(2), |controller, _| {
            controller.leads().leads().len() == 3
        }),
        "leads never loaded"
    );
    assert_eq!(h.server.count_requests("GET /api/leads?limit=200"), 1);

    // Search is a pure view over the loaded collection.
    assert_eq!(h.controller.leads().search("joe").len(), 1);
    assert_eq!(h.controller.leads().search("miami").len(), 2);
    assert_eq!(h.controller.leads().leads().len(), 3);

    h.controller.set_lead_limit(500);
    assert!(
        h.drive_until(Duration::from_secs(2), |_, server| {
            server.count_requests("GET /api/leads?limit=500") == 1
        }),
        "limit change never refetched"
    );

    // The destructive clear goes through the confirm dialog; declining
    // is a no-op.
    h.controller.request_clear_database();
    h.controller.cancel_clear_database();
    h.controller.tick(Instant::now());
    assert_eq!(h.server.count_requests("POST /api/clear"), 0);

    h.controller.request_clear_database();
    h.controller.confirm_clear_database();
    assert!(
        h.drive_until(Duration::from_secs(2), |controller, server| {
            server.count_requests("POST /api/clear") == 1 && controller.leads().is_empty()
        }),
        "clear never settled"
    );
}

#[test]
fn settings_round_trip_saves_draft() {
    let mut h = Harness::new();

    h.controller.set_page(Page::Settings);
    assert!(
        h.drive_until(Duration::from_secs(2), |controller, _| {
            controller.ui.settings.loaded
        }),
        "settings never loaded"
    );
    assert_eq!(h.controller.ui.settings.draft.city, "Raleigh");
    assert_eq!(h.controller.ui.settings.draft.max_leads, 50);
    assert!(h.controller.ui.settings.draft.sources.google_maps);

    h.controller.ui.settings.draft.niche = "Gyms".into();
    h.controller.save_settings();
    assert!(h.controller.ui.settings.saving);
    assert!(
        h.drive_until(Duration::from_secs(2), |controller, server| {
            server.count_requests("POST /api/config") == 1 && !controller.ui.settings.saving
        }),
        "save never settled"
    );
    let save_request = h
        .server
        .requests()
        .into_iter()
        .find(|request| request.starts_with("POST /api/config"))
        .unwrap();
    assert!(save_request.contains(r#""niche":"Gyms""#));
    assert_eq!(
        h.controller.ui.settings.feedback.as_deref(),
        Some("Settings saved.")
    );
}
