//! egui renderer for the dashboard.

use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, Frame, RichText};

use crate::egui_app::controller::DashController;
use crate::egui_app::state::Page;

mod dashboard;
mod database;
mod settings;

/// How often the UI repaints while idle so poll schedules keep ticking
/// even without input events.
const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: DashController,
    visuals_set: bool,
}

impl EguiApp {
    pub fn new(controller: DashController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(12, 12, 12);
        visuals.panel_fill = Color32::from_rgb(16, 16, 16);
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(16, 16, 16);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(Frame::NONE.fill(Color32::from_rgb(24, 24, 24)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.label(RichText::new("Bernard").strong().color(Color32::WHITE));
                    ui.separator();
                    let mut nav = |ui: &mut egui::Ui, label: &str, page: Page| {
                        let selected = self.controller.ui.page == page;
                        if ui.selectable_label(selected, label).clicked() {
                            self.controller.set_page(page);
                        }
                    };
                    nav(ui, "Dashboard", Page::Dashboard);
                    nav(ui, "Database", Page::Database);
                    nav(ui, "Settings", Page::Settings);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new(self.controller.base_url())
                                .small()
                                .color(Color32::GRAY),
                        );
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::NONE.fill(Color32::from_rgb(0, 0, 0)))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(9.0, 11.0),
                        6.0,
                        status.badge_color,
                    );
                    ui.add_space(16.0);
                    ui.label(RichText::new(&status.badge_label).color(Color32::WHITE));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.tick(Instant::now());

        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.controller.ui.page {
            Page::Dashboard => dashboard::show(&mut self.controller, ui),
            Page::Database => database::show(&mut self.controller, ui),
            Page::Settings => settings::show(&mut self.controller, ui),
        });
        if self.controller.ui.database.confirm_clear {
            database::show_clear_confirm(&mut self.controller, ctx);
        }

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
