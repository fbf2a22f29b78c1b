//! Dashboard page: target pickers, run controls, live logs, and the
//! recent-runs overview.

use std::time::Instant;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::egui_app::controller::DashController;
use crate::egui_app::state::{CITIES, NICHES};
use crate::run_control::RunPhase;

pub(super) fn show(controller: &mut DashController, ui: &mut Ui) {
    ui.heading("Lead Generation");
    ui.add_space(8.0);

    show_stats_row(controller, ui);
    ui.add_space(12.0);
    show_target_pickers(controller, ui);
    ui.add_space(8.0);
    show_run_controls(controller, ui);
    ui.add_space(12.0);

    ui.columns(2, |columns| {
        show_logs(controller, &mut columns[0]);
        show_recent_runs(controller, &mut columns[1]);
    });
}

fn show_stats_row(controller: &DashController, ui: &mut Ui) {
    ui.horizontal(|ui| {
        let (total_leads, total_runs, latest) = match controller.stats() {
            Some(stats) => (
                stats.total_leads.to_string(),
                stats.total_runs.to_string(),
                stats
                    .latest_run
                    .as_ref()
                    .map(|run| format!("{} / {}", run.niche, run.city))
                    .unwrap_or_else(|| "—".into()),
            ),
            None => ("…".into(), "…".into(), "…".into()),
        };
        stat_card(ui, "Total leads", &total_leads);
        stat_card(ui, "Runs", &total_runs);
        stat_card(ui, "Latest run", &latest);
        let online = match controller.run().backend_online() {
            Some(true) => ("Online", Color32::from_rgb(64, 140, 112)),
            Some(false) => ("Offline", Color32::from_rgb(192, 57, 43)),
            None => ("Checking…", Color32::GRAY),
        };
        stat_card_colored(ui, "Backend", online.0, online.1);
    });
}

fn stat_card(ui: &mut Ui, label: &str, value: &str) {
    stat_card_colored(ui, label, value, Color32::WHITE);
}

fn stat_card_colored(ui: &mut Ui, label: &str, value: &str, color: Color32) {
    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(24, 24, 24))
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(label).small().color(Color32::GRAY));
                ui.label(RichText::new(value).heading().color(color));
            });
        });
}

fn show_target_pickers(controller: &mut DashController, ui: &mut Ui) {
    ui.label(RichText::new("Target").strong());
    ui.horizontal_wrapped(|ui| {
        ui.label("City:");
        for city in CITIES {
            let selected = controller.ui.dashboard.selected_city == city;
            if ui.selectable_label(selected, city).clicked() {
                controller.ui.dashboard.selected_city = city.to_string();
            }
        }
    });
    ui.horizontal_wrapped(|ui| {
        ui.label("Niche:");
        for niche in NICHES {
            let selected = controller.ui.dashboard.selected_niche == niche;
            if ui.selectable_label(selected, niche).clicked() {
                controller.ui.dashboard.selected_niche = niche.to_string();
            }
        }
    });
    ui.add_space(4.0);
    ui.label(
        RichText::new("Or describe a custom search (both fields required):")
            .small()
            .color(Color32::GRAY),
    );
    ui.horizontal(|ui| {
        ui.label("Search:");
        ui.add(
            egui::TextEdit::singleline(&mut controller.ui.dashboard.search_query)
                .hint_text("Miami, FL")
                .desired_width(220.0),
        );
        ui.label("Filter:");
        ui.add(
            egui::TextEdit::singleline(&mut controller.ui.dashboard.channel_filter)
                .hint_text("Dentists rating > 4.5")
                .desired_width(260.0),
        );
    });
}

fn show_run_controls(controller: &mut DashController, ui: &mut Ui) {
    let now = Instant::now();
    let can_start = controller.can_initiate();
    let phase = controller.run().phase();
    ui.horizontal(|ui| {
        let initiate_label = if phase == RunPhase::Activating {
            "Starting…"
        } else {
            "Initiate Scan"
        };
        if ui
            .add_enabled(can_start, egui::Button::new(initiate_label))
            .clicked()
        {
            controller.initiate_scan(now);
        }

        let auto_label = if phase == RunPhase::AutoActivating {
            "Starting…"
        } else {
            "Start Auto Run"
        };
        if ui
            .add_enabled(can_start, egui::Button::new(auto_label))
            .clicked()
        {
            controller.initiate_auto_run(now);
        }
        ui.label("for");
        ui.add_enabled(
            can_start,
            egui::DragValue::new(&mut controller.ui.dashboard.auto_run_days).range(1..=30),
        );
        ui.label("days");

        ui.separator();
        if ui
            .add_enabled(controller.can_stop(), egui::Button::new("Stop"))
            .clicked()
        {
            controller.stop_scan(now);
        }
        if controller.run().backend_running() {
            ui.label(RichText::new("● scan in progress").color(Color32::from_rgb(31, 139, 255)));
        }
    });
}

fn show_logs(controller: &DashController, ui: &mut Ui) {
    ui.label(RichText::new("Live log").strong());
    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(10, 10, 10))
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("dashboard_logs")
                .max_height(240.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    let logs = controller.run().logs();
                    if logs.is_empty() {
                        ui.label(RichText::new("No log output yet.").color(Color32::GRAY));
                    }
                    for line in logs {
                        ui.label(RichText::new(line).monospace().size(11.0));
                    }
                });
        });
}

fn show_recent_runs(controller: &DashController, ui: &mut Ui) {
    ui.label(RichText::new("Recent runs").strong());
    egui::ScrollArea::vertical()
        .id_salt("recent_runs")
        .max_height(260.0)
        .show(ui, |ui| {
            if controller.recent_runs().is_empty() {
                ui.label(RichText::new("No runs yet.").color(Color32::GRAY));
                return;
            }
            egui::Grid::new("runs_grid")
                .striped(true)
                .num_columns(4)
                .show(ui, |ui| {
                    ui.label(RichText::new("Target").small().color(Color32::GRAY));
                    ui.label(RichText::new("Status").small().color(Color32::GRAY));
                    ui.label(RichText::new("Leads").small().color(Color32::GRAY));
                    ui.label(RichText::new("Started").small().color(Color32::GRAY));
                    ui.end_row();
                    for run in controller.recent_runs() {
                        ui.label(format!("{} / {}", run.niche, run.city));
                        ui.label(&run.status);
                        ui.label(run.total_leads.to_string());
                        ui.label(&run.started_at);
                        ui.end_row();
                    }
                });
        });
}
