//! Database page: searchable leads table with selection and exports.

use eframe::egui::{self, Color32, Context, RichText, Ui};

use crate::egui_app::controller::DashController;
use crate::egui_app::state::LEAD_LIMITS;

pub(super) fn show(controller: &mut DashController, ui: &mut Ui) {
    ui.heading("Lead Database");
    ui.add_space(8.0);

    show_toolbar(controller, ui);
    ui.add_space(4.0);

    if let Some(error) = controller.ui.database.error.clone() {
        ui.colored_label(Color32::from_rgb(192, 57, 43), error);
    }
    if controller.ui.database.loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading leads…");
        });
    }

    show_table(controller, ui);
}

fn show_toolbar(controller: &mut DashController, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label("Search:");
        ui.add(
            egui::TextEdit::singleline(&mut controller.ui.database.query)
                .hint_text("name, phone, city, niche…")
                .desired_width(240.0),
        );

        let mut limit = controller.ui.database.limit;
        egui::ComboBox::from_id_salt("lead_limit")
            .selected_text(format!("{limit} rows"))
            .show_ui(ui, |ui| {
                for option in LEAD_LIMITS {
                    ui.selectable_value(&mut limit, option, format!("{option} rows"));
                }
            });
        if limit != controller.ui.database.limit {
            controller.set_lead_limit(limit);
        }

        if ui.button("Refresh").clicked() {
            controller.refresh_leads();
        }
        ui.separator();

        let selected = controller.leads().selection_len();
        let export_label = if selected > 0 {
            format!("Export CSV ({selected})")
        } else {
            "Export CSV".to_string()
        };
        if ui.button(export_label).clicked() {
            controller.export_csv();
        }
        if ui.button("Print / PDF").clicked() {
            controller.export_printable();
        }
        if ui.button("Full export (server)").clicked() {
            controller.open_server_export();
        }
        ui.separator();
        if ui
            .button(RichText::new("Clear database").color(Color32::from_rgb(192, 57, 43)))
            .clicked()
        {
            controller.request_clear_database();
        }
    });
}

fn show_table(controller: &mut DashController, ui: &mut Ui) {
    let stats = controller.leads().stats();
    ui.horizontal(|ui| {
        let shown = controller
            .leads()
            .search(&controller.ui.database.query)
            .len();
        ui.label(
            RichText::new(format!(
                "{shown} of {} leads — {} with phone, {} with email",
                stats.total, stats.with_phone, stats.with_email
            ))
            .small()
            .color(Color32::GRAY),
        );
    });

    let rows: Vec<(i64, [String; 6])> = controller
        .leads()
        .search(&controller.ui.database.query)
        .iter()
        .map(|lead| {
            (
                lead.id,
                [
                    lead.name.clone(),
                    lead.phone.clone().unwrap_or_default(),
                    lead.email.clone().unwrap_or_default(),
                    lead.city.clone().unwrap_or_default(),
                    lead.niche.clone().unwrap_or_default(),
                    if lead.has_website() { "Yes" } else { "No" }.to_string(),
                ],
            )
        })
        .collect();

    egui::ScrollArea::vertical()
        .id_salt("leads_table")
        .show(ui, |ui| {
            egui::Grid::new("leads_grid")
                .striped(true)
                .num_columns(7)
                .min_col_width(60.0)
                .show(ui, |ui| {
                    let all_selected = !rows.is_empty()
                        && controller.leads().selection_len() == controller.leads().leads().len();
                    let mut select_all = all_selected;
                    if ui.checkbox(&mut select_all, "").changed() {
                        controller.toggle_select_all();
                    }
                    for header in ["Name", "Phone", "Email", "City", "Niche", "Website"] {
                        ui.label(RichText::new(header).small().color(Color32::GRAY));
                    }
                    ui.end_row();

                    for (id, fields) in &rows {
                        let mut selected = controller.leads().is_selected(*id);
                        if ui.checkbox(&mut selected, "").changed() {
                            controller.toggle_lead_selected(*id);
                        }
                        for field in fields {
                            ui.label(field);
                        }
                        ui.end_row();
                    }
                });
        });
}

/// Modal confirm for the destructive clear.
pub(super) fn show_clear_confirm(controller: &mut DashController, ctx: &Context) {
    egui::Window::new("Clear database?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label("This deletes every lead on the backend. It cannot be undone.");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .button(RichText::new("Delete everything").color(Color32::from_rgb(192, 57, 43)))
                    .clicked()
                {
                    controller.confirm_clear_database();
                }
                if ui.button("Cancel").clicked() {
                    controller.cancel_clear_database();
                }
            });
        });
}
