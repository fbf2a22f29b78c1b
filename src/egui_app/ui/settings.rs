//! Settings page: scan-config draft editing and save.

use eframe::egui::{self, Color32, RichText, Ui};

use crate::egui_app::controller::DashController;

pub(super) fn show(controller: &mut DashController, ui: &mut Ui) {
    ui.heading("Scan Settings");
    ui.add_space(8.0);

    if !controller.ui.settings.loaded {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading settings…");
        });
        if let Some(feedback) = controller.ui.settings.feedback.clone() {
            ui.colored_label(Color32::from_rgb(192, 57, 43), feedback);
        }
        return;
    }

    egui::Grid::new("settings_grid")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            let draft = &mut controller.ui.settings.draft;
            ui.label("City");
            ui.text_edit_singleline(&mut draft.city);
            ui.end_row();
            ui.label("State");
            ui.text_edit_singleline(&mut draft.state);
            ui.end_row();
            ui.label("Niche");
            ui.text_edit_singleline(&mut draft.niche);
            ui.end_row();
            ui.label("Search query");
            ui.text_edit_singleline(&mut draft.search_query);
            ui.end_row();
            ui.label("Channel filter");
            ui.text_edit_singleline(&mut draft.channel_filter);
            ui.end_row();
            ui.label("Max leads per run");
            ui.add(egui::DragValue::new(&mut draft.max_leads).range(1..=5000));
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.label(RichText::new("Sources").strong());
    ui.checkbox(
        &mut controller.ui.settings.draft.sources.google_maps,
        "Google Maps",
    );
    ui.checkbox(&mut controller.ui.settings.draft.sources.yelp, "Yelp");

    ui.add_space(12.0);
    ui.label(RichText::new("Notion sync").strong());
    ui.label(
        RichText::new(
            "Leads are pushed to Notion by the backend. Set NOTION_API_KEY and \
             NOTION_DATABASE_ID in the backend environment; nothing to configure here.",
        )
        .small()
        .color(Color32::GRAY),
    );

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        let saving = controller.ui.settings.saving;
        if ui
            .add_enabled(!saving, egui::Button::new(if saving { "Saving…" } else { "Save" }))
            .clicked()
        {
            controller.save_settings();
        }
        if let Some(feedback) = &controller.ui.settings.feedback {
            let color = if controller.ui.settings.feedback_error {
                Color32::from_rgb(192, 138, 43)
            } else {
                Color32::from_rgb(64, 140, 112)
            };
            ui.label(RichText::new(feedback).color(color));
        }
    });
}
