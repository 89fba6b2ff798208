//! Search Bar Component
//!
//! Filters the contact list by name or phone number.

use eframe::egui;

use crate::egui_app::messaging::state::MessagingState;

pub fn render(ui: &mut egui::Ui, state: &mut MessagingState) {
    ui.horizontal(|ui| {
        ui.add_space(8.0);
        ui.label("🔍");

        ui.add(
            egui::TextEdit::singleline(&mut state.search_query)
                .hint_text("Rechercher un contact")
                .desired_width(ui.available_width() - 40.0),
        );

        if !state.search_query.is_empty() && ui.button("✕").clicked() {
            state.search_query.clear();
        }

        ui.add_space(8.0);
    });
}
