//! Sidebar Component
//!
//! Header with the add-contact and groups buttons, the search bar, and the
//! contact list.

use eframe::egui;

use super::components::{contact_list, search_bar};
use super::state::MessagingState;
use crate::egui_app::theme::{colors, styles};

pub fn render_sidebar(ui: &mut egui::Ui, state: &mut MessagingState) {
    styles::chat_header_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Discussions")
                    .size(18.0)
                    .strong()
                    .color(colors::TEXT_LIGHT),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("➕").on_hover_text("Nouveau contact").clicked() {
                    state.open_add_contact_modal();
                }
                if ui.button("👥").on_hover_text("Groupes").clicked() {
                    state.show_group_panel = !state.show_group_panel;
                }
            });
        });
    });

    ui.add_space(8.0);
    search_bar::render(ui, state);
    ui.add_space(8.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            contact_list::render(ui, state);
        });
}
