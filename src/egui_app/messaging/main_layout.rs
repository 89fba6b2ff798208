//! Main Messaging Layout
//!
//! Sidebar on the left, chat pane on the right, dialogs on top.

use eframe::egui;

use super::chat_area::render_chat_area;
use super::components::group_panel;
use super::sidebar::render_sidebar;
use super::state::MessagingState;
use crate::egui_app::theme::{colors, styles};

/// Sidebar width in pixels
const SIDEBAR_WIDTH: f32 = 340.0;

pub fn render_messaging_view(ui: &mut egui::Ui, state: &mut MessagingState) {
    state.check_pending_operations();
    state.refresh();

    let available_size = ui.available_size();

    ui.horizontal(|ui| {
        ui.allocate_ui_with_layout(
            egui::vec2(SIDEBAR_WIDTH, available_size.y),
            egui::Layout::top_down(egui::Align::LEFT),
            |ui| {
                styles::sidebar_frame().show(ui, |ui| {
                    ui.set_min_height(available_size.y);
                    render_sidebar(ui, state);
                });
            },
        );

        ui.add(egui::Separator::default().vertical().spacing(0.0));

        ui.allocate_ui_with_layout(
            egui::vec2(available_size.x - SIDEBAR_WIDTH - 1.0, available_size.y),
            egui::Layout::top_down(egui::Align::LEFT),
            |ui| {
                styles::chat_area_frame().show(ui, |ui| {
                    ui.set_min_size(ui.available_size());
                    render_chat_area(ui, state);
                });
            },
        );
    });

    render_modals(ui, state);
}

fn render_modals(ui: &mut egui::Ui, state: &mut MessagingState) {
    if state.show_add_contact_modal {
        render_add_contact_modal(ui, state);
    }
    group_panel::render(ui.ctx(), state);
}

fn render_add_contact_modal(ui: &mut egui::Ui, state: &mut MessagingState) {
    let mut open = true;
    egui::Window::new("Nouveau contact")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ui.ctx(), |ui| {
            ui.set_min_width(300.0);
            let enabled = state.pending_add_contact.is_none();

            ui.label("Nom");
            ui.add_enabled(enabled, egui::TextEdit::singleline(&mut state.add_contact_name));
            ui.add_space(6.0);
            ui.label("Téléphone");
            ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut state.add_contact_phone).hint_text("771234567"),
            );
            ui.add_space(6.0);
            ui.label("Avatar (URL, optionnel)");
            ui.add_enabled(enabled, egui::TextEdit::singleline(&mut state.add_contact_avatar));
            ui.add_space(8.0);

            if let Some(error) = &state.add_contact_error {
                ui.colored_label(colors::ERROR, error);
                ui.add_space(8.0);
            }

            if enabled {
                ui.horizontal(|ui| {
                    if ui.button("Annuler").clicked() {
                        state.close_add_contact_modal();
                    }
                    if ui.button("Ajouter").clicked() {
                        state.submit_add_contact();
                    }
                });
            } else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Ajout en cours...");
                });
            }
        });

    if !open {
        state.close_add_contact_modal();
    }
}
