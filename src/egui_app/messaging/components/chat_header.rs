//! Chat Header Component
//!
//! Contact name and phone above the conversation, plus the ⋮ menu with the
//! conversation actions.

use eframe::egui;

use super::contact_item::avatar;
use crate::egui_app::messaging::conversation_actions::ConversationAction;
use crate::egui_app::messaging::state::MessagingState;
use crate::egui_app::theme::{colors, styles};

const MENU_ACTIONS: [ConversationAction; 4] = [
    ConversationAction::Archive,
    ConversationAction::Delete,
    ConversationAction::Block,
    ConversationAction::DeletePermanently,
];

pub fn render(ui: &mut egui::Ui, state: &mut MessagingState) {
    let contact = state.active_contact().cloned();

    styles::chat_header_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        ui.horizontal(|ui| {
            match &contact {
                Some(contact) => {
                    avatar(ui, contact.avatar_initial(), 18);
                    ui.add_space(8.0);
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(&contact.display_name)
                                .strong()
                                .size(16.0)
                                .color(colors::TEXT_LIGHT),
                        );
                        ui.colored_label(colors::TEXT_SECONDARY, &contact.phone_number);
                    });
                }
                None => {
                    ui.colored_label(colors::TEXT_SECONDARY, "Contact inconnu");
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⋮").clicked() {
                    state.show_chat_header_menu = !state.show_chat_header_menu;
                }
            });
        });
    });

    if state.show_chat_header_menu {
        let mut open = true;
        let mut chosen = None;
        egui::Window::new("Actions")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 60.0])
            .show(ui.ctx(), |ui| {
                ui.set_min_width(180.0);
                for action in MENU_ACTIONS {
                    let text = egui::RichText::new(action.label());
                    let text = if matches!(
                        action,
                        ConversationAction::Block | ConversationAction::DeletePermanently
                    ) {
                        text.color(colors::ERROR)
                    } else {
                        text
                    };
                    if ui.button(text).clicked() {
                        chosen = Some(action);
                    }
                }
            });

        if let Some(action) = chosen {
            state.run_action(action);
        } else if !open {
            state.show_chat_header_menu = false;
        }
    }
}
