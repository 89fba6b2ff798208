//! Chat Area Component
//!
//! Header, message list and input bar of the open conversation, or a
//! placeholder when none is open.

use eframe::egui;

use super::components::{chat_header, input_bar, message_list};
use super::conversation_sync::SyncPhase;
use super::state::MessagingState;
use crate::egui_app::theme::colors;

/// Height kept free for the input bar and its error line
const INPUT_BAR_HEIGHT: f32 = 76.0;

pub fn render_chat_area(ui: &mut egui::Ui, state: &mut MessagingState) {
    let open = state.snapshot.active_contact.is_some()
        && matches!(state.snapshot.phase, SyncPhase::Loading | SyncPhase::Live);
    if open {
        render_active_chat(ui, state);
    } else {
        render_empty_state(ui);
    }
}

fn render_active_chat(ui: &mut egui::Ui, state: &mut MessagingState) {
    ui.vertical(|ui| {
        chat_header::render(ui, state);

        let available_height = ui.available_height() - INPUT_BAR_HEIGHT;
        ui.allocate_ui_with_layout(
            egui::vec2(ui.available_width(), available_height),
            egui::Layout::top_down(egui::Align::LEFT),
            |ui| {
                message_list::render(ui, state);
            },
        );

        input_bar::render(ui, state);
    });
}

fn render_empty_state(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            egui::Frame::new()
                .fill(colors::BUBBLE_INCOMING)
                .stroke(egui::Stroke::new(1.0, colors::BUBBLE_BORDER))
                .corner_radius(egui::CornerRadius::same(12))
                .inner_margin(egui::Margin::symmetric(16, 12))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new("Sélectionnez un contact pour commencer à discuter")
                            .color(colors::TEXT_DARK),
                    );
                });
        });
    });
}
