//! Input Bar Component
//!
//! Message field with the send button, and the inline send error under it.

use eframe::egui;

use crate::egui_app::messaging::state::MessagingState;
use crate::egui_app::theme::{colors, styles};

pub fn render(ui: &mut egui::Ui, state: &mut MessagingState) {
    styles::input_bar_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.message_input)
                    .hint_text("Tapez un message")
                    .text_color(colors::TEXT_DARK)
                    .desired_width(ui.available_width() - 48.0),
            );

            let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
            if response.lost_focus() && enter_pressed {
                state.send_message();
                response.request_focus();
            }

            let send = egui::Button::new(egui::RichText::new("➤").color(egui::Color32::WHITE))
                .fill(colors::ACCENT)
                .corner_radius(egui::CornerRadius::same(16));
            // always enabled: an empty body is reported by the engine
            if ui.add(send).clicked() {
                state.send_message();
            }
        });

        if let Some(error) = &state.snapshot.inline_error {
            ui.colored_label(colors::ERROR, error);
        }
    });
}
