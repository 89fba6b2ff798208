//! Message Bubble Component
//!
//! One message with its time and, for own messages, the delivery ticks.

use chrono::Local;
use eframe::egui;

use crate::egui_app::theme::{colors, styles};
use crate::shared::messaging::{DeliveryState, Message};

/// Render a bubble; returns true when "Renvoyer" was clicked on a failed one
pub fn render(ui: &mut egui::Ui, message: &Message, is_own_message: bool) -> bool {
    let align = if is_own_message {
        egui::Align::RIGHT
    } else {
        egui::Align::LEFT
    };
    let failed = message.delivery_state == DeliveryState::Failed;
    let mut resend = false;

    ui.with_layout(egui::Layout::top_down(align), |ui| {
        let max_width = ui.available_width() * 0.7;
        ui.allocate_ui_with_layout(
            egui::vec2(max_width, 0.0),
            egui::Layout::top_down(align),
            |ui| {
                let frame = if is_own_message {
                    styles::outgoing_bubble_frame(failed)
                } else {
                    styles::incoming_bubble_frame()
                };
                frame.show(ui, |ui| {
                    ui.label(egui::RichText::new(&message.body).color(colors::TEXT_DARK));

                    ui.horizontal(|ui| {
                        let time = message.created_at.with_timezone(&Local).format("%H:%M");
                        ui.colored_label(colors::TIMESTAMP, time.to_string());
                        if is_own_message {
                            let (icon, color) = ticks(message.delivery_state);
                            ui.colored_label(color, icon);
                        }
                    });

                    if is_own_message && failed && ui.small_button("Renvoyer").clicked() {
                        resend = true;
                    }
                });
            },
        );
    });

    ui.add_space(4.0);
    resend
}

/// Tick glyph and color for each delivery state
pub fn ticks(state: DeliveryState) -> (&'static str, egui::Color32) {
    match state {
        DeliveryState::Sending => ("🕓", colors::TICK_PENDING),
        DeliveryState::Sent => ("✓", colors::TICK_PENDING),
        DeliveryState::Delivered => ("✓✓", colors::TICK_PENDING),
        DeliveryState::Read => ("✓✓", colors::TICK_READ),
        DeliveryState::Failed => ("⚠", colors::ERROR),
    }
}
