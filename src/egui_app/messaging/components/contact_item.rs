//! Contact Item Component
//!
//! One sidebar row: avatar initial, name, last-message preview with its
//! time, and the unread badge.

use chrono::Local;
use eframe::egui;

use crate::egui_app::messaging::contacts::ContactEntry;
use crate::egui_app::theme::{colors, styles};

/// Render a row; returns true when it was clicked
pub fn render(ui: &mut egui::Ui, entry: &ContactEntry, is_selected: bool) -> bool {
    let contact = &entry.contact;
    let id = ui.make_persistent_id(("contact_row", contact.id.as_str()));
    let hovered = ui.ctx().read_response(id).is_some_and(|r| r.hovered());

    let response = styles::contact_item_frame(is_selected, hovered).show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        ui.horizontal(|ui| {
            avatar(ui, contact.avatar_initial(), 20);
            ui.add_space(8.0);

            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&contact.display_name)
                            .strong()
                            .color(colors::TEXT_LIGHT),
                    );
                    if let Some(at) = entry.last_activity {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let color = if entry.unread > 0 {
                                colors::ACCENT
                            } else {
                                colors::TIMESTAMP
                            };
                            ui.colored_label(color, at.with_timezone(&Local).format("%H:%M").to_string());
                        });
                    }
                });

                ui.horizontal(|ui| {
                    let preview = entry.last_message.as_deref().unwrap_or(&contact.phone_number);
                    ui.colored_label(colors::TEXT_SECONDARY, preview);
                    if entry.unread > 0 {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            unread_badge(ui, entry.unread);
                        });
                    }
                });
            });
        });
    });

    let response = ui.interact(response.response.rect, id, egui::Sense::click());
    response.clicked()
}

/// Round avatar with the contact's initial
pub fn avatar(ui: &mut egui::Ui, initial: char, radius: u8) {
    egui::Frame::new()
        .fill(colors::AVATAR_BG)
        .corner_radius(egui::CornerRadius::same(radius))
        .inner_margin(egui::Margin::same(i8::try_from(radius / 2).unwrap_or(8)))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(initial.to_string())
                    .color(egui::Color32::WHITE)
                    .strong(),
            );
        });
}

fn unread_badge(ui: &mut egui::Ui, count: usize) {
    egui::Frame::new()
        .fill(colors::UNREAD_BADGE)
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::symmetric(6, 1))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(count.to_string())
                    .color(colors::TEXT_DARK)
                    .small()
                    .strong(),
            );
        });
}
