//! Message List Component
//!
//! The open conversation in time order, with a separator at each new day.

use chrono::{Local, NaiveDate};
use eframe::egui;

use super::message_bubble;
use crate::egui_app::messaging::conversation_sync::SyncPhase;
use crate::egui_app::messaging::state::MessagingState;
use crate::egui_app::theme::colors;

pub fn render(ui: &mut egui::Ui, state: &mut MessagingState) {
    let user = state.current_user().map(|u| u.id);
    let mut resend = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add_space(8.0);

            if state.snapshot.phase == SyncPhase::Loading {
                ui.vertical_centered(|ui| ui.spinner());
            } else if state.snapshot.messages.is_empty() {
                render_empty_state(ui);
            } else {
                let mut last_date: Option<NaiveDate> = None;
                for message in &state.snapshot.messages {
                    let date = message.created_at.with_timezone(&Local).date_naive();
                    if last_date != Some(date) {
                        render_date_separator(ui, date);
                        last_date = Some(date);
                    }

                    let is_own = user.as_ref().is_some_and(|id| message.is_from(id));
                    if message_bubble::render(ui, message, is_own) {
                        resend = Some(message.id.clone());
                    }
                }
            }

            ui.add_space(8.0);
        });

    if let Some(id) = resend {
        state.resend(id);
    }
}

fn render_empty_state(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.colored_label(colors::TIMESTAMP, "Aucun message");
        ui.add_space(8.0);
        ui.colored_label(colors::TIMESTAMP, "Envoyez un message pour démarrer la discussion");
    });
}

fn render_date_separator(ui: &mut egui::Ui, date: NaiveDate) {
    ui.add_space(12.0);
    ui.vertical_centered(|ui| {
        egui::Frame::new()
            .fill(colors::BUBBLE_INCOMING)
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::symmetric(10, 4))
            .show(ui, |ui| {
                ui.colored_label(colors::TIMESTAMP, format_date(date, Local::now().date_naive()));
            });
    });
    ui.add_space(12.0);
}

fn format_date(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        0 => "Aujourd'hui".to_string(),
        1 => "Hier".to_string(),
        _ => date.format("%d/%m/%Y").to_string(),
    }
}
