//! Contact List Component
//!
//! The filtered contacts, most recent conversation first.

use eframe::egui;

use super::contact_item;
use crate::egui_app::messaging::state::MessagingState;
use crate::egui_app::theme::colors;

pub fn render(ui: &mut egui::Ui, state: &mut MessagingState) {
    let entries = state.filtered_contacts();
    if entries.is_empty() {
        render_empty_state(ui, state);
        return;
    }

    let active = state.snapshot.active_contact.clone();
    let mut clicked = None;
    for entry in &entries {
        let is_selected = active.as_ref() == Some(&entry.contact.id);
        if contact_item::render(ui, entry, is_selected) {
            clicked = Some(entry.contact.id.clone());
        }
    }

    // apply after the loop; selecting mutates the state
    if let Some(id) = clicked {
        if active.as_ref() != Some(&id) {
            state.select_contact(id);
        }
    }
}

fn render_empty_state(ui: &mut egui::Ui, state: &MessagingState) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);

        if state.search_query.is_empty() {
            ui.colored_label(colors::TEXT_LIGHT, "Aucun contact");
            ui.add_space(8.0);
            ui.colored_label(colors::TEXT_SECONDARY, "Ajoutez-en un avec le bouton ➕");
        } else {
            ui.colored_label(colors::TEXT_LIGHT, "Aucun résultat");
            ui.add_space(8.0);
            ui.colored_label(
                colors::TEXT_SECONDARY,
                format!("Rien pour \"{}\"", state.search_query),
            );
        }
    });
}
