//! Group Panel Component
//!
//! Window listing the user's groups with a create/edit form. Members are
//! picked among the contacts; the admin is always kept.

use eframe::egui;

use crate::egui_app::messaging::state::{GroupForm, MessagingState};
use crate::egui_app::theme::colors;
use crate::shared::messaging::{Group, UserId};

pub fn render(ctx: &egui::Context, state: &mut MessagingState) {
    if !state.show_group_panel {
        return;
    }

    let mut open = true;
    egui::Window::new("Groupes")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_size(egui::vec2(380.0, 460.0))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            render_group_list(ui, state);
            ui.separator();
            render_form(ui, state);
        });

    if !open {
        state.show_group_panel = false;
        state.group_form = GroupForm::default();
    }
}

fn render_group_list(ui: &mut egui::Ui, state: &mut MessagingState) {
    let me = state.current_user().map(|u| u.id);
    let groups: Vec<Group> = state
        .groups
        .iter()
        .filter(|g| me.as_ref().is_some_and(|id| g.is_member(id)))
        .cloned()
        .collect();

    if groups.is_empty() {
        ui.colored_label(colors::TEXT_SECONDARY, "Aucun groupe");
        return;
    }

    let mut edit = None;
    let mut removal = None;
    egui::ScrollArea::vertical()
        .max_height(200.0)
        .show(ui, |ui| {
            for group in &groups {
                let is_admin = me.as_ref().is_some_and(|id| group.is_admin(id));
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&group.name).strong());
                    ui.colored_label(
                        colors::TEXT_SECONDARY,
                        format!("{} membres", group.members.len()),
                    );
                    if is_admin && ui.small_button("Modifier").clicked() {
                        edit = Some(group.clone());
                    }
                });
                for member in &group.members {
                    ui.horizontal(|ui| {
                        ui.add_space(12.0);
                        ui.label(member_name(state, member));
                        if group.is_admin(member) {
                            ui.colored_label(colors::ACCENT, "admin");
                        } else if is_admin && ui.small_button("Retirer").clicked() {
                            removal = Some((group.id.clone(), member.clone()));
                        }
                    });
                }
                ui.add_space(6.0);
            }
        });

    if let Some(group) = edit {
        state.group_form = GroupForm::for_group(&group);
    }
    if let Some((group, member)) = removal {
        state.remove_group_member(group, member);
    }
}

fn render_form(ui: &mut egui::Ui, state: &mut MessagingState) {
    let title = if state.group_form.editing.is_some() {
        "Modifier le groupe"
    } else {
        "Nouveau groupe"
    };
    ui.label(egui::RichText::new(title).strong());
    ui.add_space(4.0);

    ui.add(egui::TextEdit::singleline(&mut state.group_form.name).hint_text("Nom du groupe"));
    ui.add_space(4.0);

    let candidates: Vec<(UserId, String)> = state
        .contacts
        .iter()
        .map(|e| (e.contact.id.clone(), e.contact.display_name.clone()))
        .collect();
    egui::ScrollArea::vertical()
        .id_salt("group_members")
        .max_height(140.0)
        .show(ui, |ui| {
            for (id, name) in candidates {
                let mut checked = state.group_form.members.contains(&id);
                if ui.checkbox(&mut checked, name).changed() {
                    if checked {
                        state.group_form.members.insert(id);
                    } else {
                        state.group_form.members.remove(&id);
                    }
                }
            }
        });

    if let Some(error) = &state.group_form.error {
        ui.colored_label(colors::ERROR, error);
    }

    ui.horizontal(|ui| {
        if state.pending_group.is_some() {
            ui.spinner();
        } else if ui.button("Enregistrer").clicked() {
            state.submit_group();
        }
        if state.group_form.editing.is_some() && ui.button("Annuler").clicked() {
            state.group_form = GroupForm::default();
        }
    });
}

fn member_name(state: &MessagingState, member: &UserId) -> String {
    if state.current_user().is_some_and(|u| &u.id == member) {
        return "Vous".to_string();
    }
    state
        .contacts
        .iter()
        .find(|e| &e.contact.id == member)
        .map(|e| e.contact.display_name.clone())
        .unwrap_or_else(|| member.to_string())
}
