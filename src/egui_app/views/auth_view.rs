use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::colors;

const INPUT_WIDTH: f32 = 280.0;
const LABEL_WIDTH: f32 = 90.0;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let available_rect = ui.available_rect_before_wrap();
    ui.painter().rect_filled(available_rect, 0.0, colors::BG_DARK);

    ui.scope_builder(egui::UiBuilder::new().max_rect(available_rect), |ui| {
        ui.vertical_centered(|ui| {
            let top_space = (available_rect.height() - 300.0).max(0.0) / 2.0;
            ui.add_space(top_space);

            ui.label(
                egui::RichText::new("💬 wachat")
                    .size(32.0)
                    .strong()
                    .color(colors::ACCENT),
            );
            ui.add_space(20.0);

            let title = if state.is_register_mode {
                "Créer un compte"
            } else {
                "Connexion"
            };
            ui.label(egui::RichText::new(title).size(24.0).color(colors::TEXT_LIGHT));
            ui.add_space(20.0);

            if let Some(error) = &state.auth_state.error {
                ui.label(egui::RichText::new(error).color(colors::ERROR));
                ui.add_space(10.0);
            }

            let offset = (available_rect.width() - INPUT_WIDTH - LABEL_WIDTH - 20.0) / 2.0;
            field(ui, offset, "Utilisateur :", &mut state.username_input);
            ui.add_space(8.0);
            field(ui, offset, "Téléphone :", &mut state.phone_input);
            ui.add_space(20.0);

            ui.horizontal(|ui| {
                let button_width = 140.0;
                ui.add_space((available_rect.width() - button_width * 2.0 - 10.0) / 2.0);

                let primary = if state.is_register_mode {
                    "S'inscrire"
                } else {
                    "Se connecter"
                };
                let submit = egui::Button::new(
                    egui::RichText::new(primary).color(colors::TEXT_DARK),
                )
                .fill(colors::ACCENT);
                let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                let busy = state.auth_state.loading;
                if (ui.add_sized([button_width, 32.0], submit).clicked() || enter) && !busy {
                    if state.is_register_mode {
                        state.handle_register();
                    } else {
                        state.handle_login();
                    }
                }

                ui.add_space(10.0);

                let secondary = if state.is_register_mode {
                    "Retour"
                } else {
                    "Créer un compte"
                };
                if ui
                    .add_sized(
                        [button_width, 32.0],
                        egui::Button::new(egui::RichText::new(secondary).color(colors::TEXT_LIGHT)),
                    )
                    .clicked()
                {
                    state.toggle_auth_mode();
                }
            });

            if state.auth_state.loading {
                ui.add_space(15.0);
                ui.spinner();
            }
        });
    });
}

fn field(ui: &mut egui::Ui, offset: f32, label: &str, value: &mut String) {
    ui.horizontal(|ui| {
        ui.add_space(offset);
        ui.add_sized(
            [LABEL_WIDTH, 24.0],
            egui::Label::new(egui::RichText::new(label).color(colors::TEXT_SECONDARY)),
        );
        ui.add_sized(
            [INPUT_WIDTH, 28.0],
            egui::TextEdit::singleline(value).text_color(colors::TEXT_LIGHT),
        );
    });
}
