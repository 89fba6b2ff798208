use eframe::egui;

use crate::egui_app::messaging::render_messaging_view;
use crate::egui_app::notice::{NoticeKind, TransientNotice};
use crate::egui_app::state::{AppState, AppView};
use crate::egui_app::theme::{colors, styles};

pub mod auth_view;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_panel")
        .frame(styles::top_bar_frame())
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(
                    colors::TEXT_LIGHT,
                    egui::RichText::new("💬 wachat").size(18.0).strong(),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(8.0);
                    if state.current_view == AppView::Messaging {
                        if ui.button("Déconnexion").clicked() {
                            state.logout();
                        }
                        if let Some(user) = &state.auth_state.user {
                            ui.colored_label(colors::TEXT_LIGHT, format!("@{}", user.username));
                        }
                    }
                });
            });
        });
}

pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState) {
    let frame = egui::Frame::default()
        .fill(colors::BG_DARK)
        .inner_margin(egui::Margin::same(0));

    egui::CentralPanel::default()
        .frame(frame)
        .show(ctx, |ui| match state.current_view {
            AppView::Auth => auth_view::render(ui, state),
            AppView::Messaging => render_messaging_view(ui, &mut state.messaging_state),
        });
}

/// Bottom-centered notice, gone once its timer runs out
pub fn render_snackbar(ctx: &egui::Context, snackbar: &TransientNotice) {
    let Some(notice) = snackbar.current() else {
        return;
    };
    let fill = match notice.kind {
        NoticeKind::Success => colors::TOP_BAR_BG,
        NoticeKind::Error => colors::ERROR,
        NoticeKind::Info => colors::INFO,
    };

    egui::Area::new(egui::Id::new("snackbar"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            styles::snackbar_frame(fill).show(ui, |ui| {
                ui.colored_label(egui::Color32::WHITE, notice.text);
            });
        });

    if let Some(remaining) = snackbar.remaining() {
        ctx.request_repaint_after(remaining);
    }
}
