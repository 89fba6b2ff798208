//! Theme Styling Functions
//!
//! Frame builders shared by the sidebar, chat pane and dialogs.

use eframe::egui::{self, Color32, CornerRadius, Stroke};

use super::colors;

/// Apply the global theme to the egui context
pub fn apply_global_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.window_fill = colors::SIDEBAR_BG;
    style.visuals.window_stroke = Stroke::new(1.0, colors::CHAT_LIST_HOVER);
    style.visuals.panel_fill = colors::SIDEBAR_BG;

    style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);
    style.visuals.widgets.inactive.bg_fill = colors::CHAT_HEADER_BG;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);
    style.visuals.widgets.hovered.bg_fill = colors::CHAT_LIST_HOVER;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);
    style.visuals.widgets.active.bg_fill = colors::TOP_BAR_BG;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);

    style.visuals.selection.bg_fill = colors::TOP_BAR_BG;
    style.visuals.selection.stroke = Stroke::new(1.0, colors::TEXT_LIGHT);
    style.visuals.extreme_bg_color = colors::CHAT_HEADER_BG;

    ctx.set_style(style);
}

pub fn sidebar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::SIDEBAR_BG)
        .inner_margin(egui::Margin::same(0))
}

pub fn chat_area_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::MAIN_CHAT_BG)
        .inner_margin(egui::Margin::same(0))
}

pub fn top_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::TOP_BAR_BG)
        .inner_margin(egui::Margin::symmetric(12, 8))
}

pub fn chat_header_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::CHAT_HEADER_BG)
        .inner_margin(egui::Margin::symmetric(16, 10))
}

pub fn input_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::INPUT_BAR_BG)
        .stroke(Stroke::new(1.0, colors::INPUT_BAR_BORDER))
        .inner_margin(egui::Margin::symmetric(12, 8))
}

/// Outgoing bubbles keep their tail on the right
pub fn outgoing_bubble_frame(failed: bool) -> egui::Frame {
    let fill = if failed {
        colors::BUBBLE_FAILED
    } else {
        colors::BUBBLE_OUTGOING
    };
    egui::Frame::new()
        .fill(fill)
        .corner_radius(CornerRadius {
            nw: 8,
            ne: 8,
            sw: 8,
            se: 2,
        })
        .inner_margin(egui::Margin::symmetric(10, 6))
}

pub fn incoming_bubble_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::BUBBLE_INCOMING)
        .stroke(Stroke::new(1.0, colors::BUBBLE_BORDER))
        .corner_radius(CornerRadius {
            nw: 8,
            ne: 8,
            sw: 2,
            se: 8,
        })
        .inner_margin(egui::Margin::symmetric(10, 6))
}

pub fn contact_item_frame(is_selected: bool, is_hovered: bool) -> egui::Frame {
    let bg_color = if is_selected {
        colors::CHAT_LIST_HOVER
    } else if is_hovered {
        Color32::from_rgba_unmultiplied(
            colors::CHAT_LIST_HOVER.r(),
            colors::CHAT_LIST_HOVER.g(),
            colors::CHAT_LIST_HOVER.b(),
            128,
        )
    } else {
        colors::CHAT_LIST_BG
    };

    egui::Frame::new()
        .fill(bg_color)
        .inner_margin(egui::Margin::symmetric(12, 10))
}

/// Bottom-of-window notice
pub fn snackbar_frame(fill: Color32) -> egui::Frame {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(16, 10))
        .shadow(egui::epaint::Shadow {
            offset: [0, 4],
            blur: 12,
            spread: 0,
            color: Color32::from_black_alpha(60),
        })
}
