//! Theme Module
//!
//! Color scheme and frame builders for the desktop client.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wachat::egui_app::theme::{colors, styles};
//!
//! styles::apply_global_theme(ctx);
//! styles::sidebar_frame().show(ui, |ui| {
//!     ui.colored_label(colors::TEXT_LIGHT, "Discussions");
//! });
//! ```

pub mod colors;
pub mod styles;
