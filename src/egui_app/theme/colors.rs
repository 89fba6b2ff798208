//! Color Constants
//!
//! WhatsApp-style palette: dark teal chrome, green accents, beige chat
//! background with green outgoing bubbles.

use eframe::egui::Color32;

/// Sidebar and panel background
pub const SIDEBAR_BG: Color32 = Color32::from_rgb(0x11, 0x1B, 0x21);

/// Contact list background
pub const CHAT_LIST_BG: Color32 = Color32::from_rgb(0x11, 0x1B, 0x21);

/// Hovered or selected contact row
pub const CHAT_LIST_HOVER: Color32 = Color32::from_rgb(0x2A, 0x39, 0x42);

/// Top bar and chat header
pub const TOP_BAR_BG: Color32 = Color32::from_rgb(0x07, 0x5E, 0x54);

pub const CHAT_HEADER_BG: Color32 = Color32::from_rgb(0x20, 0x2C, 0x33);

/// Chat pane background
pub const MAIN_CHAT_BG: Color32 = Color32::from_rgb(0xEF, 0xEA, 0xE2);

pub const BUBBLE_OUTGOING: Color32 = Color32::from_rgb(0xD9, 0xFD, 0xD3);

pub const BUBBLE_INCOMING: Color32 = Color32::from_rgb(0xFF, 0xFF, 0xFF);

/// Failed outgoing bubble
pub const BUBBLE_FAILED: Color32 = Color32::from_rgb(0xFD, 0xE2, 0xE2);

pub const BUBBLE_BORDER: Color32 = Color32::from_rgb(0xD1, 0xD7, 0xDB);

pub const INPUT_BAR_BG: Color32 = Color32::from_rgb(0xF0, 0xF2, 0xF5);

pub const INPUT_BAR_BORDER: Color32 = Color32::from_rgb(0xD1, 0xD7, 0xDB);

/// Text on dark backgrounds
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xE9, 0xED, 0xEF);

/// Text on light backgrounds
pub const TEXT_DARK: Color32 = Color32::from_rgb(0x11, 0x1B, 0x21);

pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x86, 0x96, 0xA0);

/// WhatsApp green
pub const ACCENT: Color32 = Color32::from_rgb(0x25, 0xD3, 0x66);

pub const SUCCESS: Color32 = Color32::from_rgb(0x25, 0xD3, 0x66);

pub const ERROR: Color32 = Color32::from_rgb(0xEF, 0x44, 0x44);

pub const INFO: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);

pub const UNREAD_BADGE: Color32 = Color32::from_rgb(0x25, 0xD3, 0x66);

pub const TIMESTAMP: Color32 = Color32::from_rgb(0x66, 0x78, 0x81);

/// Blue double check for read messages
pub const TICK_READ: Color32 = Color32::from_rgb(0x53, 0xBD, 0xEB);

pub const TICK_PENDING: Color32 = Color32::from_rgb(0x8C, 0x96, 0x9C);

pub const BG_DARK: Color32 = Color32::from_rgb(0x0B, 0x14, 0x1A);

/// Avatar circle behind the contact initial
pub const AVATAR_BG: Color32 = Color32::from_rgb(0x6B, 0x7C, 0x85);
