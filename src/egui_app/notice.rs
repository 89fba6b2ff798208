//! Transient Notices
//!
//! A message that disappears on its own after a fixed duration: the inline
//! send error under the chat input and the snackbar at the bottom of the
//! window. Expiry is computed against the tokio clock, so paused-time tests
//! can advance past it.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Default)]
struct Slot {
    notice: Option<Notice>,
    expires_at: Option<Instant>,
}

/// Cloneable handle to a single self-clearing notice slot
///
/// Showing a new notice replaces the current one and restarts the timer.
#[derive(Debug, Clone)]
pub struct TransientNotice {
    slot: Arc<Mutex<Slot>>,
    duration: Duration,
}

impl TransientNotice {
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            duration,
        }
    }

    pub fn show(&self, text: impl Into<String>, kind: NoticeKind) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.notice = Some(Notice {
                text: text.into(),
                kind,
            });
            slot.expires_at = Some(Instant::now() + self.duration);
        }
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show(text, NoticeKind::Info);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text, NoticeKind::Error);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text, NoticeKind::Success);
    }

    /// The visible notice, or `None` once it has expired
    pub fn current(&self) -> Option<Notice> {
        let mut slot = self.slot.lock().ok()?;
        match slot.expires_at {
            Some(at) if Instant::now() < at => slot.notice.clone(),
            Some(_) => {
                slot.notice = None;
                slot.expires_at = None;
                None
            }
            None => None,
        }
    }

    pub fn text(&self) -> Option<String> {
        self.current().map(|n| n.text)
    }

    /// Time left before the notice clears; used to schedule a repaint
    pub fn remaining(&self) -> Option<Duration> {
        let slot = self.slot.lock().ok()?;
        slot.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
            .filter(|d| !d.is_zero())
    }

    pub fn dismiss(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.notice = None;
            slot.expires_at = None;
        }
    }
}
