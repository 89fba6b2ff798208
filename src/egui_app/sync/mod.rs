//! # Background Timers
//!
//! The client refreshes state only by polling. Two components poll: the
//! conversation sync engine (active conversation, every 2 s by default) and
//! the inbox watcher (every message addressed to the user, every 3 s). Both
//! own a [`PollScheduler`]; the engine also keeps a [`TimerSet`] for the
//! delayed `delivered` transitions of its sent messages.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use wachat::egui_app::sync::PollScheduler;
//!
//! # async fn example() {
//! let scheduler = PollScheduler::new();
//! scheduler.start(Duration::from_secs(2), || async {
//!     // fetch, diff, render...
//!     true
//! });
//! scheduler.stop();
//! # }
//! ```

pub mod scheduler;

pub use scheduler::{PollScheduler, TimerSet};
