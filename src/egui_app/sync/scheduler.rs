//! # Poll Scheduler
//!
//! Owns the background timers of a sync component: one recurring poll loop
//! and any number of one-shot delayed tasks. Both are plain tokio tasks;
//! stopping aborts them on the spot, without awaiting anything.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A single recurring poll loop
///
/// The first tick fires one `period` after [`PollScheduler::start`], like a
/// browser `setInterval`. Ticks that overrun are delayed rather than bunched.
#[derive(Debug, Default)]
pub struct PollScheduler {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start polling, replacing any loop already running
    ///
    /// The loop ends on its own when `tick` returns `false`.
    pub fn start<F, Fut>(&self, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !tick().await {
                    break;
                }
            }
        });

        if let Ok(mut task) = self.task.lock() {
            if let Some(previous) = task.replace(handle) {
                previous.abort();
            }
        }
    }

    pub fn stop(&self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .map(|task| task.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One-shot delayed tasks that can be cancelled together
#[derive(Debug, Default)]
pub struct TimerSet {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`
    pub fn schedule<Fut>(&self, delay: Duration, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        if let Ok(mut handles) = self.handles.lock() {
            handles.retain(|h| !h.is_finished());
            handles.push(handle);
        }
    }

    pub fn cancel_all(&self) {
        if let Ok(mut handles) = self.handles.lock() {
            for handle in handles.drain(..) {
                handle.abort();
            }
        }
    }

    /// Timers that have not fired yet
    pub fn pending(&self) -> usize {
        self.handles
            .lock()
            .map(|handles| handles.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
