//! Sleep timer countdown.
//!
//! The countdown re-derives the remaining time from the end instant on every
//! tick instead of decrementing a counter, so a delayed or coalesced tick
//! cannot stretch the timer. Expiry pauses the transport exactly once.

use crate::transport::Transport;
use audiofolio_core::Duration;
use log::info;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};

/// Countdown that pauses the transport when it expires
pub struct SleepTimer {
    remaining: Arc<watch::Sender<Option<Duration>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SleepTimer {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            remaining: Arc::new(tx),
            task: Mutex::new(None),
        }
    }

    /// Starts (or restarts) the countdown.
    ///
    /// A running countdown is aborted first; only one timer is active at a
    /// time.
    pub fn start(&self, duration: Duration, transport: Arc<dyn Transport>) {
        self.stop_task();

        let end = Instant::now() + std::time::Duration::from_millis(duration.as_millis());
        let remaining = Arc::clone(&self.remaining);
        remaining.send_replace(Some(duration));

        let handle = tokio::spawn(async move {
            let mut ticker = interval(std::time::Duration::from_secs(1));
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let left = end.saturating_duration_since(Instant::now());

                if left.is_zero() {
                    info!("Sleep timer expired, pausing playback");
                    transport.pause();
                    remaining.send_replace(None);
                    break;
                }

                remaining.send_replace(Some(Duration::from(left)));
            }
        });

        if let Ok(mut guard) = self.task.lock() {
            *guard = Some(handle);
        }
    }

    /// Aborts the countdown and clears the remaining time
    pub fn cancel(&self) {
        self.stop_task();
        self.remaining.send_replace(None);
    }

    /// Remaining time, or None when no timer is running
    pub fn remaining(&self) -> Option<Duration> {
        *self.remaining.borrow()
    }

    /// Watch the remaining time as it counts down
    pub fn subscribe(&self) -> watch::Receiver<Option<Duration>> {
        self.remaining.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.remaining().is_some()
    }

    fn stop_task(&self) {
        if let Ok(mut guard) = self.task.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

impl Default for SleepTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SleepTimer {
    fn drop(&mut self) {
        self.stop_task();
    }
}
