//! Cancellable delayed auto-close.
//!
//! Each schedule gets a generation number. The widget ignores
//! `AutoCloseDue` events whose generation is no longer current, so an event
//! already queued when the timer was cancelled is still harmless.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::widget::WidgetEvent;

#[derive(Default)]
pub struct AutoCloseTimer {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl AutoCloseTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending schedule with a new one firing after `delay`.
    pub fn schedule(&mut self, delay: Duration, events: mpsc::UnboundedSender<WidgetEvent>) -> u64 {
        self.cancel();
        let generation = self.generation;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(WidgetEvent::AutoCloseDue { generation });
        }));
        generation
    }

    /// Abort the pending schedule, if any, and invalidate its generation.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether `generation` belongs to the live schedule. Consumes it.
    pub fn take_if_current(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for AutoCloseTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "timer_test.rs"]
mod tests;
