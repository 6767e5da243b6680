//! Floating chat panel: visibility, message log, and the webhook exchange.
//!
//! DESIGN
//! ======
//! `ChatWidget` is owned by the page controller and is the only thing that
//! mutates chat state. UI callbacks, capability calls from other page
//! components, webhook completions, and auto-close timers all arrive as
//! [`WidgetEvent`]s on one channel and are dispatched one at a time by
//! [`ChatWidget::run`]. The webhook call runs in a spawned task and posts
//! `ReplyArrived` back, so the panel can still be toggled while a request is
//! pending.
//!
//! ERROR HANDLING
//! ==============
//! Failures never leave the send path. Every exchange ends in exactly one
//! bot message (reply or fallback), even if the webhook task panics. Once
//! the last outstanding exchange ends, the typing placeholder is removed and
//! input is re-enabled. Nothing is retried.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::session::{self, SessionStorage};
use super::timer::AutoCloseTimer;
use super::types::{ChatError, ChatMessage, PanelState};
use super::view::ChatView;
use super::webhook::{WebhookClient, WebhookRequest};
use crate::config::WidgetConfig;

// =============================================================================
// EVENTS
// =============================================================================

/// Everything the widget reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Toggle control clicked, or a collaborator asked to toggle.
    Toggle,
    Open,
    /// Close control clicked, or a collaborator asked to close.
    Close,
    /// The input control's text changed.
    InputChanged(String),
    /// Send control clicked; sends the current input value.
    SendClicked,
    /// Key pressed in the input control.
    InputKey { key: String, shift: bool },
    /// Open the panel and send `text` as if typed.
    Trigger(String),
    /// The outbound call finished.
    ReplyArrived(Result<String, ChatError>),
    /// An auto-close timer fired.
    AutoCloseDue { generation: u64 },
    /// Stop the event loop.
    Shutdown,
}

// =============================================================================
// HANDLE
// =============================================================================

/// Narrow capability handed to other page components.
#[derive(Clone, Debug)]
pub struct WidgetHandle {
    events: mpsc::UnboundedSender<WidgetEvent>,
}

impl WidgetHandle {
    pub fn open(&self) {
        self.send(WidgetEvent::Open);
    }

    pub fn close(&self) {
        self.send(WidgetEvent::Close);
    }

    pub fn toggle(&self) {
        self.send(WidgetEvent::Toggle);
    }

    pub fn trigger(&self, text: impl Into<String>) {
        self.send(WidgetEvent::Trigger(text.into()));
    }

    pub fn shutdown(&self) {
        self.send(WidgetEvent::Shutdown);
    }

    /// Forward a raw UI event (used by views wiring their controls).
    pub fn send(&self, event: WidgetEvent) {
        if self.events.send(event).is_err() {
            debug!("chat widget event loop gone; event dropped");
        }
    }
}

// =============================================================================
// WIDGET
// =============================================================================

pub struct ChatWidget<V> {
    view: V,
    storage: Box<dyn SessionStorage>,
    webhook: Arc<dyn WebhookClient>,
    config: WidgetConfig,
    panel: PanelState,
    /// Exchanges sent but not yet answered.
    in_flight: usize,
    messages: Vec<ChatMessage>,
    events: mpsc::UnboundedSender<WidgetEvent>,
    auto_close: AutoCloseTimer,
}

impl<V: ChatView> ChatWidget<V> {
    /// Build a closed widget and the receiving end of its event channel.
    ///
    /// Sending messages spawns tasks, so the widget must be driven from
    /// inside a Tokio runtime.
    pub fn new(
        mut view: V,
        storage: Box<dyn SessionStorage>,
        webhook: Arc<dyn WebhookClient>,
        config: WidgetConfig,
    ) -> (Self, mpsc::UnboundedReceiver<WidgetEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        view.set_panel_visible(false);
        let widget = Self {
            view,
            storage,
            webhook,
            config,
            panel: PanelState::Closed,
            in_flight: 0,
            messages: Vec::new(),
            events,
            auto_close: AutoCloseTimer::new(),
        };
        (widget, rx)
    }

    #[must_use]
    pub fn handle(&self) -> WidgetHandle {
        WidgetHandle { events: self.events.clone() }
    }

    /// Dispatch events until `Shutdown` arrives. An exchange in flight at
    /// that point is finished first. Returns the widget so the caller can
    /// inspect or reuse it.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<WidgetEvent>) -> Self {
        let mut stopping = false;
        while let Some(event) = events.recv().await {
            if event == WidgetEvent::Shutdown {
                stopping = true;
            } else {
                self.dispatch(event);
            }
            if stopping && self.in_flight == 0 {
                break;
            }
        }
        self.auto_close.cancel();
        self
    }

    pub fn dispatch(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Toggle => self.toggle(),
            WidgetEvent::Open => self.open(),
            WidgetEvent::Close => self.close(),
            WidgetEvent::InputChanged(_) | WidgetEvent::SendClicked | WidgetEvent::InputKey { .. }
                if self.in_flight > 0 =>
            {
                debug!("input disabled while awaiting reply; event dropped");
            }
            WidgetEvent::InputChanged(text) => self.view.set_input_value(&text),
            WidgetEvent::SendClicked => self.send_input(),
            WidgetEvent::InputKey { key, shift } => {
                if key == "Enter" && !shift {
                    self.send_input();
                }
            }
            WidgetEvent::Trigger(text) => self.trigger(&text),
            WidgetEvent::ReplyArrived(outcome) => self.finish_exchange(outcome),
            WidgetEvent::AutoCloseDue { generation } => {
                if self.auto_close.take_if_current(generation) && self.panel.is_open() {
                    debug!("auto-closing chat panel on small viewport");
                    self.set_closed();
                }
            }
            WidgetEvent::Shutdown => {}
        }
    }

    // -------------------------------------------------------------------------
    // Panel
    // -------------------------------------------------------------------------

    pub fn open(&mut self) {
        if self.panel.is_open() {
            return;
        }
        self.panel = PanelState::Open;
        self.view.set_panel_visible(true);
        self.view.focus_input();
        self.view.clear_notification();
        self.view.scroll_to_bottom();
        debug!("chat panel opened");
    }

    /// Close the panel. Also cancels a pending auto-close.
    pub fn close(&mut self) {
        self.auto_close.cancel();
        self.set_closed();
    }

    pub fn toggle(&mut self) {
        if self.panel.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn trigger(&mut self, text: &str) {
        self.open();
        self.send_message(text);
    }

    pub fn cancel_auto_close(&mut self) {
        self.auto_close.cancel();
    }

    fn set_closed(&mut self) {
        if !self.panel.is_open() {
            return;
        }
        self.panel = PanelState::Closed;
        self.view.set_panel_visible(false);
        debug!("chat panel closed");
    }

    // -------------------------------------------------------------------------
    // Exchange
    // -------------------------------------------------------------------------

    fn send_input(&mut self) {
        let text = self.view.input_value();
        self.send_message(&text);
    }

    /// Start an exchange with the trimmed `text`. Returns `false` (and does
    /// nothing) when the text is empty after trimming.
    pub fn send_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.append(ChatMessage::user(text));
        self.view.clear_input();
        self.view.set_input_enabled(false);
        self.in_flight += 1;
        self.view.show_typing();
        self.view.scroll_to_bottom();

        let session_id = self.session_id();
        info!(session_id = %session_id, chars = text.chars().count(), "sending chat message");
        let request = WebhookRequest::new(text, self.config.user_agent.clone(), session_id);
        let webhook = Arc::clone(&self.webhook);
        let events = self.events.clone();
        tokio::spawn(async move {
            // Inner task so a panicking client still produces a completion.
            let outcome = match tokio::spawn(async move { webhook.send(&request).await }).await {
                Ok(outcome) => outcome,
                Err(e) => Err(ChatError::Request(format!("webhook task failed: {e}"))),
            };
            let _ = events.send(WidgetEvent::ReplyArrived(outcome));
        });
        true
    }

    fn finish_exchange(&mut self, outcome: Result<String, ChatError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.view.hide_typing();
        }
        let message = match outcome {
            Ok(reply) => ChatMessage::bot(reply),
            Err(e) => {
                warn!(error = %e, "chat webhook exchange failed");
                ChatMessage::bot(e.fallback_text())
            }
        };
        self.append(message);
        self.maybe_schedule_auto_close();

        if self.in_flight == 0 {
            self.view.set_input_enabled(true);
            self.view.focus_input();
        }
    }

    fn append(&mut self, message: ChatMessage) {
        self.view.append_message(&message);
        self.view.scroll_to_bottom();
        self.messages.push(message);
    }

    fn maybe_schedule_auto_close(&mut self) {
        let width = self.view.viewport_width();
        if width > self.config.mobile_breakpoint_px {
            return;
        }
        debug!(width, delay_ms = self.config.auto_close_delay.as_millis(), "scheduling chat auto-close");
        self.auto_close.schedule(self.config.auto_close_delay, self.events.clone());
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Stored session id for this tab, generated on first use.
    pub fn session_id(&mut self) -> String {
        session::session_id(self.storage.as_mut())
    }

    #[must_use]
    pub fn panel(&self) -> PanelState {
        self.panel
    }

    #[must_use]
    pub fn is_awaiting_response(&self) -> bool {
        self.in_flight > 0
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn auto_close_pending(&self) -> bool {
        self.auto_close.is_pending()
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
