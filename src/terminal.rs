//! Line-oriented chat view for a terminal.
//!
//! Messages are printed as plain text, never interpreted as markup, so no
//! escaping is needed here. Commands typed at the prompt map onto the same
//! [`WidgetEvent`]s the page's controls produce.

use std::io::Write;

use crate::chat::types::{ChatMessage, Origin};
use crate::chat::view::ChatView;
use crate::chat::widget::WidgetEvent;

pub const HELP: &str = "commands: /open /close /toggle /ask <text> /quit; anything else is sent as a message";

pub struct TerminalView<W: Write> {
    out: W,
    input: String,
    input_enabled: bool,
    typing: bool,
    viewport_width: u32,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, viewport_width: u32) -> Self {
        Self { out, input: String::new(), input_enabled: true, typing: false, viewport_width }
    }

    #[must_use]
    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::debug!(error = %e, "terminal write failed");
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn set_panel_visible(&mut self, visible: bool) {
        self.line(if visible { "-- chat open --" } else { "-- chat closed --" });
    }

    fn focus_input(&mut self) {}

    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        value.clone_into(&mut self.input);
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn clear_notification(&mut self) {}

    fn append_message(&mut self, message: &ChatMessage) {
        let who = match message.origin() {
            Origin::User => "you",
            Origin::Bot => "bot",
        };
        self.line(&format!("{who}> {}", message.content()));
    }

    fn show_typing(&mut self) {
        if !self.typing {
            self.typing = true;
            self.line("bot is typing...");
        }
    }

    fn hide_typing(&mut self) {
        self.typing = false;
    }

    fn scroll_to_bottom(&mut self) {}

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }
}

/// Translate one line typed at the prompt into widget events.
#[must_use]
pub fn parse_line(line: &str) -> Vec<WidgetEvent> {
    let trimmed = line.trim();
    match trimmed {
        "/open" => vec![WidgetEvent::Open],
        "/close" => vec![WidgetEvent::Close],
        "/toggle" => vec![WidgetEvent::Toggle],
        "/quit" | "/exit" => vec![WidgetEvent::Shutdown],
        _ => {
            if let Some(text) = trimmed.strip_prefix("/ask ") {
                return vec![WidgetEvent::Trigger(text.to_owned())];
            }
            vec![
                WidgetEvent::InputChanged(line.to_owned()),
                WidgetEvent::InputKey { key: "Enter".to_owned(), shift: false },
            ]
        }
    }
}

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;
