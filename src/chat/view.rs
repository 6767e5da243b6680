//! The page elements the widget drives.
//!
//! A view owns the markup for the toggle control, close control, send
//! control, text input, and scrollable message list. The widget only reads
//! and writes their content and enabled/visible state through this trait.

use super::types::ChatMessage;

pub trait ChatView {
    /// Show or hide the floating panel.
    fn set_panel_visible(&mut self, visible: bool);

    fn focus_input(&mut self);

    /// Current text in the input control.
    fn input_value(&self) -> String;

    fn set_input_value(&mut self, value: &str);

    fn clear_input(&mut self);

    /// Enable or disable both the input control and the send control.
    fn set_input_enabled(&mut self, enabled: bool);

    /// Clear the "new message" indicator on the toggle control.
    fn clear_notification(&mut self);

    /// Render a message at the bottom of the list. Markup-producing views
    /// must render through [`ChatMessage::to_html`].
    fn append_message(&mut self, message: &ChatMessage);

    fn show_typing(&mut self);

    /// Remove the typing placeholder. No-op when it is not shown.
    fn hide_typing(&mut self);

    fn scroll_to_bottom(&mut self);

    /// Viewport width in logical pixels.
    fn viewport_width(&self) -> u32;
}
