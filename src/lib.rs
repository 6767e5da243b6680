//! Chat widget for the Lost & Found site.
//!
//! The widget core is headless: it drives a [`chat::ChatView`] and talks to
//! a [`chat::WebhookClient`]. `terminal` provides a line-oriented view used
//! by the bundled binary.

pub mod chat;
pub mod config;
pub mod terminal;
