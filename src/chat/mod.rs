//! Chat widget core.
//!
//! - `types` — messages, panel state, errors, escaping
//! - `session` — per-tab session identifier
//! - `webhook` — outbound HTTP exchange
//! - `view` — page elements the widget drives
//! - `timer` — cancellable auto-close
//! - `widget` — the widget and its event loop

pub mod session;
pub mod timer;
pub mod types;
pub mod view;
pub mod webhook;
pub mod widget;

pub use session::{MemoryStorage, SessionStorage};
pub use types::{ChatError, ChatMessage, Origin, PanelState};
pub use view::ChatView;
pub use webhook::{HttpWebhook, WebhookClient, WebhookRequest};
pub use widget::{ChatWidget, WidgetEvent, WidgetHandle};
