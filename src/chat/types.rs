//! Chat types: messages, panel state, and errors.

// =============================================================================
// FALLBACK TEXT
// =============================================================================

/// Shown when the webhook could not be reached, returned a non-2xx status,
/// or answered with something that is not JSON.
pub const FALLBACK_REQUEST_FAILED: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

/// Shown when the webhook answered but gave no usable `reply`.
pub const FALLBACK_REPLY_MISSING: &str = "Sorry, I couldn't process your request. Please try again.";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by the outbound webhook exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// The HTTP request never completed.
    #[error("webhook request failed: {0}")]
    Request(String),

    /// The webhook returned a non-success HTTP status.
    #[error("webhook response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("webhook response parse failed: {0}")]
    Parse(String),

    /// The response JSON had no non-empty `reply` string.
    #[error("webhook response missing reply field")]
    MissingReply,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ChatError {
    /// Bot-side apology shown in place of a reply.
    #[must_use]
    pub fn fallback_text(&self) -> &'static str {
        match self {
            Self::MissingReply => FALLBACK_REPLY_MISSING,
            Self::Request(_) | Self::Status { .. } | Self::Parse(_) | Self::HttpClientBuild(_) => {
                FALLBACK_REQUEST_FAILED
            }
        }
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Who authored a message in the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    User,
    Bot,
}

impl Origin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// A single entry in the chat log. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    content: String,
    origin: Origin,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { content: content.into(), origin: Origin::User }
    }

    #[must_use]
    pub fn bot(content: impl Into<String>) -> Self {
        Self { content: content.into(), origin: Origin::Bot }
    }

    /// The literal, unescaped text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Markup for the message list. Content is always escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let origin = self.origin.as_str();
        format!(
            "<div class=\"chat-message chat-message--{origin}\"><div class=\"chat-message__content\">{}</div></div>",
            html_escape(&self.content)
        )
    }
}

/// Escape HTML special characters so text renders literally.
#[must_use]
pub fn html_escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

// =============================================================================
// PANEL STATE
// =============================================================================

/// Visibility of the floating chat panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

impl PanelState {
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
