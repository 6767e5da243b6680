//! Chat widget configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_MOBILE_BREAKPOINT_PX: u32 = 576;
pub const DEFAULT_AUTO_CLOSE_MS: u64 = 3000;
pub const DEFAULT_USER_AGENT: &str = concat!("lostfound-chat/", env!("CARGO_PKG_VERSION"));

/// Errors produced while building a [`WidgetConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The webhook endpoint is not configured.
    #[error("missing webhook URL: env var {var} not set")]
    MissingWebhookUrl { var: &'static str },

    /// The webhook endpoint is not an absolute http(s) URL.
    #[error("invalid webhook URL '{url}': {reason}")]
    InvalidWebhookUrl { url: String, reason: String },

    /// A numeric setting could not be parsed.
    #[error("invalid value for {var}: '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Fixed endpoint receiving every outbound chat message.
    pub webhook_url: String,
    /// Reported as `user_agent` in the webhook payload.
    pub user_agent: String,
    /// Viewports at or below this width auto-close after a bot reply.
    pub mobile_breakpoint_px: u32,
    pub auto_close_delay: Duration,
    /// `None` leaves the HTTP client's default (no timeout).
    pub request_timeout: Option<Duration>,
}

impl WidgetConfig {
    /// Config with defaults for everything except the endpoint.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, ConfigError> {
        let webhook_url = validate_webhook_url(webhook_url.into())?;
        Ok(Self {
            webhook_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
            auto_close_delay: Duration::from_millis(DEFAULT_AUTO_CLOSE_MS),
            request_timeout: None,
        })
    }

    /// Build typed widget config from environment variables.
    ///
    /// Required:
    /// - `CHAT_WEBHOOK_URL`
    ///
    /// Optional:
    /// - `CHAT_USER_AGENT`: defaults to `lostfound-chat/<version>`
    /// - `CHAT_MOBILE_BREAKPOINT_PX`: default 576
    /// - `CHAT_AUTO_CLOSE_MS`: default 3000
    /// - `CHAT_REQUEST_TIMEOUT_SECS`: unset means no timeout
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_url(None)
    }

    /// Like [`from_env`](Self::from_env), but an explicit URL (e.g. a CLI
    /// flag) takes precedence over `CHAT_WEBHOOK_URL`.
    pub fn from_env_with_url(url: Option<String>) -> Result<Self, ConfigError> {
        let url = match url {
            Some(url) => url,
            None => std::env::var("CHAT_WEBHOOK_URL")
                .map_err(|_| ConfigError::MissingWebhookUrl { var: "CHAT_WEBHOOK_URL" })?,
        };
        let mut config = Self::new(url)?.with_user_agent(std::env::var("CHAT_USER_AGENT").ok());
        config.mobile_breakpoint_px = env_parse("CHAT_MOBILE_BREAKPOINT_PX", DEFAULT_MOBILE_BREAKPOINT_PX)?;
        config.auto_close_delay = Duration::from_millis(env_parse("CHAT_AUTO_CLOSE_MS", DEFAULT_AUTO_CLOSE_MS)?);
        config.request_timeout = env_parse_opt::<u64>("CHAT_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(config)
    }

    /// Override the reported agent string. Blank values are ignored.
    #[must_use]
    pub fn with_user_agent(mut self, agent: Option<String>) -> Self {
        if let Some(agent) = agent.filter(|a| !a.trim().is_empty()) {
            self.user_agent = agent;
        }
        self
    }
}

fn validate_webhook_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidWebhookUrl { url: raw.clone(), reason: e.to_string() })?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::InvalidWebhookUrl { url: raw, reason: format!("unsupported scheme '{other}'") }),
    }
}

fn env_parse<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    Ok(env_parse_opt(var)?.unwrap_or(default))
}

fn env_parse_opt<T>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
