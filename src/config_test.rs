use super::*;

use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// # Safety
/// Callers must hold `lock_env()` so env mutations do not race.
unsafe fn clear_chat_env() {
    unsafe {
        std::env::remove_var("CHAT_WEBHOOK_URL");
        std::env::remove_var("CHAT_USER_AGENT");
        std::env::remove_var("CHAT_MOBILE_BREAKPOINT_PX");
        std::env::remove_var("CHAT_AUTO_CLOSE_MS");
        std::env::remove_var("CHAT_REQUEST_TIMEOUT_SECS");
    }
}

#[test]
fn new_applies_defaults() {
    let cfg = WidgetConfig::new("https://hooks.example.test/chat").unwrap();
    assert_eq!(cfg.webhook_url, "https://hooks.example.test/chat");
    assert_eq!(cfg.mobile_breakpoint_px, 576);
    assert_eq!(cfg.auto_close_delay, Duration::from_millis(3000));
    assert_eq!(cfg.request_timeout, None);
    assert!(cfg.user_agent.starts_with("lostfound-chat/"));
}

#[test]
fn new_rejects_relative_url() {
    let err = WidgetConfig::new("/webhook/chat").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidWebhookUrl { .. }));
}

#[test]
fn new_rejects_non_http_scheme() {
    let err = WidgetConfig::new("ftp://example.test/chat").unwrap_err().to_string();
    assert!(err.contains("unsupported scheme 'ftp'"));
}

#[test]
fn from_env_requires_webhook_url() {
    let _guard = lock_env();
    unsafe { clear_chat_env() };

    let err = WidgetConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::MissingWebhookUrl { var: "CHAT_WEBHOOK_URL" }));
}

#[test]
fn from_env_parses_overrides() {
    let _guard = lock_env();
    unsafe {
        clear_chat_env();
        std::env::set_var("CHAT_WEBHOOK_URL", " http://127.0.0.1:5678/webhook/chat ");
        std::env::set_var("CHAT_USER_AGENT", "Mozilla/5.0 (test)");
        std::env::set_var("CHAT_MOBILE_BREAKPOINT_PX", "768");
        std::env::set_var("CHAT_AUTO_CLOSE_MS", "1500");
        std::env::set_var("CHAT_REQUEST_TIMEOUT_SECS", "30");
    }

    let cfg = WidgetConfig::from_env().unwrap();
    assert_eq!(cfg.webhook_url, "http://127.0.0.1:5678/webhook/chat");
    assert_eq!(cfg.user_agent, "Mozilla/5.0 (test)");
    assert_eq!(cfg.mobile_breakpoint_px, 768);
    assert_eq!(cfg.auto_close_delay, Duration::from_millis(1500));
    assert_eq!(cfg.request_timeout, Some(Duration::from_secs(30)));

    unsafe { clear_chat_env() };
}

#[test]
fn from_env_rejects_bad_number() {
    let _guard = lock_env();
    unsafe {
        clear_chat_env();
        std::env::set_var("CHAT_WEBHOOK_URL", "https://hooks.example.test/chat");
        std::env::set_var("CHAT_AUTO_CLOSE_MS", "soon");
    }

    let err = WidgetConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("CHAT_AUTO_CLOSE_MS"));

    unsafe { clear_chat_env() };
}

#[test]
fn explicit_url_overrides_env() {
    let _guard = lock_env();
    unsafe {
        clear_chat_env();
        std::env::set_var("CHAT_WEBHOOK_URL", "https://env.example.test/chat");
        std::env::set_var("CHAT_AUTO_CLOSE_MS", "250");
    }

    let cfg = WidgetConfig::from_env_with_url(Some("https://flag.example.test/chat".into())).unwrap();
    assert_eq!(cfg.webhook_url, "https://flag.example.test/chat");
    assert_eq!(cfg.auto_close_delay, Duration::from_millis(250));

    unsafe { clear_chat_env() };
}

#[test]
fn with_user_agent_overrides_unless_blank() {
    let cfg = WidgetConfig::new("https://hooks.example.test/chat").unwrap();
    let default_agent = cfg.user_agent.clone();

    let blank = cfg.clone().with_user_agent(Some("   ".into()));
    assert_eq!(blank.user_agent, default_agent);

    let unset = cfg.clone().with_user_agent(None);
    assert_eq!(unset.user_agent, default_agent);

    let custom = cfg.with_user_agent(Some("kiosk-terminal/2".into()));
    assert_eq!(custom.user_agent, "kiosk-terminal/2");
}
