//! Per-tab session identifier.
//!
//! DESIGN
//! ======
//! The identifier lives in short-lived per-tab storage (`sessionStorage` in a
//! browser). It is read on first send and written only when absent, so every
//! message from one tab carries the same token. Storage is a trait so the
//! widget never touches a global store directly.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::distr::Alphanumeric;

/// Storage key holding the session identifier.
pub const SESSION_KEY: &str = "chat_session_id";

const RANDOM_SUFFIX_LEN: usize = 9;

/// Key/value storage scoped to one browser tab.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

/// In-memory tab storage. Cleared when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_owned(), value.to_owned());
    }
}

/// Return the stored session id, generating and storing one if absent.
pub fn session_id(storage: &mut dyn SessionStorage) -> String {
    if let Some(existing) = storage.get_item(SESSION_KEY).filter(|id| !id.is_empty()) {
        return existing;
    }
    let id = generate_session_id();
    storage.set_item(SESSION_KEY, &id);
    tracing::debug!(session_id = %id, "generated chat session id");
    id
}

/// `session_<unix-millis>_<random alphanumerics>`.
#[must_use]
pub fn generate_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("session_{millis}_{suffix}")
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
