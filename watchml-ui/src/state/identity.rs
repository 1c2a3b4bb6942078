//! User Key Bootstrap
//!
//! The key lives in `localStorage["userKey"]`. On first visit the backend
//! issues one, which is stored before use; an empty answer leaves storage
//! alone so the next visit asks again.

use leptos::*;

use crate::api;

/// Local storage slot holding the user key
pub const USER_KEY_SLOT: &str = "userKey";

/// Bootstrap progress
#[derive(Clone, Debug, PartialEq)]
pub enum KeyState {
    Loading,
    Present(String),
    Absent,
}

/// Read a local storage slot
pub fn read_slot(slot: &str) -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(slot).ok()?
}

/// Write a local storage slot
pub fn write_slot(slot: &str, value: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Err(e) = storage.set_item(slot, value) {
                web_sys::console::error_1(
                    &format!("Failed to store {}: {:?}", slot, e).into(),
                );
            }
        }
    }
}

/// Normalize the issuance body: trims whitespace and unwraps a JSON string
/// literal
pub fn parse_issued_key(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.starts_with('"') {
        if let Ok(inner) = serde_json::from_str::<String>(trimmed) {
            return inner;
        }
    }
    trimmed.to_string()
}

async fn bootstrap() -> KeyState {
    if let Some(stored) = read_slot(USER_KEY_SLOT).filter(|k| !k.is_empty()) {
        return KeyState::Present(stored);
    }

    match api::issue_user_key().await {
        Ok(body) => {
            let key = parse_issued_key(&body);
            if key.is_empty() {
                KeyState::Absent
            } else {
                write_slot(USER_KEY_SLOT, &key);
                KeyState::Present(key)
            }
        }
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to obtain user key: {}", e).into());
            KeyState::Absent
        }
    }
}

/// Bootstrap the user key once for the calling component
pub fn use_user_key() -> ReadSignal<KeyState> {
    let (state, set_state) = create_signal(KeyState::Loading);

    spawn_local(async move {
        set_state.set(bootstrap().await);
    });

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_issued_key() {
        assert_eq!(parse_issued_key("abc123"), "abc123");
        assert_eq!(parse_issued_key("\"abc123\""), "abc123");
        assert_eq!(parse_issued_key(""), "");
    }
}
