//! Identity Bootstrap
//!
//! Every backend call is scoped by an opaque user key. The key is issued
//! once by the backend, cached in an [`IdentityStore`] slot and reused from
//! then on.
//!
//! ## Flow
//!
//! 1. Read the `userKey` slot; a non-empty value is returned as-is
//! 2. Otherwise ask the backend to issue a key (plain-text body)
//! 3. A non-empty key is written to the slot, then returned
//! 4. An empty answer leaves the slot untouched and yields [`KeyState::Absent`]
//!
//! Failures never surface as errors: they are logged and reported as
//! `Absent`, and the next bootstrap asks again.

mod store;

pub use store::{FileStore, IdentityError, IdentityResult, IdentityStore, MemoryStore};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::client::ClientError;

/// Slot name the user key lives under
pub const USER_KEY_SLOT: &str = "userKey";

/// Opaque per-user token issued by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    /// Wrap a key; empty strings are not keys
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where bootstrap stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyState {
    /// Bootstrap has not finished
    Loading,
    Present(UserKey),
    /// No key stored and none issued
    Absent,
}

impl KeyState {
    pub fn key(&self) -> Option<&UserKey> {
        match self {
            KeyState::Present(key) => Some(key),
            _ => None,
        }
    }
}

/// Source of freshly issued keys
#[async_trait]
pub trait KeyIssuer: Send + Sync {
    /// Raw body of the key-issuance endpoint
    async fn issue_key(&self) -> Result<String, ClientError>;
}

/// Read the cached key or obtain and persist a new one.
pub async fn bootstrap<S, I>(store: &S, issuer: &I) -> KeyState
where
    S: IdentityStore + ?Sized,
    I: KeyIssuer + ?Sized,
{
    match store.get(USER_KEY_SLOT) {
        Ok(Some(stored)) => {
            if let Some(key) = UserKey::new(stored) {
                tracing::debug!("Using stored user key");
                return KeyState::Present(key);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read stored user key"),
    }

    let body = match issuer.issue_key().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "User key issuance failed");
            return KeyState::Absent;
        }
    };

    let Some(key) = UserKey::new(parse_issued_key(&body)) else {
        tracing::info!("Backend issued an empty user key");
        return KeyState::Absent;
    };

    // An unpersisted key still serves this session
    if let Err(e) = store.set(USER_KEY_SLOT, key.as_str()) {
        tracing::warn!(error = %e, "Failed to persist user key");
    } else {
        tracing::info!("Issued and stored a new user key");
    }

    KeyState::Present(key)
}

/// Normalize the issuance body: surrounding whitespace is dropped and a JSON
/// string literal (`"abc"`) is unwrapped to its contents.
pub fn parse_issued_key(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.starts_with('"') {
        if let Ok(inner) = serde_json::from_str::<String>(trimmed) {
            return inner;
        }
    }
    trimmed.to_string()
}
