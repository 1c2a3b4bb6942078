//! ECG Page Controller
//!
//! Drives the page state machine from the outside world: bootstrap the user
//! key, fetch the list, apply selections.

use async_trait::async_trait;

use crate::client::{AddressBook, ClientError, EcgRecord};
use crate::identity::{bootstrap, IdentityStore, KeyIssuer, UserKey};

use super::{render_page, transition, PageEvent, PageState, UploadForm};

/// Source of a user's ECG list
#[async_trait]
pub trait EcgSource: Send + Sync {
    async fn list_ecgs(&self, user_key: &UserKey) -> Result<Vec<EcgRecord>, ClientError>;
}

/// Owns the page state for one mount
pub struct EcgPageController<S, B> {
    store: S,
    backend: B,
    routes: AddressBook,
    state: PageState,
}

impl<S, B> EcgPageController<S, B>
where
    S: IdentityStore,
    B: KeyIssuer + EcgSource,
{
    pub fn new(store: S, backend: B, routes: AddressBook) -> Self {
        Self {
            store,
            backend,
            routes,
            state: PageState::KeyLoading,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bootstrap the key and load the list. Runs to completion before any
    /// selection can be applied.
    pub async fn mount(&mut self) -> &PageState {
        let key_state = bootstrap(&self.store, &self.backend).await;
        self.apply(PageEvent::KeyResolved(key_state));
        self.load_list().await;
        &self.state
    }

    /// Fetch the list again, keeping the current selection
    pub async fn reload(&mut self) -> &PageState {
        self.apply(PageEvent::Reload);
        self.load_list().await;
        &self.state
    }

    /// Apply a row click
    pub fn select(&mut self, name: impl Into<String>) -> &PageState {
        self.apply(PageEvent::Select(name.into()));
        &self.state
    }

    /// Upload form for the current key, once there is one
    pub fn upload_form(&self) -> Option<UploadForm> {
        self.state
            .key()
            .map(|key| UploadForm::for_key(&self.routes, key))
    }

    pub fn render(&self) -> String {
        render_page(&self.state, &self.routes)
    }

    async fn load_list(&mut self) {
        let key = match &self.state {
            PageState::ListLoading { key, .. } => key.clone(),
            _ => return,
        };

        match self.backend.list_ecgs(&key).await {
            Ok(records) => self.apply(PageEvent::ListLoaded(records)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load ECG list");
                self.apply(PageEvent::ListFailed);
            }
        }
    }

    fn apply(&mut self, event: PageEvent) {
        let current = std::mem::replace(&mut self.state, PageState::KeyLoading);
        self.state = transition(current, event);
    }
}
