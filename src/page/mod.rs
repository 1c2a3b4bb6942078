//! ECG Page
//!
//! The page is a small state machine:
//!
//! ```text
//! KeyLoading -> KeyAbsent
//! KeyLoading -> ListLoading -> ListError | ListEmpty | Ready
//! ```
//!
//! Every change goes through [`transition`]. Selection is kept by name and
//! is never validated against the list; a name that disappears on reload
//! simply renders no values.

mod controller;
mod render;

pub use controller::{EcgPageController, EcgSource};
pub use render::{render_page, UploadForm};

use serde::Serialize;

use crate::client::EcgRecord;
use crate::identity::{KeyState, UserKey};

/// Page state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageState {
    KeyLoading,
    KeyAbsent,
    ListLoading {
        key: UserKey,
        selected: Option<String>,
    },
    ListError {
        key: UserKey,
    },
    ListEmpty {
        key: UserKey,
    },
    Ready {
        key: UserKey,
        records: Vec<EcgRecord>,
        selected: Option<String>,
    },
}

/// Inputs to the page state machine
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Identity bootstrap finished (or reported progress)
    KeyResolved(KeyState),
    /// List fetch succeeded
    ListLoaded(Vec<EcgRecord>),
    /// List fetch failed; details are not kept
    ListFailed,
    /// User clicked a row
    Select(String),
    /// Fetch the list again
    Reload,
}

impl PageState {
    pub fn key(&self) -> Option<&UserKey> {
        match self {
            PageState::KeyLoading | PageState::KeyAbsent => None,
            PageState::ListLoading { key, .. }
            | PageState::ListError { key }
            | PageState::ListEmpty { key }
            | PageState::Ready { key, .. } => Some(key),
        }
    }

    /// Current selection, if any
    pub fn selected(&self) -> Option<&str> {
        match self {
            PageState::ListLoading { selected, .. } | PageState::Ready { selected, .. } => {
                selected.as_deref()
            }
            _ => None,
        }
    }

    /// The record the selection points at, when it is in the current list
    pub fn selected_record(&self) -> Option<&EcgRecord> {
        match self {
            PageState::Ready {
                records,
                selected: Some(name),
                ..
            } => records.iter().find(|r| &r.name == name),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::KeyLoading | PageState::ListLoading { .. })
    }
}

/// Apply one event. Events that make no sense in the current state leave it
/// unchanged.
pub fn transition(state: PageState, event: PageEvent) -> PageState {
    match (state, event) {
        (PageState::KeyLoading, PageEvent::KeyResolved(key_state)) => match key_state {
            KeyState::Loading => PageState::KeyLoading,
            KeyState::Absent => PageState::KeyAbsent,
            KeyState::Present(key) => PageState::ListLoading {
                key,
                selected: None,
            },
        },

        (PageState::ListLoading { key, selected }, PageEvent::ListLoaded(records)) => {
            if records.is_empty() {
                PageState::ListEmpty { key }
            } else {
                PageState::Ready {
                    key,
                    records,
                    selected,
                }
            }
        }

        (PageState::ListLoading { key, .. }, PageEvent::ListFailed) => PageState::ListError { key },

        (
            PageState::Ready { key, records, .. },
            PageEvent::Select(name),
        ) => PageState::Ready {
            key,
            records,
            selected: Some(name),
        },

        (PageState::Ready { key, selected, .. }, PageEvent::Reload) => {
            PageState::ListLoading { key, selected }
        }

        (PageState::ListError { key } | PageState::ListEmpty { key }, PageEvent::Reload) => {
            PageState::ListLoading {
                key,
                selected: None,
            }
        }

        (state, event) => {
            tracing::debug!(?event, "Ignoring page event");
            state
        }
    }
}
