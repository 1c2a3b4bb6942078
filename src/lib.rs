//! # WatchML
//!
//! Client for the WatchML ECG backend: upload Apple Watch ECG recordings,
//! list them and inspect their raw samples.
//!
//! ## Modules
//!
//! - [`client`]: HTTP access with bounded retries
//! - [`identity`]: per-installation user key bootstrap
//! - [`view`]: selectable list view
//! - [`page`]: the ECG page state machine and its controller
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use watchml::{Config, EcgPageController, FileStore, WatchClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = WatchClient::new(config.client_config())?;
//!     let store = FileStore::new(config.identity.resolved_store_path());
//!
//!     let routes = client.routes().clone();
//!     let mut page = EcgPageController::new(store, client, routes);
//!     page.mount().await;
//!     page.select("ecg_2024-01-01");
//!
//!     print!("{}", page.render());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod identity;
pub mod page;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export top-level types for convenience
pub use client::{
    AddressBook, ClientConfig, ClientError, ClientResult, EcgImage, EcgRecord, Fetcher,
    RequestOptions, RetryPolicy, UploadReceipt, WatchClient,
};

pub use identity::{
    bootstrap, FileStore, IdentityError, IdentityStore, KeyIssuer, KeyState, MemoryStore,
    UserKey, USER_KEY_SLOT,
};

pub use page::{
    render_page, transition, EcgPageController, EcgSource, PageEvent, PageState, UploadForm,
};

pub use view::{ListItem, ListRow, ListView};

pub use config::{ApiConfig, Config, ConfigError, ConfigSource, IdentityConfig, LoggingConfig};
