//! HTTP API Client
//!
//! Functions for communicating with the WatchML backend.

use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use std::fmt;
use urlencoding::encode;

use crate::state::ecg::EcgRecord;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://test.marc-julian.de";

/// Delay between retries
const RETRY_DELAY_MS: u32 = 1000;

/// Listing recordings is a single attempt
pub const LIST_RETRIES: u32 = 0;

/// Key issuance retries, matching the native client's default
pub const KEY_ISSUE_RETRIES: u32 = 3;

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = crate::state::identity::read_slot("watchml_api_url")
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

// ============ Routes ============

pub fn ecgs_url(user_key: &str) -> String {
    format!("{}/api/ecgs/{}", get_api_base(), encode(user_key))
}

pub fn upload_ecg_url(user_key: &str) -> String {
    format!("{}/api/upload/ecgs/{}", get_api_base(), encode(user_key))
}

pub fn user_key_url() -> String {
    format!("{}/api/userkey", get_api_base())
}

// ============ Errors ============

/// Why a request failed
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    Network(String),
    Http(String),
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "Network error: {}", e),
            FetchError::Http(status) => write!(f, "HTTP error: {}", status),
            FetchError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

// ============ API Functions ============

/// GET `url` until it answers 2xx, retrying non-2xx answers and network
/// failures up to `retries` more times.
async fn send_with_retries(url: &str, retries: u32) -> Result<Response, FetchError> {
    let mut remaining = retries;

    loop {
        let error = match Request::get(url).send().await {
            Ok(response) if response.ok() => return Ok(response),
            Ok(response) => FetchError::Http(response.status_text()),
            Err(e) => FetchError::Network(e.to_string()),
        };

        if remaining == 0 {
            return Err(error);
        }
        remaining -= 1;
        web_sys::console::warn_1(&format!("Retrying {}: {}", url, error).into());
        TimeoutFuture::new(RETRY_DELAY_MS).await;
    }
}

/// GET `url` with retries and parse its JSON body. Parse failures are not
/// retried.
pub async fn fetch_plus<T: DeserializeOwned>(url: &str, retries: u32) -> Result<T, FetchError> {
    send_with_retries(url, retries)
        .await?
        .json()
        .await
        .map_err(|e| FetchError::Parse(e.to_string()))
}

/// GET `url` with retries and return the raw text body
pub async fn fetch_text(url: &str, retries: u32) -> Result<String, FetchError> {
    send_with_retries(url, retries)
        .await?
        .text()
        .await
        .map_err(|e| FetchError::Parse(e.to_string()))
}

/// Fetch all recordings for a user
pub async fn fetch_ecgs(user_key: &str) -> Result<Vec<EcgRecord>, FetchError> {
    fetch_plus(&ecgs_url(user_key), LIST_RETRIES).await
}

/// Ask the backend for a fresh user key; returns the raw text body
pub async fn issue_user_key() -> Result<String, FetchError> {
    fetch_text(&user_key_url(), KEY_ISSUE_RETRIES).await
}
