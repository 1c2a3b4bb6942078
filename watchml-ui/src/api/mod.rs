//! Backend API
//!
//! URL building and HTTP calls against the WatchML backend.

mod client;

pub use client::{fetch_ecgs, issue_user_key, upload_ecg_url};
