//! WatchML Web
//!
//! Browser frontend for the WatchML ECG backend, built with Leptos (WASM).
//!
//! # Features
//!
//! - Per-browser user key, issued once and kept in local storage
//! - List of uploaded ECG recordings with raw sample view
//! - Upload form posting straight to the backend
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the WatchML backend over HTTP.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
