//! Loading Component

use leptos::*;

/// Placeholder shown while a request is in flight
#[component]
pub fn Loading() -> impl IntoView {
    view! { <p>"Loading..."</p> }
}
