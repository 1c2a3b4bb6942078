//! Navigation Component

use leptos::*;
use leptos_router::*;

/// Link back to the home page
#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="nav">
            <A href="/">"Home"</A>
        </nav>
    }
}
