//! App Root Component
//!
//! Main application component with routing.

use leptos::*;
use leptos_router::*;

use crate::components::Nav;
use crate::pages::{EcgPage, Home};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <Nav />
            <Routes>
                <Route path="/" view=Home />
                <Route path="/ecg" view=EcgPage />
                <Route path="/*any" view=NotFound />
            </Routes>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <main class="main">
            <h1>"Page Not Found"</h1>
            <p>"The page you're looking for doesn't exist."</p>
            <A href="/">"Go Home"</A>
        </main>
    }
}
