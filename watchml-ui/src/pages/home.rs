//! Home Page
//!
//! Entry cards for each data area.

use leptos::*;
use leptos_router::*;

#[component]
pub fn Home() -> impl IntoView {
    view! {
        <main class="main">
            <h1 class="title">"WatchML"</h1>
            <div class="cards">
                <Card name="ECG" />
                <Card name="Route" />
                <Card name="Other" />
            </div>
        </main>
    }
}

#[component]
fn Card(name: &'static str) -> impl IntoView {
    view! {
        <A href=format!("/{}", name.to_lowercase())>
            <div class="card">
                <p>{name}</p>
            </div>
        </A>
    }
}
