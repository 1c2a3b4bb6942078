//! ECG Page
//!
//! User key bootstrap, upload form and the recording list.

use leptos::*;

use crate::api;
use crate::components::{List, Loading};
use crate::state::ecg::selected_values;
use crate::state::{use_user_key, KeyState};

/// ECG page
#[component]
pub fn EcgPage() -> impl IntoView {
    let key_state = use_user_key();

    move || match key_state.get() {
        KeyState::Loading => view! { <Loading /> }.into_view(),
        KeyState::Absent => view! { <p>"No userKey found"</p> }.into_view(),
        KeyState::Present(user_key) => {
            let upload_action = api::upload_ecg_url(&user_key);
            let title = format!("ECG - for {}", user_key);
            view! {
                <main class="main">
                    <h1>{title}</h1>
                    // Plain form post; the page does not track the upload
                    <form action=upload_action method="post" enctype="multipart/form-data">
                        <input type="file" name="file" />
                        <input type="submit" value="Upload" />
                    </form>
                    <EcgList user_key=user_key />
                </main>
            }
            .into_view()
        }
    }
}

/// Recording list with raw values for the selected one
#[component]
fn EcgList(user_key: String) -> impl IntoView {
    let ecgs = create_local_resource(
        move || user_key.clone(),
        |key| async move { api::fetch_ecgs(&key).await },
    );
    let (selected, set_selected) = create_signal(String::new());

    move || match ecgs.get() {
        None => view! { <Loading /> }.into_view(),
        Some(Err(e)) => {
            web_sys::console::error_1(&format!("Failed to fetch ECGs: {}", e).into());
            view! { <p>"Error"</p> }.into_view()
        }
        Some(Ok(records)) if records.is_empty() => {
            view! { <p>"No ECGs found"</p> }.into_view()
        }
        Some(Ok(records)) => {
            let lookup = records.clone();
            view! {
                <div>
                    {move || selected_values(&lookup, &selected.get()).map(|values| view! {
                        <p>{values}</p>
                    })}
                    <List
                        items=records
                        selected=selected
                        on_select=Callback::new(move |name| set_selected.set(name))
                    />
                </div>
            }
            .into_view()
        }
    }
}
