//! List Component
//!
//! Name/date table with a single highlighted row. The parent owns the
//! selection and is told about clicks through `on_select`.

use leptos::*;

use crate::state::EcgRecord;

/// CSS class for a row
pub fn row_class(name: &str, selected: &str) -> &'static str {
    if name == selected {
        "list-item selected"
    } else {
        "list-item"
    }
}

/// Selectable list of recordings, in the order given
#[component]
pub fn List(
    items: Vec<EcgRecord>,
    #[prop(into)]
    selected: Signal<String>,
    #[prop(optional)]
    on_select: Option<Callback<String>>,
) -> impl IntoView {
    view! {
        <div class="list">
            <div class="list-header">
                <div class="list-header-name">"Name"</div>
                <div class="list-header-date">"Date"</div>
            </div>
            <div class="list-body">
                {items.into_iter().map(|item| {
                    let row_name = item.name.clone();
                    let click_name = item.name.clone();
                    view! {
                        <div
                            class=move || row_class(&row_name, &selected.get())
                            on:click=move |_| {
                                if let Some(callback) = on_select {
                                    callback.call(click_name.clone());
                                }
                            }
                        >
                            <div class="list-item-name">{item.name}</div>
                            <div class="list-item-date">{item.date}</div>
                        </div>
                    }
                }).collect_view()}
            </div>
            <p>{move || selected.get()}</p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_class() {
        assert_eq!(row_class("b", "b"), "list-item selected");
        assert_eq!(row_class("a", "b"), "list-item");
        assert_eq!(row_class("a", ""), "list-item");
    }
}
