use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::*;
use crate::utils::format_timestamp;

#[component]
pub fn EventLogPage(history: RwSignal<Vec<HistoryItemDto>>) -> impl IntoView {
    let (status, set_status) = signal(String::new());

    let delete_item = move |id: String| {
        spawn_local(async move {
            if let Err(e) = delete_history(&id).await {
                set_status.set(format!("Failed to delete entry: {e}"));
            }
        });
    };

    let clear_all = move |_| {
        spawn_local(async move {
            if let Err(e) = clear_history().await {
                set_status.set(format!("Failed to clear history: {e}"));
            }
        });
    };

    view! {
        <div class="settings-section">
            <div class="settings-row">
                <span class="settings-title">"Event Log"</span>
                <button
                    class="danger compact"
                    disabled=move || history.get().is_empty()
                    on:click=clear_all
                >
                    "Clear All"
                </button>
            </div>
            <Show
                when=move || !history.get().is_empty()
                fallback=|| view! { <p class="settings-hint">"No translations yet."</p> }
            >
                <For
                    each=move || history.get()
                    key=|item| item.id.clone()
                    children=move |item| {
                        let id = item.id.clone();
                        view! {
                            <div class="history-item">
                                <p class="eyebrow">
                                    {format!("{} to {}", item.from_lang, item.to_lang)}
                                </p>
                                <p class="history-from">{item.from_text.clone()}</p>
                                <p class="history-to">{item.to_text.clone()}</p>
                                <div class="history-footer">
                                    <span class="settings-hint">
                                        {format_timestamp(item.timestamp)}
                                    </span>
                                    <button
                                        class="ghost compact"
                                        on:click=move |_| delete_item(id.clone())
                                    >
                                        "Delete"
                                    </button>
                                </div>
                            </div>
                        }
                    }
                />
            </Show>
            <p class="settings-status">{move || status.get()}</p>
        </div>
    }
}
