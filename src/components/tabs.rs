use leptos::prelude::*;

use crate::app::Page;

/// Bottom tab bar. Settings stays highlighted on its sub pages.
#[component]
pub fn Tabs(page: RwSignal<Page>) -> impl IntoView {
    let on_settings = move || {
        matches!(
            page.get(),
            Page::Settings | Page::LanguagesPreference | Page::LanguagesDownload
        )
    };

    view! {
        <nav class="tab-bar">
            <button
                class="tab"
                class:active=move || page.get() == Page::Home
                on:click=move |_| page.set(Page::Home)
            >
                "Home"
            </button>
            <button
                class="tab"
                class:active=on_settings
                on:click=move |_| page.set(Page::Settings)
            >
                "Settings"
            </button>
            <button
                class="tab"
                class:active=move || page.get() == Page::EventLog
                on:click=move |_| page.set(Page::EventLog)
            >
                "Event Log"
            </button>
        </nav>
    }
}
