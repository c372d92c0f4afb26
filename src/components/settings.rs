use leptos::prelude::*;

use crate::app::Page;

#[component]
pub fn SettingsPage(page: RwSignal<Page>) -> impl IntoView {
    view! {
        <div class="settings-section">
            <div class="settings-row">
                <div class="settings-label">
                    <span class="settings-title">"Languages Preference"</span>
                    <span class="settings-hint">"Pick the two languages of a conversation"</span>
                </div>
                <button
                    class="ghost compact"
                    on:click=move |_| page.set(Page::LanguagesPreference)
                >
                    "Open"
                </button>
            </div>
            <div class="settings-row">
                <div class="settings-label">
                    <span class="settings-title">"Download Languages"</span>
                    <span class="settings-hint">"Install or remove offline models"</span>
                </div>
                <button
                    class="ghost compact"
                    on:click=move |_| page.set(Page::LanguagesDownload)
                >
                    "Open"
                </button>
            </div>
        </div>
    }
}
