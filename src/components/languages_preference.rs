use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::*;
use crate::app::Page;
use crate::utils::installed_languages;

/// Chooses the conversation pair among installed languages. Every change is
/// saved as soon as both sides are set.
#[component]
pub fn LanguagesPreferencePage(
    speech: RwSignal<SpeechStateDto>,
    page: RwSignal<Page>,
) -> impl IntoView {
    let first = RwSignal::new(String::new());
    let second = RwSignal::new(String::new());
    let (status, set_status) = signal(String::new());

    Effect::new(move |_| {
        if let Some(preference) = speech.get().preference {
            first.set(preference.first.code);
            second.set(preference.second.code);
        }
    });

    let available = move || {
        let state = speech.get();
        installed_languages(&state.languages, &state.downloaded_models)
    };

    let save = move || {
        let (first_code, second_code) = (first.get_untracked(), second.get_untracked());
        if first_code.is_empty() || second_code.is_empty() {
            return;
        }
        spawn_local(async move {
            match save_preferences(&first_code, &second_code).await {
                Ok(saved) => set_status.set(format!(
                    "Saved: {} and {}",
                    saved.first.name, saved.second.name
                )),
                Err(e) => set_status.set(format!("Failed to save: {e}")),
            }
        });
    };

    let language_select = move |selected: RwSignal<String>| {
        view! {
            <select
                prop:value=move || selected.get()
                on:change=move |ev| {
                    selected.set(event_target_value(&ev));
                    save();
                }
            >
                <option value="" disabled=true>"Select a language"</option>
                {move || {
                    available()
                        .into_iter()
                        .map(|lang| view! { <option value=lang.code>{lang.name}</option> })
                        .collect_view()
                }}
            </select>
        }
    };

    view! {
        <div class="settings-section">
            <div class="settings-row">
                <button class="ghost compact" on:click=move |_| page.set(Page::Settings)>
                    "Back"
                </button>
                <span class="settings-title">"Languages Preference"</span>
            </div>
            <Show
                when=move || !available().is_empty()
                fallback=move || {
                    view! {
                        <div class="settings-row">
                            <span class="settings-hint">"No languages installed yet."</span>
                            <button
                                class="ghost compact"
                                on:click=move |_| page.set(Page::LanguagesDownload)
                            >
                                "Download"
                            </button>
                        </div>
                    }
                }
            >
                <div class="settings-row">
                    <span class="settings-title">"First language"</span>
                    {language_select(first)}
                </div>
                <div class="settings-row">
                    <span class="settings-title">"Second language"</span>
                    {language_select(second)}
                </div>
            </Show>
            <p class="settings-status">{move || status.get()}</p>
        </div>
    }
}
