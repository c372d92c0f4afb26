use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::*;
use crate::app::Page;
use crate::utils::{is_downloaded, percent};

#[component]
pub fn LanguagesDownloadPage(
    speech: RwSignal<SpeechStateDto>,
    page: RwSignal<Page>,
) -> impl IntoView {
    let (status, set_status) = signal(String::new());

    spawn_local(async move {
        match load_languages().await {
            Ok(state) => speech.set(state),
            Err(e) => set_status.set(format!("Failed to load languages: {e}")),
        }
    });

    let download = move |code: String| {
        // One download at a time; progress events do not name their language.
        if speech.get_untracked().any_download_in_progress {
            return;
        }
        spawn_local(async move {
            match download_language(&code).await {
                Ok(outcome) => leptos::logging::log!("Download {code}: {outcome}"),
                Err(e) => set_status.set(format!("Error downloading {code}: {e}")),
            }
        });
    };

    let confirm_delete = move |lang: LanguageDto| {
        let message = format!("Are you sure you want to delete {} language?", lang.name);
        let confirmed = leptos::web_sys::window()
            .and_then(|window| window.confirm_with_message(&message).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            if let Err(e) = delete_language(&lang.code).await {
                set_status.set(format!("Error deleting {}: {e}", lang.name));
            }
        });
    };

    let rows = move || {
        let state = speech.get();
        state
            .languages
            .iter()
            .map(|lang| {
                let code = lang.code.clone();
                let downloaded = is_downloaded(&code, &state.downloaded_models);
                let progress = state.download_progress.get(&code).copied();
                let busy = state.any_download_in_progress;

                let action = if downloaded {
                    let lang = lang.clone();
                    view! {
                        <span class="downloaded">"Installed"</span>
                        <button class="danger compact" on:click=move |_| confirm_delete(lang.clone())>
                            "Delete"
                        </button>
                    }
                    .into_any()
                } else if let Some(progress) = progress {
                    view! { <span class="progress">{percent(progress)}</span> }.into_any()
                } else {
                    view! {
                        <button
                            class="ghost compact"
                            disabled=busy
                            on:click=move |_| download(code.clone())
                        >
                            "Download"
                        </button>
                    }
                    .into_any()
                };

                view! {
                    <div class="settings-row">
                        <span class="settings-title">{lang.name.clone()}</span>
                        <div class="settings-input-group">{action}</div>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <div class="settings-section">
            <div class="settings-row">
                <button class="ghost compact" on:click=move |_| page.set(Page::Settings)>
                    "Back"
                </button>
                <span class="settings-title">"Download Languages"</span>
            </div>
            {rows}
            <p class="settings-status">{move || status.get()}</p>
        </div>
    }
}
