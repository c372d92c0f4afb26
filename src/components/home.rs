use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::*;
use crate::utils::selectable_languages;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

#[component]
pub fn HomePage(
    speech: RwSignal<SpeechStateDto>,
    conversation: RwSignal<ConversationDto>,
) -> impl IntoView {
    let (status, set_status) = signal(String::new());

    view! {
        <section class="conversation">
            <ConversationCard side=Side::Top speech conversation set_status />
            <ConversationCard side=Side::Bottom speech conversation set_status />
            <p class="status">
                {move || {
                    conversation
                        .get()
                        .last_error
                        .unwrap_or_else(|| status.get())
                }}
            </p>
        </section>
    }
}

#[component]
fn ConversationCard(
    side: Side,
    speech: RwSignal<SpeechStateDto>,
    conversation: RwSignal<ConversationDto>,
    set_status: WriteSignal<String>,
) -> impl IntoView {
    let name = side.as_str();

    let title = move || {
        let state = conversation.get();
        match side {
            Side::Top => state.top_title,
            Side::Bottom => state.bottom_title,
        }
    };
    let text = move || {
        let state = conversation.get();
        match side {
            Side::Top => state.top_text,
            Side::Bottom => state.bottom_text,
        }
    };
    let language = move || {
        let state = conversation.get();
        match side {
            Side::Top => state.top_language,
            Side::Bottom => state.bottom_language,
        }
    };
    let options = move || {
        let state = speech.get();
        selectable_languages(&state.languages, &state.downloaded_models)
    };
    let is_recording_here = move || {
        speech.get().is_recognizing && conversation.get().active_side.as_deref() == Some(name)
    };
    let is_starting = move || speech.get().is_starting_recognition;

    let on_input = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        let mut revision = 0;
        conversation.update(|state| {
            let (text, local) = match side {
                Side::Top => (&mut state.top_text, &mut state.top_revision),
                Side::Bottom => (&mut state.bottom_text, &mut state.bottom_revision),
            };
            *text = value.clone();
            *local += 1;
            revision = *local;
        });
        spawn_local(async move {
            if let Err(e) = update_text(name, &value, revision).await {
                leptos::logging::error!("update_text failed: {e}");
            }
        });
    };

    let on_language = move |ev: leptos::ev::Event| {
        let code = event_target_value(&ev);
        spawn_local(async move {
            if let Err(e) = change_language(name, &code).await {
                set_status.set(e);
            }
        });
    };

    let on_record = move |_| {
        let recording = is_recording_here();
        spawn_local(async move {
            let result = if recording {
                stop_recording().await
            } else {
                start_recording(name).await
            };
            match result {
                Ok(()) => set_status.set(String::new()),
                Err(e) => set_status.set(e),
            }
        });
    };

    let on_speak = move |_| {
        spawn_local(async move {
            if let Err(e) = speak(name).await {
                leptos::logging::error!("speak failed: {e}");
            }
        });
    };

    view! {
        <div class="card" class:recording=is_recording_here>
            <div class="card-header">
                <p class="eyebrow">{title}</p>
                <select prop:value=language on:change=on_language>
                    {move || {
                        let selected = language();
                        options()
                            .into_iter()
                            .map(|lang| {
                                let is_selected = lang.code == selected;
                                view! {
                                    <option value=lang.code selected=is_selected>
                                        {lang.name}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            </div>
            <textarea class="conversation-text" prop:value=text on:input=on_input></textarea>
            <div class="card-actions">
                <button
                    class="record"
                    class:active=is_recording_here
                    disabled=is_starting
                    on:click=on_record
                >
                    {move || if is_recording_here() { "Stop" } else { "Record" }}
                </button>
                <button class="ghost compact" on:click=on_speak>
                    "Speak"
                </button>
            </div>
        </div>
    }
}
