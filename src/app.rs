use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::*;
use crate::components::event_log::EventLogPage;
use crate::components::home::HomePage;
use crate::components::languages_download::LanguagesDownloadPage;
use crate::components::languages_preference::LanguagesPreferencePage;
use crate::components::settings::SettingsPage;
use crate::components::tabs::Tabs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Settings,
    LanguagesPreference,
    LanguagesDownload,
    EventLog,
}

impl Page {
    /// Route names the backend uses in `navigate` events.
    fn from_route(route: &str) -> Option<Self> {
        match route {
            "home" => Some(Self::Home),
            "settings" => Some(Self::Settings),
            "languages-preference" => Some(Self::LanguagesPreference),
            "languages-download" => Some(Self::LanguagesDownload),
            "event-log" => Some(Self::EventLog),
            _ => None,
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let page = RwSignal::new(Page::Home);
    let speech = RwSignal::new(SpeechStateDto::default());
    let conversation = RwSignal::new(ConversationDto::default());
    let history = RwSignal::new(Vec::<HistoryItemDto>::new());

    listen_payload("speech_state", move |state: SpeechStateDto| speech.set(state));
    listen_payload("conversation_update", move |state: ConversationDto| {
        conversation.update(|current| current.merge_echo(state))
    });
    listen_payload("history_changed", move |items: Vec<HistoryItemDto>| {
        history.set(items)
    });
    listen_payload("navigate", move |route: String| match Page::from_route(&route) {
        Some(target) => page.set(target),
        None => leptos::logging::warn!("Unknown route: {route}"),
    });

    spawn_local(async move {
        match fetch_speech_state().await {
            Ok(state) => speech.set(state),
            Err(e) => leptos::logging::error!("Failed to fetch speech state: {e}"),
        }
        match fetch_conversation().await {
            Ok(state) => conversation.update(|current| current.merge_echo(state)),
            Err(e) => leptos::logging::error!("Failed to fetch conversation: {e}"),
        }
        match fetch_history().await {
            Ok(items) => history.set(items),
            Err(e) => leptos::logging::error!("Failed to fetch history: {e}"),
        }
    });

    view! {
        <main class="shell">
            {move || match page.get() {
                Page::Home => view! { <HomePage speech conversation /> }.into_any(),
                Page::Settings => view! { <SettingsPage page /> }.into_any(),
                Page::LanguagesPreference => {
                    view! { <LanguagesPreferencePage speech page /> }.into_any()
                }
                Page::LanguagesDownload => {
                    view! { <LanguagesDownloadPage speech page /> }.into_any()
                }
                Page::EventLog => view! { <EventLogPage history /> }.into_any(),
            }}
            <Tabs page />
        </main>
    }
}
