use std::collections::BTreeMap;

use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "event"], catch)]
    pub async fn listen(
        event: &str,
        handler: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<JsValue, JsValue>;
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDto {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub model_name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LanguagePreferenceDto {
    pub first: LanguageDto,
    pub second: LanguageDto,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeechStateDto {
    pub languages: Vec<LanguageDto>,
    pub downloaded_models: Vec<String>,
    pub download_progress: BTreeMap<String, f32>,
    pub downloads_in_flight: Vec<String>,
    pub any_download_in_progress: bool,
    pub recognized_text: String,
    pub is_recognizing: bool,
    pub is_starting_recognition: bool,
    pub preference: Option<LanguagePreferenceDto>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversationDto {
    pub top_text: String,
    pub bottom_text: String,
    pub top_language: String,
    pub bottom_language: String,
    pub active_side: Option<String>,
    pub last_error: Option<String>,
    pub top_title: String,
    pub bottom_title: String,
    pub top_revision: u64,
    pub bottom_revision: u64,
}

impl ConversationDto {
    /// Takes a backend echo, keeping local text for any side edited past it.
    pub fn merge_echo(&mut self, echo: ConversationDto) {
        let mut next = echo;
        if next.top_revision <= self.top_revision {
            next.top_text = std::mem::take(&mut self.top_text);
            next.top_revision = self.top_revision;
        }
        if next.bottom_revision <= self.bottom_revision {
            next.bottom_text = std::mem::take(&mut self.bottom_text);
            next.bottom_revision = self.bottom_revision;
        }
        *self = next;
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemDto {
    pub id: String,
    pub from_text: String,
    pub to_text: String,
    pub from_lang: String,
    pub to_lang: String,
    pub timestamp: f64,
}

#[derive(Serialize)]
struct CodeArgs<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct SideArgs<'a> {
    side: &'a str,
}

#[derive(Serialize)]
struct TextArgs<'a> {
    side: &'a str,
    text: &'a str,
    revision: u64,
}

#[derive(Serialize)]
struct LanguageArgs<'a> {
    side: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct PreferenceArgs<'a> {
    first: &'a str,
    second: &'a str,
}

#[derive(Serialize)]
struct IdArgs<'a> {
    id: &'a str,
}

async fn invoke_no_args(cmd: &str) -> Result<JsValue, String> {
    invoke(cmd, JsValue::NULL).await.map_err(extract_error)
}

async fn invoke_with<A: Serialize>(cmd: &str, args: &A) -> Result<JsValue, String> {
    let args = serde_wasm_bindgen::to_value(args).map_err(|err| err.to_string())?;
    invoke(cmd, args).await.map_err(extract_error)
}

fn decode<T: DeserializeOwned>(value: JsValue) -> Result<T, String> {
    serde_wasm_bindgen::from_value(value).map_err(|err| err.to_string())
}

pub async fn fetch_speech_state() -> Result<SpeechStateDto, String> {
    decode(invoke_no_args("speech_state").await?)
}

pub async fn load_languages() -> Result<SpeechStateDto, String> {
    decode(invoke_no_args("load_languages").await?)
}

/// Resolves to `downloaded`, `alreadyDownloaded` or `alreadyInProgress`.
pub async fn download_language(code: &str) -> Result<String, String> {
    decode(invoke_with("download_language", &CodeArgs { code }).await?)
}

pub async fn delete_language(code: &str) -> Result<(), String> {
    invoke_with("delete_language", &CodeArgs { code })
        .await
        .map(|_| ())
}

pub async fn start_recording(side: &str) -> Result<(), String> {
    invoke_with("start_recording", &SideArgs { side })
        .await
        .map(|_| ())
}

pub async fn stop_recording() -> Result<(), String> {
    invoke_no_args("stop_recording").await.map(|_| ())
}

pub async fn update_text(side: &str, text: &str, revision: u64) -> Result<(), String> {
    invoke_with(
        "update_text",
        &TextArgs {
            side,
            text,
            revision,
        },
    )
        .await
        .map(|_| ())
}

pub async fn change_language(side: &str, code: &str) -> Result<(), String> {
    invoke_with("change_language", &LanguageArgs { side, code })
        .await
        .map(|_| ())
}

pub async fn speak(side: &str) -> Result<(), String> {
    invoke_with("speak", &SideArgs { side }).await.map(|_| ())
}

pub async fn fetch_conversation() -> Result<ConversationDto, String> {
    decode(invoke_no_args("conversation_state").await?)
}

pub async fn save_preferences(first: &str, second: &str) -> Result<LanguagePreferenceDto, String> {
    decode(invoke_with("save_preferences", &PreferenceArgs { first, second }).await?)
}

pub async fn fetch_history() -> Result<Vec<HistoryItemDto>, String> {
    decode(invoke_no_args("history_list").await?)
}

pub async fn delete_history(id: &str) -> Result<bool, String> {
    decode(invoke_with("history_delete", &IdArgs { id }).await?)
}

pub async fn clear_history() -> Result<(), String> {
    invoke_no_args("history_clear").await.map(|_| ())
}

/// Subscribes `on_payload` to a backend event for the lifetime of the page.
pub fn listen_payload<T, F>(event: &'static str, on_payload: F)
where
    T: DeserializeOwned + 'static,
    F: Fn(T) + 'static,
{
    spawn_local(async move {
        let callback = Closure::wrap(Box::new(move |event_value: JsValue| {
            let payload = match js_sys::Reflect::get(&event_value, &"payload".into()) {
                Ok(payload) => payload,
                Err(_) => {
                    leptos::logging::warn!("{event} received without payload");
                    return;
                }
            };
            match serde_wasm_bindgen::from_value::<T>(payload) {
                Ok(decoded) => on_payload(decoded),
                Err(e) => leptos::logging::error!("Failed to parse {event} payload: {e:?}"),
            }
        }) as Box<dyn FnMut(JsValue)>);

        match listen(event, &callback).await {
            Ok(_) => leptos::logging::log!("Listening for {event}"),
            Err(e) => leptos::logging::error!("Failed to listen for {event}: {e:?}"),
        }
        callback.forget();
    });
}

pub fn extract_error(err: JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(&err, &"message".into())
                .ok()
                .and_then(|v| v.as_string())
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}
