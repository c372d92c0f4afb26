use std::sync::Arc;

use tauri::State;

use crate::conversation::{Conversation, ConversationView, Side};
use crate::error::AppError;
use crate::history::{HistoryStore, TranslationHistoryItem};
use crate::language::LanguagePreference;
use crate::service::{DownloadOutcome, SpeechService, SpeechState};

type Service<'a> = State<'a, Arc<SpeechService>>;
type History<'a> = State<'a, Arc<HistoryStore>>;
type Home<'a> = State<'a, Arc<Conversation>>;

#[tauri::command]
pub fn speech_state(service: Service<'_>) -> SpeechState {
    service.snapshot()
}

/// Re-fetches languages, installed models and the preferred pair.
#[tauri::command]
pub async fn load_languages(
    service: Service<'_>,
    home: Home<'_>,
) -> Result<SpeechState, AppError> {
    service.refresh().await;
    home.sync_languages();
    Ok(service.snapshot())
}

#[tauri::command]
pub async fn download_language(
    service: Service<'_>,
    code: String,
) -> Result<DownloadOutcome, AppError> {
    log::info!("Command download_language invoked: {code}");
    Ok(service.download_language(&code).await?)
}

#[tauri::command]
pub async fn delete_language(service: Service<'_>, code: String) -> Result<(), AppError> {
    log::info!("Command delete_language invoked: {code}");
    service.delete_language(&code).await;
    service.fetch_downloaded_models().await;
    Ok(())
}

#[tauri::command]
pub async fn start_recording(home: Home<'_>, side: Side) -> Result<(), AppError> {
    log::info!("Command start_recording invoked: {side:?}");
    Ok(home.start_recording(side).await?)
}

#[tauri::command]
pub async fn stop_recording(home: Home<'_>) -> Result<(), AppError> {
    log::info!("Command stop_recording invoked");
    home.stop_recording().await;
    Ok(())
}

#[tauri::command]
pub fn update_text(home: Home<'_>, side: Side, text: String, revision: Option<u64>) {
    match revision {
        Some(revision) => home.on_edit(side, text, revision),
        None => home.on_text_change(side, text),
    }
}

#[tauri::command]
pub async fn change_language(home: Home<'_>, side: Side, code: String) -> Result<(), AppError> {
    Ok(home.change_language(side, &code).await?)
}

#[tauri::command]
pub async fn speak(home: Home<'_>, side: Side) -> Result<(), AppError> {
    home.speak(side).await;
    Ok(())
}

#[tauri::command]
pub fn conversation_state(home: Home<'_>) -> ConversationView {
    home.view()
}

#[tauri::command]
pub fn save_preferences(
    service: Service<'_>,
    home: Home<'_>,
    first: String,
    second: String,
) -> Result<LanguagePreference, AppError> {
    let languages = service.snapshot().languages;
    let find = |code: &str| {
        languages
            .iter()
            .find(|lang| lang.code == code)
            .cloned()
            .ok_or_else(|| AppError::Settings(format!("Unknown language: {code}")))
    };
    let preference = LanguagePreference {
        first: find(&first)?,
        second: find(&second)?,
    };

    service.save_preferences(preference.clone())?;
    home.apply_preference(&preference);
    home.sync_languages();
    log::info!("Saved language preference {first} / {second}");
    Ok(preference)
}

#[tauri::command]
pub fn history_list(history: History<'_>) -> Vec<TranslationHistoryItem> {
    history.items()
}

#[tauri::command]
pub fn history_delete(history: History<'_>, id: String) -> Result<bool, AppError> {
    Ok(history.delete(&id)?)
}

#[tauri::command]
pub fn history_clear(history: History<'_>) -> Result<(), AppError> {
    Ok(history.clear()?)
}
