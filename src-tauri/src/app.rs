use std::sync::Arc;

use tauri::{App, AppHandle, Builder, Emitter, Manager};

use crate::commands;
use crate::conversation::Conversation;
use crate::engine::{RecognitionEngine, SpeechSynthesizer, TranslationEngine};
use crate::history::HistoryStore;
use crate::preferences::PreferenceStore;
use crate::service::{Notice, SpeechService};
use crate::settings::get_settings;
use crate::storage::{KeyValueStore, TauriKvStore};
use crate::tts::TextToSpeech;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let context = tauri::generate_context!();

    let builder = Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .targets([
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Stdout),
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::LogDir {
                        file_name: None,
                    }),
                ])
                .rotation_strategy(tauri_plugin_log::RotationStrategy::KeepAll)
                .max_file_size(2_000_000)
                .timezone_strategy(tauri_plugin_log::TimezoneStrategy::UseLocal)
                .level(log::LevelFilter::Info)
                .build(),
        )
        .plugin(tauri_plugin_store::Builder::default().build());

    #[cfg(mobile)]
    let builder = builder.plugin(crate::engine::mobile::init());

    builder
        .setup(setup)
        .invoke_handler(tauri::generate_handler![
            commands::speech_state,
            commands::load_languages,
            commands::download_language,
            commands::delete_language,
            commands::start_recording,
            commands::stop_recording,
            commands::update_text,
            commands::change_language,
            commands::speak,
            commands::conversation_state,
            commands::save_preferences,
            commands::history_list,
            commands::history_delete,
            commands::history_clear
        ])
        .run(context)
        .expect("error while running tauri application");
}

type Engines = (
    Arc<dyn RecognitionEngine>,
    Arc<dyn TranslationEngine>,
    Arc<dyn SpeechSynthesizer>,
);

#[cfg(mobile)]
fn engines(app: &App) -> Engines {
    let native = app
        .state::<Arc<crate::engine::mobile::MobileEngines<tauri::Wry>>>()
        .inner()
        .clone();
    (native.clone(), native.clone(), native)
}

#[cfg(not(mobile))]
fn engines(_app: &App) -> Engines {
    log::warn!("Offline speech plugins are only available on mobile");
    let unsupported = Arc::new(crate::engine::Unsupported::new());
    (unsupported.clone(), unsupported.clone(), unsupported)
}

fn setup(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn KeyValueStore> = Arc::new(TauriKvStore::open(app.handle())?);
    let settings = get_settings(store.as_ref());
    log::info!("Loaded settings: {settings:?}");

    let (recognizer, translator, synthesizer) = engines(app);
    let service = Arc::new(SpeechService::new(
        recognizer,
        translator,
        PreferenceStore::new(store.clone()),
        settings.clone(),
    ));
    let history = Arc::new(HistoryStore::open(store, &settings));
    let tts = TextToSpeech::new(synthesizer, settings.plugin_timeout());

    // Pipelines spawn onto the runtime, so build inside it.
    let conversation = tauri::async_runtime::block_on({
        let service = service.clone();
        let history = history.clone();
        async move { Conversation::new(service, history, tts) }
    });

    forward_events(
        app.handle().clone(),
        service.clone(),
        history.clone(),
        conversation.clone(),
    );

    app.manage(service.clone());
    app.manage(history);
    app.manage(conversation);

    tauri::async_runtime::spawn(async move {
        service.refresh().await;
    });

    Ok(())
}

/// Pushes every state change to the webview.
fn forward_events(
    app: AppHandle,
    service: Arc<SpeechService>,
    history: Arc<HistoryStore>,
    conversation: Arc<Conversation>,
) {
    let mut speech = service.subscribe();
    let mut notices = service.notices();
    let mut changes = history.subscribe();
    let mut updates = conversation.subscribe();

    {
        let app = app.clone();
        tauri::async_runtime::spawn(async move {
            while speech.changed().await.is_ok() {
                let snapshot = speech.borrow_and_update().clone();
                emit(&app, "speech_state", snapshot);
            }
        });
    }

    {
        let app = app.clone();
        tauri::async_runtime::spawn(async move {
            while updates.changed().await.is_ok() {
                updates.borrow_and_update();
                emit(&app, "conversation_update", conversation.view());
            }
        });
    }

    {
        let app = app.clone();
        tauri::async_runtime::spawn(async move {
            while changes.changed().await.is_ok() {
                changes.borrow_and_update();
                emit(&app, "history_changed", history.items());
            }
        });
    }

    tauri::async_runtime::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(Notice::SetupRequired) => emit(&app, "navigate", "languages-download"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

fn emit<S: serde::Serialize + Clone>(app: &AppHandle, event: &str, payload: S) {
    if let Err(e) = app.emit(event, payload) {
        log::error!("Failed to emit {event}: {e}");
    }
}
