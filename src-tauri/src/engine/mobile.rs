//! Bridges to the native recognition, translation and synthesis plugins.
//!
//! Native calls are blocking, so each one runs on the blocking pool. Plugin
//! events come back through an IPC channel handed over with the call and are
//! re-published on the recognition event bus.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tauri::ipc::{Channel, InvokeResponseBody};
use tauri::plugin::mobile::PluginInvokeError;
use tauri::plugin::{Builder, PluginHandle, TauriPlugin};
use tauri::{Manager, Runtime};
use tokio::sync::broadcast;

use super::{
    RecognitionEngine, RecognitionEvent, SpeechSynthesizer, TranslationEngine, EVENT_CAPACITY,
};
use crate::error::EngineError;
use crate::language::{DownloadedModelsResponse, SupportedLanguagesResponse};

#[cfg(target_os = "android")]
const PLUGIN_PACKAGE: &str = "app.parley.engines";

#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_recognition);
#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_translation);
#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_speech);

pub struct MobileEngines<R: Runtime> {
    recognition: PluginHandle<R>,
    translation: PluginHandle<R>,
    speech: PluginHandle<R>,
    events: broadcast::Sender<RecognitionEvent>,
}

/// Registers the native plugins and manages an `Arc<MobileEngines<R>>`.
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("parley-engines")
        .setup(|app, api| {
            #[cfg(target_os = "android")]
            let (recognition, translation, speech) = (
                api.register_android_plugin(PLUGIN_PACKAGE, "RecognitionPlugin")?,
                api.register_android_plugin(PLUGIN_PACKAGE, "TranslationPlugin")?,
                api.register_android_plugin(PLUGIN_PACKAGE, "SpeechPlugin")?,
            );
            #[cfg(target_os = "ios")]
            let (recognition, translation, speech) = (
                api.register_ios_plugin(init_plugin_recognition)?,
                api.register_ios_plugin(init_plugin_translation)?,
                api.register_ios_plugin(init_plugin_speech)?,
            );

            let (events, _) = broadcast::channel(EVENT_CAPACITY);
            app.manage(Arc::new(MobileEngines {
                recognition,
                translation,
                speech,
                events,
            }));
            log::info!("Native engine plugins registered");
            Ok(())
        })
        .build()
}

impl<R: Runtime> MobileEngines<R> {
    /// Channel that decodes plugin events onto the shared bus.
    fn event_channel(&self) -> Channel {
        let events = self.events.clone();
        Channel::new(move |body: InvokeResponseBody| {
            match body.deserialize::<RecognitionEvent>() {
                Ok(event) => {
                    // No subscriber simply means nothing is listening right now.
                    let _ = events.send(event);
                }
                Err(e) => log::warn!("Dropping undecodable plugin event: {e}"),
            }
            Ok(())
        })
    }
}

async fn call<R, T>(
    handle: &PluginHandle<R>,
    command: &'static str,
    payload: Value,
) -> Result<T, EngineError>
where
    R: Runtime,
    T: DeserializeOwned + Send + 'static,
{
    let handle = handle.clone();
    tokio::task::spawn_blocking(move || handle.run_mobile_plugin::<T>(command, payload))
        .await
        .map_err(|e| EngineError::Plugin(format!("{command} task failed: {e}")))?
        .map_err(|e| match e {
            PluginInvokeError::CannotDeserializeResponse(e) => {
                EngineError::Malformed(format!("{command}: {e}"))
            }
            other => EngineError::Plugin(format!("{command}: {other}")),
        })
}

/// Native calls that only acknowledge resolve with an empty object.
#[derive(Deserialize)]
struct Ack {}

#[derive(Deserialize)]
struct Translated {
    text: String,
}

#[async_trait]
impl<R: Runtime> RecognitionEngine for MobileEngines<R> {
    async fn supported_languages(&self) -> Result<SupportedLanguagesResponse, EngineError> {
        call(&self.recognition, "getSupportedLanguages", json!({})).await
    }

    async fn downloaded_models(&self) -> Result<DownloadedModelsResponse, EngineError> {
        call(&self.recognition, "getDownloadedLanguageModels", json!({})).await
    }

    async fn download_model(&self, language: &str) -> Result<(), EngineError> {
        let payload = json!({ "language": language, "onEvent": self.event_channel() });
        call::<R, Ack>(&self.recognition, "downloadLanguageModel", payload)
            .await
            .map(drop)
    }

    async fn start_recognition(&self, language: &str) -> Result<(), EngineError> {
        let payload = json!({ "language": language, "onEvent": self.event_channel() });
        call::<R, Ack>(&self.recognition, "startRecognition", payload)
            .await
            .map(drop)
    }

    async fn stop_recognition(&self) -> Result<(), EngineError> {
        call::<R, Ack>(&self.recognition, "stopRecognition", json!({}))
            .await
            .map(drop)
    }

    fn subscribe(&self) -> broadcast::Receiver<RecognitionEvent> {
        self.events.subscribe()
    }

    async fn remove_all_listeners(&self) -> Result<(), EngineError> {
        call::<R, Ack>(&self.recognition, "removeAllListeners", json!({}))
            .await
            .map(drop)
    }
}

#[async_trait]
impl<R: Runtime> TranslationEngine for MobileEngines<R> {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, EngineError> {
        let payload = json!({ "text": text, "sourceLanguage": source, "targetLanguage": target });
        let translated: Translated = call(&self.translation, "translate", payload).await?;
        Ok(translated.text)
    }

    async fn download_model(&self, language: &str) -> Result<(), EngineError> {
        call::<R, Ack>(&self.translation, "downloadModel", json!({ "language": language }))
            .await
            .map(drop)
    }

    async fn delete_downloaded_model(&self, language: &str) -> Result<(), EngineError> {
        call::<R, Ack>(
            &self.translation,
            "deleteDownloadedModel",
            json!({ "language": language }),
        )
        .await
        .map(drop)
    }
}

#[async_trait]
impl<R: Runtime> SpeechSynthesizer for MobileEngines<R> {
    async fn speak(&self, text: &str, lang: &str) -> Result<(), EngineError> {
        call::<R, Ack>(&self.speech, "speak", json!({ "text": text, "lang": lang }))
            .await
            .map(drop)
    }
}
