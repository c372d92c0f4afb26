//! Speech/translation orchestration over the recognition and translation
//! engines.
//!
//! State is published through a [`watch`] channel; views subscribe and render
//! whatever the latest [`SpeechState`] says. Requests the service cannot act
//! on itself (navigating to the download screen) go out as [`Notice`]s.

mod listener;
mod state;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, watch, Mutex};

use crate::engine::{RecognitionEngine, TranslationEngine};
use crate::error::{EngineError, StoreError, TranslateError};
use crate::language::{normalize_code, LanguagePreference};
use crate::preferences::PreferenceStore;
use crate::settings::Settings;

use listener::ListenerGuard;
pub use state::SpeechState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// No language model is installed; the user should be sent to setup.
    SetupRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DownloadOutcome {
    Downloaded,
    AlreadyDownloaded,
    AlreadyInProgress,
}

pub struct SpeechService {
    recognizer: Arc<dyn RecognitionEngine>,
    translator: Arc<dyn TranslationEngine>,
    preferences: PreferenceStore,
    settings: Settings,
    state: Arc<watch::Sender<SpeechState>>,
    notices: broadcast::Sender<Notice>,
    session: Mutex<Option<ListenerGuard>>,
}

impl SpeechService {
    pub fn new(
        recognizer: Arc<dyn RecognitionEngine>,
        translator: Arc<dyn TranslationEngine>,
        preferences: PreferenceStore,
        settings: Settings,
    ) -> Self {
        let (state, _) = watch::channel(SpeechState::default());
        let (notices, _) = broadcast::channel(8);
        Self {
            recognizer,
            translator,
            preferences,
            settings,
            state: Arc::new(state),
            notices,
            session: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SpeechState> {
        self.state.subscribe()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn snapshot(&self) -> SpeechState {
        self.state.borrow().clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn update(&self, f: impl FnOnce(&mut SpeechState)) {
        self.state.send_modify(f);
    }

    /// Languages, installed models, then the preferred pair.
    pub async fn refresh(&self) {
        self.fetch_supported_languages().await;
        self.fetch_downloaded_models().await;
        self.load_preferences();
    }

    pub async fn fetch_supported_languages(&self) {
        let response = with_timeout(
            "getSupportedLanguages",
            self.settings.plugin_timeout(),
            self.recognizer.supported_languages(),
        )
        .await;

        match response {
            Ok(response) => {
                let languages = response.into_languages();
                log::debug!("Fetched {} supported languages", languages.len());
                self.update(|s| s.languages = languages);
            }
            Err(e) => log::error!("Error fetching supported languages: {e}"),
        }
    }

    pub async fn fetch_downloaded_models(&self) {
        let response = with_timeout(
            "getDownloadedLanguageModels",
            self.settings.plugin_timeout(),
            self.recognizer.downloaded_models(),
        )
        .await;

        let models = match response {
            Ok(response) => response.into_codes(),
            Err(e) => {
                log::error!("Error fetching downloaded models: {e}");
                return;
            }
        };

        log::info!("Downloaded models: {models:?}");
        let none_installed = models.is_empty();
        self.update(|s| s.downloaded_models = models);

        if none_installed {
            // Nobody listening just means no view is mounted yet.
            let _ = self.notices.send(Notice::SetupRequired);
        }
    }

    pub async fn download_language(&self, code: &str) -> Result<DownloadOutcome, EngineError> {
        if self.state.borrow().is_downloaded(code) {
            return Ok(DownloadOutcome::AlreadyDownloaded);
        }
        if !self.state.send_if_modified(|s| s.begin_download(code)) {
            log::debug!("Download for {code} already in progress");
            return Ok(DownloadOutcome::AlreadyInProgress);
        }

        let _tracking = DownloadTracking {
            state: self.state.clone(),
            code: code.to_string(),
        };
        let _progress = listener::download_progress(
            self.recognizer.subscribe(),
            self.state.clone(),
            code.to_string(),
        );

        log::info!("Downloading language model {code}");
        let timeout = self.settings.download_timeout();
        let translation_code = normalize_code(code);
        let (recognition, translation) = tokio::join!(
            with_timeout(
                "downloadLanguageModel",
                timeout,
                self.recognizer.download_model(code)
            ),
            with_timeout(
                "downloadModel",
                timeout,
                self.translator.download_model(translation_code)
            ),
        );

        if let Err(e) = translation {
            log::error!("Error downloading translation model ({translation_code}): {e}");
        }

        self.fetch_downloaded_models().await;

        match recognition {
            Ok(()) => {
                log::info!("Language model {code} installed");
                Ok(DownloadOutcome::Downloaded)
            }
            Err(e) => {
                log::error!("Error downloading language model ({code}): {e}");
                Err(e)
            }
        }
    }

    /// Removes the translation model only; failures are logged.
    pub async fn delete_language(&self, code: &str) {
        let language = normalize_code(code);
        let result = with_timeout(
            "deleteDownloadedModel",
            self.settings.plugin_timeout(),
            self.translator.delete_downloaded_model(language),
        )
        .await;

        match result {
            Ok(()) => log::info!("Deleted translation model {language}"),
            Err(e) => log::error!("Error deleting translation model ({language}): {e}"),
        }
    }

    pub async fn start_recognition(&self, code: &str) -> Result<(), EngineError> {
        let mut session = self.session.lock().await;
        self.update(|s| s.is_starting_recognition = true);

        let active = session.is_some() || self.state.borrow().is_recognizing;
        if active {
            log::warn!("Recognition is already in progress. Stopping and restarting...");
            self.stop_locked(&mut session).await;
        }

        self.update(|s| {
            s.recognized_text.clear();
            s.is_recognizing = true;
        });
        let results = listener::results(self.recognizer.subscribe(), self.state.clone());

        let started = with_timeout(
            "startRecognition",
            self.settings.plugin_timeout(),
            self.recognizer.start_recognition(code),
        )
        .await;

        match started {
            Ok(()) => {
                *session = Some(results);
                self.update(|s| s.is_starting_recognition = false);
                log::info!("Started speech recognition for language: {code}");
                Ok(())
            }
            Err(e) => {
                log::error!("Error starting speech recognition: {e}");
                results.release();
                self.update(|s| {
                    s.is_recognizing = false;
                    s.is_starting_recognition = false;
                });
                Err(e)
            }
        }
    }

    pub async fn stop_recognition(&self) {
        let mut session = self.session.lock().await;
        self.stop_locked(&mut session).await;
    }

    async fn stop_locked(&self, session: &mut Option<ListenerGuard>) {
        let timeout = self.settings.plugin_timeout();

        if let Err(e) = with_timeout(
            "stopRecognition",
            timeout,
            self.recognizer.stop_recognition(),
        )
        .await
        {
            log::error!("Error stopping speech recognition: {e}");
        }
        if let Err(e) = with_timeout(
            "removeAllListeners",
            timeout,
            self.recognizer.remove_all_listeners(),
        )
        .await
        {
            log::error!("Error removing listeners: {e}");
        }

        if let Some(listener) = session.take() {
            listener.release();
        }
        self.update(|s| s.is_recognizing = false);
        log::info!("Speech recognition stopped");
    }

    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let source = normalize_code(source);
        let target = normalize_code(target);

        with_timeout(
            "translate",
            self.settings.plugin_timeout(),
            self.translator.translate(text, source, target),
        )
        .await
        .map_err(|e| {
            log::error!("Translation error ({source} -> {target}): {e}");
            TranslateError::Failed
        })
    }

    /// Resolves the pair against the installed languages and publishes it.
    pub fn load_preferences(&self) -> Option<LanguagePreference> {
        let available = self.state.borrow().available_languages();
        let preference = self.preferences.resolve(&available);
        self.update(|s| s.preference = preference.clone());
        preference
    }

    pub fn save_preferences(&self, preference: LanguagePreference) -> Result<(), StoreError> {
        self.preferences.save(&preference)?;
        self.update(|s| s.preference = Some(preference));
        Ok(())
    }
}

/// Clears the download bookkeeping for one language when dropped.
struct DownloadTracking {
    state: Arc<watch::Sender<SpeechState>>,
    code: String,
}

impl Drop for DownloadTracking {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.finish_download(&self.code));
    }
}

async fn with_timeout<T, F>(call: &'static str, after: Duration, future: F) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, EngineError>>,
{
    match tokio::time::timeout(after, future).await {
        Ok(result) => result,
        Err(_) => Err(EngineError::Timeout { call, after }),
    }
}
