use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{
    RecognitionEngine, RecognitionEvent, SpeechSynthesizer, TranslationEngine, EVENT_CAPACITY,
};
use crate::error::EngineError;
use crate::language::{DownloadedModelsResponse, SupportedLanguagesResponse};

/// Stand-in for platforms that ship none of the offline plugins.
pub struct Unsupported {
    events: broadcast::Sender<RecognitionEvent>,
}

impl Default for Unsupported {
    fn default() -> Self {
        Self::new()
    }
}

impl Unsupported {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { events }
    }

    fn unavailable<T>(what: &str) -> Result<T, EngineError> {
        Err(EngineError::Unavailable(format!(
            "{what} requires the mobile offline plugins"
        )))
    }
}

#[async_trait]
impl RecognitionEngine for Unsupported {
    async fn supported_languages(&self) -> Result<SupportedLanguagesResponse, EngineError> {
        Self::unavailable("getSupportedLanguages")
    }

    async fn downloaded_models(&self) -> Result<DownloadedModelsResponse, EngineError> {
        Self::unavailable("getDownloadedLanguageModels")
    }

    async fn download_model(&self, _language: &str) -> Result<(), EngineError> {
        Self::unavailable("downloadLanguageModel")
    }

    async fn start_recognition(&self, _language: &str) -> Result<(), EngineError> {
        Self::unavailable("startRecognition")
    }

    async fn stop_recognition(&self) -> Result<(), EngineError> {
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<RecognitionEvent> {
        self.events.subscribe()
    }

    async fn remove_all_listeners(&self) -> Result<(), EngineError> {
        Ok(())
    }
}

#[async_trait]
impl TranslationEngine for Unsupported {
    async fn translate(
        &self,
        _text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, EngineError> {
        Self::unavailable("translate")
    }

    async fn download_model(&self, _language: &str) -> Result<(), EngineError> {
        Self::unavailable("downloadModel")
    }

    async fn delete_downloaded_model(&self, _language: &str) -> Result<(), EngineError> {
        Self::unavailable("deleteDownloadedModel")
    }
}

#[async_trait]
impl SpeechSynthesizer for Unsupported {
    async fn speak(&self, _text: &str, _lang: &str) -> Result<(), EngineError> {
        Self::unavailable("speak")
    }
}
