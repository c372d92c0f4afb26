//! Seams to the external platform plugins. Recognition, translation and
//! synthesis are black boxes; everything above this module talks to them only
//! through these traits.

#[cfg(all(feature = "shell", mobile))]
pub mod mobile;
mod unsupported;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::EngineError;
use crate::language::{DownloadedModelsResponse, SupportedLanguagesResponse};
use crate::transcript::RecognitionResult;

pub use unsupported::Unsupported;

/// Capacity of the plugin event channel; slow listeners see `Lagged` past it.
pub const EVENT_CAPACITY: usize = 64;

/// Events pushed by the recognition plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum RecognitionEvent {
    RecognitionResult(RecognitionResult),
    DownloadProgress { progress: f32 },
}

#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    async fn supported_languages(&self) -> Result<SupportedLanguagesResponse, EngineError>;

    async fn downloaded_models(&self) -> Result<DownloadedModelsResponse, EngineError>;

    /// Resolves once the model is installed; progress arrives as
    /// [`RecognitionEvent::DownloadProgress`] meanwhile.
    async fn download_model(&self, language: &str) -> Result<(), EngineError>;

    async fn start_recognition(&self, language: &str) -> Result<(), EngineError>;

    async fn stop_recognition(&self) -> Result<(), EngineError>;

    fn subscribe(&self) -> broadcast::Receiver<RecognitionEvent>;

    async fn remove_all_listeners(&self) -> Result<(), EngineError>;
}

#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Codes are already normalized to the engine's bare language codes.
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, EngineError>;

    async fn download_model(&self, language: &str) -> Result<(), EngineError>;

    async fn delete_downloaded_model(&self, language: &str) -> Result<(), EngineError>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, text: &str, lang: &str) -> Result<(), EngineError>;
}
