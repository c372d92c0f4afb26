use std::time::Duration;

use thiserror::Error;

/// Failures reported by the external recognition, translation and synthesis plugins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Plugin call failed: {0}")]
    Plugin(String),

    #[error("Plugin call `{call}` timed out after {after:?}")]
    Timeout { call: &'static str, after: Duration },

    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed plugin response: {0}")]
    Malformed(String),
}

impl EngineError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Plugin(_) => "The speech engine reported an error. Please try again.",
            Self::Timeout { .. } => "The speech engine did not respond in time. Please try again.",
            Self::Unavailable(_) => "Offline speech and translation are not available on this device.",
            Self::Malformed(_) => "The speech engine returned an unexpected response.",
        }
    }
}

/// The single user-facing translation failure. Engine detail is logged, never carried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("An error occurred while translating. Please try again later.")]
    Failed,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend: {0}")]
    Backend(String),

    #[error("Serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Unified app errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Engine: {0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Translate(#[from] TranslateError),

    #[error("Storage: {0}")]
    Store(#[from] StoreError),

    #[error("Settings: {0}")]
    Settings(String),
}

impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Engine(err) => err.user_message().to_string(),
            Self::Translate(err) => err.to_string(),
            Self::Store(_) => "The app could not save its local data.".to_string(),
            Self::Settings(msg) => msg.clone(),
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.user_message())
    }
}
