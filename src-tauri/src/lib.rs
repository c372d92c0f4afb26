pub mod conversation;
pub mod engine;
pub mod error;
pub mod history;
pub mod language;
pub mod pipeline;
pub mod preferences;
pub mod service;
pub mod settings;
pub mod storage;
pub mod transcript;
pub mod tts;

#[cfg(feature = "shell")]
mod app;
#[cfg(feature = "shell")]
mod commands;

#[cfg(feature = "shell")]
pub use app::run;
