use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::language::{available_languages, has_model, Language, LanguagePreference};

/// Snapshot of everything the views render from the orchestration service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechState {
    pub languages: Vec<Language>,
    pub downloaded_models: Vec<String>,
    /// Only languages with a download in flight have an entry.
    pub download_progress: BTreeMap<String, f32>,
    pub downloads_in_flight: BTreeSet<String>,
    pub any_download_in_progress: bool,
    pub recognized_text: String,
    pub is_recognizing: bool,
    pub is_starting_recognition: bool,
    pub preference: Option<LanguagePreference>,
}

impl SpeechState {
    pub fn available_languages(&self) -> Vec<Language> {
        available_languages(&self.languages, &self.downloaded_models)
    }

    pub fn is_downloaded(&self, code: &str) -> bool {
        has_model(code, &self.downloaded_models)
    }

    pub fn is_downloading(&self, code: &str) -> bool {
        self.downloads_in_flight.contains(code)
    }

    /// Registers a download; `false` when one is already in flight for `code`.
    pub(crate) fn begin_download(&mut self, code: &str) -> bool {
        if !self.downloads_in_flight.insert(code.to_string()) {
            return false;
        }
        self.download_progress.insert(code.to_string(), 0.0);
        self.refresh_busy();
        true
    }

    pub(crate) fn set_progress(&mut self, code: &str, progress: f32) -> bool {
        match self.download_progress.get_mut(code) {
            Some(current) => {
                *current = progress.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// Drops every trace of the download for `code`, whatever its outcome.
    pub(crate) fn finish_download(&mut self, code: &str) {
        self.download_progress.remove(code);
        self.downloads_in_flight.remove(code);
        self.refresh_busy();
    }

    fn refresh_busy(&mut self) {
        self.any_download_in_progress =
            !self.download_progress.is_empty() || !self.downloads_in_flight.is_empty();
    }
}
