//! Language identity and the code normalization shared by both engines.
//!
//! The recognition engine reports region-qualified codes (`en-US`) while the
//! translation engine only knows the bare language (`en`). Every lookup that
//! crosses the two code spaces goes through [`normalize_code`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: String,
    pub name: String,
    pub model_name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let code = code.into();
        let model_name = default_model_name(&code);
        Self {
            code,
            name: name.into(),
            model_name,
        }
    }

    pub fn matches(&self, code: &str) -> bool {
        same_language(&self.code, code)
    }
}

/// Strips the region suffix: `en-US` -> `en`.
pub fn normalize_code(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

pub fn same_language(a: &str, b: &str) -> bool {
    normalize_code(a).eq_ignore_ascii_case(normalize_code(b))
}

fn default_model_name(code: &str) -> String {
    format!("model-{code}")
}

/// Languages whose model has been downloaded, compared on normalized codes.
pub fn available_languages(all: &[Language], downloaded: &[String]) -> Vec<Language> {
    all.iter()
        .filter(|lang| downloaded.iter().any(|code| lang.matches(code)))
        .cloned()
        .collect()
}

/// Exact (case-insensitive) model lookup. Region variants are distinct models
/// on the recognition side, so `en-GB` is not covered by `en-US`.
pub fn has_model(code: &str, downloaded: &[String]) -> bool {
    downloaded.iter().any(|d| d.eq_ignore_ascii_case(code))
}

pub fn display_name<'a>(languages: &'a [Language], code: &'a str) -> &'a str {
    languages
        .iter()
        .find(|lang| lang.matches(code))
        .map(|lang| lang.name.as_str())
        .unwrap_or(code)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLanguage {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl From<RawLanguage> for Language {
    fn from(raw: RawLanguage) -> Self {
        let model_name = raw
            .model_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_model_name(&raw.code));
        Self {
            code: raw.code,
            name: raw.name,
            model_name,
        }
    }
}

/// The recognition plugin answers either with a bare array or a wrapped object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SupportedLanguagesResponse {
    List(Vec<RawLanguage>),
    Wrapped { languages: Vec<RawLanguage> },
}

impl SupportedLanguagesResponse {
    pub fn into_languages(self) -> Vec<Language> {
        let raw = match self {
            Self::List(list) => list,
            Self::Wrapped { languages } => languages,
        };
        raw.into_iter().map(Language::from).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadedModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl DownloadedModelsResponse {
    pub fn into_codes(self) -> Vec<String> {
        self.models
            .into_iter()
            .filter_map(|entry| {
                entry
                    .language
                    .filter(|code| !code.is_empty())
                    .or(entry.code)
            })
            .filter(|code| !code.is_empty())
            .collect()
    }
}

/// The user's chosen conversation pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePreference {
    pub first: Language,
    pub second: Language,
}
