#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, Notify};

use parley_lib::engine::{
    RecognitionEngine, RecognitionEvent, SpeechSynthesizer, TranslationEngine, EVENT_CAPACITY,
};
use parley_lib::error::{EngineError, StoreError};
use parley_lib::language::{
    DownloadedModelsResponse, Language, ModelEntry, RawLanguage, SupportedLanguagesResponse,
};
use parley_lib::preferences::PreferenceStore;
use parley_lib::service::SpeechService;
use parley_lib::settings::Settings;
use parley_lib::storage::{KeyValueStore, MemoryStore};

pub fn english() -> Language {
    Language::new("en-US", "English")
}

pub fn french() -> Language {
    Language::new("fr-FR", "French")
}

pub fn spanish() -> Language {
    Language::new("es-ES", "Spanish")
}

pub fn catalog() -> Vec<Language> {
    vec![english(), french(), spanish()]
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().expect("mock state lock")
}

pub struct MockRecognizer {
    languages: Mutex<Vec<Language>>,
    downloaded: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
    fail_languages: AtomicBool,
    fail_start: AtomicBool,
    fail_download: AtomicBool,
    hold_downloads: AtomicBool,
    release: Notify,
    events: broadcast::Sender<RecognitionEvent>,
}

impl MockRecognizer {
    pub fn new(languages: Vec<Language>, downloaded: &[&str]) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            languages: Mutex::new(languages),
            downloaded: Mutex::new(downloaded.iter().map(|c| c.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
            fail_languages: AtomicBool::new(false),
            fail_start: AtomicBool::new(false),
            fail_download: AtomicBool::new(false),
            hold_downloads: AtomicBool::new(false),
            release: Notify::new(),
            events,
        })
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn fail_languages(&self, fail: bool) {
        self.fail_languages.store(fail, Ordering::SeqCst);
    }

    pub fn fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn fail_download(&self, fail: bool) {
        self.fail_download.store(fail, Ordering::SeqCst);
    }

    /// Downloads block until [`MockRecognizer::release_download`].
    pub fn hold_downloads(&self) {
        self.hold_downloads.store(true, Ordering::SeqCst);
    }

    pub fn release_download(&self) {
        self.release.notify_one();
    }

    pub fn set_downloaded(&self, codes: &[&str]) {
        *lock(&self.downloaded) = codes.iter().map(|c| c.to_string()).collect();
    }

    pub fn emit(&self, event: RecognitionEvent) {
        let _ = self.events.send(event);
    }

    fn record(&self, call: impl Into<String>) {
        lock(&self.calls).push(call.into());
    }
}

#[async_trait]
impl RecognitionEngine for MockRecognizer {
    async fn supported_languages(&self) -> Result<SupportedLanguagesResponse, EngineError> {
        self.record("supported_languages");
        if self.fail_languages.load(Ordering::SeqCst) {
            return Err(EngineError::Plugin("languages unavailable".into()));
        }
        let raw = lock(&self.languages)
            .iter()
            .map(|lang| RawLanguage {
                code: lang.code.clone(),
                name: lang.name.clone(),
                model_name: None,
            })
            .collect();
        Ok(SupportedLanguagesResponse::List(raw))
    }

    async fn downloaded_models(&self) -> Result<DownloadedModelsResponse, EngineError> {
        self.record("downloaded_models");
        let models = lock(&self.downloaded)
            .iter()
            .map(|code| ModelEntry {
                language: Some(code.clone()),
                code: None,
            })
            .collect();
        Ok(DownloadedModelsResponse { models })
    }

    async fn download_model(&self, language: &str) -> Result<(), EngineError> {
        self.record(format!("download:{language}"));
        if self.hold_downloads.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(EngineError::Plugin("download failed".into()));
        }
        lock(&self.downloaded).push(language.to_string());
        Ok(())
    }

    async fn start_recognition(&self, language: &str) -> Result<(), EngineError> {
        self.record(format!("start:{language}"));
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(EngineError::Plugin("microphone busy".into()));
        }
        Ok(())
    }

    async fn stop_recognition(&self) -> Result<(), EngineError> {
        self.record("stop");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<RecognitionEvent> {
        self.events.subscribe()
    }

    async fn remove_all_listeners(&self) -> Result<(), EngineError> {
        self.record("remove_all_listeners");
        Ok(())
    }
}

#[derive(Default)]
pub struct MockTranslator {
    calls: Mutex<Vec<(String, String, String)>>,
    downloads: Mutex<Vec<String>>,
    deletions: Mutex<Vec<String>>,
    fail: AtomicBool,
    fail_download: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl MockTranslator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `(text, source, target)` for every translate call.
    pub fn calls(&self) -> Vec<(String, String, String)> {
        lock(&self.calls).clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        lock(&self.downloads).clone()
    }

    pub fn deletions(&self) -> Vec<String> {
        lock(&self.deletions).clone()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn fail_download(&self, fail: bool) {
        self.fail_download.store(fail, Ordering::SeqCst);
    }

    pub fn delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }
}

/// What [`MockTranslator`] answers for a successful call.
pub fn translated(text: &str, source: &str, target: &str) -> String {
    format!("{text} [{source}->{target}]")
}

#[async_trait]
impl TranslationEngine for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, EngineError> {
        lock(&self.calls).push((text.to_string(), source.to_string(), target.to_string()));
        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::Plugin("model missing".into()));
        }
        Ok(translated(text, source, target))
    }

    async fn download_model(&self, language: &str) -> Result<(), EngineError> {
        lock(&self.downloads).push(language.to_string());
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(EngineError::Plugin("translation download failed".into()));
        }
        Ok(())
    }

    async fn delete_downloaded_model(&self, language: &str) -> Result<(), EngineError> {
        lock(&self.deletions).push(language.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::Plugin("delete failed".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockSynthesizer {
    spoken: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl MockSynthesizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spoken(&self) -> Vec<(String, String)> {
        lock(&self.spoken).clone()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn speak(&self, text: &str, lang: &str) -> Result<(), EngineError> {
        lock(&self.spoken).push((text.to_string(), lang.to_string()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::Plugin("no voice".into()));
        }
        Ok(())
    }
}

/// A store whose writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk unreadable".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".into()));
        }
        self.inner.remove(key)
    }
}

pub fn service_with(
    recognizer: Arc<MockRecognizer>,
    translator: Arc<MockTranslator>,
    store: Arc<dyn KeyValueStore>,
    settings: Settings,
) -> Arc<SpeechService> {
    Arc::new(SpeechService::new(
        recognizer,
        translator,
        PreferenceStore::new(store),
        settings,
    ))
}

pub fn service(
    recognizer: Arc<MockRecognizer>,
    translator: Arc<MockTranslator>,
) -> Arc<SpeechService> {
    service_with(
        recognizer,
        translator,
        Arc::new(MemoryStore::new()),
        Settings::default(),
    )
}

/// Polls `condition` on the (usually paused) clock.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("condition not reached");
}
