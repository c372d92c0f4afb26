//! The two-sided conversation behind the home screen.
//!
//! Each side owns a [`DebouncedPipeline`] that translates into the opposite
//! side. Recognized speech for the active side is fed through the same
//! pipeline as typed text, so both paths share debouncing and history.

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::{EngineError, TranslateError};
use crate::history::{HistoryStore, TranslationHistoryItem};
use crate::language::{display_name, Language, LanguagePreference};
use crate::pipeline::DebouncedPipeline;
use crate::service::{SpeechService, SpeechState};
use crate::tts::TextToSpeech;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub top_text: String,
    pub bottom_text: String,
    pub top_language: String,
    pub bottom_language: String,
    pub active_side: Option<Side>,
    pub last_error: Option<String>,
    /// Bumped on every write to that side's text. Views compare against
    /// their own edits so a late echo never overwrites newer input.
    pub top_revision: u64,
    pub bottom_revision: u64,
}

impl ConversationState {
    pub fn text(&self, side: Side) -> &str {
        match side {
            Side::Top => &self.top_text,
            Side::Bottom => &self.bottom_text,
        }
    }

    pub fn language(&self, side: Side) -> &str {
        match side {
            Side::Top => &self.top_language,
            Side::Bottom => &self.bottom_language,
        }
    }

    pub fn revision(&self, side: Side) -> u64 {
        match side {
            Side::Top => self.top_revision,
            Side::Bottom => self.bottom_revision,
        }
    }

    fn set_text(&mut self, side: Side, text: String) {
        let (slot, revision) = match side {
            Side::Top => (&mut self.top_text, &mut self.top_revision),
            Side::Bottom => (&mut self.bottom_text, &mut self.bottom_revision),
        };
        *slot = text;
        *revision += 1;
    }

    /// Records an edit made in a view. The revision never moves backwards.
    fn set_edited_text(&mut self, side: Side, text: String, edit: u64) {
        self.set_text(side, text);
        let revision = match side {
            Side::Top => &mut self.top_revision,
            Side::Bottom => &mut self.bottom_revision,
        };
        *revision = (*revision).max(edit);
    }

    fn language_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::Top => &mut self.top_language,
            Side::Bottom => &mut self.bottom_language,
        }
    }
}

/// What the home screen renders: the state plus both direction titles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    #[serde(flatten)]
    pub state: ConversationState,
    pub top_title: String,
    pub bottom_title: String,
}

pub struct Conversation {
    service: Arc<SpeechService>,
    tts: TextToSpeech,
    state: Arc<watch::Sender<ConversationState>>,
    top: DebouncedPipeline,
    bottom: DebouncedPipeline,
}

impl Conversation {
    /// Must be called inside a Tokio runtime: the pipelines and the
    /// recognition forwarder are spawned here.
    pub fn new(
        service: Arc<SpeechService>,
        history: Arc<HistoryStore>,
        tts: TextToSpeech,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(ConversationState::default());
        let state = Arc::new(state);

        let conversation = Arc::new(Self {
            top: side_pipeline(Side::Top, &service, &history, &state),
            bottom: side_pipeline(Side::Bottom, &service, &history, &state),
            service,
            tts,
            state,
        });

        follow_speech(Arc::downgrade(&conversation));
        conversation
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> ConversationView {
        let (top_title, bottom_title) = self.titles();
        ConversationView {
            state: self.snapshot(),
            top_title,
            bottom_title,
        }
    }

    fn pipeline(&self, side: Side) -> &DebouncedPipeline {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    pub fn on_text_change(&self, side: Side, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.set_text(side, text.clone()));
        self.pipeline(side).push(text);
    }

    /// Text typed in a view, tagged with the view's revision for that side.
    pub fn on_edit(&self, side: Side, text: impl Into<String>, revision: u64) {
        let text = text.into();
        self.state
            .send_modify(|s| s.set_edited_text(side, text.clone(), revision));
        self.pipeline(side).push(text);
    }

    /// Switches both selections to `preference` where its codes are usable.
    pub fn apply_preference(&self, preference: &LanguagePreference) {
        let speech = self.service.snapshot();
        let pool = selectable(&speech);
        let usable = |code: &str| pool.iter().any(|lang| lang.code == code);

        self.state.send_if_modified(|s| {
            let mut changed = false;
            for (side, code) in [
                (Side::Top, preference.first.code.as_str()),
                (Side::Bottom, preference.second.code.as_str()),
            ] {
                if usable(code) && s.language(side) != code {
                    *s.language_mut(side) = code.to_string();
                    changed = true;
                }
            }
            changed
        });
    }

    /// Keeps both selections pointing at usable languages: the installed
    /// ones when any exist, otherwise everything the engine supports.
    pub fn sync_languages(&self) {
        let speech = self.service.snapshot();
        let pool = selectable(&speech);
        let codes: Vec<&str> = pool.iter().map(|lang| lang.code.as_str()).collect();
        let Some(first) = codes.first().copied() else {
            return;
        };
        let second = codes.get(1).copied().unwrap_or(first);

        let preferred = speech.preference.as_ref();
        let preferred_top = preferred
            .map(|p| p.first.code.as_str())
            .filter(|code| codes.contains(code));
        let preferred_bottom = preferred
            .map(|p| p.second.code.as_str())
            .filter(|code| codes.contains(code));

        self.state.send_if_modified(|s| {
            let mut changed = false;
            if !codes.contains(&s.top_language.as_str()) {
                s.top_language = preferred_top.unwrap_or(first).to_string();
                changed = true;
            }
            if !codes.contains(&s.bottom_language.as_str()) {
                s.bottom_language = preferred_bottom.unwrap_or(second).to_string();
                changed = true;
            }
            changed
        });
    }

    /// Switches the language of `side`, translating any text it holds from
    /// the previous language into the new one.
    pub async fn change_language(&self, side: Side, code: &str) -> Result<(), TranslateError> {
        let mut previous = String::new();
        let mut text = String::new();
        self.state.send_modify(|s| {
            previous = std::mem::replace(s.language_mut(side), code.to_string());
            text = s.text(side).to_string();
        });

        if text.trim().is_empty() || previous.is_empty() || previous == code {
            return Ok(());
        }

        match self.service.translate(&text, &previous, code).await {
            Ok(translated) => {
                self.state.send_modify(|s| {
                    s.set_text(side, translated);
                    s.last_error = None;
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| s.last_error = Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// "English to French" style titles, top-to-bottom first.
    pub fn titles(&self) -> (String, String) {
        let speech = self.service.snapshot();
        let state = self.state.borrow();
        let top = display_name(&speech.languages, &state.top_language);
        let bottom = display_name(&speech.languages, &state.bottom_language);
        (format!("{top} to {bottom}"), format!("{bottom} to {top}"))
    }

    pub async fn start_recording(&self, side: Side) -> Result<(), EngineError> {
        let language = {
            let mut language = String::new();
            self.state.send_modify(|s| {
                s.active_side = Some(side);
                language = s.language(side).to_string();
            });
            language
        };

        let started = self.service.start_recognition(&language).await;
        if started.is_err() {
            self.state.send_modify(|s| s.active_side = None);
        }
        started
    }

    pub async fn stop_recording(&self) {
        if self.service.snapshot().is_recognizing {
            self.service.stop_recognition().await;
        }
        self.state.send_modify(|s| s.active_side = None);
    }

    pub async fn speak(&self, side: Side) {
        let (text, language) = {
            let state = self.state.borrow();
            (state.text(side).to_string(), state.language(side).to_string())
        };
        self.tts.speak_text(&text, &language).await;
    }
}

fn side_pipeline(
    side: Side,
    service: &Arc<SpeechService>,
    history: &Arc<HistoryStore>,
    state: &Arc<watch::Sender<ConversationState>>,
) -> DebouncedPipeline {
    let translate = {
        let service = service.clone();
        let state = state.clone();
        move |text: String| {
            let service = service.clone();
            let (source, target) = {
                let s = state.borrow();
                (
                    s.language(side).to_string(),
                    s.language(side.opposite()).to_string(),
                )
            };
            async move { service.translate(&text, &source, &target).await }
        }
    };

    let sink = {
        let service = service.clone();
        let history = history.clone();
        let state = state.clone();
        move |source_text: String, result: Result<String, TranslateError>| match result {
            Ok(translated) => {
                let (from_code, to_code) = {
                    let s = state.borrow();
                    (
                        s.language(side).to_string(),
                        s.language(side.opposite()).to_string(),
                    )
                };
                state.send_modify(|s| {
                    s.set_text(side.opposite(), translated.clone());
                    s.last_error = None;
                });
                if !translated.is_empty() {
                    let entry = history_entry(&service, source_text, translated, &from_code, &to_code);
                    if let Err(e) = history.add_or_update(entry) {
                        log::warn!("Translation was not recorded in history: {e}");
                    }
                }
            }
            Err(e) => {
                log::error!("{side:?} translation failed: {e}");
                state.send_modify(|s| {
                    s.set_text(side.opposite(), String::new());
                    s.last_error = Some(e.to_string());
                });
            }
        }
    };

    DebouncedPipeline::spawn(service.settings().debounce(), translate, sink)
}

/// Installed languages, or everything supported when none are installed.
fn selectable(speech: &SpeechState) -> Vec<Language> {
    let available = speech.available_languages();
    if available.is_empty() {
        speech.languages.clone()
    } else {
        available
    }
}

/// History rows carry display names rather than codes.
fn history_entry(
    service: &SpeechService,
    from_text: String,
    to_text: String,
    from_code: &str,
    to_code: &str,
) -> TranslationHistoryItem {
    let languages = service.snapshot().languages;
    TranslationHistoryItem::new(
        from_text,
        to_text,
        display_name(&languages, from_code),
        display_name(&languages, to_code),
    )
}

/// Follows the speech state: applies a newly published preference, keeps
/// selections valid, and feeds recognized speech into the active side.
fn follow_speech(conversation: Weak<Conversation>) {
    let Some(mut speech) = conversation.upgrade().map(|c| c.service.subscribe()) else {
        return;
    };

    tokio::spawn(async move {
        let mut last_forwarded: Option<String> = None;
        let mut last_preference = speech.borrow().preference.clone();
        while speech.changed().await.is_ok() {
            let Some(conversation) = conversation.upgrade() else {
                break;
            };
            let (recognizing, text, preference) = {
                let s = speech.borrow_and_update();
                (s.is_recognizing, s.recognized_text.clone(), s.preference.clone())
            };

            if preference != last_preference {
                if let Some(pair) = &preference {
                    log::debug!(
                        "Applying language preference {} / {}",
                        pair.first.code,
                        pair.second.code
                    );
                    conversation.apply_preference(pair);
                }
                last_preference = preference;
            }
            conversation.sync_languages();

            let active = conversation.state.borrow().active_side;
            match active {
                Some(side) if recognizing => {
                    if last_forwarded.as_deref() != Some(text.as_str()) {
                        conversation.on_text_change(side, text.clone());
                        last_forwarded = Some(text);
                    }
                }
                _ => last_forwarded = None,
            }
        }
    });
}
