use std::sync::Arc;
use std::time::Duration;

use crate::engine::SpeechSynthesizer;

/// Pass-through to the synthesis plugin. Failures are logged, never raised.
pub struct TextToSpeech {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    timeout: Duration,
}

impl TextToSpeech {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, timeout: Duration) -> Self {
        Self {
            synthesizer,
            timeout,
        }
    }

    pub async fn speak_text(&self, text: &str, language: &str) {
        if text.trim().is_empty() {
            return;
        }

        match tokio::time::timeout(self.timeout, self.synthesizer.speak(text, language)).await {
            Ok(Ok(())) => log::debug!("Spoke {} chars in {language}", text.len()),
            Ok(Err(e)) => log::error!("Text-to-speech error: {e}"),
            Err(_) => log::error!("Text-to-speech timed out after {:?}", self.timeout),
        }
    }
}
