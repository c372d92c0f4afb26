use serde::{Deserialize, Serialize};

/// One fragment from the recognition result stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub text: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Running transcript of one recognition session. Finals are committed;
/// the latest partial is shown after them but never committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    committed: String,
    partial: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, result: &RecognitionResult) -> String {
        let text = result.text.trim();
        if result.is_final {
            if !text.is_empty() {
                if !self.committed.is_empty() {
                    self.committed.push(' ');
                }
                self.committed.push_str(text);
            }
            self.partial.clear();
        } else {
            self.partial = text.to_string();
        }
        self.display()
    }

    pub fn display(&self) -> String {
        match (self.committed.is_empty(), self.partial.is_empty()) {
            (_, true) => self.committed.clone(),
            (true, false) => self.partial.clone(),
            (false, false) => format!("{} {}", self.committed, self.partial),
        }
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.partial.clear();
    }
}
