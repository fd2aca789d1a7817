use serde::{Deserialize, Serialize};

use super::ComponentType;

/// One attributed utterance assembled from a speaker header and its text
///
/// Values are never mutated in place; the `with_*` methods consume the
/// record and return the updated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRecord {
    /// Normalized speaker label, e.g. "Mr Allister"
    pub speaker_label: String,
    pub text: Option<String>,
    /// Procedural marker attached after the text, e.g. "[Interruption.]"
    pub interjection: Option<String>,
}

impl SpeechRecord {
    pub fn new(speaker_label: impl Into<String>) -> Self {
        Self {
            speaker_label: speaker_label.into(),
            text: None,
            interjection: None,
        }
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..self
        }
    }

    /// Attach an interjection. Has no effect until a text is present.
    pub fn with_interjection(self, interjection: impl Into<String>) -> Self {
        if self.text.is_none() {
            return self;
        }
        Self {
            interjection: Some(interjection.into()),
            ..self
        }
    }

    pub fn has_speaker(&self) -> bool {
        !self.speaker_label.is_empty()
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Whether this record meets the condition for being committed
    pub fn is_committable(&self) -> bool {
        self.has_speaker() && self.has_text()
    }
}

/// A component that could not be placed into a speech record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    /// The open record at the time, if any
    pub prior_record: Option<SpeechRecord>,
    pub component_type: ComponentType,
    pub component_text: String,
}

/// A question component collected alongside the speech records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub component_id: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interjection_requires_text() {
        let record = SpeechRecord::new("Mr Allister").with_interjection("[Laughter.]");
        assert_eq!(record.interjection, None);

        let record = record.with_text("Hear, hear.").with_interjection("[Laughter.]");
        assert_eq!(record.interjection.as_deref(), Some("[Laughter.]"));
    }

    #[test]
    fn test_is_committable() {
        assert!(!SpeechRecord::new("").with_text("text").is_committable());
        assert!(!SpeechRecord::new("Ms Bradshaw").is_committable());
        assert!(SpeechRecord::new("Ms Bradshaw").with_text("text").is_committable());
    }
}
