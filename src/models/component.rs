use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of a Hansard component, mapped from the raw `ComponentType` string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    /// Any `Speaker (...)` header introducing who speaks next
    SpeakerHeader,
    /// The words spoken by the current speaker
    SpokenText,
    /// A procedural line such as `[Interruption.]`
    ProcedureLine,
    /// A tabled question
    Question,
    /// Anything else, carried through untouched
    Other(String),
}

impl ComponentType {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::SpeakerHeader => "Speaker",
            ComponentType::SpokenText => "Spoken Text",
            ComponentType::ProcedureLine => "Procedure Line",
            ComponentType::Question => "Question",
            ComponentType::Other(raw) => raw,
        }
    }
}

impl From<&str> for ComponentType {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "Spoken Text" => ComponentType::SpokenText,
            "Procedure Line" => ComponentType::ProcedureLine,
            "Question" => ComponentType::Question,
            s if s.starts_with("Speaker") => ComponentType::SpeakerHeader,
            _ => ComponentType::Other(raw.to_string()),
        }
    }
}

impl From<String> for ComponentType {
    fn from(raw: String) -> Self {
        ComponentType::from(raw.as_str())
    }
}

impl From<ComponentType> for String {
    fn from(kind: ComponentType) -> Self {
        match kind {
            ComponentType::Other(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transcript element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Identifier, unique within a session
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    #[serde(default)]
    pub text: String,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentType, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            text: text.into(),
        }
    }
}

/// One plenary sitting: an ordered run of components for a single date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Session {
    /// Whether any component in the session is spoken text
    pub fn has_spoken_text(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.kind == ComponentType::SpokenText)
    }
}
