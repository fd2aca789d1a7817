use serde::{Deserialize, Serialize};

use super::{Person, SpeechRecord};

/// A speech record joined with the roster entry it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    pub component_id: String,
    pub person_id: String,
    pub speaker_label: String,
    pub text: Option<String>,
    pub interjection: Option<String>,
    pub full_name: String,
    pub affiliation: String,
    pub group: String,
}

impl UnifiedRecord {
    pub fn join(component_id: &str, speech: &SpeechRecord, person: &Person) -> Self {
        Self {
            component_id: component_id.to_string(),
            person_id: person.person_id.clone(),
            speaker_label: speech.speaker_label.clone(),
            text: speech.text.clone(),
            interjection: speech.interjection.clone(),
            full_name: person.full_name.clone(),
            affiliation: person.affiliation.clone(),
            group: person.group.clone(),
        }
    }
}
