use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Person, Roster, SpeechRecord, UnifiedRecord};

/// Execute Stage 2: join resolved speech records with their roster entries
///
/// Every resolved component must exist in `speech_records` and point at a
/// person in `roster`; a missing key means the resolver and assembler
/// disagree, and unification stops with an error.
pub fn unify(
    resolved: &BTreeMap<String, String>,
    speech_records: &BTreeMap<String, SpeechRecord>,
    roster: &Roster,
) -> PipelineResult<BTreeMap<String, UnifiedRecord>> {
    let people: HashMap<&str, &Person> = roster
        .people()
        .iter()
        .map(|p| (p.person_id.as_str(), p))
        .collect();

    let mut unified = BTreeMap::new();
    for (component_id, person_id) in resolved {
        let speech = speech_records
            .get(component_id)
            .ok_or_else(|| PipelineError::MissingSpeechRecord {
                component_id: component_id.clone(),
            })?;
        let person = people
            .get(person_id.as_str())
            .ok_or_else(|| PipelineError::MissingPerson {
                component_id: component_id.clone(),
                person_id: person_id.clone(),
            })?;

        unified.insert(
            component_id.clone(),
            UnifiedRecord::join(component_id, speech, person),
        );
    }

    info!("Stage 2: {} unified records", unified.len());
    Ok(unified)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (BTreeMap<String, SpeechRecord>, Roster) {
        let mut speech = BTreeMap::new();
        speech.insert(
            "h1".to_string(),
            SpeechRecord::new("Mr Allister")
                .with_text("I beg to move.")
                .with_interjection("[Interruption.]"),
        );
        speech.insert(
            "h2".to_string(),
            SpeechRecord::new("Ms Bradshaw").with_text("Thank you."),
        );
        let roster = Roster::from_people(vec![
            Person::new("Mr Jim Allister", "TUV", "North Antrim", "1"),
            Person::new("Ms Paula Bradshaw", "Alliance", "Belfast South", "2"),
        ]);
        (speech, roster)
    }

    #[test]
    fn test_unify_joins_fields_unchanged() {
        let (speech, roster) = fixtures();
        let resolved = BTreeMap::from([("h1".to_string(), "1".to_string())]);

        let unified = unify(&resolved, &speech, &roster).unwrap();

        assert_eq!(unified.len(), 1);
        let record = &unified["h1"];
        assert_eq!(record.component_id, "h1");
        assert_eq!(record.person_id, "1");
        assert_eq!(record.speaker_label, "Mr Allister");
        assert_eq!(record.text.as_deref(), Some("I beg to move."));
        assert_eq!(record.interjection.as_deref(), Some("[Interruption.]"));
        assert_eq!(record.full_name, "Mr Jim Allister");
        assert_eq!(record.affiliation, "TUV");
        assert_eq!(record.group, "North Antrim");
    }

    #[test]
    fn test_missing_speech_record_is_fatal() {
        let (speech, roster) = fixtures();
        let resolved = BTreeMap::from([("h9".to_string(), "1".to_string())]);

        let err = unify(&resolved, &speech, &roster).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::MissingSpeechRecord { ref component_id } if component_id == "h9"
        ));
    }

    #[test]
    fn test_missing_person_is_fatal() {
        let (speech, roster) = fixtures();
        let resolved = BTreeMap::from([("h2".to_string(), "42".to_string())]);

        let err = unify(&resolved, &speech, &roster).unwrap_err();

        assert!(err.to_string().contains("unknown person 42"));
    }

    #[test]
    fn test_unify_empty() {
        let (speech, roster) = fixtures();
        let unified = unify(&BTreeMap::new(), &speech, &roster).unwrap();
        assert!(unified.is_empty());
    }
}
