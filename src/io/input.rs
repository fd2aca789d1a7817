use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::models::{Person, Roster, Session};

/// Plenary dates to include; `start` inclusive, `end` exclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date < end)
    }
}

/// Parse a sessions file, keeping only sessions in range that contain spoken text
pub fn parse_sessions_file(path: &Path, range: &DateRange) -> Result<Vec<Session>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_sessions_json(&content, range)
}

/// Parse a JSON array of sessions and apply the date and spoken-text filters
pub fn parse_sessions_json(json: &str, range: &DateRange) -> Result<Vec<Session>> {
    let sessions: Vec<Session> =
        serde_json::from_str(json).context("Failed to parse sessions JSON")?;
    let total = sessions.len();

    let kept: Vec<Session> = sessions
        .into_iter()
        .filter(|s| range.contains(s.date))
        .filter(|s| {
            let keep = s.has_spoken_text();
            if !keep {
                debug!("Dropping session {}: no spoken text", s.date);
            }
            keep
        })
        .collect();

    debug!("Kept {} of {} sessions", kept.len(), total);
    Ok(kept)
}

/// Parse a roster file
pub fn parse_roster_file(path: &Path) -> Result<Roster> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_roster_json(&content)
}

/// Parse a JSON array of people; repeated `person_id`s keep their first entry
pub fn parse_roster_json(json: &str) -> Result<Roster> {
    let people: Vec<Person> = serde_json::from_str(json).context("Failed to parse roster JSON")?;
    Ok(Roster::from_people(people))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSIONS: &str = r#"[
        {"date": "2021-01-31", "components": [
            {"id": "a1", "type": "Spoken Text", "text": "Too early."}
        ]},
        {"date": "2021-02-01", "components": [
            {"id": "b1", "type": "Speaker (MlaName)", "text": "Mr Allister:"},
            {"id": "b2", "type": "Spoken Text", "text": "I beg to move."}
        ]},
        {"date": "2021-02-02", "components": [
            {"id": "c1", "type": "Header", "text": "Assembly Business"}
        ]},
        {"date": "2021-02-08", "components": [
            {"id": "d1", "type": "Spoken Text", "text": "Too late."}
        ]}
    ]"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_is_half_open() {
        let range = DateRange::new(Some(date(2021, 2, 1)), Some(date(2021, 2, 8)));
        assert!(range.contains(date(2021, 2, 1)));
        assert!(range.contains(date(2021, 2, 7)));
        assert!(!range.contains(date(2021, 2, 8)));
        assert!(!range.contains(date(2021, 1, 31)));
        assert!(DateRange::default().contains(date(1999, 1, 1)));
    }

    #[test]
    fn test_parse_sessions_filters() {
        let range = DateRange::new(Some(date(2021, 2, 1)), Some(date(2021, 2, 8)));

        let sessions = parse_sessions_json(SESSIONS, &range).unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].date, date(2021, 2, 1));
    }

    #[test]
    fn test_parse_sessions_unbounded() {
        let sessions = parse_sessions_json(SESSIONS, &DateRange::default()).unwrap();
        assert_eq!(sessions.len(), 3);
    }

    #[test]
    fn test_parse_sessions_invalid_json() {
        let err = parse_sessions_json("{not json", &DateRange::default()).unwrap_err();
        assert!(err.to_string().contains("sessions JSON"));
    }

    #[test]
    fn test_parse_roster_json() {
        let json = r#"[
            {"full_name": "Mr Jim Allister", "affiliation": "TUV", "group": "North Antrim", "person_id": "95"},
            {"full_name": "Ms Paula Bradshaw", "affiliation": "Alliance", "group": "Belfast South", "person_id": "5223"},
            {"full_name": "Mr Jim Allister", "affiliation": "TUV", "group": "North Antrim", "person_id": "95"}
        ]"#;

        let roster = parse_roster_json(json).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.people()[0].person_id, "95");
    }

    #[test]
    fn test_parse_sessions_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, SESSIONS).unwrap();

        let sessions = parse_sessions_file(&path, &DateRange::default()).unwrap();
        assert_eq!(sessions.len(), 3);

        let missing = parse_sessions_file(&dir.path().join("missing.json"), &DateRange::default());
        assert!(missing.is_err());
    }
}
