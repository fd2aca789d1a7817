use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A member of the roster that speech records may be matched against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// "Title Firstname [Middle...] Surname"
    pub full_name: String,
    /// e.g. party
    pub affiliation: String,
    /// e.g. constituency
    pub group: String,
    pub person_id: String,
}

impl Person {
    pub fn new(
        full_name: impl Into<String>,
        affiliation: impl Into<String>,
        group: impl Into<String>,
        person_id: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            affiliation: affiliation.into(),
            group: group.into(),
            person_id: person_id.into(),
        }
    }

    pub fn name_tokens(&self) -> Vec<&str> {
        self.full_name.split_whitespace().collect()
    }
}

/// The set of known people for a date range, in ingestion order
///
/// Ingestion order is the tie-break order used by name resolution.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    people: Vec<Person>,
}

impl Roster {
    /// Build a roster, keeping only the first entry seen for each `person_id`
    pub fn from_people(people: impl IntoIterator<Item = Person>) -> Self {
        let mut seen = HashSet::new();
        let people = people
            .into_iter()
            .filter(|p| seen.insert(p.person_id.clone()))
            .collect();
        Self { people }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

/// Matching tier a label variant belongs to, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// "Mr Allister"
    TitleSurname,
    /// "Mr J Allister"
    TitleInitialSurname,
    /// "Mr Dickson Haughey" style compound surnames
    CompoundSurname,
}

impl MatchTier {
    pub const ORDER: [MatchTier; 3] = [
        MatchTier::TitleSurname,
        MatchTier::TitleInitialSurname,
        MatchTier::CompoundSurname,
    ];
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchTier::TitleSurname => "title+surname",
            MatchTier::TitleInitialSurname => "title+initial+surname",
            MatchTier::CompoundSurname => "compound surname",
        };
        f.write_str(name)
    }
}

/// A derived candidate label pointing back at one person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVariant {
    pub tier: MatchTier,
    pub label: String,
    pub person_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_dedups_by_person_id() {
        let roster = Roster::from_people(vec![
            Person::new("Mr Jim Allister", "TUV", "North Antrim", "1"),
            Person::new("Ms Paula Bradshaw", "Alliance", "Belfast South", "2"),
            Person::new("Mr James Allister", "TUV", "North Antrim", "1"),
        ]);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.people()[0].full_name, "Mr Jim Allister");
        assert_eq!(roster.people()[1].person_id, "2");
    }

    #[test]
    fn test_name_tokens_ignore_extra_whitespace() {
        let person = Person::new("  Mr  Jim Allister ", "TUV", "North Antrim", "1");
        assert_eq!(person.name_tokens(), vec!["Mr", "Jim", "Allister"]);
    }
}
