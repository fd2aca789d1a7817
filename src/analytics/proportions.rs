use std::collections::BTreeMap;

use crate::models::{Person, Roster, UnifiedRecord};

use super::{Identifier, Metric, RecordMetrics};

impl Identifier {
    pub fn of_person<'a>(&self, person: &'a Person) -> &'a str {
        match self {
            Identifier::Affiliation => &person.affiliation,
            Identifier::Group => &person.group,
        }
    }

    pub fn of_record<'a>(&self, record: &'a UnifiedRecord) -> &'a str {
        match self {
            Identifier::Affiliation => &record.affiliation,
            Identifier::Group => &record.group,
        }
    }
}

/// Share of roster members holding each value of `identifier`
pub fn roster_proportions(roster: &Roster, identifier: Identifier) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for person in roster.people() {
        *counts
            .entry(identifier.of_person(person).to_string())
            .or_default() += 1;
    }

    let total = roster.len();
    counts
        .into_iter()
        .map(|(value, count)| (value, count as f64 / total as f64))
        .collect()
}

/// Compare how a metric is distributed across the values of `identifier`
///
/// Proportional metrics report each group's share of the total minus its
/// roster share, in percentage points to one decimal place. Mean metrics
/// report the per-group mean over records that carry a score.
pub fn compare_groups(
    records: &[(&UnifiedRecord, &RecordMetrics)],
    identifier: Identifier,
    metric: Metric,
    expected: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (record, metrics) in records {
        if let Some(value) = metric.value(metrics) {
            let entry = totals
                .entry(identifier.of_record(record).to_string())
                .or_default();
            entry.0 += value;
            entry.1 += 1;
        }
    }

    if metric.is_proportional() {
        let grand_total: f64 = totals.values().map(|(sum, _)| sum).sum();
        if grand_total == 0.0 {
            return BTreeMap::new();
        }
        totals
            .into_iter()
            .map(|(group, (sum, _))| {
                let expected_share = expected.get(&group).copied().unwrap_or(0.0);
                let diff = (sum / grand_total - expected_share) * 100.0;
                (group, round_1dp(diff))
            })
            .collect()
    } else {
        totals
            .into_iter()
            .map(|(group, (sum, count))| (group, sum / count as f64))
            .collect()
    }
}

fn round_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, affiliation: &str, group: &str) -> UnifiedRecord {
        UnifiedRecord {
            component_id: id.to_string(),
            person_id: id.to_string(),
            speaker_label: "Mr X".to_string(),
            text: None,
            interjection: None,
            full_name: "Mr A X".to_string(),
            affiliation: affiliation.to_string(),
            group: group.to_string(),
        }
    }

    fn metrics(word_count: usize, polarity: Option<f64>) -> RecordMetrics {
        RecordMetrics {
            word_count,
            polarity,
            ..Default::default()
        }
    }

    #[test]
    fn test_roster_proportions() {
        let roster = Roster::from_people(vec![
            Person::new("Mr A One", "Alliance", "North", "1"),
            Person::new("Ms B Two", "Alliance", "South", "2"),
            Person::new("Mr C Three", "SDLP", "South", "3"),
            Person::new("Mrs D Four", "TUV", "South", "4"),
        ]);

        let by_affiliation = roster_proportions(&roster, Identifier::Affiliation);
        assert_eq!(by_affiliation["Alliance"], 0.5);
        assert_eq!(by_affiliation["SDLP"], 0.25);

        let by_group = roster_proportions(&roster, Identifier::Group);
        assert_eq!(by_group["South"], 0.75);
    }

    #[test]
    fn test_roster_proportions_empty() {
        assert!(roster_proportions(&Roster::default(), Identifier::Group).is_empty());
    }

    #[test]
    fn test_compare_groups_proportional() {
        let a = record("1", "Alliance", "North");
        let b = record("2", "SDLP", "South");
        let (ma, mb) = (metrics(75, None), metrics(25, None));
        let records = vec![(&a, &ma), (&b, &mb)];
        let expected = BTreeMap::from([
            ("Alliance".to_string(), 0.5),
            ("SDLP".to_string(), 0.5),
        ]);

        let diff = compare_groups(&records, Identifier::Affiliation, Metric::WordCount, &expected);

        assert_eq!(diff["Alliance"], 25.0);
        assert_eq!(diff["SDLP"], -25.0);
    }

    #[test]
    fn test_compare_groups_zero_total() {
        let a = record("1", "Alliance", "North");
        let ma = metrics(0, None);
        let diff = compare_groups(&[(&a, &ma)], Identifier::Affiliation, Metric::Interruptions, &BTreeMap::new());
        assert!(diff.is_empty());
    }

    #[test]
    fn test_compare_groups_mean() {
        let a = record("1", "Alliance", "North");
        let b = record("2", "Alliance", "North");
        let c = record("3", "SDLP", "South");
        let (ma, mb, mc) = (metrics(1, Some(0.2)), metrics(1, Some(0.4)), metrics(1, None));
        let records = vec![(&a, &ma), (&b, &mb), (&c, &mc)];

        let means = compare_groups(&records, Identifier::Group, Metric::Polarity, &BTreeMap::new());

        assert!((means["North"] - 0.3).abs() < 1e-9);
        assert!(!means.contains_key("South"));
    }
}
