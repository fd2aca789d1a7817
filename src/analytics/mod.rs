pub mod metrics;
pub mod proportions;

pub use metrics::*;
pub use proportions::*;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{Roster, UnifiedRecord};

/// Roster attribute used to group speakers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Identifier {
    Affiliation,
    Group,
}

/// Per-record metric that can be compared across groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    WordCount,
    Interruptions,
    Polarity,
    Subjectivity,
}

impl Metric {
    /// Proportional metrics are compared against roster shares; the rest are averaged
    pub fn is_proportional(&self) -> bool {
        matches!(self, Metric::WordCount | Metric::Interruptions)
    }

    pub fn value(&self, metrics: &RecordMetrics) -> Option<f64> {
        match self {
            Metric::WordCount => Some(metrics.word_count as f64),
            Metric::Interruptions => Some(metrics.interrupted as f64),
            Metric::Polarity => metrics.polarity,
            Metric::Subjectivity => metrics.subjectivity,
        }
    }
}

/// Configuration for the analytics pass
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub identifiers: Vec<Identifier>,
    pub metrics: Vec<Metric>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            identifiers: vec![Identifier::Affiliation, Identifier::Group],
            metrics: vec![Metric::WordCount, Metric::Interruptions],
        }
    }
}

/// Metrics per record plus group comparisons
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsReport {
    /// component id -> metrics
    pub record_metrics: BTreeMap<String, RecordMetrics>,
    /// identifier -> value -> share of roster
    pub roster_proportions: BTreeMap<Identifier, BTreeMap<String, f64>>,
    /// identifier -> metric -> value -> comparison
    pub comparisons: BTreeMap<Identifier, BTreeMap<Metric, BTreeMap<String, f64>>>,
}

/// Measure every unified record and compare groups against the roster
pub fn compute_analytics(
    unified: &BTreeMap<String, UnifiedRecord>,
    roster: &Roster,
    config: &AnalyticsConfig,
    scorer: Option<&dyn TextScorer>,
) -> AnalyticsReport {
    let record_metrics: BTreeMap<String, RecordMetrics> = unified
        .iter()
        .map(|(id, record)| (id.clone(), RecordMetrics::measure(record, scorer)))
        .collect();

    let paired: Vec<(&UnifiedRecord, &RecordMetrics)> = unified
        .iter()
        .filter_map(|(id, record)| record_metrics.get(id).map(|m| (record, m)))
        .collect();

    let mut report = AnalyticsReport::default();
    for &identifier in &config.identifiers {
        let expected = roster_proportions(roster, identifier);
        let mut by_metric = BTreeMap::new();

        for &metric in &config.metrics {
            if !metric.is_proportional() && scorer.is_none() {
                warn!("No text scorer configured; skipping {:?}", metric);
                continue;
            }
            by_metric.insert(metric, compare_groups(&paired, identifier, metric, &expected));
        }

        report.roster_proportions.insert(identifier, expected);
        report.comparisons.insert(identifier, by_metric);
    }
    report.record_metrics = record_metrics;

    info!(
        "Analytics: {} records measured across {} identifiers",
        report.record_metrics.len(),
        report.comparisons.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;

    fn unified(id: &str, person: &Person, text: &str, interjection: Option<&str>) -> (String, UnifiedRecord) {
        (
            id.to_string(),
            UnifiedRecord {
                component_id: id.to_string(),
                person_id: person.person_id.clone(),
                speaker_label: "label".to_string(),
                text: Some(text.to_string()),
                interjection: interjection.map(String::from),
                full_name: person.full_name.clone(),
                affiliation: person.affiliation.clone(),
                group: person.group.clone(),
            },
        )
    }

    #[test]
    fn test_compute_analytics() {
        let a = Person::new("Mr Jim Allister", "TUV", "North Antrim", "1");
        let b = Person::new("Ms Paula Bradshaw", "Alliance", "Belfast South", "2");
        let roster = Roster::from_people(vec![a.clone(), b.clone()]);
        let records: BTreeMap<_, _> = vec![
            unified("h1", &a, "one two three", Some("[Interruption.]")),
            unified("h2", &b, "one", None),
        ]
        .into_iter()
        .collect();

        let config = AnalyticsConfig {
            identifiers: vec![Identifier::Affiliation],
            metrics: vec![Metric::WordCount, Metric::Interruptions, Metric::Polarity],
        };
        let report = compute_analytics(&records, &roster, &config, None);

        assert_eq!(report.record_metrics["h1"].word_count, 3);
        assert_eq!(report.record_metrics["h1"].interrupted, 1);
        assert_eq!(report.roster_proportions[&Identifier::Affiliation]["TUV"], 0.5);

        let comparisons = &report.comparisons[&Identifier::Affiliation];
        assert_eq!(comparisons[&Metric::WordCount]["TUV"], 25.0);
        assert_eq!(comparisons[&Metric::WordCount]["Alliance"], -25.0);
        assert_eq!(comparisons[&Metric::Interruptions]["TUV"], 50.0);
        assert!(!comparisons.contains_key(&Metric::Polarity));
    }
}
