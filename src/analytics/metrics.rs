use serde::Serialize;

use crate::models::UnifiedRecord;

/// External sentiment scorer
///
/// Scoring itself lives outside this crate; implementors wrap whatever
/// model or service produces the numbers.
pub trait TextScorer: Send + Sync {
    /// Polarity in [-1, 1]
    fn polarity(&self, text: &str) -> f64;
    /// Subjectivity in [0, 1]
    fn subjectivity(&self, text: &str) -> f64;
}

/// Metrics attached to one unified record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordMetrics {
    pub word_count: usize,
    /// 1 if the speech drew an interruption, else 0
    pub interrupted: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjectivity: Option<f64>,
}

impl RecordMetrics {
    pub fn measure(record: &UnifiedRecord, scorer: Option<&dyn TextScorer>) -> Self {
        let (polarity, subjectivity) = match (scorer, record.text.as_deref()) {
            (Some(scorer), Some(text)) => (Some(scorer.polarity(text)), Some(scorer.subjectivity(text))),
            _ => (None, None),
        };

        Self {
            word_count: word_count(record.text.as_deref()),
            interrupted: was_interrupted(record.interjection.as_deref()) as u8,
            polarity,
            subjectivity,
        }
    }
}

/// Words separated by single spaces; 0 when there is no text
pub fn word_count(text: Option<&str>) -> usize {
    match text {
        Some(text) if !text.is_empty() => text.split(' ').count(),
        _ => 0,
    }
}

pub fn was_interrupted(interjection: Option<&str>) -> bool {
    interjection.is_some_and(|i| i.contains("Interruption"))
}
