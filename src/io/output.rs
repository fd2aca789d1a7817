use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::{AnalyticsReport, RecordMetrics};
use crate::io::DateRange;
use crate::models::{SpeechRecord, UnifiedRecord};

/// Machine-readable output format
#[derive(Debug, Clone, Serialize)]
pub struct MachineDataset {
    pub metadata: DatasetMetadata,
    /// Unified records in component id order
    pub records: Vec<MachineRecord>,
    /// Speech records no roster entry matched
    pub unresolved: Vec<UnresolvedRecord>,
    pub analytics: AnalyticsReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct MachineRecord {
    #[serde(flatten)]
    pub record: UnifiedRecord,
    pub metrics: RecordMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnresolvedRecord {
    pub component_id: String,
    #[serde(flatten)]
    pub speech: SpeechRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetMetadata {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub date_range: DateRange,
    pub sessions: usize,
    pub speech_records: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub anomalies: usize,
    pub excluded: usize,
    pub uncommitted: usize,
}

impl DatasetMetadata {
    pub fn new(date_range: DateRange) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            date_range,
            sessions: 0,
            speech_records: 0,
            resolved: 0,
            unresolved: 0,
            anomalies: 0,
            excluded: 0,
            uncommitted: 0,
        }
    }
}

impl MachineDataset {
    pub fn from_records(
        unified: &BTreeMap<String, UnifiedRecord>,
        unresolved: &BTreeMap<String, SpeechRecord>,
        analytics: AnalyticsReport,
        metadata: DatasetMetadata,
    ) -> Self {
        let records = unified
            .iter()
            .map(|(id, record)| MachineRecord {
                record: record.clone(),
                metrics: analytics.record_metrics.get(id).cloned().unwrap_or_default(),
            })
            .collect();

        let unresolved = unresolved
            .iter()
            .map(|(id, speech)| UnresolvedRecord {
                component_id: id.clone(),
                speech: speech.clone(),
            })
            .collect();

        Self {
            metadata,
            records,
            unresolved,
            analytics,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable report
pub struct HumanReport<'a> {
    unified: &'a BTreeMap<String, UnifiedRecord>,
    analytics: &'a AnalyticsReport,
    wrap_width: usize,
}

impl<'a> HumanReport<'a> {
    pub fn new(
        unified: &'a BTreeMap<String, UnifiedRecord>,
        analytics: &'a AnalyticsReport,
        wrap_width: usize,
    ) -> Self {
        Self {
            unified,
            analytics,
            wrap_width,
        }
    }

    /// Format the records and group comparisons as text
    pub fn format(&self) -> String {
        let mut output = String::new();

        for (id, record) in self.unified {
            output.push_str(&format!(
                "[{}] {} ({}, {}):\n",
                id, record.speaker_label, record.affiliation, record.group
            ));
            if let Some(text) = &record.text {
                output.push_str(&wrap_text(text, self.wrap_width));
                output.push('\n');
            }
            if let Some(interjection) = &record.interjection {
                output.push_str(interjection);
                output.push('\n');
            }
            output.push('\n');
        }

        for (identifier, by_metric) in &self.analytics.comparisons {
            for (metric, groups) in by_metric {
                for (group, value) in groups {
                    let line = if metric.is_proportional() {
                        format!(
                            "For {:?} by {:?}, {} was {}% compared to their proportional share.\n",
                            metric, identifier, group, value
                        )
                    } else {
                        format!(
                            "For {:?} by {:?}, {} scored {:.3}\n",
                            metric, identifier, group, value
                        )
                    };
                    output.push_str(&line);
                }
            }
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Greedy word wrap; a word longer than `width` sits on its own line
fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines.join("\n")
}
