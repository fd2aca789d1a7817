use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Anomaly, Component, ComponentType, QuestionEntry, Session, SpeechRecord};

/// Configuration for Stage 0 speech assembly
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Procedure lines that may be attached as interjections (full match)
    pub procedural_markers: Vec<String>,
    /// Speaker labels that are not attributable individuals (full match)
    pub excluded_speakers: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            procedural_markers: vec![
                r"\[Interruption.*".to_string(),
                r"\[Laughter.*".to_string(),
            ],
            excluded_speakers: r".*\sSpeaker.*|A\sMember|Some Members".to_string(),
        }
    }
}

/// Output of assembling one or more sessions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyResult {
    /// Committed speech records keyed by the id of their speaker header
    pub records: BTreeMap<String, SpeechRecord>,
    /// Question components, in input order
    pub questions: Vec<QuestionEntry>,
    /// Components that were discarded, in input order
    pub anomalies: Vec<Anomaly>,
    /// Number of records removed by the speaker denylist
    pub excluded: usize,
    /// The open record left at the end of each session, never committed
    pub uncommitted: Vec<(String, SpeechRecord)>,
}

impl AssemblyResult {
    /// Fold another session's result into this one
    pub fn merge(&mut self, other: AssemblyResult) {
        for (id, record) in other.records {
            if self.records.insert(id.clone(), record).is_some() {
                warn!("Component id {} appears in more than one session", id);
            }
        }
        self.questions.extend(other.questions);
        self.anomalies.extend(other.anomalies);
        self.excluded += other.excluded;
        self.uncommitted.extend(other.uncommitted);
    }
}

/// The record opened by the most recent speaker header
#[derive(Debug, Clone)]
struct OpenRecord {
    header_id: String,
    record: SpeechRecord,
}

/// Per-session accumulator threaded through the assembly loop
#[derive(Debug, Default)]
struct AssemblyState {
    current: Option<OpenRecord>,
    result: AssemblyResult,
}

impl AssemblyState {
    fn commit_current(&mut self) {
        if let Some(open) = self.current.take() {
            if open.record.is_committable() {
                debug!("Committing {} for {}", open.header_id, open.record.speaker_label);
                self.result.records.insert(open.header_id, open.record);
            } else if open.record.has_speaker() {
                debug!(
                    "Speaker {} at {} had no spoken text",
                    open.record.speaker_label, open.header_id
                );
            }
        }
    }

    fn record_anomaly(&mut self, component: &Component) {
        warn!(
            "Discarding {} component {}: no open speaker awaiting text",
            component.kind, component.id
        );
        self.result.anomalies.push(Anomaly {
            prior_record: self.current.as_ref().map(|o| o.record.clone()),
            component_type: component.kind.clone(),
            component_text: component.text.clone(),
        });
    }
}

/// Walks ordered transcript components and builds attributed speech records
#[derive(Debug, Clone)]
pub struct SpeechAssembler {
    markers: Vec<Regex>,
    excluded_speakers: Regex,
}

impl SpeechAssembler {
    pub fn new(config: &AssemblerConfig) -> PipelineResult<Self> {
        let markers = config
            .procedural_markers
            .iter()
            .map(|p| full_match_regex(p))
            .collect::<PipelineResult<Vec<_>>>()?;
        let excluded_speakers = full_match_regex(&config.excluded_speakers)?;

        Ok(Self {
            markers,
            excluded_speakers,
        })
    }

    /// Assemble a single session's components
    ///
    /// A record is committed only when the next speaker header arrives, so
    /// the last speaker of a session is reported in `uncommitted` instead.
    pub fn assemble(&self, components: &[Component]) -> AssemblyResult {
        let mut state = AssemblyState::default();

        for component in components {
            match &component.kind {
                ComponentType::SpeakerHeader => {
                    state.commit_current();
                    let label = normalize_speaker_label(&component.text);
                    state.current = Some(OpenRecord {
                        header_id: component.id.clone(),
                        record: SpeechRecord::new(label),
                    });
                }
                ComponentType::SpokenText if component.text.is_empty() => {
                    debug!("Skipping empty spoken text {}", component.id);
                }
                ComponentType::SpokenText => match state.current.take() {
                    Some(open) if open.record.has_speaker() && !open.record.has_text() => {
                        state.current = Some(OpenRecord {
                            header_id: open.header_id,
                            record: open.record.with_text(component.text.as_str()),
                        });
                    }
                    other => {
                        state.current = other;
                        state.record_anomaly(component);
                    }
                },
                ComponentType::ProcedureLine => {
                    if let Some(open) = state.current.take() {
                        let record = if self.accepts_interjection(&open.record, &component.text) {
                            open.record.with_interjection(component.text.as_str())
                        } else {
                            open.record
                        };
                        state.current = Some(OpenRecord {
                            header_id: open.header_id,
                            record,
                        });
                    }
                }
                ComponentType::Question => {
                    state.result.questions.push(QuestionEntry {
                        component_id: component.id.clone(),
                        text: component.text.clone(),
                    });
                }
                ComponentType::Other(raw) => {
                    debug!("Skipping {} component {}", raw, component.id);
                }
            }
        }

        if let Some(open) = state.current.take() {
            if open.record.has_speaker() {
                debug!(
                    "Session ended with {} still open at {}",
                    open.record.speaker_label, open.header_id
                );
                state.result.uncommitted.push((open.header_id, open.record));
            }
        }

        let before = state.result.records.len();
        state
            .result
            .records
            .retain(|_, r| !self.excluded_speakers.is_match(&r.speaker_label));
        state.result.excluded = before - state.result.records.len();

        state.result
    }

    /// Assemble sessions one after another, in input order
    pub fn assemble_sessions(&self, sessions: &[Session]) -> AssemblyResult {
        let mut result = AssemblyResult::default();
        for session in sessions {
            debug!(
                "Assembling session {} ({} components)",
                session.date,
                session.components.len()
            );
            result.merge(self.assemble(&session.components));
        }
        log_summary(&result, sessions.len());
        result
    }

    /// Whether a procedure line should become the open record's interjection
    fn accepts_interjection(&self, record: &SpeechRecord, text: &str) -> bool {
        record.is_committable()
            && record.interjection.is_none()
            && self.markers.iter().any(|m| m.is_match(text))
    }
}

/// Assemble every session on its own blocking task
///
/// Each task owns its session state; results are merged in input order so the
/// output matches [`SpeechAssembler::assemble_sessions`].
pub async fn assemble_sessions_concurrent(
    assembler: Arc<SpeechAssembler>,
    sessions: Vec<Session>,
) -> Result<AssemblyResult> {
    let session_count = sessions.len();
    let handles: Vec<_> = sessions
        .into_iter()
        .map(|session| {
            let assembler = Arc::clone(&assembler);
            tokio::task::spawn_blocking(move || assembler.assemble(&session.components))
        })
        .collect();

    let mut result = AssemblyResult::default();
    for handle in handles {
        let session_result = handle.await.context("Session assembly task failed")?;
        result.merge(session_result);
    }

    log_summary(&result, session_count);
    Ok(result)
}

/// Strip the trailing colon and any parenthesized ministerial title
pub fn normalize_speaker_label(raw: &str) -> String {
    let without_title = raw.split('(').next().unwrap_or_default();
    let trimmed = without_title.trim().trim_end_matches(':');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn full_match_regex(pattern: &str) -> PipelineResult<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| PipelineError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn log_summary(result: &AssemblyResult, sessions: usize) {
    info!(
        "Stage 0: {} sessions, {} speech records, {} questions, {} anomalies, {} excluded, {} uncommitted",
        sessions,
        result.records.len(),
        result.questions.len(),
        result.anomalies.len(),
        result.excluded,
        result.uncommitted.len()
    );
}
