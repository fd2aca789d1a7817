use thiserror::Error;

/// Errors raised by the library stages
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The resolver produced a component id the assembler never emitted
    #[error("resolved component {component_id} has no speech record")]
    MissingSpeechRecord { component_id: String },

    /// The resolver produced a person id absent from the roster
    #[error("resolved component {component_id} points at unknown person {person_id}")]
    MissingPerson {
        component_id: String,
        person_id: String,
    },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
