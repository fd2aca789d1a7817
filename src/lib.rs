pub mod analytics;
pub mod error;
pub mod io;
pub mod models;
pub mod stages;

pub use analytics::{compute_analytics, AnalyticsConfig, AnalyticsReport, Identifier, Metric, TextScorer};
pub use error::{PipelineError, PipelineResult};
pub use io::{parse_roster_file, parse_sessions_file, DatasetMetadata, DateRange, HumanReport, MachineDataset};
pub use models::{Component, ComponentType, Person, Roster, Session, SpeechRecord, UnifiedRecord};
pub use stages::{
    assemble_sessions_concurrent, execute_render, resolve, unify, AssemblerConfig, AssemblyResult,
    RenderConfig, RenderInput, ResolutionResult, SpeechAssembler,
};
