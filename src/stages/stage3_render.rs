use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::analytics::AnalyticsReport;
use crate::io::{DatasetMetadata, HumanReport, MachineDataset};
use crate::models::{SpeechRecord, UnifiedRecord};

/// Configuration for Stage 3 rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to generate machine-readable output
    pub generate_machine: bool,
    /// Whether to generate human-readable output
    pub generate_human: bool,
    /// Line width for wrapped speech text
    pub wrap_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            generate_machine: true,
            generate_human: true,
            wrap_width: 80,
        }
    }
}

/// Result of Stage 3 rendering
#[derive(Debug)]
pub struct RenderResult {
    /// Path to machine dataset (if generated)
    pub machine_path: Option<PathBuf>,
    /// Path to human report (if generated)
    pub human_path: Option<PathBuf>,
}

/// Everything Stage 3 writes out
pub struct RenderInput<'a> {
    pub unified: &'a BTreeMap<String, UnifiedRecord>,
    pub unresolved: &'a BTreeMap<String, SpeechRecord>,
    pub analytics: &'a AnalyticsReport,
    pub metadata: DatasetMetadata,
}

/// Execute Stage 3: Rendering
///
/// Produces two output views:
/// 1. Machine dataset: JSON with unified records, metrics and unresolved speech
/// 2. Human report: speaker blocks followed by group comparisons
pub fn execute_render(
    input: RenderInput<'_>,
    machine_output: Option<&Path>,
    human_output: Option<&Path>,
    config: &RenderConfig,
) -> Result<RenderResult> {
    let mut result = RenderResult {
        machine_path: None,
        human_path: None,
    };

    if config.generate_machine {
        if let Some(path) = machine_output {
            info!("Writing machine dataset to {:?}", path);
            let machine = MachineDataset::from_records(
                input.unified,
                input.unresolved,
                input.analytics.clone(),
                input.metadata,
            );
            machine.write_json(path)?;
            result.machine_path = Some(path.to_path_buf());
        }
    }

    if config.generate_human {
        if let Some(path) = human_output {
            info!("Writing human report to {:?}", path);
            HumanReport::new(input.unified, input.analytics, config.wrap_width).write_file(path)?;
            result.human_path = Some(path.to_path_buf());
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::DateRange;

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert!(config.generate_machine);
        assert!(config.generate_human);
        assert_eq!(config.wrap_width, 80);
    }

    #[test]
    fn test_execute_render_respects_flags() {
        let dir = tempfile::tempdir().unwrap();
        let machine = dir.path().join("out.json");
        let human = dir.path().join("out.txt");
        let unified = BTreeMap::new();
        let unresolved = BTreeMap::new();
        let analytics = AnalyticsReport::default();

        let config = RenderConfig {
            generate_human: false,
            ..Default::default()
        };
        let input = RenderInput {
            unified: &unified,
            unresolved: &unresolved,
            analytics: &analytics,
            metadata: DatasetMetadata::new(DateRange::default()),
        };

        let result = execute_render(input, Some(machine.as_path()), Some(human.as_path()), &config).unwrap();

        assert_eq!(result.machine_path.as_deref(), Some(machine.as_path()));
        assert!(result.human_path.is_none());
        assert!(machine.exists());
        assert!(!human.exists());
    }
}
