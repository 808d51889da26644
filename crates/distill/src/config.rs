//! Distiller configuration, persisted as JSON.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::distill::DistillOptions;
use crate::error::{DistillError, Result};
use crate::inference::EvaluationBudget;

/// Configuration for a [`RuleDistiller`](crate::RuleDistiller).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistillerConfig {
    /// Ruleset file (None = bundled ruleset).
    pub ruleset: Option<PathBuf>,
    /// Mapping graph file (None = bundled mappings).
    pub mappings: Option<PathBuf>,
    /// Limits for each evaluation.
    pub budget: EvaluationBudget,
    /// Keep only the distilled statements in the document.
    pub delta_only: bool,
}

impl DistillerConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use distill::DistillerConfig;
    /// let config = DistillerConfig::load("distill.json").unwrap();
    /// println!("Max iterations: {}", config.budget.max_iterations);
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| DistillError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            DistillError::Config(format!(
                "Failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| DistillError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file = File::create(path).map_err(|e| DistillError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;

        Ok(())
    }

    pub fn options(&self) -> DistillOptions {
        DistillOptions {
            delta_only: self.delta_only,
        }
    }
}
