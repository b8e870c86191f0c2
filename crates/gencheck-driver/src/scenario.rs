//! Scenario files: which target to check, which project to read, and what
//! the recovered model must look like.

use std::path::{Path, PathBuf};

use gencheck_compare::ExpectedProject;
use serde::Deserialize;

use crate::generator::GeneratorCommand;
use crate::{DriverError, Result};

/// One verification run, as written in a scenario TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Grammar identifier, also passed to the generator as `--target`.
    pub target: String,

    pub project: ScenarioProject,

    /// Workspace holding the artifacts, relative to the scenario file.
    /// Defaults to the scenario file's directory.
    #[serde(default)]
    pub workspace: Option<PathBuf>,

    /// Generator to run first; omitted when the artifacts already exist.
    #[serde(default)]
    pub generator: Option<GeneratorCommand>,

    #[serde(default)]
    pub expect: ExpectedProject,
}

/// The project whose artifacts are read.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioProject {
    pub name: String,

    /// Project root, relative to the workspace.
    #[serde(default = "default_project_path")]
    pub path: String,
}

fn default_project_path() -> String {
    ".".to_string()
}

impl Scenario {
    /// Load a scenario from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DriverError::ReadScenario {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scenario: Scenario =
            toml::from_str(&content).map_err(|source| DriverError::ParseScenario {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        scenario.workspace = Some(match scenario.workspace.take() {
            Some(dir) => base.join(dir),
            None => base.to_path_buf(),
        });
        Ok(scenario)
    }

    /// Workspace directory, after [`Scenario::from_file`] resolved it.
    pub fn workspace(&self) -> &Path {
        self.workspace.as_deref().unwrap_or_else(|| Path::new(""))
    }
}
