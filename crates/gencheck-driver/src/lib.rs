//! The harness around the core: load a scenario, optionally run the
//! generator, parse its artifacts with the selected grammar, and compare the
//! result against the scenario's expectation.
//!
//! The workspace is always passed explicitly. Nothing here reads or changes
//! the process working directory.

mod error;
mod generator;
mod scenario;

use std::path::{Path, PathBuf};

use gencheck_compare::{compare, ExpectedProject};
use gencheck_grammar::grammar_for;
use gencheck_model::Project;

pub use error::{DriverError, Result};
pub use generator::GeneratorCommand;
pub use scenario::{Scenario, ScenarioProject};

/// Runs grammars and comparisons against one workspace.
#[derive(Debug, Clone)]
pub struct Driver {
    workspace: PathBuf,
}

impl Driver {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Rebuild the model of project `name` at `path` (relative to the
    /// workspace) from the artifacts of `target`.
    pub fn parse(&self, target: &str, name: &str, path: &str) -> Result<Project> {
        let grammar = grammar_for(target).ok_or_else(|| DriverError::unknown_target(target))?;

        let stem = self.workspace.join(path).join(name);
        tracing::info!(target, project = name, stem = %stem.display(), "parsing artifacts");

        let mut project = Project::new(name, path);
        grammar.parse(&mut project, &stem)?;

        tracing::info!(
            configurations = project.configurations().len(),
            packages = project.packages().len(),
            "recovered project"
        );
        Ok(project)
    }

    /// Parse and compare against `expected`. Returns the actual model.
    pub fn verify(
        &self,
        target: &str,
        project: &ScenarioProject,
        expected: &ExpectedProject,
    ) -> Result<Project> {
        let actual = self.parse(target, &project.name, &project.path)?;
        compare(expected, &actual)?;
        tracing::info!(project = %project.name, "expectation satisfied");
        Ok(actual)
    }

    /// Run a whole scenario: the generator when one is configured, then
    /// parse and compare.
    pub fn run(&self, scenario: &Scenario) -> Result<Project> {
        if grammar_for(&scenario.target).is_none() {
            return Err(DriverError::unknown_target(&scenario.target));
        }
        if let Some(generator) = &scenario.generator {
            generator.run(&self.workspace, &scenario.target)?;
        }
        self.verify(&scenario.target, &scenario.project, &scenario.expect)
    }
}

/// Load `path` and run it in `workspace`, or in the scenario's own
/// workspace when none is given.
pub fn check_scenario(path: &Path, workspace: Option<&Path>) -> miette::Result<Project> {
    let scenario = Scenario::from_file(path)?;
    let driver = Driver::new(workspace.unwrap_or(scenario.workspace()));
    tracing::info!(
        scenario = %path.display(),
        target = %scenario.target,
        workspace = %driver.workspace().display(),
        "checking scenario"
    );
    Ok(driver.run(&scenario)?)
}
