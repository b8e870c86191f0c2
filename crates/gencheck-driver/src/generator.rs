//! Running the build generator whose output the grammars read.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use crate::{DriverError, Result};

/// How to invoke the generator. `--target <id>` is appended to `args`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorCommand {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl GeneratorCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: &[&str]) -> Self {
        self.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Run the generator in `workspace` and wait for it. A non-zero exit
    /// fails the run before any grammar reads the workspace.
    pub fn run(&self, workspace: &Path, target: &str) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--target")
            .arg(target)
            .current_dir(workspace);

        tracing::info!(
            program = %self.program,
            target,
            workspace = %workspace.display(),
            "running generator"
        );

        let output = cmd.output().map_err(|source| DriverError::GeneratorSpawn {
            program: self.program.clone(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        if !output.status.success() {
            return Err(DriverError::GeneratorFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }
        if !stderr.is_empty() {
            tracing::warn!(program = %self.program, %stderr, "generator wrote to stderr");
        }
        Ok(())
    }
}
