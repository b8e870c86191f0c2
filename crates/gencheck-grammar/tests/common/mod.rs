//! Fixture workspaces for the grammar tests.

use std::fs;

use gencheck_cursor::Result;
use gencheck_grammar::grammar_for;
use gencheck_model::Project;
use tempfile::TempDir;

/// A temporary directory holding generated artifacts.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create workspace"),
        }
    }

    /// Write `text` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, text: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, text).expect("Failed to write fixture");
        self
    }

    /// Run the grammar named `target` over the project `name` at the root.
    pub fn parse(&self, target: &str, name: &str) -> Result<Project> {
        let grammar = grammar_for(target).expect("Unknown target");
        let mut project = Project::new(name, ".");
        grammar.parse(&mut project, &self.dir.path().join(name))?;
        Ok(project)
    }
}
