use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// How a managed toolchain treats a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildAction {
    Compile,
    Content,
    EmbeddedResource,
    Linked,
    Nothing,
}

impl BuildAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildAction::Compile => "Compile",
            BuildAction::Content => "Content",
            BuildAction::EmbeddedResource => "EmbeddedResource",
            BuildAction::Linked => "Linked",
            BuildAction::Nothing => "Nothing",
        }
    }
}

impl FromStr for BuildAction {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Compile" => Ok(BuildAction::Compile),
            "Content" => Ok(BuildAction::Content),
            "EmbeddedResource" => Ok(BuildAction::EmbeddedResource),
            "Linked" => Ok(BuildAction::Linked),
            "Nothing" => Ok(BuildAction::Nothing),
            other => Err(ModelError::UnknownBuildAction(other.to_string())),
        }
    }
}

impl fmt::Display for BuildAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file belonging to a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Path relative to the package, as the artifact spells it.
    pub name: String,

    /// Optional IDE subtype tag (e.g. `Code`, `Form`).
    pub subtype: Option<String>,

    /// Build action, when the dialect records one.
    pub build_action: Option<BuildAction>,

    /// Name of the file this one depends on.
    pub depends_on: Option<String>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtype: None,
            build_action: None,
            depends_on: None,
        }
    }

    pub fn with_action(mut self, action: BuildAction) -> Self {
        self.build_action = Some(action);
        self
    }

    /// File name without any directory part, for either separator.
    pub fn basename(&self) -> &str {
        self.name
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.name)
    }
}
