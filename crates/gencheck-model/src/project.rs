use serde::Serialize;

use crate::{BuildAction, Configuration, Kind, Language, ModelError, Result, SourceFile};

/// A whole generated build: configuration names plus packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Project {
    pub name: String,

    /// Root directory of the project, relative to the workspace.
    pub path: String,

    configurations: Vec<String>,
    packages: Vec<Package>,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            configurations: Vec::new(),
            packages: Vec::new(),
        }
    }

    /// Ordered configuration names.
    pub fn configurations(&self) -> &[String] {
        &self.configurations
    }

    /// Append a configuration name. Packages already present get a matching
    /// configuration record so their sequences stay aligned.
    pub fn add_configuration(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.configurations.contains(&name) {
            return Err(ModelError::DuplicateConfiguration(name));
        }
        for package in &mut self.packages {
            package.configurations.push(Configuration::new(name.clone()));
        }
        self.configurations.push(name);
        Ok(())
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn packages_mut(&mut self) -> &mut [Package] {
        &mut self.packages
    }

    /// Create a package with one configuration per project configuration.
    pub fn add_package(&mut self, name: impl Into<String>) -> &mut Package {
        let configurations = self
            .configurations
            .iter()
            .map(|c| Configuration::new(c.clone()))
            .collect();

        self.packages.push(Package {
            name: name.into(),
            kind: None,
            language: None,
            path: String::new(),
            script_name: String::new(),
            compiler: None,
            configurations,
            files: Vec::new(),
        });

        let last = self.packages.len() - 1;
        &mut self.packages[last]
    }
}

/// One build target within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub kind: Option<Kind>,
    pub language: Option<Language>,

    /// Directory of the package's own artifact, relative to the root artifact.
    pub path: String,

    /// File name of the package's own artifact.
    pub script_name: String,

    /// Managed compiler identifier, when the dialect names one.
    pub compiler: Option<String>,

    configurations: Vec<Configuration>,
    files: Vec<SourceFile>,
}

impl Package {
    /// Per-configuration records, aligned with the project's configuration names.
    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn configurations_mut(&mut self) -> &mut [Configuration] {
        &mut self.configurations
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Record a file. Names are unique within a package.
    pub fn add_file(&mut self, file: SourceFile) -> Result<&mut SourceFile> {
        if self.file(&file.name).is_some() {
            return Err(ModelError::DuplicateFile {
                package: self.name.clone(),
                file: file.name,
            });
        }
        self.files.push(file);
        let last = self.files.len() - 1;
        Ok(&mut self.files[last])
    }

    /// Files with the given action, in the order they were recorded.
    pub fn files_with_action(&self, action: BuildAction) -> impl Iterator<Item = &SourceFile> {
        self.files
            .iter()
            .filter(move |f| f.build_action == Some(action))
    }

    /// Apply `f` to every configuration.
    pub fn for_each_config(&mut self, mut f: impl FnMut(&mut Configuration)) {
        for config in &mut self.configurations {
            f(config);
        }
    }
}
