//! The sparse expected model written by scenario authors.
//!
//! Every scalar is an `Option`: `None` means "not checked". Collections of
//! elements (configurations, packages, files) use an empty list as the
//! wildcard. Unknown keys are rejected so a misspelled field never turns
//! into a silent wildcard.

use std::collections::BTreeSet;

use gencheck_model::{
    BuildAction, BuildFlag, Configuration, Kind, Language, LinkFlag, Package, Project, SourceFile,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Configuration names, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<String>,

    /// Packages, matched by position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<ExpectedPackage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedPackage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<String>,

    /// Per-configuration expectations, matched by position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<ExpectedConfiguration>,

    /// Files, matched by name in any order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<ExpectedFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_options: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_options: Option<String>,

    // Compared as sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defines: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_flags: Option<BTreeSet<BuildFlag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_flags: Option<BTreeSet<LinkFlag>>,

    // Compared in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_deps: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_action: Option<BuildAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
}

impl ExpectedFile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

// Exhaustive expectations, for snapshotting an actual model. Fields the
// model leaves unset stay wildcards.

impl ExpectedProject {
    /// An expectation every field of `project` must satisfy.
    pub fn exact(project: &Project) -> Self {
        Self {
            name: Some(project.name.clone()),
            path: Some(project.path.clone()),
            configurations: project.configurations().to_vec(),
            packages: project.packages().iter().map(ExpectedPackage::exact).collect(),
        }
    }
}

impl ExpectedPackage {
    pub fn exact(package: &Package) -> Self {
        Self {
            name: Some(package.name.clone()),
            kind: package.kind,
            language: package.language,
            path: Some(package.path.clone()),
            script_name: Some(package.script_name.clone()),
            compiler: package.compiler.clone(),
            configurations: package
                .configurations()
                .iter()
                .map(ExpectedConfiguration::exact)
                .collect(),
            files: package.files().iter().map(ExpectedFile::exact).collect(),
        }
    }
}

impl ExpectedConfiguration {
    pub fn exact(config: &Configuration) -> Self {
        Self {
            name: Some(config.name.clone()),
            bin_dir: Some(config.bin_dir.clone()),
            lib_dir: Some(config.lib_dir.clone()),
            obj_dir: Some(config.obj_dir.clone()),
            out_dir: Some(config.out_dir.clone()),
            target: Some(config.target.clone()),
            kind: config.kind,
            build_options: Some(config.build_options.clone()),
            link_options: Some(config.link_options.clone()),
            include_paths: Some(config.include_paths.clone()),
            defines: Some(config.defines.clone()),
            lib_paths: Some(config.lib_paths.clone()),
            dependencies: Some(config.dependencies.clone()),
            build_flags: Some(config.build_flags.clone()),
            link_flags: Some(config.link_flags.clone()),
            links: Some(config.links.clone()),
            link_deps: Some(config.link_deps.clone()),
        }
    }
}

impl ExpectedFile {
    pub fn exact(file: &SourceFile) -> Self {
        Self {
            name: file.name.clone(),
            subtype: file.subtype.clone(),
            build_action: file.build_action,
            depends_on: file.depends_on.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_toml() {
        let expected: ExpectedProject = toml::from_str(
            r#"
configurations = ["Debug", "Release"]

[[packages]]
name = "MyPackage"
kind = "winexe"
language = "c#"

[[packages.configurations]]
build_flags = ["optimize", "no-64bit-checks"]
defines = ["NDEBUG"]

[[packages.files]]
name = "file0.resx"
build_action = "EmbeddedResource"
depends_on = "file0.cs"
"#,
        )
        .unwrap();

        assert_eq!(expected.name, None);
        let package = &expected.packages[0];
        assert_eq!(package.kind, Some(Kind::WinExe));
        assert!(matches!(package.language, Some(Language::Managed(_))));
        assert_eq!(package.path, None);

        let config = &package.configurations[0];
        assert_eq!(
            config.build_flags,
            Some(BTreeSet::from([BuildFlag::Optimize, BuildFlag::No64BitChecks]))
        );
        assert_eq!(config.links, None);

        assert_eq!(package.files[0].build_action, Some(BuildAction::EmbeddedResource));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result: Result<ExpectedPackage, _> = toml::from_str(r#"nmae = "MyPackage""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let result: Result<ExpectedConfiguration, _> = toml::from_str(r#"build_flags = ["fast"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_exact_snapshot_round_trips_through_toml() {
        let mut project = Project::new("MyProject", ".");
        project.add_configuration("Debug").unwrap();
        let package = project.add_package("MyPackage");
        package.kind = Some(Kind::Exe);
        package.language = Some(Language::Native);
        package.configurations_mut()[0]
            .build_flags
            .insert(BuildFlag::NoSymbols);
        package.add_file(SourceFile::new("file0.cpp")).unwrap();

        let expected = ExpectedProject::exact(&project);
        let text = toml::to_string(&expected).unwrap();
        let back: ExpectedProject = toml::from_str(&text).unwrap();
        assert_eq!(back, expected);
    }
}
