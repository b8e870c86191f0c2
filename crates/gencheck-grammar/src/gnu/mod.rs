//! GNU make dialect: a root `Makefile` that drives one makefile per package.

mod managed;
mod native;

use std::path::{Path, PathBuf};

use gencheck_cursor::{Artifact, Cursor, Result};
use gencheck_model::{Kind, Language, ModelError, Package, Project};
use regex::escape;

use crate::{tokens, Grammar};

pub(crate) const DONT_EDIT: &str =
    "# Don't edit this file! Instead edit `premake.lua` then rerun `make`";

const DEFAULT_SCRIPT: &str = "Makefile";

/// Grammar for the `gnu` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct GnuGrammar;

impl Grammar for GnuGrammar {
    fn identifier(&self) -> &'static str {
        "gnu"
    }

    fn parse(&self, project: &mut Project, stem: &Path) -> Result<()> {
        let root = crate::root_dir(stem);
        let artifact = Artifact::open(root.join(DEFAULT_SCRIPT))?;
        parse_root(project, &artifact)?;

        let configurations = project.configurations().to_vec();
        for package in project.packages_mut() {
            let location = package_location(&root, package);
            let artifact = Artifact::open(&location)?;
            parse_package(package, &configurations, &artifact)?;
        }
        Ok(())
    }
}

fn package_location(root: &Path, package: &Package) -> PathBuf {
    root.join(&package.path).join(&package.script_name)
}

fn parse_root(project: &mut Project, artifact: &Artifact) -> Result<()> {
    let mut cursor = artifact.cursor();

    cursor.expect("# Makefile autogenerated by premake")?;
    cursor.expect(DONT_EDIT)?;
    cursor.expect("# Options:")?;

    let marker = cursor.expect_capture(r"#   CONFIG=\[(.+)\]")?;
    for name in marker.split(['|', ',']).map(str::trim).filter(|s| !s.is_empty()) {
        project
            .add_configuration(name)
            .map_err(|e| cursor.model(e))?;
    }
    let default_config = project
        .configurations()
        .first()
        .cloned()
        .unwrap_or_default();

    cursor.expect("")?;
    expect_default_config(&mut cursor, &default_config)?;
    cursor.expect("")?;
    cursor.expect("export CONFIG")?;
    cursor.expect("")?;

    let names = tokens::words(&cursor.expect_capture(r"\.PHONY: all clean (.+)")?);
    for name in &names {
        project.add_package(name.as_str());
    }
    tracing::debug!(packages = names.len(), "recovered package list");

    cursor.expect("")?;
    cursor.expect(&format!("all: {}", names.join(" ")))?;
    cursor.expect("")?;

    cursor.expect_pattern(r"Makefile: (.+)")?;
    cursor.expect("\t@echo ==== Regenerating Makefiles ====")?;
    cursor.expect_pattern(r"\t@premake (.+)")?;
    cursor.expect("")?;

    for package in project.packages_mut() {
        let deps = cursor.expect_capture(&format!("{}:(.*)", escape(&package.name)))?;
        let deps = tokens::words(&deps);
        package.for_each_config(|config| config.dependencies = deps.clone());

        cursor.expect(&format!("\t@echo ==== Building {} ====", package.name))?;

        let location =
            cursor.expect_capture(r"\t@\$\(MAKE\) --no-print-directory -C (.+)")?;
        match location.split_once(" -f ") {
            Some((path, script)) => {
                package.path = path.to_string();
                package.script_name = script.to_string();
            }
            None => {
                package.path = location;
                package.script_name = DEFAULT_SCRIPT.to_string();
            }
        }

        cursor.expect("")?;
    }

    cursor.expect("clean:")?;
    for package in project.packages() {
        let line = if package.script_name == DEFAULT_SCRIPT {
            format!("\t@$(MAKE) --no-print-directory -C {} clean", package.path)
        } else {
            format!(
                "\t@$(MAKE) --no-print-directory -C {} -f {} clean",
                package.path, package.script_name
            )
        };
        cursor.expect(&line)?;
    }

    Ok(())
}

fn expect_default_config(cursor: &mut Cursor<'_>, default_config: &str) -> Result<()> {
    cursor.expect("ifndef CONFIG")?;
    cursor.expect(&format!("  CONFIG={}", default_config))?;
    cursor.expect("endif")
}

fn parse_package(package: &mut Package, configurations: &[String], artifact: &Artifact) -> Result<()> {
    let mut cursor = artifact.cursor();

    let header = cursor.expect_pattern(r"# (.+?) (.+?) Makefile autogenerated by premake")?;
    let language: Language = header[0]
        .parse()
        .map_err(|_| cursor.unsupported_language(&header[0]))?;
    let kind = kind_from_phrase(&header[1]).map_err(|e| cursor.model(e))?;
    package.language = Some(language);
    package.kind = Some(kind);

    tracing::debug!(
        package = %package.name,
        language = %language,
        kind = %kind,
        "parsing package makefile"
    );

    cursor.expect(DONT_EDIT)?;
    cursor.expect("")?;
    expect_default_config(&mut cursor, configurations.first().map_or("", String::as_str))?;
    cursor.expect("")?;

    match language {
        Language::Native => native::parse(package, &mut cursor),
        Language::Managed(_) => managed::parse(package, &mut cursor),
    }
}

fn kind_from_phrase(phrase: &str) -> std::result::Result<Kind, ModelError> {
    match phrase {
        "Console Executable" => Ok(Kind::Exe),
        "Windowed Executable" => Ok(Kind::WinExe),
        "Shared Library" => Ok(Kind::Dll),
        "Static Library" => Ok(Kind::Lib),
        "ASP.NET" => Ok(Kind::AspNet),
        other => Err(ModelError::UnknownKind(other.to_string())),
    }
}
