//! The `.sln` file: package list, dependencies, configurations and the
//! per-package configuration mapping.

use gencheck_cursor::{Artifact, Cursor, Result};
use gencheck_model::{Language, ManagedLanguage, Project};
use rustc_hash::FxHashMap;

use super::VsVersion;
use crate::tokens;

const VCPROJ_TOOL: &str = "8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942";
const CSPROJ_TOOL: &str = "FAE04EC0-301F-11D3-BF4B-00C04F79EFBC";

const GUID: &str = "[0-9A-Fa-f-]+";

/// Project type named by a solution entry's tool GUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProjectTool {
    Vc,
    Cs,
}

impl ProjectTool {
    fn from_guid(guid: &str) -> Option<Self> {
        if guid.eq_ignore_ascii_case(VCPROJ_TOOL) {
            Some(ProjectTool::Vc)
        } else if guid.eq_ignore_ascii_case(CSPROJ_TOOL) {
            Some(ProjectTool::Cs)
        } else {
            None
        }
    }

    fn language(self) -> Language {
        match self {
            ProjectTool::Vc => Language::Native,
            ProjectTool::Cs => Language::Managed(ManagedLanguage::CSharp),
        }
    }

    /// Platform name used in configuration mappings.
    pub(crate) fn platform(self, version: VsVersion) -> &'static str {
        match (self, version) {
            (ProjectTool::Vc, _) => "Win32",
            (ProjectTool::Cs, VsVersion::Vs2005) => "Any CPU",
            (ProjectTool::Cs, _) => ".NET",
        }
    }
}

/// One `Project(...)` entry, in package order.
#[derive(Debug, Clone)]
pub(crate) struct SolutionEntry {
    pub(crate) guid: String,
    pub(crate) tool: ProjectTool,
}

#[derive(Debug, Default)]
pub(crate) struct Solution {
    pub(crate) entries: Vec<SolutionEntry>,
    names: FxHashMap<String, String>,
}

impl Solution {
    /// Package name for a project GUID.
    pub(crate) fn package_name(&self, guid: &str) -> Option<&str> {
        self.names
            .get(&guid.to_ascii_uppercase())
            .map(String::as_str)
    }

    fn package_index(&self, guid: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.guid.eq_ignore_ascii_case(guid))
    }
}

pub(crate) fn parse(project: &mut Project, artifact: &Artifact, version: VsVersion) -> Result<Solution> {
    let mut cursor = artifact.cursor();
    let mut solution = Solution::default();
    let mut pending: Vec<(usize, String)> = Vec::new();

    cursor.expect(&format!(
        "Microsoft Visual Studio Solution File, Format Version {}",
        version.solution_format()
    ))?;
    if version == VsVersion::Vs2005 {
        cursor.expect("# Visual Studio 2005")?;
    }

    let entry = format!(r#"Project\("\{{({GUID})\}}"\) = "(.+?)", "(.+?)", "\{{({GUID})\}}""#);
    let dependency = format!(r"\t\t\{{({GUID})\}}(?:\.\d+)? = \{{({GUID})\}}");

    while let Some(caps) = cursor.accept_pattern(&entry)? {
        let tool = ProjectTool::from_guid(&caps[0])
            .ok_or_else(|| cursor.unsupported_language(&caps[0]))?;
        let (path, script) = tokens::split_location(&caps[2]);

        let package = project.add_package(caps[1].as_str());
        package.language = Some(tool.language());
        package.path = path;
        package.script_name = script;

        let index = solution.entries.len();
        let guid = caps[3].clone();
        solution
            .names
            .insert(guid.to_ascii_uppercase(), caps[1].clone());
        solution.entries.push(SolutionEntry { guid, tool });

        if version > VsVersion::Vs2002 {
            cursor.expect("\tProjectSection(ProjectDependencies) = postProject")?;
            while let Some(dep) = cursor.accept_pattern(&dependency)? {
                pending.push((index, dep[1].clone()));
            }
            cursor.expect("\tEndProjectSection")?;
        }

        cursor.expect("EndProject")?;
    }
    tracing::debug!(packages = solution.entries.len(), "recovered solution entries");

    cursor.expect("Global")?;
    if version == VsVersion::Vs2005 {
        cursor.expect("\tGlobalSection(SolutionConfigurationPlatforms) = preSolution")?;
    } else {
        cursor.expect("\tGlobalSection(SolutionConfiguration) = preSolution")?;
    }
    // Solution-wide platform lines all carry the last package's platform.
    let solution_platform = solution.entries.last().map(|e| e.tool.platform(version));
    while let Some(name) =
        accept_configuration(&mut cursor, version, solution_platform, project.configurations().len())?
    {
        project.add_configuration(name).map_err(|e| cursor.model(e))?;
    }
    cursor.expect("\tEndGlobalSection")?;

    if version == VsVersion::Vs2002 {
        cursor.expect("\tGlobalSection(ProjectDependencies) = postSolution")?;
        let global = format!(r"\t\t\{{({GUID})\}}\.\d+ = \{{({GUID})\}}");
        while let Some(dep) = cursor.accept_pattern(&global)? {
            let index = solution
                .package_index(&dep[0])
                .ok_or_else(|| cursor.unresolved(&dep[0]))?;
            pending.push((index, dep[1].clone()));
        }
        cursor.expect("\tEndGlobalSection")?;
    }

    cursor.expect("\tGlobalSection(ProjectConfiguration) = postSolution")?;
    for entry in &solution.entries {
        let platform = entry.tool.platform(version);
        for name in project.configurations() {
            let selector = match (version, solution_platform) {
                (VsVersion::Vs2005, Some(shared)) => format!("{name}|{shared}"),
                _ => name.clone(),
            };
            let guid = &entry.guid;
            cursor.expect(&format!("\t\t{{{guid}}}.{selector}.ActiveCfg = {name}|{platform}"))?;
            cursor.expect(&format!("\t\t{{{guid}}}.{selector}.Build.0 = {name}|{platform}"))?;
        }
    }
    cursor.expect("\tEndGlobalSection")?;

    if version == VsVersion::Vs2005 {
        cursor.expect("\tGlobalSection(SolutionProperties) = preSolution")?;
        cursor.expect("\t\tHideSolutionNode = FALSE")?;
        cursor.expect("\tEndGlobalSection")?;
    } else {
        cursor.expect("\tGlobalSection(ExtensibilityGlobals) = postSolution")?;
        cursor.expect("\tEndGlobalSection")?;
        cursor.expect("\tGlobalSection(ExtensibilityAddIns) = postSolution")?;
        cursor.expect("\tEndGlobalSection")?;
    }
    cursor.expect("EndGlobal")?;

    for (index, guid) in pending {
        let name = solution
            .package_name(&guid)
            .ok_or_else(|| cursor.unresolved(&guid))?
            .to_string();
        project.packages_mut()[index].for_each_config(|config| {
            if !config.dependencies.contains(&name) {
                config.dependencies.push(name.clone());
            }
        });
    }

    Ok(solution)
}

/// One line of the solution configuration list, checked against the exact
/// shape its generation writes. `index` is the position the next name takes;
/// `platform` is the solution-wide platform when there are packages.
fn accept_configuration(
    cursor: &mut Cursor<'_>,
    version: VsVersion,
    platform: Option<&str>,
    index: usize,
) -> Result<Option<String>> {
    let pattern = match version {
        VsVersion::Vs2002 => r"\t\tConfigName\.\d+ = (.+)",
        VsVersion::Vs2003 => r"\t\t(.+?) = .+",
        VsVersion::Vs2005 => r"\t\t(.+?)\|(.+?) = .+",
    };

    let mut ahead = *cursor;
    let Some(caps) = ahead.accept_pattern(pattern)? else {
        return Ok(None);
    };

    let name = caps[0].clone();
    let line = match version {
        VsVersion::Vs2002 => format!("\t\tConfigName.{index} = {name}"),
        VsVersion::Vs2003 => format!("\t\t{name} = {name}"),
        VsVersion::Vs2005 => {
            let platform = platform.unwrap_or(&caps[1]);
            format!("\t\t{name}|{platform} = {name}|{platform}")
        }
    };
    cursor.expect(&line)?;
    Ok(Some(name))
}
