//! Visual Studio 2002, 2003 and 2005: a solution plus one project file per
//! package. Native packages are `.vcproj`; C# packages are the attribute
//! style `.csproj` before 2005 and MSBuild from 2005 on.

mod csproj;
mod element;
mod msbuild;
mod solution;
mod vcproj;

use std::path::Path;

use gencheck_cursor::{Artifact, Result};
use gencheck_model::Project;

use crate::Grammar;

use solution::ProjectTool;

/// Which generation of the project-file format to expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VsVersion {
    Vs2002,
    Vs2003,
    Vs2005,
}

impl VsVersion {
    pub fn identifier(self) -> &'static str {
        match self {
            VsVersion::Vs2002 => "vs2002",
            VsVersion::Vs2003 => "vs2003",
            VsVersion::Vs2005 => "vs2005",
        }
    }

    /// `Format Version` of the solution file.
    fn solution_format(self) -> &'static str {
        match self {
            VsVersion::Vs2002 => "7.00",
            VsVersion::Vs2003 => "8.00",
            VsVersion::Vs2005 => "9.00",
        }
    }

    /// `Version` attribute of a `.vcproj`.
    fn vcproj_version(self) -> &'static str {
        match self {
            VsVersion::Vs2002 => "7.00",
            VsVersion::Vs2003 => "7.10",
            VsVersion::Vs2005 => "8.00",
        }
    }
}

/// Grammar for the `vs2002`, `vs2003` and `vs2005` targets.
#[derive(Debug, Clone, Copy)]
pub struct VsGrammar {
    version: VsVersion,
}

impl VsGrammar {
    pub fn new(version: VsVersion) -> Self {
        Self { version }
    }
}

impl Grammar for VsGrammar {
    fn identifier(&self) -> &'static str {
        self.version.identifier()
    }

    fn parse(&self, project: &mut Project, stem: &Path) -> Result<()> {
        let root = crate::root_dir(stem);
        let artifact = Artifact::open(crate::with_suffix(stem, ".sln"))?;
        let solution = solution::parse(project, &artifact, self.version)?;

        let configurations = project.configurations().to_vec();
        for (package, entry) in project.packages_mut().iter_mut().zip(&solution.entries) {
            let location = root.join(&package.path).join(&package.script_name);
            let artifact = Artifact::open(&location)?;

            tracing::debug!(
                package = %package.name,
                path = %location.display(),
                "parsing project file"
            );

            match (entry.tool, self.version) {
                (ProjectTool::Vc, version) => {
                    vcproj::parse(package, &artifact, version, &entry.guid)?;
                }
                (ProjectTool::Cs, VsVersion::Vs2005) => {
                    msbuild::parse(package, &artifact, &configurations, &entry.guid)?;
                }
                (ProjectTool::Cs, version) => {
                    let files = csproj::Companions::beside(&location);
                    csproj::parse(package, &artifact, &files, version, &entry.guid, &solution)?;
                }
            }
        }
        Ok(())
    }
}
