//! SharpDevelop and MonoDevelop: a `.cmbx` combine naming one `.prjx` per
//! package. MonoDevelop also writes an `.mdsx` solution file. The two
//! flavors differ in header details and in the separator used for paths.

mod combine;
mod prjx;

use std::path::Path;

use gencheck_cursor::{Artifact, Result};
use gencheck_model::Project;

use crate::Grammar;

/// Which IDE wrote the files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharpDevFlavor {
    SharpDevelop,
    MonoDevelop,
}

impl SharpDevFlavor {
    pub fn identifier(self) -> &'static str {
        match self {
            SharpDevFlavor::SharpDevelop => "sharpdev",
            SharpDevFlavor::MonoDevelop => "monodev",
        }
    }

    /// Path separator the flavor writes.
    fn separator(self) -> char {
        match self {
            SharpDevFlavor::SharpDevelop => '\\',
            SharpDevFlavor::MonoDevelop => '/',
        }
    }

    fn foreign_separator(self) -> char {
        match self {
            SharpDevFlavor::SharpDevelop => '/',
            SharpDevFlavor::MonoDevelop => '\\',
        }
    }
}

/// Grammar for the `sharpdev` and `monodev` targets.
#[derive(Debug, Clone, Copy)]
pub struct SharpDevGrammar {
    flavor: SharpDevFlavor,
}

impl SharpDevGrammar {
    pub fn new(flavor: SharpDevFlavor) -> Self {
        Self { flavor }
    }
}

impl Grammar for SharpDevGrammar {
    fn identifier(&self) -> &'static str {
        self.flavor.identifier()
    }

    fn parse(&self, project: &mut Project, stem: &Path) -> Result<()> {
        let root = crate::root_dir(stem);
        let artifact = Artifact::open(crate::with_suffix(stem, ".cmbx"))?;
        combine::parse(project, &artifact, self.flavor)?;

        if self.flavor == SharpDevFlavor::MonoDevelop {
            let artifact = Artifact::open(crate::with_suffix(stem, ".mdsx"))?;
            combine::parse_mdsx(project, &artifact)?;
        }

        let siblings: Vec<String> = project.packages().iter().map(|p| p.name.clone()).collect();
        let configurations = project.configurations().to_vec();
        for package in project.packages_mut() {
            let location = root.join(&package.path).join(&package.script_name);
            let artifact = Artifact::open(&location)?;
            prjx::parse(package, &artifact, self.flavor, &configurations, &siblings)?;
        }
        Ok(())
    }
}
