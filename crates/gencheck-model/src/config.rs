use std::collections::BTreeSet;

use serde::Serialize;

use crate::{BuildFlag, Kind, LinkFlag};

/// Settings for one package under one named build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub name: String,

    pub bin_dir: String,
    pub lib_dir: String,
    pub obj_dir: String,
    pub out_dir: String,

    /// Compiled output, without extension where the dialect strips it.
    pub target: String,

    /// Include search paths (native only).
    pub include_paths: Vec<String>,
    pub defines: Vec<String>,
    pub lib_paths: Vec<String>,

    /// Linked library or referenced assembly names, in link order.
    pub links: Vec<String>,

    /// Compiler options left over after flag extraction.
    pub build_options: String,

    /// Linker options left over after flag extraction.
    pub link_options: String,

    /// Sibling packages that must build first.
    pub dependencies: Vec<String>,

    /// Files the link step depends on.
    pub link_deps: Vec<String>,

    pub build_flags: BTreeSet<BuildFlag>,
    pub link_flags: BTreeSet<LinkFlag>,

    /// Per-configuration kind, when the dialect states one.
    pub kind: Option<Kind>,
}

impl Configuration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_flag(&self, flag: BuildFlag) -> bool {
        self.build_flags.contains(&flag)
    }
}
