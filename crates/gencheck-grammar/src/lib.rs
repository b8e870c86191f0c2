//! Toolchain grammars.
//!
//! Each grammar reads the artifacts one generator target writes and fills a
//! [`Project`] from them. Grammars share nothing but the match cursor and the
//! model, so adding a dialect never touches the existing ones.
//!
//! | identifier | artifacts |
//! |---|---|
//! | `gnu` | `Makefile` + one makefile per package |
//! | `vs2002`, `vs2003`, `vs2005` | `.sln` + `.vcproj` / `.csproj` |
//! | `sharpdev`, `monodev` | `.cmbx` (+ `.mdsx`) + `.prjx` |

mod gnu;
mod sharpdev;
mod tokens;
mod vs;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use gencheck_cursor::Result;
use gencheck_model::Project;

pub use gnu::GnuGrammar;
pub use sharpdev::{SharpDevFlavor, SharpDevGrammar};
pub use vs::{VsGrammar, VsVersion};

/// One generated-artifact dialect.
pub trait Grammar {
    /// Stable identifier, the same string passed to the generator's `--target`.
    fn identifier(&self) -> &'static str;

    /// Read the artifacts for `project` and fill it in.
    ///
    /// `stem` is the project path joined with the project name; each grammar
    /// derives its root artifact from it (`<dir>/Makefile`, `<stem>.sln`, ...).
    fn parse(&self, project: &mut Project, stem: &Path) -> Result<()>;
}

/// Identifiers of every known grammar, in a stable order.
pub const IDENTIFIERS: &[&str] = &["gnu", "vs2002", "vs2003", "vs2005", "sharpdev", "monodev"];

/// Look up a grammar by identifier.
pub fn grammar_for(identifier: &str) -> Option<Box<dyn Grammar>> {
    let grammar: Box<dyn Grammar> = match identifier {
        "gnu" => Box::new(GnuGrammar),
        "vs2002" => Box::new(VsGrammar::new(VsVersion::Vs2002)),
        "vs2003" => Box::new(VsGrammar::new(VsVersion::Vs2003)),
        "vs2005" => Box::new(VsGrammar::new(VsVersion::Vs2005)),
        "sharpdev" => Box::new(SharpDevGrammar::new(SharpDevFlavor::SharpDevelop)),
        "monodev" => Box::new(SharpDevGrammar::new(SharpDevFlavor::MonoDevelop)),
        _ => return None,
    };
    Some(grammar)
}

/// `stem` with `suffix` appended verbatim. Project names may contain dots, so
/// this never replaces an existing extension.
pub(crate) fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(stem.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

/// Directory the root artifact lives in.
pub(crate) fn root_dir(stem: &Path) -> PathBuf {
    stem.parent().unwrap_or_else(|| Path::new("")).to_path_buf()
}
