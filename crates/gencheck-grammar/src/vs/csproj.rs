//! Attribute-style `.csproj` files (2002 and 2003) and their companions:
//! `.csproj.user` for local projects, `.csproj.webinfo` for web projects.

use std::path::{Path, PathBuf};

use gencheck_cursor::{Artifact, Cursor, Result};
use gencheck_model::{BuildAction, BuildFlag, Configuration, Kind, ModelError, Package, SourceFile};
use regex::escape;

use super::element::{self, AttrStyle, Element};
use super::solution::Solution;
use super::VsVersion;
use crate::tokens;

const SPACED: AttrStyle = AttrStyle::Spaced;

/// Paths of the files written next to a `.csproj`.
#[derive(Debug, Clone)]
pub(super) struct Companions {
    user: PathBuf,
    webinfo: PathBuf,
}

impl Companions {
    pub(super) fn beside(csproj: &Path) -> Self {
        Self {
            user: crate::with_suffix(csproj, ".user"),
            webinfo: crate::with_suffix(csproj, ".webinfo"),
        }
    }
}

pub(super) fn parse(
    package: &mut Package,
    artifact: &Artifact,
    companions: &Companions,
    version: VsVersion,
    guid: &str,
    solution: &Solution,
) -> Result<()> {
    let mut cursor = artifact.cursor();

    cursor.expect("<VisualStudioProject>")?;
    let csharp = element::read(&mut cursor, "\t", "CSHARP", SPACED)?;
    let (product, schema) = match version {
        VsVersion::Vs2003 => ("7.10.3077", "2.0"),
        _ => ("7.0.9254", "1.0"),
    };
    csharp.require(&cursor, "ProductVersion", product)?;
    csharp.require(&cursor, "SchemaVersion", schema)?;
    csharp.require(&cursor, "ProjectGuid", &format!("{{{guid}}}"))?;
    let web = csharp.value(&cursor, "ProjectType")? == "Web";

    cursor.expect("\t\t<Build>")?;
    let settings = element::read(&mut cursor, "\t\t\t", "Settings", SPACED)?;
    let kind = settings_kind(&cursor, &settings, web)?;
    let assembly = settings.value(&cursor, "AssemblyName")?.to_string();
    package.kind = Some(kind);

    for config in package.configurations_mut() {
        config.target = assembly.clone();
        parse_configuration(config, &mut cursor)?;
    }
    cursor.expect("\t\t\t</Settings>")?;

    cursor.expect("\t\t\t<References>")?;
    while let Some(reference) = element::accept(&mut cursor, "\t\t\t\t", "Reference", SPACED)? {
        let name = reference.value(&cursor, "Name")?.to_string();
        let sibling = match reference.get("Project") {
            Some(project) => {
                let guid = project.trim_start_matches('{').trim_end_matches('}');
                let sibling = solution
                    .package_name(guid)
                    .ok_or_else(|| cursor.unresolved(project))?;
                Some(sibling.to_string())
            }
            None => None,
        };
        package.for_each_config(|config| {
            config.links.push(name.clone());
            if let Some(sibling) = &sibling {
                if !config.dependencies.contains(sibling) {
                    config.dependencies.push(sibling.clone());
                }
            }
        });
    }
    cursor.expect("\t\t\t</References>")?;
    cursor.expect("\t\t</Build>")?;

    cursor.expect("\t\t<Files>")?;
    cursor.expect("\t\t\t<Include>")?;
    while let Some(entry) = element::accept(&mut cursor, "\t\t\t\t", "File", SPACED)? {
        let file = source_file(&cursor, &entry)?;
        package.add_file(file).map_err(|e| cursor.model(e))?;
    }
    cursor.expect("\t\t\t</Include>")?;
    cursor.expect("\t\t</Files>")?;
    cursor.expect("\t</CSHARP>")?;
    cursor.expect("</VisualStudioProject>")?;

    if web {
        parse_webinfo(package, &Artifact::open(&companions.webinfo)?)
    } else {
        parse_user(package, &Artifact::open(&companions.user)?)
    }
}

/// Package kind from `ProjectType` and `OutputType`; a web project must
/// build a library.
fn settings_kind(cursor: &Cursor<'_>, settings: &Element, web: bool) -> Result<Kind> {
    let output = settings.value(cursor, "OutputType")?;
    match (web, output) {
        (true, "Library") => Ok(Kind::AspNet),
        (true, other) => Err(cursor.kind_token(Kind::AspNet, other)),
        (false, "Exe") => Ok(Kind::Exe),
        (false, "WinExe") => Ok(Kind::WinExe),
        (false, "Library") => Ok(Kind::Dll),
        (false, other) => Err(cursor.model(ModelError::UnknownKind(other.to_string()))),
    }
}

fn parse_configuration(config: &mut Configuration, cursor: &mut Cursor<'_>) -> Result<()> {
    let block = element::read(cursor, "\t\t\t\t", "Config", SPACED)?;
    block.require(cursor, "Name", &config.name)?;

    if block.is_true("AllowUnsafeBlocks") {
        config.build_flags.insert(BuildFlag::Unsafe);
    }
    if !block.is_true("DebugSymbols") {
        config.build_flags.insert(BuildFlag::NoSymbols);
    }
    if block.is_true("Optimize") {
        config.build_flags.insert(BuildFlag::Optimize);
    }
    if block.is_true("TreatWarningsAsErrors") {
        config.build_flags.insert(BuildFlag::FatalWarnings);
    }
    config.defines = block.list("DefineConstants");
    config.out_dir = tokens::to_unix(block.value(cursor, "OutputPath")?);

    tracing::debug!(configuration = %config.name, "recovered csproj configuration");
    Ok(())
}

fn source_file(cursor: &Cursor<'_>, entry: &Element) -> Result<SourceFile> {
    let action: BuildAction = entry
        .value(cursor, "BuildAction")?
        .parse()
        .map_err(|e| cursor.model(e))?;

    let mut file = SourceFile::new(tokens::to_unix(entry.value(cursor, "RelPath")?)).with_action(action);
    file.subtype = entry.get("SubType").map(str::to_string);
    file.depends_on = entry.get("DependentUpon").map(str::to_string);
    Ok(file)
}

/// `.csproj.user`: the reference path lists the library search paths, then
/// the binary directory last.
fn parse_user(package: &mut Package, artifact: &Artifact) -> Result<()> {
    let mut cursor = artifact.cursor();

    cursor.expect("<VisualStudioProject>")?;
    cursor.expect("\t<CSHARP>")?;
    cursor.expect("\t\t<Build>")?;

    let reference_path = cursor.expect_capture(r#"\t\t\t<Settings ReferencePath = "(.*)" >"#)?;
    let mut paths = tokens::split_list(&reference_path, ';');
    let bin_dir = paths.pop().unwrap_or_default();

    for config in package.configurations_mut() {
        let block = element::read(&mut cursor, "\t\t\t\t", "Config", SPACED)?;
        block.require(&cursor, "Name", &config.name)?;
        config.bin_dir = bin_dir.clone();
        config.lib_paths = paths.clone();
    }

    cursor.expect("\t\t\t</Settings>")?;
    cursor.expect("\t\t</Build>")?;
    element::read(&mut cursor, "\t\t", "OtherProjectSettings", SPACED)?;
    cursor.expect("\t</CSHARP>")?;
    cursor.expect("</VisualStudioProject>")
}

fn parse_webinfo(package: &Package, artifact: &Artifact) -> Result<()> {
    let mut cursor = artifact.cursor();
    cursor.expect("<VisualStudioUNCWeb>")?;
    cursor.expect_pattern(&format!(
        r#"\t<Web URLPath = "(.+)/{}\.csproj" />"#,
        escape(&package.name)
    ))?;
    cursor.expect("</VisualStudioUNCWeb>")
}
