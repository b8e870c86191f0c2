//! `.vcproj` files for native packages.

use gencheck_cursor::{Artifact, Cursor, Result};
use gencheck_model::{BuildFlag, Configuration, Kind, LinkFlag, ModelError, Package, SourceFile};
use regex::escape;

use super::element::{self, AttrStyle, Element};
use super::VsVersion;
use crate::tokens;

const TIGHT: AttrStyle = AttrStyle::Tight;

pub(super) fn parse(package: &mut Package, artifact: &Artifact, version: VsVersion, guid: &str) -> Result<()> {
    let mut cursor = artifact.cursor();

    cursor.expect(r#"<?xml version="1.0" encoding="Windows-1252"?>"#)?;
    let header = element::read(&mut cursor, "", "VisualStudioProject", TIGHT)?;
    header.require(&cursor, "ProjectType", "Visual C++")?;
    header.require(&cursor, "Version", version.vcproj_version())?;
    header.require(&cursor, "Name", &package.name)?;
    header.require(&cursor, "ProjectGUID", &format!("{{{guid}}}"))?;
    if version == VsVersion::Vs2005 {
        header.require(&cursor, "RootNamespace", &package.name)?;
    }
    let managed = header.value(&cursor, "Keyword")? == "ManagedCProj";

    cursor.expect("\t<Platforms>")?;
    let platform = element::read(&mut cursor, "\t\t", "Platform", TIGHT)?;
    platform.require(&cursor, "Name", "Win32")?;
    cursor.expect("\t</Platforms>")?;

    if version == VsVersion::Vs2005 {
        cursor.expect("\t<ToolFiles>")?;
        cursor.expect("\t</ToolFiles>")?;
    }

    cursor.expect("\t<Configurations>")?;
    for config in package.configurations_mut() {
        parse_configuration(config, &mut cursor, version, managed)?;
    }
    cursor.expect("\t</Configurations>")?;

    package.kind = package.configurations().first().and_then(|c| c.kind);

    if version == VsVersion::Vs2003 {
        cursor.expect("\t<References>")?;
        cursor.expect("\t</References>")?;
    }

    cursor.expect("\t<Files>")?;
    parse_files(package, &mut cursor, "\t\t")?;
    cursor.expect("\t</Files>")?;

    cursor.expect("\t<Globals>")?;
    cursor.expect("\t</Globals>")?;
    cursor.expect("</VisualStudioProject>")
}

fn parse_configuration(
    config: &mut Configuration,
    cursor: &mut Cursor<'_>,
    version: VsVersion,
    managed: bool,
) -> Result<()> {
    let block = element::read(cursor, "\t\t", "Configuration", TIGHT)?;
    block.require(cursor, "Name", &format!("{}|Win32", config.name))?;

    config.out_dir = block.value(cursor, "OutputDirectory")?.to_string();
    config.bin_dir = config.out_dir.clone();
    config.obj_dir = block.value(cursor, "IntermediateDirectory")?.to_string();

    let configuration_type = block.value(cursor, "ConfigurationType")?.to_string();
    if block.is("CharacterSet", "1") {
        config.build_flags.insert(BuildFlag::Unicode);
    }
    if managed || block.is_true("ManagedExtensions") {
        config.build_flags.insert(BuildFlag::Managed);
    }

    let archive = configuration_type == "4";
    for name in tool_sequence(version, archive) {
        let tool = element::read(cursor, "\t\t\t", "Tool", TIGHT)?;
        tool.require(cursor, "Name", name)?;
        match name {
            "VCCLCompilerTool" => apply_compiler(config, &tool),
            "VCLinkerTool" => {
                let kind = linked_kind(cursor, &configuration_type, &tool)?;
                if matches!(kind, Kind::Exe | Kind::WinExe) && tool.get("EntryPointSymbol").is_none() {
                    config.build_flags.insert(BuildFlag::NoMain);
                }
                config.kind = Some(kind);
                apply_linker(config, &tool);
            }
            "VCLibrarianTool" => {
                config.kind = Some(Kind::Lib);
                config.target = output_stem(tool.value(cursor, "OutputFile")?);
            }
            _ => {}
        }
    }

    cursor.expect("\t\t</Configuration>")?;

    tracing::debug!(
        configuration = %config.name,
        kind = ?config.kind,
        flags = config.build_flags.len(),
        "recovered vcproj configuration"
    );
    Ok(())
}

/// Tool stanzas in the order each generation writes them.
fn tool_sequence(version: VsVersion, archive: bool) -> Vec<&'static str> {
    let output = if archive { "VCLibrarianTool" } else { "VCLinkerTool" };

    if version == VsVersion::Vs2005 {
        return vec![
            "VCCLCompilerTool",
            "VCManagedResourceCompilerTool",
            "VCResourceCompilerTool",
            "VCPreLinkEventTool",
            output,
            "VCALinkTool",
            "VCManifestTool",
            "VCXDCMakeTool",
            "VCBscMakeTool",
            "VCFxCopTool",
            "VCAppVerifierTool",
            "VCWebDeploymentTool",
            "VCPostBuildEventTool",
        ];
    }

    let mut tools = vec![
        "VCCLCompilerTool",
        "VCCustomBuildTool",
        output,
        "VCMIDLTool",
        "VCPostBuildEventTool",
        "VCPreBuildEventTool",
        "VCPreLinkEventTool",
        "VCResourceCompilerTool",
        "VCWebServiceProxyGeneratorTool",
    ];
    if version == VsVersion::Vs2003 {
        tools.push("VCXMLDataGeneratorTool");
    }
    tools.push("VCWebDeploymentTool");
    if version == VsVersion::Vs2003 {
        tools.push("VCManagedWrapperGeneratorTool");
        tools.push("VCAuxiliaryManagedWrapperGeneratorTool");
    }
    tools
}

fn apply_compiler(config: &mut Configuration, tool: &Element) {
    if let Some(options) = tool.get("AdditionalOptions") {
        config.build_options = options.trim().to_string();
    }

    match tool.get("Optimization") {
        Some("1") => config.build_flags.insert(BuildFlag::OptimizeSize),
        Some("2") => config.build_flags.insert(BuildFlag::OptimizeSpeed),
        Some("3") => config.build_flags.insert(BuildFlag::Optimize),
        _ => false,
    };

    config.include_paths = tool.list("AdditionalIncludeDirectories");
    config.defines = tool.list("PreprocessorDefinitions");

    let flags = [
        (tool.is_true("OmitFramePointers"), BuildFlag::NoFramePointer),
        (tool.is_false("ExceptionHandling"), BuildFlag::NoExceptions),
        (tool.is_false("RuntimeTypeInfo"), BuildFlag::NoRtti),
        (tool.is("WarningLevel", "4"), BuildFlag::ExtraWarnings),
        (tool.is_true("WarnAsError"), BuildFlag::FatalWarnings),
        (tool.is_false("Detect64BitPortabilityProblems"), BuildFlag::No64BitChecks),
        (tool.is("DebugInformationFormat", "0"), BuildFlag::NoSymbols),
    ];
    config
        .build_flags
        .extend(flags.into_iter().filter(|(on, _)| *on).map(|(_, flag)| flag));

    if matches!(tool.get("RuntimeLibrary"), Some("0" | "1")) {
        config.link_flags.insert(LinkFlag::StaticRuntime);
    }
}

fn apply_linker(config: &mut Configuration, tool: &Element) {
    if tool.is_true("IgnoreImportLibrary") {
        config.build_flags.insert(BuildFlag::NoImportLib);
    }
    if let Some(options) = tool.get("AdditionalOptions") {
        config.link_options = options.trim().to_string();
    }
    if let Some(deps) = tool.get("AdditionalDependencies") {
        config.links = deps
            .split_whitespace()
            .map(|lib| lib.strip_suffix(".lib").unwrap_or(lib).to_string())
            .collect();
    }
    if let Some(output) = tool.get("OutputFile") {
        config.target = output_stem(output);
    }

    let mut dirs = tool.list("AdditionalLibraryDirectories").into_iter();
    config.lib_dir = dirs.next().unwrap_or_default();
    config.lib_paths = dirs.collect();
}

/// Kind of a linked (non-archive) configuration.
fn linked_kind(cursor: &Cursor<'_>, configuration_type: &str, linker: &Element) -> Result<Kind> {
    match (configuration_type, linker.get("SubSystem")) {
        ("1", Some("1")) => Ok(Kind::Exe),
        ("1", Some("2")) => Ok(Kind::WinExe),
        ("2", _) => Ok(Kind::Dll),
        (ty, subsystem) => Err(cursor.model(ModelError::UnknownKind(format!(
            "ConfigurationType {ty}, SubSystem {}",
            subsystem.unwrap_or("unset")
        )))),
    }
}

/// `$(OutDir)/name.ext` to `name`.
fn output_stem(output: &str) -> String {
    let name = output.strip_prefix("$(OutDir)/").unwrap_or(output);
    tokens::without_extension(&tokens::to_unix(name))
}

/// `.\src\a.cpp` to `src/a.cpp`.
fn file_name(relative_path: &str) -> String {
    let path = relative_path.strip_prefix(".\\").unwrap_or(relative_path);
    tokens::to_unix(path)
}

/// Files and nested filters at one indentation level.
fn parse_files(package: &mut Package, cursor: &mut Cursor<'_>, indent: &str) -> Result<()> {
    let relative_path = format!(r#"{}\tRelativePath="(.+)">"#, escape(indent));
    let filter_name = format!(r#"{}\tName="(.+)""#, escape(indent));

    loop {
        if cursor.accept(&format!("{indent}<File")) {
            let path = cursor.expect_capture(&relative_path)?;
            cursor.expect(&format!("{indent}</File>"))?;
            package
                .add_file(SourceFile::new(file_name(&path)))
                .map_err(|e| cursor.model(e))?;
        } else if cursor.accept(&format!("{indent}<Filter")) {
            cursor.expect_pattern(&filter_name)?;
            cursor.expect(&format!("{indent}\tFilter=\"\">"))?;
            parse_files(package, cursor, &format!("{indent}\t"))?;
            cursor.expect(&format!("{indent}</Filter>"))?;
        } else {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem("$(OutDir)/MyPackage.exe"), "MyPackage");
        assert_eq!(output_stem("$(OutDir)/bin/MyPackage.lib"), "bin/MyPackage");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(".\\file0.cpp"), "file0.cpp");
        assert_eq!(file_name("..\\shared\\util.cpp"), "../shared/util.cpp");
    }

    #[test]
    fn test_tool_sequences() {
        let vs2002 = tool_sequence(VsVersion::Vs2002, false);
        let vs2003 = tool_sequence(VsVersion::Vs2003, false);
        assert_eq!(vs2003.len(), vs2002.len() + 3);
        assert!(tool_sequence(VsVersion::Vs2005, true).contains(&"VCLibrarianTool"));
        assert!(!tool_sequence(VsVersion::Vs2005, true).contains(&"VCLinkerTool"));
    }

    #[test]
    fn test_compiler_attributes() {
        let artifact = Artifact::from_text(
            "x.vcproj",
            "<Tool
\tName=\"VCCLCompilerTool\"
\tAdditionalOptions=\"/Zm200\"
\tOptimization=\"2\"
\tAdditionalIncludeDirectories=\"include;..\\shared\"
\tPreprocessorDefinitions=\"WIN32;NDEBUG\"
\tExceptionHandling=\"FALSE\"
\tRuntimeLibrary=\"0\"
\tWarningLevel=\"3\"
\tDetect64BitPortabilityProblems=\"FALSE\"
\tDebugInformationFormat=\"0\"/>
",
        );
        let mut cursor = artifact.cursor();
        let tool = element::read(&mut cursor, "", "Tool", TIGHT).unwrap();
        let mut config = Configuration::new("Release");
        apply_compiler(&mut config, &tool);

        assert_eq!(config.build_options, "/Zm200");
        assert_eq!(config.include_paths, ["include", "..\\shared"]);
        assert_eq!(config.defines, ["WIN32", "NDEBUG"]);
        assert!(config.has_flag(BuildFlag::OptimizeSpeed));
        assert!(config.has_flag(BuildFlag::NoExceptions));
        assert!(config.has_flag(BuildFlag::No64BitChecks));
        assert!(config.has_flag(BuildFlag::NoSymbols));
        assert!(!config.has_flag(BuildFlag::ExtraWarnings));
        assert!(config.link_flags.contains(&LinkFlag::StaticRuntime));
    }

    #[test]
    fn test_linker_attributes() {
        let artifact = Artifact::from_text(
            "x.vcproj",
            "<Tool
\tName=\"VCLinkerTool\"
\tAdditionalDependencies=\"opengl32.lib Core.lib\"
\tOutputFile=\"$(OutDir)/App.exe\"
\tAdditionalLibraryDirectories=\"..\\lib;C:\\sdk\\lib\"
\tSubSystem=\"2\"/>
",
        );
        let mut cursor = artifact.cursor();
        let tool = element::read(&mut cursor, "", "Tool", TIGHT).unwrap();
        let mut config = Configuration::new("Debug");
        apply_linker(&mut config, &tool);

        assert_eq!(config.links, ["opengl32", "Core"]);
        assert_eq!(config.target, "App");
        assert_eq!(config.lib_dir, "..\\lib");
        assert_eq!(config.lib_paths, ["C:\\sdk\\lib"]);
        assert_eq!(linked_kind(&cursor, "1", &tool).unwrap(), Kind::WinExe);
        assert_eq!(linked_kind(&cursor, "2", &tool).unwrap(), Kind::Dll);
        assert!(linked_kind(&cursor, "10", &tool).is_err());
    }
}
