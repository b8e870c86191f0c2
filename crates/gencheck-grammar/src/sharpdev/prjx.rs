//! `.prjx` package files. Every element sits on one line, so each is
//! matched as a whole with its attributes captured in a fixed order.

use gencheck_cursor::{Artifact, Cursor, Result};
use gencheck_model::{
    BuildAction, BuildFlag, Configuration, Kind, Language, ManagedLanguage, ModelError, Package,
    SourceFile,
};
use regex::escape;

use super::SharpDevFlavor;
use crate::tokens;

const FILE: &str =
    r#"    <File name="(.+?)" subtype="(.*?)" buildaction="(\w+)" dependson="(.*?)" data="" />"#;
const REFERENCE: &str =
    r#"    <Reference type="(\w+)" refto="(.+?)" localcopy="(True|False)" />"#;
const CODE_GENERATION: &str = concat!(
    r#"      <CodeGeneration runtime="(\w+)" compiler="(\w+)" compilerversion="" "#,
    r#"warninglevel="4" nowarn="" includedebuginformation="(True|False)" "#,
    r#"optimize="(True|False)" unsafecodeallowed="(True|False)" "#,
    r#"generateoverflowchecks="True" mainclass="" target="(\w+)" definesymbols="(.*?)" "#,
    r#"generatexmldocumentation="False" win32Icon="" noconfig="" nostdlib="False" />"#,
);
const OUTPUT: &str = concat!(
    r#"      <Output directory="(.*?)" assembly="(.+?)" executeScript="" "#,
    r#"executeBeforeBuild="" executeAfterBuild="" "#,
    r#"executeBeforeBuildArguments="" executeAfterBuildArguments="" />"#,
);

pub(super) fn parse(
    package: &mut Package,
    artifact: &Artifact,
    flavor: SharpDevFlavor,
    configurations: &[String],
    siblings: &[String],
) -> Result<()> {
    let mut cursor = artifact.cursor();
    package.language = Some(Language::Managed(ManagedLanguage::CSharp));

    cursor.expect(&header(&package.name, flavor))?;

    cursor.expect("  <Contents>")?;
    while let Some(caps) = cursor.accept_pattern(FILE)? {
        let file = source_file(&cursor, &caps)?;
        package.add_file(file).map_err(|e| cursor.model(e))?;
    }
    cursor.expect("  </Contents>")?;

    cursor.expect("  <References>")?;
    while let Some(caps) = cursor.accept_pattern(REFERENCE)? {
        let (link, dependency) = reference(&cursor, &caps[0], &caps[1], siblings)?;
        package.for_each_config(|config| {
            config.links.push(link.clone());
            if let Some(dependency) = &dependency {
                config.dependencies.push(dependency.clone());
            }
        });
    }
    cursor.expect("  </References>")?;
    cursor.expect(r#"  <DeploymentInformation target="" script="" strategy="File" />"#)?;

    let active = configurations.first().map(String::as_str).unwrap_or_default();
    cursor.expect(&format!(r#"  <Configurations active="{active}">"#))?;
    for index in 0..package.configurations().len() {
        parse_configuration(package, index, &mut cursor)?;
    }
    cursor.expect("  </Configurations>")?;
    cursor.expect("</Project>")?;

    tracing::debug!(
        package = %package.name,
        files = package.files().len(),
        "recovered prjx"
    );
    Ok(())
}

fn header(name: &str, flavor: SharpDevFlavor) -> String {
    let namespace = match flavor {
        SharpDevFlavor::SharpDevelop => format!(r#"standardNamespace="{name}" "#),
        SharpDevFlavor::MonoDevelop => String::new(),
    };
    format!(
        r#"<Project name="{name}" {namespace}description="" newfilesearch="None" enableviewstate="True" version="1.1" projecttype="C#">"#
    )
}

fn source_file(cursor: &Cursor<'_>, caps: &[String]) -> Result<SourceFile> {
    let action = match caps[2].as_str() {
        "EmbedAsResource" => BuildAction::EmbeddedResource,
        other => other.parse().map_err(|e| cursor.model(e))?,
    };
    let mut file = SourceFile::new(caps[0].as_str()).with_action(action);
    file.subtype = non_empty(&caps[1]);
    file.depends_on = non_empty(&caps[3]);
    Ok(file)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Link name and, for project references, the sibling package depended on.
fn reference(
    cursor: &Cursor<'_>,
    kind: &str,
    target: &str,
    siblings: &[String],
) -> Result<(String, Option<String>)> {
    match kind {
        "Project" => {
            if !siblings.iter().any(|s| s == target) {
                return Err(cursor.unresolved(target));
            }
            Ok((target.to_string(), Some(target.to_string())))
        }
        "Assembly" => {
            let name = tokens::basename(target);
            Ok((strip_dll(name).to_string(), None))
        }
        "Gac" => Ok((strip_dll(target).to_string(), None)),
        other => Err(cursor.mismatch(format!("reference type Project, Assembly or Gac, not {other}"))),
    }
}

fn strip_dll(name: &str) -> &str {
    name.strip_suffix(".dll").unwrap_or(name)
}

fn parse_configuration(package: &mut Package, index: usize, cursor: &mut Cursor<'_>) -> Result<()> {
    let name = escape(&package.configurations()[index].name);
    let run_with_warnings = cursor.expect_capture(&format!(
        r#"    <Configuration runwithwarnings="(True|False)" name="{name}">"#
    ))?;

    let generation = cursor.expect_pattern(CODE_GENERATION)?;
    let compiler = paired_compiler(cursor, &generation[0], &generation[1])?;
    let kind = target_kind(cursor, &generation[5])?;
    match package.kind {
        None => package.kind = Some(kind),
        Some(existing) if existing != kind => {
            return Err(cursor.kind_token(existing, &generation[5]));
        }
        Some(_) => {}
    }
    package.compiler = Some(compiler.to_string());

    cursor.expect(r#"      <Execution commandlineparameters="" consolepause="True" />"#)?;
    let output = cursor.expect_pattern(OUTPUT)?;
    cursor.expect("    </Configuration>")?;

    let config = &mut package.configurations_mut()[index];
    apply_code_generation(config, &run_with_warnings, &generation);
    config.out_dir = tokens::to_unix(&output[0]);
    config.target = output[1].clone();

    tracing::debug!(configuration = %config.name, "recovered prjx configuration");
    Ok(())
}

/// The runtime decides which compiler is legal: `MsNet` builds with `Csc`,
/// `Mono` with `Mcs`.
fn paired_compiler(cursor: &Cursor<'_>, runtime: &str, compiler: &str) -> Result<&'static str> {
    match (runtime, compiler) {
        ("MsNet", "Csc") => Ok("csc"),
        ("Mono", "Mcs") => Ok("mcs"),
        _ => Err(cursor.tool_pairing(compiler, runtime)),
    }
}

fn target_kind(cursor: &Cursor<'_>, token: &str) -> Result<Kind> {
    match token {
        "Exe" => Ok(Kind::Exe),
        "WinExe" => Ok(Kind::WinExe),
        "Library" => Ok(Kind::Dll),
        other => Err(cursor.model(ModelError::UnknownKind(other.to_string()))),
    }
}

fn apply_code_generation(config: &mut Configuration, run_with_warnings: &str, generation: &[String]) {
    if run_with_warnings == "False" {
        config.build_flags.insert(BuildFlag::FatalWarnings);
    }
    if generation[2] == "False" {
        config.build_flags.insert(BuildFlag::NoSymbols);
    }
    if generation[3] == "True" {
        config.build_flags.insert(BuildFlag::Optimize);
    }
    if generation[4] == "True" {
        config.build_flags.insert(BuildFlag::Unsafe);
    }
    config.defines = tokens::split_list(&generation[6], ';');
}
