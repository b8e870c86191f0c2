//! `.cmbx` combine files and the MonoDevelop `.mdsx` companion.

use gencheck_cursor::{Artifact, Cursor, GrammarError, Result};
use gencheck_model::Project;
use regex::escape;

use super::SharpDevFlavor;
use crate::tokens;

pub(super) fn parse(project: &mut Project, artifact: &Artifact, flavor: SharpDevFlavor) -> Result<()> {
    let mut cursor = artifact.cursor();

    cursor.expect(&format!(
        r#"<Combine fileversion="1.0" name="{}" description="">"#,
        project.name
    ))?;

    if cursor.accept(r#"  <StartMode startupentry="" single="True">"#) {
        while let Some(entry) = cursor.accept_pattern(r#"    <Execute entry="(.+)" type="None" />"#)? {
            project.add_package(entry[0].as_str());
        }
    }
    cursor.expect("  </StartMode>")?;

    cursor.expect("  <Entries>")?;
    for package in project.packages_mut() {
        let location = expect_entry(&mut cursor, flavor)?;
        let (path, script) = tokens::split_location(&format!("{location}.prjx"));
        package.path = path;
        package.script_name = script;
    }
    cursor.expect("  </Entries>")?;

    // The active configuration is always written as `Debug`, whatever the
    // configurations are called.
    cursor.expect(r#"  <Configurations active="Debug">"#)?;

    let mut build_entries = Vec::new();
    while let Some(caps) = cursor.accept_pattern(r#"    <Configuration name="(.+)">"#)? {
        let name = caps[0].as_str();
        project.add_configuration(name).map_err(|e| cursor.model(e))?;

        for package in project.packages() {
            let build = cursor.expect_capture(&format!(
                r#"      <Entry name="{}" configurationname="{}" build="(True|False)" />"#,
                escape(&package.name),
                escape(name)
            ))?;
            build_entries.push((cursor.consumed_line(), build));
        }
        cursor.expect("    </Configuration>")?;
    }
    cursor.expect("  </Configurations>")?;
    cursor.expect("</Combine>")?;

    // A package is built in a configuration when it has some other
    // configuration, so only a single-configuration project writes False.
    let expected = if project.configurations().len() > 1 { "True" } else { "False" };
    if let Some((line, _)) = build_entries.iter().find(|(_, build)| build != expected) {
        return Err(GrammarError::GrammarMismatch {
            path: artifact.path().to_path_buf(),
            line: *line,
            expected: format!(r#"build="{expected}""#),
            actual: artifact.line(line - 1).unwrap_or_default().to_string(),
        });
    }

    tracing::debug!(
        packages = project.packages().len(),
        configurations = project.configurations().len(),
        "recovered combine"
    );
    Ok(())
}

/// One `Entry filename` line; the path must use the flavor's separator.
fn expect_entry(cursor: &mut Cursor<'_>, flavor: SharpDevFlavor) -> Result<String> {
    let mut ahead = *cursor;
    let location = ahead.expect_capture(r#"    <Entry filename="(.+)\.prjx" />"#)?;
    if location.contains(flavor.foreign_separator()) {
        return Err(cursor.mismatch(format!(
            "project path separated by '{}'",
            flavor.separator()
        )));
    }
    *cursor = ahead;
    Ok(location)
}

/// `.mdsx`: the relative output path becomes every configuration's binary
/// directory.
pub(super) fn parse_mdsx(project: &mut Project, artifact: &Artifact) -> Result<()> {
    let mut cursor = artifact.cursor();
    cursor.expect(r#"<MonoDevelopSolution fileversion="1.0">"#)?;
    let output = cursor.expect_capture("  <RelativeOutputPath>(.+)</RelativeOutputPath>")?;
    cursor.expect("</MonoDevelopSolution>")?;

    for package in project.packages_mut() {
        package.for_each_config(|config| config.bin_dir = output.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMBINE: &str = r#"<Combine fileversion="1.0" name="MyProject" description="">
  <StartMode startupentry="" single="True">
    <Execute entry="App" type="None" />
    <Execute entry="Lib" type="None" />
  </StartMode>
  <Entries>
    <Entry filename=".\App.prjx" />
    <Entry filename=".\lib\Lib.prjx" />
  </Entries>
  <Configurations active="Debug">
    <Configuration name="Debug">
      <Entry name="App" configurationname="Debug" build="True" />
      <Entry name="Lib" configurationname="Debug" build="True" />
    </Configuration>
    <Configuration name="Release">
      <Entry name="App" configurationname="Release" build="True" />
      <Entry name="Lib" configurationname="Release" build="True" />
    </Configuration>
  </Configurations>
</Combine>"#;

    #[test]
    fn test_combine() {
        let artifact = Artifact::from_text("MyProject.cmbx", COMBINE);
        let mut project = Project::new("MyProject", ".");
        parse(&mut project, &artifact, SharpDevFlavor::SharpDevelop).unwrap();

        assert_eq!(project.configurations(), ["Debug", "Release"]);
        let lib = &project.packages()[1];
        assert_eq!(lib.name, "Lib");
        assert_eq!(lib.path, "./lib");
        assert_eq!(lib.script_name, "Lib.prjx");
        assert_eq!(lib.configurations().len(), 2);
    }

    #[test]
    fn test_foreign_separator() {
        let artifact = Artifact::from_text("MyProject.cmbx", COMBINE);
        let mut project = Project::new("MyProject", ".");
        let err = parse(&mut project, &artifact, SharpDevFlavor::MonoDevelop).unwrap_err();
        assert!(matches!(err, GrammarError::GrammarMismatch { line: 7, .. }));
    }

    #[test]
    fn test_project_name_must_match() {
        let artifact = Artifact::from_text("MyProject.cmbx", COMBINE);
        let mut project = Project::new("Other", ".");
        let err = parse(&mut project, &artifact, SharpDevFlavor::SharpDevelop).unwrap_err();
        assert!(matches!(err, GrammarError::GrammarMismatch { line: 1, .. }));
    }

    #[test]
    fn test_active_is_always_debug() {
        let text = COMBINE.replace("\"Debug\"", "\"DebugLib\"").replace("\"Release\"", "\"ReleaseLib\"");
        let text = text.replace(r#"active="DebugLib""#, r#"active="Debug""#);
        let artifact = Artifact::from_text("MyProject.cmbx", &text);
        let mut project = Project::new("MyProject", ".");
        parse(&mut project, &artifact, SharpDevFlavor::SharpDevelop).unwrap();
        assert_eq!(project.configurations(), ["DebugLib", "ReleaseLib"]);

        let text = COMBINE.replace(r#"active="Debug""#, r#"active="Release""#);
        let artifact = Artifact::from_text("MyProject.cmbx", &text);
        let mut project = Project::new("MyProject", ".");
        let err = parse(&mut project, &artifact, SharpDevFlavor::SharpDevelop).unwrap_err();
        assert!(matches!(err, GrammarError::GrammarMismatch { line: 10, .. }));
    }

    const SINGLE: &str = r#"<Combine fileversion="1.0" name="MyProject" description="">
  <StartMode startupentry="" single="True">
    <Execute entry="App" type="None" />
  </StartMode>
  <Entries>
    <Entry filename=".\App.prjx" />
  </Entries>
  <Configurations active="Debug">
    <Configuration name="Debug">
      <Entry name="App" configurationname="Debug" build="False" />
    </Configuration>
  </Configurations>
</Combine>"#;

    #[test]
    fn test_single_configuration_is_not_built() {
        let artifact = Artifact::from_text("MyProject.cmbx", SINGLE);
        let mut project = Project::new("MyProject", ".");
        parse(&mut project, &artifact, SharpDevFlavor::SharpDevelop).unwrap();
        assert_eq!(project.configurations(), ["Debug"]);

        let text = SINGLE.replace(r#"build="False""#, r#"build="True""#);
        let artifact = Artifact::from_text("MyProject.cmbx", &text);
        let mut project = Project::new("MyProject", ".");
        let err = parse(&mut project, &artifact, SharpDevFlavor::SharpDevelop).unwrap_err();
        assert!(matches!(err, GrammarError::GrammarMismatch { line: 10, .. }));
    }

    #[test]
    fn test_several_configurations_are_all_built() {
        let text = COMBINE.replacen(
            r#"configurationname="Release" build="True""#,
            r#"configurationname="Release" build="False""#,
            1,
        );
        let artifact = Artifact::from_text("MyProject.cmbx", &text);
        let mut project = Project::new("MyProject", ".");
        let err = parse(&mut project, &artifact, SharpDevFlavor::SharpDevelop).unwrap_err();
        assert!(matches!(err, GrammarError::GrammarMismatch { line: 16, .. }));
    }

    #[test]
    fn test_mdsx_sets_bin_dir() {
        let artifact = Artifact::from_text("MyProject.cmbx", &COMBINE.replace('\\', "/"));
        let mut project = Project::new("MyProject", ".");
        parse(&mut project, &artifact, SharpDevFlavor::MonoDevelop).unwrap();

        let mdsx = Artifact::from_text(
            "MyProject.mdsx",
            "<MonoDevelopSolution fileversion=\"1.0\">\n  <RelativeOutputPath>bin</RelativeOutputPath>\n</MonoDevelopSolution>\n",
        );
        parse_mdsx(&mut project, &mdsx).unwrap();
        for package in project.packages() {
            for config in package.configurations() {
                assert_eq!(config.bin_dir, "bin");
            }
        }
    }
}
