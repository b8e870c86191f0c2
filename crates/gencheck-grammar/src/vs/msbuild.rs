//! MSBuild `.csproj` files (2005).

use gencheck_cursor::{Artifact, Cursor, Result};
use gencheck_model::{BuildAction, BuildFlag, Configuration, Kind, ModelError, Package, SourceFile};

use crate::tokens;

const FOOTER: &[&str] = &[
    r#"  <Import Project="$(MSBuildBinPath)\Microsoft.CSharp.targets" />"#,
    "  <!-- To modify your build process, add your task inside one of the targets below and uncomment it. ",
    "       Other similar extension points exist, see Microsoft.Common.targets.",
    r#"  <Target Name="BeforeBuild">"#,
    "  </Target>",
    r#"  <Target Name="AfterBuild">"#,
    "  </Target>",
    "  -->",
    "</Project>",
];

pub(super) fn parse(
    package: &mut Package,
    artifact: &Artifact,
    configurations: &[String],
    guid: &str,
) -> Result<()> {
    let mut cursor = artifact.cursor();
    let default_config = configurations.first().map_or("", String::as_str);

    cursor.expect(r#"<Project DefaultTargets="Build" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">"#)?;
    cursor.expect("  <PropertyGroup>")?;
    cursor.expect(&format!(
        "    <Configuration Condition=\" '$(Configuration)' == '' \">{default_config}</Configuration>"
    ))?;
    cursor.expect("    <Platform Condition=\" '$(Platform)' == '' \">AnyCPU</Platform>")?;
    cursor.expect("    <ProductVersion>8.0.50727</ProductVersion>")?;
    cursor.expect("    <SchemaVersion>2.0</SchemaVersion>")?;
    cursor.expect(&format!("    <ProjectGuid>{{{guid}}}</ProjectGuid>"))?;

    let output = cursor.expect_capture("    <OutputType>(.+)</OutputType>")?;
    package.kind = Some(match output.as_str() {
        "Exe" => Kind::Exe,
        "WinExe" => Kind::WinExe,
        "Library" => Kind::Dll,
        other => return Err(cursor.model(ModelError::UnknownKind(other.to_string()))),
    });

    cursor.expect("    <AppDesignerFolder>Properties</AppDesignerFolder>")?;
    cursor.expect_pattern("    <RootNamespace>(.+)</RootNamespace>")?;
    let assembly = cursor.expect_capture("    <AssemblyName>(.+)</AssemblyName>")?;
    cursor.expect("  </PropertyGroup>")?;

    for config in package.configurations_mut() {
        config.target = assembly.clone();
        parse_configuration(config, &mut cursor)?;
    }

    cursor.expect("  <ItemGroup>")?;
    while let Some(reference) = cursor.accept_pattern(r#"    <Reference Include="(.+)" />"#)? {
        package.for_each_config(|config| config.links.push(reference[0].clone()));
    }
    cursor.expect("  </ItemGroup>")?;

    cursor.expect("  <ItemGroup>")?;
    while let Some(file) = parse_item(&mut cursor)? {
        package.add_file(file).map_err(|e| cursor.model(e))?;
    }
    cursor.expect("  </ItemGroup>")?;

    for line in FOOTER {
        cursor.expect(line)?;
    }
    Ok(())
}

fn parse_configuration(config: &mut Configuration, cursor: &mut Cursor<'_>) -> Result<()> {
    cursor.expect(&format!(
        "  <PropertyGroup Condition=\" '$(Configuration)|$(Platform)' == '{}|AnyCPU' \">",
        config.name
    ))?;

    if cursor.accept("    <DebugSymbols>true</DebugSymbols>") {
        cursor.expect("    <DebugType>full</DebugType>")?;
    } else {
        cursor.expect("    <DebugType>pdbonly</DebugType>")?;
        config.build_flags.insert(BuildFlag::NoSymbols);
    }

    if cursor.expect_capture("    <Optimize>(true|false)</Optimize>")? == "true" {
        config.build_flags.insert(BuildFlag::Optimize);
    }

    let output = cursor.expect_capture(r"    <OutputPath>(.*)\\</OutputPath>")?;
    config.out_dir = tokens::to_unix(&output);
    config.bin_dir = config.out_dir.clone();

    let defines = cursor.expect_capture("    <DefineConstants>(.*)</DefineConstants>")?;
    config.defines = tokens::split_list(&defines, ';');

    cursor.expect("    <ErrorReport>prompt</ErrorReport>")?;
    cursor.expect("    <WarningLevel>4</WarningLevel>")?;
    if cursor.accept("    <AllowUnsafeBlocks>true</AllowUnsafeBlocks>") {
        config.build_flags.insert(BuildFlag::Unsafe);
    }
    if cursor.accept("    <TreatWarningsAsErrors>true</TreatWarningsAsErrors>") {
        config.build_flags.insert(BuildFlag::FatalWarnings);
    }
    cursor.expect("  </PropertyGroup>")?;

    tracing::debug!(configuration = %config.name, "recovered msbuild configuration");
    Ok(())
}

/// One item such as `<Compile Include="a.cs" />`, or the long form with
/// child elements up to its closing tag.
fn parse_item(cursor: &mut Cursor<'_>) -> Result<Option<SourceFile>> {
    let Some(caps) = cursor.accept_pattern(r#"    <(\w+) Include="(.+?)"( />|>)"#)? else {
        return Ok(None);
    };
    let [tag, name, end] = [&caps[0], &caps[1], &caps[2]];

    let action: BuildAction = tag.parse().map_err(|e| cursor.model(e))?;
    let mut file = SourceFile::new(tokens::to_unix(name)).with_action(action);
    if end == " />" {
        return Ok(Some(file));
    }

    let close = format!("    </{tag}>");
    let child = r"      <(\w+)>(.*)</(\w+)>";
    while !cursor.accept(&close) {
        let caps = cursor.expect_pattern(child)?;
        if caps[0] != caps[2] {
            return Err(cursor.mismatch(format!("</{}>", caps[0])));
        }
        match caps[0].as_str() {
            "DependentUpon" => file.depends_on = Some(caps[1].clone()),
            "SubType" => file.subtype = Some(caps[1].clone()),
            _ => {}
        }
    }
    Ok(Some(file))
}
