//! End-to-end tests for the `vs2002`/`vs2003`/`vs2005` grammars.

mod common;

use common::Workspace;
use gencheck_cursor::GrammarError;
use gencheck_model::{BuildAction, BuildFlag, Kind, Language};

const VCPROJ_TOOL: &str = "8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942";
const CSPROJ_TOOL: &str = "FAE04EC0-301F-11D3-BF4B-00C04F79EFBC";
const APP: &str = "11111111-1111-1111-1111-111111111111";
const LIB: &str = "22222222-2222-2222-2222-222222222222";

const CONFIGS: [&str; 2] = ["Debug", "Release"];

const TOOLS_2003: [&str; 13] = [
    "VCCLCompilerTool",
    "VCCustomBuildTool",
    "VCLinkerTool",
    "VCMIDLTool",
    "VCPostBuildEventTool",
    "VCPreBuildEventTool",
    "VCPreLinkEventTool",
    "VCResourceCompilerTool",
    "VCWebServiceProxyGeneratorTool",
    "VCXMLDataGeneratorTool",
    "VCWebDeploymentTool",
    "VCManagedWrapperGeneratorTool",
    "VCAuxiliaryManagedWrapperGeneratorTool",
];

fn solution_2003() -> String {
    let mut text = format!(
        "Microsoft Visual Studio Solution File, Format Version 8.00
Project(\"{{{VCPROJ_TOOL}}}\") = \"App\", \"App.vcproj\", \"{{{APP}}}\"
\tProjectSection(ProjectDependencies) = postProject
\t\t{{{LIB}}} = {{{LIB}}}
\tEndProjectSection
EndProject
Project(\"{{{CSPROJ_TOOL}}}\") = \"Lib\", \"lib\\Lib.csproj\", \"{{{LIB}}}\"
\tProjectSection(ProjectDependencies) = postProject
\tEndProjectSection
EndProject
Global
\tGlobalSection(SolutionConfiguration) = preSolution
\t\tDebug = Debug
\t\tRelease = Release
\tEndGlobalSection
\tGlobalSection(ProjectConfiguration) = postSolution
"
    );
    for (guid, platform) in [(APP, "Win32"), (LIB, ".NET")] {
        for name in CONFIGS {
            text += &format!("\t\t{{{guid}}}.{name}.ActiveCfg = {name}|{platform}\n");
            text += &format!("\t\t{{{guid}}}.{name}.Build.0 = {name}|{platform}\n");
        }
    }
    text += "\tEndGlobalSection
\tGlobalSection(ExtensibilityGlobals) = postSolution
\tEndGlobalSection
\tGlobalSection(ExtensibilityAddIns) = postSolution
\tEndGlobalSection
EndGlobal
";
    text
}

fn vcproj_configuration(name: &str) -> String {
    let (optimization, defines) = match name {
        "Debug" => ("0", "WIN32;_DEBUG"),
        _ => ("3", "WIN32;NDEBUG"),
    };
    let mut text = format!(
        "\t\t<Configuration
\t\t\tName=\"{name}|Win32\"
\t\t\tOutputDirectory=\".\"
\t\t\tIntermediateDirectory=\"obj\\{name}\"
\t\t\tConfigurationType=\"1\"
\t\t\tCharacterSet=\"1\">
"
    );
    for tool in TOOLS_2003 {
        text += &match tool {
            "VCCLCompilerTool" => format!(
                "\t\t\t<Tool
\t\t\t\tName=\"{tool}\"
\t\t\t\tOptimization=\"{optimization}\"
\t\t\t\tPreprocessorDefinitions=\"{defines}\"
\t\t\t\tRuntimeLibrary=\"3\"
\t\t\t\tWarningLevel=\"4\"
\t\t\t\tDebugInformationFormat=\"4\"/>
"
            ),
            "VCLinkerTool" => format!(
                "\t\t\t<Tool
\t\t\t\tName=\"{tool}\"
\t\t\t\tAdditionalDependencies=\"opengl32.lib\"
\t\t\t\tOutputFile=\"$(OutDir)/App.exe\"
\t\t\t\tSubSystem=\"1\"
\t\t\t\tEntryPointSymbol=\"mainCRTStartup\"/>
"
            ),
            _ => format!("\t\t\t<Tool\n\t\t\t\tName=\"{tool}\"/>\n"),
        };
    }
    text += "\t\t</Configuration>\n";
    text
}

fn vcproj_2003() -> String {
    let configs: String = CONFIGS.iter().map(|c| vcproj_configuration(c)).collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"Windows-1252\"?>
<VisualStudioProject
\tProjectType=\"Visual C++\"
\tVersion=\"7.10\"
\tName=\"App\"
\tProjectGUID=\"{{{APP}}}\"
\tKeyword=\"Win32Proj\">
\t<Platforms>
\t\t<Platform
\t\t\tName=\"Win32\"/>
\t</Platforms>
\t<Configurations>
{configs}\t</Configurations>
\t<References>
\t</References>
\t<Files>
\t\t<File
\t\t\tRelativePath=\".\\file0.cpp\">
\t\t</File>
\t\t<Filter
\t\t\tName=\"Support\"
\t\t\tFilter=\"\">
\t\t\t<File
\t\t\t\tRelativePath=\".\\support\\util.cpp\">
\t\t\t</File>
\t\t</Filter>
\t</Files>
\t<Globals>
\t</Globals>
</VisualStudioProject>
"
    )
}

fn csproj_configuration(name: &str) -> String {
    let (symbols, optimize) = match name {
        "Debug" => ("true", "false"),
        _ => ("false", "true"),
    };
    format!(
        "\t\t\t\t<Config
\t\t\t\t\tName = \"{name}\"
\t\t\t\t\tAllowUnsafeBlocks = \"false\"
\t\t\t\t\tDebugSymbols = \"{symbols}\"
\t\t\t\t\tDefineConstants = \"TRACE\"
\t\t\t\t\tOptimize = \"{optimize}\"
\t\t\t\t\tOutputPath = \"bin\\{name}\\\"
\t\t\t\t\tTreatWarningsAsErrors = \"false\"
\t\t\t\t/>
"
    )
}

fn csproj_2003() -> String {
    let configs: String = CONFIGS.iter().map(|c| csproj_configuration(c)).collect();
    format!(
        "<VisualStudioProject>
\t<CSHARP
\t\tProjectType = \"Local\"
\t\tProductVersion = \"7.10.3077\"
\t\tSchemaVersion = \"2.0\"
\t\tProjectGuid = \"{{{LIB}}}\"
\t>
\t\t<Build>
\t\t\t<Settings
\t\t\t\tAssemblyName = \"Lib\"
\t\t\t\tOutputType = \"Library\"
\t\t\t\tRootNamespace = \"Lib\"
\t\t\t>
{configs}\t\t\t</Settings>
\t\t\t<References>
\t\t\t\t<Reference
\t\t\t\t\tName = \"System\"
\t\t\t\t\tAssemblyName = \"System\"
\t\t\t\t/>
\t\t\t</References>
\t\t</Build>
\t\t<Files>
\t\t\t<Include>
\t\t\t\t<File
\t\t\t\t\tRelPath = \"file0.cs\"
\t\t\t\t\tSubType = \"Code\"
\t\t\t\t\tBuildAction = \"Compile\"
\t\t\t\t/>
\t\t\t\t<File
\t\t\t\t\tRelPath = \"file0.resx\"
\t\t\t\t\tDependentUpon = \"file0.cs\"
\t\t\t\t\tBuildAction = \"EmbeddedResource\"
\t\t\t\t/>
\t\t\t</Include>
\t\t</Files>
\t</CSHARP>
</VisualStudioProject>
"
    )
}

fn csproj_user() -> String {
    let configs: String = CONFIGS
        .iter()
        .map(|c| format!("\t\t\t\t<Config\n\t\t\t\t\tName = \"{c}\"\n\t\t\t\t/>\n"))
        .collect();
    format!(
        "<VisualStudioProject>
\t<CSHARP>
\t\t<Build>
\t\t\t<Settings ReferencePath = \"../bin\" >
{configs}\t\t\t</Settings>
\t\t</Build>
\t\t<OtherProjectSettings
\t\t\tProjectTrust = \"0\"
\t\t/>
\t</CSHARP>
</VisualStudioProject>
"
    )
}

fn workspace_2003() -> Workspace {
    let workspace = Workspace::new();
    workspace
        .write("MyProject.sln", &solution_2003())
        .write("App.vcproj", &vcproj_2003())
        .write("lib/Lib.csproj", &csproj_2003())
        .write("lib/Lib.csproj.user", &csproj_user());
    workspace
}

#[test]
fn test_vs2003_native_package() {
    let project = workspace_2003()
        .parse("vs2003", "MyProject")
        .expect("Failed to parse");

    assert_eq!(project.configurations(), CONFIGS);
    let app = &project.packages()[0];
    assert_eq!(app.language, Some(Language::Native));
    assert_eq!(app.kind, Some(Kind::Exe));

    let names: Vec<_> = app.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["file0.cpp", "support/util.cpp"]);

    let debug = &app.configurations()[0];
    assert_eq!(debug.dependencies, ["Lib"]);
    assert_eq!(debug.defines, ["WIN32", "_DEBUG"]);
    assert_eq!(debug.links, ["opengl32"]);
    assert_eq!(debug.target, "App");
    assert!(debug.has_flag(BuildFlag::ExtraWarnings));
    assert!(debug.has_flag(BuildFlag::Unicode));
    assert!(!debug.has_flag(BuildFlag::NoMain));

    let release = &app.configurations()[1];
    assert!(release.has_flag(BuildFlag::Optimize));
}

#[test]
fn test_vs2003_managed_package() {
    let project = workspace_2003()
        .parse("vs2003", "MyProject")
        .expect("Failed to parse");

    let lib = &project.packages()[1];
    assert_eq!(lib.kind, Some(Kind::Dll));
    assert_eq!(lib.path, "lib");

    let resx = lib.file("file0.resx").expect("resource recorded");
    assert_eq!(resx.build_action, Some(BuildAction::EmbeddedResource));
    assert_eq!(resx.depends_on.as_deref(), Some("file0.cs"));

    let debug = &lib.configurations()[0];
    assert_eq!(debug.bin_dir, "../bin");
    assert_eq!(debug.out_dir, "bin/Debug/");
    assert_eq!(debug.links, ["System"]);
    assert!(!debug.has_flag(BuildFlag::NoSymbols));

    let release = &lib.configurations()[1];
    assert!(release.has_flag(BuildFlag::NoSymbols));
    assert!(release.has_flag(BuildFlag::Optimize));
}

/// The project file must name the GUID the solution gave it.
#[test]
fn test_vs2003_guid_mismatch() {
    let workspace = workspace_2003();
    workspace.write(
        "App.vcproj",
        &vcproj_2003().replace(APP, "33333333-3333-3333-3333-333333333333"),
    );
    let err = workspace.parse("vs2003", "MyProject").unwrap_err();
    assert!(matches!(err, GrammarError::GrammarMismatch { line: 6, .. }));
}

#[test]
fn test_vs2003_missing_user_file() {
    let workspace = Workspace::new();
    workspace
        .write("MyProject.sln", &solution_2003())
        .write("App.vcproj", &vcproj_2003())
        .write("lib/Lib.csproj", &csproj_2003());
    let err = workspace.parse("vs2003", "MyProject").unwrap_err();
    assert!(matches!(err, GrammarError::NotFound { .. }));
}

/// Artifacts of one generation do not parse as another.
#[test]
fn test_vs2002_rejects_2003_solution() {
    let err = workspace_2003().parse("vs2002", "MyProject").unwrap_err();
    assert!(matches!(err, GrammarError::GrammarMismatch { line: 1, .. }));
}

fn solution_2005() -> String {
    let mut text = format!(
        "Microsoft Visual Studio Solution File, Format Version 9.00
# Visual Studio 2005
Project(\"{{{CSPROJ_TOOL}}}\") = \"MyPackage\", \"MyPackage.csproj\", \"{{{LIB}}}\"
\tProjectSection(ProjectDependencies) = postProject
\tEndProjectSection
EndProject
Global
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution
\t\tDebug|Any CPU = Debug|Any CPU
\t\tRelease|Any CPU = Release|Any CPU
\tEndGlobalSection
\tGlobalSection(ProjectConfiguration) = postSolution
"
    );
    for name in CONFIGS {
        text += &format!("\t\t{{{LIB}}}.{name}|Any CPU.ActiveCfg = {name}|Any CPU\n");
        text += &format!("\t\t{{{LIB}}}.{name}|Any CPU.Build.0 = {name}|Any CPU\n");
    }
    text += "\tEndGlobalSection
\tGlobalSection(SolutionProperties) = preSolution
\t\tHideSolutionNode = FALSE
\tEndGlobalSection
EndGlobal
";
    text
}

fn msbuild_configuration(name: &str) -> String {
    let symbols = match name {
        "Debug" => "    <DebugSymbols>true</DebugSymbols>\n    <DebugType>full</DebugType>\n    <Optimize>false</Optimize>\n",
        _ => "    <DebugType>pdbonly</DebugType>\n    <Optimize>true</Optimize>\n",
    };
    format!(
        "  <PropertyGroup Condition=\" '$(Configuration)|$(Platform)' == '{name}|AnyCPU' \">
{symbols}    <OutputPath>bin\\{name}\\</OutputPath>
    <DefineConstants>TRACE</DefineConstants>
    <ErrorReport>prompt</ErrorReport>
    <WarningLevel>4</WarningLevel>
  </PropertyGroup>
"
    )
}

fn msbuild() -> String {
    let configs: String = CONFIGS.iter().map(|c| msbuild_configuration(c)).collect();
    format!(
        "<Project DefaultTargets=\"Build\" xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">
  <PropertyGroup>
    <Configuration Condition=\" '$(Configuration)' == '' \">Debug</Configuration>
    <Platform Condition=\" '$(Platform)' == '' \">AnyCPU</Platform>
    <ProductVersion>8.0.50727</ProductVersion>
    <SchemaVersion>2.0</SchemaVersion>
    <ProjectGuid>{{{LIB}}}</ProjectGuid>
    <OutputType>WinExe</OutputType>
    <AppDesignerFolder>Properties</AppDesignerFolder>
    <RootNamespace>MyPackage</RootNamespace>
    <AssemblyName>MyPackage</AssemblyName>
  </PropertyGroup>
{configs}  <ItemGroup>
    <Reference Include=\"System\" />
    <Reference Include=\"System.Windows.Forms\" />
  </ItemGroup>
  <ItemGroup>
    <Compile Include=\"file0.cs\" />
    <EmbeddedResource Include=\"file0.resx\">
      <DependentUpon>file0.cs</DependentUpon>
    </EmbeddedResource>
  </ItemGroup>
  <Import Project=\"$(MSBuildBinPath)\\Microsoft.CSharp.targets\" />
  <!-- To modify your build process, add your task inside one of the targets below and uncomment it. 
       Other similar extension points exist, see Microsoft.Common.targets.
  <Target Name=\"BeforeBuild\">
  </Target>
  <Target Name=\"AfterBuild\">
  </Target>
  -->
</Project>
"
    )
}

/// A resource depending on a source yields two files with distinct actions.
#[test]
fn test_vs2005_dependent_resource() {
    let workspace = Workspace::new();
    workspace
        .write("MyProject.sln", &solution_2005())
        .write("MyPackage.csproj", &msbuild());
    let project = workspace.parse("vs2005", "MyProject").expect("Failed to parse");

    let package = &project.packages()[0];
    assert_eq!(package.kind, Some(Kind::WinExe));
    assert_eq!(package.files().len(), 2);

    let code = package.file("file0.cs").expect("source recorded");
    assert_eq!(code.build_action, Some(BuildAction::Compile));
    assert_eq!(code.depends_on, None);

    let resx = package.file("file0.resx").expect("resource recorded");
    assert_eq!(resx.build_action, Some(BuildAction::EmbeddedResource));
    assert_eq!(resx.depends_on.as_deref(), Some("file0.cs"));

    let debug = &package.configurations()[0];
    assert_eq!(debug.out_dir, "bin/Debug");
    assert_eq!(debug.links, ["System", "System.Windows.Forms"]);
    assert!(package.configurations()[1].has_flag(BuildFlag::NoSymbols));
}

#[test]
fn test_vs2005_is_idempotent() {
    let workspace = Workspace::new();
    workspace
        .write("MyProject.sln", &solution_2005())
        .write("MyPackage.csproj", &msbuild());
    let first = workspace.parse("vs2005", "MyProject").expect("Failed to parse");
    let second = workspace.parse("vs2005", "MyProject").expect("Failed to parse");
    assert_eq!(first, second);
}

/// Managed then native: every selector uses the native platform written
/// last, while each mapping keeps the package's own.
fn mixed_solution_2005() -> String {
    let mut text = format!(
        "Microsoft Visual Studio Solution File, Format Version 9.00
# Visual Studio 2005
Project(\"{{{CSPROJ_TOOL}}}\") = \"MyPackage\", \"MyPackage.csproj\", \"{{{LIB}}}\"
\tProjectSection(ProjectDependencies) = postProject
\tEndProjectSection
EndProject
Project(\"{{{VCPROJ_TOOL}}}\") = \"App\", \"App.vcproj\", \"{{{APP}}}\"
\tProjectSection(ProjectDependencies) = postProject
\tEndProjectSection
EndProject
Global
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution
\t\tDebug|Win32 = Debug|Win32
\t\tRelease|Win32 = Release|Win32
\tEndGlobalSection
\tGlobalSection(ProjectConfiguration) = postSolution
"
    );
    for (guid, platform) in [(LIB, "Any CPU"), (APP, "Win32")] {
        for name in CONFIGS {
            text += &format!("\t\t{{{guid}}}.{name}|Win32.ActiveCfg = {name}|{platform}\n");
            text += &format!("\t\t{{{guid}}}.{name}|Win32.Build.0 = {name}|{platform}\n");
        }
    }
    text += "\tEndGlobalSection
\tGlobalSection(SolutionProperties) = preSolution
\t\tHideSolutionNode = FALSE
\tEndGlobalSection
EndGlobal
";
    text
}

/// The solution and the managed package are accepted; parsing stops at the
/// native project file, which this workspace leaves out.
#[test]
fn test_vs2005_mixed_languages_share_selector_platform() {
    let workspace = Workspace::new();
    workspace
        .write("MyProject.sln", &mixed_solution_2005())
        .write("MyPackage.csproj", &msbuild());

    match workspace.parse("vs2005", "MyProject").unwrap_err() {
        GrammarError::NotFound { path } => assert!(path.ends_with("App.vcproj")),
        other => panic!("unexpected error: {other}"),
    }
}
