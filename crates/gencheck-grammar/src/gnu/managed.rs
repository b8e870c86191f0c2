//! Package makefiles for C# packages.

use gencheck_cursor::{Cursor, Result};
use gencheck_model::{BuildAction, BuildFlag, Configuration, Kind, Package, SourceFile};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::tokens;

static DEFINE_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r"/d:([A-Za-z0-9_]+)").unwrap());
static LIBPATH_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r#"/lib:"([^"]*)""#).unwrap());
static REFERENCE_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r"/r:(\S+)").unwrap());

const FILE_LINE: &str = r"\t(.+?) \\";

pub(super) fn parse(package: &mut Package, cursor: &mut Cursor<'_>) -> Result<()> {
    let compiler = cursor.expect_capture("CSC = ([a-z]+)")?;
    let resource_compiler = cursor.expect_capture("RESGEN = ([a-z]+)")?;
    if resource_compiler_for(&compiler) != Some(resource_compiler.as_str()) {
        return Err(cursor.tool_pairing(&compiler, &resource_compiler));
    }
    package.compiler = Some(compiler);
    cursor.expect("")?;

    let obj_dir = cursor.expect_capture("OBJDIR = (.+)")?;
    cursor.expect("")?;

    for config in package.configurations_mut() {
        config.obj_dir = obj_dir.clone();
        parse_configuration(config, cursor)?;
    }

    parse_file_block(package, cursor, "SOURCES", BuildAction::Compile)?;
    parse_file_block(package, cursor, "EMBEDDEDFILES", BuildAction::EmbeddedResource)?;
    expect_restatement(package, cursor, "EMBEDDEDCOMMAND", "/resource:", BuildAction::EmbeddedResource)?;
    parse_file_block(package, cursor, "LINKEDFILES", BuildAction::Linked)?;
    expect_restatement(package, cursor, "LINKEDCOMMAND", "/linkresource:", BuildAction::Linked)?;
    parse_file_block(package, cursor, "CONTENTFILES", BuildAction::Content)?;

    cursor.expect("COMPILECOMMAND = $(SOURCES) $(EMBEDDEDCOMMAND) $(LINKEDCOMMAND)")?;
    cursor.expect("")?;
    cursor.expect(".PHONY: clean")?;
    cursor.expect("")?;

    cursor.expect("all: \\")?;
    cursor.expect("\t$(OUTDIR)/$(TARGET) \\")?;
    for file in package.files_with_action(BuildAction::Content) {
        cursor.expect(&format!("\t$(BINDIR)/{} \\", file.basename()))?;
    }
    cursor.expect("")?;

    cursor.expect("$(OUTDIR)/$(TARGET): $(SOURCES) $(EMBEDDEDFILES) $(LINKEDFILES) $(DEPS)")?;
    cursor.expect("\t-@if [ ! -d $(OUTDIR) ]; then mkdir -p $(OUTDIR); fi")?;

    let token = cursor.expect_capture(
        r"\t@\$\(CSC\) /nologo /out:\$@ /t:([a-z]+) /lib:\$\(BINDIR\) \$\(FLAGS\) \$\(COMPILECOMMAND\)",
    )?;
    if let Some(kind) = package.kind {
        if target_token(kind) != Some(token.as_str()) {
            return Err(cursor.kind_token(kind, &token));
        }
    }
    cursor.expect("")?;

    for action in [BuildAction::Linked, BuildAction::Content] {
        for file in package.files_with_action(action) {
            cursor.expect(&format!("$(BINDIR)/{}: {}", file.basename(), file.name))?;
            cursor.expect("\t-@cp -fR $^ $@")?;
            cursor.expect("")?;
        }
    }

    cursor.expect("clean:")?;
    cursor.expect(&format!("\t@echo Cleaning {}", package.name))?;
    cursor.expect("\t-@rm -f $(OUTDIR)/$(TARGET)")?;
    cursor.expect("\t-@rm -fR $(OBJDIR)")
}

/// The only resource compiler each known compiler may be paired with.
fn resource_compiler_for(compiler: &str) -> Option<&'static str> {
    match compiler {
        "csc" | "cscc" => Some("resgen"),
        "mcs" => Some("monoresgen"),
        _ => None,
    }
}

/// The `/t:` token a package kind compiles with.
fn target_token(kind: Kind) -> Option<&'static str> {
    match kind {
        Kind::Exe => Some("exe"),
        Kind::WinExe => Some("winexe"),
        Kind::Dll | Kind::AspNet => Some("library"),
        Kind::Lib => None,
    }
}

fn parse_configuration(config: &mut Configuration, cursor: &mut Cursor<'_>) -> Result<()> {
    cursor.expect(&format!("ifeq ($(CONFIG),{})", config.name))?;

    config.bin_dir = cursor.expect_capture("  BINDIR = (.+)")?;
    config.out_dir = cursor.expect_capture("  OUTDIR = (.+)")?;

    let flags = cursor.expect_capture(r"  FLAGS \+=(.*)")?;
    apply_flags(config, &flags);

    config.link_deps = tokens::words(&cursor.expect_capture("  DEPS =(.*)")?);

    let target = cursor.expect_capture("  TARGET = (.+)")?;
    config.target = tokens::without_extension(&target);

    cursor.expect("endif")?;
    cursor.expect("")?;

    tracing::debug!(
        configuration = %config.name,
        flags = config.build_flags.len(),
        "recovered managed configuration"
    );
    Ok(())
}

fn apply_flags(config: &mut Configuration, text: &str) {
    let mut symbols = false;
    let mut options = Vec::new();

    for token in text.split_whitespace() {
        let flag = match token {
            "/debug" => {
                symbols = true;
                continue;
            }
            "/warnaserror" => BuildFlag::FatalWarnings,
            "/o" => BuildFlag::Optimize,
            "/unsafe" => BuildFlag::Unsafe,
            other => {
                if !is_extracted(other) {
                    options.push(other);
                }
                continue;
            }
        };
        config.build_flags.insert(flag);
    }

    if !symbols {
        config.build_flags.insert(BuildFlag::NoSymbols);
    }
    config.build_options = options.join(" ");

    config.defines = captures(&DEFINE_ARG, text);
    config.lib_paths = captures(&LIBPATH_ARG, text);
    config.links = captures(&REFERENCE_ARG, text);
}

fn is_extracted(token: &str) -> bool {
    token.starts_with("/d:") || token.starts_with("/lib:") || token.starts_with("/r:")
}

fn captures(regex: &Regex, text: &str) -> Vec<String> {
    regex
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

fn parse_file_block(
    package: &mut Package,
    cursor: &mut Cursor<'_>,
    block: &str,
    action: BuildAction,
) -> Result<()> {
    cursor.expect(&format!("{} = \\", block))?;
    while let Some(line) = cursor.accept_pattern(FILE_LINE)? {
        let file = SourceFile::new(line[0].as_str()).with_action(action);
        package.add_file(file).map_err(|e| cursor.model(e))?;
    }
    cursor.expect("")
}

/// A block that restates every file of one action, in recorded order.
fn expect_restatement(
    package: &Package,
    cursor: &mut Cursor<'_>,
    block: &str,
    prefix: &str,
    action: BuildAction,
) -> Result<()> {
    cursor.expect(&format!("{} = \\", block))?;
    for file in package.files_with_action(action) {
        cursor.expect(&format!("\t{}{} \\", prefix, file.name))?;
    }
    cursor.expect("")
}
