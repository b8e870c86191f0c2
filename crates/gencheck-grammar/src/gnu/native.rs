//! Package makefiles for C and C++ packages.

use gencheck_cursor::{Cursor, Result};
use gencheck_model::{BuildFlag, Configuration, Kind, Package, SourceFile};

use crate::tokens;

pub(super) fn parse(package: &mut Package, cursor: &mut Cursor<'_>) -> Result<()> {
    let mut bundle = false;
    for config in package.configurations_mut() {
        bundle = parse_configuration(config, cursor)?;
    }

    cursor.expect("OBJECTS = \\")?;
    while cursor
        .accept_pattern(r"\t\$\(OBJDIR\)/(.+?) \\")?
        .is_some()
    {}
    cursor.expect("")?;

    cursor.expect(".PHONY: clean")?;
    cursor.expect("")?;

    if bundle {
        cursor.expect("all: $(BINDIR)/$(MACAPP).app/Contents/PkgInfo $(BINDIR)/$(MACAPP).app/Contents/Info.plist $(BINDIR)/$(TARGET)")?;
        cursor.expect("")?;
    }

    cursor.expect("$(OUTDIR)/$(TARGET): $(OBJECTS) $(LDDEPS)")?;
    cursor.expect(&format!("\t@echo Linking {}", package.name))?;
    cursor.expect("\t-@if [ ! -d $(BINDIR) ]; then mkdir -p $(BINDIR); fi")?;
    cursor.expect("\t-@if [ ! -d $(LIBDIR) ]; then mkdir -p $(LIBDIR); fi")?;
    if bundle {
        cursor.expect("\t-@if [ ! -d $(BINDIR)/$(MACAPP).app/Contents/MacOS ]; then mkdir -p $(BINDIR)/$(MACAPP).app/Contents/MacOS; fi")?;
    }

    if package.kind == Some(Kind::Lib) {
        cursor.expect("\t@ar -cr $@ $^")?;
        cursor.expect("\t@ranlib $@")?;
    } else {
        cursor.expect("\t@$(CXX) -o $@ $(OBJECTS) $(LDFLAGS)")?;
    }
    cursor.expect("")?;

    if bundle {
        cursor.expect("$(BINDIR)/$(MACAPP).app/Contents/PkgInfo:")?;
        cursor.expect("")?;
        cursor.expect("$(BINDIR)/$(MACAPP).app/Contents/Info.plist:")?;
        cursor.expect("")?;
    }

    cursor.expect("clean:")?;
    cursor.expect(&format!("\t@echo Cleaning {}", package.name))?;
    if bundle {
        cursor.expect("\t-@rm -rf $(OUTDIR)/$(MACAPP).app $(OBJDIR)/*")?;
    } else {
        cursor.expect("\t-@rm -rf $(OUTDIR)/$(TARGET) $(OBJDIR)/*")?;
    }
    cursor.expect("")?;

    while let Some(rule) = cursor.accept_pattern(r"\$\(OBJDIR\)/(.+)[.]o: (.+)")? {
        let source = &rule[1];
        package
            .add_file(SourceFile::new(source.as_str()))
            .map_err(|e| cursor.model(e))?;

        cursor.expect("\t-@if [ ! -d $(OBJDIR) ]; then mkdir -p $(OBJDIR); fi")?;
        cursor.expect("\t@echo $(notdir $<)")?;
        cursor.expect(compile_command(source))?;
        cursor.expect("")?;
    }

    cursor.expect("-include $(OBJECTS:%.o=%.d)")
}

fn parse_configuration(config: &mut Configuration, cursor: &mut Cursor<'_>) -> Result<bool> {
    cursor.expect(&format!("ifeq ($(CONFIG),{})", config.name))?;

    config.bin_dir = cursor.expect_capture("  BINDIR = (.+)")?;
    config.lib_dir = cursor.expect_capture("  LIBDIR = (.+)")?;
    config.obj_dir = cursor.expect_capture("  OBJDIR = (.+)")?;
    config.out_dir = cursor.expect_capture("  OUTDIR = (.+)")?;

    let cppflags = cursor.expect_capture("  CPPFLAGS =(.*)")?;
    config.defines = tokens::define_args(&cppflags);
    config.include_paths = tokens::include_args(&cppflags);

    let cflags = cursor.expect_capture(r"  CFLAGS \+= \$\(CPPFLAGS\)(.*)")?;
    apply_compile_flags(config, &cflags);

    let cxxflags = cursor.expect_capture(r"  CXXFLAGS = \$\(CFLAGS\)(.*)")?;
    for token in cxxflags.split_whitespace() {
        match token {
            "--no-exceptions" => {
                config.build_flags.insert(BuildFlag::NoExceptions);
            }
            "--no-rtti" => {
                config.build_flags.insert(BuildFlag::NoRtti);
            }
            _ => {}
        }
    }

    let ldflags = cursor.expect_capture(r"  LDFLAGS \+= -L\$\(BINDIR\) -L\$\(LIBDIR\)(.*)")?;
    apply_link_flags(config, &ldflags);

    config.link_deps = tokens::words(&cursor.expect_capture("  LDDEPS =(.*)")?);
    config.target = cursor.expect_capture("  TARGET = (.+)")?;

    let bundle = cursor.accept(&format!("  MACAPP = {}", tokens::basename(&config.target)));

    cursor.expect("endif")?;
    cursor.expect("")?;

    tracing::debug!(
        configuration = %config.name,
        flags = config.build_flags.len(),
        bundle,
        "recovered native configuration"
    );
    Ok(bundle)
}

/// Map compile flags onto semantic flags; anything unrecognized is kept as a
/// raw option. A missing `-g` means the build carries no symbols.
fn apply_compile_flags(config: &mut Configuration, text: &str) {
    let mut symbols = false;
    let mut options = Vec::new();

    for token in text.split_whitespace() {
        let flag = match token {
            "-g" => {
                symbols = true;
                continue;
            }
            "-fomit-frame-pointer" => BuildFlag::NoFramePointer,
            "-O2" => BuildFlag::Optimize,
            "-O3" => BuildFlag::OptimizeSpeed,
            "-Os" => BuildFlag::OptimizeSize,
            "-Wall" => BuildFlag::ExtraWarnings,
            "-Werror" => BuildFlag::FatalWarnings,
            other => {
                options.push(other);
                continue;
            }
        };
        config.build_flags.insert(flag);
    }

    if !symbols {
        config.build_flags.insert(BuildFlag::NoSymbols);
    }
    config.build_options = options.join(" ");
}

/// Split the link line into search paths, libraries and the raw options that
/// precede the first `-L`/`-l` token. `-dynamiclib` stays in the raw options;
/// a leading `-s` strip marker is peeled off into `no-symbols`.
fn apply_link_flags(config: &mut Configuration, text: &str) {
    config.lib_paths = tokens::libpath_args(text);
    config.links = tokens::link_args(text);
    if text.split_whitespace().any(|t| t == "-dynamiclib") {
        config.build_flags.insert(BuildFlag::Dylib);
    }

    let mut leftover: Vec<&str> = text
        .split_whitespace()
        .take_while(|t| !t.starts_with("-L") && !t.starts_with("-l"))
        .collect();
    if leftover.first() == Some(&"-s") {
        leftover.remove(0);
        config.build_flags.insert(BuildFlag::NoSymbols);
    }
    config.link_options = leftover.join(" ");
}

fn compile_command(source: &str) -> &'static str {
    match tokens::extension(source) {
        ".c" => "\t@$(CC) $(CFLAGS) -o $@ -c $<",
        ".s" => "\t@$(CC) -x assembler-with-cpp $(CPPFLAGS) -o $@ -c $<",
        _ => "\t@$(CXX) $(CXXFLAGS) -o $@ -c $<",
    }
}
