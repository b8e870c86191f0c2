use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic build flags recovered from compiler settings.
///
/// Each toolchain only produces a subset of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildFlag {
    Dylib,
    ExtraWarnings,
    FatalWarnings,
    Managed,
    #[serde(rename = "no-64bit-checks")]
    No64BitChecks,
    NoExceptions,
    NoFramePointer,
    NoImportLib,
    NoMain,
    NoRtti,
    NoSymbols,
    Optimize,
    OptimizeSize,
    OptimizeSpeed,
    StaticRuntime,
    Unicode,
    Unsafe,
}

impl BuildFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildFlag::Dylib => "dylib",
            BuildFlag::ExtraWarnings => "extra-warnings",
            BuildFlag::FatalWarnings => "fatal-warnings",
            BuildFlag::Managed => "managed",
            BuildFlag::No64BitChecks => "no-64bit-checks",
            BuildFlag::NoExceptions => "no-exceptions",
            BuildFlag::NoFramePointer => "no-frame-pointer",
            BuildFlag::NoImportLib => "no-import-lib",
            BuildFlag::NoMain => "no-main",
            BuildFlag::NoRtti => "no-rtti",
            BuildFlag::NoSymbols => "no-symbols",
            BuildFlag::Optimize => "optimize",
            BuildFlag::OptimizeSize => "optimize-size",
            BuildFlag::OptimizeSpeed => "optimize-speed",
            BuildFlag::StaticRuntime => "static-runtime",
            BuildFlag::Unicode => "unicode",
            BuildFlag::Unsafe => "unsafe",
        }
    }
}

impl fmt::Display for BuildFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic link flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkFlag {
    StaticRuntime,
}

impl fmt::Display for LinkFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkFlag::StaticRuntime => f.write_str("static-runtime"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_token_agrees_with_serde() {
        let flags = [
            BuildFlag::No64BitChecks,
            BuildFlag::NoFramePointer,
            BuildFlag::OptimizeSpeed,
            BuildFlag::ExtraWarnings,
        ];
        for flag in flags {
            let json = serde_json::to_string(&flag).unwrap();
            assert_eq!(json, format!("\"{}\"", flag));
        }
    }
}
