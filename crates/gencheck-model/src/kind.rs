use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// The artifact type a package produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Console executable.
    Exe,
    /// Windowed executable.
    WinExe,
    /// Shared library.
    Dll,
    /// Static library.
    Lib,
    /// Web application.
    AspNet,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Exe => "exe",
            Kind::WinExe => "winexe",
            Kind::Dll => "dll",
            Kind::Lib => "lib",
            Kind::AspNet => "aspnet",
        }
    }
}

impl FromStr for Kind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exe" => Ok(Kind::Exe),
            "winexe" => Ok(Kind::WinExe),
            "dll" => Ok(Kind::Dll),
            "lib" => Ok(Kind::Lib),
            "aspnet" => Ok(Kind::AspNet),
            other => Err(ModelError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host language of a managed package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedLanguage {
    CSharp,
}

/// The language family of a package.
///
/// Tokens: `c` and `c++` are both native; `c#` is managed C#.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    Native,
    Managed(ManagedLanguage),
}

impl FromStr for Language {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" | "c++" | "native" => Ok(Language::Native),
            "c#" | "csharp" => Ok(Language::Managed(ManagedLanguage::CSharp)),
            _ => Err(ModelError::UnknownLanguage(s.to_string())),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Native => f.write_str("native"),
            Language::Managed(ManagedLanguage::CSharp) => f.write_str("c#"),
        }
    }
}
