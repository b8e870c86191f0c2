//! Error types for gencheck-driver.

use std::path::PathBuf;

use gencheck_compare::CompareError;
use gencheck_cursor::GrammarError;
use miette::Diagnostic;
use thiserror::Error;

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

/// Failures of a scenario run.
#[derive(Error, Debug, Diagnostic)]
pub enum DriverError {
    /// Failed to read a scenario file.
    #[error("failed to read scenario {}", path.display())]
    #[diagnostic(code(gencheck::driver::read_scenario))]
    ReadScenario {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a scenario file.
    #[error("failed to parse scenario {}", path.display())]
    #[diagnostic(code(gencheck::driver::parse_scenario))]
    ParseScenario {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No grammar has this identifier.
    #[error("unknown target '{target}'")]
    #[diagnostic(code(gencheck::driver::target))]
    UnknownTarget {
        target: String,
        #[help]
        known: String,
    },

    /// The generator could not be started.
    #[error("failed to run generator '{program}'")]
    #[diagnostic(code(gencheck::driver::spawn))]
    GeneratorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The generator ran and exited unsuccessfully.
    #[error("generator '{program}' exited with {status}")]
    #[diagnostic(code(gencheck::driver::generator), help("generator stderr:\n{stderr}"))]
    GeneratorFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Compare(#[from] CompareError),
}

impl DriverError {
    pub fn unknown_target(target: &str) -> Self {
        DriverError::UnknownTarget {
            target: target.to_string(),
            known: format!("known targets: {}", gencheck_grammar::IDENTIFIERS.join(", ")),
        }
    }
}
