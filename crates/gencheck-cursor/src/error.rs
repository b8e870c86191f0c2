//! Error types for grammar failures.

use std::path::PathBuf;

use gencheck_model::ModelError;
use miette::Diagnostic;
use thiserror::Error;

/// Result type for cursor and grammar operations.
pub type Result<T> = std::result::Result<T, GrammarError>;

/// Text reported as the actual line when input ran out.
pub const END_OF_FILE: &str = "<end of file>";

/// A generated artifact did not have the shape a grammar requires.
///
/// There is no recovery: the first failure aborts the parse of the artifact.
#[derive(Error, Debug, Diagnostic)]
pub enum GrammarError {
    #[error("artifact not found: {}", path.display())]
    #[diagnostic(
        code(gencheck::grammar::not_found),
        help("the generator did not write this file; check the target and project name")
    )]
    NotFound { path: PathBuf },

    #[error("failed to read {}", path.display())]
    #[diagnostic(code(gencheck::grammar::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: expected {expected:?}, found {actual:?}", path.display())]
    #[diagnostic(
        code(gencheck::grammar::mismatch),
        help("the generator output changed or the grammar is stale")
    )]
    GrammarMismatch {
        path: PathBuf,
        line: usize,
        expected: String,
        actual: String,
    },

    #[error(
        "{}:{line}: compiler '{compiler}' cannot be paired with resource compiler '{resource_compiler}'",
        path.display()
    )]
    #[diagnostic(code(gencheck::grammar::tool_pairing))]
    InconsistentToolPairing {
        path: PathBuf,
        line: usize,
        compiler: String,
        resource_compiler: String,
    },

    #[error("{}:{line}: target token '{token}' does not agree with package kind '{kind}'", path.display())]
    #[diagnostic(code(gencheck::grammar::kind_token))]
    InconsistentKindToken {
        path: PathBuf,
        line: usize,
        kind: String,
        token: String,
    },

    #[error("{}:{line}: unsupported language '{token}'", path.display())]
    #[diagnostic(code(gencheck::grammar::language))]
    UnsupportedLanguage {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{}:{line}: reference '{reference}' does not name anything in this project", path.display())]
    #[diagnostic(code(gencheck::grammar::reference))]
    UnresolvedReference {
        path: PathBuf,
        line: usize,
        reference: String,
    },

    #[error("{}:{line}: {source}", path.display())]
    #[diagnostic(code(gencheck::grammar::model))]
    Model {
        path: PathBuf,
        line: usize,
        #[source]
        source: ModelError,
    },

    #[error("invalid pattern {pattern:?}")]
    #[diagnostic(code(gencheck::grammar::pattern))]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl GrammarError {
    /// Line number (1-based) the failure refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            GrammarError::GrammarMismatch { line, .. }
            | GrammarError::InconsistentToolPairing { line, .. }
            | GrammarError::InconsistentKindToken { line, .. }
            | GrammarError::UnsupportedLanguage { line, .. }
            | GrammarError::UnresolvedReference { line, .. }
            | GrammarError::Model { line, .. } => Some(*line),
            GrammarError::NotFound { .. }
            | GrammarError::Read { .. }
            | GrammarError::BadPattern { .. } => None,
        }
    }
}
