//! Error types for gencheck-model.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Invariant violations and unrecognized vocabulary tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A configuration name was declared twice.
    #[error("duplicate configuration '{0}'")]
    DuplicateConfiguration(String),

    /// A file name appears twice within one package.
    #[error("duplicate file '{file}' in package '{package}'")]
    DuplicateFile { package: String, file: String },

    /// Token is not one of exe, winexe, dll, lib, aspnet.
    #[error("unknown package kind '{0}'")]
    UnknownKind(String),

    /// Token is not a recognized build action.
    #[error("unknown build action '{0}'")]
    UnknownBuildAction(String),

    /// Token is not a recognized language.
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
}
