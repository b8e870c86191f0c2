//! Comparator failures.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for comparisons.
pub type Result<T> = std::result::Result<T, CompareError>;

/// The actual model does not satisfy the expectation.
#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum CompareError {
    #[error("{collection}: expected {expected} entries, found {actual}")]
    #[diagnostic(code(gencheck::compare::count))]
    CountMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    #[error("{field}: expected {expected}, found {actual}")]
    #[diagnostic(code(gencheck::compare::field))]
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("{field}: no file named {name:?}; package has [{}]", actual_names.join(", "))]
    #[diagnostic(
        code(gencheck::compare::missing_file),
        help("files are matched by name exactly as the artifact spells them")
    )]
    MissingFile {
        field: String,
        name: String,
        actual_names: Vec<String>,
    },

    #[error("{field}: file {name:?} is expected more than once")]
    #[diagnostic(
        code(gencheck::compare::duplicate_file),
        help("a package holds each file name once; list every file a single time")
    )]
    DuplicateFile { field: String, name: String },
}

impl CompareError {
    /// Dotted path of the collection or field that failed.
    pub fn field(&self) -> &str {
        match self {
            CompareError::CountMismatch { collection, .. } => collection,
            CompareError::FieldMismatch { field, .. }
            | CompareError::MissingFile { field, .. }
            | CompareError::DuplicateFile { field, .. } => field,
        }
    }
}
