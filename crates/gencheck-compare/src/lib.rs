//! Structural comparison of a recovered [`Project`](gencheck_model::Project)
//! against a sparse expectation.
//!
//! An expectation names only the facts a scenario cares about. Unset fields
//! are not checked, and an empty collection matches any actual collection.

mod compare;
mod error;
mod expect;

pub use compare::compare;
pub use error::{CompareError, Result};
pub use expect::{ExpectedConfiguration, ExpectedFile, ExpectedPackage, ExpectedProject};
