//! Canonical in-memory model of a generated build.
//!
//! A [`Project`] owns an ordered list of configuration names and an ordered
//! list of [`Package`]s. Every package carries exactly one [`Configuration`]
//! per project configuration, in the same order, so an index into
//! `project.configurations` is also an index into `package.configurations`.
//!
//! The model has no behavior beyond keeping those invariants. Grammars fill it
//! in; the comparator reads it.

mod config;
mod error;
mod file;
mod flags;
mod kind;
mod project;

pub use config::Configuration;
pub use error::{ModelError, Result};
pub use file::{BuildAction, SourceFile};
pub use flags::{BuildFlag, LinkFlag};
pub use kind::{Kind, Language, ManagedLanguage};
pub use project::{Package, Project};
