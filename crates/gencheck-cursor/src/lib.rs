//! The shared primitive every grammar is built from.
//!
//! An [`Artifact`] is an immutable sequence of lines loaded from one generated
//! file. A [`Cursor`] walks it forward exactly once: each expectation either
//! consumes the current line or fails with a [`GrammarError`] that carries the
//! artifact path, the line number and the expected and actual text.
//!
//! Optional expectations (`accept`, `accept_pattern`) are the only way to
//! express repetition: loop while they keep matching.

mod artifact;
mod cursor;
mod error;

pub use artifact::Artifact;
pub use cursor::Cursor;
pub use error::{GrammarError, Result, END_OF_FILE};
