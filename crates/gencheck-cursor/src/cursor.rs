use std::sync::{Mutex, PoisonError};

use gencheck_model::ModelError;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::{Artifact, GrammarError, Result, END_OF_FILE};

/// A forward-only position within an [`Artifact`].
///
/// Every expectation looks at the current line only. A successful match
/// consumes the line; a failed optional match leaves it for the next
/// expectation; a failed required match is a hard error.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    artifact: &'a Artifact,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(artifact: &'a Artifact) -> Self {
        Self {
            artifact,
            position: 0,
        }
    }

    pub fn artifact(&self) -> &'a Artifact {
        self.artifact
    }

    /// Index (0-based) of the line the next expectation will look at.
    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-based number of the line most recently consumed.
    pub fn consumed_line(&self) -> usize {
        self.position.max(1)
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.artifact.line(self.position)
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.artifact.len()
    }

    /// Require the current line to equal `literal`.
    pub fn expect(&mut self, literal: &str) -> Result<()> {
        if self.accept(literal) {
            Ok(())
        } else {
            Err(self.mismatch(literal))
        }
    }

    /// Consume the current line if it equals `literal`.
    pub fn accept(&mut self, literal: &str) -> bool {
        match self.peek() {
            Some(line) if line == literal => {
                self.advance(line);
                true
            }
            _ => false,
        }
    }

    /// Require the current line to match `pattern` in full and return the
    /// captured groups in order (empty when the pattern has none).
    pub fn expect_pattern(&mut self, pattern: &str) -> Result<Vec<String>> {
        match self.accept_pattern(pattern)? {
            Some(captures) => Ok(captures),
            None => Err(self.mismatch(pattern)),
        }
    }

    /// Consume the current line if it matches `pattern` in full.
    ///
    /// Only an invalid pattern is an error; no match (including end of
    /// input) yields `Ok(None)` and leaves the cursor in place.
    pub fn accept_pattern(&mut self, pattern: &str) -> Result<Option<Vec<String>>> {
        let regex = compile(pattern)?;
        let Some(line) = self.peek() else {
            return Ok(None);
        };

        let Some(captures) = regex.captures(line) else {
            return Ok(None);
        };

        let groups = captures
            .iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();

        self.advance(line);
        Ok(Some(groups))
    }

    /// Require a single captured group.
    pub fn expect_capture(&mut self, pattern: &str) -> Result<String> {
        let mut captures = self.expect_pattern(pattern)?;
        Ok(if captures.is_empty() {
            String::new()
        } else {
            captures.swap_remove(0)
        })
    }

    /// A mismatch at the current line.
    pub fn mismatch(&self, expected: impl Into<String>) -> GrammarError {
        GrammarError::GrammarMismatch {
            path: self.artifact.path().to_path_buf(),
            line: self.position + 1,
            expected: expected.into(),
            actual: self.peek().unwrap_or(END_OF_FILE).to_string(),
        }
    }

    pub fn tool_pairing(&self, compiler: &str, resource_compiler: &str) -> GrammarError {
        GrammarError::InconsistentToolPairing {
            path: self.artifact.path().to_path_buf(),
            line: self.consumed_line(),
            compiler: compiler.to_string(),
            resource_compiler: resource_compiler.to_string(),
        }
    }

    pub fn kind_token(&self, kind: impl ToString, token: &str) -> GrammarError {
        GrammarError::InconsistentKindToken {
            path: self.artifact.path().to_path_buf(),
            line: self.consumed_line(),
            kind: kind.to_string(),
            token: token.to_string(),
        }
    }

    pub fn unsupported_language(&self, token: &str) -> GrammarError {
        GrammarError::UnsupportedLanguage {
            path: self.artifact.path().to_path_buf(),
            line: self.consumed_line(),
            token: token.to_string(),
        }
    }

    pub fn unresolved(&self, reference: &str) -> GrammarError {
        GrammarError::UnresolvedReference {
            path: self.artifact.path().to_path_buf(),
            line: self.consumed_line(),
            reference: reference.to_string(),
        }
    }

    /// Attach the location of the last consumed line to a model error.
    pub fn model(&self, source: ModelError) -> GrammarError {
        GrammarError::Model {
            path: self.artifact.path().to_path_buf(),
            line: self.consumed_line(),
            source,
        }
    }

    fn advance(&mut self, line: &str) {
        tracing::trace!(line = self.position + 1, text = line, "matched");
        self.position += 1;
    }
}

/// Anchored regexes by source pattern. Grammars match the same few patterns
/// on every line of a loop.
static PATTERNS: Lazy<Mutex<FxHashMap<String, Regex>>> = Lazy::new(Default::default);

fn compile(pattern: &str) -> Result<Regex> {
    let mut patterns = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(regex) = patterns.get(pattern) {
        return Ok(regex.clone());
    }

    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| GrammarError::BadPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    patterns.insert(pattern.to_string(), regex.clone());
    Ok(regex)
}
