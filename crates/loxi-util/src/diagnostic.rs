//! Diagnostic module - Error reporting infrastructure.
//!
//! This module provides the diagnostic model shared by the scanner, the
//! parser, and the driver. Diagnostics are collected by a [`Handler`] and
//! written out by the driver once a phase completes, so a phase can keep
//! going after the first error and surface everything it found.
//!
//! # Examples
//!
//! ```
//! use loxi_util::diagnostic::{Diagnostic, Handler};
//! use loxi_util::span::Span;
//!
//! let handler = Handler::new();
//! handler.report(Diagnostic::error("Unexpected character: $", Span::new(3, 4, 1)));
//!
//! assert!(handler.has_errors());
//! assert_eq!(handler.error_count(), 1);
//! ```

use crate::span::Span;
use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity level
///
/// # Examples
///
/// ```
/// use loxi_util::diagnostic::Level;
///
/// assert_eq!(format!("{}", Level::Error), "Error");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that makes the invocation fail
    Error,
    /// A warning that does not affect the exit code
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "Error"),
            Level::Warning => write!(f, "Warning"),
        }
    }
}

/// Where in the input a diagnostic points, beyond its line.
///
/// The rendered form differs between phases: lexical errors point at raw
/// source, parse errors quote the offending token or say `at end` when the
/// parser ran out of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorAt {
    /// Raw source position; renders as `[line N] Error: message`
    Source,
    /// A concrete token; renders as `[line N] Error at 'lexeme': message`
    Token(String),
    /// End of the token stream; renders as `[line N] Error at end: message`
    End,
}

/// A diagnostic message with severity and location
///
/// # Examples
///
/// ```
/// use loxi_util::diagnostic::Diagnostic;
/// use loxi_util::span::Span;
///
/// let diag = Diagnostic::error("Expect expression.", Span::new(0, 1, 2)).at_token(")");
/// assert_eq!(diag.to_string(), "[line 2] Error at ')': Expect expression.");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Diagnostic severity level
    pub level: Level,
    /// Main diagnostic message
    pub message: String,
    /// Source location
    pub span: Span,
    /// What the diagnostic points at
    pub at: ErrorAt,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            at: ErrorAt::Source,
        }
    }

    /// Create an error diagnostic pointing at raw source
    ///
    /// # Examples
    ///
    /// ```
    /// use loxi_util::diagnostic::Diagnostic;
    /// use loxi_util::span::Span;
    ///
    /// let diag = Diagnostic::error("Unterminated string.", Span::DUMMY);
    /// assert_eq!(diag.to_string(), "[line 1] Error: Unterminated string.");
    /// ```
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// Point the diagnostic at a concrete token's lexeme
    pub fn at_token(mut self, lexeme: impl Into<String>) -> Self {
        self.at = ErrorAt::Token(lexeme.into());
        self
    }

    /// Point the diagnostic at the end of input
    pub fn at_end(mut self) -> Self {
        self.at = ErrorAt::End;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.at {
            ErrorAt::Source => {
                write!(f, "[line {}] {}: {}", self.span.line, self.level, self.message)
            }
            ErrorAt::Token(lexeme) => write!(
                f,
                "[line {}] {} at '{}': {}",
                self.span.line, self.level, lexeme, self.message
            ),
            ErrorAt::End => write!(
                f,
                "[line {}] {} at end: {}",
                self.span.line, self.level, self.message
            ),
        }
    }
}

/// Handler for collecting diagnostics
///
/// The handler is shared by reference between pipeline phases, so it takes
/// `&self` and keeps its storage behind a `RefCell`.
///
/// # Examples
///
/// ```
/// use loxi_util::diagnostic::{Diagnostic, Handler};
/// use loxi_util::span::Span;
///
/// let handler = Handler::new();
/// assert!(!handler.has_errors());
///
/// handler.report(Diagnostic::error("Expect ';' after value.", Span::DUMMY));
/// assert_eq!(handler.error_count(), 1);
/// ```
pub struct Handler {
    /// Collected diagnostics, in report order
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new handler
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Record a diagnostic
    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Check if any errors have been reported
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Get the number of errors
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Get all diagnostics in report order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Clear all diagnostics
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}
