//! Error handling for AlgoFX
//!
//! Two tiers: hard failures of the translator ([`AlgofxError`]) and
//! user-facing validator findings ([`Diagnostic`]), which are plain data.

mod diagnostic;

use serde::Serialize;
use thiserror::Error;

use crate::analysis::{DiagnosticKind, Locale};
use crate::lexer::Keyword;

pub use diagnostic::{format_diagnostic, line_span, print_diagnostics};

/// The main error type for AlgoFX operations
#[derive(Error, Debug)]
pub enum AlgofxError {
    /// One of `algorithme`, `debut`, `fin` does not appear in the source
    #[error("Error: Missing essential algorithm structure (`{keyword}` not found)")]
    MissingStructure { keyword: Keyword },

    /// The validator reported problems, translation was not attempted
    #[error("algorithm rejected with {} diagnostic(s)", diagnostics.len())]
    Rejected { diagnostics: Vec<Diagnostic> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlgofxError {
    pub fn missing_structure(keyword: Keyword) -> Self {
        AlgofxError::MissingStructure { keyword }
    }
}

/// Result type alias for AlgoFX operations
pub type AlgofxResult<T> = Result<T, AlgofxError>;

/// A problem found by the validator, anchored on a source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed (empty for whole-program findings)
    pub text: String,
    pub kind: DiagnosticKind,
    /// Localized message with its placeholder filled in
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        line: usize,
        text: impl Into<String>,
        kind: DiagnosticKind,
        locale: Locale,
        arg: Option<&str>,
    ) -> Self {
        Self {
            line,
            text: text.into(),
            kind,
            message: kind.message(locale, arg),
        }
    }

    /// Stable identifier of the diagnostic kind, e.g. `read_invalid_spacing`
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}
