//! Static analysis of pseudocode source
//!
//! The validator checks raw source before translation and reports
//! localized diagnostics.

mod messages;
mod validator;

pub use messages::{summary, DiagnosticKind, Locale};
pub use validator::Validator;
