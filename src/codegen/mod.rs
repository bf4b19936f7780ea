//! Code generation for the pseudocode
//!
//! This module provides the Python code generator, its options, and the
//! map from generated lines back to the pseudocode.

mod line_map;
mod python;
mod rewrite;

pub use line_map::{Compiled, LineMap, LineMapping};
pub use python::PythonGenerator;
pub use rewrite::{rewrite_line, translate_condition, translate_expression, translate_operators};

use serde::{Deserialize, Serialize};

use crate::parser::Program;

/// Trait for code generators
pub trait CodeGenerator {
    /// Generate code from the parsed program
    fn generate(&mut self, program: &Program) -> String;

    /// Get the file extension for the target language
    fn file_extension(&self) -> &'static str;

    /// Get the name of the target language
    fn language_name(&self) -> &'static str;
}

/// Options of a single compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Iterations one loop may run before the generated program aborts
    pub max_iterations: u32,
}

impl CompileOptions {
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { max_iterations: 1000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        assert_eq!(CompileOptions::default().max_iterations, 1000);
        assert_eq!(CompileOptions::default().with_max_iterations(50).max_iterations, 50);
    }

    #[test]
    fn test_options_deserialize() {
        let options: CompileOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CompileOptions::default());

        let options: CompileOptions = serde_json::from_str(r#"{"max_iterations": 10}"#).unwrap();
        assert_eq!(options.max_iterations, 10);
    }

    #[test]
    fn test_generator_metadata() {
        let generator = PythonGenerator::new();
        assert_eq!(generator.file_extension(), "py");
        assert_eq!(generator.language_name(), "Python");
    }
}
