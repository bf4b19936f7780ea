//! AlgoFX - French algorithmic pseudocode to Python transpiler
//!
//! This crate validates programs written in the French teaching pseudocode
//! (`Algorithme`, `Var`, `Début`, `Si ... Alors`, `Pour ... Faire`, ...)
//! and translates them into runnable Python 3.
//!
//! ```
//! let source = "Algorithme Carre;\nVar\n    x: entier;\nDebut\n    x <- 4 * 4;\n    ecrire(x);\nFin";
//! assert!(algofx::check(source).is_empty());
//! let python = algofx::compile(source).unwrap();
//! assert!(python.contains("print(x)"));
//! ```

pub mod analysis;
pub mod codegen;
pub mod errors;
pub mod lexer;
pub mod parser;

// Re-export commonly used types
pub use analysis::{summary, DiagnosticKind, Locale, Validator};
pub use codegen::{CodeGenerator, CompileOptions, Compiled, LineMap, PythonGenerator};
pub use errors::{AlgofxError, AlgofxResult, Diagnostic};
pub use parser::{Parser, Program};

/// Validate a program, with French messages
pub fn check(source: &str) -> Vec<Diagnostic> {
    check_with_locale(source, Locale::French)
}

/// Validate a program; an empty list means it can be compiled
pub fn check_with_locale(source: &str, locale: Locale) -> Vec<Diagnostic> {
    Validator::new(locale).check(source)
}

/// Translate a program to Python with the default options
pub fn compile(source: &str) -> AlgofxResult<String> {
    compile_with(source, &CompileOptions::default())
}

/// Translate a program to Python without validating it first.
///
/// Fails only when `algorithme`, `debut` or `fin` is missing; lines that
/// cannot be translated become comments in the output.
pub fn compile_with(source: &str, options: &CompileOptions) -> AlgofxResult<String> {
    compile_with_map(source, options).map(|compiled| compiled.code)
}

/// Like [`compile_with`], also returning the source line of every
/// generated statement line
pub fn compile_with_map(source: &str, options: &CompileOptions) -> AlgofxResult<Compiled> {
    let program = Parser::new(source).parse()?;
    let mut generator = PythonGenerator::new().with_options(options);
    let compiled = generator.generate_with_map(&program);
    log::debug!(
        "compiled {:?} to {}",
        program.name,
        generator.language_name()
    );
    Ok(compiled)
}

/// Validate, then translate. Diagnostics abort the translation.
pub fn translate(source: &str, options: &CompileOptions, locale: Locale) -> AlgofxResult<String> {
    let diagnostics = check_with_locale(source, locale);
    if !diagnostics.is_empty() {
        log::debug!("translation aborted: {} diagnostic(s)", diagnostics.len());
        return Err(AlgofxError::Rejected { diagnostics });
    }
    compile_with(source, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Keyword;

    const SAMPLE: &str = "\
Algorithme Test;
Var
    n, i, somme: Entier;
Debut
    somme <- 0;
    Pour i de 1 a n faire
        somme <- somme + i;
    Finpour
    Ecrire(\"Somme:\", somme);
Fin";

    #[test]
    fn test_compile_sample() {
        let python = compile(SAMPLE).unwrap();
        assert!(python.starts_with("# Generated from algorithm: Test\n"));
        assert!(python.contains("n = 0\ni = 0\nsomme = 0\n"));
        assert!(python.contains("for i in range(1, n + 1):\n"));
        assert!(python.contains("    somme = somme + i\n"));
        assert!(python.ends_with("print(\"Somme:\", somme)\n"));
    }

    #[test]
    fn test_missing_structure() {
        let err = compile("Algorithme t;\nVar\n    x: entier;\nx <- 1;").unwrap_err();
        assert!(matches!(err, AlgofxError::MissingStructure { keyword: Keyword::Debut }));
        assert_eq!(
            err.to_string(),
            "Error: Missing essential algorithm structure (`debut` not found)"
        );
    }

    #[test]
    fn test_translate_rejects_invalid_source() {
        let source = "Algorithme t;\nVar\n    x: entier;\nDebut\n    lire (x);\nFin";
        match translate(source, &CompileOptions::default(), Locale::French) {
            Err(AlgofxError::Rejected { diagnostics }) => {
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics[0].code(), "read_invalid_spacing");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_translate_valid_source() {
        let options = CompileOptions::default().with_max_iterations(10);
        let python = translate(SAMPLE, &options, Locale::Arabic).unwrap();
        assert!(python.contains("if _loop_counter_0 > 10:\n"));
    }

    #[test]
    fn test_compile_with_map() {
        let compiled = compile_with_map(SAMPLE, &CompileOptions::default()).unwrap();
        assert_eq!(compiled.code, compile(SAMPLE).unwrap());

        let line = compiled
            .code
            .lines()
            .position(|l| l == "    somme = somme + i")
            .unwrap();
        assert_eq!(compiled.line_map.source_line(line + 1), Some(7));
    }

    #[test]
    fn test_unparsable_lines_do_not_fail() {
        let python = compile("Algorithme t;\nDebut\n    pour rien faire\n    finpour\nFin").unwrap();
        assert!(python.contains("# Could not parse: pour rien faire\n"));
    }
}
