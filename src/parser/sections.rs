//! Program splitter
//!
//! Locates the `algorithme`, `var`, `debut` and `fin` anchors and slices
//! the source into header, declarations and instructions.

use crate::errors::{AlgofxError, AlgofxResult};
use crate::lexer::{FoldedLine, Keyword, Match};

/// A slice of the source that remembers where it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'src> {
    pub text: &'src str,
    /// 1-based line number of the first character of `text`
    pub first_line: usize,
}

impl<'src> Segment<'src> {
    /// Lines of the segment, numbered as in the whole source
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'src str)> + '_ {
        self.text
            .split('\n')
            .enumerate()
            .map(move |(i, line)| (self.first_line + i, line.trim_end_matches('\r')))
    }
}

/// The structural parts of a program
#[derive(Debug, Clone)]
pub struct Sections<'src> {
    pub name: Option<String>,
    /// Text between `var` and `debut` (variables, then an optional `const` part)
    pub declarations: Segment<'src>,
    /// Text between `debut` and `fin`
    pub instructions: Segment<'src>,
}

/// Split a program into its sections.
///
/// Fails when `algorithme`, `debut` or `fin` cannot be found.
pub fn split(source: &str) -> AlgofxResult<Sections<'_>> {
    let text = FoldedLine::new(source);
    let folded = text.folded();

    for keyword in [Keyword::Algorithme, Keyword::Debut, Keyword::Fin] {
        if !folded.contains(keyword.as_str()) {
            return Err(AlgofxError::missing_structure(keyword));
        }
    }

    let debut = text
        .find_word(Keyword::Debut.as_str())
        .ok_or_else(|| AlgofxError::missing_structure(Keyword::Debut))?;
    let var = text.find_word(Keyword::Var.as_str()).filter(|&v| v < debut);
    let debut_end = debut + Keyword::Debut.as_str().len();
    let fin = text
        .find_all_folded(Keyword::Fin.as_str(), Match::Word)
        .into_iter()
        .find(|&pos| pos >= debut_end)
        .ok_or_else(|| AlgofxError::missing_structure(Keyword::Fin))?;

    let header_end = var.unwrap_or(debut);
    let name = algorithm_name(&text, header_end);

    let declarations = match var {
        Some(v) => segment(source, &text, v + Keyword::Var.as_str().len(), debut),
        None => segment(source, &text, debut, debut),
    };
    let instructions = segment(source, &text, debut_end, fin);

    log::debug!(
        "sections: name={:?}, declarations at line {}, instructions at line {}",
        name,
        declarations.first_line,
        instructions.first_line
    );

    Ok(Sections {
        name,
        declarations,
        instructions,
    })
}

fn segment<'src>(
    source: &'src str,
    text: &FoldedLine<'src>,
    start: usize,
    end: usize,
) -> Segment<'src> {
    let start = text.to_original(start);
    let end = text.to_original(end).max(start);
    Segment {
        text: &source[start..end],
        first_line: source[..start].matches('\n').count() + 1,
    }
}

/// Text after `algorithme` up to `;` or the end of that line
fn algorithm_name(text: &FoldedLine<'_>, header_end: usize) -> Option<String> {
    let keyword = Keyword::Algorithme.as_str();
    let pos = text
        .find_all_folded(keyword, Match::Word)
        .into_iter()
        .find(|&pos| pos < header_end)?;

    let rest = text.slice(pos + keyword.len()..header_end);
    let line = rest.split('\n').next().unwrap_or("");
    let name = line.split(';').next().unwrap_or("").trim();

    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "Algorithme Somme;\nVar\n    n: Entier;\nDébut\n    ecrire(n);\nFin\n";

    #[test]
    fn test_split_sections() {
        let sections = split(SOURCE).unwrap();
        assert_eq!(sections.name.as_deref(), Some("Somme"));
        assert_eq!(sections.declarations.text.trim(), "n: Entier;");
        assert_eq!(sections.instructions.text.trim(), "ecrire(n);");

        let lines: Vec<_> = sections
            .instructions
            .lines()
            .filter(|(_, l)| !l.trim().is_empty())
            .collect();
        assert_eq!(lines, vec![(5, "    ecrire(n);")]);
    }

    #[test]
    fn test_missing_structure() {
        let err = split("Var\n x: entier;\nDebut\nFin").unwrap_err();
        assert!(matches!(
            err,
            AlgofxError::MissingStructure { keyword: Keyword::Algorithme }
        ));

        let err = split("Algorithme t;\nDebut\n").unwrap_err();
        assert!(matches!(err, AlgofxError::MissingStructure { keyword: Keyword::Fin }));
    }

    #[test]
    fn test_anchors_are_whole_words() {
        let source = "Algorithme t;\nVar\n    fini, variable: booleen;\nDebut\n    fini <- vrai;\nFin";
        let sections = split(source).unwrap();
        assert_eq!(sections.declarations.text.trim(), "fini, variable: booleen;");
        assert_eq!(sections.instructions.text.trim(), "fini <- vrai;");
    }

    #[test]
    fn test_anchors_skip_literals_and_comments() {
        let source = "Algorithme t;\nVar\n    x: entier;\nDebut\n    // fin du calcul\n    ecrire(\"fin\");\nFin";
        let sections = split(source).unwrap();
        assert!(sections.instructions.text.contains("ecrire(\"fin\");"));
    }

    #[test]
    fn test_without_var_section() {
        let source = "Algorithme t\nDebut\n    sortir;\nFin";
        let sections = split(source).unwrap();
        assert_eq!(sections.name.as_deref(), Some("t"));
        assert!(sections.declarations.text.is_empty());
        assert_eq!(sections.instructions.text.trim(), "sortir;");
    }
}
