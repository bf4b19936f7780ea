//! Static validation of pseudocode source
//!
//! Works directly on the source lines, independently of the parser, and
//! reports every problem it finds instead of stopping at the first one.

use std::collections::HashSet;

use super::messages::{DiagnosticKind, Locale};
use crate::errors::Diagnostic;
use crate::lexer::{
    fold, is_identifier, is_ident_char, is_reserved, is_terminated, literal_mask, statement_body,
    strip_comment, FoldedLine, Keyword, Match, VarType,
};
use crate::parser::{is_for_opener, parse_for_header};

/// Part of the program a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Var,
    Const,
    Main,
    End,
}

/// An identifier read or written by an instruction
#[derive(Debug)]
struct Usage {
    name: String,
    line: usize,
    text: String,
}

/// A line kept for a diagnostic reported after the scan
type Pending = (usize, String);

/// Semantic validator
pub struct Validator {
    locale: Locale,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
    section: Section,
    found_var: bool,
    found_debut: bool,
    found_fin: bool,
    /// Declared names, lowercased
    variables: HashSet<String>,
    constants: HashSet<String>,
    /// First usage of every identifier, in order of appearance
    used: Vec<Usage>,
    open_si: Vec<Pending>,
    open_pour: Vec<Pending>,
    open_tantque: Vec<Pending>,
    si_without_alors: Vec<Pending>,
    tantque_without_faire: Vec<Pending>,
    pour_without_faire: Vec<Pending>,
}

impl Validator {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            diagnostics: Vec::new(),
            section: Section::Header,
            found_var: false,
            found_debut: false,
            found_fin: false,
            variables: HashSet::new(),
            constants: HashSet::new(),
            used: Vec::new(),
            open_si: Vec::new(),
            open_pour: Vec::new(),
            open_tantque: Vec::new(),
            si_without_alors: Vec::new(),
            tantque_without_faire: Vec::new(),
            pour_without_faire: Vec::new(),
        }
    }

    /// Validate a program and return its diagnostics in report order
    pub fn check(mut self, source: &str) -> Vec<Diagnostic> {
        let lines: Vec<(usize, &str)> = source
            .split('\n')
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .collect();
        let last_line = lines.len();

        let header = self.check_header(&lines);
        let body_start = header.unwrap_or(0);

        for &(number, raw) in &lines[body_start..] {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            self.check_line(number, line);
        }

        self.check_sections(header.unwrap_or(1), last_line);
        self.check_undeclared();
        self.check_balance();

        log::debug!("validation found {} diagnostic(s)", self.diagnostics.len());
        self.diagnostics
    }

    fn report(&mut self, line: usize, text: &str, kind: DiagnosticKind, arg: Option<&str>) {
        self.diagnostics
            .push(Diagnostic::new(line, text.trim(), kind, self.locale, arg));
    }

    // ==================== Header ====================

    /// Check the first significant line; returns its number when it is a header
    fn check_header(&mut self, lines: &[(usize, &str)]) -> Option<usize> {
        let (number, line) = lines
            .iter()
            .map(|&(number, raw)| (number, strip_comment(raw).trim()))
            .find(|(_, line)| !line.is_empty())?;

        let folded = FoldedLine::new(line);
        let keyword = Keyword::Algorithme.as_str();
        if !folded.starts_with_word(keyword) {
            self.report(number, line, DiagnosticKind::AlgoMissing, None);
            return None;
        }

        let name = folded.slice_from(keyword.len()).trim();
        let name = name.strip_suffix(';').unwrap_or(name).trim_end();

        let kind = if name.is_empty() {
            Some(DiagnosticKind::AlgoMissing)
        } else if name.contains(char::is_whitespace) {
            Some(DiagnosticKind::AlgoNameHasSpaces)
        } else if name.starts_with(|c: char| c.is_ascii_digit()) {
            Some(DiagnosticKind::AlgoNameStartsWithNumber)
        } else if name.contains(|c: char| !is_ident_char(c)) {
            Some(DiagnosticKind::AlgoNameSpecialChars)
        } else if !is_identifier(name) {
            Some(DiagnosticKind::AlgoNameInvalid)
        } else if is_reserved(name) {
            Some(DiagnosticKind::AlgoNameReserved)
        } else {
            None
        };

        if let Some(kind) = kind {
            self.report(number, line, kind, None);
        }
        Some(number)
    }

    // ==================== Lines ====================

    fn check_line(&mut self, number: usize, line: &str) {
        let folded = fold(line);
        let marker = match folded.as_str() {
            "var" => Some(Section::Var),
            "const" => Some(Section::Const),
            "debut" => Some(Section::Main),
            "fin" => Some(Section::End),
            _ => None,
        };

        if let Some(section) = marker {
            match section {
                Section::Var => self.found_var = true,
                Section::Main => self.found_debut = true,
                Section::End => self.found_fin = true,
                Section::Header | Section::Const => {}
            }
            self.section = section;
            return;
        }

        match self.section {
            Section::Var => self.check_variable_line(number, line),
            Section::Const => self.check_constant_line(number, line),
            Section::Main => self.check_instruction(number, line),
            Section::Header | Section::End => {}
        }
    }

    fn check_variable_line(&mut self, number: usize, line: &str) {
        if !line.ends_with(';') {
            self.report(number, line, DiagnosticKind::VarMissingSemicolon, None);
        }

        let parts: Vec<&str> = line.split(':').collect();
        let [names, type_name] = parts.as_slice() else {
            self.report(number, line, DiagnosticKind::VarFormatInvalid, None);
            return;
        };

        let type_name = type_name.trim().trim_end_matches(';').trim_end();
        if VarType::from_name(type_name).is_none() {
            self.report(number, line, DiagnosticKind::VarTypeInvalid, Some(type_name));
        }

        for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if self.check_name(number, line, name) {
                let key = name.to_lowercase();
                if self.variables.contains(&key) {
                    self.report(number, line, DiagnosticKind::DuplicateVar, Some(name));
                } else if self.constants.contains(&key) {
                    self.report(number, line, DiagnosticKind::VarConstNameConflict, Some(name));
                } else {
                    self.variables.insert(key);
                }
            }
        }
    }

    fn check_constant_line(&mut self, number: usize, line: &str) {
        let Some((name, value)) = line.split_once('=') else {
            self.report(number, line, DiagnosticKind::ConstFormatInvalid, None);
            return;
        };

        if !line.ends_with(';') {
            self.report(number, line, DiagnosticKind::ConstMissingSemicolon, None);
        }

        let name = name.trim();
        if self.check_name(number, line, name) {
            let key = name.to_lowercase();
            if self.constants.contains(&key) {
                self.report(number, line, DiagnosticKind::DuplicateConst, Some(name));
            } else if self.variables.contains(&key) {
                self.report(number, line, DiagnosticKind::ConstVarNameConflict, Some(name));
            } else {
                self.constants.insert(key);
            }
        }

        if value.trim().trim_end_matches(';').trim().is_empty() {
            self.report(number, line, DiagnosticKind::ConstValueMissing, Some(name));
        }
    }

    /// Identifier syntax and reserved words; true when the name is usable
    fn check_name(&mut self, number: usize, line: &str, name: &str) -> bool {
        if !is_identifier(name) {
            self.report(number, line, DiagnosticKind::VarNameInvalid, Some(name));
            false
        } else if is_reserved(name) {
            self.report(number, line, DiagnosticKind::VarNameReserved, Some(name));
            false
        } else {
            true
        }
    }

    fn check_instruction(&mut self, number: usize, line: &str) {
        let folded = FoldedLine::new(line);
        let bare = statement_body(folded.folded());
        let mut recognized = false;

        if folded.starts_with_word(Keyword::Si.as_str()) {
            self.open_si.push((number, line.to_string()));
            if !folded.contains_word(Keyword::Alors.as_str()) {
                self.si_without_alors.push((number, line.to_string()));
            }
            recognized = true;
        } else if bare == Keyword::Finsi.as_str() {
            self.close(Keyword::Finsi, number, line);
            recognized = true;
        }

        if folded.starts_with_word(Keyword::Pour.as_str()) {
            self.open_pour.push((number, line.to_string()));
            if !folded.contains_word(Keyword::Faire.as_str()) {
                self.pour_without_faire.push((number, line.to_string()));
            } else if !is_for_opener(&folded) || parse_for_header(line).is_none() {
                self.report(number, line, DiagnosticKind::PourInvalidFormat, None);
            }
            recognized = true;
        } else if bare == Keyword::Finpour.as_str() {
            self.close(Keyword::Finpour, number, line);
            recognized = true;
        }

        if folded.starts_with_word(Keyword::Tantque.as_str()) {
            self.open_tantque.push((number, line.to_string()));
            if !folded.contains_word(Keyword::Faire.as_str()) {
                self.tantque_without_faire.push((number, line.to_string()));
            }
            recognized = true;
        } else if bare == Keyword::Fintantque.as_str() {
            self.close(Keyword::Fintantque, number, line);
            recognized = true;
        }

        if let Some(arrow) = folded.find_all("<-", Match::Text).first() {
            if !line.ends_with(';') {
                self.report(number, line, DiagnosticKind::AssignmentMissingSemicolon, None);
            }
            let target = line[..arrow.start].trim();
            if is_identifier(target) {
                self.use_name(target, number, line);
            }
            recognized = true;
        }

        if folded.contains_word(Keyword::Lire.as_str()) {
            if has_spaced_call(&folded, Keyword::Lire) {
                self.report(number, line, DiagnosticKind::ReadInvalidSpacing, None);
            }
            if !is_terminated(line) {
                self.report(number, line, DiagnosticKind::ReadMissingSemicolon, None);
            }
            if let Some((args, after)) = call_arguments(&folded, Keyword::Lire) {
                self.check_after_call(number, line, after);
                for name in args.split(',').map(str::trim) {
                    if is_identifier(name) {
                        self.use_name(name, number, line);
                    }
                }
            }
            recognized = true;
        }

        if folded.contains_word(Keyword::Ecrire.as_str()) {
            if has_spaced_call(&folded, Keyword::Ecrire) {
                self.report(number, line, DiagnosticKind::WriteInvalidSpacing, None);
            }
            if !is_terminated(line) {
                self.report(number, line, DiagnosticKind::WriteMissingSemicolon, None);
            }
            if let Some((args, after)) = call_arguments(&folded, Keyword::Ecrire) {
                self.check_after_call(number, line, after);
                for name in identifiers_outside_literals(args) {
                    if !is_reserved(&name) {
                        self.use_name(&name, number, line);
                    }
                }
            }
            recognized = true;
        }

        if folded.starts_with_word(Keyword::Sinon.as_str()) {
            if bare != Keyword::Sinon.as_str() {
                self.report(number, line, DiagnosticKind::InvalidInstruction, None);
            }
            recognized = true;
        }

        if folded.starts_with_word(Keyword::Sortir.as_str()) {
            if bare != Keyword::Sortir.as_str() {
                self.report(number, line, DiagnosticKind::InvalidInstruction, None);
            } else if !is_terminated(line) {
                self.report(number, line, DiagnosticKind::SortirMissingSemicolon, None);
            }
            recognized = true;
        }

        if !recognized {
            self.report(number, line, DiagnosticKind::InvalidInstruction, None);
        }
    }

    /// Pop the innermost open block `closer` ends; a closer with nothing
    /// open is reported on the spot
    fn close(&mut self, closer: Keyword, number: usize, line: &str) {
        let open = match closer {
            Keyword::Finsi => &mut self.open_si,
            Keyword::Finpour => &mut self.open_pour,
            _ => &mut self.open_tantque,
        };
        if open.pop().is_none() {
            self.report(number, line, DiagnosticKind::UnmatchedCloser, Some(closer.as_str()));
        }
    }

    /// Only the terminating `;` may follow a `lire`/`ecrire` call
    fn check_after_call(&mut self, number: usize, line: &str, after: Option<&str>) {
        if after.is_some_and(|rest| !statement_body(rest).is_empty()) {
            self.report(number, line, DiagnosticKind::InvalidInstruction, None);
        }
    }

    fn use_name(&mut self, name: &str, line: usize, text: &str) {
        if self.used.iter().any(|u| u.name.eq_ignore_ascii_case(name)) {
            return;
        }
        self.used.push(Usage {
            name: name.to_string(),
            line,
            text: text.to_string(),
        });
    }

    // ==================== Whole program ====================

    fn check_sections(&mut self, header_line: usize, last_line: usize) {
        if !self.found_var {
            self.report(header_line, "", DiagnosticKind::VarSectionMissing, None);
        }
        if !self.found_debut {
            self.report(last_line, "", DiagnosticKind::DebutMissing, None);
        }
        if !self.found_fin {
            self.report(last_line, "", DiagnosticKind::FinMissing, None);
        }
    }

    fn check_undeclared(&mut self) {
        let used = std::mem::take(&mut self.used);
        for usage in &used {
            let key = usage.name.to_lowercase();
            if !self.variables.contains(&key) && !self.constants.contains(&key) {
                self.report(
                    usage.line,
                    &usage.text,
                    DiagnosticKind::UndeclaredVariable,
                    Some(&usage.name),
                );
            }
        }
    }

    fn check_balance(&mut self) {
        let groups = [
            (std::mem::take(&mut self.open_si), DiagnosticKind::SiMissingFinsi),
            (std::mem::take(&mut self.open_pour), DiagnosticKind::PourMissingFinpour),
            (std::mem::take(&mut self.open_tantque), DiagnosticKind::TantqueMissingFintantque),
            (std::mem::take(&mut self.si_without_alors), DiagnosticKind::SiMissingAlors),
            (std::mem::take(&mut self.tantque_without_faire), DiagnosticKind::TantqueMissingFaire),
            (std::mem::take(&mut self.pour_without_faire), DiagnosticKind::PourMissingFaire),
        ];

        for (pending, kind) in groups {
            for (line, text) in pending {
                self.report(line, &text, kind, None);
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

/// Whether `keyword` is followed by whitespace and then `(`
fn has_spaced_call(line: &FoldedLine<'_>, keyword: Keyword) -> bool {
    let tight = keyword.as_str().len() + 1;
    line.find_calls(keyword.as_str())
        .iter()
        .any(|call| call.len() > tight)
}

/// Text between the parentheses following the first `keyword`, up to the
/// matching `)` or the end of the line, and the text after that `)` when
/// there is one
fn call_arguments<'src>(
    line: &FoldedLine<'src>,
    keyword: Keyword,
) -> Option<(&'src str, Option<&'src str>)> {
    let folded = line.folded();
    let pos = line.find_word(keyword.as_str())? + keyword.as_str().len();
    let rest = &folded[pos..];
    let open = pos + (rest.len() - rest.trim_start().len());
    if !folded[open..].starts_with('(') {
        return None;
    }

    let mask = literal_mask(folded);
    let mut depth = 0usize;
    for (i, c) in folded[open..].char_indices() {
        let at = open + i;
        if !mask[at] {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((line.slice(open + 1..at), Some(line.slice_from(at + 1))));
                }
            }
            _ => {}
        }
    }

    Some((line.slice_from(open + 1), None))
}

/// ASCII identifiers of `text`, skipping string literals
fn identifiers_outside_literals(text: &str) -> Vec<String> {
    let mask = literal_mask(text);
    let code: String = text
        .char_indices()
        .map(|(i, c)| if mask[i] { c } else { ' ' })
        .collect();

    code.split(|c: char| !is_ident_char(c) && c != '.')
        .filter(|token| is_identifier(token))
        .map(str::to_string)
        .collect()
}
