//! Declaration parser
//!
//! Turns the `var` section into variables and, after a `const` line,
//! constants. Validity is the validator's concern: lines that do not fit
//! are skipped here.

use super::ast::{Constant, Literal, Variable};
use super::sections::Segment;
use crate::lexer::{fold, strip_comment, Keyword, VarType};

/// Parse the declarations segment into variables and constants
pub fn parse_declarations(segment: &Segment<'_>) -> (Vec<Variable>, Vec<Constant>) {
    let mut variables: Vec<Variable> = Vec::new();
    let mut constants: Vec<Constant> = Vec::new();
    let mut in_constants = false;

    for (number, raw) in segment.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if fold(line) == Keyword::Const.as_str() {
            in_constants = true;
            continue;
        }

        if in_constants {
            if let Some(constant) = parse_constant(line, number) {
                if constants.iter().any(|c| c.name == constant.name) {
                    log::debug!(
                        "line {}: constant '{}' declared twice, keeping the first",
                        number,
                        constant.name
                    );
                } else {
                    constants.push(constant);
                }
            }
        } else {
            for variable in parse_variable_line(line, number) {
                if variables.iter().any(|v| v.name == variable.name) {
                    log::debug!(
                        "line {}: variable '{}' declared twice, keeping the first",
                        number,
                        variable.name
                    );
                } else {
                    variables.push(variable);
                }
            }
        }
    }

    log::debug!(
        "declarations: {} variable(s), {} constant(s)",
        variables.len(),
        constants.len()
    );
    (variables, constants)
}

/// `a, b : type;`
fn parse_variable_line(line: &str, number: usize) -> Vec<Variable> {
    let Some((names, type_name)) = line.split_once(':') else {
        return Vec::new();
    };

    let type_name = type_name.trim().trim_end_matches(';').trim();
    let Some(ty) = VarType::from_name(type_name) else {
        log::warn!("line {}: unknown type '{}', declaration dropped", number, type_name);
        return Vec::new();
    };

    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Variable {
            name: name.to_string(),
            ty,
            line: number,
        })
        .collect()
}

/// `NAME = value;`
fn parse_constant(line: &str, number: usize) -> Option<Constant> {
    let (name, value) = line.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some(Constant {
        name: name.to_string(),
        value: infer_literal(value.trim().trim_end_matches(';').trim()),
        line: number,
    })
}

/// Classify a constant value by its lexical shape
pub fn infer_literal(value: &str) -> Literal {
    let folded = fold(value);
    if folded == "vrai" || folded == "true" {
        return Literal::Bool(true);
    }
    if folded == "faux" || folded == "false" {
        return Literal::Bool(false);
    }

    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if is_digits(unsigned) {
        return Literal::Integer(value.to_string());
    }
    if unsigned.matches('.').count() == 1 && is_digits(&unsigned.replacen('.', "", 1)) {
        return Literal::Float(value.to_string());
    }

    let is_quote = |c: char| c == '"' || c == '\'';
    let quoted = value.chars().count() >= 2
        && value.starts_with(is_quote)
        && value.ends_with(is_quote);
    if quoted {
        if value.chars().count() == 3 {
            return Literal::Char(value.to_string());
        }
        return Literal::Str(value.to_string());
    }

    Literal::Bare(value.to_string())
}
