//! Recursive descent line scanner for the pseudocode
//!
//! Statements are recognized by prefix/substring tests on each trimmed
//! line. Block statements look ahead for their closer with a nesting
//! counter and recurse into the enclosed lines.

use super::ast::*;
use super::decl::parse_declarations;
use super::sections::{split, Segment};
use crate::errors::AlgofxResult;
use crate::lexer::{is_terminated, statement_body, strip_comment, FoldedLine, Keyword, Match};

/// A non-empty instruction line, comments removed
#[derive(Debug, Clone, Copy)]
struct Line<'src> {
    number: usize,
    text: &'src str,
}

/// The parser for pseudocode programs
pub struct Parser<'src> {
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source code
    pub fn new(source: &'src str) -> Self {
        Self { source }
    }

    /// Parse the source code into a [`Program`]
    pub fn parse(self) -> AlgofxResult<Program> {
        let sections = split(self.source)?;
        let (variables, constants) = parse_declarations(&sections.declarations);

        let lines = instruction_lines(&sections.instructions);
        let body = parse_block(&lines, 0);
        log::debug!("parsed {} top-level statement(s)", body.stmts.len());

        Ok(Program {
            name: sections.name,
            variables,
            constants,
            body,
        })
    }
}

fn instruction_lines<'src>(segment: &Segment<'src>) -> Vec<Line<'src>> {
    segment
        .lines()
        .map(|(number, raw)| Line {
            number,
            text: strip_comment(raw).trim(),
        })
        .filter(|line| !line.text.is_empty())
        .collect()
}

// ==================== Blocks ====================

/// Block statements and their closers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    If,
    While,
    For,
}

impl BlockKind {
    fn closer(self) -> Keyword {
        match self {
            BlockKind::If => Keyword::Finsi,
            BlockKind::While => Keyword::Fintantque,
            BlockKind::For => Keyword::Finpour,
        }
    }

    fn opens(self, line: &FoldedLine<'_>) -> bool {
        match self {
            BlockKind::If => is_if_opener(line),
            BlockKind::While => is_while_opener(line),
            BlockKind::For => is_for_opener(line),
        }
    }
}

/// Where the look-ahead for a block's end stopped, relative to the first body line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Closer(usize),
    Else(usize),
    End,
}

/// Find the end of a block whose opener precedes `lines`. A line starting
/// with `sinon` only stops the scan when `stop_at_else` is set and it
/// belongs to this level.
fn scan_block(lines: &[Line<'_>], kind: BlockKind, stop_at_else: bool) -> Stop {
    let mut nesting = 1usize;

    for (index, line) in lines.iter().enumerate() {
        let folded = FoldedLine::new(line.text);
        if kind.opens(&folded) {
            nesting += 1;
        } else if folded.contains_word(kind.closer().as_str()) {
            nesting -= 1;
            if nesting == 0 {
                return Stop::Closer(index);
            }
        } else if stop_at_else && nesting == 1 && folded.starts_with_word(Keyword::Sinon.as_str()) {
            return Stop::Else(index);
        }
    }

    Stop::End
}

/// Body lines up to the closer, and the index just past it
fn block_body<'a, 'src>(lines: &'a [Line<'src>], kind: BlockKind) -> (&'a [Line<'src>], usize) {
    match scan_block(lines, kind, false) {
        Stop::Closer(end) => (&lines[..end], end + 1),
        Stop::Else(_) | Stop::End => (lines, lines.len()),
    }
}

fn parse_block(lines: &[Line<'_>], depth: usize) -> Block {
    let mut stmts = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let folded = FoldedLine::new(line.text);
        let rest = &lines[i + 1..];

        let (kind, consumed) = if is_if_opener(&folded) {
            let condition = between(&folded, Keyword::Si, Keyword::Alors);
            let (then_lines, else_lines, consumed) = match scan_block(rest, BlockKind::If, true) {
                Stop::Else(at) => {
                    // A statement written after `sinon` opens the else branch.
                    let mut tail: Vec<Line<'_>> = else_remainder(&rest[at]).into_iter().collect();
                    let inline = tail.len();
                    tail.extend_from_slice(&rest[at + 1..]);
                    let (else_lines, used) = block_body(&tail, BlockKind::If);
                    (&rest[..at], Some(else_lines.to_vec()), at + 1 + used - inline)
                }
                Stop::Closer(end) => (&rest[..end], None, end + 1),
                Stop::End => (rest, None, rest.len()),
            };
            let kind = StmtKind::If {
                condition,
                then_block: parse_block(then_lines, depth + 1),
                else_block: else_lines.map(|l| parse_block(&l, depth + 1)),
            };
            (kind, 1 + consumed)
        } else if is_while_opener(&folded) {
            let condition = between(&folded, Keyword::Tantque, Keyword::Faire);
            let (body, used) = block_body(rest, BlockKind::While);
            let kind = StmtKind::While {
                condition,
                body: parse_block(body, depth + 1),
            };
            (kind, 1 + used)
        } else if is_for_opener(&folded) {
            match parse_for_header(line.text) {
                Some(header) => {
                    let (body, used) = block_body(rest, BlockKind::For);
                    let kind = StmtKind::For {
                        header,
                        body: parse_block(body, depth + 1),
                    };
                    (kind, 1 + used)
                }
                None => {
                    log::warn!("line {}: could not parse 'pour' header", line.number);
                    (StmtKind::Unparsed(line.text.to_string()), 1)
                }
            }
        } else {
            match parse_simple(&folded) {
                Some(kind) => (kind, 1),
                None => {
                    i += 1;
                    continue;
                }
            }
        };

        log::trace!("line {}: {:?}", line.number, kind);
        stmts.push(Stmt {
            kind,
            line: line.number,
            depth,
        });
        i += consumed;
    }

    Block { stmts }
}

// ==================== Recognizers ====================

fn is_if_opener(line: &FoldedLine<'_>) -> bool {
    line.starts_with_word(Keyword::Si.as_str()) && line.contains_word(Keyword::Alors.as_str())
}

fn is_while_opener(line: &FoldedLine<'_>) -> bool {
    line.starts_with_word(Keyword::Tantque.as_str()) && line.contains_word(Keyword::Faire.as_str())
}

pub(crate) fn is_for_opener(line: &FoldedLine<'_>) -> bool {
    line.starts_with_word(Keyword::Pour.as_str()) && line.contains_word(Keyword::Faire.as_str())
}

/// Statement following `sinon` on the same line, if any
fn else_remainder<'src>(line: &Line<'src>) -> Option<Line<'src>> {
    let folded = FoldedLine::new(line.text);
    let text = folded.slice_from(Keyword::Sinon.as_str().len()).trim();
    (!statement_body(text).is_empty()).then_some(Line {
        number: line.number,
        text,
    })
}

/// Original text between a leading keyword and the first `closing` word
fn between(line: &FoldedLine<'_>, opening: Keyword, closing: Keyword) -> String {
    let start = opening.as_str().len();
    let end = line.find_word(closing.as_str()).unwrap_or(line.folded().len());
    line.slice(start..end.max(start)).trim().to_string()
}

/// Single-line statements. `None` for block terminators, which are
/// consumed structurally by the enclosing block.
fn parse_simple(line: &FoldedLine<'_>) -> Option<StmtKind> {
    let text = line.original();
    let folded = line.folded();

    if statement_body(folded) == Keyword::Sortir.as_str() {
        return Some(StmtKind::Break);
    }

    if is_terminated(text) && statement_body(text).ends_with(')') {
        if let Some(call) = line.find_calls(Keyword::Lire.as_str()).first() {
            let args = call_arguments(line, call.end - 1);
            let names = split_arguments(args)
                .into_iter()
                .filter(|name| !name.is_empty())
                .collect();
            return Some(StmtKind::Read { names });
        }
        if let Some(call) = line.find_calls(Keyword::Ecrire.as_str()).first() {
            let args = call_arguments(line, call.end - 1);
            return Some(StmtKind::Write {
                items: split_arguments(args),
            });
        }
    }

    if let Some(arrow) = line.find_all("<-", Match::Text).first() {
        let target = text[..arrow.start].trim().to_string();
        let value = text[arrow.end..].trim().trim_end_matches(';').trim_end().to_string();
        return Some(StmtKind::Assign { target, value });
    }

    let terminators = [Keyword::Finsi, Keyword::Fintantque, Keyword::Finpour];
    if terminators.iter().any(|kw| statement_body(folded) == kw.as_str()) {
        return None;
    }

    Some(StmtKind::Raw(text.to_string()))
}

/// Text between the `(` at folded position `open` and the last `)`
fn call_arguments<'src>(line: &FoldedLine<'src>, open: usize) -> &'src str {
    let text = line.original();
    let start = line.to_original(open) + 1;
    let end = text.rfind(')').unwrap_or(text.len()).max(start);
    &text[start..end]
}

/// Split on commas that are outside string literals and parentheses
fn split_arguments(args: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for c in args.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    items.push(current.trim().to_string());
                    current.clear();
                    continue;
                }
                _ => {}
            },
        }
        current.push(c);
    }

    if !current.trim().is_empty() || !items.is_empty() {
        items.push(current.trim().to_string());
    }
    items
}

/// Parse a `pour` header in any of the accepted forms:
///
/// - `pour v de s a e [pas p] faire`
/// - `pour v allant de s a e [pas p] faire`
/// - `pour v de s allant a e [pas p] faire`
/// - `pour v allant a e [pas p] faire` (start is 0)
///
/// The range word may be written `a` or `à`. Bounds may span several words.
pub fn parse_for_header(text: &str) -> Option<ForHeader> {
    let line = FoldedLine::new(text);
    let words = line.words();
    let is = |index: usize, keyword: Keyword| words.get(index).is_some_and(|w| w.folded == keyword.as_str());
    let is_range_word = |index: usize| words.get(index).is_some_and(|w| w.folded == "a");
    let span = |from: usize, to: usize| text[words[from].range.start..words[to - 1].range.end].to_string();

    if !is(0, Keyword::Pour) || words.len() < 2 {
        return None;
    }
    let var = &text[words[1].range.clone()];
    if !crate::lexer::is_identifier(var) {
        return None;
    }

    // (start expression, index of the first end-bound word)
    let (start, end_from) = if is(2, Keyword::De) {
        let sep = (4..words.len()).find(|&j| is_range_word(j) || is(j, Keyword::Allant))?;
        if is(sep, Keyword::Allant) {
            if !is_range_word(sep + 1) {
                return None;
            }
            (span(3, sep), sep + 2)
        } else {
            (span(3, sep), sep + 1)
        }
    } else if is(2, Keyword::Allant) && is(3, Keyword::De) {
        let sep = (5..words.len()).find(|&j| is_range_word(j))?;
        (span(4, sep), sep + 1)
    } else if is(2, Keyword::Allant) && is_range_word(3) {
        ("0".to_string(), 4)
    } else {
        return None;
    };

    let stop = (end_from + 1..words.len()).find(|&j| is(j, Keyword::Pas) || is(j, Keyword::Faire))?;
    let end = span(end_from, stop);

    let step = if is(stop, Keyword::Pas) {
        let faire = (stop + 2..words.len()).find(|&j| is(j, Keyword::Faire))?;
        Some(span(stop + 1, faire))
    } else {
        None
    };

    Some(ForHeader {
        var: var.to_string(),
        start,
        end,
        step,
    })
}
