//! Python code generator
//!
//! Generates a standalone Python 3 program from a parsed [`Program`].
//! Loops carry an injected iteration counter so a runaway loop aborts with
//! a `RuntimeError` instead of hanging whoever runs the output.

use std::collections::HashMap;

use super::line_map::{Compiled, LineMap};
use super::rewrite::{rewrite_line, translate_condition, translate_expression};
use super::{CodeGenerator, CompileOptions};
use crate::lexer::VarType;
use crate::parser::{Block, ForHeader, Literal, Program, Stmt, StmtKind};

/// Python code generator
///
/// All state is per [`generate`](CodeGenerator::generate) call; one
/// generator can translate any number of unrelated programs.
pub struct PythonGenerator {
    /// Current indentation level
    indent: usize,
    /// Output buffer
    output: String,
    /// Declared type of every variable of the program being translated
    variables: HashMap<String, VarType>,
    /// Whether the output calls into `math`
    needs_math: bool,
    /// Iterations a single loop may run before the guard fires
    max_iterations: u32,
    /// Lines written to `output` so far
    lines: usize,
    /// Source line of the statement being generated
    source_line: Option<usize>,
    line_map: LineMap,
}

impl PythonGenerator {
    pub fn new() -> Self {
        Self {
            indent: 0,
            output: String::new(),
            variables: HashMap::new(),
            needs_math: false,
            max_iterations: CompileOptions::default().max_iterations,
            lines: 0,
            source_line: None,
            line_map: LineMap::default(),
        }
    }

    pub fn with_options(mut self, options: &CompileOptions) -> Self {
        self.max_iterations = options.max_iterations;
        self
    }

    fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
        self.lines += 1;
        if let Some(source) = self.source_line {
            self.line_map.push(self.lines, source);
        }
    }

    fn blank(&mut self) {
        self.output.push('\n');
        self.lines += 1;
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    fn expression(&mut self, text: &str) -> String {
        let (text, uses_math) = translate_expression(text);
        self.needs_math |= uses_math;
        text
    }

    fn condition(&mut self, text: &str) -> String {
        let (text, uses_math) = translate_condition(text);
        self.needs_math |= uses_math;
        text
    }

    fn is_bool(&self, name: &str) -> bool {
        self.variables.get(name) == Some(&VarType::Bool)
    }

    fn generate_preamble(&mut self, program: &Program) {
        let name = program.name.as_deref().unwrap_or_default();
        self.writeln(&format!("# Generated from algorithm: {}", name));
        self.blank();

        if self.needs_math {
            self.writeln("import math");
            self.blank();
        }

        self.writeln("# Define French boolean literals");
        self.writeln("vrai = True");
        self.writeln("faux = False");
        self.blank();

        if !program.constants.is_empty() {
            self.writeln("# Constants:");
            for constant in &program.constants {
                let value = python_literal(&constant.value);
                self.writeln(&format!("{} = {}", constant.name, value));
            }
            self.blank();
        }

        self.writeln("# Variable declarations:");
        for var in &program.variables {
            self.writeln(&format!("# {}: {}", var.name, var.ty.python_name()));
        }
        self.blank();

        if !program.variables.is_empty() {
            for var in &program.variables {
                self.writeln(&format!("{} = {}", var.name, var.ty.default_value()));
            }
            self.blank();
        }
    }

    fn generate_block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.generate_stmt(stmt);
        }
    }

    /// A nested block; Python needs at least one statement
    fn generate_body(&mut self, block: &Block) {
        self.indent();
        if block.is_empty() {
            self.writeln("pass");
        } else {
            self.generate_block(block);
        }
        self.dedent();
    }

    fn generate_stmt(&mut self, stmt: &Stmt) {
        log::trace!("generating line {} at depth {}", stmt.line, stmt.depth);
        let outer = self.source_line.replace(stmt.line);

        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                let value = self.expression(value);
                self.writeln(&format!("{} = {}", target, value));
            }
            StmtKind::Read { names } => {
                for name in names {
                    self.generate_read(name);
                }
            }
            StmtKind::Write { items } => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| {
                        if self.is_bool(item) {
                            format!("'vrai' if {} else 'faux'", item)
                        } else {
                            self.expression(item)
                        }
                    })
                    .collect();
                self.writeln(&format!("print({})", items.join(", ")));
            }
            StmtKind::If {
                condition,
                then_block,
                else_block,
            } => {
                let condition = self.condition(condition);
                self.writeln(&format!("if {}:", condition));
                self.generate_body(then_block);
                if let Some(else_block) = else_block {
                    self.writeln("else:");
                    self.generate_body(else_block);
                }
            }
            StmtKind::While { condition, body } => {
                let condition = self.condition(condition);
                let counter = self.loop_counter();
                self.writeln(&format!("{} = 0", counter));
                self.writeln(&format!("while {}:", condition));
                self.generate_loop_body(&counter, body);
            }
            StmtKind::For { header, body } => {
                let range = self.range(header);
                let counter = self.loop_counter();
                self.writeln(&format!("{} = 0", counter));
                self.writeln(&format!("for {} in {}:", header.var, range));
                self.generate_loop_body(&counter, body);
            }
            StmtKind::Break => self.writeln("break"),
            StmtKind::Raw(line) => {
                let (line, uses_math) = rewrite_line(line);
                self.needs_math |= uses_math;
                self.writeln(&line);
            }
            StmtKind::Unparsed(line) => {
                self.writeln(&format!("# Could not parse: {}", line));
            }
        }

        self.source_line = outer;
    }

    fn generate_read(&mut self, name: &str) {
        let prompt = format!("Entrez {}: ", name);
        match self.variables.get(name).copied() {
            Some(VarType::Integer) => {
                self.writeln(&format!("{} = int(input(\"{}\"))", name, prompt));
            }
            Some(VarType::Float) => {
                self.writeln(&format!("{} = float(input(\"{}\"))", name, prompt));
            }
            Some(VarType::Bool) => {
                self.writeln(&format!("_input = input(\"Entrez {} (vrai/faux): \").lower()", name));
                self.writeln(&format!("{} = _input in ['vrai', 'true', '1']", name));
            }
            Some(VarType::Char) => {
                self.writeln(&format!("_input = input(\"{}\")", prompt));
                self.writeln(&format!("{} = _input[0] if _input else ''", name));
            }
            Some(VarType::Str) | None => {
                self.writeln(&format!("{} = input(\"{}\")", name, prompt));
            }
        }
    }

    /// Counter names are unique per nesting level, and sibling loops
    /// reset theirs before starting.
    fn loop_counter(&self) -> String {
        format!("_loop_counter_{}", self.indent)
    }

    fn generate_loop_body(&mut self, counter: &str, body: &Block) {
        self.indent();
        self.writeln(&format!("{} += 1", counter));
        self.writeln(&format!("if {} > {}:", counter, self.max_iterations));
        self.indent();
        self.writeln("raise RuntimeError(\"Possible infinite loop detected!\")");
        self.dedent();
        self.generate_block(body);
        self.dedent();
    }

    /// `range(...)` call iterating over the inclusive bounds of a header
    fn range(&mut self, header: &ForHeader) -> String {
        let start = self.expression(&header.start);
        let end = self.expression(&header.end);
        match &header.step {
            Some(step) => {
                let step = self.expression(step);
                format!("range({}, {} + 1, {})", start, end, step)
            }
            None => format!("range({}, {} + 1)", start, end),
        }
    }
}

impl Default for PythonGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonGenerator {
    /// Generate a program along with the source line of every statement line
    pub fn generate_with_map(&mut self, program: &Program) -> Compiled {
        self.indent = 0;
        self.output.clear();
        self.needs_math = false;
        self.lines = 0;
        self.source_line = None;
        self.line_map = LineMap::default();
        self.variables = program
            .variables
            .iter()
            .map(|v| (v.name.clone(), v.ty))
            .collect();

        // The body decides whether `math` is imported, so it goes first.
        self.generate_block(&program.body);
        let body = std::mem::take(&mut self.output);

        self.lines = 0;
        self.generate_preamble(program);
        self.output.push_str(&body);
        self.line_map.shift(self.lines);

        log::debug!(
            "generated {} line(s) of Python (math: {})",
            self.output.lines().count(),
            self.needs_math
        );
        Compiled {
            code: std::mem::take(&mut self.output),
            line_map: std::mem::take(&mut self.line_map),
        }
    }
}

impl CodeGenerator for PythonGenerator {
    fn generate(&mut self, program: &Program) -> String {
        self.generate_with_map(program).code
    }

    fn file_extension(&self) -> &'static str {
        "py"
    }

    fn language_name(&self) -> &'static str {
        "Python"
    }
}

/// Python spelling of a constant's value
fn python_literal(value: &Literal) -> String {
    match value {
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::Integer(text) | Literal::Float(text) | Literal::Char(text) | Literal::Str(text) => {
            text.clone()
        }
        Literal::Bare(text) => format!("\"{}\"", escape_py_string(text)),
    }
}

fn escape_py_string(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\t' => result.push_str("\\t"),
            _ => result.push(c),
        }
    }
    result
}
