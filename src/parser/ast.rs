//! Program model for the pseudocode
//!
//! Statements are recognized line by line, so expressions are kept as
//! source text and rewritten for the target language at generation time.

use crate::lexer::VarType;

/// A complete pseudocode program
#[derive(Debug, Clone)]
pub struct Program {
    /// Name given after `algorithme`, if any
    pub name: Option<String>,
    pub variables: Vec<Variable>,
    pub constants: Vec<Constant>,
    /// Instructions between `debut` and `fin`
    pub body: Block,
}

impl Program {
    /// Declared type of a variable, by exact name
    pub fn var_type(&self, name: &str) -> Option<VarType> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.ty)
    }
}

/// A declared variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: VarType,
    pub line: usize,
}

/// A declared constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub value: Literal,
    pub line: usize,
}

/// Constant value, classified by its lexical shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `vrai`/`faux` (or `true`/`false`)
    Bool(bool),
    /// Digits, optionally negative
    Integer(String),
    /// Digits with exactly one dot, optionally negative
    Float(String),
    /// A quoted single character, quotes included
    Char(String),
    /// A quoted string, quotes included
    Str(String),
    /// Anything else; treated as an unquoted string
    Bare(String),
}

impl Literal {
    pub fn ty(&self) -> VarType {
        match self {
            Literal::Bool(_) => VarType::Bool,
            Literal::Integer(_) => VarType::Integer,
            Literal::Float(_) => VarType::Float,
            Literal::Char(_) => VarType::Char,
            Literal::Str(_) | Literal::Bare(_) => VarType::Str,
        }
    }
}

/// An ordered list of statements
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

/// A statement with its source line and nesting depth
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    /// 1-based line in the source
    pub line: usize,
    /// Number of enclosing blocks
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `target <- value;`
    Assign { target: String, value: String },
    /// `lire(a, b);`
    Read { names: Vec<String> },
    /// `ecrire(item, ...);`
    Write { items: Vec<String> },
    /// `si cond alors ... [sinon ...] finsi`
    If {
        condition: String,
        then_block: Block,
        else_block: Option<Block>,
    },
    /// `tantque cond faire ... fintantque`
    While { condition: String, body: Block },
    /// `pour ... faire ... finpour`
    For { header: ForHeader, body: Block },
    /// `sortir`
    Break,
    /// Unrecognized line, emitted as written
    Raw(String),
    /// A `pour` line none of the accepted forms matches
    Unparsed(String),
}

/// A parsed `pour` header. The `allant a e` form starts at `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForHeader {
    pub var: String,
    pub start: String,
    /// Inclusive upper bound
    pub end: String,
    /// Present only when written with `pas`
    pub step: Option<String>,
}
