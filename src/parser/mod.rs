//! Parser module for the pseudocode
//!
//! Splits a program into its sections, reads the declarations and turns
//! the instruction lines into a statement tree.

mod ast;
mod decl;
mod parser;
mod sections;

pub use ast::*;
pub use decl::{infer_literal, parse_declarations};
pub(crate) use parser::is_for_opener;
pub use parser::{parse_for_header, Parser};
pub use sections::{split, Sections, Segment};
