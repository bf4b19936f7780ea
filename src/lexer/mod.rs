//! Lexical layer for the pseudocode
//!
//! Case/accent folding, word search and the shared keyword tables.

mod keywords;
mod scanner;

pub use keywords::{is_reserved, Keyword, VarType};
pub use scanner::{
    code_mask, fold, fold_char, is_ident_char, is_identifier, is_terminated, literal_mask,
    replace_all, replace_calls, statement_body, strip_comment, FoldedLine, Match, Word,
};
