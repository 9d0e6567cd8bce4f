//! Structural view of program source.
//!
//! Detectors never match source text. They parse it into the neutral tree in
//! [`tree`], resolve names through [`ImportTable`] and match on node shape.

pub mod imports;
pub mod lexer;
pub mod python;
pub mod tree;
pub mod visitor;

pub use imports::{last_segment, ImportTable};
pub use python::parse_module;
pub use tree::{Alias, Expr, Keyword, Module, Stmt};
pub use visitor::{walk_expr, walk_module, walk_stmt, CallCollector, Visitor};

use thiserror::Error;

/// Source could not be tokenized or parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("syntax error at line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}
