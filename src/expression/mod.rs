//! Channel expression language: lexing, parsing and per-pixel evaluation.

pub(crate) mod ast;
pub(crate) mod error;
pub(crate) mod eval;
pub(crate) mod lexer;
pub(crate) mod parser;
pub(crate) mod program;
