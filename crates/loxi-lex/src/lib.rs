//! loxi-lex - Lexical analysis for Lox source text.
//!
//! This crate turns source text into a stream of [`Token`]s. The scanner
//! works left to right with maximal munch, elides whitespace and `//`
//! comments, and reports lexical errors to a shared
//! [`Handler`](loxi_util::Handler) without stopping, so one pass surfaces
//! every bad character and unterminated string in the input. The token
//! stream it produces always ends with a single `EOF` token; error lexemes
//! never become tokens.

pub mod cursor;
mod edge_cases;
mod scanner;
pub mod token;

pub use cursor::Cursor;
pub use scanner::Scanner;
pub use token::{keyword_from_ident, number_literal_display, Literal, Token, TokenKind};
