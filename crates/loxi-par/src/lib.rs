//! loxi-par - Recursive-descent parser for Lox token streams.
//!
//! The parser consumes the scanner's token stream with one token of
//! lookahead and produces the statement/expression tree. Syntax errors
//! raise a [`ParseError`] signal that unwinds to the nearest declaration
//! boundary, where the parser synchronizes to a likely statement start and
//! keeps going; one pass therefore reports every syntax error in the file.
//!
//! The grammar, lowest precedence first (left-associative unless noted):
//!
//! ```text
//! program     → declaration* EOF
//! declaration → varDecl | statement
//! statement   → printStmt | ifStmt | whileStmt | forStmt | block | exprStmt
//!
//! expression  → assignment
//! assignment  → IDENT "=" assignment | logic_or        (right-associative)
//! logic_or    → logic_and ( "or"  logic_and )*
//! logic_and   → equality  ( "and" equality  )*
//! equality    → comparison ( ("!=" | "==") comparison )*
//! comparison  → term ( (">" | ">=" | "<" | "<=") term )*
//! term        → factor ( ("-" | "+") factor )*
//! factor      → unary  ( ("/" | "*") unary  )*
//! unary       → ( "!" | "-" ) unary | primary
//! primary     → "true" | "false" | "nil" | NUMBER | STRING
//!             | "(" expression ")" | IDENT
//! ```

mod ast;
mod expr;
mod printer;
mod stmt;

pub use ast::{
    AssignExpr, BinaryExpr, BlockStmt, Expr, ExpressionStmt, GroupingExpr, IfStmt, LiteralExpr,
    LogicalExpr, PrintStmt, Stmt, UnaryExpr, VarStmt, VariableExpr, WhileStmt,
};
pub use printer::AstPrinter;

use loxi_lex::{Token, TokenKind};
use loxi_util::{Diagnostic, Handler};
use thiserror::Error;

/// Control-flow signal raised when the parser hits a syntax error.
///
/// The diagnostic is reported at raise time; this value only unwinds the
/// descent to the declaration boundary, where `synchronize` resumes
/// parsing.
#[derive(Debug, Error)]
#[error("syntax error")]
pub struct ParseError;

/// Recursive-descent parser with one-token lookahead.
///
/// The token stream must be `EOF`-terminated, as produced by
/// [`loxi_lex::Scanner::scan_tokens`].
pub struct Parser<'a> {
    /// EOF-terminated token stream
    tokens: Vec<Token>,
    /// Index of the next token to consume
    cursor: usize,
    /// Handler syntax errors are reported to
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    /// Creates a parser over an `EOF`-terminated token stream.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            cursor: 0,
            handler,
        }
    }

    /// Parses a full program: declarations up to `EOF`.
    ///
    /// Total over any token stream: a statement that fails to parse is
    /// dropped after its error is reported, and parsing resumes at the
    /// next statement boundary.
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        statements
    }

    /// Parses a single expression (for the `parse` and `evaluate`
    /// subcommands).
    ///
    /// Returns `None` after reporting when the tokens do not form a valid
    /// expression. Tokens after the first complete expression are ignored.
    pub fn parse_expression(&mut self) -> Option<Expr> {
        self.expression().ok()
    }

    /// Returns the next token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.cursor]
    }

    /// Returns the most recently consumed token.
    fn previous(&self) -> &Token {
        &self.tokens[self.cursor - 1]
    }

    /// Returns true when the lookahead is the `EOF` sentinel.
    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Consumes and returns the current token. Never consumes `EOF`.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.cursor += 1;
        }
        self.previous()
    }

    /// Returns true when the lookahead has the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consumes the current token if it matches one of the given kinds.
    fn match_kind(&mut self, kinds: &[TokenKind]) -> bool {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    /// Consumes a token of the expected kind or raises a parse error with
    /// the given message.
    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        let at = self.peek().clone();
        Err(self.error(&at, message))
    }

    /// Reports a parse error at the given token and returns the unwind
    /// signal. Errors at the `EOF` sentinel render as `at end` rather than
    /// quoting the empty lexeme.
    fn error(&self, token: &Token, message: &str) -> ParseError {
        let diag = if token.kind == TokenKind::Eof {
            Diagnostic::error(message, token.span).at_end()
        } else {
            Diagnostic::error(message, token.span).at_token(token.lexeme.as_str())
        };
        self.handler.report(diag);
        ParseError
    }

    /// Discards tokens until a likely statement boundary: just past a
    /// `;`, or in front of a keyword that starts a statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {}
            }

            self.advance();
        }
    }
}
