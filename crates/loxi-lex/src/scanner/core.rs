//! Core scanner implementation.
//!
//! This module contains the main Scanner struct, the per-character token
//! dispatch, and whitespace/comment elision.

use loxi_util::{Diagnostic, Handler, Span};

use crate::cursor::Cursor;
use crate::scanner::identifier::is_ident_start;
use crate::token::{Literal, Token, TokenKind};

/// Scanner for Lox source text.
///
/// The scanner transforms source text into a stream of tokens using
/// maximal munch. Whitespace and `//` comments are elided. Lexical errors
/// are reported to the handler and scanning continues, so a single pass
/// surfaces every error in the input.
pub struct Scanner<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// Handler lexical errors are reported to.
    handler: &'a Handler,

    /// Starting position of the current token (byte offset).
    pub(crate) token_start: usize,

    /// Line number where the current token starts (1-based).
    token_start_line: u32,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
        }
    }

    /// Scans the whole input and returns the token stream.
    ///
    /// The returned stream contains only valid tokens and always ends with
    /// exactly one `EOF` token carrying the final line number. Error
    /// lexemes produce diagnostics instead of tokens.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            if let Some(token) = self.next_token() {
                let done = token.kind == TokenKind::Eof;
                tokens.push(token);
                if done {
                    break;
                }
            }
        }
        tokens
    }

    /// Returns the next token from the source code.
    ///
    /// Skips whitespace and comments, then dispatches on the current
    /// character. Returns `None` when the lexeme was an error; the error
    /// has already been reported to the handler.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();

        if self.cursor.is_at_end() {
            return Some(Token::eof(self.cursor.position(), self.cursor.line()));
        }

        match self.cursor.current_char() {
            '(' => Some(self.single(TokenKind::LeftParen)),
            ')' => Some(self.single(TokenKind::RightParen)),
            '{' => Some(self.single(TokenKind::LeftBrace)),
            '}' => Some(self.single(TokenKind::RightBrace)),
            ',' => Some(self.single(TokenKind::Comma)),
            '.' => Some(self.single(TokenKind::Dot)),
            '-' => Some(self.single(TokenKind::Minus)),
            '+' => Some(self.single(TokenKind::Plus)),
            ';' => Some(self.single(TokenKind::Semicolon)),
            '*' => Some(self.single(TokenKind::Star)),
            // A slash here is never a comment start; comments were
            // consumed with the whitespace above.
            '/' => Some(self.single(TokenKind::Slash)),
            '!' => Some(self.one_or_two('=', TokenKind::BangEqual, TokenKind::Bang)),
            '=' => Some(self.one_or_two('=', TokenKind::EqualEqual, TokenKind::Equal)),
            '<' => Some(self.one_or_two('=', TokenKind::LessEqual, TokenKind::Less)),
            '>' => Some(self.one_or_two('=', TokenKind::GreaterEqual, TokenKind::Greater)),
            '"' => self.lex_string(),
            c if c.is_ascii_digit() => Some(self.lex_number()),
            c if is_ident_start(c) => Some(self.lex_identifier()),
            c => {
                self.cursor.advance();
                self.report_error(format!("Unexpected character: {c}"));
                None
            }
        }
    }

    /// Consumes the current character and produces a one-character token.
    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make_token(kind, None)
    }

    /// Builds a token spanning from the start of the current lexeme to the
    /// cursor position.
    pub(crate) fn make_token(&self, kind: TokenKind, literal: Option<Literal>) -> Token {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
        );
        Token::new(kind, self.cursor.slice_from(self.token_start), literal, span)
    }

    /// Reports a lexical error at the current lexeme's position.
    ///
    /// The diagnostic carries the line the lexeme started on, which for an
    /// unterminated string is the line of the opening quote.
    pub(crate) fn report_error(&self, message: impl Into<String>) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
        );
        self.handler.report(Diagnostic::error(message, span));
    }

    /// Skips whitespace, newlines, and `//` line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => self.skip_line_comment(),
                _ => return,
            }
        }
    }

    /// Skips a line comment (from `//` to end of line).
    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }
}
