//! String literal lexing.

use crate::token::{Literal, Token, TokenKind};
use crate::Scanner;

impl<'a> Scanner<'a> {
    /// Lexes a string literal.
    ///
    /// The lexeme keeps the surrounding quotes; the literal value is the
    /// inner text. Strings cannot contain newlines. Reaching end of input
    /// or a newline before the closing quote is an error reported at the
    /// line the string began, and produces no token.
    pub(crate) fn lex_string(&mut self) -> Option<Token> {
        self.cursor.advance(); // opening quote

        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                self.report_error("Unterminated string.");
                return None;
            }
            if self.cursor.current_char() == '"' {
                self.cursor.advance();
                break;
            }
            self.cursor.advance();
        }

        let lexeme = self.cursor.slice_from(self.token_start);
        let inner = lexeme[1..lexeme.len() - 1].to_string();
        Some(self.make_token(TokenKind::String, Some(Literal::Str(inner))))
    }
}
