//! Number literal lexing.

use crate::token::{Literal, Token, TokenKind};
use crate::Scanner;

impl<'a> Scanner<'a> {
    /// Lexes a number literal.
    ///
    /// A number is one or more decimal digits, optionally followed by a
    /// `.` and at least one more digit. A trailing `.` with no fractional
    /// digits is not part of the number; the dot is left for the next
    /// token. The literal value is the IEEE-754 double parsed from the
    /// lexeme.
    pub(crate) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(self.token_start);
        match text.parse::<f64>() {
            Ok(value) => self.make_token(TokenKind::Number, Some(Literal::Number(value))),
            Err(e) => {
                self.report_error(format!("Invalid number literal '{text}': {e}."));
                self.make_token(TokenKind::Number, Some(Literal::Number(0.0)))
            }
        }
    }
}
