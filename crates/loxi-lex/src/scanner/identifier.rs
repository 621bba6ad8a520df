//! Identifier and keyword lexing.

use crate::token::{keyword_from_ident, Token, TokenKind};
use crate::Scanner;

/// Returns true for characters that can start an identifier.
pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true for characters that can continue an identifier.
pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Scanner<'a> {
    /// Lexes an identifier or keyword.
    ///
    /// Identifiers start with a letter or underscore, followed by
    /// alphanumeric characters or underscores. After reading the lexeme,
    /// checks whether it matches a reserved word.
    ///
    /// # Returns
    ///
    /// A keyword token (e.g. `VAR`) or an `IDENTIFIER` token.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);

        match keyword_from_ident(text) {
            Some(kind) => self.make_token(kind, None),
            None => self.make_token(TokenKind::Identifier, None),
        }
    }
}
