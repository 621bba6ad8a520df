//! Operator lexing.

use crate::token::{Token, TokenKind};
use crate::Scanner;

impl<'a> Scanner<'a> {
    /// Consumes an operator that may be followed by `follow` to form its
    /// two-character variant.
    ///
    /// The two-character forms (`==`, `!=`, `<=`, `>=`) take priority over
    /// their single-character prefixes.
    pub(crate) fn one_or_two(&mut self, follow: char, two: TokenKind, one: TokenKind) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.match_char(follow) {
            two
        } else {
            one
        };
        self.make_token(kind, None)
    }
}
