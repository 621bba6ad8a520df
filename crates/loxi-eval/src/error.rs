//! Evaluation error types.

use loxi_lex::Token;
use thiserror::Error;

/// A Lox runtime error: a type check or name lookup failed while
/// evaluating the program.
///
/// Carries the line of the offending token so the driver can render the
/// external format `message\n[line N]`. The `Display` impl shows only the
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    /// Human-readable message, e.g. "Operands must be numbers."
    pub message: String,
    /// Line of the token the error is attributed to
    pub line: u32,
}

impl RuntimeError {
    /// Creates a runtime error attributed to the given token.
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: token.line(),
        }
    }
}

/// Any failure while executing statements.
///
/// Lox-level runtime errors and host-level output failures take different
/// paths in the driver: the former exit with code 70 and the runtime
/// diagnostic format, the latter are ordinary I/O errors.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A Lox runtime error (exit code 70)
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// The interpreter's output sink failed
    #[error("failed to write program output: {0}")]
    Output(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use loxi_lex::TokenKind;
    use loxi_util::Span;

    #[test]
    fn test_runtime_error_carries_token_line() {
        let token = Token::new(TokenKind::Minus, "-", None, Span::new(0, 1, 7));
        let error = RuntimeError::new(&token, "Operand must be a number.");
        assert_eq!(error.line, 7);
        assert_eq!(error.to_string(), "Operand must be a number.");
    }

    #[test]
    fn test_eval_error_wraps_runtime_error() {
        let token = Token::new(TokenKind::Plus, "+", None, Span::DUMMY);
        let error: EvalError = RuntimeError::new(&token, "Operands must be numbers.").into();
        assert!(matches!(error, EvalError::Runtime(_)));
        assert_eq!(error.to_string(), "Operands must be numbers.");
    }
}
