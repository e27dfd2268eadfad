use failure_derive::*;

use crate::lexer::TokenKind;

/// Error that can occur while tokenizing, parsing or evaluating a line.
///
/// The position of the error is not stored here; it is carried by the enclosing
/// [`Spanned`](crate::Spanned) wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Fail)]
pub enum Error {
    /// Character not recognized by the lexer.
    #[fail(display = "Invalid symbol `{}`", _0)]
    InvalidSymbol(char),

    /// Token that does not fit into the expression grammar.
    #[fail(display = "Unexpected {}", _0)]
    UnexpectedToken(TokenKind),

    /// Input ended in the middle of an expression.
    #[fail(display = "Unexpected end of input")]
    UnexpectedEndOfInput,

    /// Division by a value congruent to 0.
    #[fail(display = "Division by zero")]
    DivisionByZero,
}

impl Error {
    /// Checks whether the error is detected while evaluating (rather than parsing) the input.
    pub fn is_runtime(self) -> bool {
        match self {
            Error::DivisionByZero => true,
            _ => false,
        }
    }
}
