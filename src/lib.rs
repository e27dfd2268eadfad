//! Calculator for arithmetic expressions modulo the prime `1234577`.
//!
//! Every literal and every intermediate result is reduced modulo [`MODULUS`]. Supported
//! operations are addition, subtraction, multiplication, division (multiplication by
//! the modular inverse), exponentiation `^` and unary negation.
//!
//! Input is processed one line at a time. A `#` starts a comment running to the end
//! of the line; if the comment ends with a backslash `\`, it continues on the next line.
//!
//! # Examples
//!
//! ```
//! use modular_calc::{Context, Error, LexerMode, Residue, MODULUS};
//!
//! let mut context = Context::new();
//! let output = context.evaluate_line("(2 + 3) * 4").unwrap();
//! assert_eq!(output, Some(Residue::new(20)));
//! // Values live in `[0, MODULUS)`.
//! let output = context.evaluate_line("-2 ^ 3").unwrap();
//! assert_eq!(output.unwrap().value(), MODULUS - 8);
//!
//! // Errors are spanned and do not break the context.
//! let err = context.evaluate_line("3 / 0").unwrap_err();
//! assert_eq!(err.extra, Error::DivisionByZero);
//! assert_eq!(err.fragment, "3 / 0");
//!
//! // Comments may be continued onto the following lines.
//! assert_eq!(context.evaluate_line("# long comment \\").unwrap(), None);
//! assert_eq!(context.mode(), LexerMode::InComment);
//! assert_eq!(context.evaluate_line("still a comment").unwrap(), None);
//! assert_eq!(context.evaluate_line("5").unwrap(), Some(Residue::new(5)));
//! ```

#![deny(missing_docs, missing_debug_implementations)]

pub mod arith;
mod error;
mod interpreter;
pub mod lexer;
pub mod parser;

pub use crate::{
    arith::{Residue, MODULUS},
    error::Error,
    interpreter::{evaluate_expr, Context},
    lexer::{Lexer, LexerMode, Span, Spanned, Token, TokenKind},
};
