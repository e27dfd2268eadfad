//! Tokenizer splitting a single line of input into tokens.

use log::{debug, trace};
use nom::{
    branch::alt,
    character::complete::{char as tag_char, digit1},
    combinator::map,
    IResult,
};
use std::fmt;

use crate::Error;

/// Value with an associated code span within a line of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned<'a, T> {
    /// Byte offset of the span start within the line.
    pub offset: usize,
    /// 1-based number of the line the span belongs to.
    pub line: usize,
    /// Text covered by the span.
    pub fragment: &'a str,
    /// Value associated with the span.
    pub extra: T,
}

/// Code span without an associated value.
pub type Span<'a> = Spanned<'a, ()>;

pub(crate) fn create_span<T, U>(span: Spanned<T>, extra: U) -> Spanned<U> {
    Spanned {
        offset: span.offset,
        line: span.line,
        fragment: span.fragment,
        extra,
    }
}

pub(crate) fn create_span_ref<'a, T, U>(span: &Spanned<'a, T>, extra: U) -> Spanned<'a, U> {
    Spanned {
        offset: span.offset,
        line: span.line,
        fragment: span.fragment,
        extra,
    }
}

/// Operator symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `^`
    Caret,
}

impl Operator {
    /// Returns the symbol of the operator.
    pub fn symbol(self) -> char {
        match self {
            Operator::Plus => '+',
            Operator::Minus => '-',
            Operator::Star => '*',
            Operator::Slash => '/',
            Operator::Caret => '^',
        }
    }
}

/// Kind of a token. The token text is available as the fragment of the enclosing span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unsigned decimal literal, e.g., `42`.
    Number,
    /// Operator, e.g., `*`.
    Operator(Operator),
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// End of the line or the start of a comment.
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Number => formatter.write_str("number"),
            TokenKind::Operator(op) => write!(formatter, "operator `{}`", op.symbol()),
            TokenKind::LeftParen => formatter.write_str("`(`"),
            TokenKind::RightParen => formatter.write_str("`)`"),
            TokenKind::EndOfInput => formatter.write_str("end of input"),
        }
    }
}

/// Token with the associated code span.
pub type Token<'a> = Spanned<'a, TokenKind>;

/// Lexer state carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexerMode {
    /// Ordinary tokenization.
    Normal,
    /// Previous line ended with a continued comment (`# ... \`).
    InComment,
}

impl Default for LexerMode {
    fn default() -> Self {
        LexerMode::Normal
    }
}

impl LexerMode {
    /// Determines the mode for the line following `line`, provided that `line`
    /// is tokenized in this mode.
    pub fn after_line(self, line: &str) -> Self {
        match self {
            LexerMode::Normal => match line.find('#') {
                Some(pos) if line[pos + 1..].ends_with('\\') => LexerMode::InComment,
                _ => LexerMode::Normal,
            },
            LexerMode::InComment => match line.chars().last() {
                Some(' ') | Some('\t') | Some('\\') | None => LexerMode::InComment,
                Some(_) => LexerMode::Normal,
            },
        }
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn operator(input: &str) -> IResult<&str, Operator> {
    alt((
        map(tag_char('+'), |_| Operator::Plus),
        map(tag_char('-'), |_| Operator::Minus),
        map(tag_char('*'), |_| Operator::Star),
        map(tag_char('/'), |_| Operator::Slash),
        map(tag_char('^'), |_| Operator::Caret),
    ))(input)
}

fn token_kind(input: &str) -> IResult<&str, TokenKind> {
    alt((
        map(digit1, |_| TokenKind::Number),
        map(operator, TokenKind::Operator),
        map(tag_char('('), |_| TokenKind::LeftParen),
        map(tag_char(')'), |_| TokenKind::RightParen),
    ))(input)
}

/// Lazy tokenizer for a single line.
///
/// The lexer yields tokens in order and finishes with an `EndOfInput` token, after which
/// it is exhausted. An unrecognized character is reported as an `InvalidSymbol` error;
/// tokenization resumes after it.
///
/// # Examples
///
/// ```
/// use modular_calc::{Lexer, LexerMode, TokenKind};
///
/// let lexer = Lexer::new("2 * (3 + 4) # answer", LexerMode::Normal);
/// assert_eq!(lexer.next_mode(), LexerMode::Normal);
/// let kinds: Vec<_> = lexer.map(|token| token.unwrap().extra).collect();
/// assert_eq!(kinds.len(), 8);
/// assert_eq!(kinds[7], TokenKind::EndOfInput);
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    remaining: &'a str,
    line: usize,
    next_mode: LexerMode,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer for `input`, which is tokenized in the specified `mode`.
    pub fn new(input: &'a str, mode: LexerMode) -> Self {
        let next_mode = mode.after_line(input);
        if next_mode != mode {
            debug!("Switching lexer mode: {:?} -> {:?}", mode, next_mode);
        }

        let remaining = match mode {
            LexerMode::Normal => input,
            // The entire line is a part of the comment.
            LexerMode::InComment => &input[input.len()..],
        };
        Lexer {
            input,
            remaining,
            line: 1,
            next_mode,
            finished: false,
        }
    }

    /// Sets the line number recorded in the produced spans.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Returns the tokenized line.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Returns the line number recorded in the produced spans.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the mode the next line should be tokenized in.
    pub fn next_mode(&self) -> LexerMode {
        self.next_mode
    }

    fn span(&self, fragment: &'a str) -> Span<'a> {
        Spanned {
            offset: self.input.len() - self.remaining.len(),
            line: self.line,
            fragment,
            extra: (),
        }
    }

    /// Creates an `EndOfInput` token at the current position.
    pub(crate) fn end_of_input(&self) -> Token<'a> {
        create_span(self.span(&self.remaining[..0]), TokenKind::EndOfInput)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, Spanned<'a, Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.remaining = self.remaining.trim_start_matches(is_blank);
        if self.remaining.is_empty() || self.remaining.starts_with('#') {
            self.finished = true;
            let token = self.end_of_input();
            self.remaining = &self.remaining[self.remaining.len()..];
            return Some(Ok(token));
        }

        let item = match token_kind(self.remaining) {
            Ok((rest, kind)) => {
                let len = self.remaining.len() - rest.len();
                let token = create_span(self.span(&self.remaining[..len]), kind);
                self.remaining = rest;
                Ok(token)
            }
            Err(_) => {
                let symbol = self.remaining.chars().next()?;
                let len = symbol.len_utf8();
                let err = create_span(
                    self.span(&self.remaining[..len]),
                    Error::InvalidSymbol(symbol),
                );
                self.remaining = &self.remaining[len..];
                Err(err)
            }
        };
        trace!("Lexed {:?}", item);
        Some(item)
    }
}
