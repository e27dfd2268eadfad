//! Parsing logic for arithmetic expressions.
//!
//! Expressions are parsed with an operator-precedence (shunting-yard) parser into
//! a flat postfix program. Both parsing and evaluation keep their state in heap-allocated
//! stacks, so neither the nesting depth nor the length of an expression is bounded
//! by the native stack.

use log::trace;

use crate::{
    lexer::{create_span, create_span_ref, Lexer, Operator, Span, Spanned, Token, TokenKind},
    Error, LexerMode,
};


fn unite_spans<'a, T, U>(input: &'a str, start: &Spanned<T>, end: &Spanned<U>) -> Span<'a> {
    debug_assert!(start.offset <= end.offset);
    debug_assert!(input.len() >= end.offset + end.fragment.len());

    Span {
        offset: start.offset,
        line: start.line,
        fragment: &input[start.offset..(end.offset + end.fragment.len())],
        extra: (),
    }
}

/// Binary arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Power (`^`).
    Power,
}

/// Associativity of a binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    /// `a op b op c` is `(a op b) op c`.
    Left,
    /// `a op b op c` is `a op (b op c)`.
    Right,
}

impl BinaryOp {
    /// Converts an operator token into a binary operation.
    pub fn from_operator(op: Operator) -> Self {
        match op {
            Operator::Plus => BinaryOp::Add,
            Operator::Minus => BinaryOp::Sub,
            Operator::Star => BinaryOp::Mul,
            Operator::Slash => BinaryOp::Div,
            Operator::Caret => BinaryOp::Power,
        }
    }

    /// Returns the binding strength of the operation; greater binds tighter.
    /// Unary negation binds tighter than any binary operation.
    pub fn priority(self) -> usize {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 0,
            BinaryOp::Mul | BinaryOp::Div => 1,
            BinaryOp::Power => 2,
        }
    }

    /// Returns the associativity of the operation.
    pub fn associativity(self) -> Associativity {
        match self {
            BinaryOp::Power => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Checks whether this operation, located to the left of `next`, must be applied
    /// before `next`.
    fn binds_before(self, next: BinaryOp) -> bool {
        self.priority() > next.priority()
            || (self.priority() == next.priority()
                && next.associativity() == Associativity::Left)
    }
}

/// Instruction of a postfix program. The span of an instruction covers the
/// subexpression whose value the instruction produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op<'a> {
    /// Pushes a number, e.g., `42`. The digits are available as the span fragment.
    Number,
    /// Negates the topmost value, e.g., `-x`. A run of minus signs is folded, so `--x`
    /// produces no instruction and `---x` a single one.
    Neg,
    /// Replaces two topmost values with the result of a binary operation, e.g., `x + 1`.
    Binary {
        /// Operator.
        op: Spanned<'a, BinaryOp>,
    },
}

/// `Op` with the associated code span.
pub type SpannedOp<'a> = Spanned<'a, Op<'a>>;

/// Arithmetic expression in postfix (reverse Polish) form.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr<'a> {
    ops: Vec<SpannedOp<'a>>,
}

/// `Expr` with the associated code span.
pub type SpannedExpr<'a> = Spanned<'a, Expr<'a>>;

impl<'a> Expr<'a> {
    /// Returns instructions of the expression in evaluation order. Executing them
    /// on an empty value stack leaves exactly one value on it.
    pub fn ops(&self) -> &[SpannedOp<'a>] {
        &self.ops
    }

    /// Parses the line tokenized by `lexer`. Returns `None` if the line contains no tokens
    /// (e.g., is empty or consists of a comment).
    pub fn parse(lexer: Lexer<'a>) -> Result<Option<SpannedExpr<'a>>, Spanned<'a, Error>> {
        Parser::new(lexer).program()
    }

    /// Parses a standalone line in the `Normal` lexer mode.
    pub fn parse_line(line: &'a str) -> Result<Option<SpannedExpr<'a>>, Spanned<'a, Error>> {
        Self::parse(Lexer::new(line, LexerMode::Normal))
    }
}

/// Operation waiting for its operands on the parser stack.
#[derive(Debug, Clone, Copy)]
enum Pending<'a> {
    /// Opening parenthesis.
    Paren(Token<'a>),
    /// Run of `count` minus signs starting with `start`.
    Neg { start: Token<'a>, count: usize },
    Binary(Spanned<'a, BinaryOp>),
}

/// Shunting-yard parser consuming tokens one at a time.
#[derive(Debug)]
struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    /// Pending operations.
    stack: Vec<Pending<'a>>,
    /// Spans of the parsed operands, which have not been consumed by an operation yet.
    operands: Vec<Span<'a>>,
    output: Vec<SpannedOp<'a>>,
}

impl<'a> Parser<'a> {
    fn new(lexer: Lexer<'a>) -> Self {
        Parser {
            input: lexer.input(),
            lexer,
            stack: vec![],
            operands: vec![],
            output: vec![],
        }
    }

    fn advance(&mut self) -> Result<Token<'a>, Spanned<'a, Error>> {
        let token = match self.lexer.next() {
            Some(item) => item?,
            None => self.lexer.end_of_input(),
        };
        trace!("Read {:?}", token);
        Ok(token)
    }

    fn program(mut self) -> Result<Option<SpannedExpr<'a>>, Spanned<'a, Error>> {
        let mut token = self.advance()?;
        if token.extra == TokenKind::EndOfInput {
            return Ok(None);
        }

        loop {
            self.operand(token)?;
            token = self.advance()?;
            while token.extra == TokenKind::RightParen {
                self.close_paren(token)?;
                token = self.advance()?;
            }

            match token.extra {
                TokenKind::Operator(op) => {
                    self.push_binary(create_span(token, BinaryOp::from_operator(op)));
                    token = self.advance()?;
                }
                TokenKind::EndOfInput => break,
                kind => return Err(create_span(token, Error::UnexpectedToken(kind))),
            }
        }

        while let Some(pending) = self.stack.pop() {
            match pending {
                Pending::Binary(op) => self.apply_binary(op),
                _ => return Err(create_span(token, Error::UnexpectedEndOfInput)),
            }
        }
        debug_assert_eq!(self.operands.len(), 1);
        match self.operands.pop() {
            Some(span) => Ok(Some(create_span(span, Expr { ops: self.output }))),
            None => unreachable!("parsed expression without value"),
        }
    }

    /// Parses an operand starting with `token`: minus signs and opening parentheses
    /// followed by a number.
    fn operand(&mut self, mut token: Token<'a>) -> Result<(), Spanned<'a, Error>> {
        loop {
            match token.extra {
                TokenKind::Number => break,
                TokenKind::Operator(Operator::Minus) => match self.stack.last_mut() {
                    Some(Pending::Neg { count, .. }) => *count += 1,
                    _ => self.stack.push(Pending::Neg {
                        start: token,
                        count: 1,
                    }),
                },
                TokenKind::LeftParen => self.stack.push(Pending::Paren(token)),
                TokenKind::EndOfInput => {
                    return Err(create_span(token, Error::UnexpectedEndOfInput));
                }
                kind => return Err(create_span(token, Error::UnexpectedToken(kind))),
            }
            token = self.advance()?;
        }

        self.output.push(create_span(token, Op::Number));
        self.complete_operand(create_span(token, ()));
        Ok(())
    }

    /// Records a parsed operand and applies negations pending directly before it.
    fn complete_operand(&mut self, mut span: Span<'a>) {
        while let Some(&Pending::Neg { start, count }) = self.stack.last() {
            self.stack.pop();
            span = unite_spans(self.input, &start, &span);
            if count % 2 == 1 {
                self.output.push(create_span(span, Op::Neg));
            }
        }
        self.operands.push(span);
    }

    fn close_paren(&mut self, closing: Token<'a>) -> Result<(), Spanned<'a, Error>> {
        loop {
            match self.stack.pop() {
                Some(Pending::Binary(op)) => self.apply_binary(op),
                Some(Pending::Paren(opening)) => {
                    self.operands.pop();
                    let span = unite_spans(self.input, &opening, &closing);
                    self.complete_operand(span);
                    return Ok(());
                }
                _ => {
                    return Err(create_span_ref(
                        &closing,
                        Error::UnexpectedToken(TokenKind::RightParen),
                    ));
                }
            }
        }
    }

    fn push_binary(&mut self, op: Spanned<'a, BinaryOp>) {
        while let Some(&Pending::Binary(prev)) = self.stack.last() {
            if !prev.extra.binds_before(op.extra) {
                break;
            }
            self.stack.pop();
            self.apply_binary(prev);
        }
        self.stack.push(Pending::Binary(op));
    }

    fn apply_binary(&mut self, op: Spanned<'a, BinaryOp>) {
        let rhs = self.operands.pop();
        let lhs = self.operands.pop();
        let span = match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => unite_spans(self.input, &lhs, &rhs),
            _ => unreachable!("binary operation without operands"),
        };
        self.output.push(create_span(span, Op::Binary { op }));
        self.operands.push(span);
    }
}
