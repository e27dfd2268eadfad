use log::{debug, trace};

use crate::{
    arith::{self, Residue},
    lexer::{create_span_ref, Lexer, LexerMode, Spanned},
    parser::{BinaryOp, Expr, Op, SpannedExpr},
    Error,
};

/// Evaluates a parsed expression.
///
/// # Errors
///
/// The only error that can occur during evaluation is `DivisionByZero`; it is spanned
/// by the offending division.
pub fn evaluate_expr<'a>(expr: &SpannedExpr<'a>) -> Result<Residue, Spanned<'a, Error>> {
    let mut stack: Vec<Residue> = Vec::new();

    for op in expr.extra.ops() {
        let value = match op.extra {
            Op::Number => Residue::from_decimal(op.fragment),
            Op::Neg => -pop_value(&mut stack),
            Op::Binary { op: binary_op } => {
                let rhs = pop_value(&mut stack);
                let lhs = pop_value(&mut stack);
                match binary_op.extra {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Sub => lhs - rhs,
                    BinaryOp::Mul => arith::mul(lhs, rhs),
                    BinaryOp::Div => {
                        arith::divide(lhs, rhs).map_err(|e| create_span_ref(op, e))?
                    }
                    BinaryOp::Power => arith::pow(lhs, rhs.value()),
                }
            }
        };
        trace!("Evaluated `{}` to {}", op.fragment, value);
        stack.push(value);
    }

    debug_assert_eq!(stack.len(), 1);
    Ok(pop_value(&mut stack))
}

fn pop_value(stack: &mut Vec<Residue>) -> Residue {
    match stack.pop() {
        Some(value) => value,
        None => unreachable!("malformed postfix expression"),
    }
}

/// Evaluation context carried across lines of input.
///
/// The context stores the lexer mode (i.e., whether the previous line opened a continued
/// comment) and the number of processed lines, which is recorded in error spans.
#[derive(Debug, Clone, Default)]
pub struct Context {
    mode: LexerMode,
    line: usize,
}

impl Context {
    /// Creates a context for the first line of input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lexer mode the next line will be tokenized in.
    pub fn mode(&self) -> LexerMode {
        self.mode
    }

    /// Returns the number of lines processed so far.
    pub fn lines_processed(&self) -> usize {
        self.line
    }

    /// Tokenizes, parses and evaluates a single line.
    ///
    /// Returns `Ok(None)` if the line contains no expression (e.g., is empty
    /// or belongs to a comment). Errors do not affect processing of subsequent lines.
    pub fn evaluate_line<'a>(
        &mut self,
        line: &'a str,
    ) -> Result<Option<Residue>, Spanned<'a, Error>> {
        self.line += 1;
        let lexer = Lexer::new(line, self.mode).with_line(self.line);
        self.mode = lexer.next_mode();

        let output = Expr::parse(lexer)
            .and_then(|expr| expr.as_ref().map(evaluate_expr).transpose());
        match output {
            Ok(Some(value)) => debug!("Line {}: {}", self.line, value),
            Ok(None) => debug!("Line {}: no expression", self.line),
            Err(ref e) => debug!("Line {}: {} at offset {}", self.line, e.extra, e.offset),
        }
        output
    }
}
