use assert_matches::assert_matches;
use rand::{thread_rng, Rng};

use modular_calc::{Context, Error, LexerMode, Residue, TokenKind, MODULUS};

fn run(program: &str) -> Vec<Result<Option<u64>, Error>> {
    let mut context = Context::new();
    program
        .lines()
        .map(|line| {
            context
                .evaluate_line(line)
                .map(|output| output.map(Residue::value))
                .map_err(|e| e.extra)
        })
        .collect()
}

#[test]
fn eval_arithmetic() {
    //! Checks that the evaluation order of arithmetic operations is as expected:
    //! operations with the same priority are performed from left to right.

    let mut context = Context::new();
    let result = context.evaluate_line("1 - 2 + 3 - 4").unwrap();
    assert_eq!(result, Some(Residue::new(MODULUS - 2)));

    let result = context.evaluate_line("1 / 2 * 3 / 4").unwrap();
    let expected = context.evaluate_line("3 / 8").unwrap();
    assert_eq!(result, expected);

    let result = context.evaluate_line("1 / (2 * 3) / 4").unwrap().unwrap();
    assert_eq!(result * Residue::new(24), Residue::ONE);

    let result = context.evaluate_line("1 + 2*3 - 4").unwrap();
    assert_eq!(result, Some(Residue::new(3)));
}

#[test]
fn reference_scenarios() {
    assert_eq!(run("2 + 3"), vec![Ok(Some(5))]);
    assert_eq!(run("1234577"), vec![Ok(Some(0))]);
    assert_eq!(run("3 / 0"), vec![Err(Error::DivisionByZero)]);
    assert_eq!(run("-2 ^ 3"), vec![Ok(Some(1_234_569))]);
    assert_eq!(run("(2 + 3) * 4"), vec![Ok(Some(20))]);
}

#[test]
fn continued_comment() {
    const PROGRAM: &str = "# trailing comment\\\nstill comment\n5";
    assert_eq!(run(PROGRAM), vec![Ok(None), Ok(None), Ok(Some(5))]);
}

#[test]
fn comment_spanning_several_lines() {
    const PROGRAM: &str = r#"
        2 * 3 # result is printed, comment continues \
        this line is ignored, 1 / 0 \

        ... as is this one, and the empty line above
        7 ^ 2 # back to normal
        # ordinary comment
        1 + 1
    "#;
    let outputs = run(PROGRAM);
    assert_eq!(
        outputs,
        vec![
            Ok(None),
            Ok(Some(6)),
            Ok(None),
            Ok(None),
            Ok(None),
            Ok(Some(49)),
            Ok(None),
            Ok(Some(2)),
            Ok(None),
        ]
    );
}

#[test]
fn errors_do_not_affect_next_lines() {
    const PROGRAM: &str = "2 +\n2 $ 2\n(1\n1 2\n4 / (3 - 3)\n2 + 2";
    let outputs = run(PROGRAM);
    assert_eq!(outputs.len(), 6);
    assert_eq!(outputs[0], Err(Error::UnexpectedEndOfInput));
    assert_eq!(outputs[1], Err(Error::InvalidSymbol('$')));
    assert_eq!(outputs[2], Err(Error::UnexpectedEndOfInput));
    assert_matches!(outputs[3], Err(Error::UnexpectedToken(TokenKind::Number)));
    assert_eq!(outputs[4], Err(Error::DivisionByZero));
    assert_eq!(outputs[5], Ok(Some(4)));
}

#[test]
fn error_spans_point_into_the_line() {
    let mut context = Context::new();
    context.evaluate_line("1").unwrap();

    let line = "1 + (2 * 3))";
    let err = context.evaluate_line(line).unwrap_err();
    assert_eq!(err.extra, Error::UnexpectedToken(TokenKind::RightParen));
    assert_eq!(err.line, 2);
    assert_eq!(&line[err.offset..], ")");
}

#[test]
fn large_literals_are_reduced() {
    let mut context = Context::new();
    let result = context
        .evaluate_line("100000000000000000000000000000000000000000")
        .unwrap();
    let expected = context.evaluate_line("10 ^ 41").unwrap();
    assert_eq!(result, expected);
}

#[test]
fn random_division_roundtrip() {
    let mut rng = thread_rng();
    let mut context = Context::new();
    for _ in 0..100 {
        let a: u64 = rng.gen_range(0, MODULUS);
        let b: u64 = rng.gen_range(1, MODULUS);
        let line = format!("{} * {} / {}", a, b, b);
        let output = context.evaluate_line(&line).unwrap();
        assert_eq!(output, Some(Residue::new(a)), "{}", line);
    }
    assert_eq!(context.mode(), LexerMode::Normal);
}

#[test]
fn deeply_nested_lines() {
    const DEPTH: usize = 100_000;
    let mut context = Context::new();

    let line = format!("{}1", "-".repeat(DEPTH));
    assert_eq!(context.evaluate_line(&line).unwrap(), Some(Residue::ONE));
    let line = format!("{}1", "-".repeat(DEPTH + 1));
    assert_eq!(
        context.evaluate_line(&line).unwrap(),
        Some(Residue::new(MODULUS - 1))
    );

    let line = format!("{}1{}", "(".repeat(DEPTH), ")".repeat(DEPTH));
    assert_eq!(context.evaluate_line(&line).unwrap(), Some(Residue::ONE));

    let line = format!("{}2{}", "(-".repeat(DEPTH), ")".repeat(DEPTH));
    assert_eq!(context.evaluate_line(&line).unwrap(), Some(Residue::new(2)));

    let line = format!("{}1", "(".repeat(DEPTH));
    let err = context.evaluate_line(&line).unwrap_err();
    assert_eq!(err.extra, Error::UnexpectedEndOfInput);
    assert_eq!(err.offset, line.len());

    assert_eq!(context.lines_processed(), 5);
    assert_eq!(context.evaluate_line("2 + 2").unwrap(), Some(Residue::new(4)));
}

#[test]
fn long_operator_chains() {
    const LENGTH: usize = 100_000;
    let mut context = Context::new();

    let line = vec!["1"; LENGTH].join(" + ");
    let expected = Residue::new(LENGTH as u64 % MODULUS);
    assert_eq!(context.evaluate_line(&line).unwrap(), Some(expected));

    let line = vec!["3"; LENGTH].join(" ^ ");
    let expected = (1..LENGTH).fold(Residue::new(3), |acc, _| {
        modular_calc::arith::pow(Residue::new(3), acc.value())
    });
    assert_eq!(context.evaluate_line(&line).unwrap(), Some(expected));

    let line = format!("{} / 0", vec!["2"; LENGTH].join(" * "));
    let err = context.evaluate_line(&line).unwrap_err();
    assert_eq!(err.extra, Error::DivisionByZero);
    assert_eq!(err.fragment, line);
}
