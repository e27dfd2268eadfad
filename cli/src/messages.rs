//! Human-readable texts for results and diagnostics.

use clap::ValueEnum;
use modular_calc::{Error, Residue, Spanned};

/// Language of the calculator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    /// English.
    En,
    /// Polish.
    Pl,
}

impl Locale {
    /// Formats the result of a successfully evaluated line.
    pub fn result(self, value: Residue) -> String {
        match self {
            Locale::En => value.to_string(),
            Locale::Pl => format!("Wynik: {}", value),
        }
    }

    /// Main message of the diagnostic.
    pub fn describe(self, err: &Spanned<Error>) -> String {
        match self {
            Locale::En => err.extra.to_string(),
            Locale::Pl => match err.extra {
                Error::InvalidSymbol(symbol) => format!("Błąd: zły symbol '{}'", symbol),
                Error::UnexpectedToken(_) => format!("Błąd w '{}'", err.fragment),
                Error::UnexpectedEndOfInput => "Błąd: niespodziewany koniec wyrażenia".to_owned(),
                Error::DivisionByZero => "Błąd: dzielenie przez zero".to_owned(),
            },
        }
    }

    /// Message attached to the span of the diagnostic.
    pub fn label(self, err: &Spanned<Error>) -> &'static str {
        match (self, err.extra) {
            (Locale::En, Error::DivisionByZero) => "Right-hand side of this division is 0",
            (Locale::En, Error::UnexpectedEndOfInput) => "Expression is unfinished here",
            (Locale::En, _) => "Error occurred here",
            (Locale::Pl, Error::DivisionByZero) => "Dzielnik tego ilorazu jest równy 0",
            (Locale::Pl, Error::UnexpectedEndOfInput) => "Tu wyrażenie się urywa",
            (Locale::Pl, _) => "Tu wystąpił błąd",
        }
    }
}

/// Short code identifying the stage the error was detected at.
pub fn error_code(err: Error) -> &'static str {
    match err {
        Error::InvalidSymbol(_) => "LEX",
        _ if err.is_runtime() => "EVAL",
        _ => "PARSE",
    }
}
