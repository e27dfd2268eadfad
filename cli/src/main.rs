use clap::Parser;
use codespan::{ByteIndex, ByteSpan, CodeMap, FileName};
use codespan_reporting::{
    emit,
    termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor},
    Diagnostic, Label,
};
use failure::bail;
use log::info;
use modular_calc::{Context, Error, LexerMode, Residue, Spanned, MODULUS};
use rustyline::{error::ReadlineError, Editor};

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

mod messages;

use crate::messages::{error_code, Locale};

/// Calculator for arithmetic expressions modulo a prime.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Language of results and diagnostics.
    #[arg(long, value_enum, default_value_t = Locale::En)]
    locale: Locale,

    /// File to evaluate line by line. If not specified, an interactive REPL is started.
    file: Option<PathBuf>,
}

/// Converts an error span into a span in the code map. `base` is the code map index
/// of the first char of the line.
fn byte_span(base: u32, span: &Spanned<Error>) -> ByteSpan {
    let start = base + span.offset as u32;
    let end = start + span.fragment.len() as u32;
    ByteSpan::new(ByteIndex(start), ByteIndex(end))
}

fn print_greeting(writer: &StandardStream) -> io::Result<()> {
    let mut writer = writer.lock();
    writer.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(writer, "modular-calc REPL v{}", env!("CARGO_PKG_VERSION"))?;
    writer.reset()?;
    writeln!(writer, "{}", env!("CARGO_PKG_DESCRIPTION"))?;
    writeln!(writer, "All computations are performed modulo {}.", MODULUS)
}

fn report_error(
    writer: &StandardStream,
    code_map: &CodeMap<&str>,
    base: u32,
    locale: Locale,
    e: &Spanned<Error>,
) -> io::Result<()> {
    let label = Label::new_primary(byte_span(base, e)).with_message(locale.label(e));
    let diagnostic = Diagnostic::new_error(locale.describe(e))
        .with_code(error_code(e.extra))
        .with_label(label);
    emit(&mut writer.lock(), code_map, &diagnostic)
}

fn print_result(writer: &StandardStream, locale: Locale, value: Residue) -> io::Result<()> {
    let mut writer = writer.lock();
    writer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(writer, "{}", locale.result(value))?;
    writer.reset()?;
    writeln!(writer)
}

struct Output {
    results: StandardStream,
    diagnostics: StandardStream,
    locale: Locale,
}

impl Output {
    fn new(locale: Locale) -> Self {
        Output {
            results: StandardStream::stdout(ColorChoice::Auto),
            diagnostics: StandardStream::stderr(ColorChoice::Auto),
            locale,
        }
    }

    fn evaluate(
        &self,
        context: &mut Context,
        code_map: &CodeMap<&str>,
        base: u32,
        line: &str,
    ) -> io::Result<()> {
        match context.evaluate_line(line) {
            Ok(Some(value)) => print_result(&self.results, self.locale, value),
            Ok(None) => Ok(()),
            Err(e) => report_error(&self.diagnostics, code_map, base, self.locale, &e),
        }
    }
}

fn run_file(output: &Output, path: &Path) -> Result<(), failure::Error> {
    let source = fs::read_to_string(path)?;
    info!("Evaluating {} ({} bytes)", path.display(), source.len());

    let mut code_map = CodeMap::new();
    let name = FileName::Virtual(path.display().to_string().into());
    code_map.add_filemap(name, source.as_str());

    let mut context = Context::new();
    let mut line_start = 0;
    for line in source.split('\n') {
        let base = line_start as u32 + 1;
        line_start += line.len() + 1;
        output.evaluate(&mut context, &code_map, base, line.trim_end_matches('\r'))?;
    }

    if context.mode() == LexerMode::InComment {
        info!("File ends inside a continued comment");
    }
    Ok(())
}

fn run_repl(output: &Output) -> Result<(), failure::Error> {
    let mut rl = Editor::<()>::new();
    print_greeting(&output.diagnostics)?;

    let mut context = Context::new();
    loop {
        let prompt = match context.mode() {
            LexerMode::Normal => ">>> ",
            LexerMode::InComment => "... ",
        };

        match rl.readline(prompt) {
            Ok(line) => {
                let mut code_map = CodeMap::new();
                code_map.add_filemap(FileName::Virtual("REPL".into()), line.as_str());
                output.evaluate(&mut context, &code_map, 1, &line)?;
                rl.add_history_entry(line.as_str());
            }

            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Bye");
                break;
            }

            Err(e) => bail!("Error reading command: {}", e),
        }
    }
    Ok(())
}

fn main() -> Result<(), failure::Error> {
    env_logger::init();
    let args = Args::parse();
    let output = Output::new(args.locale);

    match args.file {
        Some(ref path) => run_file(&output, path),
        None => run_repl(&output),
    }
}
