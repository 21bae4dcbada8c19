//! Output sink and input source abstractions.
//!
//! `spec.md` §6 treats both streams as plain text: `Print` emits a decimal
//! integer and a newline, `Input` consumes whitespace then one signed
//! decimal token. Routing either through a trait (rather than hard-coding
//! `Stdin`/`Stdout`) is what lets the same [`crate::eval::Evaluator`] run
//! against a real terminal from `paracl-cli` and against an in-memory buffer
//! from a test, with identical evaluation code.

use std::io::{self, BufRead, Write as _};

use crate::error::RuntimeError;

/// Receives the integers a running program prints.
///
/// One call per `Print` statement; the newline is the writer's
/// responsibility; the engine does not batch output.
pub trait PrintWriter {
    /// Writes one evaluated `Print` result, including its trailing newline.
    fn print_line(&mut self, value: i64) -> Result<(), RuntimeError>;
}

/// Writes each printed integer to the process's standard output.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn print_line(&mut self, value: i64) -> Result<(), RuntimeError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{value}").map_err(|err| RuntimeError::InputError(err.to_string()))
    }
}

/// Collects every printed integer into an in-memory string, for tests and
/// for embedding the interpreter where stdout isn't appropriate.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn print_line(&mut self, value: i64) -> Result<(), RuntimeError> {
        self.0.push_str(&value.to_string());
        self.0.push('\n');
        Ok(())
    }
}

/// Discards every printed value. Useful for benchmarking the evaluator
/// without paying for I/O.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn print_line(&mut self, _value: i64) -> Result<(), RuntimeError> {
        Ok(())
    }
}

/// Supplies the integers a running program reads via `?`.
///
/// `spec.md` §4.F requires whitespace-delimited signed decimal tokens and an
/// `InputError` abort on a closed stream or a non-integer token.
pub trait InputSource {
    /// Reads one signed decimal integer, skipping leading whitespace.
    fn read_int(&mut self) -> Result<i64, RuntimeError>;
}

/// Reads whitespace-separated integers from the process's standard input.
#[derive(Debug)]
pub struct StdInput {
    lines: io::Lines<io::StdinLock<'static>>,
    pending: std::vec::IntoIter<String>,
}

impl StdInput {
    #[must_use]
    pub fn new() -> Self {
        Self { lines: io::stdin().lock().lines(), pending: Vec::new().into_iter() }
    }

    fn next_token(&mut self) -> Result<Option<String>, RuntimeError> {
        loop {
            if let Some(token) = self.pending.next() {
                return Ok(Some(token));
            }
            match self.lines.next() {
                None => return Ok(None),
                Some(Err(err)) => return Err(RuntimeError::InputError(err.to_string())),
                Some(Ok(line)) => {
                    let tokens: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
                    self.pending = tokens.into_iter();
                }
            }
        }
    }
}

impl Default for StdInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdInput {
    fn read_int(&mut self) -> Result<i64, RuntimeError> {
        let token = self
            .next_token()?
            .ok_or_else(|| RuntimeError::InputError("input stream exhausted".to_string()))?;
        token
            .parse::<i64>()
            .map_err(|_| RuntimeError::InputError(format!("expected an integer, found {token:?}")))
    }
}

/// Hands out a fixed, pre-supplied sequence of integers. The deterministic
/// counterpart to [`StdInput`], used for tests of `Input` and `repeat`'s
/// single-evaluation rule.
#[derive(Debug, Default)]
pub struct VecInput {
    values: std::collections::VecDeque<i64>,
}

impl VecInput {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self { values: values.into_iter().collect() }
    }
}

impl InputSource for VecInput {
    fn read_int(&mut self) -> Result<i64, RuntimeError> {
        self.values
            .pop_front()
            .ok_or_else(|| RuntimeError::InputError("input stream exhausted".to_string()))
    }
}

/// An input source with nothing to read; any `?` aborts immediately.
/// Useful for programs known not to use `Input`, and for benchmarking.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn read_int(&mut self) -> Result<i64, RuntimeError> {
        Err(RuntimeError::InputError("no input source configured".to_string()))
    }
}
