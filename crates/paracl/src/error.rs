//! Fatal faults the engine can report.
//!
//! Every variant of [`RuntimeError`] is unconditionally fatal to the
//! evaluation that raised it (`spec.md` §7): there is no catch/rescue
//! construct in the language, so the moment one of these is produced the
//! whole `eval` call unwinds and every scope frame above the root is
//! discarded.

use std::fmt;

/// A fault raised while evaluating a parsed program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// A read referenced a name absent from every live scope frame.
    UndeclaredVariable(String),
    /// `DIV` or `MOD` with a right operand of zero.
    DivisionByZero,
    /// An operation received a value of the wrong shape (arithmetic on an
    /// array, indexing a non-array, printing a non-integer, a non-integer
    /// loop/branch condition, and so on).
    TypeMismatch { expected: &'static str, found: &'static str },
    /// A subscript fell outside `[0, length)`.
    IndexOutOfBounds { index: i64, length: usize },
    /// `repeat` was asked for a negative number of elements.
    NegativeArraySize(i64),
    /// The input stream closed, or its next token was not a signed integer.
    InputError(String),
    /// Evaluation nested deeper than the configured [`crate::resource::RecursionGuard`]
    /// allows. Not part of the language's own error catalogue — a
    /// controlled stand-in for a native stack overflow (`spec.md` §5).
    RecursionLimit { limit: usize },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeclaredVariable(name) => write!(f, "undeclared variable: {name}"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            }
            Self::IndexOutOfBounds { index, length } => {
                write!(f, "index out of bounds: {index} (length {length})")
            }
            Self::NegativeArraySize(n) => write!(f, "negative array size: {n}"),
            Self::InputError(msg) => write!(f, "input error: {msg}"),
            Self::RecursionLimit { limit } => write!(f, "recursion limit of {limit} exceeded"),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// A syntax fault raised by the front end (`paracl::syntax`).
///
/// Not part of `spec.md`'s engine contract (the engine only ever sees
/// already-parsed ASTs), but the workspace needs one conformant front end to
/// be runnable end to end, so it gets its own error type in the same idiom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}
