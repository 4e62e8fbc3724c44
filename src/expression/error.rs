use std::fmt;

/// Channel expression text that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the (trimmed) expression text.
    pub offset: usize,
    /// The offending token or fragment.
    pub near: String,
    /// Human readable reason.
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(offset: usize, near: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            offset,
            near: near.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.near.is_empty() {
            write!(f, "parse error at byte {}: {}", self.offset, self.message)
        } else {
            write!(
                f,
                "parse error at byte {} near `{}`: {}",
                self.offset, self.near, self.message
            )
        }
    }
}

impl std::error::Error for ParseError {}

/// Why an evaluation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// The expression referenced a variable that is not bound.
    UndefinedVariable(String),
    /// The expression called a function that does not exist.
    UnsupportedFunction(String),
    /// A builtin was called with the wrong number of arguments.
    Arity {
        /// Function name.
        func: String,
        /// Arguments the function takes.
        expected: usize,
        /// Arguments supplied.
        got: usize,
    },
    /// Right operand of `/`, `%` or `mod` evaluated to zero.
    DivisionByZero,
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErrorKind::UndefinedVariable(name) => write!(f, "undefined variable '{name}'"),
            EvalErrorKind::UnsupportedFunction(name) => {
                write!(f, "unsupported function '{name}'")
            }
            EvalErrorKind::Arity {
                func,
                expected,
                got,
            } => write!(f, "{func} expects {expected} arg(s), got {got}"),
            EvalErrorKind::DivisionByZero => f.write_str("division by zero"),
        }
    }
}

/// Evaluation failure, carrying the subexpression that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError {
    /// Failure reason.
    pub kind: EvalErrorKind,
    /// Rendered text of the failing subexpression.
    pub subexpr: String,
}

impl EvalError {
    /// Build an evaluation error for `subexpr`.
    pub fn new(kind: EvalErrorKind, subexpr: impl Into<String>) -> Self {
        Self {
            kind,
            subexpr: subexpr.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in `{}`", self.kind, self.subexpr)
    }
}

impl std::error::Error for EvalError {}
