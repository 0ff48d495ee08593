//! Runtime errors for the interpreter

use crate::ast::Span;
use thiserror::Error;

/// Runtime error during interpretation
#[derive(Debug, Clone, Error)]
#[error("Runtime error: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Innermost expression being reduced when the error was raised
    pub span: Option<Span>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operator applied to incompatible value kinds
    TypeMismatch,
    /// Lookup of an unbound name
    NameError,
    /// Write to a locked name; logged, never propagated
    ConstantViolation,
    /// Division or modulo by zero
    ArithmeticFault,
    /// Argument count mismatch
    ArityMismatch,
    /// Call of a non-function value
    NotCallable,
    /// Argument of the right kind but an unusable value
    InvalidArgument,
    /// Call depth limit reached
    StackOverflow,
    /// Reading input or writing output failed
    Io,
}

impl ErrorKind {
    /// Every kind halts the run except constant violations
    pub fn is_fatal(self) -> bool {
        !matches!(self, ErrorKind::ConstantViolation)
    }

    /// Heading used when the error is reported
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "Type mismatch",
            ErrorKind::NameError => "Name error",
            ErrorKind::ConstantViolation => "Constant violation",
            ErrorKind::ArithmeticFault => "Arithmetic fault",
            ErrorKind::ArityMismatch => "Arity mismatch",
            ErrorKind::NotCallable => "Not callable",
            ErrorKind::InvalidArgument => "Invalid argument",
            ErrorKind::StackOverflow => "Stack overflow",
            ErrorKind::Io => "IO error",
        }
    }
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError {
            kind,
            message,
            span: None,
        }
    }

    pub fn type_mismatch(op: &str, left: &str, right: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("invalid types for operation {op}: {left} and {right}"),
        )
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("type error: expected {expected}, got {got}"),
        )
    }

    pub fn name_error(name: &str) -> Self {
        Self::new(ErrorKind::NameError, format!("name '{name}' is not defined"))
    }

    pub fn constant_violation(name: &str) -> Self {
        Self::new(
            ErrorKind::ConstantViolation,
            format!("cannot reassign constant '{name}'"),
        )
    }

    pub fn arithmetic_fault(op: &str) -> Self {
        Self::new(ErrorKind::ArithmeticFault, format!("{op} by zero"))
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("function {name} expects {expected} argument(s), got {got}"),
        )
    }

    pub fn not_callable(type_name: &str) -> Self {
        Self::new(
            ErrorKind::NotCallable,
            format!("value of type {type_name} is not callable"),
        )
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, msg.into())
    }

    pub fn stack_overflow(limit: usize) -> Self {
        Self::new(
            ErrorKind::StackOverflow,
            format!("stack overflow: call depth exceeded {limit}"),
        )
    }

    pub fn io_error(err: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io, format!("IO error: {err}"))
    }

    /// Attach a span unless a more precise one is already set
    pub fn at(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
