//! Error types for compilation and evaluation.
//!
//! Each error is a structured kind plus location. Factory functions
//! (`unknown_function`, `uninitialized_variable`, ...) are the public way to
//! build them, followed by `.with_span(span)`:
//!
//! ```
//! use vex_eval::errors::uninitialized_variable;
//! use vex_ir::Span;
//!
//! let err = uninitialized_variable("q").with_span(Span::new(7, 8));
//! assert_eq!(err.to_string(), "variable `q` is not initialized (at offset 7)");
//! ```

use std::fmt;

use vex_ir::Span;

/// What went wrong while compiling.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CompileErrorKind {
    #[error("no function `{name}` takes {arity} argument(s)")]
    UnknownFunction { name: String, arity: usize },

    #[error("`{op}` can only be applied to a variable")]
    NotAssignable { op: &'static str },

    #[error("argument {position} of `{function}` must be a variable")]
    ReferenceArgument { function: String, position: usize },

    #[error("duplicate case value {value}")]
    DuplicateCase { value: f64 },

    #[error("case label is not a constant")]
    CaseLabelNotConstant,

    #[error("malformed numeric literal `{text}`")]
    MalformedNumber { text: String },
}

/// Secondary information attached to a compile error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileNote {
    pub message: String,
    /// Related location, such as the first of two duplicate case labels.
    pub span: Option<Span>,
}

/// A tree the compiler refused, with the offending node's span.
#[derive(Clone, Debug, PartialEq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub span: Span,
    pub notes: Vec<CompileNote>,
}

impl CompileError {
    fn from_kind(kind: CompileErrorKind) -> Self {
        CompileError {
            kind,
            span: Span::DUMMY,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn with_note(mut self, message: impl Into<String>) -> Self {
        self.notes.push(CompileNote {
            message: message.into(),
            span: None,
        });
        self
    }

    /// Add a note pointing at another location.
    #[must_use]
    pub fn with_related(mut self, message: impl Into<String>, span: Span) -> Self {
        self.notes.push(CompileNote {
            message: message.into(),
            span: Some(span),
        });
        self
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at offset {})", self.kind, self.span.start)
    }
}

impl std::error::Error for CompileError {}

/// What went wrong while evaluating.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("variable `{name}` is not initialized")]
    UninitializedVariable { name: String },

    #[error("`{name}` is a constant and cannot be used as a variable")]
    ConstantReassignment { name: String },

    #[error("`continue` used outside of a loop")]
    ContinueOutsideLoop,

    #[error("`break` used outside of a loop or switch")]
    BreakOutsideLoop,

    #[error("expression produced no value")]
    NoValue,

    #[error("function `{name}` failed: {message}")]
    FunctionFailed { name: String, message: String },

    #[error("expression was compiled against a different function registry")]
    RegistryMismatch,

    #[error("row has {found} value(s) but {expected} input(s) are bound")]
    InputArity { expected: usize, found: usize },

    #[error("calculations exceeded time limit")]
    Timeout,

    #[error("loop exceeded {limit} iterations")]
    IterationLimit { limit: u32 },
}

/// Coarse grouping hosts use to decide how to report a failed run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The script itself is wrong for this environment.
    Evaluation,
    Timeout,
    IterationLimit,
}

/// A failed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Offset of the node that raised the error.
    pub span: Option<Span>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind {
            EvalErrorKind::Timeout => ErrorCategory::Timeout,
            EvalErrorKind::IterationLimit { .. } => ErrorCategory::IterationLimit,
            _ => ErrorCategory::Evaluation,
        }
    }

    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, EvalErrorKind::Timeout)
    }

    /// Timeout or iteration limit: the script may be fine, it just ran too long.
    #[inline]
    pub fn is_resource_exhausted(&self) -> bool {
        self.category() != ErrorCategory::Evaluation
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} (at offset {})", self.kind, span.start),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EvalError {}

/// Either phase's error, for hosts that compile and run in one step.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

// Compile errors

#[cold]
pub fn unknown_function(name: &str, arity: usize) -> CompileError {
    CompileError::from_kind(CompileErrorKind::UnknownFunction {
        name: name.to_string(),
        arity,
    })
}

#[cold]
pub fn not_assignable(op: &'static str) -> CompileError {
    CompileError::from_kind(CompileErrorKind::NotAssignable { op })
}

/// `position` is 1-based.
#[cold]
pub fn reference_argument(function: &str, position: usize) -> CompileError {
    CompileError::from_kind(CompileErrorKind::ReferenceArgument {
        function: function.to_string(),
        position,
    })
}

#[cold]
pub fn duplicate_case(value: f64) -> CompileError {
    CompileError::from_kind(CompileErrorKind::DuplicateCase { value })
}

#[cold]
pub fn case_label_not_constant() -> CompileError {
    CompileError::from_kind(CompileErrorKind::CaseLabelNotConstant)
}

#[cold]
pub fn malformed_number(text: &str) -> CompileError {
    CompileError::from_kind(CompileErrorKind::MalformedNumber {
        text: text.to_string(),
    })
}

// Evaluation errors

#[cold]
pub fn uninitialized_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UninitializedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn constant_reassignment(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstantReassignment {
        name: name.to_string(),
    })
}

#[cold]
pub fn continue_outside_loop() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ContinueOutsideLoop)
}

#[cold]
pub fn break_outside_loop() -> EvalError {
    EvalError::from_kind(EvalErrorKind::BreakOutsideLoop)
}

#[cold]
pub fn no_value() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoValue)
}

#[cold]
pub fn function_failed(name: &str, message: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FunctionFailed {
        name: name.to_string(),
        message: message.to_string(),
    })
}

#[cold]
pub fn registry_mismatch() -> EvalError {
    EvalError::from_kind(EvalErrorKind::RegistryMismatch)
}

#[cold]
pub fn input_arity(expected: usize, found: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InputArity { expected, found })
}

#[cold]
pub fn timeout() -> EvalError {
    EvalError::from_kind(EvalErrorKind::Timeout)
}

#[cold]
pub fn iteration_limit(limit: u32) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IterationLimit { limit })
}

#[cfg(test)]
mod tests;
