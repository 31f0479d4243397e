//! Conversion of compile and evaluation errors into diagnostics.

use vex_diagnostic::{Diagnostic, ErrorCode};

use crate::errors::{CompileError, CompileErrorKind, EvalError, EvalErrorKind};

impl CompileError {
    pub fn code(&self) -> ErrorCode {
        match self.kind {
            CompileErrorKind::UnknownFunction { .. } => ErrorCode::E1001,
            CompileErrorKind::NotAssignable { .. } => ErrorCode::E1002,
            CompileErrorKind::ReferenceArgument { .. } => ErrorCode::E1003,
            CompileErrorKind::DuplicateCase { .. } => ErrorCode::E1004,
            CompileErrorKind::CaseLabelNotConstant => ErrorCode::E1005,
            CompileErrorKind::MalformedNumber { .. } => ErrorCode::E1006,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self.kind {
            CompileErrorKind::UnknownFunction { .. } => "unknown function",
            CompileErrorKind::NotAssignable { .. } => "not a variable",
            CompileErrorKind::ReferenceArgument { .. } => "expected a variable",
            CompileErrorKind::DuplicateCase { .. } => "duplicate case",
            CompileErrorKind::CaseLabelNotConstant => "not a constant",
            CompileErrorKind::MalformedNumber { .. } => "malformed literal",
        };
        let mut diag = Diagnostic::error(self.code())
            .with_message(self.kind.to_string())
            .with_label(self.span, label);
        for note in &self.notes {
            diag = match note.span {
                Some(span) => diag.with_secondary_label(span, note.message.clone()),
                None => diag.with_note(note.message.clone()),
            };
        }
        diag
    }
}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self.kind {
            EvalErrorKind::UninitializedVariable { .. } => ErrorCode::E2001,
            EvalErrorKind::ConstantReassignment { .. } => ErrorCode::E2002,
            EvalErrorKind::ContinueOutsideLoop => ErrorCode::E2003,
            EvalErrorKind::BreakOutsideLoop => ErrorCode::E2004,
            EvalErrorKind::NoValue => ErrorCode::E2005,
            EvalErrorKind::FunctionFailed { .. } => ErrorCode::E2006,
            EvalErrorKind::RegistryMismatch => ErrorCode::E2007,
            EvalErrorKind::InputArity { .. } => ErrorCode::E2008,
            EvalErrorKind::Timeout => ErrorCode::E3001,
            EvalErrorKind::IterationLimit { .. } => ErrorCode::E3002,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(self.kind.to_string());
        if let Some(span) = self.span {
            let label = match &self.kind {
                EvalErrorKind::UninitializedVariable { .. } => "read before assignment",
                EvalErrorKind::ConstantReassignment { .. } => "assigned here",
                EvalErrorKind::Timeout | EvalErrorKind::IterationLimit { .. } => "in this loop",
                EvalErrorKind::FunctionFailed { .. } => "in this call",
                _ => "here",
            };
            diag = diag.with_label(span, label);
        }
        match &self.kind {
            EvalErrorKind::UninitializedVariable { name } => {
                diag.with_note(format!("assign `{name}` before reading it"))
            }
            EvalErrorKind::IterationLimit { limit } => diag.with_note(format!(
                "a single loop may run at most {limit} iterations"
            )),
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{duplicate_case, iteration_limit, timeout, uninitialized_variable};
    use pretty_assertions::assert_eq;
    use vex_diagnostic::{emitter, ErrorCode};
    use vex_ir::Span;

    #[test]
    fn test_duplicate_case_points_at_both_labels() {
        let err = duplicate_case(5.0)
            .with_span(Span::new(20, 21))
            .with_related("first case with this value", Span::new(8, 9));
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E1004);
        assert_eq!(diag.primary_span(), Some(Span::new(20, 21)));
        assert_eq!(diag.labels.len(), 2);
        assert!(!diag.labels[1].is_primary);
        assert_eq!(diag.labels[1].span, Span::new(8, 9));
    }

    #[test]
    fn test_uninitialized_renders_with_source() {
        let source = "x = q + 1";
        let diag = uninitialized_variable("q")
            .with_span(Span::new(4, 5))
            .to_diagnostic();
        let rendered = emitter::render(&diag, source);
        assert!(rendered.starts_with("error[E2001]: variable `q` is not initialized"));
        assert!(rendered.contains("--> 1:5"));
        assert!(rendered.contains("^ read before assignment"));
        assert!(rendered.contains("= note: assign `q` before reading it"));
    }

    #[test]
    fn test_resource_codes() {
        assert_eq!(timeout().code(), ErrorCode::E3001);
        let diag = iteration_limit(256).to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E3002);
        assert_eq!(diag.primary_span(), None);
        assert_eq!(diag.notes.len(), 1);
    }
}
