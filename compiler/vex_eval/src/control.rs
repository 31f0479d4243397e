//! Control-flow signals and the loop/switch runtime.
//!
//! `break`, `continue` and `return` are raised on the `Err` side of
//! [`EvalResult`], next to real errors. Every combinator forwards them with
//! `?`; only the constructs below intercept them:
//!
//! - loops intercept `Break` and `Continue` raised by their body
//! - a switch intercepts `Break` raised by its case bodies
//! - the compiled expression turns `Return` into its result

use rustc_hash::FxHashMap;
use vex_ir::Span;

use crate::environment::Environment;
use crate::errors::{iteration_limit, no_value, EvalError};

/// Result of running one compiled node.
///
/// `Ok(None)` means the node produced no value (a loop that never ran,
/// an `if` without `else` whose condition was false).
pub type EvalResult = Result<Option<f64>, ControlAction>;

/// A non-local exit travelling up the closure chain.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    /// Leave the nearest loop or switch, yielding the last value produced
    /// before the break.
    Break { value: Option<f64>, span: Span },
    /// Skip to the next iteration of the nearest loop.
    Continue { span: Span },
    /// Leave the whole expression.
    Return(Option<f64>),
    Error(Box<EvalError>),
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(Box::new(err))
    }
}

/// One compiled node.
pub(crate) type CompiledFn = Box<dyn Fn(&mut Environment<'_>) -> EvalResult + Send + Sync>;

/// Box a closure as a [`CompiledFn`], fixing its signature for inference.
#[inline]
pub(crate) fn compiled<F>(f: F) -> CompiledFn
where
    F: Fn(&mut Environment<'_>) -> EvalResult + Send + Sync + 'static,
{
    Box::new(f)
}

/// Require a value from an operand.
#[inline]
pub(crate) fn value_of(result: Option<f64>, span: Span) -> Result<f64, ControlAction> {
    match result {
        Some(value) => Ok(value),
        None => Err(no_value().with_span(span).into()),
    }
}

/// Zero is false; everything else, NaN included, is true.
#[inline]
pub(crate) fn is_truthy(value: f64) -> bool {
    value != 0.0
}

#[inline]
fn condition(cond: &CompiledFn, span: Span, env: &mut Environment<'_>) -> Result<bool, ControlAction> {
    Ok(is_truthy(value_of(cond(env)?, span)?))
}

/// Per-execution iteration ceiling plus the shared deadline.
pub(crate) struct LoopGuard {
    iterations: u32,
    limit: u32,
    span: Span,
}

impl LoopGuard {
    pub(crate) fn new(env: &Environment<'_>, span: Span) -> Self {
        LoopGuard {
            iterations: 0,
            limit: env.max_loop_iterations(),
            span,
        }
    }

    /// Called before every body execution.
    #[inline]
    pub(crate) fn tick(&mut self, env: &Environment<'_>) -> Result<(), ControlAction> {
        if self.iterations >= self.limit {
            tracing::debug!(limit = self.limit, span = %self.span, "loop iteration limit reached");
            return Err(iteration_limit(self.limit).with_span(self.span).into());
        }
        self.iterations += 1;
        if let Err(err) = env.check_deadline() {
            tracing::debug!(iterations = self.iterations, span = %self.span, "evaluation deadline passed");
            return Err(err.with_span(self.span).into());
        }
        Ok(())
    }
}

/// How one execution of a loop body ended.
enum Iteration {
    Completed(Option<f64>),
    Continued,
    Broke(Option<f64>),
}

#[inline]
fn run_body(body: &CompiledFn, env: &mut Environment<'_>) -> Result<Iteration, ControlAction> {
    match body(env) {
        Ok(value) => Ok(Iteration::Completed(value)),
        Err(ControlAction::Break { value, .. }) => Ok(Iteration::Broke(value)),
        Err(ControlAction::Continue { .. }) => Ok(Iteration::Continued),
        Err(other) => Err(other),
    }
}

/// Pieces of a compiled loop. `cond` is `None` only for `for (;;)`.
pub(crate) struct LoopParts {
    pub init: Option<CompiledFn>,
    pub cond: Option<(CompiledFn, Span)>,
    pub update: Option<CompiledFn>,
    pub body: CompiledFn,
    pub span: Span,
}

impl LoopParts {
    #[inline]
    fn check(&self, env: &mut Environment<'_>) -> Result<bool, ControlAction> {
        match &self.cond {
            Some((cond, span)) => condition(cond, *span, env),
            None => Ok(true),
        }
    }
}

/// `while` and `for`: condition first, then body, then update.
pub(crate) fn run_loop(parts: &LoopParts, env: &mut Environment<'_>) -> EvalResult {
    if let Some(init) = &parts.init {
        init(env)?;
    }
    let mut guard = LoopGuard::new(env, parts.span);
    let mut last = None;
    while parts.check(env)? {
        guard.tick(env)?;
        match run_body(&parts.body, env)? {
            Iteration::Completed(value) => last = value,
            Iteration::Continued => {}
            Iteration::Broke(value) => return Ok(value.or(last)),
        }
        if let Some(update) = &parts.update {
            update(env)?;
        }
    }
    Ok(last)
}

/// `do ... while`: body first.
pub(crate) fn run_do_while(parts: &LoopParts, env: &mut Environment<'_>) -> EvalResult {
    let mut guard = LoopGuard::new(env, parts.span);
    let mut last = None;
    loop {
        guard.tick(env)?;
        match run_body(&parts.body, env)? {
            Iteration::Completed(value) => last = value,
            Iteration::Continued => {}
            Iteration::Broke(value) => return Ok(value.or(last)),
        }
        if !parts.check(env)? {
            return Ok(last);
        }
    }
}

/// `for (counter = first, last)`, counting up by one.
///
/// Bounds are evaluated once. The counter is written before every
/// iteration from a local copy, so the body cannot change the trip count.
pub(crate) fn run_counted(
    bounds: (f64, f64),
    mut set_counter: impl FnMut(&mut Environment<'_>, f64) -> Result<(), ControlAction>,
    body: &CompiledFn,
    span: Span,
    env: &mut Environment<'_>,
) -> EvalResult {
    let (first, last_bound) = bounds;
    let mut guard = LoopGuard::new(env, span);
    let mut last = None;
    let mut counter = first;
    while counter <= last_bound {
        guard.tick(env)?;
        set_counter(env, counter)?;
        match run_body(body, env)? {
            Iteration::Completed(value) => last = value,
            Iteration::Continued => {}
            Iteration::Broke(value) => return Ok(value.or(last)),
        }
        counter += 1.0;
    }
    Ok(last)
}

/// Key for exact numeric equality; `-0.0` and `0.0` share a key.
#[inline]
pub(crate) fn case_key(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

/// Dispatch table for a compiled switch.
pub(crate) struct SwitchTable {
    /// Case value key to index into `bodies`. NaN labels are absent.
    index: FxHashMap<u64, usize>,
    bodies: Box<[CompiledFn]>,
    default: Option<CompiledFn>,
}

impl SwitchTable {
    pub(crate) fn new(
        index: FxHashMap<u64, usize>,
        bodies: Vec<CompiledFn>,
        default: Option<CompiledFn>,
    ) -> Self {
        SwitchTable {
            index,
            bodies: bodies.into_boxed_slice(),
            default,
        }
    }

    /// Run from the matching case to the end, falling through every later
    /// case and then the default, until a body breaks.
    pub(crate) fn dispatch(&self, scrutinee: f64, env: &mut Environment<'_>) -> EvalResult {
        let matched = if scrutinee.is_nan() {
            None
        } else {
            self.index.get(&case_key(scrutinee)).copied()
        };
        let start = match (matched, &self.default) {
            (Some(start), _) => start,
            (None, Some(_)) => self.bodies.len(),
            (None, None) => return Ok(None),
        };

        let mut last = None;
        let tail = self.bodies.get(start..).unwrap_or(&[]);
        for body in tail.iter().chain(self.default.iter()) {
            match body(env) {
                Ok(value) => last = value,
                Err(ControlAction::Break { value, .. }) => return Ok(value.or(last)),
                Err(other) => return Err(other),
            }
        }
        Ok(last)
    }

    pub(crate) fn len(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Deadline;
    use crate::registry::FunctionRegistry;
    use pretty_assertions::assert_eq;

    fn constant(value: Option<f64>) -> CompiledFn {
        compiled(move |_| Ok(value))
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(0.0));
        assert!(!is_truthy(-0.0));
        assert!(is_truthy(1.0));
        assert!(is_truthy(f64::NAN));
    }

    #[test]
    fn test_case_key_unifies_signed_zero() {
        assert_eq!(case_key(0.0), case_key(-0.0));
        assert_ne!(case_key(1.0), case_key(2.0));
    }

    #[test]
    fn test_guard_counts_iterations() {
        let registry = FunctionRegistry::new();
        let env = Environment::new(&registry, Deadline::never()).with_max_loop_iterations(2);
        let mut guard = LoopGuard::new(&env, Span::new(4, 9));
        assert!(guard.tick(&env).is_ok());
        assert!(guard.tick(&env).is_ok());
        let Err(ControlAction::Error(err)) = guard.tick(&env) else {
            panic!("expected the third tick to fail");
        };
        assert_eq!(err.kind, crate::EvalErrorKind::IterationLimit { limit: 2 });
        assert_eq!(err.span, Some(Span::new(4, 9)));
    }

    #[test]
    fn test_guard_checks_deadline() {
        let registry = FunctionRegistry::new();
        let past = std::time::Instant::now();
        let env = Environment::new(&registry, Deadline::at(past));
        let mut guard = LoopGuard::new(&env, Span::DUMMY);
        let Err(ControlAction::Error(err)) = guard.tick(&env) else {
            panic!("expected a timeout");
        };
        assert!(err.is_timeout());
    }

    #[test]
    fn test_switch_falls_through_to_default() {
        let registry = FunctionRegistry::new();
        let mut env = Environment::new(&registry, Deadline::never());
        let mut index = FxHashMap::default();
        index.insert(case_key(1.0), 0);
        index.insert(case_key(2.0), 1);
        let table = SwitchTable::new(
            index,
            vec![constant(Some(10.0)), constant(Some(20.0))],
            Some(constant(Some(30.0))),
        );
        assert_eq!(table.dispatch(1.0, &mut env), Ok(Some(30.0)));
        assert_eq!(table.dispatch(7.0, &mut env), Ok(Some(30.0)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_switch_without_match_or_default() {
        let registry = FunctionRegistry::new();
        let mut env = Environment::new(&registry, Deadline::never());
        let table = SwitchTable::new(FxHashMap::default(), Vec::new(), None);
        assert_eq!(table.dispatch(1.0, &mut env), Ok(None));
        assert_eq!(table.dispatch(f64::NAN, &mut env), Ok(None));
    }

    #[test]
    fn test_break_keeps_value_at_break_point() {
        let registry = FunctionRegistry::new();
        let mut env = Environment::new(&registry, Deadline::never());
        let mut index = FxHashMap::default();
        index.insert(case_key(1.0), 0);
        let table = SwitchTable::new(
            index,
            vec![
                constant(Some(10.0)),
                compiled(|_| {
                    Err(ControlAction::Break {
                        value: None,
                        span: Span::DUMMY,
                    })
                }),
                constant(Some(99.0)),
            ],
            None,
        );
        assert_eq!(table.dispatch(1.0, &mut env), Ok(Some(10.0)));
    }
}
