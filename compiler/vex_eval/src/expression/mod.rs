//! The compiled artifact.

use std::fmt;

use rayon::prelude::*;
use vex_ir::{ExprArena, ExprId, Name, StringInterner};

use crate::compiler::Compiler;
use crate::control::{CompiledFn, ControlAction};
use crate::environment::Environment;
use crate::errors::{
    break_outside_loop, continue_outside_loop, input_arity, registry_mismatch, CompileError,
    EvalError,
};
use crate::registry::{FunctionRegistry, RegistryId};

/// An expression compiled once, evaluated any number of times.
///
/// Holds no mutable state, so one instance may be evaluated concurrently
/// from many threads, each with its own [`Environment`].
pub struct CompiledExpression {
    root: CompiledFn,
    registry: RegistryId,
    node_count: usize,
    /// Variables read or written, sorted by text.
    variables: Box<[(Name, &'static str)]>,
}

impl CompiledExpression {
    pub(crate) fn new(
        root: CompiledFn,
        registry: RegistryId,
        node_count: usize,
        variables: Box<[(Name, &'static str)]>,
    ) -> Self {
        CompiledExpression {
            root,
            registry,
            node_count,
            variables,
        }
    }

    /// Compile the tree rooted at `root`, resolving calls against `registry`.
    pub fn compile(
        arena: &ExprArena,
        root: ExprId,
        interner: &StringInterner,
        registry: &FunctionRegistry,
    ) -> Result<Self, CompileError> {
        Compiler::new(arena, interner, registry).compile(root)
    }

    /// Run once. `Ok(None)` when the expression produced no value.
    ///
    /// The environment must reference the registry the expression was
    /// compiled against.
    pub fn evaluate(&self, env: &mut Environment<'_>) -> Result<Option<f64>, EvalError> {
        if env.registry().id() != self.registry {
            return Err(registry_mismatch());
        }
        match (self.root)(env) {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Error(err)) => {
                if err.is_resource_exhausted() {
                    tracing::debug!(error = %err, "evaluation aborted");
                }
                Err(*err)
            }
            // Signals are only raised inside the construct that catches them.
            Err(ControlAction::Break { span, .. }) => Err(break_outside_loop().with_span(span)),
            Err(ControlAction::Continue { span }) => {
                Err(continue_outside_loop().with_span(span))
            }
        }
    }

    /// Run as a predicate: non-zero (or NaN) is true, no value is false.
    pub fn evaluate_truthy(&self, env: &mut Environment<'_>) -> Result<bool, EvalError> {
        Ok(self.evaluate(env)?.is_some_and(crate::control::is_truthy))
    }

    /// Evaluate once per row, binding `inputs[i]` to `row[i]` first.
    ///
    /// Every row must supply exactly one value per input. All rows share `env` and therefore its deadline. The first error
    /// aborts the whole scan.
    pub fn evaluate_points<R: AsRef<[f64]>>(
        &self,
        env: &mut Environment<'_>,
        inputs: &[Name],
        rows: &[R],
    ) -> Result<Vec<Option<f64>>, EvalError> {
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            self.bind(env, inputs, row.as_ref())?;
            results.push(self.evaluate(env)?);
        }
        tracing::debug!(rows = rows.len(), "evaluated points");
        Ok(results)
    }

    /// [`evaluate_points`](Self::evaluate_points) across rayon workers.
    ///
    /// Each row runs in a fresh clone of `base`, so results do not depend
    /// on which worker ran which row, and every clone carries the base
    /// deadline. Results keep row order.
    pub fn par_evaluate_points<R: AsRef<[f64]> + Sync>(
        &self,
        base: &Environment<'_>,
        inputs: &[Name],
        rows: &[R],
    ) -> Result<Vec<Option<f64>>, EvalError> {
        let results = rows
            .par_iter()
            .map(|row| {
                let mut env = base.clone();
                self.bind(&mut env, inputs, row.as_ref())?;
                self.evaluate(&mut env)
            })
            .collect::<Result<Vec<_>, _>>();
        tracing::debug!(
            rows = rows.len(),
            threads = rayon::current_num_threads(),
            ok = results.is_ok(),
            "evaluated points in parallel"
        );
        results
    }

    fn bind(&self, env: &mut Environment<'_>, inputs: &[Name], row: &[f64]) -> Result<(), EvalError> {
        if row.len() != inputs.len() {
            return Err(input_arity(inputs.len(), row.len()));
        }
        for (&name, &value) in inputs.iter().zip(row) {
            env.set_variable(name, value)
                .map_err(|err| err.into_eval_error(self.describe(name)))?;
        }
        Ok(())
    }

    fn describe(&self, name: Name) -> &'static str {
        self.variables
            .iter()
            .find(|&&(n, _)| n == name)
            .map_or("<input>", |&(_, text)| text)
    }

    /// Number of tree nodes compiled.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn registry_id(&self) -> RegistryId {
        self.registry
    }

    /// Names of the variables the expression reads or writes.
    pub fn variables(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variables.iter().map(|&(_, text)| text)
    }

    pub fn uses_variable(&self, name: Name) -> bool {
        self.variables.iter().any(|&(n, _)| n == name)
    }
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("registry", &self.registry)
            .field("node_count", &self.node_count)
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}
