//! Loops, switch, break and continue.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use vex_ir::{CaseRange, ExprId, Name, Span};

use super::{Compiled, Compiler};
use crate::control::{
    case_key, compiled, run_counted, run_do_while, run_loop, value_of, CompiledFn, ControlAction,
    LoopParts, SwitchTable,
};
use crate::errors::{
    break_outside_loop, case_label_not_constant, continue_outside_loop, duplicate_case,
    CompileError,
};

impl Compiler<'_> {
    /// Compile `f` as the body of a loop.
    fn in_loop<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.loop_depth += 1;
        self.breakable_depth += 1;
        let result = f(self);
        self.loop_depth -= 1;
        self.breakable_depth -= 1;
        result
    }

    /// Compile `f` as the cases of a switch: `break` is valid, `continue`
    /// still refers to the enclosing loop.
    fn in_switch<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.breakable_depth += 1;
        let result = f(self);
        self.breakable_depth -= 1;
        result
    }

    /// A value-producing operand and its span.
    fn operand(&mut self, id: ExprId) -> Result<(CompiledFn, Span), CompileError> {
        let span = self.arena.span(id);
        Ok((self.compile_node(id)?.into_fn(), span))
    }

    fn optional(&mut self, id: Option<ExprId>) -> Result<Option<CompiledFn>, CompileError> {
        match id {
            Some(id) => Ok(Some(self.compile_node(id)?.into_fn())),
            None => Ok(None),
        }
    }

    pub(super) fn compile_while(
        &mut self,
        cond: ExprId,
        body: ExprId,
        span: Span,
    ) -> Result<Compiled, CompileError> {
        let cond = self.operand(cond)?;
        let body = self.in_loop(|c| c.compile_node(body))?.into_fn();
        let parts = LoopParts {
            init: None,
            cond: Some(cond),
            update: None,
            body,
            span,
        };
        Ok(Compiled::Dynamic(compiled(move |env| run_loop(&parts, env))))
    }

    pub(super) fn compile_do_while(
        &mut self,
        body: ExprId,
        cond: ExprId,
        span: Span,
    ) -> Result<Compiled, CompileError> {
        let body = self.in_loop(|c| c.compile_node(body))?.into_fn();
        let cond = self.operand(cond)?;
        let parts = LoopParts {
            init: None,
            cond: Some(cond),
            update: None,
            body,
            span,
        };
        Ok(Compiled::Dynamic(compiled(move |env| run_do_while(&parts, env))))
    }

    pub(super) fn compile_for(
        &mut self,
        init: Option<ExprId>,
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: ExprId,
        span: Span,
    ) -> Result<Compiled, CompileError> {
        let init = self.optional(init)?;
        let cond = match cond {
            Some(id) => Some(self.operand(id)?),
            None => None,
        };
        let update = self.optional(update)?;
        let body = self.in_loop(|c| c.compile_node(body))?.into_fn();
        let parts = LoopParts {
            init,
            cond,
            update,
            body,
            span,
        };
        Ok(Compiled::Dynamic(compiled(move |env| run_loop(&parts, env))))
    }

    pub(super) fn compile_simple_for(
        &mut self,
        counter: Name,
        first: ExprId,
        last: ExprId,
        body: ExprId,
        span: Span,
    ) -> Result<Compiled, CompileError> {
        let text = self.variable(counter);
        let (first, first_span) = self.operand(first)?;
        let (last, last_span) = self.operand(last)?;
        let body = self.in_loop(|c| c.compile_node(body))?.into_fn();

        Ok(Compiled::Dynamic(compiled(move |env| {
            let bounds = (
                value_of(first(env)?, first_span)?,
                value_of(last(env)?, last_span)?,
            );
            run_counted(
                bounds,
                |env, value| {
                    *env.init_variable(counter)
                        .map_err(|err| err.into_eval_error(text).with_span(span))? = value;
                    Ok(())
                },
                &body,
                span,
                env,
            )
        })))
    }

    pub(super) fn compile_switch(
        &mut self,
        scrutinee: ExprId,
        cases: CaseRange,
        default: Option<ExprId>,
    ) -> Result<Compiled, CompileError> {
        let (scrutinee, scrutinee_span) = self.operand(scrutinee)?;
        let table = self.in_switch(|c| c.compile_cases(cases, default))?;
        tracing::trace!(cases = table.len(), "compiled switch");

        Ok(Compiled::Dynamic(compiled(move |env| {
            let value = value_of(scrutinee(env)?, scrutinee_span)?;
            table.dispatch(value, env)
        })))
    }

    fn compile_cases(
        &mut self,
        cases: CaseRange,
        default: Option<ExprId>,
    ) -> Result<SwitchTable, CompileError> {
        let arena = self.arena;
        let cases = arena.get_cases(cases);
        // Case value key to (body index, label span).
        let mut seen: FxHashMap<u64, (usize, Span)> = FxHashMap::default();
        let mut bodies = Vec::with_capacity(cases.len());

        for (position, case) in cases.iter().enumerate() {
            let label_span = arena.span(case.label);
            let Some(value) = self.compile_node(case.label)?.constant() else {
                return Err(case_label_not_constant().with_span(label_span));
            };
            // NaN equals nothing, so a NaN case can never be selected.
            if !value.is_nan() {
                match seen.entry(case_key(value)) {
                    Entry::Occupied(first) => {
                        let (_, first_span) = *first.get();
                        return Err(duplicate_case(value)
                            .with_span(label_span)
                            .with_related("first case with this value", first_span));
                    }
                    Entry::Vacant(slot) => {
                        slot.insert((position, label_span));
                    }
                }
            }
            bodies.push(self.compile_node(case.body)?.into_fn());
        }

        let default = self.optional(default)?;
        let index = seen
            .into_iter()
            .map(|(key, (position, _))| (key, position))
            .collect();
        Ok(SwitchTable::new(index, bodies, default))
    }

    pub(super) fn compile_break(&self, span: Span) -> Compiled {
        Compiled::Dynamic(if self.breakable_depth > 0 {
            compiled(move |_| Err(ControlAction::Break { value: None, span }))
        } else {
            tracing::debug!(%span, "`break` outside loop or switch");
            compiled(move |_| Err(break_outside_loop().with_span(span).into()))
        })
    }

    pub(super) fn compile_continue(&self, span: Span) -> Compiled {
        Compiled::Dynamic(if self.loop_depth > 0 {
            compiled(move |_| Err(ControlAction::Continue { span }))
        } else {
            tracing::debug!(%span, "`continue` outside loop");
            compiled(move |_| Err(continue_outside_loop().with_span(span).into()))
        })
    }
}
