//! Tree to closure translation.
//!
//! Every node compiles to one boxed closure `Fn(&mut Environment) -> EvalResult`.
//! Parents capture their children's closures, so evaluation is a chain of
//! direct calls with no dispatch on node kind and no name lookups beyond
//! the slot table.
//!
//! Work done once, here, and never at evaluation time:
//! - call targets resolved by name and arity
//! - literals parsed, constant subtrees folded
//! - switch labels folded and checked for duplicates
//! - assignment targets checked
//! - `break`/`continue` placement checked
//!
//! Recursion runs under [`ensure_sufficient_stack`], and every
//! `STACK_CHECKPOINT_INTERVAL`th nesting level of the produced chain gets a
//! checkpoint of its own, so very deep trees neither overflow while
//! compiling nor while evaluating.

mod call;
mod control;
mod operators;

use rustc_hash::FxHashMap;
use vex_ir::{ExprArena, ExprId, ExprKind, ExprRange, Name, Span, StringInterner};
use vex_stack::ensure_sufficient_stack;

use crate::control::{compiled, is_truthy, value_of, CompiledFn, ControlAction};
use crate::errors::{malformed_number, CompileError};
use crate::expression::CompiledExpression;
use crate::registry::FunctionRegistry;

const STACK_CHECKPOINT_INTERVAL: u32 = 64;

/// Result of compiling one node.
enum Compiled {
    /// Folded at compile time.
    Constant(f64),
    Dynamic(CompiledFn),
}

impl Compiled {
    fn into_fn(self) -> CompiledFn {
        match self {
            Compiled::Constant(value) => compiled(move |_| Ok(Some(value))),
            Compiled::Dynamic(f) => f,
        }
    }

    fn constant(&self) -> Option<f64> {
        match self {
            Compiled::Constant(value) => Some(*value),
            Compiled::Dynamic(_) => None,
        }
    }
}

/// Closure producing no value.
fn nothing() -> CompiledFn {
    compiled(|_| Ok(None))
}

/// Translates one tree into a [`CompiledExpression`].
pub struct Compiler<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    registry: &'a FunctionRegistry,
    /// Enclosing loops; `continue` is valid when non-zero.
    loop_depth: u32,
    /// Enclosing loops and switches; `break` is valid when non-zero.
    breakable_depth: u32,
    depth: u32,
    node_count: usize,
    variables: FxHashMap<Name, &'static str>,
}

impl<'a> Compiler<'a> {
    pub fn new(
        arena: &'a ExprArena,
        interner: &'a StringInterner,
        registry: &'a FunctionRegistry,
    ) -> Self {
        Compiler {
            arena,
            interner,
            registry,
            loop_depth: 0,
            breakable_depth: 0,
            depth: 0,
            node_count: 0,
            variables: FxHashMap::default(),
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn compile(mut self, root: ExprId) -> Result<CompiledExpression, CompileError> {
        let compiled = self.compile_node(root)?;
        let folded = compiled.constant().is_some();
        let mut variables: Vec<(Name, &'static str)> = self.variables.into_iter().collect();
        variables.sort_unstable_by_key(|&(_, text)| text);

        tracing::debug!(
            nodes = self.node_count,
            variables = variables.len(),
            folded,
            "compiled expression"
        );
        Ok(CompiledExpression::new(
            compiled.into_fn(),
            self.registry.id(),
            self.node_count,
            variables.into_boxed_slice(),
        ))
    }

    fn compile_node(&mut self, id: ExprId) -> Result<Compiled, CompileError> {
        ensure_sufficient_stack(|| {
            self.depth += 1;
            self.node_count += 1;
            let result = self.compile_kind(id);
            let depth = self.depth;
            self.depth -= 1;

            match result? {
                Compiled::Dynamic(f) if depth % STACK_CHECKPOINT_INTERVAL == 0 => {
                    tracing::trace!(depth, "stack checkpoint");
                    Ok(Compiled::Dynamic(compiled(move |env| {
                        ensure_sufficient_stack(|| f(env))
                    })))
                }
                other => Ok(other),
            }
        })
    }

    fn compile_kind(&mut self, id: ExprId) -> Result<Compiled, CompileError> {
        let expr = *self.arena.get_expr(id);
        let span = expr.span;
        match expr.kind {
            // Expressions
            ExprKind::Constant(text) => self.compile_literal(text, span),
            ExprKind::Ident(name) => Ok(self.compile_ident(name, span)),
            ExprKind::Assign { op, target, value } => self.compile_assign(op, target, value),
            ExprKind::Unary { op, operand } => self.compile_unary(op, operand),
            ExprKind::Binary { op, left, right } => self.compile_binary(op, left, right),
            ExprKind::Postfix { op, operand } => self.compile_postfix(op, operand),
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => self.compile_guarded(cond, then_expr, Some(else_expr)),
            ExprKind::Call { func, args } => self.compile_call(func, args, span),

            // Statements
            ExprKind::Block(stmts) => self.compile_block(stmts),
            ExprKind::ExprStmt(inner) => self.compile_node(inner),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.compile_guarded(cond, then_branch, else_branch),
            ExprKind::While { cond, body } => self.compile_while(cond, body, span),
            ExprKind::DoWhile { body, cond } => self.compile_do_while(body, cond, span),
            ExprKind::For {
                init,
                cond,
                update,
                body,
            } => self.compile_for(init, cond, update, body, span),
            ExprKind::SimpleFor {
                counter,
                first,
                last,
                body,
            } => self.compile_simple_for(counter, first, last, body, span),
            ExprKind::Switch {
                scrutinee,
                cases,
                default,
            } => self.compile_switch(scrutinee, cases, default),
            ExprKind::Break => Ok(self.compile_break(span)),
            ExprKind::Continue => Ok(self.compile_continue(span)),
            ExprKind::Return(value) => self.compile_return(value),
        }
    }

    /// Record a variable the expression touches and return its text.
    fn variable(&mut self, name: Name) -> &'static str {
        let text = self.interner.lookup(name);
        self.variables.insert(name, text);
        text
    }

    fn compile_literal(&mut self, text: Name, span: Span) -> Result<Compiled, CompileError> {
        let raw = self.interner.lookup(text);
        raw.trim()
            .parse::<f64>()
            .map(Compiled::Constant)
            .map_err(|_| malformed_number(raw).with_span(span))
    }

    fn compile_ident(&mut self, name: Name, span: Span) -> Compiled {
        let text = self.variable(name);
        Compiled::Dynamic(compiled(move |env| match env.get_slot_value(name) {
            Ok(value) => Ok(Some(value)),
            Err(err) => Err(err.into_eval_error(text).with_span(span).into()),
        }))
    }

    /// Sequence of statements, valued by the last one that ran.
    ///
    /// Statements after an unconditional `break`/`continue`/`return` are
    /// still checked but left out of the chain.
    fn compile_block(&mut self, range: ExprRange) -> Result<Compiled, CompileError> {
        let arena = self.arena;
        let ids = arena.get_expr_list(range);
        let mut stmts = Vec::with_capacity(ids.len());
        let mut exited = false;
        for &id in ids {
            let stmt = self.compile_node(id)?;
            if exited {
                continue;
            }
            exited = arena.get_expr(id).kind.always_exits();
            stmts.push(stmt);
        }
        if stmts.len() < ids.len() {
            tracing::trace!(
                dropped = ids.len() - stmts.len(),
                "unreachable statements after exit"
            );
        }

        if stmts.len() <= 1 {
            return Ok(stmts
                .pop()
                .unwrap_or_else(|| Compiled::Dynamic(nothing())));
        }

        let stmts: Box<[CompiledFn]> = stmts.into_iter().map(Compiled::into_fn).collect();
        Ok(Compiled::Dynamic(compiled(move |env| {
            let mut last = None;
            for stmt in &*stmts {
                match stmt(env) {
                    Ok(value) => last = value,
                    Err(ControlAction::Break { value, span }) => {
                        return Err(ControlAction::Break {
                            value: value.or(last),
                            span,
                        });
                    }
                    Err(other) => return Err(other),
                }
            }
            Ok(last)
        })))
    }

    /// `if` and `?:`: pick one branch by the condition's truthiness.
    fn compile_guarded(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    ) -> Result<Compiled, CompileError> {
        let cond_span = self.arena.span(cond);
        let cond = self.compile_node(cond)?;
        let then_branch = self.compile_node(then_branch)?;
        let else_branch = match else_branch {
            Some(id) => self.compile_node(id)?,
            None => Compiled::Dynamic(nothing()),
        };

        if let Some(value) = cond.constant() {
            tracing::trace!(value, "folded condition");
            return Ok(if is_truthy(value) {
                then_branch
            } else {
                else_branch
            });
        }

        let cond = cond.into_fn();
        let then_branch = then_branch.into_fn();
        let else_branch = else_branch.into_fn();
        Ok(Compiled::Dynamic(compiled(move |env| {
            if is_truthy(value_of(cond(env)?, cond_span)?) {
                then_branch(env)
            } else {
                else_branch(env)
            }
        })))
    }

    fn compile_return(&mut self, value: Option<ExprId>) -> Result<Compiled, CompileError> {
        let value = match value {
            Some(id) => Some(self.compile_node(id)?.into_fn()),
            None => None,
        };
        Ok(Compiled::Dynamic(match value {
            Some(value) => compiled(move |env| Err(ControlAction::Return(value(env)?))),
            None => compiled(|_| Err(ControlAction::Return(None))),
        }))
    }
}
