//! Native function calls.

use smallvec::SmallVec;
use vex_ir::{ExprKind, ExprRange, Name, Span};

use super::{Compiled, Compiler};
use crate::control::{compiled, value_of, CompiledFn, ControlAction};
use crate::environment::{Environment, Slot, SlotError};
use crate::errors::{
    function_failed, reference_argument, registry_mismatch, unknown_function, CompileError,
};
use crate::registry::ParamKind;

/// One compiled argument.
enum CallArg {
    Value {
        run: CompiledFn,
        span: Span,
    },
    /// A variable passed in/out.
    Reference {
        name: Name,
        text: &'static str,
        span: Span,
    },
}

/// Copy-in value of a reference argument. An unbound variable reads as 0
/// and is only created by the write-back after a successful call.
#[inline]
fn reference_value(
    env: &Environment<'_>,
    name: Name,
    text: &str,
    span: Span,
) -> Result<f64, ControlAction> {
    match env.slot(name) {
        Some(Slot::Variable(value)) => Ok(value),
        Some(Slot::Constant(_)) => Err(SlotError::Constant
            .into_eval_error(text)
            .with_span(span)
            .into()),
        None => Ok(0.0),
    }
}

impl Compiler<'_> {
    pub(super) fn compile_call(
        &mut self,
        func: Name,
        args: ExprRange,
        span: Span,
    ) -> Result<Compiled, CompileError> {
        let arena = self.arena;
        let registry = self.registry;
        let function_name = self.interner.lookup(func);
        let arg_ids = arena.get_expr_list(args);

        let Some(id) = registry.resolve(function_name, arg_ids.len()) else {
            let mut err = unknown_function(function_name, arg_ids.len()).with_span(span);
            let arities = registry.arities(function_name);
            if !arities.is_empty() {
                let arities: Vec<String> = arities.iter().map(ToString::to_string).collect();
                err = err.with_note(format!(
                    "`{function_name}` takes {} argument(s)",
                    arities.join(" or ")
                ));
            }
            return Err(err);
        };
        let params = registry.function(id).map_or(&[][..], |f| f.params());

        let mut compiled_args = Vec::with_capacity(arg_ids.len());
        for (position, (&arg, &kind)) in arg_ids.iter().zip(params).enumerate() {
            let arg_span = arena.span(arg);
            compiled_args.push(match kind {
                ParamKind::Value => CallArg::Value {
                    run: self.compile_node(arg)?.into_fn(),
                    span: arg_span,
                },
                ParamKind::Reference => {
                    let ExprKind::Ident(name) = arena.get_expr(arg).kind else {
                        return Err(reference_argument(function_name, position + 1)
                            .with_span(arg_span));
                    };
                    self.node_count += 1;
                    CallArg::Reference {
                        name,
                        text: self.variable(name),
                        span: arg_span,
                    }
                }
            });
        }
        let args: Box<[CallArg]> = compiled_args.into_boxed_slice();
        let has_references = args
            .iter()
            .any(|arg| matches!(arg, CallArg::Reference { .. }));
        tracing::trace!(function = function_name, arity = args.len(), "resolved call");

        Ok(Compiled::Dynamic(compiled(move |env| {
            let mut values: SmallVec<[f64; 4]> = SmallVec::with_capacity(args.len());
            for arg in &*args {
                values.push(match arg {
                    CallArg::Value { run, span } => value_of(run(env)?, *span)?,
                    CallArg::Reference { name, text, span } => {
                        reference_value(env, *name, text, *span)?
                    }
                });
            }

            let Some(function) = env.registry().function(id) else {
                return Err(registry_mismatch().with_span(span).into());
            };
            let result = function
                .call(&mut values)
                .map_err(|err| function_failed(function_name, err.message()).with_span(span))?;

            if has_references {
                for (arg, value) in args.iter().zip(&values) {
                    if let CallArg::Reference { name, text, span } = arg {
                        env.set_variable(*name, *value)
                            .map_err(|err| err.into_eval_error(text).with_span(*span))?;
                    }
                }
            }
            Ok(Some(result))
        })))
    }
}
