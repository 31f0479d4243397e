#![allow(dead_code)]

use vex_eval::{
    CompileError, CompiledExpression, Deadline, Environment, EvalError, FunctionRegistry,
};
use vex_ir::{AstBuilder, ExprId, SharedInterner, Span, StringInterner};

/// Interner plus math registry, and helpers to build, compile and run trees.
pub struct Harness {
    pub interner: SharedInterner,
    pub registry: FunctionRegistry,
}

impl Harness {
    pub fn new() -> Self {
        Harness {
            interner: StringInterner::shared(),
            registry: FunctionRegistry::with_math(),
        }
    }

    pub fn compile(
        &self,
        build: impl FnOnce(&mut AstBuilder) -> ExprId,
    ) -> Result<CompiledExpression, CompileError> {
        let mut b = AstBuilder::new(&self.interner);
        let root = build(&mut b);
        let arena = b.finish();
        CompiledExpression::compile(&arena, root, &self.interner, &self.registry)
    }

    pub fn compiled(&self, build: impl FnOnce(&mut AstBuilder) -> ExprId) -> CompiledExpression {
        match self.compile(build) {
            Ok(expr) => expr,
            Err(err) => panic!("compile failed: {err}"),
        }
    }

    pub fn env(&self) -> Environment<'_> {
        Environment::new(&self.registry, Deadline::never())
    }

    /// Environment with `vars` bound as variables.
    pub fn env_with(&self, vars: &[(&str, f64)]) -> Environment<'_> {
        let mut env = self.env();
        for &(name, value) in vars {
            if let Err(err) = env.set_variable(self.interner.intern(name), value) {
                panic!("cannot bind {name}: {err:?}");
            }
        }
        env
    }

    pub fn eval(&self, build: impl FnOnce(&mut AstBuilder) -> ExprId) -> Result<Option<f64>, EvalError> {
        self.eval_with(&[], build)
    }

    pub fn eval_with(
        &self,
        vars: &[(&str, f64)],
        build: impl FnOnce(&mut AstBuilder) -> ExprId,
    ) -> Result<Option<f64>, EvalError> {
        let expr = self.compiled(build);
        let mut env = self.env_with(vars);
        expr.evaluate(&mut env)
    }

    pub fn get(&self, env: &Environment<'_>, name: &str) -> Option<f64> {
        env.get_slot_value(self.interner.intern(name)).ok()
    }
}

/// Records a node's span from inside a build closure.
pub fn remember(slot: &mut Option<Span>, b: &AstBuilder, id: ExprId) -> ExprId {
    *slot = Some(b.span(id));
    id
}
