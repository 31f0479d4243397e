//! Loops, switch and non-local exits.

mod common;

use common::{remember, Harness};
use pretty_assertions::assert_eq;
use vex_eval::{EvalConfig, EvalErrorKind, Environment};
use vex_ir::{AssignOp, AstBuilder, BinaryOp, ExprId, PostfixOp};

/// `name < limit`
fn below(b: &mut AstBuilder, name: &str, limit: f64) -> ExprId {
    let var = b.ident(name);
    let limit = b.num(limit);
    b.binary(BinaryOp::Lt, var, limit)
}

/// `name++`
fn bump(b: &mut AstBuilder, name: &str) -> ExprId {
    let var = b.ident(name);
    b.postfix(PostfixOp::PostIncrement, var)
}

#[test]
fn test_while_counts() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let cond = below(b, "i", 5.0);
        let body = bump(b, "i");
        b.while_(cond, body)
    });
    let mut env = h.env_with(&[("i", 0.0)]);
    // Last body value is the post-increment result of the final pass.
    assert_eq!(expr.evaluate(&mut env), Ok(Some(4.0)));
    assert_eq!(h.get(&env, "i"), Some(5.0));
}

#[test]
fn test_while_that_never_runs_has_no_value() {
    let h = Harness::new();
    let result = h.eval_with(&[("i", 9.0)], |b| {
        let cond = below(b, "i", 5.0);
        let body = bump(b, "i");
        b.while_(cond, body)
    });
    assert_eq!(result, Ok(None));
}

#[test]
fn test_do_while_runs_body_first() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let body = bump(b, "i");
        let cond = below(b, "i", 0.0);
        b.do_while(body, cond)
    });
    let mut env = h.env_with(&[("i", 10.0)]);
    assert_eq!(expr.evaluate(&mut env), Ok(Some(10.0)));
    assert_eq!(h.get(&env, "i"), Some(11.0));
}

/// `for (i = 0; i < 10; i++) { if (i % 2) continue; evens++; }`
#[test]
fn test_continue_skips_to_update() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let zero = b.num(0.0);
        let init = b.set("i", zero);
        let cond = below(b, "i", 10.0);
        let update = bump(b, "i");

        let i = b.ident("i");
        let two = b.num(2.0);
        let odd = b.binary(BinaryOp::Mod, i, two);
        let cont = b.continue_();
        let skip = b.if_(odd, cont, None);
        let count = bump(b, "evens");
        let body = b.block(&[skip, count]);
        b.for_(Some(init), Some(cond), Some(update), body)
    });
    let mut env = h.env_with(&[("evens", 0.0)]);
    assert!(expr.evaluate(&mut env).is_ok());
    assert_eq!(h.get(&env, "evens"), Some(5.0));
    assert_eq!(h.get(&env, "i"), Some(10.0));
}

/// `for (;;) { if (++n == 4) break; }`
#[test]
fn test_for_without_condition() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let n = b.ident("n");
        let pre = b.unary(vex_ir::UnaryOp::PreIncrement, n);
        let four = b.num(4.0);
        let done = b.binary(BinaryOp::Eq, pre, four);
        let brk = b.break_();
        let body = b.if_(done, brk, None);
        b.for_(None, None, None, body)
    });
    let mut env = h.env_with(&[("n", 0.0)]);
    assert!(expr.evaluate(&mut env).is_ok());
    assert_eq!(h.get(&env, "n"), Some(4.0));
}

/// `for (k = 1, 4) total += k;`
#[test]
fn test_simple_for_is_inclusive() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let first = b.num(1.0);
        let last = b.num(4.0);
        let k = b.ident("k");
        let body = b.update("total", AssignOp::Add, k);
        b.simple_for("k", first, last, body)
    });
    let mut env = h.env_with(&[("total", 0.0)]);
    assert_eq!(expr.evaluate(&mut env), Ok(Some(10.0)));
    assert_eq!(h.get(&env, "k"), Some(4.0));
}

/// `for (k = 1, 3) { k = 100; n++; }` still runs three times.
#[test]
fn test_simple_for_counter_writes_do_not_change_trip_count() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let first = b.num(1.0);
        let last = b.num(3.0);
        let hundred = b.num(100.0);
        let clobber = b.set("k", hundred);
        let count = bump(b, "n");
        let body = b.block(&[clobber, count]);
        b.simple_for("k", first, last, body)
    });
    let mut env = h.env_with(&[("n", 0.0)]);
    assert!(expr.evaluate(&mut env).is_ok());
    assert_eq!(h.get(&env, "n"), Some(3.0));
}

#[test]
fn test_simple_for_counter_cannot_be_constant() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let first = b.num(1.0);
        let last = b.num(3.0);
        let body = b.block(&[]);
        b.simple_for("pi", first, last, body)
    });
    let mut env = h.env();
    env.define_standard_constants(&h.interner);
    let err = expr.evaluate(&mut env).err().map(|e| e.kind);
    assert_eq!(
        err,
        Some(EvalErrorKind::ConstantReassignment {
            name: "pi".to_string()
        })
    );
}

/// Break in an inner loop leaves only the inner loop.
#[test]
fn test_nested_break_unwinds_one_level() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let zero = b.num(0.0);
        let init_i = b.set("i", zero);
        let cond_i = below(b, "i", 3.0);
        let update_i = bump(b, "i");

        let zero = b.num(0.0);
        let init_j = b.set("j", zero);
        let cond_j = below(b, "j", 100.0);
        let update_j = bump(b, "j");
        let count = bump(b, "inner");
        let j = b.ident("j");
        let one = b.num(1.0);
        let stop = b.binary(BinaryOp::Eq, j, one);
        let brk = b.break_();
        let check = b.if_(stop, brk, None);
        let inner_body = b.block(&[count, check]);
        let inner = b.for_(Some(init_j), Some(cond_j), Some(update_j), inner_body);

        b.for_(Some(init_i), Some(cond_i), Some(update_i), inner)
    });
    let mut env = h.env_with(&[("inner", 0.0)]);
    assert!(expr.evaluate(&mut env).is_ok());
    assert_eq!(h.get(&env, "i"), Some(3.0));
    assert_eq!(h.get(&env, "inner"), Some(6.0));
}

/// The ceiling is per loop execution: 4 outer x 4 inner runs under a limit of 5.
#[test]
fn test_iteration_limit_restarts_for_each_inner_loop() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let first = b.num(1.0);
        let last = b.num(4.0);
        let first_inner = b.num(1.0);
        let last_inner = b.num(4.0);
        let count = bump(b, "n");
        let inner = b.simple_for("j", first_inner, last_inner, count);
        b.simple_for("i", first, last, inner)
    });
    let config = EvalConfig::default().with_max_loop_iterations(5);
    let mut env = Environment::with_config(&h.registry, &config);
    assert_eq!(env.set_variable(h.interner.intern("n"), 0.0), Ok(()));
    assert!(expr.evaluate(&mut env).is_ok());
    assert_eq!(h.get(&env, "n"), Some(16.0));
}

#[test]
fn test_iteration_limit_points_at_loop() {
    let h = Harness::new();
    let mut span = None;
    let expr = h.compiled(|b| {
        let first = b.num(1.0);
        let last = b.num(10.0);
        let body = b.block(&[]);
        let for_loop = b.simple_for("i", first, last, body);
        remember(&mut span, b, for_loop)
    });
    let config = EvalConfig::default().with_max_loop_iterations(3);
    let mut env = Environment::with_config(&h.registry, &config);
    let err = expr.evaluate(&mut env).err();
    assert_eq!(
        err.as_ref().map(|e| &e.kind),
        Some(&EvalErrorKind::IterationLimit { limit: 3 })
    );
    assert_eq!(err.and_then(|e| e.span), span);
}

/// `return` leaves every enclosing loop.
#[test]
fn test_return_from_nested_loops() {
    let h = Harness::new();
    let result = h.eval(|b| {
        let first = b.num(1.0);
        let last = b.num(10.0);
        let first_inner = b.num(1.0);
        let last_inner = b.num(10.0);

        let i = b.ident("i");
        let j = b.ident("j");
        let product = b.binary(BinaryOp::Mul, i, j);
        let twelve = b.num(12.0);
        let hit = b.binary(BinaryOp::Eq, product, twelve);
        let i = b.ident("i");
        let hundred = b.num(100.0);
        let scaled = b.binary(BinaryOp::Mul, i, hundred);
        let j = b.ident("j");
        let code = b.binary(BinaryOp::Add, scaled, j);
        let ret = b.return_(Some(code));
        let body = b.if_(hit, ret, None);

        let inner = b.simple_for("j", first_inner, last_inner, body);
        let outer = b.simple_for("i", first, last, inner);
        let never = b.num(-1.0);
        b.block(&[outer, never])
    });
    assert_eq!(result, Ok(Some(206.0)));
}

/// `continue` inside a switch continues the enclosing loop.
#[test]
fn test_continue_through_switch() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let first = b.num(1.0);
        let last = b.num(5.0);

        let i = b.ident("i");
        let two = b.num(2.0);
        let cont = b.continue_();
        let four = b.num(4.0);
        let cont_again = b.continue_();
        let switch = b.switch(i, &[(two, cont), (four, cont_again)], None);
        let count = bump(b, "n");
        let body = b.block(&[switch, count]);
        b.simple_for("i", first, last, body)
    });
    let mut env = h.env_with(&[("n", 0.0)]);
    assert!(expr.evaluate(&mut env).is_ok());
    assert_eq!(h.get(&env, "n"), Some(3.0));
}

/// `switch (1) { case 1: continue; }` outside any loop.
#[test]
fn test_continue_in_switch_outside_loop_is_an_error() {
    let h = Harness::new();
    let mut span = None;
    let err = h
        .eval(|b| {
            let one = b.num(1.0);
            let label = b.num(1.0);
            let cont = b.continue_();
            let cont = remember(&mut span, b, cont);
            b.switch(one, &[(label, cont)], None)
        })
        .err();
    assert_eq!(
        err.as_ref().map(|e| &e.kind),
        Some(&EvalErrorKind::ContinueOutsideLoop)
    );
    assert_eq!(err.and_then(|e| e.span), span);
}

#[test]
fn test_switch_default_and_break_value() {
    let h = Harness::new();
    let expr = h.compiled(|b| {
        let v = b.ident("v");
        let one = b.num(1.0);
        let ten = b.num(10.0);
        let brk = b.break_();
        let first = b.block(&[ten, brk]);
        let default = b.num(99.0);
        b.switch(v, &[(one, first)], Some(default))
    });
    let mut env = h.env_with(&[("v", 1.0)]);
    assert_eq!(expr.evaluate(&mut env), Ok(Some(10.0)));
    let mut env = h.env_with(&[("v", 7.0)]);
    assert_eq!(expr.evaluate(&mut env), Ok(Some(99.0)));
}

#[test]
fn test_switch_matches_negative_zero() {
    let h = Harness::new();
    let result = h.eval_with(&[("v", -0.0)], |b| {
        let v = b.ident("v");
        let zero = b.num(0.0);
        let hit = b.num(1.0);
        b.switch(v, &[(zero, hit)], None)
    });
    assert_eq!(result, Ok(Some(1.0)));
}

#[test]
fn test_if_without_else_has_no_value() {
    let h = Harness::new();
    let result = h.eval_with(&[("x", 0.0)], |b| {
        let x = b.ident("x");
        let one = b.num(1.0);
        b.if_(x, one, None)
    });
    assert_eq!(result, Ok(None));
}
