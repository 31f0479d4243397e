//! Operators: numeric semantics and their compilation.
//!
//! All values are `f64`; comparisons and logic produce 1.0 or 0.0. Binary
//! and unary operators are bound to plain `fn` pointers at compile time and
//! the same functions fold constant subtrees, so folded and run-time
//! results can never disagree.

use std::sync::OnceLock;

use vex_ir::{AssignOp, BinaryOp, ExprId, ExprKind, Name, PostfixOp, Span, UnaryOp};

use super::{Compiled, Compiler};
use crate::control::{compiled, is_truthy, value_of};
use crate::errors::{not_assignable, CompileError};

/// Largest bit-pattern distance at which `~=` still holds.
pub(crate) const NEAR_EQ_ULPS: i64 = 450_359_963;

#[inline]
fn bool_value(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Map the bits of `value` to an `i64` that orders like the float itself.
#[inline]
fn ordered_bits(value: f64) -> i64 {
    let bits = value.to_bits() as i64;
    if bits < 0 {
        i64::MIN.wrapping_sub(bits)
    } else {
        bits
    }
}

/// `a ~= b`.
pub(crate) fn near_eq(a: f64, b: f64) -> bool {
    ordered_bits(a).wrapping_sub(ordered_bits(b)).wrapping_abs() <= NEAR_EQ_ULPS
}

fn shl(l: f64, r: f64) -> f64 {
    (l as i64).wrapping_shl(r as i64 as u32) as f64
}

fn shr(l: f64, r: f64) -> f64 {
    (l as i64).wrapping_shr(r as i64 as u32) as f64
}

const FACTORIAL_LIMIT: usize = 171;

fn factorials() -> &'static [f64; FACTORIAL_LIMIT] {
    static TABLE: OnceLock<[f64; FACTORIAL_LIMIT]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [1.0; FACTORIAL_LIMIT];
        for n in 1..FACTORIAL_LIMIT {
            table[n] = table[n - 1] * n as f64;
        }
        table
    })
}

/// `x!`, over `x` truncated to an integer. Negative integers and NaN give 0.
pub(crate) fn factorial(value: f64) -> f64 {
    let n = value.trunc();
    if n.is_nan() || n < 0.0 {
        return 0.0;
    }
    if n >= FACTORIAL_LIMIT as f64 {
        return f64::INFINITY;
    }
    factorials()[n as usize]
}

pub(crate) fn binary_fn(op: BinaryOp) -> fn(f64, f64) -> f64 {
    match op {
        BinaryOp::Add => |l, r| l + r,
        BinaryOp::Sub => |l, r| l - r,
        BinaryOp::Mul => |l, r| l * r,
        BinaryOp::Div => |l, r| l / r,
        BinaryOp::Mod => |l, r| l % r,
        BinaryOp::Pow => f64::powf,
        BinaryOp::Shl => shl,
        BinaryOp::Shr => shr,
        BinaryOp::Lt => |l, r| bool_value(l < r),
        BinaryOp::LtEq => |l, r| bool_value(l <= r),
        BinaryOp::Gt => |l, r| bool_value(l > r),
        BinaryOp::GtEq => |l, r| bool_value(l >= r),
        BinaryOp::Eq => |l, r| bool_value(l == r),
        BinaryOp::NotEq => |l, r| bool_value(l != r),
        BinaryOp::NearEq => |l, r| bool_value(near_eq(l, r)),
        // Only reached when both sides are constants.
        BinaryOp::And => |l, r| bool_value(is_truthy(l) && is_truthy(r)),
        BinaryOp::Or => |l, r| bool_value(is_truthy(l) || is_truthy(r)),
    }
}

impl Compiler<'_> {
    pub(super) fn compile_binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    ) -> Result<Compiled, CompileError> {
        let left_span = self.arena.span(left);
        let right_span = self.arena.span(right);
        let left = self.compile_node(left)?;
        let right = self.compile_node(right)?;

        if let (Some(l), Some(r)) = (left.constant(), right.constant()) {
            let value = binary_fn(op)(l, r);
            tracing::trace!(op = op.as_symbol(), value, "folded binary");
            return Ok(Compiled::Constant(value));
        }

        let f = match op {
            BinaryOp::And => {
                let (left, right) = (left.into_fn(), right.into_fn());
                compiled(move |env| {
                    if !is_truthy(value_of(left(env)?, left_span)?) {
                        return Ok(Some(0.0));
                    }
                    Ok(Some(bool_value(is_truthy(value_of(right(env)?, right_span)?))))
                })
            }
            BinaryOp::Or => {
                let (left, right) = (left.into_fn(), right.into_fn());
                compiled(move |env| {
                    if is_truthy(value_of(left(env)?, left_span)?) {
                        return Ok(Some(1.0));
                    }
                    Ok(Some(bool_value(is_truthy(value_of(right(env)?, right_span)?))))
                })
            }
            _ => {
                let apply = binary_fn(op);
                match (left, right) {
                    (Compiled::Dynamic(left), Compiled::Constant(r)) => {
                        compiled(move |env| Ok(Some(apply(value_of(left(env)?, left_span)?, r))))
                    }
                    (Compiled::Constant(l), Compiled::Dynamic(right)) => {
                        compiled(move |env| Ok(Some(apply(l, value_of(right(env)?, right_span)?))))
                    }
                    (left, right) => {
                        let (left, right) = (left.into_fn(), right.into_fn());
                        compiled(move |env| {
                            let l = value_of(left(env)?, left_span)?;
                            let r = value_of(right(env)?, right_span)?;
                            Ok(Some(apply(l, r)))
                        })
                    }
                }
            }
        };
        Ok(Compiled::Dynamic(f))
    }

    pub(super) fn compile_unary(
        &mut self,
        op: UnaryOp,
        operand: ExprId,
    ) -> Result<Compiled, CompileError> {
        let apply: fn(f64) -> f64 = match op {
            UnaryOp::PreIncrement => {
                return self.compile_step(operand, 1.0, Fixity::Prefix, op.as_symbol());
            }
            UnaryOp::PreDecrement => {
                return self.compile_step(operand, -1.0, Fixity::Prefix, op.as_symbol());
            }
            UnaryOp::Not => |v| bool_value(!is_truthy(v)),
            UnaryOp::Complement => |v| !(v as i64) as f64,
            UnaryOp::Neg => |v| -v,
            UnaryOp::Plus => |v| v,
        };
        self.compile_pure_unary(operand, apply, op.as_symbol())
    }

    pub(super) fn compile_postfix(
        &mut self,
        op: PostfixOp,
        operand: ExprId,
    ) -> Result<Compiled, CompileError> {
        match op {
            PostfixOp::Factorial => self.compile_pure_unary(operand, factorial, op.as_symbol()),
            PostfixOp::PostIncrement => {
                self.compile_step(operand, 1.0, Fixity::Postfix, op.as_symbol())
            }
            PostfixOp::PostDecrement => {
                self.compile_step(operand, -1.0, Fixity::Postfix, op.as_symbol())
            }
        }
    }

    fn compile_pure_unary(
        &mut self,
        operand: ExprId,
        apply: fn(f64) -> f64,
        symbol: &'static str,
    ) -> Result<Compiled, CompileError> {
        let span = self.arena.span(operand);
        let operand = self.compile_node(operand)?;
        if let Some(value) = operand.constant() {
            tracing::trace!(op = symbol, "folded unary");
            return Ok(Compiled::Constant(apply(value)));
        }
        let operand = operand.into_fn();
        Ok(Compiled::Dynamic(compiled(move |env| {
            Ok(Some(apply(value_of(operand(env)?, span)?)))
        })))
    }

    /// `++x`, `--x`, `x++`, `x--` on an existing variable.
    fn compile_step(
        &mut self,
        operand: ExprId,
        delta: f64,
        fixity: Fixity,
        symbol: &'static str,
    ) -> Result<Compiled, CompileError> {
        let (name, text, span) = self.assignable(operand, symbol)?;
        Ok(Compiled::Dynamic(match fixity {
            Fixity::Prefix => compiled(move |env| {
                let slot = env
                    .get_variable(name)
                    .map_err(|err| err.into_eval_error(text).with_span(span))?;
                *slot += delta;
                Ok(Some(*slot))
            }),
            Fixity::Postfix => compiled(move |env| {
                let slot = env
                    .get_variable(name)
                    .map_err(|err| err.into_eval_error(text).with_span(span))?;
                let old = *slot;
                *slot = old + delta;
                Ok(Some(old))
            }),
        }))
    }

    pub(super) fn compile_assign(
        &mut self,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    ) -> Result<Compiled, CompileError> {
        let (name, text, span) = self.assignable(target, op.as_symbol())?;
        let value_span = self.arena.span(value);
        let rhs = self.compile_node(value)?.into_fn();

        let f = match op.binary_op() {
            // `=` creates the variable; compound forms need an existing one.
            None => compiled(move |env| {
                let value = value_of(rhs(env)?, value_span)?;
                let slot = env
                    .init_variable(name)
                    .map_err(|err| err.into_eval_error(text).with_span(span))?;
                *slot = value;
                Ok(Some(value))
            }),
            Some(op) => {
                let apply = binary_fn(op);
                compiled(move |env| {
                    let value = value_of(rhs(env)?, value_span)?;
                    let slot = env
                        .get_variable(name)
                        .map_err(|err| err.into_eval_error(text).with_span(span))?;
                    *slot = apply(*slot, value);
                    Ok(Some(*slot))
                })
            }
        };
        Ok(Compiled::Dynamic(f))
    }

    /// The variable named by an assignment or step target.
    pub(super) fn assignable(
        &mut self,
        target: ExprId,
        symbol: &'static str,
    ) -> Result<(Name, &'static str, Span), CompileError> {
        let expr = *self.arena.get_expr(target);
        let ExprKind::Ident(name) = expr.kind else {
            return Err(not_assignable(symbol).with_span(expr.span));
        };
        self.node_count += 1;
        Ok((name, self.variable(name), expr.span))
    }
}

#[derive(Copy, Clone)]
enum Fixity {
    Prefix,
    Postfix,
}
