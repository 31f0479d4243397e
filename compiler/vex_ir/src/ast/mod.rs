//! Syntax tree node definitions.
//!
//! Statements and expressions share one node type: every node evaluates to
//! an optional number, with statements such as loops producing no value when
//! their body never ran.

mod expr;
mod operators;

pub use expr::{Expr, ExprKind, SwitchCase};
pub use operators::{AssignOp, BinaryOp, PostfixOp, UnaryOp};

#[cfg(test)]
mod tests;
