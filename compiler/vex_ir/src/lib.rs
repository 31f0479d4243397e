//! Vex IR - syntax tree types for vex expressions.
//!
//! Vex is the small procedural scripting language used to describe shapes,
//! per-voxel predicates and coordinate deformations. The text parser lives
//! outside this workspace; it hands the evaluator an [`ExprArena`] built from
//! the types in this crate.
//!
//! - [`Span`]: byte offsets for diagnostics
//! - [`Name`] / [`StringInterner`]: interned identifiers
//! - [`ExprArena`] / [`ExprId`]: flat, append-only node storage
//! - [`ExprKind`]: statement and expression variants
//! - [`AstBuilder`]: programmatic tree construction
//!
//! Nodes are `Copy` and refer to children by index, never by `Box`. The
//! compiler only ever reads the arena.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod builder;
mod expr_id;
mod interner;
mod name;
mod span;

pub use arena::ExprArena;
pub use ast::{AssignOp, BinaryOp, Expr, ExprKind, PostfixOp, SwitchCase, UnaryOp};
pub use builder::AstBuilder;
pub use expr_id::{CaseRange, ExprId, ExprRange};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
