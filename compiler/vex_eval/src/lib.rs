//! Vex Eval - compiles vex syntax trees into reusable evaluator closures.
//!
//! A tree is compiled once and evaluated many times, typically once per
//! voxel of a region:
//!
//! ```text
//! ExprArena + FunctionRegistry --Compiler--> CompiledExpression
//! CompiledExpression + Environment --evaluate--> Option<f64>
//! ```
//!
//! # Architecture
//!
//! - [`Compiler`]: resolves calls, folds constants, validates switches and
//!   assignment targets, and composes one boxed closure per node
//! - [`CompiledExpression`]: the immutable artifact; `Send + Sync`, so one
//!   instance can serve many worker threads
//! - [`Environment`]: per-run slots, the shared [`Deadline`] and a borrowed
//!   [`FunctionRegistry`]
//! - [`ControlAction`]: break, continue and return travel on the `Err` side
//!   of [`EvalResult`] next to real errors, so no combinator can mistake
//!   them for numbers
//!
//! Errors come in two phases: [`CompileError`] before anything runs and
//! [`EvalError`] for a failed run. Both convert to
//! [`vex_diagnostic::Diagnostic`].

mod compiler;
mod config;
mod control;
mod diagnostics;
mod environment;
pub mod errors;
mod expression;
pub mod registry;

use std::sync::Once;

pub use compiler::Compiler;
pub use config::{EvalConfig, DEFAULT_MAX_LOOP_ITERATIONS, DEFAULT_TIMEOUT};
pub use control::{ControlAction, EvalResult};
pub use environment::{Deadline, Environment, Slot, SlotError};
pub use errors::{
    CompileError, CompileErrorKind, CompileNote, ErrorCategory, EvalError, EvalErrorKind,
    ExpressionError,
};
pub use expression::CompiledExpression;
pub use registry::{FnId, FunctionError, FunctionRegistry, ParamKind, RegistryError, RegistryId};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set; safe to call repeatedly.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A host may already own the global subscriber.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
