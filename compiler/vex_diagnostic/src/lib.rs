//! Diagnostics for vex expressions.
//!
//! Every compile and evaluation failure converts into a [`Diagnostic`]:
//! - an [`ErrorCode`] for searchability
//! - a message saying what went wrong
//! - a primary [`Label`] saying where, plus secondary labels for related
//!   locations (the first of two duplicate `case` labels, for instance)
//! - notes
//!
//! [`emitter::render`] turns a diagnostic plus the script text into the
//! plain-text form hosts print to a player or a log.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::{ErrorCode, Phase};
