//! Stack growth for deep recursion.
//!
//! Expression trees handed to the compiler come from user scripts, and a
//! script such as `1+1+1+...+1` nests as deep as it is long. Both the
//! compiler (one recursive call per node) and the compiled closure chain
//! (one nested call per node) recurse that deep, so both route through
//! [`ensure_sufficient_stack`].
//!
//! - **Native targets**: `stacker` allocates a fresh segment when less than
//!   [`RED_ZONE`] bytes remain.
//! - **WASM targets**: plain call.

/// Remaining-stack threshold below which a new segment is allocated (128KB).
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
pub const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
///
/// ```
/// use vex_stack::ensure_sufficient_stack;
///
/// fn depth(n: u32) -> u32 {
///     ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
/// }
/// assert_eq!(depth(1_000), 1_000);
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Remaining stack in bytes, when the platform can tell.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}

#[cfg(test)]
mod tests;
