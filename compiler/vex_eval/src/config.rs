//! Evaluation limits.

use std::time::Duration;

use crate::environment::Deadline;

/// Wall-clock budget for one run (or one scan sharing a deadline).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// Iterations a single loop execution may run before it is aborted.
pub const DEFAULT_MAX_LOOP_ITERATIONS: u32 = 256;

/// Limits applied to an [`Environment`](crate::Environment).
///
/// ```
/// use std::time::Duration;
/// use vex_eval::EvalConfig;
///
/// let config = EvalConfig::default()
///     .with_timeout(Duration::from_millis(50))
///     .with_max_loop_iterations(10_000);
/// assert_eq!(config.max_loop_iterations, 10_000);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    pub timeout: Duration,
    /// Counted per loop execution: a nested loop starts from zero each
    /// time it is entered.
    pub max_loop_iterations: u32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            timeout: DEFAULT_TIMEOUT,
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
        }
    }
}

impl EvalConfig {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_loop_iterations(mut self, limit: u32) -> Self {
        self.max_loop_iterations = limit;
        self
    }

    /// Absolute deadline `timeout` from now.
    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.timeout)
    }
}
