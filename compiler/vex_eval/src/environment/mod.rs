//! Per-run state: named slots, the deadline and the function registry.
//!
//! An environment is mutated by the run that owns it and must not be shared
//! between threads while a run is in flight. It is `Clone`, so a host can
//! prepare one base environment (inputs, constants, deadline) and fork it per
//! worker; the clones share the same absolute [`Deadline`].

use std::fmt;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use vex_ir::{Name, StringInterner};

use crate::config::EvalConfig;
use crate::errors::{constant_reassignment, timeout, uninitialized_variable, EvalError};
use crate::registry::FunctionRegistry;

/// A named binding.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Slot {
    Variable(f64),
    /// Set by the host; scripts may read it but never assign it.
    Constant(f64),
}

impl Slot {
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Slot::Variable(value) | Slot::Constant(value) => value,
        }
    }

    #[inline]
    pub fn is_constant(self) -> bool {
        matches!(self, Slot::Constant(_))
    }
}

/// Why a slot could not be used as a variable.
///
/// Typed so the compiled closures can name the variable and attach the
/// offending node's span.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotError {
    /// Never assigned.
    Uninitialized,
    /// Bound to a constant.
    Constant,
}

impl SlotError {
    /// Descriptive error for the variable `name`.
    #[cold]
    pub fn into_eval_error(self, name: &str) -> EvalError {
        match self {
            SlotError::Uninitialized => uninitialized_variable(name),
            SlotError::Constant => constant_reassignment(name),
        }
    }
}

/// Absolute wall-clock cutoff.
///
/// `Copy`, so every environment taking part in one scan carries the same
/// cutoff and the scan as a whole is bounded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// `duration` from now. Durations too large to represent never expire.
    pub fn after(duration: Duration) -> Self {
        Deadline(Instant::now().checked_add(duration))
    }

    pub fn at(instant: Instant) -> Self {
        Deadline(Some(instant))
    }

    pub fn never() -> Self {
        Deadline(None)
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.0.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn instant(&self) -> Option<Instant> {
        self.0
    }
}

/// Slots, deadline and registry for one evaluation run.
#[derive(Clone)]
pub struct Environment<'r> {
    slots: FxHashMap<Name, Slot>,
    deadline: Deadline,
    max_loop_iterations: u32,
    registry: &'r FunctionRegistry,
}

impl<'r> Environment<'r> {
    /// Empty environment with the default iteration ceiling.
    pub fn new(registry: &'r FunctionRegistry, deadline: Deadline) -> Self {
        Environment {
            slots: FxHashMap::default(),
            deadline,
            max_loop_iterations: crate::config::DEFAULT_MAX_LOOP_ITERATIONS,
            registry,
        }
    }

    /// Empty environment whose deadline starts counting now.
    pub fn with_config(registry: &'r FunctionRegistry, config: &EvalConfig) -> Self {
        Environment::new(registry, config.deadline())
            .with_max_loop_iterations(config.max_loop_iterations)
    }

    #[must_use]
    pub fn with_max_loop_iterations(mut self, limit: u32) -> Self {
        self.max_loop_iterations = limit;
        self
    }

    #[inline]
    pub fn registry(&self) -> &'r FunctionRegistry {
        self.registry
    }

    #[inline]
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn set_deadline(&mut self, deadline: Deadline) {
        self.deadline = deadline;
    }

    #[inline]
    pub fn max_loop_iterations(&self) -> u32 {
        self.max_loop_iterations
    }

    /// Create `name` as a variable holding 0 if it is unbound.
    ///
    /// An existing variable keeps its value; the caller overwrites it.
    #[inline]
    pub fn init_variable(&mut self, name: Name) -> Result<&mut f64, SlotError> {
        match self.slots.entry(name).or_insert(Slot::Variable(0.0)) {
            Slot::Variable(value) => Ok(value),
            Slot::Constant(_) => Err(SlotError::Constant),
        }
    }

    /// An existing variable, for read-modify-write.
    #[inline]
    pub fn get_variable(&mut self, name: Name) -> Result<&mut f64, SlotError> {
        match self.slots.get_mut(&name) {
            Some(Slot::Variable(value)) => Ok(value),
            Some(Slot::Constant(_)) => Err(SlotError::Constant),
            None => Err(SlotError::Uninitialized),
        }
    }

    /// Current value of a variable or constant.
    #[inline]
    pub fn get_slot_value(&self, name: Name) -> Result<f64, SlotError> {
        self.slots
            .get(&name)
            .map(|slot| slot.value())
            .ok_or(SlotError::Uninitialized)
    }

    pub fn slot(&self, name: Name) -> Option<Slot> {
        self.slots.get(&name).copied()
    }

    /// Bind a host input such as a coordinate.
    pub fn set_variable(&mut self, name: Name, value: f64) -> Result<(), SlotError> {
        *self.init_variable(name)? = value;
        Ok(())
    }

    /// Bind `name` as a constant, replacing any existing binding.
    pub fn define_constant(&mut self, name: Name, value: f64) {
        self.slots.insert(name, Slot::Constant(value));
    }

    /// `e`, `pi`, `true` and `false`.
    pub fn define_standard_constants(&mut self, interner: &StringInterner) {
        self.define_constant(interner.intern("e"), std::f64::consts::E);
        self.define_constant(interner.intern("pi"), std::f64::consts::PI);
        self.define_constant(interner.intern("true"), 1.0);
        self.define_constant(interner.intern("false"), 0.0);
    }

    pub fn remove(&mut self, name: Name) -> Option<Slot> {
        self.slots.remove(&name)
    }

    /// Abort with a timeout once the deadline has passed.
    #[inline]
    pub fn check_deadline(&self) -> Result<(), EvalError> {
        if self.deadline.is_expired() {
            return Err(timeout());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("slots", &self.slots)
            .field("deadline", &self.deadline)
            .field("max_loop_iterations", &self.max_loop_iterations)
            .field("registry", &self.registry.id())
            .finish()
    }
}
