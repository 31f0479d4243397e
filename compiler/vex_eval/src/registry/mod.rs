//! Native functions callable from scripts.
//!
//! Functions are keyed by name and arity. Each parameter is passed either
//! by value or by reference; a reference parameter receives the variable's
//! current value and whatever the function leaves in its slot of the
//! argument buffer is written back after the call.
//!
//! ```
//! use vex_eval::{FunctionRegistry, ParamKind};
//!
//! let mut registry = FunctionRegistry::with_math();
//! registry
//!     .register("swap", &[ParamKind::Reference, ParamKind::Reference], |args| {
//!         args.swap(0, 1);
//!         Ok(0.0)
//!     })
//!     .map_err(|e| e.to_string())?;
//! assert!(registry.resolve("swap", 2).is_some());
//! assert!(registry.resolve("swap", 1).is_none());
//! # Ok::<(), String>(())
//! ```

mod math;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// How an argument reaches the function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Value,
    /// The call site must pass a variable; its slot is read before and
    /// written after the call.
    Reference,
}

/// Index of a function within its registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FnId(u32);

impl FnId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Process-unique identity of a registry.
///
/// A compiled expression remembers the registry it was resolved against
/// and refuses to run with any other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegistryId(u64);

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

impl RegistryId {
    fn next() -> Self {
        RegistryId(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Failure reported by a native function.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FunctionError {
    message: String,
}

impl FunctionError {
    pub fn new(message: impl Into<String>) -> Self {
        FunctionError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("function `{name}` taking {arity} argument(s) is already registered")]
    FunctionExists { name: String, arity: usize },
}

/// Native implementation; receives exactly `arity` arguments.
pub type NativeFn = Arc<dyn Fn(&mut [f64]) -> Result<f64, FunctionError> + Send + Sync>;

/// A registered function and its calling convention.
#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    params: Box<[ParamKind]>,
    func: NativeFn,
}

impl NativeFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamKind] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn call(&self, args: &mut [f64]) -> Result<f64, FunctionError> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Name and arity to native function.
///
/// Append-only: an [`FnId`] stays valid for the registry's lifetime.
pub struct FunctionRegistry {
    id: RegistryId,
    functions: Vec<NativeFunction>,
    by_name: FxHashMap<String, SmallVec<[FnId; 2]>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        FunctionRegistry {
            id: RegistryId::next(),
            functions: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Registry preloaded with the standard math functions.
    pub fn with_math() -> Self {
        let mut registry = FunctionRegistry::new();
        math::install(&mut registry);
        registry
    }

    #[inline]
    pub fn id(&self) -> RegistryId {
        self.id
    }

    pub fn register<F>(
        &mut self,
        name: &str,
        params: &[ParamKind],
        func: F,
    ) -> Result<FnId, RegistryError>
    where
        F: Fn(&mut [f64]) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        if self.resolve(name, params.len()).is_some() {
            return Err(RegistryError::FunctionExists {
                name: name.to_string(),
                arity: params.len(),
            });
        }
        Ok(self.insert(name, params, func))
    }

    pub fn register_unary(&mut self, name: &str, func: fn(f64) -> f64) -> Result<FnId, RegistryError> {
        self.register(name, &[ParamKind::Value], move |args| Ok(func(args[0])))
    }

    pub fn register_binary(
        &mut self,
        name: &str,
        func: fn(f64, f64) -> f64,
    ) -> Result<FnId, RegistryError> {
        self.register(name, &[ParamKind::Value; 2], move |args| {
            Ok(func(args[0], args[1]))
        })
    }

    pub fn register_ternary(
        &mut self,
        name: &str,
        func: fn(f64, f64, f64) -> f64,
    ) -> Result<FnId, RegistryError> {
        self.register(name, &[ParamKind::Value; 3], move |args| {
            Ok(func(args[0], args[1], args[2]))
        })
    }

    /// Add without the duplicate check; used for preloaded catalogs whose
    /// names are known to be distinct.
    fn insert<F>(&mut self, name: &str, params: &[ParamKind], func: F) -> FnId
    where
        F: Fn(&mut [f64]) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        let id = FnId(self.functions.len() as u32);
        self.functions.push(NativeFunction {
            name: name.to_string(),
            params: params.into(),
            func: Arc::new(func),
        });
        self.by_name.entry(name.to_string()).or_default().push(id);
        id
    }

    pub fn resolve(&self, name: &str, arity: usize) -> Option<FnId> {
        self.by_name
            .get(name)?
            .iter()
            .copied()
            .find(|id| self.functions[id.index()].arity() == arity)
    }

    /// Every arity registered under `name`, ascending.
    pub fn arities(&self, name: &str) -> Vec<usize> {
        let mut arities: Vec<usize> = self
            .by_name
            .get(name)
            .map(|ids| ids.iter().map(|id| self.functions[id.index()].arity()).collect())
            .unwrap_or_default();
        arities.sort_unstable();
        arities
    }

    #[inline]
    pub fn function(&self, id: FnId) -> Option<&NativeFunction> {
        self.functions.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("id", &self.id)
            .field("functions", &self.functions.len())
            .finish()
    }
}
