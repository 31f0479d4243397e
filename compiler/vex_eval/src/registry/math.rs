//! Standard math catalog.

use super::{FunctionRegistry, ParamKind};

const UNARY: &[(&str, fn(f64) -> f64)] = &[
    ("abs", f64::abs),
    ("acos", f64::acos),
    ("asin", f64::asin),
    ("atan", f64::atan),
    ("cbrt", f64::cbrt),
    ("ceil", f64::ceil),
    ("cos", f64::cos),
    ("cosh", f64::cosh),
    ("exp", f64::exp),
    ("floor", f64::floor),
    ("ln", f64::ln),
    ("log", f64::ln),
    ("log10", f64::log10),
    ("rint", f64::round_ties_even),
    ("round", f64::round),
    ("sin", f64::sin),
    ("sinh", f64::sinh),
    ("sqrt", f64::sqrt),
    ("tan", f64::tan),
    ("tanh", f64::tanh),
];

const BINARY: &[(&str, fn(f64, f64) -> f64)] = &[
    ("atan2", f64::atan2),
    ("max", f64::max),
    ("min", f64::min),
];

const TERNARY: &[(&str, fn(f64, f64, f64) -> f64)] = &[("max", max3), ("min", min3)];

fn max3(a: f64, b: f64, c: f64) -> f64 {
    a.max(b).max(c)
}

fn min3(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).min(c)
}

pub(super) fn install(registry: &mut FunctionRegistry) {
    for &(name, func) in UNARY {
        registry.insert(name, &[ParamKind::Value], move |args| Ok(func(args[0])));
    }
    for &(name, func) in BINARY {
        registry.insert(name, &[ParamKind::Value; 2], move |args| {
            Ok(func(args[0], args[1]))
        });
    }
    for &(name, func) in TERNARY {
        registry.insert(name, &[ParamKind::Value; 3], move |args| {
            Ok(func(args[0], args[1], args[2]))
        });
    }
    tracing::trace!(functions = registry.len(), "installed math catalog");
}
