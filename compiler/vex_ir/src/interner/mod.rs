//! String interner for identifiers and literal text.
//!
//! One interner is shared by whoever builds the tree (the parser), the host
//! binding input variables such as `x`, `y`, `z`, and the compiler, which
//! needs the text back for call resolution and error messages.

// Arc is needed for SharedInterner: compiled expressions are evaluated on
// worker threads while the host keeps interning input names.
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::Name;

struct Inner {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
///
/// Interned strings are leaked, which makes [`lookup`](Self::lookup) a plain
/// `&'static str` with no guard. Scripts hold few distinct identifiers, so
/// the leak is bounded by the vocabulary, not by the number of compilations.
pub struct StringInterner {
    inner: RwLock<Inner>,
}

/// Interner shared between the tree producer, the host and the compiler.
pub type SharedInterner = Arc<StringInterner>;

impl StringInterner {
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, Name::EMPTY);
        StringInterner {
            inner: RwLock::new(Inner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Shared handle to a fresh interner.
    pub fn shared() -> SharedInterner {
        Arc::new(Self::new())
    }

    /// Intern `s`, returning its existing `Name` if already present.
    ///
    /// # Panics
    /// Panics past `u32::MAX` distinct strings.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&name) = self.inner.read().map.get(s) {
            return name;
        }

        let mut guard = self.inner.write();
        // Another writer may have won the race between the two locks.
        if let Some(&name) = guard.map.get(s) {
            return name;
        }

        let index = u32::try_from(guard.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded u32::MAX strings"));
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_raw(index);
        guard.strings.push(leaked);
        guard.map.insert(leaked, name);
        name
    }

    /// Text of an interned name.
    ///
    /// # Panics
    /// Panics if `name` came from a different interner and is out of range.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.inner.read().strings[name.index()]
    }

    /// Text of `name`, or `None` if this interner never produced it.
    pub fn try_lookup(&self, name: Name) -> Option<&'static str> {
        self.inner.read().strings.get(name.index()).copied()
    }

    /// `Name` of `s` if it has been interned, without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.inner.read().map.get(s).copied()
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
