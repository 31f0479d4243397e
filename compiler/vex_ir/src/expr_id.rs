//! Node handles and ranges into an [`ExprArena`](crate::ExprArena).

use std::fmt;

/// Index of a node in an `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Contiguous run of child ids (block statements, call arguments).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ExprRange {
    pub start: u32,
    pub len: u16,
}

impl ExprRange {
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        ExprRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

/// Contiguous run of switch cases.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct CaseRange {
    pub start: u32,
    pub len: u16,
}

impl CaseRange {
    pub const EMPTY: CaseRange = CaseRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        CaseRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ExprId, ExprRange};
    crate::static_assert_size!(ExprId, 4);
    crate::static_assert_size!(ExprRange, 8);
}
