//! Flat storage for syntax tree nodes.

use crate::{CaseRange, Expr, ExprId, ExprRange, Span, SwitchCase};

/// Append-only arena holding every node of one script.
///
/// Children are referenced by [`ExprId`]; variable-length children (block
/// statements, call arguments, switch cases) live in side tables addressed
/// by [`ExprRange`] / [`CaseRange`].
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    lists: Vec<ExprId>,
    cases: Vec<SwitchCase>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node and return its id.
    ///
    /// # Panics
    /// Panics past `u32::MAX` nodes.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("expression arena exceeded u32::MAX nodes"));
        self.exprs.push(expr);
        ExprId::new(index)
    }

    /// Store a list of child ids.
    ///
    /// # Panics
    /// Panics if the list is longer than `u16::MAX`.
    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.lists.len();
        self.lists.extend(ids);
        let len = u16::try_from(self.lists.len() - start)
            .unwrap_or_else(|_| panic!("expression list exceeded u16::MAX entries"));
        ExprRange::new(start as u32, len)
    }

    /// Store a list of switch cases.
    ///
    /// # Panics
    /// Panics if the list is longer than `u16::MAX`.
    pub fn alloc_cases(&mut self, cases: impl IntoIterator<Item = SwitchCase>) -> CaseRange {
        let start = self.cases.len();
        self.cases.extend(cases);
        let len = u16::try_from(self.cases.len() - start)
            .unwrap_or_else(|_| panic!("switch exceeded u16::MAX cases"));
        CaseRange::new(start as u32, len)
    }

    #[inline]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.lists[start..start + range.len()]
    }

    #[inline]
    pub fn get_cases(&self, range: CaseRange) -> &[SwitchCase] {
        let start = range.start as usize;
        &self.cases[start..start + range.len()]
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}
