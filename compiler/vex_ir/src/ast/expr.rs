//! Node types.

use std::fmt;

use crate::{CaseRange, ExprId, ExprRange, Name, Span};

use super::operators::{AssignOp, BinaryOp, PostfixOp, UnaryOp};

/// A syntax tree node and the source range it came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Node variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    // Statements
    /// `{ s1; s2; ... }`, value of the last statement.
    Block(ExprRange),
    /// `if (cond) then_branch else else_branch`
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    },
    /// `while (cond) body`
    While { cond: ExprId, body: ExprId },
    /// `do body while (cond)`
    DoWhile { body: ExprId, cond: ExprId },
    /// `for (init; cond; update) body`, a missing condition loops forever.
    For {
        init: Option<ExprId>,
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: ExprId,
    },
    /// `for (counter = first, last) body`, counting up by one, inclusive.
    SimpleFor {
        counter: Name,
        first: ExprId,
        last: ExprId,
        body: ExprId,
    },
    /// `switch (scrutinee) { case ...: ... default: ... }`
    Switch {
        scrutinee: ExprId,
        cases: CaseRange,
        default: Option<ExprId>,
    },
    Break,
    Continue,
    /// `return` or `return expr`
    Return(Option<ExprId>),
    /// An expression used as a statement.
    ExprStmt(ExprId),

    // Expressions
    /// Numeric literal, kept as source text until compilation.
    Constant(Name),
    Ident(Name),
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// `cond ? then_expr : else_expr`
    Ternary {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    Call {
        func: Name,
        args: ExprRange,
    },
    Postfix {
        op: PostfixOp,
        operand: ExprId,
    },
}

impl ExprKind {
    /// Whether the node is a statement rather than a value-producing expression.
    pub const fn is_statement(&self) -> bool {
        matches!(
            self,
            ExprKind::Block(_)
                | ExprKind::If { .. }
                | ExprKind::While { .. }
                | ExprKind::DoWhile { .. }
                | ExprKind::For { .. }
                | ExprKind::SimpleFor { .. }
                | ExprKind::Switch { .. }
                | ExprKind::Break
                | ExprKind::Continue
                | ExprKind::Return(_)
                | ExprKind::ExprStmt(_)
        )
    }

    /// Whether control never continues past this node to its next sibling.
    pub const fn always_exits(&self) -> bool {
        matches!(
            self,
            ExprKind::Break | ExprKind::Continue | ExprKind::Return(_)
        )
    }
}

/// One `case label: body` arm of a switch.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SwitchCase {
    pub label: ExprId,
    pub body: ExprId,
}
