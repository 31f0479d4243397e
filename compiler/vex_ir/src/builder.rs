//! Programmatic tree construction.
//!
//! Hosts that assemble expressions without going through text (and the
//! test suites) build trees with [`AstBuilder`]. Each node receives its own
//! one-byte span at a fresh offset, so an error's span identifies exactly
//! which node raised it.

use crate::{
    AssignOp, BinaryOp, Expr, ExprArena, ExprId, ExprKind, Name, PostfixOp, SharedInterner, Span,
    SwitchCase, UnaryOp,
};

pub struct AstBuilder {
    arena: ExprArena,
    interner: SharedInterner,
    offset: u32,
}

impl AstBuilder {
    pub fn new(interner: &SharedInterner) -> Self {
        AstBuilder {
            arena: ExprArena::new(),
            interner: SharedInterner::clone(interner),
            offset: 0,
        }
    }

    fn alloc(&mut self, kind: ExprKind) -> ExprId {
        let span = Span::new(self.offset, self.offset + 1);
        self.offset += 1;
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    /// Intern `text` with the builder's interner.
    pub fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn span(&self, id: ExprId) -> Span {
        self.arena.span(id)
    }

    pub fn finish(self) -> ExprArena {
        self.arena
    }

    // Expressions

    /// Numeric literal from its source text.
    pub fn literal(&mut self, text: &str) -> ExprId {
        let text = self.interner.intern(text);
        self.alloc(ExprKind::Constant(text))
    }

    /// Numeric literal from a value.
    pub fn num(&mut self, value: f64) -> ExprId {
        self.literal(&value.to_string())
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.alloc(ExprKind::Ident(name))
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.alloc(ExprKind::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.alloc(ExprKind::Unary { op, operand })
    }

    pub fn postfix(&mut self, op: PostfixOp, operand: ExprId) -> ExprId {
        self.alloc(ExprKind::Postfix { op, operand })
    }

    pub fn assign(&mut self, op: AssignOp, target: ExprId, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Assign { op, target, value })
    }

    /// `name = value`
    pub fn set(&mut self, name: &str, value: ExprId) -> ExprId {
        let target = self.ident(name);
        self.assign(AssignOp::Assign, target, value)
    }

    /// `name op= value`
    pub fn update(&mut self, name: &str, op: AssignOp, value: ExprId) -> ExprId {
        let target = self.ident(name);
        self.assign(op, target, value)
    }

    pub fn ternary(&mut self, cond: ExprId, then_expr: ExprId, else_expr: ExprId) -> ExprId {
        self.alloc(ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        })
    }

    pub fn call(&mut self, func: &str, args: &[ExprId]) -> ExprId {
        let func = self.interner.intern(func);
        let args = self.arena.alloc_expr_list(args.iter().copied());
        self.alloc(ExprKind::Call { func, args })
    }

    // Statements

    pub fn block(&mut self, stmts: &[ExprId]) -> ExprId {
        let range = self.arena.alloc_expr_list(stmts.iter().copied());
        self.alloc(ExprKind::Block(range))
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> ExprId {
        self.alloc(ExprKind::ExprStmt(expr))
    }

    pub fn if_(&mut self, cond: ExprId, then_branch: ExprId, else_branch: Option<ExprId>) -> ExprId {
        self.alloc(ExprKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn while_(&mut self, cond: ExprId, body: ExprId) -> ExprId {
        self.alloc(ExprKind::While { cond, body })
    }

    pub fn do_while(&mut self, body: ExprId, cond: ExprId) -> ExprId {
        self.alloc(ExprKind::DoWhile { body, cond })
    }

    pub fn for_(
        &mut self,
        init: Option<ExprId>,
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: ExprId,
    ) -> ExprId {
        self.alloc(ExprKind::For {
            init,
            cond,
            update,
            body,
        })
    }

    pub fn simple_for(&mut self, counter: &str, first: ExprId, last: ExprId, body: ExprId) -> ExprId {
        let counter = self.interner.intern(counter);
        self.alloc(ExprKind::SimpleFor {
            counter,
            first,
            last,
            body,
        })
    }

    /// `switch` with `(label, body)` cases in source order.
    pub fn switch(
        &mut self,
        scrutinee: ExprId,
        cases: &[(ExprId, ExprId)],
        default: Option<ExprId>,
    ) -> ExprId {
        let cases = self
            .arena
            .alloc_cases(cases.iter().map(|&(label, body)| SwitchCase { label, body }));
        self.alloc(ExprKind::Switch {
            scrutinee,
            cases,
            default,
        })
    }

    pub fn break_(&mut self) -> ExprId {
        self.alloc(ExprKind::Break)
    }

    pub fn continue_(&mut self) -> ExprId {
        self.alloc(ExprKind::Continue)
    }

    pub fn return_(&mut self, value: Option<ExprId>) -> ExprId {
        self.alloc(ExprKind::Return(value))
    }
}
