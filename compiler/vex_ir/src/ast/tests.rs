use super::*;
use crate::{ExprId, ExprRange, Name};

#[test]
fn test_compound_assign_maps_to_binary() {
    assert_eq!(AssignOp::Assign.binary_op(), None);
    assert_eq!(AssignOp::Add.binary_op(), Some(BinaryOp::Add));
    assert_eq!(AssignOp::Pow.binary_op(), Some(BinaryOp::Pow));
}

#[test]
fn test_symbols() {
    assert_eq!(BinaryOp::NearEq.as_symbol(), "~=");
    assert_eq!(BinaryOp::Pow.as_symbol(), "^");
    assert_eq!(UnaryOp::Complement.as_symbol(), "~");
    assert_eq!(PostfixOp::Factorial.as_symbol(), "!");
    assert_eq!(AssignOp::Mod.as_symbol(), "%=");
}

#[test]
fn test_mutating_operators() {
    assert!(UnaryOp::PreIncrement.mutates());
    assert!(!UnaryOp::Neg.mutates());
    assert!(PostfixOp::PostDecrement.mutates());
    assert!(!PostfixOp::Factorial.mutates());
}

#[test]
fn test_statement_classification() {
    let id = ExprId::new(0);
    assert!(ExprKind::Block(ExprRange::EMPTY).is_statement());
    assert!(ExprKind::Return(None).always_exits());
    assert!(!ExprKind::ExprStmt(id).always_exits());
    assert!(!ExprKind::Ident(Name::EMPTY).is_statement());
    assert!(BinaryOp::Or.is_short_circuit());
    assert!(!BinaryOp::Add.is_short_circuit());
}
