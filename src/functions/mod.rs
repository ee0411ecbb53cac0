//! Centralized mathematical function registry
//!
//! Single source of truth for the built-in functions accepted in equations,
//! including their numeric evaluation and derivative formulas.

use crate::{Expr, ExprKind};

pub(crate) mod definitions;
pub(crate) mod registry;

// ===== Helper functions for building derivative expressions =====

/// Create a function call expression
pub(crate) fn func(name: &str, arg: Expr) -> Expr {
    Expr::func(name, arg)
}

/// Multiply, optimizing for common cases (0 and 1)
pub(crate) fn mul_opt(a: Expr, b: Expr) -> Expr {
    match (&a.kind, &b.kind) {
        (ExprKind::Number(x), _) if *x == 0.0 => Expr::number(0.0),
        (_, ExprKind::Number(x)) if *x == 0.0 => Expr::number(0.0),
        (ExprKind::Number(x), _) if *x == 1.0 => b,
        (_, ExprKind::Number(x)) if *x == 1.0 => a,
        _ => Expr::mul_expr(a, b),
    }
}

/// Divide, dropping a numerator-side zero
pub(crate) fn div_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() {
        Expr::number(0.0)
    } else {
        Expr::div_expr(a, b)
    }
}

/// Negate an expression
pub(crate) fn neg(e: Expr) -> Expr {
    match e.as_number() {
        Some(n) => Expr::number(-n),
        None => Expr::mul_expr(Expr::number(-1.0), e),
    }
}

/// `u^2`
pub(crate) fn square(u: Expr) -> Expr {
    Expr::pow(u, Expr::number(2.0))
}
