// Display formatting for AST
//
// Output is valid input for the parser, so a displayed equation can be
// parsed back into an equal-valued expression.
use crate::{Expr, ExprKind};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => format_number(*n, f),

            ExprKind::Symbol(s) => write!(f, "{}", s),

            ExprKind::Constant(c) => write!(f, "{}", c.name()),

            ExprKind::FunctionCall { name, args } => {
                let args_str: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
                write!(f, "{}({})", name, args_str.join(", "))
            }

            ExprKind::Add(u, v) => {
                // A negated right term reads as subtraction
                if let ExprKind::Mul(left, right) = &v.kind
                    && left.as_number() == Some(-1.0)
                {
                    write!(f, "{} - {}", u, format_mul_operand(right))
                } else {
                    write!(f, "{} + {}", u, v)
                }
            }

            ExprKind::Sub(u, v) => {
                // Parenthesize RHS when it's an addition or subtraction to preserve
                // the intended grouping: `a - (b + c)` instead of `a - b + c`.
                let right_str = match &v.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", v),
                    _ => v.to_string(),
                };
                write!(f, "{} - {}", u, right_str)
            }

            ExprKind::Mul(u, v) => {
                if u.as_number() == Some(-1.0) {
                    write!(f, "-{}", format_mul_operand(v))
                } else {
                    write!(f, "{} * {}", format_mul_operand(u), format_mul_operand(v))
                }
            }

            ExprKind::Div(u, v) => {
                let formatted_num = match &u.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", u),
                    _ => u.to_string(),
                };
                // Parenthesize the denominator unless it is atomic
                let formatted_denom = match &v.kind {
                    ExprKind::Symbol(_)
                    | ExprKind::Constant(_)
                    | ExprKind::Pow(_, _)
                    | ExprKind::FunctionCall { .. } => v.to_string(),
                    ExprKind::Number(n) if *n >= 0.0 => v.to_string(),
                    _ => format!("({})", v),
                };
                write!(f, "{} / {}", formatted_num, formatted_denom)
            }

            ExprKind::Pow(u, v) => {
                // (C * R)^2 must not display as C * R^2
                let formatted_base = match &u.kind {
                    ExprKind::Add(_, _)
                    | ExprKind::Sub(_, _)
                    | ExprKind::Mul(_, _)
                    | ExprKind::Div(_, _)
                    | ExprKind::Pow(_, _) => format!("({})", u),
                    ExprKind::Number(n) if *n < 0.0 => format!("({})", u),
                    _ => u.to_string(),
                };
                let formatted_exp = match &v.kind {
                    ExprKind::Number(n) if *n >= 0.0 => v.to_string(),
                    ExprKind::Symbol(_) | ExprKind::Constant(_) => v.to_string(),
                    _ => format!("({})", v),
                };
                write!(f, "{}^{}", formatted_base, formatted_exp)
            }
        }
    }
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "nan")
    } else if n.is_infinite() {
        if n > 0.0 { write!(f, "oo") } else { write!(f, "-oo") }
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        // Display as integer if no fractional part
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

/// Format operand for multiplication to minimize parentheses
fn format_mul_operand(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Add(_, _) | ExprKind::Sub(_, _) | ExprKind::Div(_, _) => format!("({})", expr),
        _ => expr.to_string(),
    }
}
