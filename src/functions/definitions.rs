//! Built-in function definitions for the function registry
//!
//! Each entry pairs an `f64` evaluator with a chain-rule derivative.

use super::registry::FunctionDefinition;
use super::{div_opt, func, mul_opt, neg, square};
use crate::Expr;

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1,
            eval: |args| args[0].sin(),
            derivative: |args, arg_primes| {
                // d/dx sin(u) = cos(u) * u'
                mul_opt(func("cos", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "cos",
            arity: 1,
            eval: |args| args[0].cos(),
            derivative: |args, arg_primes| {
                // d/dx cos(u) = -sin(u) * u'
                mul_opt(neg(func("sin", args[0].clone())), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "tan",
            arity: 1,
            eval: |args| args[0].tan(),
            derivative: |args, arg_primes| {
                // d/dx tan(u) = sec^2(u) * u'
                mul_opt(square(func("sec", args[0].clone())), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "cot",
            arity: 1,
            eval: |args| 1.0 / args[0].tan(),
            derivative: |args, arg_primes| {
                // d/dx cot(u) = -csc^2(u) * u'
                mul_opt(neg(square(func("csc", args[0].clone()))), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "sec",
            arity: 1,
            eval: |args| 1.0 / args[0].cos(),
            derivative: |args, arg_primes| {
                // d/dx sec(u) = sec(u)tan(u) * u'
                let u = args[0].clone();
                mul_opt(
                    Expr::mul_expr(func("sec", u.clone()), func("tan", u)),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "csc",
            arity: 1,
            eval: |args| 1.0 / args[0].sin(),
            derivative: |args, arg_primes| {
                // d/dx csc(u) = -csc(u)cot(u) * u'
                let u = args[0].clone();
                mul_opt(
                    neg(Expr::mul_expr(func("csc", u.clone()), func("cot", u))),
                    arg_primes[0].clone(),
                )
            },
        },
        // Inverse trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1,
            eval: |args| args[0].asin(),
            derivative: |args, arg_primes| {
                // d/dx asin(u) = u' / sqrt(1 - u^2)
                div_opt(
                    arg_primes[0].clone(),
                    func("sqrt", Expr::sub_expr(Expr::number(1.0), square(args[0].clone()))),
                )
            },
        },
        FunctionDefinition {
            name: "acos",
            arity: 1,
            eval: |args| args[0].acos(),
            derivative: |args, arg_primes| {
                // d/dx acos(u) = -u' / sqrt(1 - u^2)
                div_opt(
                    neg(arg_primes[0].clone()),
                    func("sqrt", Expr::sub_expr(Expr::number(1.0), square(args[0].clone()))),
                )
            },
        },
        FunctionDefinition {
            name: "atan",
            arity: 1,
            eval: |args| args[0].atan(),
            derivative: |args, arg_primes| {
                // d/dx atan(u) = u' / (1 + u^2)
                div_opt(
                    arg_primes[0].clone(),
                    Expr::add_expr(Expr::number(1.0), square(args[0].clone())),
                )
            },
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1,
            eval: |args| args[0].sinh(),
            derivative: |args, arg_primes| {
                mul_opt(func("cosh", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1,
            eval: |args| args[0].cosh(),
            derivative: |args, arg_primes| {
                mul_opt(func("sinh", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1,
            eval: |args| args[0].tanh(),
            derivative: |args, arg_primes| {
                // d/dx tanh(u) = (1 - tanh^2(u)) * u'
                mul_opt(
                    Expr::sub_expr(Expr::number(1.0), square(func("tanh", args[0].clone()))),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "asinh",
            arity: 1,
            eval: |args| args[0].asinh(),
            derivative: |args, arg_primes| {
                // d/dx asinh(u) = u' / sqrt(u^2 + 1)
                div_opt(
                    arg_primes[0].clone(),
                    func("sqrt", Expr::add_expr(square(args[0].clone()), Expr::number(1.0))),
                )
            },
        },
        FunctionDefinition {
            name: "acosh",
            arity: 1,
            eval: |args| args[0].acosh(),
            derivative: |args, arg_primes| {
                // d/dx acosh(u) = u' / sqrt(u^2 - 1)
                div_opt(
                    arg_primes[0].clone(),
                    func("sqrt", Expr::sub_expr(square(args[0].clone()), Expr::number(1.0))),
                )
            },
        },
        FunctionDefinition {
            name: "atanh",
            arity: 1,
            eval: |args| args[0].atanh(),
            derivative: |args, arg_primes| {
                // d/dx atanh(u) = u' / (1 - u^2)
                div_opt(
                    arg_primes[0].clone(),
                    Expr::sub_expr(Expr::number(1.0), square(args[0].clone())),
                )
            },
        },
        // Exponential / logarithmic
        FunctionDefinition {
            name: "exp",
            arity: 1,
            eval: |args| args[0].exp(),
            derivative: |args, arg_primes| {
                mul_opt(func("exp", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "log",
            arity: 1,
            eval: |args| args[0].ln(),
            derivative: |args, arg_primes| {
                // d/dx log(u) = u' / u
                div_opt(arg_primes[0].clone(), args[0].clone())
            },
        },
        FunctionDefinition {
            name: "ln",
            arity: 1,
            eval: |args| args[0].ln(),
            derivative: |args, arg_primes| div_opt(arg_primes[0].clone(), args[0].clone()),
        },
        FunctionDefinition {
            name: "sqrt",
            arity: 1,
            eval: |args| args[0].sqrt(),
            derivative: |args, arg_primes| {
                // d/dx sqrt(u) = u' / (2 * sqrt(u))
                div_opt(
                    arg_primes[0].clone(),
                    Expr::mul_expr(Expr::number(2.0), func("sqrt", args[0].clone())),
                )
            },
        },
        // Piecewise
        FunctionDefinition {
            name: "abs",
            arity: 1,
            eval: |args| args[0].abs(),
            derivative: |args, arg_primes| {
                // d/dx |u| = sign(u) * u', valid away from u = 0
                mul_opt(func("sign", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "sign",
            arity: 1,
            eval: |args| {
                if args[0] == 0.0 {
                    0.0
                } else {
                    args[0].signum()
                }
            },
            derivative: |_, _| Expr::number(0.0),
        },
    ]
}
