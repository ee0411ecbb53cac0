// Differentiation engine - applies calculus rules
//
// Trivial terms (0 + u, 1 * u, u^1, ...) are dropped while the derivative is
// built so that partials stay small enough to evaluate cheaply at every solve.

use crate::functions::registry::Registry;
use crate::{Expr, ExprKind};

impl Expr {
    /// Exact symbolic partial derivative with respect to `var`
    ///
    /// Every other free variable is held constant.
    ///
    /// # Example
    /// ```
    /// use symb_propagate::parse;
    /// use std::collections::HashMap;
    ///
    /// let expr = parse("pi * r**2").unwrap();
    /// let d = expr.derive("r");
    /// let point: HashMap<String, f64> = [("r".to_string(), 5.0)].into_iter().collect();
    /// assert!((d.evaluate(&point).unwrap() - 10.0 * std::f64::consts::PI).abs() < 1e-12);
    /// ```
    pub fn derive(&self, var: &str) -> Expr {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Constant(_) => Expr::number(0.0),

            ExprKind::Symbol(name) => {
                if name == var {
                    Expr::number(1.0)
                } else {
                    Expr::number(0.0)
                }
            }

            ExprKind::FunctionCall { name, args } => {
                if !args.iter().any(|a| a.contains_var(var)) {
                    return Expr::number(0.0);
                }
                match Registry::get(name) {
                    Some(def) => {
                        let arg_primes: Vec<Expr> = args.iter().map(|a| a.derive(var)).collect();
                        (def.derivative)(args, &arg_primes)
                    }
                    // The parser only builds calls to registered functions
                    None => Expr::number(f64::NAN),
                }
            }

            // Sum rule: (u + v)' = u' + v'
            ExprKind::Add(u, v) => {
                let u_prime = u.derive(var);
                let v_prime = v.derive(var);
                if u_prime.is_zero_num() {
                    v_prime
                } else if v_prime.is_zero_num() {
                    u_prime
                } else {
                    Expr::add_expr(u_prime, v_prime)
                }
            }

            // Subtraction rule: (u - v)' = u' - v'
            ExprKind::Sub(u, v) => {
                let u_prime = u.derive(var);
                let v_prime = v.derive(var);
                if v_prime.is_zero_num() {
                    u_prime
                } else if u_prime.is_zero_num() {
                    negate(v_prime)
                } else {
                    Expr::sub_expr(u_prime, v_prime)
                }
            }

            // Product rule: (u * v)' = u' * v + u * v'
            ExprKind::Mul(u, v) => {
                let u_prime = u.derive(var);
                let v_prime = v.derive(var);

                let term1 = product(u_prime, (**v).clone());
                let term2 = product((**u).clone(), v_prime);

                if term1.is_zero_num() {
                    term2
                } else if term2.is_zero_num() {
                    term1
                } else {
                    Expr::add_expr(term1, term2)
                }
            }

            // Quotient rule: (u / v)' = (u' * v - u * v') / v^2
            ExprKind::Div(u, v) => {
                let u_prime = u.derive(var);
                let v_prime = v.derive(var);

                if v_prime.is_zero_num() {
                    // Constant denominator: u' / v
                    if u_prime.is_zero_num() {
                        Expr::number(0.0)
                    } else if v.is_one_num() {
                        u_prime
                    } else {
                        Expr::div_expr(u_prime, (**v).clone())
                    }
                } else {
                    let term1 = product(u_prime, (**v).clone());
                    let term2 = product((**u).clone(), v_prime);
                    let numerator = if term1.is_zero_num() {
                        negate(term2)
                    } else {
                        Expr::sub_expr(term1, term2)
                    };
                    Expr::div_expr(numerator, Expr::pow((**v).clone(), Expr::number(2.0)))
                }
            }

            ExprKind::Pow(u, v) => {
                if !v.contains_var(var) {
                    // Constant exponent - standard power rule
                    // (u^n)' = n * u^(n-1) * u'
                    let u_prime = u.derive(var);
                    if u_prime.is_zero_num() {
                        return Expr::number(0.0);
                    }
                    let coefficient = (**v).clone();
                    let lowered = match v.as_number() {
                        Some(n) if n == 0.0 => return Expr::number(0.0),
                        Some(n) if n == 1.0 => return u_prime,
                        Some(n) if n == 2.0 => (**u).clone(),
                        Some(n) => Expr::pow((**u).clone(), Expr::number(n - 1.0)),
                        None => Expr::pow(
                            (**u).clone(),
                            Expr::sub_expr((**v).clone(), Expr::number(1.0)),
                        ),
                    };
                    product(coefficient, product(lowered, u_prime))
                } else {
                    // Variable exponent - logarithmic differentiation
                    // d/dx[u^v] = u^v * (v' * ln(u) + v * u'/u)
                    let u_prime = u.derive(var);
                    let v_prime = v.derive(var);

                    let term1 = product(v_prime, Expr::func("log", (**u).clone()));
                    let term2 = if u_prime.is_zero_num() {
                        Expr::number(0.0)
                    } else {
                        product((**v).clone(), Expr::div_expr(u_prime, (**u).clone()))
                    };

                    let sum = if term1.is_zero_num() {
                        term2
                    } else if term2.is_zero_num() {
                        term1
                    } else {
                        Expr::add_expr(term1, term2)
                    };

                    product(self.clone(), sum)
                }
            }
        }
    }
}

/// Multiply with inline 0/1 elimination
fn product(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() || b.is_zero_num() {
        Expr::number(0.0)
    } else if a.is_one_num() {
        b
    } else if b.is_one_num() {
        a
    } else {
        Expr::mul_expr(a, b)
    }
}

fn negate(e: Expr) -> Expr {
    match e.as_number() {
        Some(n) => Expr::number(-n),
        None => Expr::mul_expr(Expr::number(-1.0), e),
    }
}
