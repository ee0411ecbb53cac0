//! Abstract Syntax Tree for equation expressions

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;
use std::sync::Arc;

use crate::constants::Constant;

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Constant number (e.g., 3.14, 1e10)
    Number(f64),

    /// Free variable (e.g., "r", "wind_velocity")
    Symbol(String),

    /// Built-in named constant (e.g., pi, I)
    Constant(Constant),

    /// Built-in function call (e.g., sin(x))
    FunctionCall { name: String, args: Vec<Expr> },

    /// Addition
    Add(Arc<Expr>, Arc<Expr>),

    /// Subtraction
    Sub(Arc<Expr>, Arc<Expr>),

    /// Multiplication
    Mul(Arc<Expr>, Arc<Expr>),

    /// Division
    Div(Arc<Expr>, Arc<Expr>),

    /// Exponentiation
    Pow(Arc<Expr>, Arc<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr { kind }
    }

    /// Check if expression is a constant number and return its value
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Check if this expression is the number zero (with tolerance)
    #[inline]
    pub fn is_zero_num(&self) -> bool {
        self.as_number().is_some_and(crate::traits::is_zero)
    }

    /// Check if this expression is the number one (with tolerance)
    #[inline]
    pub fn is_one_num(&self) -> bool {
        self.as_number().is_some_and(crate::traits::is_one)
    }

    // Convenience constructors

    pub fn number(n: f64) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Expr::new(ExprKind::Symbol(s.into()))
    }

    pub fn constant(c: Constant) -> Self {
        Expr::new(ExprKind::Constant(c))
    }

    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Add(Arc::new(left), Arc::new(right)))
    }

    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Sub(Arc::new(left), Arc::new(right)))
    }

    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Mul(Arc::new(left), Arc::new(right)))
    }

    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Div(Arc::new(left), Arc::new(right)))
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    /// Create a single-argument function call
    pub fn func(name: impl Into<String>, content: Expr) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args: vec![content],
        })
    }

    // Analysis methods

    /// Count the total number of nodes in the AST
    pub fn node_count(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.node_count()).sum::<usize>()
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    /// Get the maximum nesting depth of the AST
    pub fn max_depth(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.max_depth()).max().unwrap_or(0)
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.max_depth().max(r.max_depth()),
        }
    }

    /// Check if the expression contains a specific variable
    pub fn contains_var(&self, var: &str) -> bool {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Constant(_) => false,
            ExprKind::Symbol(s) => s == var,
            ExprKind::FunctionCall { args, .. } => args.iter().any(|a| a.contains_var(var)),
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => l.contains_var(var) || r.contains_var(var),
        }
    }

    /// Collect all free variables in the expression, sorted by name
    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        match &self.kind {
            ExprKind::Symbol(s) => {
                vars.insert(s.clone());
            }
            ExprKind::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => {
                l.collect_variables(vars);
                r.collect_variables(vars);
            }
            ExprKind::Number(_) | ExprKind::Constant(_) => {}
        }
    }

    /// Transform the expression tree by applying a function to each node
    /// Nodes are visited in post-order (children before parent)
    pub fn map<F>(&self, f: F) -> Expr
    where
        F: Fn(&Expr) -> Expr + Copy,
    {
        let transformed = match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => self.clone(),
            ExprKind::FunctionCall { name, args } => Expr::new(ExprKind::FunctionCall {
                name: name.clone(),
                args: args.iter().map(|arg| arg.map(f)).collect(),
            }),
            ExprKind::Add(a, b) => Expr::add_expr(a.map(f), b.map(f)),
            ExprKind::Sub(a, b) => Expr::sub_expr(a.map(f), b.map(f)),
            ExprKind::Mul(a, b) => Expr::mul_expr(a.map(f), b.map(f)),
            ExprKind::Div(a, b) => Expr::div_expr(a.map(f), b.map(f)),
            ExprKind::Pow(a, b) => Expr::pow(a.map(f), b.map(f)),
        };
        f(&transformed)
    }

    /// Replace free variables by expressions according to `names`
    ///
    /// Replacements happen simultaneously: symbols inside an inserted
    /// expression are not substituted again, so swapping two names works.
    ///
    /// # Example
    /// ```
    /// use std::collections::BTreeMap;
    /// use symb_propagate::{Expr, parse, parse_equation};
    ///
    /// let expr = parse_equation("A = pi*r**2").unwrap();
    /// let names: BTreeMap<String, Expr> =
    ///     [("r".to_string(), parse("d/2").unwrap())].into_iter().collect();
    /// let result = expr.substitute(&names);
    /// assert!(!result.contains_var("r"));
    /// assert!(result.contains_var("d"));
    /// ```
    pub fn substitute(&self, names: &BTreeMap<String, Expr>) -> Expr {
        if names.is_empty() {
            return self.clone();
        }
        self.map(|node| match &node.kind {
            ExprKind::Symbol(s) => names.get(s).cloned().unwrap_or_else(|| node.clone()),
            _ => node.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let e1 = Expr::add_expr(Expr::symbol("x"), Expr::number(1.0));
        let e2 = Expr::add_expr(Expr::symbol("x"), Expr::number(1.0));
        let e3 = Expr::add_expr(Expr::symbol("y"), Expr::number(1.0));
        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
    }

    #[test]
    fn test_node_count() {
        let x = Expr::symbol("x");
        assert_eq!(x.node_count(), 1);

        let complex = Expr::mul_expr(
            Expr::add_expr(Expr::symbol("x"), Expr::number(1.0)),
            Expr::symbol("y"),
        );
        assert_eq!(complex.node_count(), 5); // Mul + (Add + x + 1) + y
    }

    #[test]
    fn test_max_depth() {
        let nested = Expr::add_expr(
            Expr::mul_expr(Expr::symbol("x"), Expr::symbol("y")),
            Expr::number(1.0),
        );
        assert_eq!(nested.max_depth(), 3); // Add -> Mul -> x/y
    }

    #[test]
    fn test_variables_skip_constants() {
        // pi * r^2
        let area = Expr::mul_expr(
            Expr::constant(Constant::Pi),
            Expr::pow(Expr::symbol("r"), Expr::number(2.0)),
        );
        let vars: Vec<String> = area.variables().into_iter().collect();
        assert_eq!(vars, vec!["r".to_string()]);
        assert!(!area.contains_var("pi"));
    }

    #[test]
    fn test_substitution_is_simultaneous() {
        let expr = Expr::sub_expr(Expr::symbol("a"), Expr::symbol("b"));
        let names: BTreeMap<String, Expr> = [
            ("a".to_string(), Expr::symbol("b")),
            ("b".to_string(), Expr::symbol("a")),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            expr.substitute(&names),
            Expr::sub_expr(Expr::symbol("b"), Expr::symbol("a"))
        );
    }

    #[test]
    fn test_substitute_expression() {
        // r -> d / 2 inside r^2
        let expr = Expr::pow(Expr::symbol("r"), Expr::number(2.0));
        let half = Expr::div_expr(Expr::symbol("d"), Expr::number(2.0));
        let names: BTreeMap<String, Expr> = [("r".to_string(), half.clone())].into_iter().collect();
        assert_eq!(expr.substitute(&names), Expr::pow(half, Expr::number(2.0)));
    }
}
