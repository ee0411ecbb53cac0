//! Numeric evaluation of expressions at a point

use crate::error::{Result, SolveError};
use crate::functions::registry::Registry;
use crate::{Expr, ExprKind, Values};

impl Expr {
    /// Free variables of the expression that `point` does not assign, sorted
    pub fn unresolved(&self, point: &Values) -> Vec<String> {
        self.variables()
            .into_iter()
            .filter(|v| !point.contains_key(v))
            .collect()
    }

    /// Substitute every free variable from `point` and reduce to a real number
    ///
    /// Fails with [`SolveError::Evaluation`] when a variable is not assigned,
    /// or when the result is not real (the imaginary unit or complex infinity
    /// takes part, or the arithmetic produces NaN such as `sqrt(-1)`).
    pub fn evaluate(&self, point: &Values) -> Result<f64> {
        let missing = self.unresolved(point);
        if !missing.is_empty() {
            return Err(SolveError::Evaluation {
                expression: self.to_string(),
                reason: format!("unresolved variables [{}]", missing.join(", ")),
            });
        }

        let value = self.eval_real(point).map_err(|reason| SolveError::Evaluation {
            expression: self.to_string(),
            reason,
        })?;

        if value.is_nan() {
            return Err(SolveError::Evaluation {
                expression: self.to_string(),
                reason: "result is not a real number".to_string(),
            });
        }
        Ok(value)
    }

    fn eval_real(&self, point: &Values) -> std::result::Result<f64, String> {
        Ok(match &self.kind {
            ExprKind::Number(n) => *n,
            ExprKind::Symbol(s) => *point
                .get(s)
                .ok_or_else(|| format!("unresolved variable '{}'", s))?,
            ExprKind::Constant(c) => c
                .value()
                .ok_or_else(|| format!("constant '{}' has no real value", c.name()))?,
            ExprKind::FunctionCall { name, args } => {
                let def =
                    Registry::get(name).ok_or_else(|| format!("unknown function '{}'", name))?;
                let values = args
                    .iter()
                    .map(|a| a.eval_real(point))
                    .collect::<std::result::Result<Vec<f64>, String>>()?;
                (def.eval)(&values)
            }
            ExprKind::Add(a, b) => a.eval_real(point)? + b.eval_real(point)?,
            ExprKind::Sub(a, b) => a.eval_real(point)? - b.eval_real(point)?,
            ExprKind::Mul(a, b) => a.eval_real(point)? * b.eval_real(point)?,
            ExprKind::Div(a, b) => a.eval_real(point)? / b.eval_real(point)?,
            // Note: 0^0 evaluates to 1.0 following IEEE 754 powf behavior
            ExprKind::Pow(a, b) => {
                let base = a.eval_real(point)?;
                match b.as_number() {
                    Some(n) if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 => {
                        base.powi(n as i32)
                    }
                    _ => base.powf(b.eval_real(point)?),
                }
            }
        })
    }
}
