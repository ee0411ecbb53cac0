//! Equations normalized to `f(vars) = 0` together with their partial derivatives
//!
//! An [`Equation`] is either expression-backed (parsed from text, partials
//! derived symbolically) or function-backed (a [`NativeEquation`] whose
//! residual and partials are plain Rust closures). Both go through the same
//! [`Evaluable`] interface, so the solver never needs to know which is which.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Result, SolveError};
use crate::{Expr, Values};

/// Numeric function of a point, used for function-backed residuals and partials
///
/// Receives the full values map; keys the function does not read are ignored.
pub type NativeFn = Arc<dyn Fn(&Values) -> f64 + Send + Sync>;

/// Something that reduces to a number at a point: an expression or a closure
#[derive(Clone)]
pub enum Evaluable {
    Expr(Expr),
    Native(NativeFn),
}

impl Evaluable {
    /// The expression, if this is expression-backed
    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Evaluable::Expr(e) => Some(e),
            Evaluable::Native(_) => None,
        }
    }

    /// Evaluate at `point`; `label` names the owner in error messages
    ///
    /// Callers are expected to have checked that every variable the closure
    /// reads is present in `point`.
    fn evaluate(&self, point: &Values, label: &str) -> Result<f64> {
        match self {
            Evaluable::Expr(e) => e.evaluate(point),
            Evaluable::Native(f) => {
                let value = f(point);
                if value.is_nan() {
                    Err(SolveError::Evaluation {
                        expression: label.to_string(),
                        reason: "result is not a real number".to_string(),
                    })
                } else {
                    Ok(value)
                }
            }
        }
    }
}

impl fmt::Debug for Evaluable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluable::Expr(e) => f.debug_tuple("Expr").field(&e.to_string()).finish(),
            Evaluable::Native(_) => f.write_str("Native(..)"),
        }
    }
}

impl From<Expr> for Evaluable {
    fn from(e: Expr) -> Self {
        Evaluable::Expr(e)
    }
}

/// Function-backed equation definition
///
/// Every declared variable needs a partial derivative, and partials may only
/// be given for declared variables.
///
/// # Example
/// ```
/// use symb_propagate::{EquationSet, NativeEquation};
///
/// // V = A * h
/// let volume = NativeEquation::new("V - A*h", &["A", "V", "h"], |v| v["V"] - v["A"] * v["h"])
///     .partial("A", |v| -v["h"])
///     .partial("V", |_| 1.0)
///     .partial("h", |v| -v["A"]);
///
/// let mut set = EquationSet::new();
/// set.add_native(volume).unwrap();
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Clone)]
pub struct NativeEquation {
    label: String,
    variables: BTreeSet<String>,
    residual: NativeFn,
    partials: BTreeMap<String, NativeFn>,
}

impl NativeEquation {
    /// Create a function-backed equation from its residual `f(vars)`
    pub fn new<F>(label: impl Into<String>, variables: &[&str], residual: F) -> Self
    where
        F: Fn(&Values) -> f64 + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            variables: variables.iter().map(|v| v.to_string()).collect(),
            residual: Arc::new(residual),
            partials: BTreeMap::new(),
        }
    }

    /// Add the partial derivative of the residual with respect to `var`
    pub fn partial<F>(mut self, var: &str, f: F) -> Self
    where
        F: Fn(&Values) -> f64 + Send + Sync + 'static,
    {
        self.partials.insert(var.to_string(), Arc::new(f));
        self
    }
}

/// One equation of an [`EquationSet`](crate::EquationSet)
///
/// The partial map keys are exactly the equation's free variables.
#[derive(Clone)]
pub struct Equation {
    label: String,
    residual: Evaluable,
    partials: BTreeMap<String, Evaluable>,
}

impl Equation {
    /// Build an expression-backed equation, deriving every partial
    pub fn from_expr(label: impl Into<String>, expr: Expr) -> Self {
        let partials: BTreeMap<String, Evaluable> = expr
            .variables()
            .into_iter()
            .map(|var| {
                let derivative = expr.derive(&var);
                trace!(var = %var, derivative = %derivative, "partial derivative");
                (var, Evaluable::Expr(derivative))
            })
            .collect();
        Self {
            label: label.into(),
            residual: Evaluable::Expr(expr),
            partials,
        }
    }

    /// Build a function-backed equation
    pub fn from_native(native: NativeEquation) -> Result<Self> {
        let NativeEquation {
            label,
            variables,
            residual,
            partials,
        } = native;

        if let Some(var) = partials.keys().find(|k| !variables.contains(*k)) {
            return Err(SolveError::InvalidNative {
                label,
                message: format!("partial given for undeclared variable '{}'", var),
            });
        }
        let missing: Vec<&String> = variables
            .iter()
            .filter(|v| !partials.contains_key(*v))
            .collect();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
            return Err(SolveError::InvalidNative {
                label,
                message: format!("no partial derivative for [{}]", names.join(", ")),
            });
        }

        Ok(Self {
            label,
            residual: Evaluable::Native(residual),
            partials: partials
                .into_iter()
                .map(|(k, f)| (k, Evaluable::Native(f)))
                .collect(),
        })
    }

    /// Source text the equation was created from
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Zero-form expression, `None` for function-backed equations
    pub fn expr(&self) -> Option<&Expr> {
        self.residual.as_expr()
    }

    /// Partial derivative map, variable name -> derivative
    pub fn partials(&self) -> &BTreeMap<String, Evaluable> {
        &self.partials
    }

    pub fn is_native(&self) -> bool {
        matches!(self.residual, Evaluable::Native(_))
    }

    /// Free variables, sorted
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.partials.keys().map(String::as_str)
    }

    pub fn contains_var(&self, var: &str) -> bool {
        self.partials.contains_key(var)
    }

    /// Free variables that `point` does not assign, sorted
    pub fn unresolved(&self, point: &Values) -> Vec<String> {
        self.partials
            .keys()
            .filter(|v| !point.contains_key(*v))
            .cloned()
            .collect()
    }

    /// Value of `f(vars)` at `point`
    pub fn evaluate(&self, point: &Values) -> Result<f64> {
        self.require_resolved(point)?;
        self.residual.evaluate(point, &self.to_string())
    }

    /// Value of `∂f/∂var` at `point`, zero when `var` does not occur
    pub fn partial_at(&self, var: &str, point: &Values) -> Result<f64> {
        match self.partials.get(var) {
            Some(partial) => {
                if let Evaluable::Native(_) = partial {
                    self.require_resolved(point)?;
                }
                partial.evaluate(point, &format!("d({})/d{}", self, var))
            }
            None => Ok(0.0),
        }
    }

    fn require_resolved(&self, point: &Values) -> Result<()> {
        let missing = self.unresolved(point);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SolveError::Evaluation {
                expression: self.to_string(),
                reason: format!("unresolved variables [{}]", missing.join(", ")),
            })
        }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.residual {
            Evaluable::Expr(e) => write!(f, "{}", e),
            Evaluable::Native(_) => write!(f, "{}", self.label),
        }
    }
}

impl fmt::Debug for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equation")
            .field("label", &self.label)
            .field("residual", &self.residual)
            .field("variables", &self.partials.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Structural equality on the residual expression; closures compare by identity
impl PartialEq for Equation {
    fn eq(&self, other: &Self) -> bool {
        match (&self.residual, &other.residual) {
            (Evaluable::Expr(a), Evaluable::Expr(b)) => a == b,
            (Evaluable::Native(a), Evaluable::Native(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
