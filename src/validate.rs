//! Input validation run before a solve
//!
//! [`check`] stops at the first failure; [`diagnose`] runs every check and
//! collects all failure messages into a [`CheckReport`].

use std::collections::BTreeSet;

use tracing::debug;

use crate::classify::{Classification, classify, missing_variables};
use crate::equation::Equation;
use crate::error::{Result, SolveError};
use crate::{Values, restricted_names};

/// Outcome of [`diagnose`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub ok: bool,
    pub messages: Vec<String>,
}

impl CheckReport {
    /// All failure messages, one per line
    pub fn message(&self) -> String {
        self.messages.join("\n")
    }

    /// `Ok(())` for a passing report, [`SolveError::CheckFailed`] otherwise
    pub fn into_result(self) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(SolveError::CheckFailed {
                message: self.message(),
            })
        }
    }
}

/// Reject input names that collide with restricted built-in constants
pub fn check_restricted(values: &Values, errors: &Values) -> Result<()> {
    let names = restricted_names(values.keys().chain(errors.keys()).map(String::as_str));
    if names.is_empty() {
        Ok(())
    } else {
        Err(SolveError::RestrictedSymbol {
            names: names.into_iter().collect(),
        })
    }
}

/// Every equation whose residual at `values` is unresolved or exceeds `tolerance`
///
/// Indices are positions within `equations`.
pub fn residual_failures(
    equations: &[&Equation],
    values: &Values,
    tolerance: f64,
) -> Vec<SolveError> {
    equations
        .iter()
        .enumerate()
        .filter_map(|(index, eq)| residual_failure(index, eq, values, tolerance))
        .collect()
}

fn residual_failure(
    index: usize,
    eq: &Equation,
    values: &Values,
    tolerance: f64,
) -> Option<SolveError> {
    let missing = eq.unresolved(values);
    if !missing.is_empty() {
        return Some(SolveError::MissingValues {
            index,
            equation: eq.to_string(),
            missing,
        });
    }
    match eq.evaluate(values) {
        Err(e) => Some(e),
        Ok(residual) if !(residual.abs() <= tolerance) => Some(SolveError::UnsatisfiedEquation {
            index,
            equation: eq.to_string(),
            residual,
            tolerance,
        }),
        Ok(_) => None,
    }
}

/// Require as many unknown-error variables as active equations
pub fn check_determinacy(classification: &Classification, equations: usize) -> Result<()> {
    let unknowns = classification.unknown.len();
    if unknowns == equations {
        return Ok(());
    }
    let difference = equations.abs_diff(unknowns);
    let advice = if equations > unknowns {
        format!(
            "To correct, remove ({}) errors in [{}] or adjust the input equations.",
            difference,
            classification.known.join(", ")
        )
    } else {
        format!(
            "To correct, add ({}) errors in [{}] or adjust the input equations.",
            difference,
            classification.unknown.join(", ")
        )
    };
    Err(SolveError::IndeterminateSystem {
        equations,
        unknowns,
        advice,
    })
}

/// Restricted symbols, then residuals, then determinacy; first failure wins
pub fn check(
    equations: &[&Equation],
    values: &Values,
    errors: &Values,
    tolerance: f64,
) -> Result<()> {
    check_restricted(values, errors)?;
    if let Some(failure) = residual_failures(equations, values, tolerance).into_iter().next() {
        return Err(failure);
    }
    let classification = classify(values, errors, &variables_of(equations));
    check_determinacy(&classification, equations.len())
}

/// Run every check, including a missing-variable check, and collect the failures
pub fn diagnose(
    equations: &[&Equation],
    values: &Values,
    errors: &Values,
    tolerance: f64,
) -> CheckReport {
    let mut messages = Vec::new();

    if let Err(e) = check_restricted(values, errors) {
        messages.push(e.to_string());
    }
    messages.extend(
        residual_failures(equations, values, tolerance)
            .iter()
            .map(ToString::to_string),
    );

    let vars = variables_of(equations);
    let missing = missing_variables(values, errors, &vars);
    if !missing.is_empty() {
        let names: Vec<String> = missing.into_iter().collect();
        messages.push(format!(
            "Variables [{}] have neither a value nor an error",
            names.join(", ")
        ));
    }

    if let Err(e) = check_determinacy(&classify(values, errors, &vars), equations.len()) {
        messages.push(e.to_string());
    }

    debug!(failures = messages.len(), "diagnosed inputs");
    CheckReport {
        ok: messages.is_empty(),
        messages,
    }
}

fn variables_of(equations: &[&Equation]) -> BTreeSet<String> {
    equations
        .iter()
        .flat_map(|eq| eq.variables().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_equation;

    fn map(pairs: &[(&str, f64)]) -> Values {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn equations(texts: &[&str]) -> Vec<Equation> {
        texts
            .iter()
            .map(|t| Equation::from_expr(*t, parse_equation(t).unwrap()))
            .collect()
    }

    #[test]
    fn test_restricted_symbols() {
        let err =
            check_restricted(&map(&[("I", 2.0), ("R", 3.0)]), &map(&[("pi", 0.1)])).unwrap_err();
        assert_eq!(
            err,
            SolveError::RestrictedSymbol {
                names: vec!["I".to_string(), "pi".to_string()],
            }
        );
        assert!(check_restricted(&map(&[("oo", 1.0)]), &map(&[])).is_ok());
    }

    #[test]
    fn test_determinacy_advice() {
        let c = Classification {
            known: vec!["h".to_string()],
            unknown: vec!["A".to_string(), "V".to_string(), "r".to_string()],
        };
        let err = check_determinacy(&c, 2).unwrap_err();
        assert!(err.to_string().contains("add (1) errors in [A, V, r]"));
        assert!(err.to_string().contains("(2) < number of unknowns (3)"));
    }

    #[test]
    fn test_residual_tolerance() {
        let eqs = equations(&["y = 2*x"]);
        let refs: Vec<&Equation> = eqs.iter().collect();
        assert!(residual_failures(&refs, &map(&[("x", 1.0), ("y", 2.005)]), 0.01).is_empty());
        let failures = residual_failures(&refs, &map(&[("x", 1.0), ("y", 2.5)]), 0.01);
        assert!(matches!(
            failures.as_slice(),
            [SolveError::UnsatisfiedEquation { index: 0, .. }]
        ));
    }

    #[test]
    fn test_diagnose_accumulates() {
        let eqs = equations(&["y = 2*x", "z = x + w"]);
        let refs: Vec<&Equation> = eqs.iter().collect();
        let values = map(&[("x", 1.0), ("y", 3.0), ("I", 0.0)]);
        let report = diagnose(&refs, &values, &map(&[("x", 0.1)]), 0.01);
        assert!(!report.ok);
        // restricted, unsatisfied, missing values, missing variables, determinacy
        assert_eq!(report.messages.len(), 5, "{}", report.message());
        assert!(matches!(report.into_result(), Err(SolveError::CheckFailed { .. })));
    }

    #[test]
    fn test_passing_report() {
        let eqs = equations(&["y = 2*x"]);
        let refs: Vec<&Equation> = eqs.iter().collect();
        let report = diagnose(&refs, &map(&[("x", 1.0), ("y", 2.0)]), &map(&[("x", 0.1)]), 0.01);
        assert!(report.ok, "{}", report.message());
        assert!(report.into_result().is_ok());
    }
}
