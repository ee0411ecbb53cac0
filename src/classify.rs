//! Partitioning of equation variables into known-error and unknown-error sets

use std::collections::BTreeSet;

use crate::Values;

/// Variables of the active equations split by whether their error is known
///
/// Both lists are sorted. A variable with a known error is never unknown,
/// even when it also has a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Equation variables with a supplied error
    pub known: Vec<String>,
    /// Equation variables with a value but no supplied error
    pub unknown: Vec<String>,
}

impl Classification {
    /// Jacobian column order: unknown variables, then known variables
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.unknown
            .iter()
            .chain(self.known.iter())
            .map(String::as_str)
    }
}

/// `known = vars ∩ errors`, `unknown = (vars ∩ values) − known`
pub fn classify(
    values: &Values,
    errors: &Values,
    equation_vars: &BTreeSet<String>,
) -> Classification {
    let known: Vec<String> = equation_vars
        .iter()
        .filter(|v| errors.contains_key(*v))
        .cloned()
        .collect();
    let unknown: Vec<String> = equation_vars
        .iter()
        .filter(|v| values.contains_key(*v) && !errors.contains_key(*v))
        .cloned()
        .collect();
    Classification { known, unknown }
}

/// Input names that no active equation uses
pub fn unused_variables(
    values: &Values,
    errors: &Values,
    equation_vars: &BTreeSet<String>,
) -> BTreeSet<String> {
    values
        .keys()
        .chain(errors.keys())
        .filter(|k| !equation_vars.contains(*k))
        .cloned()
        .collect()
}

/// Equation variables with neither a value nor an error
pub fn missing_variables(
    values: &Values,
    errors: &Values,
    equation_vars: &BTreeSet<String>,
) -> BTreeSet<String> {
    equation_vars
        .iter()
        .filter(|v| !values.contains_key(*v) && !errors.contains_key(*v))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> Values {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn vars(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cylinder_classification() {
        let values = map(&[("h", 12.0), ("r", 5.0), ("A", 78.54), ("V", 942.48)]);
        let errors = map(&[("h", 0.05), ("r", 0.05)]);
        let c = classify(&values, &errors, &vars(&["A", "V", "h", "r"]));
        assert_eq!(c.known, vec!["h", "r"]);
        assert_eq!(c.unknown, vec!["A", "V"]);
        assert_eq!(c.columns().collect::<Vec<_>>(), vec!["A", "V", "h", "r"]);
    }

    #[test]
    fn test_error_without_value_is_known() {
        let c = classify(&map(&[]), &map(&[("x", 0.1)]), &vars(&["x", "y"]));
        assert_eq!(c.known, vec!["x"]);
        assert!(c.unknown.is_empty());
    }

    #[test]
    fn test_unused_and_missing() {
        let values = map(&[("a", 1.0), ("extra", 2.0)]);
        let errors = map(&[("b", 0.1), ("other", 0.2)]);
        let eq_vars = vars(&["a", "b", "c"]);
        assert_eq!(unused_variables(&values, &errors, &eq_vars), vars(&["extra", "other"]));
        assert_eq!(missing_variables(&values, &errors, &eq_vars), vars(&["c"]));
    }
}
