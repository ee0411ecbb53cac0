use approx::assert_relative_eq;

use super::{CYLINDER, cylinder_values, init_tracing, vals};
use crate::{ErrorSolver, SolveError, SolveOptions};

fn solver() -> ErrorSolver {
    ErrorSolver::from_definition(CYLINDER).unwrap()
}

#[test]
fn test_solve_cylinder() {
    init_tracing();
    let errors = vals(&[("height", 0.05), ("radius", 0.05)]);
    let table = solver().solve(&cylinder_values(), &errors, &SolveOptions::new()).unwrap();

    assert_eq!(
        table.iter().map(|r| r.var.as_str()).collect::<Vec<_>>(),
        vec!["area", "height", "radius", "volume"]
    );

    let volume = table.get("volume").unwrap();
    assert_relative_eq!(volume.value, 942.477796);
    assert_relative_eq!(volume.error, 22.78, max_relative = 0.01);
    assert_relative_eq!(volume.pct_error, 2.42, max_relative = 0.01);
    assert!(volume.is_calc);

    let area = table.get("area").unwrap();
    assert_relative_eq!(area.error, 0.5 * std::f64::consts::PI, epsilon = 1e-9);
    assert!(area.is_calc);

    let height = table.get("height").unwrap();
    assert_eq!(height.error, 0.05);
    assert!(!height.is_calc);
}

#[test]
fn test_too_few_errors() {
    let errors = vals(&[("height", 0.05)]);
    let err = solver().solve(&cylinder_values(), &errors, &SolveOptions::new()).unwrap_err();
    match err {
        SolveError::IndeterminateSystem {
            equations,
            unknowns,
            advice,
        } => {
            assert_eq!((equations, unknowns), (2, 3));
            assert!(advice.contains("add (1) errors in [area, radius, volume]"));
        }
        other => panic!("Expected indeterminate system, got {:?}", other),
    }
}

#[test]
fn test_too_many_errors() {
    let errors = vals(&[("height", 0.05), ("radius", 0.05), ("area", 0.05)]);
    let err = solver().solve(&cylinder_values(), &errors, &SolveOptions::new()).unwrap_err();
    match err {
        SolveError::IndeterminateSystem {
            equations,
            unknowns,
            advice,
        } => {
            assert_eq!((equations, unknowns), (2, 1));
            assert!(advice.contains("remove (1) errors in [area, height, radius]"));
        }
        other => panic!("Expected indeterminate system, got {:?}", other),
    }
}

#[test]
fn test_values_violate_equation() {
    let mut values = cylinder_values();
    values.insert("volume".to_string(), 900.0);
    let errors = vals(&[("height", 0.05), ("radius", 0.05)]);
    let err = solver().solve(&values, &errors, &SolveOptions::new()).unwrap_err();
    match err {
        SolveError::UnsatisfiedEquation {
            index,
            equation,
            residual,
            tolerance,
        } => {
            assert_eq!(index, 1);
            assert_eq!(equation, "volume - area * height");
            assert!(residual < -42.0);
            assert_eq!(tolerance, 0.01);
        }
        other => panic!("Expected unsatisfied equation, got {:?}", other),
    }
}

#[test]
fn test_unchecked_solve_skips_residuals() {
    let mut values = cylinder_values();
    values.insert("volume".to_string(), 900.0);
    let errors = vals(&[("height", 0.05), ("radius", 0.05)]);
    let table = solver()
        .solve(&values, &errors, &SolveOptions::new().check(false))
        .unwrap();
    assert_eq!(table.get("volume").unwrap().value, 900.0);
}

#[test]
fn test_missing_value() {
    let mut values = cylinder_values();
    values.remove("volume");
    let errors = vals(&[("height", 0.05), ("radius", 0.05)]);
    let err = solver().solve(&values, &errors, &SolveOptions::new()).unwrap_err();
    assert_eq!(
        err,
        SolveError::MissingValues {
            index: 1,
            equation: "volume - area * height".to_string(),
            missing: vec!["volume".to_string()],
        }
    );
}

#[test]
fn test_restricted_symbol() {
    let solver = ErrorSolver::new(&["V = I * R"]).unwrap();
    let values = vals(&[("V", 10.0), ("I", 2.0), ("R", 5.0)]);
    let errors = vals(&[("R", 0.1)]);
    let err = solver.solve(&values, &errors, &SolveOptions::new()).unwrap_err();
    assert_eq!(
        err,
        SolveError::RestrictedSymbol {
            names: vec!["I".to_string()],
        }
    );
}

#[test]
fn test_variable_queries() {
    let solver = solver();
    let mut values = cylinder_values();
    values.remove("radius");
    values.insert("density".to_string(), 7.8);
    let errors = vals(&[("height", 0.05), ("mass", 1.0)]);

    let used = solver.used_variables(&values, &errors, None).unwrap();
    assert_eq!(used.known, vec!["height"]);
    assert_eq!(used.unknown, vec!["area", "volume"]);

    let unused: Vec<String> = solver
        .unused_variables(&values, &errors, None)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(unused, vec!["density", "mass"]);

    let missing: Vec<String> = solver
        .missing_variables(&values, &errors, None)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(missing, vec!["radius"]);
}

#[test]
fn test_diagnose_reports_everything() {
    let mut values = cylinder_values();
    values.insert("volume".to_string(), 900.0);
    let errors = vals(&[("height", 0.05)]);
    let report = solver().diagnose(&values, &errors, None).unwrap();
    assert!(!report.ok);
    assert_eq!(report.messages.len(), 2);
    let message = report.message();
    assert!(message.contains("value check tolerance exceeded"));
    assert!(message.contains("Indeterminate system"));
    assert_eq!(message.lines().count(), 2);
}
