use std::f64::consts::PI;

use approx::assert_relative_eq;

use super::{AREA, VOLUME, init_tracing, vals};
use crate::{ErrorSolver, Link, SolveError, SolverPipeline, Values};

fn pipeline() -> SolverPipeline {
    SolverPipeline::new()
        .stage(ErrorSolver::from_definition(AREA).unwrap())
        .linked_stage(ErrorSolver::from_definition(VOLUME).unwrap(), [Link::new("area", "area")])
}

fn inputs() -> ([Values; 2], [Values; 2]) {
    let values = [
        vals(&[("radius", 5.0), ("area", 78.539816)]),
        vals(&[("height", 12.0), ("area", 78.539816), ("volume", 942.477796)]),
    ];
    let errors = [vals(&[("radius", 0.05)]), vals(&[("height", 0.05)])];
    (values, errors)
}

#[test]
fn test_area_then_volume() {
    init_tracing();
    let (values, errors) = inputs();
    let table = pipeline().solve(&values, &errors, None, true, false).unwrap();

    let volume = table.get("volume").unwrap();
    assert_relative_eq!(volume.value, 942.477796, max_relative = 0.01);
    assert_relative_eq!(volume.error, 22.78, max_relative = 0.01);
    assert_relative_eq!(volume.pct_error, 2.42, max_relative = 0.01);
    assert!(volume.is_calc);
    assert_eq!(volume.stage, Some(2));

    // The area error solved in stage 1 is a known error in stage 2
    let solved = table.get_in_stage(1, "area").unwrap();
    let forwarded = table.get_in_stage(2, "area").unwrap();
    assert!(solved.is_calc);
    assert!(!forwarded.is_calc);
    assert_relative_eq!(forwarded.error, 0.5 * PI, epsilon = 1e-9);
    assert_eq!(solved.error, forwarded.error);

    let stages: Vec<usize> = table.iter().filter_map(|r| r.stage).collect();
    assert_eq!(stages, vec![1, 1, 2, 2, 2]);
}

#[test]
fn test_link_overrides_supplied_error() {
    let (values, mut errors) = inputs();
    errors[1].insert("area".to_string(), 100.0);
    let table = pipeline().solve(&values, &errors, None, true, false).unwrap();
    assert_relative_eq!(table.get_in_stage(2, "area").unwrap().error, 0.5 * PI, epsilon = 1e-9);
}

#[test]
fn test_constants_per_stage() {
    let (values, errors) = inputs();
    let consts = [vals(&[]), vals(&[("height", 0.01)])];
    let table = pipeline()
        .solve(&values, &errors, Some(&consts), true, false)
        .unwrap();
    let expected = 12.0 * 0.5 * PI + 78.539816 * 0.06;
    assert_relative_eq!(table.get("volume").unwrap().error, expected, epsilon = 1e-6);
}

#[test]
fn test_constants_shape() {
    let (values, errors) = inputs();
    let consts = [vals(&[])];
    let err = pipeline()
        .solve(&values, &errors, Some(&consts), true, false)
        .unwrap_err();
    assert!(matches!(
        err,
        SolveError::PipelineShape {
            what: "constant error maps",
            expected: 2,
            got: 1,
        }
    ));
}

#[test]
fn test_unknown_link_source() {
    let pipeline = SolverPipeline::new()
        .stage(ErrorSolver::from_definition(AREA).unwrap())
        .linked_stage(ErrorSolver::from_definition(VOLUME).unwrap(), [("base", "area")]);
    let (values, errors) = inputs();
    let err = pipeline.solve(&values, &errors, None, true, false).unwrap_err();
    assert!(matches!(
        err,
        SolveError::UnknownLinkVariable { stage: 2, ref from, .. } if from == "base"
    ));
}

#[test]
fn test_stage_combo() {
    let mut first = ErrorSolver::from_definition(AREA).unwrap();
    first.equation_set_mut().add_combo("circle", [0]).unwrap();
    let pipeline = SolverPipeline::new()
        .stage(first)
        .with_combo("circle")
        .linked_stage(ErrorSolver::from_definition(VOLUME).unwrap(), [("area", "area")]);
    assert_eq!(pipeline.stages()[0].combo(), Some("circle"));
    assert_eq!(pipeline.stages()[1].combo(), None);

    let (values, errors) = inputs();
    assert!(pipeline.solve(&values, &errors, None, true, false).is_ok());
}

#[test]
fn test_unknown_stage_combo_is_wrapped() {
    let pipeline = SolverPipeline::new()
        .stage(ErrorSolver::from_definition(AREA).unwrap())
        .with_combo("missing");
    let (values, errors) = inputs();
    let err = pipeline
        .solve(&values[..1], &errors[..1], None, true, false)
        .unwrap_err();
    match err {
        SolveError::Stage { stage, source } => {
            assert_eq!(stage, 1);
            assert!(matches!(*source, SolveError::UnknownCombo { .. }));
        }
        other => panic!("Expected stage error, got {:?}", other),
    }
}
