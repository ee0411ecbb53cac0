//! Jacobian assembly and first-order error propagation
//!
//! With `Ju` the Jacobian block of the unknown-error variables and `Jk` the
//! block of the known-error variables, the unknown errors are
//!
//! ```text
//! xu = |Ju⁻¹| (|Jk| xk + |Ju| cu)
//! ```
//!
//! where `xk` holds the known errors (plus their constant components `ck`)
//! and `cu` the constant error components of the unknown variables. In
//! standard-deviation mode every error is squared first and the results
//! are square-rooted at the end (root-sum-square combination).

use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::classify::{self, Classification};
use crate::equation::Equation;
use crate::error::{Result, SolveError};
use crate::table::{ResultRow, ResultTable};
use crate::validate::{self, CheckReport};
use crate::{EquationSet, SolverConfig, Values};

/// Per-call options for [`ErrorSolver::solve`]
///
/// # Example
/// ```
/// use symb_propagate::{SolveOptions, Values};
///
/// let consts: Values = [("h".to_string(), 0.01)].into_iter().collect();
/// let options = SolveOptions::new().consts(consts).stdev(true);
/// assert!(options.is_checked());
/// ```
#[derive(Debug, Clone)]
pub struct SolveOptions {
    consts: Option<Values>,
    combo: Option<String>,
    check: bool,
    stdev: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            consts: None,
            combo: None,
            check: true,
            stdev: false,
        }
    }
}

impl SolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constant error components added on top of the transient errors
    pub fn consts(mut self, consts: Values) -> Self {
        self.consts = Some(consts);
        self
    }

    /// Restrict the solve to a named equation combination
    pub fn combo(mut self, combo: impl Into<String>) -> Self {
        self.combo = Some(combo.into());
        self
    }

    /// Run the validator before solving (default: true)
    pub fn check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Treat errors as standard deviations (default: false, tolerances)
    pub fn stdev(mut self, stdev: bool) -> Self {
        self.stdev = stdev;
        self
    }

    pub fn combo_name(&self) -> Option<&str> {
        self.combo.as_deref()
    }

    pub fn is_checked(&self) -> bool {
        self.check
    }

    pub fn is_stdev(&self) -> bool {
        self.stdev
    }
}

/// Jacobian of the active equations at an operating point
///
/// Rows follow the active equations, columns are the unknown-error variables
/// (sorted) followed by the known-error variables (sorted).
#[derive(Debug, Clone, PartialEq)]
pub struct Jacobian {
    matrix: DMatrix<f64>,
    unknown: Vec<String>,
    known: Vec<String>,
}

impl Jacobian {
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Column names, unknown variables first
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.unknown
            .iter()
            .chain(self.known.iter())
            .map(String::as_str)
    }

    pub fn unknowns(&self) -> &[String] {
        &self.unknown
    }

    pub fn knowns(&self) -> &[String] {
        &self.known
    }

    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// `Ju`: columns of the unknown-error variables
    pub fn unknown_block(&self) -> DMatrix<f64> {
        self.matrix.columns(0, self.unknown.len()).into_owned()
    }

    /// `Jk`: columns of the known-error variables
    pub fn known_block(&self) -> DMatrix<f64> {
        self.matrix
            .columns(self.unknown.len(), self.known.len())
            .into_owned()
    }

    /// Cell of equation `row` and variable `var`
    pub fn get(&self, row: usize, var: &str) -> Option<f64> {
        let col = self.columns().position(|c| c == var)?;
        self.matrix.get((row, col)).copied()
    }
}

/// Solver for the propagated errors of a system of equations
///
/// # Example
/// ```
/// use symb_propagate::{ErrorSolver, SolveOptions, Values};
///
/// let solver = ErrorSolver::new(&["y = 3*x"]).unwrap();
/// let values: Values = [("x".to_string(), 2.0), ("y".to_string(), 6.0)].into_iter().collect();
/// let errors: Values = [("x".to_string(), 0.1)].into_iter().collect();
///
/// let table = solver.solve(&values, &errors, &SolveOptions::new()).unwrap();
/// assert!((table.get("y").unwrap().error - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorSolver {
    equations: EquationSet,
    config: SolverConfig,
}

impl ErrorSolver {
    /// Parse `equations` with the default configuration
    pub fn new(equations: &[&str]) -> Result<Self> {
        Self::with_config(equations, SolverConfig::default())
    }

    pub fn with_config(equations: &[&str], config: SolverConfig) -> Result<Self> {
        config.validate()?;
        let mut set = EquationSet::new().with_limits(config.max_depth, config.max_nodes);
        for eq in equations {
            set.add_equation(eq)?;
        }
        Ok(Self { equations: set, config })
    }

    /// Wrap an already-built equation set
    pub fn from_equation_set(equations: EquationSet, config: SolverConfig) -> Self {
        Self { equations, config }
    }

    /// Load a solver from definition text (see [`crate::definition`])
    pub fn from_definition(text: &str) -> Result<Self> {
        Self::from_definition_with_config(text, SolverConfig::default())
    }

    pub fn from_definition_with_config(text: &str, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        let mut set = EquationSet::new().with_limits(config.max_depth, config.max_nodes);
        set.load(text)?;
        Ok(Self { equations: set, config })
    }

    pub fn equation_set(&self) -> &EquationSet {
        &self.equations
    }

    pub fn equation_set_mut(&mut self) -> &mut EquationSet {
        &mut self.equations
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Free variables of the active equations
    pub fn equation_variables(&self, combo: Option<&str>) -> Result<BTreeSet<String>> {
        self.equations.variables(combo)
    }

    /// Known-error and unknown-error variables of the active equations
    pub fn used_variables(
        &self,
        values: &Values,
        errors: &Values,
        combo: Option<&str>,
    ) -> Result<Classification> {
        Ok(classify::classify(values, errors, &self.equation_variables(combo)?))
    }

    /// Input names that no active equation uses
    pub fn unused_variables(
        &self,
        values: &Values,
        errors: &Values,
        combo: Option<&str>,
    ) -> Result<BTreeSet<String>> {
        Ok(classify::unused_variables(values, errors, &self.equation_variables(combo)?))
    }

    /// Equation variables with neither a value nor an error
    pub fn missing_variables(
        &self,
        values: &Values,
        errors: &Values,
        combo: Option<&str>,
    ) -> Result<BTreeSet<String>> {
        Ok(classify::missing_variables(values, errors, &self.equation_variables(combo)?))
    }

    /// Fail-fast validation: restricted symbols, residuals, determinacy
    pub fn check(&self, values: &Values, errors: &Values, combo: Option<&str>) -> Result<()> {
        let equations = self.equations.equations(combo)?;
        validate::check(&equations, values, errors, self.config.tolerance)
    }

    /// Run every check and report all failures
    pub fn diagnose(
        &self,
        values: &Values,
        errors: &Values,
        combo: Option<&str>,
    ) -> Result<CheckReport> {
        let equations = self.equations.equations(combo)?;
        Ok(validate::diagnose(&equations, values, errors, self.config.tolerance))
    }

    /// Jacobian of the active equations evaluated at `values`
    pub fn jacobian(
        &self,
        values: &Values,
        errors: &Values,
        combo: Option<&str>,
    ) -> Result<Jacobian> {
        let equations = self.equations.equations(combo)?;
        let classification = self.used_variables(values, errors, combo)?;
        build_jacobian(&equations, classification, values)
    }

    /// Propagate the known errors onto the unknown-error variables
    pub fn solve(
        &self,
        values: &Values,
        errors: &Values,
        options: &SolveOptions,
    ) -> Result<ResultTable> {
        let combo = options.combo_name();
        let equations = self.equations.equations(combo)?;
        debug!(
            equations = equations.len(),
            combo = combo.unwrap_or("<all>"),
            stdev = options.stdev,
            "solving"
        );

        if options.check {
            validate::check(&equations, values, errors, self.config.tolerance)?;
        }

        let classification = self.used_variables(values, errors, combo)?;
        validate::check_determinacy(&classification, equations.len())?;

        let jac = build_jacobian(&equations, classification, values)?;
        let table = propagate(&jac, values, errors, options.consts.as_ref(), options.stdev)?;
        debug!(rows = table.len(), "solved");
        Ok(table)
    }
}

fn build_jacobian(
    equations: &[&Equation],
    classification: Classification,
    values: &Values,
) -> Result<Jacobian> {
    let matrix = {
        let index: FxHashMap<&str, usize> = classification
            .columns()
            .enumerate()
            .map(|(i, v)| (v, i))
            .collect();

        let mut matrix = DMatrix::zeros(equations.len(), index.len());
        for (row, eq) in equations.iter().enumerate() {
            let missing: Vec<&str> = eq.variables().filter(|v| !index.contains_key(v)).collect();
            if !missing.is_empty() {
                return Err(SolveError::Evaluation {
                    expression: eq.to_string(),
                    reason: format!("no value or error supplied for [{}]", missing.join(", ")),
                });
            }
            for var in eq.variables() {
                let Some(&col) = index.get(var) else {
                    continue;
                };
                let cell = eq.partial_at(var, values)?;
                trace!(row, var, cell, "jacobian cell");
                matrix[(row, col)] = cell;
            }
        }
        matrix
    };

    let Classification { known, unknown } = classification;
    Ok(Jacobian {
        matrix,
        unknown,
        known,
    })
}

fn propagate(
    jac: &Jacobian,
    values: &Values,
    errors: &Values,
    consts: Option<&Values>,
    stdev: bool,
) -> Result<ResultTable> {
    let n = jac.unknown.len();
    let ju = jac.unknown_block();
    let jui = ju
        .clone()
        .try_inverse()
        .filter(|inv| inv.iter().all(|v| v.is_finite()))
        .ok_or_else(|| SolveError::SingularJacobian {
            unknowns: jac.unknown.clone(),
        })?
        .abs();
    let ju = ju.abs();
    let jk = jac.known_block().abs();

    // Tolerances combine linearly, standard deviations as variances
    let scale = |x: f64| if stdev { x * x } else { x.abs() };
    let component = |map: &Values, vars: &[String]| {
        DVector::from_iterator(
            vars.len(),
            vars.iter().map(|v| scale(map.get(v).copied().unwrap_or(0.0))),
        )
    };

    let mut xk = component(errors, &jac.known);
    let mut xu = match consts {
        Some(c) if !c.is_empty() => {
            let ck = component(c, &jac.known);
            let cu = component(c, &jac.unknown);
            xk += ck;
            &jui * (&jk * &xk + &ju * cu)
        }
        _ => &jui * (&jk * &xk),
    };

    if stdev {
        xu.apply(|x| *x = x.sqrt());
        xk.apply(|x| *x = x.sqrt());
    }

    let mut rows = Vec::with_capacity(n + jac.known.len());
    for (vars, errs, is_calc) in [(&jac.unknown, &xu, true), (&jac.known, &xk, false)] {
        for (var, &error) in vars.iter().zip(errs.iter()) {
            let value = values.get(var).copied().ok_or_else(|| SolveError::Evaluation {
                expression: var.clone(),
                reason: "no value supplied".to_string(),
            })?;
            rows.push(ResultRow::new(var.clone(), value, error, is_calc));
        }
    }
    Ok(ResultTable::new(rows))
}
