//! Multi-stage solves where solved errors feed the next stage's known errors

use tracing::debug;

use crate::error::{Result, SolveError};
use crate::{ErrorSolver, ResultTable, SolveOptions, Values};

/// Routes the solved error of `from` in the previous stage to the known error `to`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub from: String,
    pub to: String,
}

impl Link {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl From<(&str, &str)> for Link {
    fn from((from, to): (&str, &str)) -> Self {
        Link::new(from, to)
    }
}

/// One solver of a pipeline with its incoming links and optional combo
#[derive(Debug, Clone)]
pub struct Stage {
    solver: ErrorSolver,
    links: Vec<Link>,
    combo: Option<String>,
}

impl Stage {
    pub fn solver(&self) -> &ErrorSolver {
        &self.solver
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn combo(&self) -> Option<&str> {
        self.combo.as_deref()
    }
}

/// Solvers run in sequence
///
/// # Example
/// ```
/// use symb_propagate::{ErrorSolver, SolverPipeline, Values};
///
/// fn vals(pairs: &[(&str, f64)]) -> Values {
///     pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
/// }
///
/// let pipeline = SolverPipeline::new()
///     .stage(ErrorSolver::new(&["area = pi*radius**2"]).unwrap())
///     .linked_stage(
///         ErrorSolver::new(&["volume = area*height"]).unwrap(),
///         [("area", "area")],
///     );
///
/// let values = [
///     vals(&[("radius", 5.0), ("area", 78.539816)]),
///     vals(&[("height", 12.0), ("area", 78.539816), ("volume", 942.477796)]),
/// ];
/// let errors = [vals(&[("radius", 0.05)]), vals(&[("height", 0.05)])];
///
/// let table = pipeline.solve(&values, &errors, None, true, false).unwrap();
/// assert!((table.get("volume").unwrap().error - 22.78).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverPipeline {
    stages: Vec<Stage>,
}

impl SolverPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage without links
    pub fn stage(mut self, solver: ErrorSolver) -> Self {
        self.stages.push(Stage {
            solver,
            links: Vec::new(),
            combo: None,
        });
        self
    }

    /// Append a stage whose known errors are partly taken from the previous stage
    pub fn linked_stage<I, L>(mut self, solver: ErrorSolver, links: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Link>,
    {
        self.stages.push(Stage {
            solver,
            links: links.into_iter().map(Into::into).collect(),
            combo: None,
        });
        self
    }

    /// Use an equation combination for the most recently added stage
    pub fn with_combo(mut self, combo: impl Into<String>) -> Self {
        if let Some(stage) = self.stages.last_mut() {
            stage.combo = Some(combo.into());
        }
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Solve every stage in order
    ///
    /// `values`, `errors` and (when given) `consts` hold one map per stage.
    /// Rows of the returned table carry their 1-based stage number.
    pub fn solve(
        &self,
        values: &[Values],
        errors: &[Values],
        consts: Option<&[Values]>,
        check: bool,
        stdev: bool,
    ) -> Result<ResultTable> {
        self.check_shape("value maps", values.len())?;
        self.check_shape("error maps", errors.len())?;
        if let Some(consts) = consts {
            self.check_shape("constant error maps", consts.len())?;
        }

        let mut results: Vec<ResultTable> = Vec::with_capacity(self.stages.len());
        for (i, stage) in self.stages.iter().enumerate() {
            let number = i + 1;
            let errs = self.linked_errors(number, stage, &errors[i], results.last())?;

            let mut options = SolveOptions::new().check(check).stdev(stdev);
            if let Some(combo) = &stage.combo {
                options = options.combo(combo.clone());
            }
            if let Some(consts) = consts {
                options = options.consts(consts[i].clone());
            }

            debug!(stage = number, links = stage.links.len(), "solving pipeline stage");
            let table = stage
                .solver
                .solve(&values[i], &errs, &options)
                .map_err(|e| e.in_stage(number))?;
            results.push(table.with_stage(number));
        }

        Ok(ResultTable::concat(results))
    }

    fn check_shape(&self, what: &'static str, got: usize) -> Result<()> {
        if got == self.stages.len() {
            Ok(())
        } else {
            Err(SolveError::PipelineShape {
                what,
                expected: self.stages.len(),
                got,
            })
        }
    }

    /// Stage errors with every link target overwritten by the previous result
    fn linked_errors(
        &self,
        number: usize,
        stage: &Stage,
        errors: &Values,
        previous: Option<&ResultTable>,
    ) -> Result<Values> {
        let mut errs = errors.clone();
        if stage.links.is_empty() {
            return Ok(errs);
        }

        let link_error = |link: &Link, reason: String| SolveError::UnknownLinkVariable {
            stage: number,
            from: link.from.clone(),
            to: link.to.clone(),
            reason,
        };

        let Some(previous) = previous else {
            return Err(link_error(
                &stage.links[0],
                "the first stage has no previous result to link from".to_string(),
            ));
        };
        let variables = stage
            .solver
            .equation_variables(stage.combo.as_deref())
            .map_err(|e| e.in_stage(number))?;

        for link in &stage.links {
            let row = previous.get(&link.from).ok_or_else(|| {
                link_error(
                    link,
                    format!("'{}' is not in the stage {} result", link.from, number - 1),
                )
            })?;
            if !variables.contains(&link.to) {
                return Err(link_error(
                    link,
                    format!("'{}' is not a variable of the stage {} equations", link.to, number),
                ));
            }
            errs.insert(link.to.clone(), row.error);
        }
        Ok(errs)
    }
}
