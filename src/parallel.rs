//! Parallel batch solving using Rayon
//!
//! Enable with the `parallel` feature:
//! ```toml
//! symb_propagate = { version = "0.1", features = ["parallel"] }
//! ```

use rayon::prelude::*;

use crate::error::Result;
use crate::{ErrorSolver, ResultTable, SolveOptions, Values};

impl ErrorSolver {
    /// Solve the same system at many operating points concurrently
    ///
    /// Every point shares `errors` and `options`. Results are returned in the
    /// order of `points`, one per point, so a failing point does not affect
    /// the others.
    ///
    /// # Example
    /// ```
    /// use symb_propagate::{ErrorSolver, SolveOptions, Values};
    ///
    /// let solver = ErrorSolver::new(&["y = 2*x"]).unwrap();
    /// let points: Vec<Values> = (1..=3)
    ///     .map(|i| {
    ///         let x = i as f64;
    ///         [("x".to_string(), x), ("y".to_string(), 2.0 * x)].into_iter().collect()
    ///     })
    ///     .collect();
    /// let errors: Values = [("x".to_string(), 0.1)].into_iter().collect();
    ///
    /// let results = solver.solve_batch(&points, &errors, &SolveOptions::new());
    /// assert_eq!(results.len(), 3);
    /// ```
    pub fn solve_batch(
        &self,
        points: &[Values],
        errors: &Values,
        options: &SolveOptions,
    ) -> Vec<Result<ResultTable>> {
        points
            .par_iter()
            .map(|values| self.solve(values, errors, options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{ErrorSolver, SolveError, SolveOptions, Values};

    fn vals(pairs: &[(&str, f64)]) -> Values {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_batch_matches_sequential() {
        let solver = ErrorSolver::new(&["A = pi*r**2", "V = A*h"]).unwrap();
        let errors = vals(&[("h", 0.05), ("r", 0.05)]);
        let points: Vec<Values> = (1..=16)
            .map(|i| {
                let r = i as f64;
                let h = 2.0 * r;
                let area = std::f64::consts::PI * r * r;
                vals(&[("r", r), ("h", h), ("A", area), ("V", area * h)])
            })
            .collect();

        let batch = solver.solve_batch(&points, &errors, &SolveOptions::new());
        for (point, result) in points.iter().zip(batch) {
            let expected = solver.solve(point, &errors, &SolveOptions::new()).unwrap();
            assert_eq!(result.unwrap(), expected);
        }
    }

    #[test]
    fn test_failures_stay_per_point() {
        let solver = ErrorSolver::new(&["y = 2*x"]).unwrap();
        let errors = vals(&[("x", 0.1)]);
        let points = vec![vals(&[("x", 1.0), ("y", 2.0)]), vals(&[("x", 1.0), ("y", 5.0)])];
        let results = solver.solve_batch(&points, &errors, &SolveOptions::new());
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SolveError::UnsatisfiedEquation { .. })));
    }
}
