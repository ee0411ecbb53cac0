//! First-Order Error Propagation Library
//!
//! Estimates propagated error tolerances for systems of algebraic equations.
//! Given measured values for every variable and known error tolerances for a
//! subset of them, the unknown errors are solved from the total-derivative
//! relationship `|Ju| xu = |Jk| xk`, where `Ju` and `Jk` are the Jacobian
//! blocks of the unknown-error and known-error variables.
//!
//! # Features
//! - Equation parsing (`lhs = rhs` normalized to `lhs - (rhs) = 0`)
//! - Exact symbolic partial derivatives, computed once per equation
//! - Function-backed equations with hand-written partials
//! - Named equation subsets ("combos") and a small definition format
//! - Tolerance (worst-case) and standard-deviation (root-sum-square) modes
//! - Multi-stage pipelines forwarding solved errors between stages
//!
//! # Usage Examples
//!
//! ```
//! use symb_propagate::{ErrorSolver, SolveOptions, Values};
//!
//! let solver = ErrorSolver::new(&["A = pi*r**2", "V = A*h"]).unwrap();
//!
//! let values: Values = [("h", 12.0), ("r", 5.0), ("A", 78.539816), ("V", 942.477796)]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v))
//!     .collect();
//! let errors: Values = [("h", 0.05), ("r", 0.05)]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v))
//!     .collect();
//!
//! let table = solver.solve(&values, &errors, &SolveOptions::new()).unwrap();
//! let volume = table.get("V").unwrap();
//! assert!(volume.is_calc);
//! assert!((volume.error - 22.7765).abs() < 1e-3);
//! ```

mod ast;
pub mod classify;
mod config;
mod constants;
pub mod definition;
mod differentiation;
mod display;
mod equation;
mod equation_set;
mod error;
mod evaluator;
pub(crate) mod functions;
mod parser;
mod pipeline;
mod solver;
mod table;
mod traits;
pub mod validate;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

// Re-export key types for easier usage
pub use ast::{Expr, ExprKind};
pub use classify::Classification;
pub use config::SolverConfig;
pub use constants::{Constant, restricted_names};
pub use equation::{Equation, Evaluable, NativeEquation, NativeFn};
pub use equation_set::EquationSet;
pub use error::{Result, SolveError, Span};
pub use parser::{parse, parse_equation, parse_equation_limited};
pub use pipeline::{Link, SolverPipeline, Stage};
pub use solver::{ErrorSolver, Jacobian, SolveOptions};
pub use table::{ResultRow, ResultTable};
pub use validate::CheckReport;

/// Variable name to numeric value (measured values, errors or constant errors)
pub type Values = HashMap<String, f64>;

/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count
pub const DEFAULT_MAX_NODES: usize = 10_000;
/// Default absolute residual tolerance for the value check
pub const DEFAULT_TOLERANCE: f64 = 0.01;
