//! Solver configuration
//!
//! # TOML Example
//!
//! ```toml
//! tolerance = 0.001
//! max_depth = 200
//! ```
//!
//! Omitted keys take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolveError};
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, DEFAULT_TOLERANCE};

/// Settings shared by every solve of an [`ErrorSolver`](crate::ErrorSolver)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Largest absolute equation residual accepted by the value check
    pub tolerance: f64,
    /// Maximum AST nesting depth of a parsed equation
    pub max_depth: usize,
    /// Maximum AST node count of a parsed equation
    pub max_nodes: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML configuration text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SolverConfig =
            toml::from_str(text).map_err(|e| SolveError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Reject negative or non-finite tolerances and zero limits
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SolveError::Config(format!(
                "tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        if self.max_depth == 0 || self.max_nodes == 0 {
            return Err(SolveError::Config(
                "max_depth and max_nodes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance, 0.01);
        assert_eq!(config.max_depth, 100);
        assert_eq!(config.max_nodes, 10_000);
    }

    #[test]
    fn test_partial_toml() {
        let config = SolverConfig::from_toml_str("tolerance = 0.001\n").unwrap();
        assert_eq!(config, SolverConfig::new().tolerance(0.001));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            SolverConfig::from_toml_str("tolerance = \"loose\""),
            Err(SolveError::Config(_))
        ));
        assert!(matches!(
            SolverConfig::from_toml_str("tol = 0.1"),
            Err(SolveError::Config(_))
        ));
        assert!(matches!(
            SolverConfig::from_toml_str("tolerance = -1.0"),
            Err(SolveError::Config(_))
        ));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = SolverConfig::new().max_depth(20).max_nodes(500);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SolverConfig::from_toml_str(&text).unwrap(), config);
    }
}
