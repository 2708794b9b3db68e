//! Solver options

use serde::{Deserialize, Serialize};

/// Options for the linear solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Dirichlet values with a magnitude above this count as non-zero, which triggers the
    /// right-hand side correction of the free block
    pub dirichlet_zero_tol: f64,
    /// Log an info line per solve
    pub log: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            dirichlet_zero_tol: 1e-12,
            log: true,
        }
    }
}

impl SolverOptions {
    /// Enable or disable the per-solve info line
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Set the threshold for non-zero Dirichlet values
    pub fn with_dirichlet_zero_tol(mut self, tol: f64) -> Self {
        self.dirichlet_zero_tol = tol;
        self
    }
}
