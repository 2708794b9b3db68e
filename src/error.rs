//! Error types for boundary value problems

use thiserror::Error;

use crate::solver::EquationSolverError;

/// Main error type for building and solving boundary value problems
#[derive(Error, Debug)]
pub enum BvpError {
    #[error("Node '{0}' not found in problem")]
    NodeNotFound(String),

    #[error("Element '{0}' not found in problem")]
    ElementNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    /// One or more Dirichlet BCs are inconsistent with the referenced indices
    #[error("{0}")]
    InvalidLayout(String),

    /// Accumulated misses of symbolic index lookups
    #[error("{count} index lookup failure(s) ({names})")]
    LookupFailure { count: usize, names: String },

    #[error("unsupported hinge setup: {0}")]
    UnsupportedHinges(String),

    #[error("all {0} degrees of freedom have Dirichlet BC, no need to solve this")]
    FullyConstrained(usize),

    #[error("failed to solve assembled linear system: {0}")]
    SolveFailed(#[source] EquationSolverError),

    #[error("x = {x} outside of polynomial domain [{x0}, {xe}]")]
    OutOfDomain { x: f64, x0: f64, xe: f64 },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for boundary value problem operations
pub type BvpResult<T> = Result<T, BvpError>;
