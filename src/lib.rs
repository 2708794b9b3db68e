//! FEA BVP - linear boundary value problems with the finite element method
//!
//! This library assembles and solves linear static problems of plane structures:
//! - Truss, beam and frame elements in the X-Z plane
//! - Hinges, condensed statically per element
//! - Prescribed displacements (Dirichlet), nodal loads (Neumann) and inclined supports
//! - Reactions and piecewise polynomial interpolation of displacements and internal forces
//!
//! ## Example
//! ```rust
//! use std::collections::BTreeSet;
//! use fea_bvp::prelude::*;
//!
//! let mut problem = Problem::new();
//! let a = Node::xz("A", 0.0, 0.0);
//! let b = Node::xz("B", 4.0, 0.0);
//! problem.add_node(a.clone()).unwrap();
//! problem.add_node(b.clone()).unwrap();
//!
//! let section = Section::rectangular(0.3, 0.5).unwrap();
//! let frame = Frame2d::new("F1", &a, &b, &Material::steel(), &section, &BTreeSet::new()).unwrap();
//! problem.add_element(frame).unwrap();
//!
//! // Cantilever clamped at A, loaded at B
//! for dof in [Dof::Ux, Dof::Uz, Dof::Phiy] {
//!     problem.add_dirichlet("A", dof, 0.0).unwrap();
//! }
//! problem.add_neumann("B", Dof::Uz, -10e3).unwrap();
//!
//! let result = problem.solve(&CholeskySolver, SolverOptions::default()).unwrap();
//! let deflection = result.primary(&Index::new("B", Dof::Uz)).unwrap();
//! assert!(deflection < 0.0);
//!
//! let moment = result.interpolate("F1", Fct::My, 1e-10).unwrap().unwrap();
//! assert!((moment.piecewise.eval(0.0).unwrap() - 40e3).abs() < 1e-6);
//! ```

pub mod analysis;
pub mod condensation;
pub mod dof;
pub mod elements;
pub mod error;
pub mod layout;
pub mod loads;
pub mod polynomial;
pub mod problem;
pub mod results;
pub mod solver;
pub mod transform;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::SolverOptions;
    pub use crate::dof::{Dof, Fct, Index, NodalValue, Node};
    pub use crate::elements::{Beam2d, Element, Frame2d, Material, Section, Truss2d};
    pub use crate::error::{BvpError, BvpResult};
    pub use crate::layout::EqLayout;
    pub use crate::loads::ElementLoad;
    pub use crate::polynomial::{PolyPiece, PolySequence};
    pub use crate::problem::Problem;
    pub use crate::results::{Interpolation, ProblemResult};
    pub use crate::solver::{CholeskySolver, EquationSolver, LinearSolver, LuSolver, Solution};
    pub use crate::transform::{InclinedSupport, Transformer};
}
