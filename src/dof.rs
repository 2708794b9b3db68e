//! Symbolic degrees of freedom, nodes and nodal values
//!
//! Raw matrix positions are error-prone, so the problem is described with [`Index`] values
//! (node id plus [`Dof`]) for as long as possible. Only the equation layout turns them into
//! integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Degree of freedom at a node, declared in its canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dof {
    /// Displacement in X direction
    Ux,
    /// Displacement in Z direction
    Uz,
    /// Displacement in Y direction
    Uy,
    /// Rotation about Y axis
    Phiy,
    /// Rotation about Z axis
    Phiz,
    /// Rotation about X axis
    Phix,
}

impl Dof {
    /// All degrees of freedom in canonical order
    pub const ALL: [Dof; 6] = [Dof::Ux, Dof::Uz, Dof::Uy, Dof::Phiy, Dof::Phiz, Dof::Phix];
}

impl fmt::Display for Dof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Symbolic position in the global system: a node id paired with a degree of freedom
///
/// Ordered by node id first, then by [`Dof`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Index {
    pub node: String,
    pub dof: Dof,
}

impl Index {
    pub fn new(node: &str, dof: Dof) -> Self {
        Self {
            node: node.to_string(),
            dof,
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.node, self.dof)
    }
}

/// A scalar associated with an [`Index`], used for boundary conditions and results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodalValue {
    pub index: Index,
    pub value: f64,
}

impl NodalValue {
    pub fn new(node: &str, dof: Dof, value: f64) -> Self {
        Self {
            index: Index::new(node, dof),
            value,
        }
    }
}

/// A mesh vertex; coordinates are in meters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(id: &str, x: f64, y: f64, z: f64) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
            z,
        }
    }

    /// Create a node in the X-Z plane
    pub fn xz(id: &str, x: f64, z: f64) -> Self {
        Self::new(id, x, 0.0, z)
    }

    /// Shorthand for the [`Index`] of this node and `dof`
    pub fn index(&self, dof: Dof) -> Index {
        Index::new(&self.id, dof)
    }

    /// Euclidean distance to another node
    pub fn distance(&self, other: &Node) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2) + (other.z - self.z).powi(2))
            .sqrt()
    }
}

/// A function that elements can interpolate along their axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fct {
    Ux,
    Uz,
    Uy,
    Phiy,
    Phiz,
    Phix,
    /// Normal force
    Nx,
    /// Shear force in local z direction
    Vz,
    /// Shear force in local y direction
    Vy,
    /// Bending moment about local y axis
    My,
    /// Bending moment about local z axis
    Mz,
    /// Torsional moment
    Mx,
}

impl Fct {
    pub const ALL: [Fct; 12] = [
        Fct::Ux,
        Fct::Uz,
        Fct::Uy,
        Fct::Phiy,
        Fct::Phiz,
        Fct::Phix,
        Fct::Nx,
        Fct::Vz,
        Fct::Vy,
        Fct::My,
        Fct::Mz,
        Fct::Mx,
    ];
}

impl fmt::Display for Fct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
