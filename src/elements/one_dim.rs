//! Geometry shared by elements spanning two nodes

use crate::dof::{Dof, Index, Node};
use crate::error::{BvpError, BvpResult};

const MIN_LENGTH: f64 = 1e-10;

/// Straight element between a start and an end node
#[derive(Debug, Clone)]
pub struct OneDim {
    id: String,
    start: Node,
    end: Node,
    length: f64,
}

impl OneDim {
    /// Empty ids and coincident nodes are rejected
    pub fn new(id: &str, start: &Node, end: &Node) -> BvpResult<Self> {
        if id.is_empty() {
            return Err(BvpError::InvalidInput(format!(
                "element between '{}' and '{}' has an empty id",
                start.id, end.id
            )));
        }

        let length = start.distance(end);

        if length < MIN_LENGTH {
            return Err(BvpError::InvalidGeometry(format!(
                "element '{id}' has zero length"
            )));
        }

        Ok(Self {
            id: id.to_string(),
            start: start.clone(),
            end: end.clone(),
            length,
        })
    }

    /// Like [`OneDim::new`], but the element must lie in the X-Z plane
    pub fn new_xz(id: &str, start: &Node, end: &Node) -> BvpResult<Self> {
        let geometry = Self::new(id, start, end)?;

        if (end.y - start.y).abs() > MIN_LENGTH {
            return Err(BvpError::InvalidGeometry(format!(
                "element '{id}' is not parallel to the X-Z plane"
            )));
        }

        Ok(geometry)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn start(&self) -> &Node {
        &self.start
    }

    pub fn end(&self) -> &Node {
        &self.end
    }

    /// Direction cosines of the element axis to the global X, Y and Z axes
    pub fn direction_cosines(&self) -> [f64; 3] {
        [
            (self.end.x - self.start.x) / self.length,
            (self.end.y - self.start.y) / self.length,
            (self.end.z - self.start.z) / self.length,
        ]
    }

    /// Indices of both nodes for the given dofs, start node first
    pub fn indices<const N: usize>(&self, dofs: [Dof; N]) -> ([Index; N], [Index; N]) {
        (
            dofs.map(|dof| self.start.index(dof)),
            dofs.map(|dof| self.end.index(dof)),
        )
    }
}
