//! Loads acting along an element

use serde::{Deserialize, Serialize};

use crate::dof::Dof;
use crate::error::{BvpError, BvpResult};

/// Load on an element, in local element coordinates
///
/// `kind` names the local direction the load acts in: [`Dof::Ux`] for axial forces,
/// [`Dof::Uz`] for transverse forces and [`Dof::Phiy`] for moments. Positions are measured
/// from the start node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ElementLoad {
    /// Force or moment at a single position
    Concentrated { kind: Dof, position: f64, value: f64 },
    /// Distributed load of constant magnitude over the whole element
    Constant { kind: Dof, value: f64 },
    /// Distributed load varying linearly from `first` at the start to `last` at the end
    Linear { kind: Dof, first: f64, last: f64 },
}

impl ElementLoad {
    /// Create a concentrated load; negative positions are rejected
    pub fn concentrated(kind: Dof, position: f64, value: f64) -> BvpResult<Self> {
        if position < 0.0 {
            return Err(BvpError::InvalidInput(format!(
                "can't apply element load at negative x = {position}"
            )));
        }

        Ok(Self::Concentrated {
            kind,
            position,
            value,
        })
    }

    pub fn constant(kind: Dof, value: f64) -> Self {
        Self::Constant { kind, value }
    }

    pub fn linear(kind: Dof, first: f64, last: f64) -> Self {
        Self::Linear { kind, first, last }
    }

    pub fn kind(&self) -> Dof {
        match *self {
            Self::Concentrated { kind, .. } | Self::Constant { kind, .. } | Self::Linear { kind, .. } => {
                kind
            }
        }
    }
}
