//! Material properties

use serde::{Deserialize, Serialize};

/// Linear-elastic, isotropic material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
}

impl Material {
    pub fn linear_elastic(e: f64) -> Self {
        Self { e }
    }

    /// Structural steel
    pub fn steel() -> Self {
        Self::linear_elastic(210e9)
    }
}
