//! Cross-section properties

use serde::{Deserialize, Serialize};

use crate::error::{BvpError, BvpResult};

/// Cross-section properties of one-dimensional elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Area in m²
    pub a: f64,
    /// Second moment of area about the local y axis in m⁴
    pub iyy: f64,
}

impl Section {
    /// Section with given constants
    pub fn new(a: f64, iyy: f64) -> Self {
        Self { a, iyy }
    }

    /// Solid rectangle of width `b` (along local y) and height `h` (along local z)
    pub fn rectangular(b: f64, h: f64) -> BvpResult<Self> {
        if b <= 0.0 || h <= 0.0 {
            return Err(BvpError::InvalidGeometry(format!(
                "rectangular section needs positive dimensions, got b = {b}, h = {h}"
            )));
        }

        Ok(Self {
            a: b * h,
            iyy: b * h.powi(3) / 12.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular() {
        let section = Section::rectangular(0.2, 0.3).unwrap();

        assert_relative_eq!(section.a, 0.06);
        assert_relative_eq!(section.iyy, 4.5e-4, max_relative = 1e-12);
    }

    #[test]
    fn test_rectangular_rejects_zero() {
        assert!(Section::rectangular(0.0, 0.3).is_err());
        assert!(Section::rectangular(0.2, -1.0).is_err());
    }
}
