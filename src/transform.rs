//! Equation transformers: changes of basis applied around the solve
//!
//! A transformer rotates rows/columns of the assembled system before it is partitioned and
//! solved, and rotates the solution and reactions back afterwards. It never prescribes values;
//! that is left to Dirichlet BCs.

use nalgebra::{DMatrix, DVector};
use std::fmt::Debug;

use crate::dof::{Index, NodalValue};
use crate::error::{BvpError, BvpResult};
use crate::layout::EqLayout;

/// Reversible change of basis on the global system
///
/// Index misses are recorded in the layout like any other lookup.
pub trait Transformer: Debug + Send + Sync {
    /// Transform the assembled system before the solve: `k ← tᵀ k t`, `r ← tᵀ r`, `d ← tᵀ d`
    fn pre(&self, layout: &EqLayout, k: &mut DMatrix<f64>, r: &mut DVector<f64>, d: &mut DVector<f64>);

    /// Transform the solution back: `r ← t r`, `d ← t d`
    fn post(&self, layout: &EqLayout, r: &mut DVector<f64>, d: &mut DVector<f64>);
}

/// Support inclined by an angle against the global axes
///
/// The degrees of freedom `from` and `to` are replaced by a rotated pair. Together with a zero
/// Dirichlet BC on the rotated `to` position, displacements are constrained perpendicular to
/// the inclined support plane.
#[derive(Debug, Clone)]
pub struct InclinedSupport {
    from: Index,
    to: Index,
    c: f64,
    s: f64,
}

impl InclinedSupport {
    /// Create the transformer for `angle` (radians), paired with the Dirichlet BC it needs
    ///
    /// `from` and `to` must be distinct indices.
    pub fn new(from: Index, to: Index, angle: f64) -> BvpResult<(Self, NodalValue)> {
        if from == to {
            return Err(BvpError::InvalidInput(format!(
                "inclined support needs two distinct indices, got {from} twice"
            )));
        }

        let bc = NodalValue {
            index: to.clone(),
            value: 0.0,
        };
        let support = Self {
            from,
            to,
            c: angle.cos(),
            s: angle.sin(),
        };

        Ok((support, bc))
    }

    fn rotate(&self, i: usize, j: usize, v: &mut DVector<f64>, transpose: bool) {
        let (vi, vj) = (v[i], v[j]);
        let s = if transpose { self.s } else { -self.s };

        v[i] = self.c * vi + s * vj;
        v[j] = -s * vi + self.c * vj;
    }
}

impl Transformer for InclinedSupport {
    fn pre(&self, layout: &EqLayout, k: &mut DMatrix<f64>, r: &mut DVector<f64>, d: &mut DVector<f64>) {
        let [i, j] = layout.map([&self.from, &self.to]);
        let (c, s) = (self.c, self.s);
        let dim = k.nrows();

        // Columns i and j of k·t, without the diagonal 2x2 block
        let mut irow = DVector::zeros(dim);
        let mut jrow = DVector::zeros(dim);

        for m in (0..dim).filter(|&m| m != i && m != j) {
            irow[m] = c * k[(m, i)] + s * k[(m, j)];
            jrow[m] = -s * k[(m, i)] + c * k[(m, j)];
        }

        let (kii, kij, kjj) = (k[(i, i)], k[(i, j)], k[(j, j)]);

        for m in (0..dim).filter(|&m| m != i && m != j) {
            k[(m, i)] = irow[m];
            k[(i, m)] = irow[m];
            k[(m, j)] = jrow[m];
            k[(j, m)] = jrow[m];
        }

        k[(i, i)] = c * (c * kii + s * kij) + s * (c * kij + s * kjj);
        k[(j, j)] = c * (c * kjj - s * kij) - s * (c * kij - s * kii);
        k[(i, j)] = c * (c * kij + s * kjj) - s * (c * kii + s * kij);
        k[(j, i)] = k[(i, j)];

        self.rotate(i, j, r, true);
        self.rotate(i, j, d, true);
    }

    fn post(&self, layout: &EqLayout, r: &mut DVector<f64>, d: &mut DVector<f64>) {
        let [i, j] = layout.map([&self.from, &self.to]);

        self.rotate(i, j, r, false);
        self.rotate(i, j, d, false);
    }
}
