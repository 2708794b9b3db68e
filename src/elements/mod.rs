//! Finite element formulations
//!
//! Elements compute their local tangent and consistent loads, condense hinged degrees of
//! freedom, rotate to global coordinates and add the result to the global system through the
//! [`EqLayout`]. After the solve, they interpolate displacements and internal forces along
//! their axis.

mod beam2d;
mod frame2d;
mod material;
mod one_dim;
mod section;
mod truss2d;

pub use beam2d::Beam2d;
pub use frame2d::Frame2d;
pub use material::Material;
pub use one_dim::OneDim;
pub use section::Section;
pub use truss2d::Truss2d;

use nalgebra::{DMatrix, DVector, SMatrix, SVector};
use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::dof::{Fct, Index};
use crate::layout::EqLayout;
use crate::loads::ElementLoad;
use crate::polynomial::PolySequence;

/// Common API of all element formulations
pub trait Element: Debug + Send + Sync {
    /// User-facing id
    fn id(&self) -> &str;

    /// Number of nodes the element connects
    fn num_nodes(&self) -> usize;

    /// Add every index this element contributes to
    fn indices(&self, set: &mut BTreeSet<Index>);

    /// Add the condensed, globally rotated tangent and loads to `k` and `r`
    ///
    /// `d` holds the current primary values; linear elements don't read it. Index misses are
    /// recorded in `layout`.
    fn assemble(&self, layout: &EqLayout, k: &mut DMatrix<f64>, r: &mut DVector<f64>, d: &DVector<f64>);

    /// Raw pieces of `fct` in local element coordinates, or `None` if the element doesn't
    /// provide `fct`
    ///
    /// The result is flattened but not trimmed or compacted; that depends on a context-specific
    /// zero tolerance.
    fn interpolate(&self, layout: &EqLayout, fct: Fct, d: &DVector<f64>) -> Option<PolySequence>;

    /// Store a load for assembly; returns `false` if the element can't carry it
    fn add_load(&mut self, load: ElementLoad) -> bool;

    /// Remove all instances of `load`
    fn remove_load(&mut self, load: &ElementLoad);
}

/// Add a local contribution in global coordinates at the positions of `indices`
fn add_to_global<const N: usize>(
    layout: &EqLayout,
    indices: &[Index; N],
    k_elem: &SMatrix<f64, N, N>,
    r_elem: &SVector<f64, N>,
    k: &mut DMatrix<f64>,
    r: &mut DVector<f64>,
) {
    let pos: [usize; N] = std::array::from_fn(|i| layout.map_one(&indices[i]));

    for i in 0..N {
        for j in 0..N {
            k[(pos[i], pos[j])] += k_elem[(i, j)];
        }

        r[pos[i]] += r_elem[i];
    }
}

/// Global primary values at the positions of `indices`
fn gather<const N: usize>(layout: &EqLayout, indices: &[Index; N], d: &DVector<f64>) -> SVector<f64, N> {
    SVector::from_fn(|i, _| d[layout.map_one(&indices[i])])
}
