//! Frame element in the X-Z plane

use nalgebra::{DMatrix, DVector};
use std::collections::BTreeSet;

use super::{Beam2d, Element, Material, Section, Truss2d};
use crate::dof::{Dof, Fct, Index, Node};
use crate::error::BvpResult;
use crate::layout::EqLayout;
use crate::loads::ElementLoad;
use crate::polynomial::PolySequence;

/// Superposition of a [`Truss2d`] and a [`Beam2d`] on the same nodes
///
/// Axial quantities (`Ux`, `Nx`) come from the truss, bending quantities (`Uz`, `Phiy`, `Vz`,
/// `My`) from the beam. Both parts share the id and the hinges.
#[derive(Debug, Clone)]
pub struct Frame2d {
    truss: Truss2d,
    beam: Beam2d,
}

impl Frame2d {
    pub fn new(
        id: &str,
        start: &Node,
        end: &Node,
        material: &Material,
        section: &Section,
        hinges: &BTreeSet<Index>,
    ) -> BvpResult<Self> {
        Ok(Self {
            truss: Truss2d::new(id, start, end, material, section, hinges)?,
            beam: Beam2d::new(id, start, end, material, section, hinges)?,
        })
    }

    pub fn length(&self) -> f64 {
        self.truss.length()
    }
}

impl Element for Frame2d {
    fn id(&self) -> &str {
        self.truss.id()
    }

    fn num_nodes(&self) -> usize {
        2
    }

    fn indices(&self, set: &mut BTreeSet<Index>) {
        self.truss.indices(set);
        self.beam.indices(set);
    }

    fn assemble(&self, layout: &EqLayout, k: &mut DMatrix<f64>, r: &mut DVector<f64>, d: &DVector<f64>) {
        self.truss.assemble(layout, k, r, d);
        self.beam.assemble(layout, k, r, d);
    }

    fn interpolate(&self, layout: &EqLayout, fct: Fct, d: &DVector<f64>) -> Option<PolySequence> {
        match fct {
            Fct::Ux | Fct::Nx => self.truss.interpolate(layout, fct, d),
            _ => self.beam.interpolate(layout, fct, d),
        }
    }

    fn add_load(&mut self, load: ElementLoad) -> bool {
        match load.kind() {
            Dof::Ux => self.truss.add_load(load),
            _ => self.beam.add_load(load),
        }
    }

    fn remove_load(&mut self, load: &ElementLoad) {
        self.truss.remove_load(load);
        self.beam.remove_load(load);
    }
}
