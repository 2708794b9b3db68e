//! Truss element in the X-Z plane

use nalgebra::{DMatrix, DVector, Matrix2, SMatrix, Vector2};
use std::collections::BTreeSet;

use super::{add_to_global, gather, Element, Material, OneDim, Section};
use crate::condensation::{Condenser2, StaticCondensation};
use crate::dof::{Dof, Fct, Index, Node};
use crate::error::BvpResult;
use crate::layout::EqLayout;
use crate::loads::ElementLoad;
use crate::polynomial::{PolyPiece, PolySequence, DOMAIN_TOL};

/// Two-node bar carrying axial force only
///
/// Global indices are `[start/Ux, start/Uz, end/Ux, end/Uz]`, the local ones the axial
/// displacements `[start/Ux, end/Ux]`. A hinge on a local index disconnects the bar axially
/// from that node.
#[derive(Debug, Clone)]
pub struct Truss2d {
    geometry: OneDim,
    ea: f64,
    indices: [Index; 4],
    condenser: Condenser2,
    loads: Vec<ElementLoad>,
}

impl Truss2d {
    pub fn new(
        id: &str,
        start: &Node,
        end: &Node,
        material: &Material,
        section: &Section,
        hinges: &BTreeSet<Index>,
    ) -> BvpResult<Self> {
        let geometry = OneDim::new_xz(id, start, end)?;
        let ([s_ux, s_uz], [e_ux, e_uz]) = geometry.indices([Dof::Ux, Dof::Uz]);
        let condenser = Condenser2::new(&[s_ux.clone(), e_ux.clone()], hinges)?;

        Ok(Self {
            geometry,
            ea: material.e * section.a,
            indices: [s_ux, s_uz, e_ux, e_uz],
            condenser,
            loads: Vec::new(),
        })
    }

    pub fn length(&self) -> f64 {
        self.geometry.length()
    }

    fn local_tangent(&self) -> Matrix2<f64> {
        let k = self.ea / self.length();
        Matrix2::new(k, -k, -k, k)
    }

    /// Consistent nodal loads of all element loads
    fn local_loads(&self) -> Vector2<f64> {
        let l = self.length();
        let mut r = Vector2::zeros();

        for load in &self.loads {
            match *load {
                ElementLoad::Concentrated {
                    position: a, value, ..
                } => {
                    r[0] += value * (l - a) / l;
                    r[1] += value * a / l;
                }
                ElementLoad::Constant { value, .. } => {
                    r[0] += value * l / 2.0;
                    r[1] += value * l / 2.0;
                }
                ElementLoad::Linear { first, last, .. } => {
                    r[0] += l * (2.0 * first + last) / 6.0;
                    r[1] += l * (first + 2.0 * last) / 6.0;
                }
            }
        }

        r
    }

    /// Maps global `[ux0, uz0, ux1, uz1]` to local axial displacements
    fn transformation(&self) -> SMatrix<f64, 2, 4> {
        let [c, _, s] = self.geometry.direction_cosines();

        #[rustfmt::skip]
        let t = SMatrix::<f64, 2, 4>::from_row_slice(&[
            c, s, 0.0, 0.0,
            0.0, 0.0, c, s,
        ]);

        t
    }

    /// Local axial displacements including hinged ones
    fn local_displacements(&self, layout: &EqLayout, d: &DVector<f64>) -> Vector2<f64> {
        let mut dl = self.transformation() * gather(layout, &self.indices, d);
        self.condenser
            .enhance(&self.local_tangent(), &self.local_loads(), &mut dl);
        dl
    }

    /// Normal force, tension positive
    fn normal_force(&self, dl: &Vector2<f64>) -> PolySequence {
        let l = self.length();
        let end_forces = self.local_tangent() * dl - self.local_loads();
        let mut nx = PolySequence::new();

        nx.push(PolyPiece::constant(0.0, l, -end_forces[0]));

        for load in &self.loads {
            let piece = match *load {
                ElementLoad::Concentrated {
                    position, value, ..
                } => PolyPiece::new(position, l, vec![-value]),
                ElementLoad::Constant { value, .. } => PolyPiece::new(0.0, l, vec![0.0, -value]),
                ElementLoad::Linear { first, last, .. } => PolyPiece::new(
                    0.0,
                    l,
                    vec![0.0, -first, -(last - first) / (2.0 * l)],
                ),
            };

            nx.push(piece);
        }

        nx.flatten()
    }
}

impl Element for Truss2d {
    fn id(&self) -> &str {
        self.geometry.id()
    }

    fn num_nodes(&self) -> usize {
        2
    }

    fn indices(&self, set: &mut BTreeSet<Index>) {
        set.extend(self.indices.iter().cloned());
    }

    fn assemble(&self, layout: &EqLayout, k: &mut DMatrix<f64>, r: &mut DVector<f64>, _d: &DVector<f64>) {
        let (mut kl, mut rl) = (self.local_tangent(), self.local_loads());
        self.condenser.reduce(&mut kl, &mut rl);

        let t = self.transformation();
        let k_global = t.transpose() * kl * t;
        let r_global = t.transpose() * rl;

        add_to_global(layout, &self.indices, &k_global, &r_global, k, r);
    }

    fn interpolate(&self, layout: &EqLayout, fct: Fct, d: &DVector<f64>) -> Option<PolySequence> {
        match fct {
            Fct::Nx => Some(self.normal_force(&self.local_displacements(layout, d))),
            Fct::Ux => {
                let dl = self.local_displacements(layout, d);
                let strain = self.normal_force(&dl).multiply(1.0 / self.ea);
                Some(strain.integrate(dl[0]))
            }
            _ => None,
        }
    }

    fn add_load(&mut self, load: ElementLoad) -> bool {
        if load.kind() != Dof::Ux {
            return false;
        }

        if let ElementLoad::Concentrated { position, .. } = load {
            if position > self.length() + DOMAIN_TOL {
                return false;
            }
        }

        self.loads.push(load);
        true
    }

    fn remove_load(&mut self, load: &ElementLoad) {
        self.loads.retain(|l| l != load);
    }
}
