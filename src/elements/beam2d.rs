//! Euler-Bernoulli beam element in the X-Z plane

use nalgebra::{DMatrix, DVector, Matrix4, SMatrix, Vector4};
use std::collections::BTreeSet;

use super::{add_to_global, gather, Element, Material, OneDim, Section};
use crate::condensation::{Condenser4, StaticCondensation};
use crate::dof::{Dof, Fct, Index, Node};
use crate::error::BvpResult;
use crate::layout::EqLayout;
use crate::loads::ElementLoad;
use crate::polynomial::{PolyPiece, PolySequence, DOMAIN_TOL};

/// Two-node beam carrying shear force and bending moment about the y axis
///
/// The local system is `[w0, phi0, w1, phi1]`: transverse displacements along the local z
/// axis `(-s, c)` and rotations about y. Rotations follow the right-hand rule, so the slope is
/// `w' = -phi` and the bending moment `My = EI phi'`. Global indices are `Ux`, `Uz` and `Phiy`
/// of both nodes; the axial direction carries no stiffness.
#[derive(Debug, Clone)]
pub struct Beam2d {
    geometry: OneDim,
    ei: f64,
    indices: [Index; 6],
    condenser: Condenser4,
    loads: Vec<ElementLoad>,
}

impl Beam2d {
    pub fn new(
        id: &str,
        start: &Node,
        end: &Node,
        material: &Material,
        section: &Section,
        hinges: &BTreeSet<Index>,
    ) -> BvpResult<Self> {
        let geometry = OneDim::new_xz(id, start, end)?;
        let ([s_ux, s_uz, s_phi], [e_ux, e_uz, e_phi]) =
            geometry.indices([Dof::Ux, Dof::Uz, Dof::Phiy]);
        let local = [s_uz.clone(), s_phi.clone(), e_uz.clone(), e_phi.clone()];
        let condenser = Condenser4::new(&local, hinges)?;

        Ok(Self {
            geometry,
            ei: material.e * section.iyy,
            indices: [s_ux, s_uz, s_phi, e_ux, e_uz, e_phi],
            condenser,
            loads: Vec::new(),
        })
    }

    pub fn length(&self) -> f64 {
        self.geometry.length()
    }

    fn local_tangent(&self) -> Matrix4<f64> {
        let l = self.length();
        let (l2, l3) = (l * l, l * l * l);

        #[rustfmt::skip]
        let k = Matrix4::new(
            12.0 / l3, -6.0 / l2, -12.0 / l3, -6.0 / l2,
            -6.0 / l2,  4.0 / l,    6.0 / l2,  2.0 / l,
            -12.0 / l3, 6.0 / l2,  12.0 / l3,  6.0 / l2,
            -6.0 / l2,  2.0 / l,    6.0 / l2,  4.0 / l,
        );

        k * self.ei
    }

    /// Consistent nodal loads of all element loads
    fn local_loads(&self) -> Vector4<f64> {
        let l = self.length();
        let mut r = Vector4::zeros();

        for load in &self.loads {
            match *load {
                ElementLoad::Concentrated {
                    kind: Dof::Phiy,
                    position,
                    value: m,
                } => {
                    let (a, b) = (position / l, 1.0 - position / l);
                    r[0] += 6.0 * m * a * b / l;
                    r[1] += m * b * (1.0 - 3.0 * a);
                    r[2] -= 6.0 * m * a * b / l;
                    r[3] += m * a * (1.0 - 3.0 * b);
                }
                ElementLoad::Concentrated {
                    position, value: f, ..
                } => {
                    let (a, b) = (position / l, 1.0 - position / l);
                    r[0] += f * b * b * (3.0 - 2.0 * b);
                    r[1] -= f * a * b * b * l;
                    r[2] += f * a * a * (3.0 - 2.0 * a);
                    r[3] += f * a * a * b * l;
                }
                ElementLoad::Constant { value: q, .. } => {
                    r[0] += q * l / 2.0;
                    r[1] -= q * l * l / 12.0;
                    r[2] += q * l / 2.0;
                    r[3] += q * l * l / 12.0;
                }
                ElementLoad::Linear {
                    first: q0,
                    last: q1,
                    ..
                } => {
                    r[0] += l * (7.0 * q0 + 3.0 * q1) / 20.0;
                    r[1] -= l * l * (3.0 * q0 + 2.0 * q1) / 60.0;
                    r[2] += l * (3.0 * q0 + 7.0 * q1) / 20.0;
                    r[3] += l * l * (2.0 * q0 + 3.0 * q1) / 60.0;
                }
            }
        }

        r
    }

    /// Maps global `[ux0, uz0, phiy0, ux1, uz1, phiy1]` to `[w0, phi0, w1, phi1]`
    fn transformation(&self) -> SMatrix<f64, 4, 6> {
        let [c, _, s] = self.geometry.direction_cosines();

        #[rustfmt::skip]
        let t = SMatrix::<f64, 4, 6>::from_row_slice(&[
            -s,  c,  0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, -s,  c,  0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ]);

        t
    }

    /// Local displacements including hinged ones
    fn local_displacements(&self, layout: &EqLayout, d: &DVector<f64>) -> Vector4<f64> {
        let mut dl = self.transformation() * gather(layout, &self.indices, d);
        self.condenser
            .enhance(&self.local_tangent(), &self.local_loads(), &mut dl);
        dl
    }

    /// Bending moment from the start node's end forces and all loads
    fn bending_moment(&self, dl: &Vector4<f64>) -> PolySequence {
        let l = self.length();
        let end_forces = self.local_tangent() * dl - self.local_loads();
        let mut my = PolySequence::new();

        my.push(PolyPiece::new(0.0, l, vec![-end_forces[1], -end_forces[0]]));

        for load in &self.loads {
            let piece = match *load {
                ElementLoad::Concentrated {
                    kind: Dof::Phiy,
                    position,
                    value,
                } => PolyPiece::new(position, l, vec![-value]),
                ElementLoad::Concentrated {
                    position, value, ..
                } => PolyPiece::new(position, l, vec![position * value, -value]),
                ElementLoad::Constant { value, .. } => {
                    PolyPiece::new(0.0, l, vec![0.0, 0.0, -value / 2.0])
                }
                ElementLoad::Linear { first, last, .. } => PolyPiece::new(
                    0.0,
                    l,
                    vec![0.0, 0.0, -first / 2.0, -(last - first) / (6.0 * l)],
                ),
            };

            my.push(piece);
        }

        my.flatten()
    }
}

impl Element for Beam2d {
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
        if !matches!(fct, Fct::Uz | Fct::Phiy | Fct::Vz | Fct::My) {
            return None;
        }

        let dl = self.local_displacements(layout, d);
        let my = self.bending_moment(&dl);

        match fct {
            Fct::My => Some(my),
            Fct::Vz => Some(my.derive()),
            Fct::Phiy => Some(my.multiply(1.0 / self.ei).integrate(dl[1])),
            _ => {
                let phi = my.multiply(1.0 / self.ei).integrate(dl[1]);
                Some(phi.multiply(-1.0).integrate(dl[0]))
            }
        }
    }

    fn add_load(&mut self, load: ElementLoad) -> bool {
        let accepted = match load {
            ElementLoad::Concentrated { kind, position, .. } => {
                matches!(kind, Dof::Uz | Dof::Phiy) && position <= self.length() + DOMAIN_TOL
            }
            ElementLoad::Constant { kind, .. } | ElementLoad::Linear { kind, .. } => kind == Dof::Uz,
        };

        if accepted {
            self.loads.push(load);
        }

        accepted
    }

    fn remove_load(&mut self, load: &ElementLoad) {
        self.loads.retain(|l| l != load);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Beam of length 4 along X with EI = 2
    fn beam(hinges: &BTreeSet<Index>) -> Beam2d {
        let a = Node::xz("A", 0.0, 0.0);
        let b = Node::xz("B", 4.0, 0.0);
        let material = Material::linear_elastic(2.0);
        Beam2d::new("B1", &a, &b, &material, &Section::new(1.0, 1.0), hinges).unwrap()
    }

    fn layout_for(element: &dyn Element) -> EqLayout {
        let mut set = BTreeSet::new();
        element.indices(&mut set);
        EqLayout::new(&set, &[]).unwrap()
    }

    #[test]
    fn test_tangent_symmetric_and_singular_for_rigid_modes() {
        let k = beam(&BTreeSet::new()).local_tangent();

        assert_relative_eq!(k, k.transpose(), epsilon = 1e-14);

        // Rigid translation w = 1 and rigid rotation phi = -w' = -1 with w = x
        let translation = Vector4::new(1.0, 0.0, 1.0, 0.0);
        let rotation = Vector4::new(0.0, -1.0, 4.0, -1.0);
        assert_relative_eq!(k * translation, Vector4::zeros(), epsilon = 1e-12);
        assert_relative_eq!(k * rotation, Vector4::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_consistent_loads_balance() {
        let mut beam = beam(&BTreeSet::new());
        beam.add_load(ElementLoad::constant(Dof::Uz, 3.0));
        beam.add_load(ElementLoad::linear(Dof::Uz, 1.0, 2.0));
        beam.add_load(ElementLoad::concentrated(Dof::Uz, 1.0, 5.0).unwrap());
        beam.add_load(ElementLoad::concentrated(Dof::Phiy, 3.0, 7.0).unwrap());

        let r = beam.local_loads();

        // Transverse forces sum up to the total load
        assert_relative_eq!(r[0] + r[2], 3.0 * 4.0 + 1.5 * 4.0 + 5.0, epsilon = 1e-12);

        // Moments about y at the start node, where a force f_z at x contributes -x·f_z
        let load_moment = -(3.0 * 4.0 * 2.0) - (4.0 * 1.0 * 2.0 + 2.0 * 8.0 / 3.0) - 5.0 + 7.0;
        assert_relative_eq!(r[1] + r[3] - 4.0 * r[2], load_moment, epsilon = 1e-12);
    }

    #[test]
    fn test_rejected_loads() {
        let mut beam = beam(&BTreeSet::new());

        assert!(!beam.add_load(ElementLoad::constant(Dof::Ux, 1.0)));
        assert!(!beam.add_load(ElementLoad::constant(Dof::Phiy, 1.0)));
        assert!(!beam.add_load(ElementLoad::concentrated(Dof::Uz, 4.5, 1.0).unwrap()));
        assert!(beam.add_load(ElementLoad::concentrated(Dof::Uz, 4.0, 1.0).unwrap()));
    }

    #[test]
    fn test_vertical_beam_transformation() {
        let a = Node::xz("A", 0.0, 0.0);
        let b = Node::xz("B", 0.0, 3.0);
        let material = Material::linear_elastic(1.0);
        let column =
            Beam2d::new("C", &a, &b, &material, &Section::new(1.0, 1.0), &BTreeSet::new())
                .unwrap();
        let layout = layout_for(&column);
        let (mut k, mut r) = (DMatrix::zeros(6, 6), DVector::zeros(6));

        column.assemble(&layout, &mut k, &mut r, &DVector::zeros(6));

        // Pointing up, local w is global -X; Uz carries no bending stiffness
        let [ux0, uz0, phi0] =
            layout.map([&a.index(Dof::Ux), &a.index(Dof::Uz), &a.index(Dof::Phiy)]);
        assert_relative_eq!(k[(ux0, ux0)], 12.0 / 27.0, epsilon = 1e-12);
        assert_relative_eq!(k[(ux0, phi0)], 6.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(k[(uz0, uz0)], 0.0);
    }

    #[test]
    fn test_moment_from_given_displacements() {
        let mut beam = beam(&BTreeSet::new());
        beam.add_load(ElementLoad::constant(Dof::Uz, -1.0));
        let layout = layout_for(&beam);

        // Both ends clamped; My = -EI w'' is positive where the beam hogs
        let d = DVector::zeros(6);
        let my = beam.interpolate(&layout, Fct::My, &d).unwrap();
        assert_relative_eq!(my.eval(0.0).unwrap(), 16.0 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(my.eval(2.0).unwrap(), -16.0 / 24.0, epsilon = 1e-12);
        assert_relative_eq!(my.eval(4.0).unwrap(), 16.0 / 12.0, epsilon = 1e-12);

        let vz = beam.interpolate(&layout, Fct::Vz, &d).unwrap();
        assert_relative_eq!(vz.eval(0.0).unwrap(), -2.0, epsilon = 1e-12);
        assert_relative_eq!(vz.eval(4.0).unwrap(), 2.0, epsilon = 1e-12);

        let uz = beam.interpolate(&layout, Fct::Uz, &d).unwrap();
        assert_relative_eq!(uz.eval(4.0).unwrap(), 0.0, epsilon = 1e-12);
        // ql⁴ / (384 EI) downwards
        assert_relative_eq!(uz.eval(2.0).unwrap(), -256.0 / (384.0 * 2.0), epsilon = 1e-12);

        assert!(beam.interpolate(&layout, Fct::Nx, &d).is_none());
    }
}
