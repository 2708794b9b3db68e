//! Static condensation of hinged degrees of freedom in local element systems
//!
//! A hinge releases a local degree of freedom from the node it is attached to. Before assembly,
//! the released rows and columns are eliminated from the local tangent and loads. After the
//! solve, [`StaticCondensation::enhance`] recovers the released local values from the
//! remaining ones.
//!
//! Only a small catalogue of release patterns occurs for 2- and 4-dof local systems. Each one
//! maps to a closed-form single or double pivot elimination, so neither side needs a matrix
//! inversion or can fail at runtime. The pattern is selected once, when the element is built.

use nalgebra::{SMatrix, SVector};
use std::collections::BTreeSet;

use crate::dof::Index;
use crate::error::{BvpError, BvpResult};

/// Elimination and recovery of released local degrees of freedom
pub trait StaticCondensation<const N: usize> {
    /// Eliminate the released rows/columns of `k` and entries of `r` in place
    ///
    /// Their contribution is folded into the remaining entries, the eliminated ones are zeroed.
    fn reduce(&self, k: &mut SMatrix<f64, N, N>, r: &mut SVector<f64, N>);

    /// Write the released entries of `d` from the remaining, already solved ones
    ///
    /// `k` and `r` are the unreduced local tangent and loads.
    fn enhance(&self, k: &SMatrix<f64, N, N>, r: &SVector<f64, N>, d: &mut SVector<f64, N>);
}

/// Release patterns of a 2-dof local system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condenser2 {
    NoHinge,
    Hinge0,
    Hinge1,
}

/// Release patterns of a 4-dof local system
///
/// For a beam with local order `[w0, phi0, w1, phi1]`, the double releases are a rotational
/// hinge at both ends (1, 3), a rotational release at the start combined with a shear release
/// at the end (1, 2) and the mirrored case (0, 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condenser4 {
    NoHinge,
    Hinge0,
    Hinge1,
    Hinge2,
    Hinge3,
    Hinge1And2,
    Hinge1And3,
    Hinge0And3,
}

impl Condenser2 {
    /// Select the pattern from the local index order and the set of hinged indices
    pub fn new(local: &[Index; 2], hinges: &BTreeSet<Index>) -> BvpResult<Self> {
        match released(local, hinges).as_slice() {
            [] => Ok(Self::NoHinge),
            [0] => Ok(Self::Hinge0),
            [1] => Ok(Self::Hinge1),
            other => Err(unsupported(local, other)),
        }
    }
}

impl Condenser4 {
    /// Select the pattern from the local index order and the set of hinged indices
    pub fn new(local: &[Index; 4], hinges: &BTreeSet<Index>) -> BvpResult<Self> {
        match released(local, hinges).as_slice() {
            [] => Ok(Self::NoHinge),
            [0] => Ok(Self::Hinge0),
            [1] => Ok(Self::Hinge1),
            [2] => Ok(Self::Hinge2),
            [3] => Ok(Self::Hinge3),
            [1, 2] => Ok(Self::Hinge1And2),
            [1, 3] => Ok(Self::Hinge1And3),
            [0, 3] => Ok(Self::Hinge0And3),
            other => Err(unsupported(local, other)),
        }
    }
}

impl StaticCondensation<2> for Condenser2 {
    fn reduce(&self, k: &mut SMatrix<f64, 2, 2>, r: &mut SVector<f64, 2>) {
        match self {
            Self::NoHinge => {}
            Self::Hinge0 => reduce_single(0, k, r),
            Self::Hinge1 => reduce_single(1, k, r),
        }
    }

    fn enhance(&self, k: &SMatrix<f64, 2, 2>, r: &SVector<f64, 2>, d: &mut SVector<f64, 2>) {
        match self {
            Self::NoHinge => {}
            Self::Hinge0 => enhance_single(0, k, r, d),
            Self::Hinge1 => enhance_single(1, k, r, d),
        }
    }
}

impl StaticCondensation<4> for Condenser4 {
    fn reduce(&self, k: &mut SMatrix<f64, 4, 4>, r: &mut SVector<f64, 4>) {
        match self {
            Self::NoHinge => {}
            Self::Hinge0 => reduce_single(0, k, r),
            Self::Hinge1 => reduce_single(1, k, r),
            Self::Hinge2 => reduce_single(2, k, r),
            Self::Hinge3 => reduce_single(3, k, r),
            Self::Hinge1And2 => reduce_double(1, 2, k, r),
            Self::Hinge1And3 => reduce_double(1, 3, k, r),
            Self::Hinge0And3 => reduce_double(0, 3, k, r),
        }
    }

    fn enhance(&self, k: &SMatrix<f64, 4, 4>, r: &SVector<f64, 4>, d: &mut SVector<f64, 4>) {
        match self {
            Self::NoHinge => {}
            Self::Hinge0 => enhance_single(0, k, r, d),
            Self::Hinge1 => enhance_single(1, k, r, d),
            Self::Hinge2 => enhance_single(2, k, r, d),
            Self::Hinge3 => enhance_single(3, k, r, d),
            Self::Hinge1And2 => enhance_double(1, 2, k, r, d),
            Self::Hinge1And3 => enhance_double(1, 3, k, r, d),
            Self::Hinge0And3 => enhance_double(0, 3, k, r, d),
        }
    }
}

fn released<const N: usize>(local: &[Index; N], hinges: &BTreeSet<Index>) -> Vec<usize> {
    (0..N).filter(|&i| hinges.contains(&local[i])).collect()
}

fn unsupported<const N: usize>(local: &[Index; N], positions: &[usize]) -> BvpError {
    let names: Vec<String> = positions.iter().map(|&i| local[i].to_string()).collect();
    BvpError::UnsupportedHinges(names.join(", "))
}

/// Pivot on `p`: `k_ij -= k_ip k_pj / k_pp`, `r_i -= k_ip r_p / k_pp`
fn reduce_single<const N: usize>(p: usize, k: &mut SMatrix<f64, N, N>, r: &mut SVector<f64, N>) {
    let kpp = k[(p, p)];

    for i in (0..N).filter(|&i| i != p) {
        let kip = k[(i, p)];

        for j in (0..N).filter(|&j| j != p) {
            k[(i, j)] -= kip * k[(p, j)] / kpp;
        }

        r[i] -= kip * r[p] / kpp;
    }

    clear(p, k, r);
}

/// Pivot on the 2x2 block `(a, b)`, using its explicit inverse
fn reduce_double<const N: usize>(
    a: usize,
    b: usize,
    k: &mut SMatrix<f64, N, N>,
    r: &mut SVector<f64, N>,
) {
    let (kaa, kab, kbb) = (k[(a, a)], k[(a, b)], k[(b, b)]);
    let det = kaa * kbb - kab * kab;

    for i in (0..N).filter(|&i| i != a && i != b) {
        // Row i of k_kept,released · inverse(k_released,released)
        let ga = (kbb * k[(i, a)] - kab * k[(i, b)]) / det;
        let gb = (kaa * k[(i, b)] - kab * k[(i, a)]) / det;

        for j in (0..N).filter(|&j| j != a && j != b) {
            k[(i, j)] -= ga * k[(a, j)] + gb * k[(b, j)];
        }

        r[i] -= ga * r[a] + gb * r[b];
    }

    clear(a, k, r);
    clear(b, k, r);
}

fn enhance_single<const N: usize>(
    p: usize,
    k: &SMatrix<f64, N, N>,
    r: &SVector<f64, N>,
    d: &mut SVector<f64, N>,
) {
    d[p] = residual(p, &[p], k, r, d) / k[(p, p)];
}

fn enhance_double<const N: usize>(
    a: usize,
    b: usize,
    k: &SMatrix<f64, N, N>,
    r: &SVector<f64, N>,
    d: &mut SVector<f64, N>,
) {
    let (kaa, kab, kbb) = (k[(a, a)], k[(a, b)], k[(b, b)]);
    let det = kaa * kbb - kab * kab;
    let sa = residual(a, &[a, b], k, r, d);
    let sb = residual(b, &[a, b], k, r, d);

    d[a] = (kbb * sa - kab * sb) / det;
    d[b] = (kaa * sb - kab * sa) / det;
}

/// `r_row - sum(k_row,j d_j)` over all `j` not in `skip`
fn residual<const N: usize>(
    row: usize,
    skip: &[usize],
    k: &SMatrix<f64, N, N>,
    r: &SVector<f64, N>,
    d: &SVector<f64, N>,
) -> f64 {
    (0..N)
        .filter(|j| !skip.contains(j))
        .fold(r[row], |acc, j| acc - k[(row, j)] * d[j])
}

fn clear<const N: usize>(p: usize, k: &mut SMatrix<f64, N, N>, r: &mut SVector<f64, N>) {
    k.row_mut(p).fill(0.0);
    k.column_mut(p).fill(0.0);
    r[p] = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dof::Dof;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    /// Deterministic, well-conditioned SPD matrix `m mᵀ + N·I`
    fn spd<const N: usize>(seed: f64) -> SMatrix<f64, N, N> {
        let m = SMatrix::<f64, N, N>::from_fn(|i, j| (seed + 1.7 * i as f64 + 0.9 * j as f64).sin());
        m * m.transpose() + SMatrix::<f64, N, N>::identity() * N as f64
    }

    fn rhs<const N: usize>(seed: f64) -> SVector<f64, N> {
        SVector::<f64, N>::from_fn(|i, _| (seed * 3.1 + 2.3 * i as f64).cos() * 10.0)
    }

    /// Reduce, solve the remaining system, enhance, and compare with the full solution
    fn check_identity<const N: usize, C: StaticCondensation<N>>(condenser: &C, released: &[usize]) {
        for seed in [0.3, 1.1, 2.9, 7.4] {
            let k = spd::<N>(seed);
            let r = rhs::<N>(seed);
            let full = k.cholesky().unwrap().solve(&r);

            let (mut kr, mut rr) = (k, r);
            condenser.reduce(&mut kr, &mut rr);

            for &p in released {
                assert!(kr.row(p).iter().all(|&v| v == 0.0));
                assert!(kr.column(p).iter().all(|&v| v == 0.0));
                assert_eq!(rr[p], 0.0);
            }

            let kept: Vec<usize> = (0..N).filter(|i| !released.contains(i)).collect();
            let k_kept = DMatrix::from_fn(kept.len(), kept.len(), |i, j| kr[(kept[i], kept[j])]);
            let r_kept = nalgebra::DVector::from_fn(kept.len(), |i, _| rr[kept[i]]);
            let d_kept = k_kept.cholesky().unwrap().solve(&r_kept);

            // Released entries hold garbage until enhanced
            let mut d = SVector::<f64, N>::from_element(1e3);
            for (i, &pos) in kept.iter().enumerate() {
                d[pos] = d_kept[i];
            }

            condenser.enhance(&k, &r, &mut d);

            for i in 0..N {
                assert_relative_eq!(d[i], full[i], epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_condenser2_identity() {
        check_identity::<2, _>(&Condenser2::Hinge0, &[0]);
        check_identity::<2, _>(&Condenser2::Hinge1, &[1]);
    }

    #[test]
    fn test_condenser4_identity() {
        check_identity::<4, _>(&Condenser4::Hinge0, &[0]);
        check_identity::<4, _>(&Condenser4::Hinge1, &[1]);
        check_identity::<4, _>(&Condenser4::Hinge2, &[2]);
        check_identity::<4, _>(&Condenser4::Hinge3, &[3]);
        check_identity::<4, _>(&Condenser4::Hinge1And2, &[1, 2]);
        check_identity::<4, _>(&Condenser4::Hinge1And3, &[1, 3]);
        check_identity::<4, _>(&Condenser4::Hinge0And3, &[0, 3]);
    }

    #[test]
    fn test_no_hinge_is_identity() {
        let (mut k, mut r) = (spd::<4>(0.5), rhs::<4>(0.5));
        let (k0, r0) = (k, r);
        let mut d = rhs::<4>(1.5);
        let d0 = d;

        Condenser4::NoHinge.reduce(&mut k, &mut r);
        Condenser4::NoHinge.enhance(&k, &r, &mut d);

        assert_eq!(k, k0);
        assert_eq!(r, r0);
        assert_eq!(d, d0);
    }

    #[test]
    fn test_single_pivot_closed_form() {
        let mut k = SMatrix::<f64, 2, 2>::new(4.0, 2.0, 2.0, 3.0);
        let mut r = SVector::<f64, 2>::new(1.0, 2.0);

        Condenser2::Hinge0.reduce(&mut k, &mut r);

        assert_relative_eq!(k[(1, 1)], 3.0 - 2.0 * 2.0 / 4.0);
        assert_relative_eq!(r[1], 2.0 - 2.0 * 1.0 / 4.0);
        assert_eq!(k[(0, 0)], 0.0);
        assert_eq!(k[(0, 1)], 0.0);
    }

    fn beam_local() -> [Index; 4] {
        [
            Index::new("A", Dof::Uz),
            Index::new("A", Dof::Phiy),
            Index::new("B", Dof::Uz),
            Index::new("B", Dof::Phiy),
        ]
    }

    #[test]
    fn test_selection_from_hinges() {
        let local = beam_local();
        let hinges = |indices: &[&Index]| -> BTreeSet<Index> {
            indices.iter().map(|&i| i.clone()).collect()
        };

        assert_eq!(
            Condenser4::new(&local, &BTreeSet::new()).unwrap(),
            Condenser4::NoHinge
        );
        assert_eq!(
            Condenser4::new(&local, &hinges(&[&local[3]])).unwrap(),
            Condenser4::Hinge3
        );
        assert_eq!(
            Condenser4::new(&local, &hinges(&[&local[3], &local[1]])).unwrap(),
            Condenser4::Hinge1And3
        );

        // Hinges at unrelated indices don't matter
        let other = Index::new("C", Dof::Phiy);
        assert_eq!(
            Condenser4::new(&local, &hinges(&[&other, &local[0]])).unwrap(),
            Condenser4::Hinge0
        );
    }

    #[test]
    fn test_unsupported_patterns() {
        let local = beam_local();
        let hinges: BTreeSet<Index> = [local[0].clone(), local[2].clone()].into_iter().collect();

        let err = Condenser4::new(&local, &hinges).unwrap_err();
        assert_eq!(err.to_string(), "unsupported hinge setup: A/Uz, B/Uz");

        let axial = [Index::new("A", Dof::Ux), Index::new("B", Dof::Ux)];
        let both: BTreeSet<Index> = axial.iter().cloned().collect();
        assert!(Condenser2::new(&axial, &both).is_err());
    }
}
