//! Equation solving strategies for the assembled, symmetric system

use nalgebra::{DMatrixView, DVectorView, DVectorViewMut};
use thiserror::Error;

/// Failure of an [`EquationSolver`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquationSolverError {
    #[error("failed to compute Cholesky factorisation, determinant = {determinant}")]
    NotPositiveDefinite { determinant: f64 },

    #[error("coefficient matrix is singular")]
    Singular,

    #[error("coefficient matrix is not symmetric")]
    NotSymmetric,

    #[error("dimension mismatch: {rows}x{cols} coefficient matrix, right-hand side {rhs}, solution {solution}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        rhs: usize,
        solution: usize,
    },
}

/// Square matrix view known to be symmetric
#[derive(Debug, Clone, Copy)]
pub struct SymmetricView<'a> {
    matrix: DMatrixView<'a, f64>,
}

impl<'a> SymmetricView<'a> {
    /// Wrap `matrix` after checking it is square and symmetric up to `tol`
    pub fn new(matrix: DMatrixView<'a, f64>, tol: f64) -> Result<Self, EquationSolverError> {
        let (rows, cols) = matrix.shape();

        if rows != cols {
            return Err(EquationSolverError::DimensionMismatch {
                rows,
                cols,
                rhs: rows,
                solution: rows,
            });
        }

        for i in 0..rows {
            for j in (i + 1)..cols {
                if (matrix[(i, j)] - matrix[(j, i)]).abs() > tol {
                    return Err(EquationSolverError::NotSymmetric);
                }
            }
        }

        Ok(Self { matrix })
    }

    /// Wrap a block the caller keeps symmetric itself, e.g. a diagonal block of the global tangent
    pub(crate) fn trusted(matrix: DMatrixView<'a, f64>) -> Self {
        Self { matrix }
    }

    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> DMatrixView<'a, f64> {
        self.matrix
    }
}

/// Solves `a·x = b` for symmetric `a`
///
/// Implementations must report singular or indefinite input as an error, never panic.
pub trait EquationSolver {
    fn solve_linear_system(
        &self,
        a: SymmetricView<'_>,
        b: DVectorView<'_, f64>,
        x: DVectorViewMut<'_, f64>,
    ) -> Result<(), EquationSolverError>;
}

/// Cholesky decomposition, for symmetric positive definite systems
#[derive(Debug, Clone, Copy, Default)]
pub struct CholeskySolver;

impl EquationSolver for CholeskySolver {
    fn solve_linear_system(
        &self,
        a: SymmetricView<'_>,
        b: DVectorView<'_, f64>,
        mut x: DVectorViewMut<'_, f64>,
    ) -> Result<(), EquationSolverError> {
        check_dimensions(&a, &b, &x)?;

        let owned = a.matrix().clone_owned();

        match owned.clone().cholesky() {
            Some(chol) => {
                x.copy_from(&chol.solve(&b));
                Ok(())
            }
            None => Err(EquationSolverError::NotPositiveDefinite {
                determinant: owned.determinant(),
            }),
        }
    }
}

/// LU decomposition with partial pivoting, for regular but indefinite systems
#[derive(Debug, Clone, Copy, Default)]
pub struct LuSolver;

impl EquationSolver for LuSolver {
    fn solve_linear_system(
        &self,
        a: SymmetricView<'_>,
        b: DVectorView<'_, f64>,
        mut x: DVectorViewMut<'_, f64>,
    ) -> Result<(), EquationSolverError> {
        check_dimensions(&a, &b, &x)?;

        let solution = a
            .matrix()
            .clone_owned()
            .lu()
            .solve(&b)
            .ok_or(EquationSolverError::Singular)?;

        x.copy_from(&solution);
        Ok(())
    }
}

fn check_dimensions(
    a: &SymmetricView<'_>,
    b: &DVectorView<'_, f64>,
    x: &DVectorViewMut<'_, f64>,
) -> Result<(), EquationSolverError> {
    let dim = a.dim();

    if b.len() != dim || x.len() != dim {
        return Err(EquationSolverError::DimensionMismatch {
            rows: dim,
            cols: dim,
            rhs: b.len(),
            solution: x.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, DVector};

    fn solve(
        strategy: &dyn EquationSolver,
        a: &DMatrix<f64>,
        b: &DVector<f64>,
    ) -> Result<DVector<f64>, EquationSolverError> {
        let mut x = DVector::zeros(b.len());
        let view = SymmetricView::new(a.as_view(), 1e-12)?;
        strategy.solve_linear_system(view, b.as_view(), x.as_view_mut())?;
        Ok(x)
    }

    #[test]
    fn test_cholesky_4x4() {
        #[rustfmt::skip]
        let a = DMatrix::from_row_slice(4, 4, &[
            120.0, 114.0, -4.0, -16.0,
            114.0, 118.0, 11.0, -24.0,
            -4.0, 11.0, 58.0, 17.0,
            -16.0, -24.0, 17.0, 73.0,
        ]);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let expected = [-0.239044214697, 0.273229506199, -0.046809078910, 0.103130891166];

        for strategy in [&CholeskySolver as &dyn EquationSolver, &LuSolver] {
            let x = solve(strategy, &a, &b).unwrap();

            for (actual, expected) in x.iter().zip(expected) {
                assert_relative_eq!(*actual, expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_cholesky_singular_150x150() {
        let a = DMatrix::from_fn(150, 150, |i, j| (i + 1) as f64 + (j + 1) as f64);
        let b = DVector::from_element(150, 1.0);

        let err = solve(&CholeskySolver, &a, &b).unwrap_err();

        assert!(matches!(err, EquationSolverError::NotPositiveDefinite { .. }));
        assert!(err.to_string().contains("determinant"));
    }

    #[test]
    fn test_lu_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);

        assert_eq!(solve(&LuSolver, &a, &b).unwrap_err(), EquationSolverError::Singular);
    }

    #[test]
    fn test_symmetric_view_checks() {
        let square = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.5, 4.0]);
        assert_eq!(
            SymmetricView::new(square.as_view(), 1e-12).unwrap_err(),
            EquationSolverError::NotSymmetric
        );

        let wide = DMatrix::<f64>::zeros(2, 3);
        assert!(matches!(
            SymmetricView::new(wide.as_view(), 1e-12),
            Err(EquationSolverError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = DMatrix::<f64>::identity(3, 3);
        let b = DVector::from_element(2, 1.0);

        assert!(matches!(
            solve(&CholeskySolver, &a, &b),
            Err(EquationSolverError::DimensionMismatch { rhs: 2, .. })
        ));
    }
}
