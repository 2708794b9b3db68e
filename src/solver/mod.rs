//! Partitioned assembly and solution of linear boundary value problems
//!
//! The assembled system `k·d = r` is partitioned as
//!
//! ```text
//! ⎡k11 k12⎤⎡d1⎤   ⎡r1⎤
//! ⎣k21 k22⎦⎣d2⎦ = ⎣r2⎦
//! ```
//!
//! where `d1` holds the Dirichlet-prescribed values and `d2` the free unknowns. The free block
//! is solved from `k22·d2 = r2 - k21·d1`, then the reactions follow from the first block row.

mod strategy;

pub use strategy::{CholeskySolver, EquationSolver, EquationSolverError, LuSolver, SymmetricView};

use log::{debug, info};
use nalgebra::{DMatrix, DVector};

use crate::analysis::SolverOptions;
use crate::dof::NodalValue;
use crate::error::{BvpError, BvpResult};
use crate::layout::EqLayout;
use crate::problem::Problem;

/// Global tangent, right-hand side and primary values, reused across solves
#[derive(Debug)]
pub struct Workspace {
    k: DMatrix<f64>,
    r: DVector<f64>,
    d: DVector<f64>,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            k: DMatrix::zeros(0, 0),
            r: DVector::zeros(0),
            d: DVector::zeros(0),
        }
    }

    /// Current system dimension
    pub fn dim(&self) -> usize {
        self.d.len()
    }

    /// Zero all buffers, reallocating only when the dimension changes
    fn reset(&mut self, dim: usize) {
        if self.dim() == dim {
            self.k.fill(0.0);
            self.r.fill(0.0);
            self.d.fill(0.0);
        } else {
            debug!("Reshape solver workspace from {} to {} unknowns", self.dim(), dim);
            self.k = DMatrix::zeros(dim, dim);
            self.r = DVector::zeros(dim);
            self.d = DVector::zeros(dim);
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Primary values and reactions, both paired with their index in layout position order
///
/// Free positions carry a zero reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub primary: Vec<NodalValue>,
    pub reactions: Vec<NodalValue>,
}

/// Linear solver owning the reusable [`Workspace`]
///
/// [`LinearSolver::solve`] takes `&mut self`: one instance serves one solve at a time. Use
/// separate instances to solve independent problems concurrently.
#[derive(Debug, Default)]
pub struct LinearSolver {
    workspace: Workspace,
    options: SolverOptions,
}

impl LinearSolver {
    pub fn new(options: SolverOptions) -> Self {
        Self {
            workspace: Workspace::new(),
            options,
        }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Assemble, solve and recover reactions for `problem` on `layout`
    ///
    /// Reactions at constrained positions are `k11·d1 + k12·d2 - r1`, with `r1` the external
    /// loads acting there: the force the support exerts on the structure.
    pub fn solve(
        &mut self,
        problem: &Problem,
        layout: &EqLayout,
        strategy: &dyn EquationSolver,
    ) -> BvpResult<Solution> {
        let (dim, constrained) = (layout.dim(), layout.constrained());

        if dim == constrained {
            return Err(BvpError::FullyConstrained(dim));
        }

        let free = dim - constrained;

        if self.options.log {
            info!("Start assembly and solution for {} unknowns, {} with BC", free, dim);
        }

        let tol = self.options.dirichlet_zero_tol;
        let ws = &mut self.workspace;
        ws.reset(dim);

        for element in problem.elements() {
            element.assemble(layout, &mut ws.k, &mut ws.r, &ws.d);
        }

        let mut non_zero_dirichlet = false;

        for bc in problem.dirichlet() {
            non_zero_dirichlet |= bc.value.abs() > tol;
            ws.d[layout.map_one(&bc.index)] = bc.value;
        }

        for bc in problem.neumann() {
            ws.r[layout.map_one(&bc.index)] += bc.value;
        }

        for transformer in problem.transformers() {
            debug!("Apply pre-solve step of {:?}", transformer);
            transformer.pre(layout, &mut ws.k, &mut ws.r, &mut ws.d);
        }

        // Never factorise a system assembled from incomplete mappings
        layout.flush_failure()?;

        if non_zero_dirichlet {
            ws.r.rows_mut(constrained, free).gemv_tr(
                -1.0,
                &ws.k.view((0, constrained), (constrained, free)),
                &ws.d.rows(0, constrained),
                1.0,
            );
        }

        strategy
            .solve_linear_system(
                SymmetricView::trusted(ws.k.view((constrained, constrained), (free, free))),
                ws.r.rows(constrained, free),
                ws.d.rows_mut(constrained, free),
            )
            .map_err(BvpError::SolveFailed)?;

        {
            let mut r1 = ws.r.rows_mut(0, constrained);
            r1.gemv(
                1.0,
                &ws.k.view((0, 0), (constrained, constrained)),
                &ws.d.rows(0, constrained),
                -1.0,
            );
            r1.gemv(
                1.0,
                &ws.k.view((0, constrained), (constrained, free)),
                &ws.d.rows(constrained, free),
                1.0,
            );
        }

        ws.r.rows_mut(constrained, free).fill(0.0);

        for transformer in problem.transformers() {
            transformer.post(layout, &mut ws.r, &mut ws.d);
        }

        layout.flush_failure()?;

        let paired = |values: &DVector<f64>| -> Vec<NodalValue> {
            layout
                .iter()
                .map(|(pos, index)| NodalValue {
                    index: index.clone(),
                    value: values[pos],
                })
                .collect()
        };

        Ok(Solution {
            primary: paired(&ws.d),
            reactions: paired(&ws.r),
        })
    }
}
