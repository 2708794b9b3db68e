//! Result types for solved problems

use log::error;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::dof::{Fct, Index, NodalValue};
use crate::error::{BvpError, BvpResult};
use crate::layout::EqLayout;
use crate::polynomial::PolySequence;
use crate::problem::Problem;
use crate::solver::Solution;

/// A quantity interpolated along one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpolation {
    /// Element id
    pub element: String,
    /// Interpolated quantity
    pub quantity: Fct,
    /// Piecewise polynomial in local element coordinates, x from 0 at the start node
    pub piecewise: PolySequence,
}

/// Primary values, reactions and interpolation of a solved [`Problem`]
#[derive(Debug)]
pub struct ProblemResult<'a> {
    problem: &'a Problem,
    layout: EqLayout,
    primary: Vec<NodalValue>,
    reactions: Vec<NodalValue>,
    d: DVector<f64>,
}

impl<'a> ProblemResult<'a> {
    pub(crate) fn new(problem: &'a Problem, layout: EqLayout, solution: Solution) -> BvpResult<Self> {
        let Solution { primary, reactions } = solution;

        let aligned = primary.len() == layout.dim()
            && reactions.len() == layout.dim()
            && layout.iter().all(|(pos, index)| primary[pos].index == *index);

        if !aligned {
            error!("Solution values are not aligned with the equation layout");
            return Err(BvpError::InvalidLayout(
                "solution doesn't match the equation layout".to_string(),
            ));
        }

        let d = DVector::from_iterator(primary.len(), primary.iter().map(|v| v.value));

        Ok(Self {
            problem,
            layout,
            primary,
            reactions,
            d,
        })
    }

    /// Primary value at `index`
    pub fn primary(&self, index: &Index) -> BvpResult<f64> {
        let pos = self.layout.map_one(index);
        self.layout.flush_failure()?;
        Ok(self.primary[pos].value)
    }

    /// Reaction at `index`; zero unless `index` carries a Dirichlet BC
    pub fn reaction(&self, index: &Index) -> BvpResult<f64> {
        let pos = self.layout.map_one(index);
        self.layout.flush_failure()?;
        Ok(self.reactions[pos].value)
    }

    /// All primary values in layout order, constrained ones first
    pub fn primary_all(&self) -> &[NodalValue] {
        &self.primary
    }

    /// All reactions in layout order, constrained ones first
    pub fn reaction_all(&self) -> &[NodalValue] {
        &self.reactions
    }

    /// Interpolate `fct` along element `id`
    ///
    /// Pieces are flattened, trailing coefficients below `zero_tol` dropped and adjacent
    /// identical pieces merged. `None` if the element doesn't provide `fct`.
    pub fn interpolate(&self, id: &str, fct: Fct, zero_tol: f64) -> BvpResult<Option<Interpolation>> {
        let element = self.problem.element(id)?;
        let raw = element.interpolate(&self.layout, fct, &self.d);
        self.layout.flush_failure()?;

        Ok(raw.map(|sequence| {
            let mut piecewise = sequence.flatten();
            piecewise.trim_trailing_zeros(zero_tol).compact_identical(zero_tol);

            Interpolation {
                element: id.to_string(),
                quantity: fct,
                piecewise,
            }
        }))
    }

    /// Interpolate every quantity on every element that provides it
    ///
    /// Failing interpolations are logged and skipped.
    pub fn interpolate_all(&self, zero_tol: f64) -> Vec<Interpolation> {
        let mut all = Vec::new();

        for element in self.problem.elements() {
            for fct in Fct::ALL {
                match self.interpolate(element.id(), fct, zero_tol) {
                    Ok(Some(interpolation)) => all.push(interpolation),
                    Ok(None) => {}
                    Err(e) => error!("Interpolation of {} on '{}' failed: {}", fct, element.id(), e),
                }
            }
        }

        all
    }

    /// `(total, free)` number of degrees of freedom
    pub fn dimension(&self) -> (usize, usize) {
        (self.layout.dim(), self.layout.free())
    }

    pub fn layout(&self) -> &EqLayout {
        &self.layout
    }
}
