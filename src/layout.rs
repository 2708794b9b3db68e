//! Mapping between symbolic indices and positions in the global system
//!
//! The layout is partitioned: the first `c` positions are the Dirichlet-constrained indices,
//! the remaining `n - c` positions the free ones. Both partitions are sorted by the canonical
//! [`Index`] order, which makes the natural block partition of the global system line up with
//! known and unknown degrees of freedom.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use crate::dof::{Index, NodalValue};
use crate::error::{BvpError, BvpResult};
use crate::problem::Problem;

/// Number of failed lookups that are reported by name
const MAX_REPORTED_FAILURES: usize = 5;

#[derive(Debug, Default)]
struct LookupFailures {
    count: usize,
    names: Vec<String>,
}

/// Bidirectional map between [`Index`] and integer positions `0..n`
///
/// Read-only after construction, except for the sticky lookup failure state: a miss in
/// [`EqLayout::map_one`] doesn't abort, it is recorded and later reported through
/// [`EqLayout::failure`] or [`EqLayout::flush_failure`], so a whole assembly pass can report
/// all bad references at once.
#[derive(Debug)]
pub struct EqLayout {
    indices: HashMap<Index, usize>,
    inverse: Vec<Index>,
    constrained: usize,
    failures: RefCell<LookupFailures>,
}

impl EqLayout {
    /// Create a layout from all indices referenced by elements and the Dirichlet BCs
    ///
    /// Duplicate Dirichlet BCs on the same index and Dirichlet BCs on indices no element
    /// references are rejected; all such problems are joined into a single error.
    pub fn new(referenced: &BTreeSet<Index>, dirichlet: &[NodalValue]) -> BvpResult<Self> {
        let mut constrained = BTreeSet::new();
        let mut duplicates = BTreeSet::new();

        for bc in dirichlet {
            if !constrained.insert(bc.index.clone()) {
                duplicates.insert(bc.index.clone());
            }
        }

        let mut errors: Vec<String> = duplicates
            .iter()
            .map(|index| format!("duplicate Dirichlet BC on {index}"))
            .collect();

        errors.extend(
            constrained
                .iter()
                .filter(|index| !referenced.contains(*index))
                .map(|index| format!("Dirichlet BC on {index} is not connected to any element")),
        );

        if !errors.is_empty() {
            return Err(BvpError::InvalidLayout(errors.join("; ")));
        }

        let inverse: Vec<Index> = constrained
            .iter()
            .chain(referenced.difference(&constrained))
            .cloned()
            .collect();

        let indices = inverse
            .iter()
            .enumerate()
            .map(|(pos, index)| (index.clone(), pos))
            .collect();

        Ok(Self {
            indices,
            inverse,
            constrained: constrained.len(),
            failures: RefCell::new(LookupFailures::default()),
        })
    }

    /// Create the layout for a problem, collecting the indices of all its elements
    pub fn from_problem(problem: &Problem) -> BvpResult<Self> {
        let mut referenced = BTreeSet::new();

        for element in problem.elements() {
            element.indices(&mut referenced);
        }

        Self::new(&referenced, problem.dirichlet())
    }

    /// Total number of positions
    pub fn dim(&self) -> usize {
        self.inverse.len()
    }

    /// Number of Dirichlet-constrained positions, all of them in `0..constrained()`
    pub fn constrained(&self) -> usize {
        self.constrained
    }

    /// Number of free positions, all of them in `constrained()..dim()`
    pub fn free(&self) -> usize {
        self.dim() - self.constrained
    }

    /// Position of `index`; a miss is recorded and yields 0
    pub fn map_one(&self, index: &Index) -> usize {
        match self.indices.get(index) {
            Some(&pos) => pos,
            None => {
                self.record_failure(index);
                0
            }
        }
    }

    /// Positions of several indices at once, with the same miss semantics as [`Self::map_one`]
    pub fn map<const N: usize>(&self, indices: [&Index; N]) -> [usize; N] {
        indices.map(|index| self.map_one(index))
    }

    /// Symbolic index at `pos`, if `pos` is part of this layout
    pub fn unmap(&self, pos: usize) -> Option<&Index> {
        self.inverse.get(pos)
    }

    /// Iterate over `(position, index)` pairs in position order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Index)> {
        self.inverse.iter().enumerate()
    }

    /// Whether `index` is part of the layout, without recording a miss
    pub fn contains(&self, index: &Index) -> bool {
        self.indices.contains_key(index)
    }

    /// The aggregated lookup failure since construction or the last flush, if any
    pub fn failure(&self) -> Option<BvpError> {
        let failures = self.failures.borrow();

        if failures.count == 0 {
            return None;
        }

        let mut names = failures.names.join(", ");

        if failures.count > failures.names.len() {
            names.push_str(", ...");
        }

        Some(BvpError::LookupFailure {
            count: failures.count,
            names,
        })
    }

    /// Like [`Self::failure`], but resets the failure state
    pub fn flush_failure(&self) -> BvpResult<()> {
        let failure = self.failure();
        *self.failures.borrow_mut() = LookupFailures::default();

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn record_failure(&self, index: &Index) {
        let mut failures = self.failures.borrow_mut();
        failures.count += 1;

        if failures.names.len() < MAX_REPORTED_FAILURES {
            failures.names.push(index.to_string());
        }
    }
}
