//! Piecewise polynomials for internal force and displacement diagrams
//!
//! A [`PolyPiece`] is a polynomial on a closed interval, a [`PolySequence`] a list of them.
//! Elements produce raw, possibly overlapping sequences (one piece per load contribution) and
//! [`PolySequence::flatten`] sums them into non-overlapping, contiguous pieces.

use serde::{Deserialize, Serialize};

use crate::error::{BvpError, BvpResult};

/// Absolute tolerance for domain checks and breakpoint comparisons
pub const DOMAIN_TOL: f64 = 1e-10;

/// Polynomial on `[x0, xe]`; `coeff[i]` is the coefficient of `x^i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyPiece {
    pub x0: f64,
    pub xe: f64,
    pub coeff: Vec<f64>,
}

impl PolyPiece {
    pub fn new(x0: f64, xe: f64, coeff: Vec<f64>) -> Self {
        Self { x0, xe, coeff }
    }

    /// Constant function on `[x0, xe]`
    pub fn constant(x0: f64, xe: f64, value: f64) -> Self {
        Self::new(x0, xe, vec![value])
    }

    pub fn degree(&self) -> usize {
        self.coeff.len().saturating_sub(1)
    }

    /// Evaluate at `x`, which must lie in the domain up to [`DOMAIN_TOL`]
    pub fn eval(&self, x: f64) -> BvpResult<f64> {
        if x < self.x0 - DOMAIN_TOL || x > self.xe + DOMAIN_TOL {
            return Err(BvpError::OutOfDomain {
                x,
                x0: self.x0,
                xe: self.xe,
            });
        }

        Ok(self.horner(x))
    }

    /// Derivative on the same domain; constants derive to the zero constant
    pub fn derive(&self) -> PolyPiece {
        let coeff = if self.coeff.len() <= 1 {
            vec![0.0]
        } else {
            self.coeff[1..]
                .iter()
                .enumerate()
                .map(|(i, c)| c * (i + 1) as f64)
                .collect()
        };

        Self::new(self.x0, self.xe, coeff)
    }

    /// Antiderivative on the same domain that evaluates to `constant` at `x0`
    ///
    /// The zero constant integrates to `constant` itself, so that deriving and integrating a
    /// constant gives it back. Any longer coefficient vector gains one degree.
    pub fn integrate(&self, constant: f64) -> PolyPiece {
        if self.coeff.is_empty() || self.coeff == [0.0] {
            return Self::constant(self.x0, self.xe, constant);
        }

        let mut coeff = Vec::with_capacity(self.coeff.len() + 1);
        coeff.push(0.0);
        coeff.extend(
            self.coeff
                .iter()
                .enumerate()
                .map(|(i, c)| c / (i + 1) as f64),
        );

        let mut result = Self::new(self.x0, self.xe, coeff);
        result.coeff[0] = constant - result.horner(self.x0);

        result
    }

    /// Scale all coefficients by `factor`
    pub fn multiply(&self, factor: f64) -> PolyPiece {
        Self::new(
            self.x0,
            self.xe,
            self.coeff.iter().map(|c| c * factor).collect(),
        )
    }

    fn horner(&self, x: f64) -> f64 {
        self.coeff.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    fn covers(&self, a: f64, b: f64) -> bool {
        self.x0 <= a + DOMAIN_TOL && self.xe >= b - DOMAIN_TOL
    }

    fn trim_trailing_zeros(&mut self, tol: f64) {
        while self.coeff.len() > 1 && self.coeff.last().is_some_and(|c| c.abs() <= tol) {
            self.coeff.pop();
        }

        match self.coeff.first_mut() {
            Some(c) if c.abs() <= tol => *c = 0.0,
            Some(_) => {}
            None => self.coeff.push(0.0),
        }
    }
}

/// Ordered list of [`PolyPiece`]s
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolySequence {
    pieces: Vec<PolyPiece>,
}

impl PolySequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, piece: PolyPiece) {
        self.pieces.push(piece);
    }

    pub fn pieces(&self) -> &[PolyPiece] {
        &self.pieces
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PolyPiece> {
        self.pieces.iter()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Position of the first piece whose domain contains `x`
    ///
    /// Domain ends are compared with an absolute or relative tolerance of [`DOMAIN_TOL`].
    pub fn interval_index(&self, x: f64) -> Option<usize> {
        let tol = DOMAIN_TOL * x.abs().max(1.0);

        self.pieces
            .iter()
            .position(|p| x >= p.x0 - tol && x <= p.xe + tol)
    }

    /// Evaluate the piece containing `x`
    pub fn eval(&self, x: f64) -> BvpResult<f64> {
        match self.interval_index(x) {
            Some(i) => Ok(self.pieces[i].horner(x)),
            None => Err(BvpError::OutOfDomain {
                x,
                x0: self.pieces.first().map_or(f64::NAN, |p| p.x0),
                xe: self.pieces.last().map_or(f64::NAN, |p| p.xe),
            }),
        }
    }

    /// Piecewise derivative
    pub fn derive(&self) -> PolySequence {
        self.pieces.iter().map(PolyPiece::derive).collect()
    }

    /// Piecewise antiderivative that is continuous across pieces
    ///
    /// The first piece starts at `constant`, every following one at the end value of its
    /// predecessor.
    pub fn integrate(&self, constant: f64) -> PolySequence {
        let mut result = PolySequence::new();
        let mut start = constant;

        for piece in &self.pieces {
            let integral = piece.integrate(start);
            start = integral.horner(integral.xe);
            result.push(integral);
        }

        result
    }

    /// Scale every piece by `factor`
    pub fn multiply(&self, factor: f64) -> PolySequence {
        self.pieces.iter().map(|p| p.multiply(factor)).collect()
    }

    /// Sum overlapping pieces into non-overlapping, contiguous ones
    ///
    /// The breakpoints of all pieces split the domain into sub-intervals, and the coefficients
    /// of every piece covering a sub-interval are added up. Sub-intervals that no piece covers
    /// are left out, so gaps in the input remain gaps.
    pub fn flatten(&self) -> PolySequence {
        let mut breakpoints: Vec<f64> = self.pieces.iter().flat_map(|p| [p.x0, p.xe]).collect();
        breakpoints.sort_by(f64::total_cmp);
        breakpoints.dedup_by(|next, kept| (*next - *kept).abs() <= DOMAIN_TOL);

        let mut result = PolySequence::new();

        for bounds in breakpoints.windows(2) {
            let (a, b) = (bounds[0], bounds[1]);
            let mut covering = self.pieces.iter().filter(|p| p.covers(a, b)).peekable();

            if covering.peek().is_none() {
                continue;
            }

            let mut coeff: Vec<f64> = Vec::new();

            for piece in covering {
                if coeff.len() < piece.coeff.len() {
                    coeff.resize(piece.coeff.len(), 0.0);
                }

                for (sum, c) in coeff.iter_mut().zip(&piece.coeff) {
                    *sum += c;
                }
            }

            result.push(PolyPiece::new(a, b, coeff));
        }

        result
    }

    /// Drop trailing coefficients with magnitude at most `tol`, keeping at least one per piece
    pub fn trim_trailing_zeros(&mut self, tol: f64) -> &mut Self {
        for piece in &mut self.pieces {
            piece.trim_trailing_zeros(tol);
        }

        self
    }

    /// Merge abutting neighbours with coefficients equal up to `tol`
    pub fn compact_identical(&mut self, tol: f64) -> &mut Self {
        let mut compacted: Vec<PolyPiece> = Vec::with_capacity(self.pieces.len());

        for piece in self.pieces.drain(..) {
            match compacted.last_mut() {
                Some(prev)
                    if equal_within(prev.xe, piece.x0, tol)
                        && coefficients_equal(&prev.coeff, &piece.coeff, tol) =>
                {
                    prev.xe = piece.xe;
                }
                _ => compacted.push(piece),
            }
        }

        self.pieces = compacted;
        self
    }
}

impl From<Vec<PolyPiece>> for PolySequence {
    fn from(pieces: Vec<PolyPiece>) -> Self {
        Self { pieces }
    }
}

impl FromIterator<PolyPiece> for PolySequence {
    fn from_iter<I: IntoIterator<Item = PolyPiece>>(iter: I) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PolySequence {
    type Item = PolyPiece;
    type IntoIter = std::vec::IntoIter<PolyPiece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.into_iter()
    }
}

impl<'a> IntoIterator for &'a PolySequence {
    type Item = &'a PolyPiece;
    type IntoIter = std::slice::Iter<'a, PolyPiece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.iter()
    }
}

/// Absolute or relative equality
fn equal_within(a: f64, b: f64, tol: f64) -> bool {
    let diff = (a - b).abs();
    diff <= tol || diff <= tol * a.abs().max(b.abs())
}

fn coefficients_equal(a: &[f64], b: &[f64], tol: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equal_within(*x, *y, tol))
}
