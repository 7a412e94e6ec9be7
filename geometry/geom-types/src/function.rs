//! Univariate functions over finite domains.
//!
//! Road profiles (elevation, superelevation, lane width, lane offset) are
//! piecewise cubic polynomials in the arc-length parameter `s`. This module
//! provides the single-piece polynomials and the piecewise stack that
//! dispatches between them.

use crate::{GeomError, Interval, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A scalar function of one variable over a domain.
///
/// `value` fails with [`GeomError::OutOfDomain`] outside the domain;
/// `value_fuzzy` widens the domain check by a tolerance before clamping the
/// parameter into the domain.
pub trait UnivariateFunction {
    /// The function's domain.
    fn domain(&self) -> Interval;

    /// Evaluate at `x`.
    fn value(&self, x: f64) -> Result<f64>;

    /// Evaluate at `x`, accepting parameters within `tol` of the domain.
    fn value_fuzzy(&self, x: f64, tol: f64) -> Result<f64> {
        if self.domain().fuzzy_contains(x, tol) {
            self.value(self.domain().clamp(x))
        } else {
            Err(GeomError::out_of_domain(x, self.domain()))
        }
    }
}

/// A linear function `slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearFunction {
    /// Slope.
    pub slope: f64,
    /// Intercept at `x = 0`.
    pub intercept: f64,
    /// Domain of definition.
    pub domain: Interval,
}

impl LinearFunction {
    /// Create a linear function over a domain.
    #[must_use]
    pub fn new(slope: f64, intercept: f64, domain: Interval) -> Self {
        Self {
            slope,
            intercept,
            domain,
        }
    }

    /// The x-axis identity: `slope = 1`, `intercept = 0`, unbounded domain.
    #[must_use]
    pub fn axis_x() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
            domain: Interval::unbounded(),
        }
    }
}

impl UnivariateFunction for LinearFunction {
    fn domain(&self) -> Interval {
        self.domain
    }

    fn value(&self, x: f64) -> Result<f64> {
        if !self.domain.contains(x) {
            return Err(GeomError::out_of_domain(x, self.domain));
        }
        Ok(self.slope * x + self.intercept)
    }
}

/// A cubic polynomial `a + b*x + c*x^2 + d*x^3` over a domain.
///
/// Evaluated with Horner's scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicFunction {
    /// Constant coefficient.
    pub a: f64,
    /// Linear coefficient.
    pub b: f64,
    /// Quadratic coefficient.
    pub c: f64,
    /// Cubic coefficient.
    pub d: f64,
    /// Domain of definition.
    pub domain: Interval,
}

impl CubicFunction {
    /// Create a cubic polynomial over a domain.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, domain: Interval) -> Self {
        Self { a, b, c, d, domain }
    }

    /// Evaluate without the domain check.
    #[must_use]
    pub fn value_unchecked(&self, x: f64) -> f64 {
        self.a + x * (self.b + x * (self.c + x * self.d))
    }

    /// First derivative at `x` (no domain check).
    #[must_use]
    pub fn slope(&self, x: f64) -> f64 {
        self.b + x * (2.0 * self.c + x * 3.0 * self.d)
    }
}

impl UnivariateFunction for CubicFunction {
    fn domain(&self) -> Interval {
        self.domain
    }

    fn value(&self, x: f64) -> Result<f64> {
        if !self.domain.contains(x) {
            return Err(GeomError::out_of_domain(x, self.domain));
        }
        Ok(self.value_unchecked(x))
    }
}

/// Behaviour of a [`StackedFunction`] outside all of its pieces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExtrapolationPolicy {
    /// Fail with [`GeomError::OutOfDomain`].
    #[default]
    Fail,
    /// Evaluate the nearest piece at its nearest endpoint.
    ClampToNearest,
    /// Return a fixed value.
    Constant(f64),
}

/// An ordered piecewise function.
///
/// Each piece is a cubic in the *local* coordinate `x - piece_start`, which
/// matches how OpenDRIVE profile entries are written. Dispatch picks the
/// first piece whose interval contains `x` (first-wins on overlap).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackedFunction {
    pieces: Vec<(Interval, CubicFunction)>,
    domain: Interval,
    policy: ExtrapolationPolicy,
}

impl StackedFunction {
    /// Build from `(start, cubic)` pieces over a total domain.
    ///
    /// Pieces must be given in ascending start order; each piece covers
    /// `[start_i, start_{i+1}]` (the last piece extends to `domain.end()`).
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] when `entries` is empty.
    pub fn from_entries(
        entries: Vec<(f64, CubicFunction)>,
        domain: Interval,
        policy: ExtrapolationPolicy,
    ) -> Result<Self> {
        if entries.is_empty() {
            return Err(GeomError::degenerate("stacked function with no pieces"));
        }
        let mut pieces = Vec::with_capacity(entries.len());
        for (i, (start, cubic)) in entries.iter().enumerate() {
            let end = entries
                .get(i + 1)
                .map_or(domain.end(), |(next_start, _)| *next_start);
            pieces.push((Interval::new(*start, end), *cubic));
        }
        Ok(Self {
            pieces,
            domain,
            policy,
        })
    }

    /// A constant function over a domain.
    #[must_use]
    pub fn constant(value: f64, domain: Interval) -> Self {
        Self {
            pieces: vec![(
                domain,
                CubicFunction::new(value, 0.0, 0.0, 0.0, Interval::unbounded()),
            )],
            domain,
            policy: ExtrapolationPolicy::ClampToNearest,
        }
    }

    /// Number of pieces.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    fn eval_piece(piece: &(Interval, CubicFunction), x: f64) -> f64 {
        piece.1.value_unchecked(x - piece.0.start())
    }
}

impl UnivariateFunction for StackedFunction {
    fn domain(&self) -> Interval {
        self.domain
    }

    fn value(&self, x: f64) -> Result<f64> {
        if let Some(piece) = self.pieces.iter().find(|(range, _)| range.contains(x)) {
            return Ok(Self::eval_piece(piece, x));
        }
        match self.policy {
            ExtrapolationPolicy::Fail => Err(GeomError::out_of_domain(x, self.domain)),
            ExtrapolationPolicy::Constant(v) => Ok(v),
            ExtrapolationPolicy::ClampToNearest => {
                let nearest = self
                    .pieces
                    .iter()
                    .min_by(|(a, _), (b, _)| {
                        dist(a, x)
                            .partial_cmp(&dist(b, x))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .ok_or_else(|| GeomError::degenerate("stacked function with no pieces"))?;
                Ok(Self::eval_piece(nearest, nearest.0.clamp(x)))
            }
        }
    }
}

fn dist(range: &Interval, x: f64) -> f64 {
    if x < range.start() {
        range.start() - x
    } else if x > range.end() {
        x - range.end()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_axis_x() {
        let f = LinearFunction::axis_x();
        assert_relative_eq!(f.value(42.0).unwrap(), 42.0);
        assert_relative_eq!(f.value(-3.5).unwrap(), -3.5);
    }

    #[test]
    fn test_cubic_horner() {
        // f(x) = 1 + 2x + 3x^2 + 4x^3, f(2) = 1 + 4 + 12 + 32 = 49
        let f = CubicFunction::new(1.0, 2.0, 3.0, 4.0, Interval::new(0.0, 10.0));
        assert_relative_eq!(f.value(2.0).unwrap(), 49.0);
        // f'(x) = 2 + 6x + 12x^2, f'(2) = 2 + 12 + 48 = 62
        assert_relative_eq!(f.slope(2.0), 62.0);
    }

    #[test]
    fn test_cubic_out_of_domain() {
        let f = CubicFunction::new(0.0, 1.0, 0.0, 0.0, Interval::new(0.0, 5.0));
        assert!(f.value(6.0).unwrap_err().is_out_of_domain());
        assert_relative_eq!(f.value_fuzzy(5.05, 0.1).unwrap(), 5.0);
    }

    #[test]
    fn test_stacked_dispatch() {
        // Two pieces: [0,5] -> constant 1, [5,10] -> constant 2
        let f = StackedFunction::from_entries(
            vec![
                (0.0, CubicFunction::new(1.0, 0.0, 0.0, 0.0, Interval::unbounded())),
                (5.0, CubicFunction::new(2.0, 0.0, 0.0, 0.0, Interval::unbounded())),
            ],
            Interval::new(0.0, 10.0),
            ExtrapolationPolicy::Fail,
        )
        .unwrap();

        assert_relative_eq!(f.value(2.0).unwrap(), 1.0);
        assert_relative_eq!(f.value(7.0).unwrap(), 2.0);
        // Overlap at the seam resolves to the first piece.
        assert_relative_eq!(f.value(5.0).unwrap(), 1.0);
    }

    #[test]
    fn test_stacked_local_coordinates() {
        // Piece starting at s=5 with b=1 evaluates as (x - 5).
        let f = StackedFunction::from_entries(
            vec![(5.0, CubicFunction::new(0.0, 1.0, 0.0, 0.0, Interval::unbounded()))],
            Interval::new(5.0, 10.0),
            ExtrapolationPolicy::Fail,
        )
        .unwrap();
        assert_relative_eq!(f.value(8.0).unwrap(), 3.0);
    }

    #[test]
    fn test_stacked_extrapolation() {
        let entries = vec![(
            2.0,
            CubicFunction::new(1.0, 1.0, 0.0, 0.0, Interval::unbounded()),
        )];

        let fail = StackedFunction::from_entries(
            entries.clone(),
            Interval::new(2.0, 4.0),
            ExtrapolationPolicy::Fail,
        )
        .unwrap();
        assert!(fail.value(1.0).is_err());

        let clamp = StackedFunction::from_entries(
            entries.clone(),
            Interval::new(2.0, 4.0),
            ExtrapolationPolicy::ClampToNearest,
        )
        .unwrap();
        // Below the stack: value at piece start (local 0) = 1.
        assert_relative_eq!(clamp.value(0.0).unwrap(), 1.0);
        // Above the stack: value at piece end (local 2) = 3.
        assert_relative_eq!(clamp.value(9.0).unwrap(), 3.0);

        let constant = StackedFunction::from_entries(
            entries,
            Interval::new(2.0, 4.0),
            ExtrapolationPolicy::Constant(-1.0),
        )
        .unwrap();
        assert_relative_eq!(constant.value(0.0).unwrap(), -1.0);
    }

    #[test]
    fn test_stacked_empty() {
        let err = StackedFunction::from_entries(
            Vec::new(),
            Interval::new(0.0, 1.0),
            ExtrapolationPolicy::Fail,
        )
        .unwrap_err();
        assert!(matches!(err, GeomError::Degenerate { .. }));
    }

    #[test]
    fn test_constant_stack() {
        let f = StackedFunction::constant(2.5, Interval::new(0.0, 100.0));
        assert_relative_eq!(f.value(0.0).unwrap(), 2.5);
        assert_relative_eq!(f.value(100.0).unwrap(), 2.5);
        assert_relative_eq!(f.value(500.0).unwrap(), 2.5);
    }
}
