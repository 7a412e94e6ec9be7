//! Error types for geometry operations.

use crate::Interval;
use thiserror::Error;

/// Errors that can occur while evaluating or discretising geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeomError {
    /// Parameter lies outside the function or curve domain.
    #[error("parameter {value} is outside domain [{}, {}]", domain.start(), domain.end())]
    OutOfDomain {
        /// The offending parameter value.
        value: f64,
        /// The domain that was violated.
        domain: Interval,
    },

    /// Numerical evaluation produced a non-finite result or failed to converge.
    #[error("numerical evaluation failed: {reason}")]
    NumericalError {
        /// Description of the numerical issue.
        reason: String,
    },

    /// Geometry is degenerate (zero length, too few vertices, zero radius).
    #[error("degenerate geometry: {reason}")]
    Degenerate {
        /// Description of the degeneracy.
        reason: String,
    },

    /// A sub-function domain does not cover the curve it is attached to.
    #[error("domain mismatch: {reason}")]
    DomainMismatch {
        /// Description of the mismatch.
        reason: String,
    },

    /// Discretisation parameters are invalid.
    #[error("invalid discretisation parameter {parameter}: {value}")]
    InvalidParameter {
        /// The parameter name.
        parameter: &'static str,
        /// The invalid value.
        value: f64,
    },
}

impl GeomError {
    /// Create an out-of-domain error.
    #[must_use]
    pub fn out_of_domain(value: f64, domain: Interval) -> Self {
        Self::OutOfDomain { value, domain }
    }

    /// Create a numerical error.
    #[must_use]
    pub fn numerical(reason: impl Into<String>) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create a degenerate geometry error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }

    /// Create a domain mismatch error.
    #[must_use]
    pub fn domain_mismatch(reason: impl Into<String>) -> Self {
        Self::DomainMismatch {
            reason: reason.into(),
        }
    }

    /// Check if this is an out-of-domain error.
    #[must_use]
    pub fn is_out_of_domain(&self) -> bool {
        matches!(self, Self::OutOfDomain { .. })
    }

    /// Check if this is a numerical error.
    #[must_use]
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::NumericalError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeomError::out_of_domain(12.0, Interval::new(0.0, 10.0));
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains("10"));

        let err = GeomError::numerical("fresnel integral diverged");
        assert!(err.to_string().contains("fresnel"));
    }

    #[test]
    fn test_error_predicates() {
        let err = GeomError::out_of_domain(-1.0, Interval::new(0.0, 1.0));
        assert!(err.is_out_of_domain());
        assert!(!err.is_numerical());

        let err = GeomError::numerical("diverged");
        assert!(err.is_numerical());
    }
}
