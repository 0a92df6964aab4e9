//! Sweep sequences with scalar promotion.
//!
//! A [`Sweep`] is an ordered sequence of frequencies (Hz) or incidence
//! angles (degrees). Scalars promote to single-element sweeps as a
//! convenience: `simulate` with a single check frequency is a 1×N sweep,
//! not an error.

use thiserror::Error;

/// Errors from invalid sweep parameters, raised before any engine call.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("The {name} sweep must not be empty")]
    EmptySweep { name: &'static str },

    #[error("The {name} sweep contains a non-finite value at position {position}")]
    NonFiniteValue { name: &'static str, position: usize },

    #[error("Frequencies must be positive, got {value} at position {position}")]
    NonPositiveFrequency { value: f64, position: usize },
}

/// An ordered sweep of real values.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep(Vec<f64>);

impl Sweep {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A linearly spaced sweep over `[start, end]` with `points` samples.
    ///
    /// Zero points yields an empty sweep, which validation then rejects; no
    /// sample is invented.
    pub fn linspace(start: f64, end: f64, points: usize) -> Self {
        match points {
            0 => Sweep(Vec::new()),
            1 => Sweep(vec![start]),
            _ => {
                let step = (end - start) / (points - 1) as f64;
                Sweep((0..points).map(|i| start + step * i as f64).collect())
            }
        }
    }

    /// Validate the sweep as a generic parameter sequence.
    pub(crate) fn validate(&self, name: &'static str) -> Result<(), ParameterError> {
        if self.0.is_empty() {
            return Err(ParameterError::EmptySweep { name });
        }
        if let Some(position) = self.0.iter().position(|v| !v.is_finite()) {
            return Err(ParameterError::NonFiniteValue { name, position });
        }
        Ok(())
    }

    /// Validate the sweep as a frequency sequence (finite and positive).
    pub(crate) fn validate_frequencies(&self) -> Result<(), ParameterError> {
        self.validate("frequencies")?;
        if let Some(position) = self.0.iter().position(|&v| v <= 0.0) {
            return Err(ParameterError::NonPositiveFrequency {
                value: self.0[position],
                position,
            });
        }
        Ok(())
    }
}

impl From<f64> for Sweep {
    fn from(value: f64) -> Self {
        Sweep(vec![value])
    }
}

impl From<Vec<f64>> for Sweep {
    fn from(values: Vec<f64>) -> Self {
        Sweep(values)
    }
}

impl From<&[f64]> for Sweep {
    fn from(values: &[f64]) -> Self {
        Sweep(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Sweep {
    fn from(values: [f64; N]) -> Self {
        Sweep(values.to_vec())
    }
}

impl FromIterator<f64> for Sweep {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Sweep(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_promotes_to_single_element_sweep() {
        let sweep: Sweep = 3.0e14.into();
        assert_eq!(sweep.values(), &[3.0e14]);
    }

    #[test]
    fn empty_sweep_fails_validation() {
        let sweep: Sweep = Vec::new().into();
        assert!(matches!(
            sweep.validate("angles"),
            Err(ParameterError::EmptySweep { name: "angles" })
        ));
    }

    #[test]
    fn non_positive_frequency_is_rejected() {
        let sweep: Sweep = vec![1.0e14, 0.0].into();
        assert!(matches!(
            sweep.validate_frequencies(),
            Err(ParameterError::NonPositiveFrequency { position: 1, .. })
        ));
    }

    #[test]
    fn angles_may_be_negative() {
        let sweep: Sweep = vec![-45.0, 0.0, 45.0].into();
        assert!(sweep.validate("angles").is_ok());
    }

    #[test]
    fn linspace_endpoints() {
        let sweep = Sweep::linspace(4.0e14, 8.0e14, 5);
        assert_eq!(sweep.len(), 5);
        assert_eq!(sweep.values()[0], 4.0e14);
        assert_eq!(sweep.values()[4], 8.0e14);
    }

    #[test]
    fn linspace_with_zero_points_is_empty_and_invalid() {
        let sweep = Sweep::linspace(4.0e14, 8.0e14, 0);
        assert!(sweep.is_empty());
        assert!(matches!(
            sweep.validate_frequencies(),
            Err(ParameterError::EmptySweep { name: "frequencies" })
        ));
        assert_eq!(Sweep::linspace(4.0e14, 8.0e14, 1).values(), &[4.0e14]);
    }
}
