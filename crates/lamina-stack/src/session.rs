//! The external-solver session boundary.
//!
//! A [`StackSession`] is a live handle to a STACK-style solver owned outside
//! this crate. Sessions are not guaranteed reentrant: callers must not issue
//! overlapping queries against one session. Engines in this crate respect
//! that discipline by running strictly call-and-return.

use lamina_core::engine::{EngineError, RawRecord};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use thiserror::Error;

/// A backend diagnostic, passed through verbatim.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SessionError(pub String);

impl From<SessionError> for EngineError {
    fn from(err: SessionError) -> Self {
        EngineError::Backend(err.0)
    }
}

/// Optional spatial sampling controls for field-profile queries.
///
/// The backing solver takes these positionally, so `min` is only meaningful
/// together with `resolution`, and `max` only together with `min`.
/// [`FieldWindow::validate`] enforces that prefix rule up front rather than
/// letting a partially-applied window be silently dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldWindow {
    /// Number of spatial sample points.
    pub resolution: Option<usize>,
    /// Start of the sampled interval (m), relative to the stack front.
    pub min: Option<f64>,
    /// End of the sampled interval (m).
    pub max: Option<f64>,
}

impl FieldWindow {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min.is_some() && self.resolution.is_none() {
            return Err(EngineError::Window(
                "'min' requires 'resolution' to be set".into(),
            ));
        }
        if self.max.is_some() && self.min.is_none() {
            return Err(EngineError::Window("'max' requires 'min' to be set".into()));
        }
        if let Some(0) = self.resolution {
            return Err(EngineError::Window("'resolution' must be at least 1".into()));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if max <= min {
                return Err(EngineError::Window(format!(
                    "'max' ({max}) must exceed 'min' ({min})"
                )));
            }
        }
        Ok(())
    }
}

/// Blocking query interface of a STACK-style 1D solver session.
///
/// `index` has shape `(n_layers, n_frequencies)`; `thickness` has one entry
/// per layer; angles are in degrees. Both queries cover the full cross
/// product of frequencies and angles in a single solver call.
pub trait StackSession: Send + Sync {
    /// Identifier of the backing product/session.
    fn name(&self) -> &str;

    /// Reflection/transmission query.
    fn stackrt(
        &self,
        index: &Array2<Complex64>,
        thickness: &Array1<f64>,
        frequencies: &[f64],
        angles_deg: &[f64],
    ) -> Result<RawRecord, SessionError>;

    /// Field-profile query over the given spatial window.
    fn stackfield(
        &self,
        index: &Array2<Complex64>,
        thickness: &Array1<f64>,
        frequencies: &[f64],
        angles_deg: &[f64],
        window: &FieldWindow,
    ) -> Result<RawRecord, SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_valid() {
        assert!(FieldWindow::default().validate().is_ok());
    }

    #[test]
    fn min_requires_resolution() {
        let window = FieldWindow {
            min: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(window.validate(), Err(EngineError::Window(_))));
    }

    #[test]
    fn max_requires_min() {
        let window = FieldWindow {
            resolution: Some(100),
            max: Some(1.0e-6),
            ..Default::default()
        };
        assert!(matches!(window.validate(), Err(EngineError::Window(_))));
    }

    #[test]
    fn full_prefix_is_valid() {
        let window = FieldWindow {
            resolution: Some(100),
            min: Some(0.0),
            max: Some(2.0e-6),
        };
        assert!(window.validate().is_ok());
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let window = FieldWindow {
            resolution: Some(100),
            min: Some(1.0e-6),
            max: Some(0.5e-6),
        };
        assert!(matches!(window.validate(), Err(EngineError::Window(_))));
    }
}
