//! Frequency/wavelength conversion helpers.
//!
//! Frequency has primacy throughout the crate: sweeps are stored as
//! frequencies and wavelengths are derived on demand via $\lambda = c / f$.
//! The same relation maps back, so either coordinate is recoverable from the
//! other.

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e8;

/// Convert a frequency (Hz) to a vacuum wavelength (m), or vice versa.
///
/// The relation is its own inverse, so a single function serves both
/// directions.
pub fn convert_frequency_and_wavelength(value: f64) -> f64 {
    SPEED_OF_LIGHT / value
}

/// Convert a slice of frequencies (Hz) to vacuum wavelengths (m), or vice
/// versa.
pub fn convert_all(values: &[f64]) -> Vec<f64> {
    values.iter().map(|&v| SPEED_OF_LIGHT / v).collect()
}
