//! Solver capability abstraction and raw result records.
//!
//! An [`Engine`] wraps one external electromagnetic solver. It consumes a
//! [`Multilayer`](crate::structure::Multilayer) plus frequency/angle sweeps
//! and returns [`RawRecord`]s: loosely-typed mappings from solver variable
//! names to multi-dimensional arrays. Only variable names and arrays cross
//! this boundary; backend-specific argument names never leak into the
//! orchestration or formatting layers.
//!
//! ## Axis signatures
//!
//! Axis order is a contract, not an implementation detail:
//!
//! | Variables | Rank | Axes |
//! |-----------|------|------|
//! | `rs rp ts tp Rs Rp Ts Tp` | 2 | (frequency, theta) |
//! | `Es Ep Hs Hp` | 4 | (frequency, theta, vector, z) |
//! | `frequency theta lambda z` | 1 | themselves |

use std::collections::BTreeMap;

use ndarray::ArrayD;
use num_complex::Complex64;
use thiserror::Error;

use crate::structure::Multilayer;

/// Reflection/transmission variables, in the order solvers report them.
/// Lowercase names are complex amplitude coefficients, uppercase names are
/// real power coefficients.
pub const RT_VARIABLES: [&str; 8] = ["rs", "rp", "ts", "tp", "Rs", "Rp", "Ts", "Tp"];

/// Field-profile variables: complex field components per polarization.
pub const FIELD_VARIABLES: [&str; 4] = ["Es", "Ep", "Hs", "Hp"];

/// Errors surfaced by engines.
///
/// Backend diagnostics pass through unmodified so failures can be correlated
/// with backend-specific causes; this layer never substitutes defaults for a
/// failed query.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Solver backend error: {0}")]
    Backend(String),

    #[error("Solver output is missing the '{variable}' variable")]
    MissingVariable { variable: String },

    #[error("Invalid field window: {0}")]
    Window(String),
}

/// One numeric array in a raw result record.
///
/// Solvers mix real arrays (power coefficients, coordinates) and complex
/// arrays (amplitude coefficients, field components) in one record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordArray {
    Real(ArrayD<f64>),
    Complex(ArrayD<Complex64>),
}

impl RecordArray {
    pub fn ndim(&self) -> usize {
        match self {
            RecordArray::Real(a) => a.ndim(),
            RecordArray::Complex(a) => a.ndim(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            RecordArray::Real(a) => a.shape(),
            RecordArray::Complex(a) => a.shape(),
        }
    }

    pub fn as_real(&self) -> Option<&ArrayD<f64>> {
        match self {
            RecordArray::Real(a) => Some(a),
            RecordArray::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ArrayD<Complex64>> {
        match self {
            RecordArray::Complex(a) => Some(a),
            RecordArray::Real(_) => None,
        }
    }

    /// Elementwise squared magnitude, real or complex input alike.
    pub fn magnitude_squared(&self) -> ArrayD<f64> {
        match self {
            RecordArray::Real(a) => a.mapv(|v| v * v),
            RecordArray::Complex(a) => a.mapv(|v| v.norm_sqr()),
        }
    }
}

impl From<ArrayD<f64>> for RecordArray {
    fn from(a: ArrayD<f64>) -> Self {
        RecordArray::Real(a)
    }
}

impl From<ArrayD<Complex64>> for RecordArray {
    fn from(a: ArrayD<Complex64>) -> Self {
        RecordArray::Complex(a)
    }
}

/// Raw solver output for one query: variable name → array.
///
/// Treated as an immutable snapshot once an engine returns it; downstream
/// layers clone rather than mutate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    variables: BTreeMap<String, RecordArray>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, array: impl Into<RecordArray>) {
        self.variables.insert(name.into(), array.into());
    }

    pub fn get(&self, name: &str) -> Option<&RecordArray> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordArray)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }
}

/// The kind of query an engine answers.
///
/// The arity of the engine's output is an explicit property of the query
/// kind, never inferred from the shape of what came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Reflectance/transmittance spectra only.
    ReflectionTransmission,
    /// Field profiles through the stack only.
    FieldProfile,
    /// Both in one invocation: one RT record and one field record.
    Combined,
}

impl QueryKind {
    /// Number of raw records a query of this kind produces.
    pub fn record_count(&self) -> usize {
        match self {
            QueryKind::ReflectionTransmission | QueryKind::FieldProfile => 1,
            QueryKind::Combined => 2,
        }
    }
}

/// Output of one engine invocation: a fixed-arity tuple of records whose
/// arity matches the engine's [`QueryKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutput {
    Rt(RawRecord),
    Field(RawRecord),
    RtField(RawRecord, RawRecord),
}

impl EngineOutput {
    pub fn kind(&self) -> QueryKind {
        match self {
            EngineOutput::Rt(_) => QueryKind::ReflectionTransmission,
            EngineOutput::Field(_) => QueryKind::FieldProfile,
            EngineOutput::RtField(..) => QueryKind::Combined,
        }
    }

    /// The records in order, regardless of arity.
    pub fn records(&self) -> Vec<&RawRecord> {
        match self {
            EngineOutput::Rt(r) | EngineOutput::Field(r) => vec![r],
            EngineOutput::RtField(rt, field) => vec![rt, field],
        }
    }
}

/// Capability abstraction over an external 1D optical solver.
///
/// The orchestration and formatting layers depend only on this trait, so
/// heterogeneous backends can be swapped without touching client code. One
/// invocation covers the full cross product of the supplied frequency and
/// angle sweeps; engines batch the sweep internally rather than being called
/// per point.
pub trait Engine: Send + Sync {
    /// Human-readable name of the backing solver.
    fn name(&self) -> &str;

    /// The query kind this engine answers, which fixes its output arity.
    fn query_kind(&self) -> QueryKind;

    /// Variable names this engine guarantees in its output records.
    fn variables(&self) -> &[&str];

    /// Propagate light through the structure over the whole sweep.
    ///
    /// `angles_deg` are incidence angles in degrees.
    fn run(
        &self,
        structure: &Multilayer,
        frequencies: &[f64],
        angles_deg: &[f64],
    ) -> Result<EngineOutput, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    #[test]
    fn query_kind_fixes_record_count() {
        assert_eq!(QueryKind::ReflectionTransmission.record_count(), 1);
        assert_eq!(QueryKind::FieldProfile.record_count(), 1);
        assert_eq!(QueryKind::Combined.record_count(), 2);
    }

    #[test]
    fn output_arity_matches_kind() {
        let rt = EngineOutput::RtField(RawRecord::new(), RawRecord::new());
        assert_eq!(rt.records().len(), rt.kind().record_count());
    }

    #[test]
    fn magnitude_squared_handles_real_and_complex() {
        let real: RecordArray = ArrayD::from_elem(vec![2, 2], -2.0).into();
        assert_eq!(real.magnitude_squared()[[0, 0]], 4.0);

        let complex: RecordArray =
            ArrayD::from_elem(vec![2], Complex64::new(3.0, 4.0)).into();
        assert_eq!(complex.magnitude_squared()[[1]], 25.0);
    }
}
