//! Field-profile record converter.

use lamina_core::engine::{RawRecord, RecordArray, FIELD_VARIABLES};
use ndarray::Axis;

use crate::coords::{frequency_and_wavelength, required_coord};
use crate::dataset::{Dataset, DatasetSink, FormatError};

const DIMS: [&str; 4] = ["frequency", "theta", "vector", "z"];

/// Axis index of the vector-component dimension in a field array.
const VECTOR_AXIS: usize = 2;

/// Component labels of the `vector` dimension.
pub const VECTOR_LABELS: [&str; 3] = ["i", "j", "k"];

/// Converts a field record into a labeled representation.
///
/// Field arrays carry the documented `(frequency, theta, vector, z)` axis
/// order with three vector components. Intensity variables `|V|^2` sum the
/// squared component magnitudes over the vector axis, whether the raw array
/// is real or complex.
#[derive(Debug, Clone)]
pub struct FieldFormat {
    /// Raw variables to pass through, in output order.
    pub variables: Vec<String>,
    /// Derive `|V|^2` for each passed-through variable.
    pub add_norms: bool,
}

impl Default for FieldFormat {
    fn default() -> Self {
        Self {
            variables: FIELD_VARIABLES.iter().map(|&v| v.to_owned()).collect(),
            add_norms: true,
        }
    }
}

impl FieldFormat {
    /// Pass through only the given variables.
    pub fn with_variables<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Drive a sink with the labeled content of one field record.
    pub fn apply<S: DatasetSink>(&self, record: &RawRecord, sink: &mut S) -> Result<(), FormatError> {
        let (frequency, wavelength) = frequency_and_wavelength(record)?;
        let theta = required_coord(record, "theta")?;
        let z = required_coord(record, "z")?;
        let shape = [frequency.len(), theta.len(), VECTOR_LABELS.len(), z.len()];

        sink.add_dim_coord("frequency", frequency.into())?;
        sink.add_dim_coord("theta", theta.into())?;
        sink.add_dim_coord("vector", VECTOR_LABELS.to_vec().into())?;
        sink.add_dim_coord("z", z.into())?;
        sink.add_coord("wavelength", "frequency", wavelength.into())?;

        for name in &self.variables {
            let array = record.get(name).ok_or_else(|| FormatError::MissingVariable {
                variable: name.clone(),
            })?;
            validate_shape(name, array, &shape)?;
            sink.add_variable(name, &DIMS, array.clone())?;

            if self.add_norms {
                let intensity = array.magnitude_squared().sum_axis(Axis(VECTOR_AXIS));
                sink.add_variable(
                    &format!("|{name}|^2"),
                    &["frequency", "theta", "z"],
                    RecordArray::Real(intensity),
                )?;
            }
        }

        Ok(())
    }

    /// Convert one field record into a labeled dataset.
    pub fn to_dataset(&self, record: &RawRecord) -> Result<Dataset, FormatError> {
        let mut dataset = Dataset::new();
        self.apply(record, &mut dataset)?;
        Ok(dataset)
    }
}

fn validate_shape(name: &str, array: &RecordArray, shape: &[usize; 4]) -> Result<(), FormatError> {
    if array.ndim() != 4 {
        return Err(FormatError::RankMismatch {
            variable: name.to_owned(),
            expected: 4,
            found: array.ndim(),
        });
    }
    for (axis, dim) in DIMS.iter().enumerate() {
        if array.shape()[axis] != shape[axis] {
            return Err(FormatError::AxisLengthMismatch {
                variable: name.to_owned(),
                dim: (*dim).to_owned(),
                expected: shape[axis],
                found: array.shape()[axis],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};
    use num_complex::Complex64;

    fn field_record(n_f: usize, n_a: usize, n_z: usize) -> RawRecord {
        let mut record = RawRecord::new();
        let mut es = ArrayD::from_elem(vec![n_f, n_a, 3, n_z], Complex64::new(0.0, 0.0));
        // Distinct per-component values so the norm is non-trivial:
        // components (1, 2i, 2+2i) give |E|^2 = 1 + 4 + 8 = 13.
        for idx in es.indexed_iter_mut() {
            let (dims, value) = idx;
            *value = match dims[2] {
                0 => Complex64::new(1.0, 0.0),
                1 => Complex64::new(0.0, 2.0),
                _ => Complex64::new(2.0, 2.0),
            };
        }
        record.insert("Es", RecordArray::Complex(es));
        record.insert(
            "frequency",
            RecordArray::Real(
                ArrayD::from_shape_vec(vec![n_f], (1..=n_f).map(|i| i as f64 * 1.0e14).collect())
                    .unwrap(),
            ),
        );
        record.insert(
            "theta",
            RecordArray::Real(ArrayD::from_elem(vec![n_a], 0.0)),
        );
        record.insert(
            "z",
            RecordArray::Real(
                ArrayD::from_shape_vec(vec![n_z], (0..n_z).map(|i| i as f64 * 1.0e-8).collect())
                    .unwrap(),
            ),
        );
        record
    }

    #[test]
    fn intensity_sums_squared_magnitudes_over_the_vector_axis() {
        let format = FieldFormat::with_variables(["Es"]);
        let dataset = format.to_dataset(&field_record(2, 2, 5)).unwrap();

        let intensity = dataset["|Es|^2"].values.as_real().unwrap();
        assert_eq!(intensity.shape(), &[2, 2, 5]);
        for v in intensity.iter() {
            assert_relative_eq!(*v, 13.0, max_relative = 1e-12);
        }
        assert_eq!(dataset["|Es|^2"].dims, vec!["frequency", "theta", "z"]);
    }

    #[test]
    fn vector_axis_is_labeled() {
        let format = FieldFormat::with_variables(["Es"]);
        let dataset = format.to_dataset(&field_record(1, 1, 3)).unwrap();
        let vector = dataset.coord("vector").unwrap();
        match &vector.values {
            crate::dataset::CoordValues::Labels(labels) => {
                assert_eq!(labels, &["i", "j", "k"]);
            }
            other => panic!("expected labels, got {other:?}"),
        }
        assert_eq!(dataset["Es"].dims, vec!["frequency", "theta", "vector", "z"]);
    }

    #[test]
    fn wrong_vector_axis_length_is_rejected() {
        let mut record = field_record(2, 2, 4);
        record.insert(
            "Es",
            RecordArray::Complex(ArrayD::from_elem(
                IxDyn(&[2, 2, 2, 4]),
                Complex64::new(1.0, 0.0),
            )),
        );
        let format = FieldFormat::with_variables(["Es"]);
        assert!(matches!(
            format.to_dataset(&record),
            Err(FormatError::AxisLengthMismatch { dim, .. }) if dim == "vector"
        ));
    }

    #[test]
    fn rt_shaped_array_fails_rank_validation() {
        let mut record = field_record(2, 2, 4);
        record.insert(
            "Es",
            RecordArray::Complex(ArrayD::from_elem(IxDyn(&[2, 2]), Complex64::new(1.0, 0.0))),
        );
        let format = FieldFormat::with_variables(["Es"]);
        assert!(matches!(
            format.to_dataset(&record),
            Err(FormatError::RankMismatch { expected: 4, found: 2, .. })
        ));
    }

    #[test]
    fn plain_record_sink_sees_the_same_variables() {
        let format = FieldFormat::with_variables(["Es"]);
        let record = field_record(2, 1, 3);

        let dataset = format.to_dataset(&record).unwrap();
        let mut plain = crate::dataset::PlainRecord::default();
        format.apply(&record, &mut plain).unwrap();

        for name in ["Es", "|Es|^2"] {
            assert_eq!(&dataset[name].values, plain.variables.get(name).unwrap());
        }
        for coord in ["frequency", "theta", "vector", "z", "wavelength"] {
            assert!(plain.coords.contains_key(coord));
        }
    }

    #[test]
    fn real_field_arrays_are_supported() {
        let mut record = field_record(1, 1, 2);
        record.insert(
            "Es",
            RecordArray::Real(ArrayD::from_elem(IxDyn(&[1, 1, 3, 2]), -2.0)),
        );
        let format = FieldFormat::with_variables(["Es"]);
        let dataset = format.to_dataset(&record).unwrap();
        let intensity = dataset["|Es|^2"].values.as_real().unwrap();
        assert_relative_eq!(intensity[[0, 0, 0]], 12.0);
    }
}
