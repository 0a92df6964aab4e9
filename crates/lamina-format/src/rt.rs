//! Reflectance/transmittance record converter.

use lamina_core::engine::{RawRecord, RecordArray, RT_VARIABLES};

use crate::coords::{frequency_and_wavelength, required_coord};
use crate::dataset::{Dataset, DatasetSink, FormatError};

const DIMS: [&str; 2] = ["frequency", "theta"];

/// Absorptance is derived per polarization: (reflectance, transmittance,
/// absorptance) name triples.
const ABSORPTANCE: [(&str, &str, &str); 2] = [("Rs", "Ts", "As"), ("Rp", "Tp", "Ap")];

/// Converts an RT record into a labeled representation.
///
/// RT data arrays carry the documented `(frequency, theta)` axis order; rank
/// and axis lengths are validated against the record's coordinates before
/// anything reaches the sink. The `lambda` coordinate is exposed as a
/// `wavelength` labeling of the frequency axis, derived from frequency when
/// the record omits it (and vice versa).
#[derive(Debug, Clone)]
pub struct RtFormat {
    /// Raw variables to pass through, in output order.
    pub variables: Vec<String>,
    /// Derive `As`/`Ap` = 1 − R − T where both inputs are requested.
    pub add_absorptance: bool,
}

impl Default for RtFormat {
    fn default() -> Self {
        Self {
            variables: RT_VARIABLES.iter().map(|&v| v.to_owned()).collect(),
            add_absorptance: true,
        }
    }
}

impl RtFormat {
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

    /// Drive a sink with the labeled content of one RT record.
    pub fn apply<S: DatasetSink>(&self, record: &RawRecord, sink: &mut S) -> Result<(), FormatError> {
        let (frequency, wavelength) = frequency_and_wavelength(record)?;
        let theta = required_coord(record, "theta")?;
        let shape = [frequency.len(), theta.len()];

        sink.add_dim_coord("frequency", frequency.into())?;
        sink.add_dim_coord("theta", theta.into())?;
        sink.add_coord("wavelength", "frequency", wavelength.into())?;

        for name in &self.variables {
            let array = record.get(name).ok_or_else(|| FormatError::MissingVariable {
                variable: name.clone(),
            })?;
            validate_shape(name, array, &shape)?;
            sink.add_variable(name, &DIMS, array.clone())?;
        }

        if self.add_absorptance {
            for (r_name, t_name, a_name) in ABSORPTANCE {
                if !self.requested(r_name) || !self.requested(t_name) {
                    continue;
                }
                // Presence was checked in the pass-through loop above.
                let r = real_variable(record, r_name)?;
                let t = real_variable(record, t_name)?;
                let absorptance = (r + t).mapv(|v| 1.0 - v);
                sink.add_variable(a_name, &DIMS, RecordArray::Real(absorptance))?;
            }
        }

        Ok(())
    }

    /// Convert one RT record into a labeled dataset.
    pub fn to_dataset(&self, record: &RawRecord) -> Result<Dataset, FormatError> {
        let mut dataset = Dataset::new();
        self.apply(record, &mut dataset)?;
        Ok(dataset)
    }

    fn requested(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v == name)
    }
}

fn validate_shape(name: &str, array: &RecordArray, shape: &[usize; 2]) -> Result<(), FormatError> {
    if array.ndim() != 2 {
        return Err(FormatError::RankMismatch {
            variable: name.to_owned(),
            expected: 2,
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

fn real_variable<'a>(
    record: &'a RawRecord,
    name: &str,
) -> Result<&'a ndarray::ArrayD<f64>, FormatError> {
    record
        .get(name)
        .ok_or_else(|| FormatError::MissingVariable {
            variable: name.to_owned(),
        })?
        .as_real()
        .ok_or(FormatError::WrongValueKind {
            variable: name.to_owned(),
            expected: "real",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PlainRecord;
    use approx::assert_relative_eq;
    use ndarray::ArrayD;

    fn rt_record(n_f: usize, n_a: usize) -> RawRecord {
        let mut record = RawRecord::new();
        let shape = vec![n_f, n_a];
        for (i, name) in ["Rs", "Rp", "Ts", "Tp"].iter().enumerate() {
            record.insert(
                *name,
                RecordArray::Real(ArrayD::from_elem(shape.clone(), 0.1 + 0.1 * i as f64)),
            );
        }
        record.insert(
            "frequency",
            RecordArray::Real(
                ArrayD::from_shape_vec(vec![n_f], (1..=n_f).map(|i| i as f64 * 1.0e14).collect())
                    .unwrap(),
            ),
        );
        record.insert(
            "theta",
            RecordArray::Real(
                ArrayD::from_shape_vec(vec![n_a], (0..n_a).map(|i| i as f64 * 15.0).collect())
                    .unwrap(),
            ),
        );
        record
    }

    #[test]
    fn absorptance_is_one_minus_r_minus_t_per_polarization() {
        let format = RtFormat::with_variables(["Rs", "Ts", "Rp", "Tp"]);
        let dataset = format.to_dataset(&rt_record(4, 3)).unwrap();

        // Rs = 0.1, Ts = 0.3 -> As = 0.6; Rp = 0.2, Tp = 0.4 -> Ap = 0.4.
        let a_s = dataset["As"].values.as_real().unwrap();
        let a_p = dataset["Ap"].values.as_real().unwrap();
        for idx in 0..4 {
            for jdx in 0..3 {
                assert_relative_eq!(a_s[[idx, jdx]], 0.6, max_relative = 1e-12);
                assert_relative_eq!(a_p[[idx, jdx]], 0.4, max_relative = 1e-12);
            }
        }
        assert_eq!(dataset["As"].dims, vec!["frequency", "theta"]);
    }

    #[test]
    fn absorptance_needs_both_inputs_requested() {
        let format = RtFormat::with_variables(["Rs"]);
        let dataset = format.to_dataset(&rt_record(2, 2)).unwrap();
        assert!(dataset.contains("Rs"));
        assert!(!dataset.contains("As"));
    }

    #[test]
    fn coordinates_are_labeled_and_wavelength_is_derived() {
        let format = RtFormat::with_variables(["Rs"]);
        let dataset = format.to_dataset(&rt_record(100, 5)).unwrap();

        assert_eq!(dataset.dim_len("frequency"), Some(100));
        assert_eq!(dataset.dim_len("theta"), Some(5));
        assert_eq!(dataset["Rs"].shape(), &[100, 5]);

        let wl = dataset.coord("wavelength").unwrap();
        assert_eq!(wl.dim, "frequency");
        assert_eq!(wl.values.len(), 100);
    }

    #[test]
    fn requested_but_absent_variable_is_an_error() {
        let format = RtFormat::default(); // wants rs/rp/ts/tp too
        assert!(matches!(
            format.to_dataset(&rt_record(2, 2)),
            Err(FormatError::MissingVariable { .. })
        ));
    }

    #[test]
    fn transposed_array_is_rejected() {
        let mut record = rt_record(4, 3);
        record.insert("Rs", RecordArray::Real(ArrayD::from_elem(vec![3, 4], 0.1)));
        let format = RtFormat::with_variables(["Rs"]);
        assert!(matches!(
            format.to_dataset(&record),
            Err(FormatError::AxisLengthMismatch { .. })
        ));
    }

    #[test]
    fn plain_record_sink_sees_the_same_variables() {
        let format = RtFormat::with_variables(["Rs", "Ts"]);
        let record = rt_record(3, 2);

        let dataset = format.to_dataset(&record).unwrap();
        let mut plain = PlainRecord::default();
        format.apply(&record, &mut plain).unwrap();

        for name in ["Rs", "Ts", "As"] {
            assert_eq!(&dataset[name].values, plain.variables.get(name).unwrap());
        }
        assert!(plain.coords.contains_key("wavelength"));
    }
}
