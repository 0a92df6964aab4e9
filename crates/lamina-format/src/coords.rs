//! Coordinate extraction from raw records.

use lamina_core::engine::RawRecord;
use lamina_core::spectrum::convert_all;

use crate::dataset::FormatError;

/// Pull a rank-1 real coordinate variable out of a record.
fn coord_values(record: &RawRecord, name: &str) -> Result<Option<Vec<f64>>, FormatError> {
    let Some(array) = record.get(name) else {
        return Ok(None);
    };
    if array.ndim() != 1 {
        return Err(FormatError::RankMismatch {
            variable: name.to_owned(),
            expected: 1,
            found: array.ndim(),
        });
    }
    let values = array.as_real().ok_or(FormatError::WrongValueKind {
        variable: name.to_owned(),
        expected: "real",
    })?;
    Ok(Some(values.iter().copied().collect()))
}

/// A rank-1 real coordinate that must be present.
pub(crate) fn required_coord(record: &RawRecord, name: &str) -> Result<Vec<f64>, FormatError> {
    coord_values(record, name)?.ok_or_else(|| FormatError::MissingCoordinate {
        coord: name.to_owned(),
    })
}

/// Resolve the spectral coordinates of a record.
///
/// Frequency and wavelength are inversely related, so either one present in
/// the record yields both; a record carrying neither cannot be labeled.
pub(crate) fn frequency_and_wavelength(
    record: &RawRecord,
) -> Result<(Vec<f64>, Vec<f64>), FormatError> {
    let frequency = coord_values(record, "frequency")?;
    let lambda = coord_values(record, "lambda")?;
    match (frequency, lambda) {
        (Some(f), Some(wl)) => Ok((f, wl)),
        (Some(f), None) => {
            let wl = convert_all(&f);
            Ok((f, wl))
        }
        (None, Some(wl)) => {
            let f = convert_all(&wl);
            Ok((f, wl))
        }
        (None, None) => Err(FormatError::MissingCoordinate {
            coord: "frequency".to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lamina_core::engine::RecordArray;
    use lamina_core::spectrum::SPEED_OF_LIGHT;
    use ndarray::ArrayD;

    fn record_with(name: &str, values: Vec<f64>) -> RawRecord {
        let mut record = RawRecord::new();
        let len = values.len();
        record.insert(
            name,
            RecordArray::Real(ArrayD::from_shape_vec(vec![len], values).unwrap()),
        );
        record
    }

    #[test]
    fn wavelength_derives_from_frequency() {
        let record = record_with("frequency", vec![SPEED_OF_LIGHT, SPEED_OF_LIGHT / 2.0]);
        let (f, wl) = frequency_and_wavelength(&record).unwrap();
        assert_eq!(f.len(), 2);
        assert_relative_eq!(wl[0], 1.0);
        assert_relative_eq!(wl[1], 2.0);
    }

    #[test]
    fn frequency_derives_from_wavelength() {
        let record = record_with("lambda", vec![1.0e-6]);
        let (f, wl) = frequency_and_wavelength(&record).unwrap();
        assert_relative_eq!(f[0], SPEED_OF_LIGHT / 1.0e-6);
        assert_relative_eq!(wl[0], 1.0e-6);
    }

    #[test]
    fn neither_spectral_coordinate_is_an_error() {
        let record = record_with("theta", vec![0.0]);
        assert!(matches!(
            frequency_and_wavelength(&record),
            Err(FormatError::MissingCoordinate { coord }) if coord == "frequency"
        ));
    }

    #[test]
    fn higher_rank_coordinate_is_rejected() {
        let mut record = RawRecord::new();
        record.insert(
            "frequency",
            RecordArray::Real(ArrayD::from_elem(vec![2, 1], 1.0)),
        );
        assert!(matches!(
            frequency_and_wavelength(&record),
            Err(FormatError::RankMismatch { expected: 1, found: 2, .. })
        ));
    }
}
