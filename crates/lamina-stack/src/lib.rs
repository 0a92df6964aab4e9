//! # Lamina STACK engines
//!
//! [`Engine`](lamina_core::engine::Engine) implementations that drive an
//! external "STACK"-style 1D solver through the [`session::StackSession`]
//! boundary trait. The solver session (creation, licensing, teardown) is
//! owned outside this crate; engines hold a shared handle and issue blocking
//! queries against it, one at a time.
//!
//! Three engines cover the query kinds:
//!
//! - [`StackRt`] — reflectance/transmittance spectra.
//! - [`StackField`] — field profiles through the stack, with an optional
//!   sampling [`session::FieldWindow`].
//! - [`StackRtField`] — both in one invocation, returning a fixed-arity-2
//!   output.

pub mod combined;
pub mod field;
pub mod rt;
pub mod session;

pub use combined::StackRtField;
pub use field::StackField;
pub use rt::StackRt;
pub use session::{FieldWindow, SessionError, StackSession};

use lamina_core::engine::{EngineError, RawRecord};

/// Check that a session's record carries every variable the engine
/// guarantees to its callers.
pub(crate) fn ensure_variables(record: &RawRecord, variables: &[&str]) -> Result<(), EngineError> {
    for &variable in variables {
        if !record.contains(variable) {
            return Err(EngineError::MissingVariable {
                variable: variable.to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    //! A scripted in-memory session standing in for a live solver.

    use lamina_core::engine::{RawRecord, RecordArray};
    use lamina_core::spectrum::SPEED_OF_LIGHT;
    use ndarray::{Array1, Array2, ArrayD};
    use num_complex::Complex64;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::session::{FieldWindow, SessionError, StackSession};

    /// Returns deterministic, correctly-shaped records and counts queries.
    #[derive(Default)]
    pub struct MockSession {
        pub rt_queries: AtomicUsize,
        pub field_queries: AtomicUsize,
        /// When set, every query fails with this diagnostic.
        pub failure: Option<String>,
        /// When set, this variable is omitted from RT records.
        pub drop_variable: Option<&'static str>,
    }

    fn coords(record: &mut RawRecord, frequencies: &[f64], angles_deg: &[f64]) {
        record.insert(
            "frequency",
            RecordArray::Real(
                ArrayD::from_shape_vec(vec![frequencies.len()], frequencies.to_vec()).unwrap(),
            ),
        );
        record.insert(
            "lambda",
            RecordArray::Real(
                ArrayD::from_shape_vec(
                    vec![frequencies.len()],
                    frequencies.iter().map(|&f| SPEED_OF_LIGHT / f).collect(),
                )
                .unwrap(),
            ),
        );
        record.insert(
            "theta",
            RecordArray::Real(
                ArrayD::from_shape_vec(vec![angles_deg.len()], angles_deg.to_vec()).unwrap(),
            ),
        );
    }

    impl StackSession for MockSession {
        fn name(&self) -> &str {
            "mock"
        }

        fn stackrt(
            &self,
            index: &Array2<Complex64>,
            thickness: &Array1<f64>,
            frequencies: &[f64],
            angles_deg: &[f64],
        ) -> Result<RawRecord, SessionError> {
            if let Some(diagnostic) = &self.failure {
                return Err(SessionError(diagnostic.clone()));
            }
            assert_eq!(index.nrows(), thickness.len());
            assert_eq!(index.ncols(), frequencies.len());
            self.rt_queries.fetch_add(1, Ordering::SeqCst);

            let shape = vec![frequencies.len(), angles_deg.len()];
            let mut record = RawRecord::new();
            for (offset, name) in ["Rs", "Rp", "Ts", "Tp"].iter().enumerate() {
                if self.drop_variable == Some(name) {
                    continue;
                }
                let value = 0.1 + 0.05 * offset as f64;
                record.insert(*name, RecordArray::Real(ArrayD::from_elem(shape.clone(), value)));
            }
            for name in ["rs", "rp", "ts", "tp"] {
                record.insert(
                    name,
                    RecordArray::Complex(ArrayD::from_elem(
                        shape.clone(),
                        Complex64::new(0.3, 0.1),
                    )),
                );
            }
            coords(&mut record, frequencies, angles_deg);
            Ok(record)
        }

        fn stackfield(
            &self,
            index: &Array2<Complex64>,
            thickness: &Array1<f64>,
            frequencies: &[f64],
            angles_deg: &[f64],
            window: &FieldWindow,
        ) -> Result<RawRecord, SessionError> {
            if let Some(diagnostic) = &self.failure {
                return Err(SessionError(diagnostic.clone()));
            }
            assert_eq!(index.nrows(), thickness.len());
            self.field_queries.fetch_add(1, Ordering::SeqCst);

            let n_z = window.resolution.unwrap_or(100);
            let z_min = window.min.unwrap_or(0.0);
            let z_max = window.max.unwrap_or_else(|| thickness.sum());
            let z: Vec<f64> = (0..n_z)
                .map(|i| z_min + (z_max - z_min) * i as f64 / (n_z.max(2) - 1) as f64)
                .collect();

            let shape = vec![frequencies.len(), angles_deg.len(), 3, n_z];
            let mut record = RawRecord::new();
            for name in ["Es", "Ep", "Hs", "Hp"] {
                record.insert(
                    name,
                    RecordArray::Complex(ArrayD::from_elem(
                        shape.clone(),
                        Complex64::new(1.0, -0.5),
                    )),
                );
            }
            record.insert(
                "z",
                RecordArray::Real(ArrayD::from_shape_vec(vec![n_z], z).unwrap()),
            );
            coords(&mut record, frequencies, angles_deg);
            Ok(record)
        }
    }
}
