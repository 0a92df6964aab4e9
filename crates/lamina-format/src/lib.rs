//! Conversion of raw engine records into labeled, axis-aware datasets.
//!
//! Engines hand back flat name → array records; this crate attaches the
//! documented axis semantics to them. [`RtFormat`] handles
//! reflectance/transmittance records (deriving absorptance), [`FieldFormat`]
//! handles field profiles (deriving intensities), and [`DataFormatter`]
//! dispatches between them based on which variables a record carries.
//!
//! Output representations are pluggable through [`DatasetSink`]; the
//! validating [`Dataset`] is the default.

mod coords;
pub mod dataset;
pub mod field;
pub mod formatter;
pub mod rt;

pub use dataset::{Coord, CoordValues, Dataset, DatasetSink, FormatError, PlainRecord, Variable};
pub use field::{FieldFormat, VECTOR_LABELS};
pub use formatter::{detect_kind, DataFormatter, FormattedData, RecordKind};
pub use rt::RtFormat;
