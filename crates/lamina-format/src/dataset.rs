//! Labeled, axis-aware dataset container and the sink abstraction.
//!
//! A [`Dataset`] binds each variable's array to named dimensions with
//! coordinate values, validating rank and axis lengths on insertion so a
//! mislabeled axis is an error rather than shape-compatible nonsense.
//!
//! The converters in this crate drive the [`DatasetSink`] trait instead of
//! `Dataset` directly, so target representations are pluggable: the labeled
//! dataset and the flat [`PlainRecord`] mapping ship here, and new adapters
//! can be added without touching any numeric logic.

use std::collections::BTreeMap;

use lamina_core::engine::RecordArray;
use thiserror::Error;

/// Errors from inconsistencies between raw arrays and their axis contracts.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Variable '{variable}' has rank {found} but its kind requires rank {expected}")]
    RankMismatch {
        variable: String,
        expected: usize,
        found: usize,
    },

    #[error("Axis '{dim}' of variable '{variable}' has length {found}, expected {expected}")]
    AxisLengthMismatch {
        variable: String,
        dim: String,
        expected: usize,
        found: usize,
    },

    #[error("Variable '{variable}' references unknown dimension '{dim}'")]
    UnknownDimension { variable: String, dim: String },

    #[error("Dimension '{0}' is already defined with different coordinate values")]
    DimensionConflict(String),

    #[error("Variable '{variable}' was requested but is missing from the record")]
    MissingVariable { variable: String },

    #[error("Coordinate '{coord}' is missing from the record and cannot be derived")]
    MissingCoordinate { coord: String },

    #[error("Variable '{variable}' must be {expected}-valued for this operation")]
    WrongValueKind {
        variable: String,
        expected: &'static str,
    },

    #[error("Record variables match neither a reflection/transmission nor a field query")]
    UnknownRecordKind,
}

/// Values along one coordinate axis.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValues {
    Numeric(Vec<f64>),
    Labels(Vec<String>),
}

impl CoordValues {
    pub fn len(&self) -> usize {
        match self {
            CoordValues::Numeric(v) => v.len(),
            CoordValues::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            CoordValues::Numeric(v) => Some(v),
            CoordValues::Labels(_) => None,
        }
    }
}

impl From<Vec<f64>> for CoordValues {
    fn from(values: Vec<f64>) -> Self {
        CoordValues::Numeric(values)
    }
}

impl From<Vec<&str>> for CoordValues {
    fn from(labels: Vec<&str>) -> Self {
        CoordValues::Labels(labels.iter().map(|s| s.to_string()).collect())
    }
}

/// Target representation for formatted output.
///
/// A dimension coordinate (`add_dim_coord`) introduces a named axis together
/// with its values; a non-dimension coordinate (`add_coord`) attaches an
/// alternative labeling to an existing axis (e.g. `wavelength` on the
/// `frequency` axis); `add_variable` binds an array to named axes.
pub trait DatasetSink {
    fn add_dim_coord(&mut self, name: &str, values: CoordValues) -> Result<(), FormatError>;

    fn add_coord(&mut self, name: &str, dim: &str, values: CoordValues) -> Result<(), FormatError>;

    fn add_variable(
        &mut self,
        name: &str,
        dims: &[&str],
        values: RecordArray,
    ) -> Result<(), FormatError>;
}

/// A coordinate: values along a named dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Coord {
    pub name: String,
    /// The dimension this coordinate labels. Equal to `name` for dimension
    /// coordinates.
    pub dim: String,
    pub values: CoordValues,
}

/// A named array bound to named dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub dims: Vec<String>,
    pub values: RecordArray,
}

impl Variable {
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }
}

/// A labeled, axis-aware dataset: the default output representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    dims: Vec<(String, usize)>,
    coords: Vec<Coord>,
    variables: Vec<Variable>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered (name, length) pairs of the dataset's dimensions.
    pub fn dims(&self) -> &[(String, usize)] {
        &self.dims
    }

    pub fn dim_len(&self, name: &str) -> Option<usize> {
        self.dims.iter().find(|(n, _)| n == name).map(|&(_, l)| l)
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn coord(&self, name: &str) -> Option<&Coord> {
        self.coords.iter().find(|c| c.name == name)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }
}

impl std::ops::Index<&str> for Dataset {
    type Output = Variable;

    fn index(&self, name: &str) -> &Variable {
        self.get(name)
            .unwrap_or_else(|| panic!("no variable '{name}' in dataset"))
    }
}

impl DatasetSink for Dataset {
    fn add_dim_coord(&mut self, name: &str, values: CoordValues) -> Result<(), FormatError> {
        if let Some(existing) = self.coord(name) {
            if existing.values != values {
                return Err(FormatError::DimensionConflict(name.to_owned()));
            }
            return Ok(());
        }
        self.dims.push((name.to_owned(), values.len()));
        self.coords.push(Coord {
            name: name.to_owned(),
            dim: name.to_owned(),
            values,
        });
        Ok(())
    }

    fn add_coord(&mut self, name: &str, dim: &str, values: CoordValues) -> Result<(), FormatError> {
        let Some(len) = self.dim_len(dim) else {
            return Err(FormatError::UnknownDimension {
                variable: name.to_owned(),
                dim: dim.to_owned(),
            });
        };
        if values.len() != len {
            return Err(FormatError::AxisLengthMismatch {
                variable: name.to_owned(),
                dim: dim.to_owned(),
                expected: len,
                found: values.len(),
            });
        }
        self.coords.push(Coord {
            name: name.to_owned(),
            dim: dim.to_owned(),
            values,
        });
        Ok(())
    }

    fn add_variable(
        &mut self,
        name: &str,
        dims: &[&str],
        values: RecordArray,
    ) -> Result<(), FormatError> {
        if values.ndim() != dims.len() {
            return Err(FormatError::RankMismatch {
                variable: name.to_owned(),
                expected: dims.len(),
                found: values.ndim(),
            });
        }
        for (axis, &dim) in dims.iter().enumerate() {
            let Some(len) = self.dim_len(dim) else {
                return Err(FormatError::UnknownDimension {
                    variable: name.to_owned(),
                    dim: dim.to_owned(),
                });
            };
            let found = values.shape()[axis];
            if found != len {
                return Err(FormatError::AxisLengthMismatch {
                    variable: name.to_owned(),
                    dim: dim.to_owned(),
                    expected: len,
                    found,
                });
            }
        }
        self.variables.push(Variable {
            name: name.to_owned(),
            dims: dims.iter().map(|&d| d.to_owned()).collect(),
            values,
        });
        Ok(())
    }
}

/// A flat name → array representation: coordinates and variables in plain
/// maps, axis labels dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlainRecord {
    pub coords: BTreeMap<String, CoordValues>,
    pub variables: BTreeMap<String, RecordArray>,
}

impl DatasetSink for PlainRecord {
    fn add_dim_coord(&mut self, name: &str, values: CoordValues) -> Result<(), FormatError> {
        self.coords.insert(name.to_owned(), values);
        Ok(())
    }

    fn add_coord(&mut self, name: &str, _dim: &str, values: CoordValues) -> Result<(), FormatError> {
        self.coords.insert(name.to_owned(), values);
        Ok(())
    }

    fn add_variable(
        &mut self,
        name: &str,
        _dims: &[&str],
        values: RecordArray,
    ) -> Result<(), FormatError> {
        self.variables.insert(name.to_owned(), values);
        Ok(())
    }
}
