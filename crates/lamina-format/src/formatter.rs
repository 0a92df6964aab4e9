//! Record-kind dispatch over whole engine outputs.

use lamina_core::engine::{EngineOutput, RawRecord, FIELD_VARIABLES, RT_VARIABLES};

use crate::dataset::{Dataset, DatasetSink, FormatError};
use crate::field::FieldFormat;
use crate::rt::RtFormat;

/// The query kind a raw record answers, inferred from which variables it
/// carries — never from which engine produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    ReflectionTransmission,
    FieldProfile,
}

/// Classify a record by its variable names.
pub fn detect_kind(record: &RawRecord) -> Result<RecordKind, FormatError> {
    if FIELD_VARIABLES.iter().any(|&v| record.contains(v)) {
        return Ok(RecordKind::FieldProfile);
    }
    if RT_VARIABLES.iter().any(|&v| record.contains(v)) {
        return Ok(RecordKind::ReflectionTransmission);
    }
    Err(FormatError::UnknownRecordKind)
}

/// Labeled datasets from one engine invocation, shaped by the output's
/// declared arity.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedData {
    Rt(Dataset),
    Field(Dataset),
    RtField(Dataset, Dataset),
}

impl FormattedData {
    /// The datasets in order, regardless of arity.
    pub fn datasets(&self) -> Vec<&Dataset> {
        match self {
            FormattedData::Rt(d) | FormattedData::Field(d) => vec![d],
            FormattedData::RtField(rt, field) => vec![rt, field],
        }
    }
}

/// Converts raw engine output into labeled datasets.
///
/// Holds one converter per record kind; single records dispatch on the
/// variables present, whole outputs follow their declared arity.
#[derive(Debug, Clone, Default)]
pub struct DataFormatter {
    pub rt: RtFormat,
    pub field: FieldFormat,
}

impl DataFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format a single record, selecting the converter by the variables it
    /// carries.
    pub fn format_record(&self, record: &RawRecord) -> Result<Dataset, FormatError> {
        let mut dataset = Dataset::new();
        self.format_record_into(record, &mut dataset)?;
        Ok(dataset)
    }

    /// Format a single record into an arbitrary sink representation.
    pub fn format_record_into<S: DatasetSink>(
        &self,
        record: &RawRecord,
        sink: &mut S,
    ) -> Result<(), FormatError> {
        let kind = detect_kind(record)?;
        log::debug!("formatting {kind:?} record ({} variables)", record.len());
        match kind {
            RecordKind::ReflectionTransmission => self.rt.apply(record, sink),
            RecordKind::FieldProfile => self.field.apply(record, sink),
        }
    }

    /// Format a whole engine output.
    ///
    /// The output's arity comes from its
    /// [`QueryKind`](lamina_core::engine::QueryKind), so a combined output
    /// always yields an RT dataset and a field dataset, in that order.
    pub fn format(&self, output: &EngineOutput) -> Result<FormattedData, FormatError> {
        match output {
            EngineOutput::Rt(record) => Ok(FormattedData::Rt(self.rt.to_dataset(record)?)),
            EngineOutput::Field(record) => {
                Ok(FormattedData::Field(self.field.to_dataset(record)?))
            }
            EngineOutput::RtField(rt_record, field_record) => Ok(FormattedData::RtField(
                self.rt.to_dataset(rt_record)?,
                self.field.to_dataset(field_record)?,
            )),
        }
    }
}
