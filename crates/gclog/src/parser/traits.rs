pub use super::model::{DetectionResult, FieldRecord, GcFormat, LineMatch, WarningReason};
use crate::event::TypeTable;

pub trait FormatDetector: Send + Sync {
    fn detect(&self, sample: &str) -> DetectionResult;
    fn format(&self) -> GcFormat;
}

/// One collector family's line grammar plus its type table.
pub trait LineClassifier: Send + Sync {
    /// Classify one line. `Ok(None)` is silent noise; `Err` is a recognized
    /// line with missing or unparseable fields.
    fn classify(&self, line: &str) -> Result<Option<LineMatch>, WarningReason>;
    fn type_table(&self) -> &'static TypeTable;
    fn format(&self) -> GcFormat;
}
