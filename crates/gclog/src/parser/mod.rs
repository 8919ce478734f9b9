/// GC log line classification and format selection
///
/// Converts raw log lines into typed field records for the event factory.
///
/// # Architecture
///
/// - `traits.rs`: Detector and classifier seams, one pair per collector family
/// - `detector.rs`: Format registry that commits a log to one family
/// - `formats/`: Individual family grammars
/// - `warnings.rs`: Injected sink for per-line warnings
/// - `metrics.rs`: Per-read line counters

pub mod traits;
pub mod detector;
pub mod metrics;
pub mod formats;
pub mod model;
pub mod warnings;

pub use traits::{FormatDetector, LineClassifier};
pub use model::{FieldRecord, GcFormat, LineMatch, ParseWarning, WarningReason};
pub use detector::FormatRegistry;
pub use warnings::{CollectingSink, TracingSink, WarningSink};

// Constants
pub const MAX_LINE_SIZE: usize = 65_536;
pub const DETECTION_SAMPLE_SIZE: usize = 20;
pub const HIGH_CONFIDENCE_THRESHOLD: f32 = 0.95;
