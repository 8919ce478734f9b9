use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::event::HeapOccupancy;

/// Grammar family a log was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GcFormat {
    /// Shenandoah `-XX:+PrintGCDetails` output
    Shenandoah,
    /// Not yet committed / undetected
    Unknown,
}

impl GcFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            GcFormat::Shenandoah => "shenandoah",
            GcFormat::Unknown => "unknown",
        }
    }
}

impl Default for GcFormat {
    fn default() -> Self {
        GcFormat::Unknown
    }
}

impl FromStr for GcFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shenandoah" => Ok(GcFormat::Shenandoah),
            "unknown" => Ok(GcFormat::Unknown),
            other => Err(format!("unsupported gc log format: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub format: GcFormat,
    /// Confidence level (0.0 - 1.0)
    pub confidence: f32,
}

impl DetectionResult {
    pub fn new(format: GcFormat, confidence: f32) -> Self {
        Self {
            format,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn no_match() -> Self {
        Self {
            format: GcFormat::Unknown,
            confidence: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.format != GcFormat::Unknown && self.confidence > 0.0
    }

    pub fn is_high_confidence(&self) -> bool {
        self.confidence >= super::HIGH_CONFIDENCE_THRESHOLD
    }
}

/// Fields pulled out of one event line. Absent fields stay absent.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    pub tag: String,
    /// Seconds since VM start
    pub timestamp: f64,
    pub datestamp: Option<DateTime<FixedOffset>>,
    /// Seconds
    pub duration: Option<f64>,
    pub heap: Option<HeapOccupancy>,
}

/// A line the grammar recognized.
#[derive(Debug, Clone, PartialEq)]
pub enum LineMatch {
    Record(FieldRecord),
    /// Banner or heuristics line; produces no event
    Marker,
}

/// Why a line was skipped with a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarningReason {
    #[error("Malformed line: {0}")]
    Malformed(String),

    #[error("Non-UTF8 content")]
    NonUtf8,

    #[error("Line too large: {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),
}

/// A per-line anomaly reported to the warning sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number in the input
    pub line_number: usize,
    pub line: String,
    pub reason: WarningReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("Shenandoah".parse::<GcFormat>(), Ok(GcFormat::Shenandoah));
        assert_eq!(" shenandoah ".parse::<GcFormat>(), Ok(GcFormat::Shenandoah));
        assert!("g1".parse::<GcFormat>().is_err());
    }

    #[test]
    fn test_detection_result_clamps() {
        let result = DetectionResult::new(GcFormat::Shenandoah, 1.7);
        assert_eq!(result.confidence, 1.0);
        assert!(result.is_high_confidence());
        assert!(!DetectionResult::no_match().is_match());
    }

    #[test]
    fn test_warning_reason_display() {
        let reason = WarningReason::LineTooLarge(10, 5);
        assert_eq!(reason.to_string(), "Line too large: 10 bytes (max: 5 bytes)");
    }
}
