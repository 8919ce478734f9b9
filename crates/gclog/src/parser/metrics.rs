use serde::Serialize;

use super::GcFormat;

/// What happened to each input line, for one read.
///
/// Every line lands in exactly one of `events`, `markers`, `unmatched`,
/// `warnings` or `dropped` (a recognized line the factory had no event for).
#[derive(Debug, Default)]
pub struct ParseMetrics {
    format: GcFormat,
    lines_read: u64,
    events: u64,
    markers: u64,
    unmatched: u64,
    warnings: u64,
    dropped: u64,
}

impl ParseMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_format(&mut self, format: GcFormat) {
        self.format = format;
    }

    #[inline]
    pub fn record_line(&mut self) {
        self.lines_read += 1;
    }

    #[inline]
    pub fn record_event(&mut self) {
        self.events += 1;
    }

    #[inline]
    pub fn record_marker(&mut self) {
        self.markers += 1;
    }

    #[inline]
    pub fn record_unmatched(&mut self) {
        self.unmatched += 1;
    }

    #[inline]
    pub fn record_warning(&mut self) {
        self.warnings += 1;
    }

    #[inline]
    pub fn record_dropped(&mut self) {
        self.dropped += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            format: self.format,
            lines_read: self.lines_read,
            events: self.events,
            markers: self.markers,
            unmatched: self.unmatched,
            warnings: self.warnings,
            dropped: self.dropped,
            recognized_rate: if self.lines_read > 0 {
                (self.events + self.markers) as f64 / self.lines_read as f64
            } else {
                1.0
            },
        }
    }
}

/// A read-only copy of [`ParseMetrics`], serializable for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub format: GcFormat,
    pub lines_read: u64,
    pub events: u64,
    pub markers: u64,
    pub unmatched: u64,
    pub warnings: u64,
    pub dropped: u64,
    /// Share of lines that produced an event or marker
    pub recognized_rate: f64,
}
