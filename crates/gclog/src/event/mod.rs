//! Typed collector events and the factory that builds them from matched lines.

pub mod types;
pub mod factory;

pub use types::{Category, GcEventType, Generation, TypeInfo, TypeTable};
pub use factory::EventFactory;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Heap occupancy reported by a single line, in bytes.
///
/// `post_used <= pre_used <= total` holds for well-formed logs but is not
/// enforced; malformed values are carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeapOccupancy {
    pub pre_used: u64,
    pub post_used: u64,
    pub total: u64,
}

impl HeapOccupancy {
    pub fn new(pre_used: u64, post_used: u64, total: u64) -> Self {
        Self { pre_used, post_used, total }
    }

    /// Bytes reclaimed. Negative when the heap grew during the phase;
    /// clamped to the `i64` range.
    pub fn freed(&self) -> i64 {
        let freed = i128::from(self.pre_used) - i128::from(self.post_used);
        i64::try_from(freed).unwrap_or(if freed < 0 { i64::MIN } else { i64::MAX })
    }
}

/// A single collector phase. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GcEvent {
    event_type: GcEventType,
    /// Seconds since VM start
    timestamp: f64,
    /// Absolute time when the log carries date stamps
    datestamp: Option<DateTime<FixedOffset>>,
    /// Seconds
    duration: Option<f64>,
    heap: Option<HeapOccupancy>,
}

impl GcEvent {
    pub fn new(
        event_type: GcEventType,
        timestamp: f64,
        duration: Option<f64>,
        heap: Option<HeapOccupancy>,
    ) -> Self {
        Self {
            event_type,
            timestamp,
            datestamp: None,
            duration,
            heap,
        }
    }

    pub fn with_datestamp(mut self, datestamp: Option<DateTime<FixedOffset>>) -> Self {
        self.datestamp = datestamp;
        self
    }

    pub fn event_type(&self) -> GcEventType {
        self.event_type
    }

    pub fn category(&self) -> Category {
        self.event_type.category()
    }

    pub fn generation(&self) -> Generation {
        self.event_type.generation()
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn datestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.datestamp
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn heap(&self) -> Option<&HeapOccupancy> {
        self.heap.as_ref()
    }

    pub fn pre_used(&self) -> Option<u64> {
        self.heap.map(|h| h.pre_used)
    }

    pub fn post_used(&self) -> Option<u64> {
        self.heap.map(|h| h.post_used)
    }

    pub fn total(&self) -> Option<u64> {
        self.heap.map(|h| h.total)
    }

    pub fn is_stop_the_world(&self) -> bool {
        self.category().is_stop_the_world()
    }

    pub fn is_concurrent(&self) -> bool {
        self.category() == Category::ConcurrentPhase
    }

    /// Timestamp at which the phase finished.
    pub fn end_timestamp(&self) -> f64 {
        self.timestamp + self.duration.unwrap_or(0.0)
    }
}
