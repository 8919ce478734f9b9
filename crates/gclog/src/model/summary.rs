use serde::Serialize;
use std::collections::BTreeMap;

use super::stats::Stats;
use crate::event::GcEventType;
use crate::parser::GcFormat;

/// Statistics for one event category.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub distinct_types: usize,
    pub durations: Stats<f64>,
    pub by_type: BTreeMap<GcEventType, Stats<f64>>,
}

/// A serializable copy of every statistic a [`super::GcModel`] keeps.
///
/// Durations are seconds, sizes are bytes.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub format: GcFormat,
    pub event_count: usize,

    pub stw_pause: CategorySummary,
    pub stw_full_pause: CategorySummary,
    pub concurrent_phase: CategorySummary,

    /// Both stop-the-world categories together
    pub pause: Stats<f64>,
    pub freed_memory_per_stw_event: Stats<i64>,
    pub post_concurrent_cycle_heap_used: Stats<u64>,
    pub heap_total: Stats<u64>,
    pub heap_used_after_stw: Stats<u64>,
    pub pause_interval: Stats<f64>,

    pub first_timestamp: Option<f64>,
    pub last_timestamp: Option<f64>,
    pub running_time: Option<f64>,
    /// Percent of running time outside stop-the-world pauses
    pub throughput: Option<f64>,
}
