use std::collections::BTreeMap;

use super::cycle::{CycleOutcome, CycleTracker};
use super::stats::Stats;
use super::summary::{CategorySummary, ModelSummary};
use crate::error::{GcLogError, GcLogResult};
use crate::event::{Category, GcEvent, GcEventType};
use crate::parser::GcFormat;

/// Append-only event store with statistics kept current on every append.
///
/// No accessor rescans the event list.
#[derive(Debug, Default)]
pub struct GcModel {
    format: GcFormat,
    events: Vec<GcEvent>,

    // Per category: type -> duration stats. Key sets are the distinct types.
    stw_types: BTreeMap<GcEventType, Stats<f64>>,
    full_stw_types: BTreeMap<GcEventType, Stats<f64>>,
    concurrent_types: BTreeMap<GcEventType, Stats<f64>>,

    pause: Stats<f64>,
    stw_pause: Stats<f64>,
    full_stw_pause: Stats<f64>,
    concurrent: Stats<f64>,

    freed_memory: Stats<i64>,
    heap_total: Stats<u64>,
    heap_used_after_stw: Stats<u64>,
    post_cycle_heap_used: Stats<u64>,
    pause_interval: Stats<f64>,

    first_timestamp: Option<f64>,
    last_timestamp: Option<f64>,
    last_pause_timestamp: Option<f64>,

    cycles: CycleTracker,
}

impl GcModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the grammar family. Re-committing the same format is a no-op.
    pub fn commit_format(&mut self, format: GcFormat) -> GcLogResult<()> {
        match self.format {
            GcFormat::Unknown => {
                self.format = format;
                Ok(())
            }
            committed if committed == format => Ok(()),
            committed => Err(GcLogError::FormatAlreadyCommitted {
                committed,
                requested: format,
            }),
        }
    }

    /// `Unknown` until a format is committed.
    pub fn format(&self) -> GcFormat {
        self.format
    }

    pub fn append(&mut self, event: GcEvent) {
        let category = event.category();

        let per_type = self.types_mut(category).entry(event.event_type()).or_default();
        if let Some(duration) = event.duration() {
            per_type.add(duration);
        }

        match category {
            Category::StwPause | Category::StwFullPause => self.record_stop_the_world(&event),
            Category::ConcurrentPhase => {
                if let Some(duration) = event.duration() {
                    self.concurrent.add(duration);
                }
            }
        }

        if self.first_timestamp.is_none() {
            self.first_timestamp = Some(event.timestamp());
        }
        let end = event.end_timestamp();
        if self.last_timestamp.map_or(true, |last| end > last) {
            self.last_timestamp = Some(end);
        }

        if let CycleOutcome::Completed(Some(used)) = self.cycles.observe(&event) {
            self.post_cycle_heap_used.add(used);
        }

        self.events.push(event);
    }

    fn record_stop_the_world(&mut self, event: &GcEvent) {
        if let Some(duration) = event.duration() {
            self.pause.add(duration);
            if event.category() == Category::StwFullPause {
                self.full_stw_pause.add(duration);
            } else {
                self.stw_pause.add(duration);
            }
        }

        if let Some(heap) = event.heap() {
            self.freed_memory.add(heap.freed());
            self.heap_total.add(heap.total);
            self.heap_used_after_stw.add(heap.post_used);
        }

        if let Some(previous) = self.last_pause_timestamp {
            self.pause_interval.add(event.timestamp() - previous);
        }
        self.last_pause_timestamp = Some(event.timestamp());
    }

    fn types_mut(&mut self, category: Category) -> &mut BTreeMap<GcEventType, Stats<f64>> {
        match category {
            Category::StwPause => &mut self.stw_types,
            Category::StwFullPause => &mut self.full_stw_types,
            Category::ConcurrentPhase => &mut self.concurrent_types,
        }
    }

    pub fn size(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> GcLogResult<&GcEvent> {
        self.events.get(index).ok_or(GcLogError::IndexOutOfRange {
            index,
            len: self.events.len(),
        })
    }

    pub fn events(&self) -> &[GcEvent] {
        &self.events
    }

    /// Duration statistics for every type seen in `category`.
    pub fn pause_types(&self, category: Category) -> &BTreeMap<GcEventType, Stats<f64>> {
        match category {
            Category::StwPause => &self.stw_types,
            Category::StwFullPause => &self.full_stw_types,
            Category::ConcurrentPhase => &self.concurrent_types,
        }
    }

    /// Distinct types seen in `category`, in declaration order.
    pub fn distinct_pause_types(&self, category: Category) -> Vec<GcEventType> {
        self.pause_types(category).keys().copied().collect()
    }

    /// Stop-the-world pauses of both kinds. Concurrent phases never count.
    pub fn pause_duration(&self) -> &Stats<f64> {
        &self.pause
    }

    pub fn stw_pause_duration(&self) -> &Stats<f64> {
        &self.stw_pause
    }

    pub fn full_stw_pause_duration(&self) -> &Stats<f64> {
        &self.full_stw_pause
    }

    pub fn concurrent_duration(&self) -> &Stats<f64> {
        &self.concurrent
    }

    /// `pre_used - post_used` of stop-the-world events reporting heap.
    pub fn freed_memory_per_stw_event(&self) -> &Stats<i64> {
        &self.freed_memory
    }

    /// One sample per completed concurrent cycle.
    pub fn post_concurrent_cycle_heap_used(&self) -> &Stats<u64> {
        &self.post_cycle_heap_used
    }

    pub fn heap_total(&self) -> &Stats<u64> {
        &self.heap_total
    }

    pub fn heap_used_after_stw(&self) -> &Stats<u64> {
        &self.heap_used_after_stw
    }

    /// Seconds between the starts of consecutive stop-the-world pauses.
    pub fn pause_interval(&self) -> &Stats<f64> {
        &self.pause_interval
    }

    pub fn first_timestamp(&self) -> Option<f64> {
        self.first_timestamp
    }

    /// Latest end of any event seen.
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    pub fn running_time(&self) -> Option<f64> {
        match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => Some((last - first).max(0.0)),
            _ => None,
        }
    }

    /// Percentage of running time the application was not stopped.
    pub fn throughput(&self) -> Option<f64> {
        self.running_time()
            .filter(|running| *running > 0.0)
            .map(|running| (100.0 * (running - self.pause.sum()) / running).clamp(0.0, 100.0))
    }

    pub fn summary(&self) -> ModelSummary {
        let category = |c: Category, durations: &Stats<f64>| CategorySummary {
            distinct_types: self.distinct_pause_types(c).len(),
            durations: durations.clone(),
            by_type: self.pause_types(c).clone(),
        };

        ModelSummary {
            format: self.format,
            event_count: self.events.len(),
            stw_pause: category(Category::StwPause, &self.stw_pause),
            stw_full_pause: category(Category::StwFullPause, &self.full_stw_pause),
            concurrent_phase: category(Category::ConcurrentPhase, &self.concurrent),
            pause: self.pause.clone(),
            freed_memory_per_stw_event: self.freed_memory.clone(),
            post_concurrent_cycle_heap_used: self.post_cycle_heap_used.clone(),
            heap_total: self.heap_total.clone(),
            heap_used_after_stw: self.heap_used_after_stw.clone(),
            pause_interval: self.pause_interval.clone(),
            first_timestamp: self.first_timestamp,
            last_timestamp: self.last_timestamp,
            running_time: self.running_time(),
            throughput: self.throughput(),
        }
    }
}
