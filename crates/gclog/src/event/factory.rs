use super::types::TypeTable;
use super::GcEvent;
use crate::parser::model::{FieldRecord, LineMatch};

/// Turns classified lines into events using a family's type table.
pub struct EventFactory {
    table: &'static TypeTable,
}

impl EventFactory {
    pub fn new(table: &'static TypeTable) -> Self {
        Self { table }
    }

    /// At most one event per line. Markers and tags outside the table
    /// yield `None`.
    pub fn create(&self, line: LineMatch) -> Option<GcEvent> {
        match line {
            LineMatch::Record(record) => self.from_record(record),
            LineMatch::Marker => None,
        }
    }

    fn from_record(&self, record: FieldRecord) -> Option<GcEvent> {
        let Some(info) = self.table.lookup(&record.tag) else {
            tracing::debug!(tag = %record.tag, "No event type for tag");
            return None;
        };

        Some(
            GcEvent::new(info.event_type, record.timestamp, record.duration, record.heap)
                .with_datestamp(record.datestamp),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::types::SHENANDOAH_TABLE;
    use crate::event::{Category, GcEventType, Generation, HeapOccupancy};

    fn record(tag: &str, heap: Option<HeapOccupancy>) -> LineMatch {
        LineMatch::Record(FieldRecord {
            tag: tag.to_string(),
            timestamp: 43.948,
            datestamp: None,
            duration: Some(14.289335),
            heap,
        })
    }

    #[test]
    fn test_create_full_pause() {
        let factory = EventFactory::new(&SHENANDOAH_TABLE);
        let heap = HeapOccupancy::new(8133632, 6157312, 8388608);
        let event = factory
            .create(record("Pause Full (Allocation Failure)", Some(heap)))
            .unwrap();

        assert_eq!(event.event_type(), GcEventType::FullAllocationFailure);
        assert_eq!(event.category(), Category::StwFullPause);
        assert_eq!(event.generation(), Generation::All);
        assert_eq!(event.timestamp(), 43.948);
        assert_eq!(event.heap(), Some(&heap));
    }

    #[test]
    fn test_create_keeps_absent_heap() {
        let factory = EventFactory::new(&SHENANDOAH_TABLE);
        let event = factory.create(record("Pause Init Mark", None)).unwrap();
        assert_eq!(event.heap(), None);
        assert_eq!(event.category(), Category::StwPause);
    }

    #[test]
    fn test_zero_heap_is_not_absent() {
        let factory = EventFactory::new(&SHENANDOAH_TABLE);
        let heap = HeapOccupancy::new(0, 0, 0);
        let event = factory.create(record("Concurrent cleanup", Some(heap))).unwrap();
        assert_eq!(event.post_used(), Some(0));
    }

    #[test]
    fn test_marker_yields_nothing() {
        let factory = EventFactory::new(&SHENANDOAH_TABLE);
        assert!(factory.create(LineMatch::Marker).is_none());
    }

    #[test]
    fn test_unknown_tag_yields_nothing() {
        let factory = EventFactory::new(&SHENANDOAH_TABLE);
        assert!(factory.create(record("Pause Young", None)).is_none());
    }
}
