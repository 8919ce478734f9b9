//! Online detection of completed concurrent cycles.
//!
//! A cycle opens on concurrent marking and closes on the bitmap reset or
//! cleanup phase that follows evacuation. The heap occupancy left behind by
//! the last phase of a closed cycle is the live set after collection. A full
//! or degenerated pause (or an explicit mark cancellation) while a cycle is
//! open means the cycle never finished; it yields no sample.

use crate::event::{Category, GcEvent, GcEventType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleState {
    #[default]
    Idle,
    InCycle {
        /// `post_used` of the latest phase in the cycle that reported heap
        last_post_used: Option<u64>,
    },
}

/// How a single event moved the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing changed, or the cycle is still running
    Continue,
    Started,
    /// Cycle finished normally; carries the heap used after it
    Completed(Option<u64>),
    Abandoned,
}

#[derive(Debug, Default)]
pub struct CycleTracker {
    state: CycleState,
}

impl CycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Feed events strictly in log order.
    pub fn observe(&mut self, event: &GcEvent) -> CycleOutcome {
        let event_type = event.event_type();

        match self.state {
            CycleState::Idle => {
                if starts_cycle(event_type) {
                    self.state = CycleState::InCycle {
                        last_post_used: event.post_used(),
                    };
                    CycleOutcome::Started
                } else {
                    CycleOutcome::Continue
                }
            }
            CycleState::InCycle { last_post_used } => {
                if event.category() == Category::StwFullPause || cancels_cycle(event_type) {
                    self.state = CycleState::Idle;
                    return CycleOutcome::Abandoned;
                }

                if starts_cycle(event_type) {
                    // previous cycle never reached its end marker
                    self.state = CycleState::InCycle {
                        last_post_used: event.post_used(),
                    };
                    return CycleOutcome::Started;
                }

                if !event.is_concurrent() {
                    return CycleOutcome::Continue;
                }

                let last_post_used = event.post_used().or(last_post_used);

                if completes_cycle(event_type) {
                    self.state = CycleState::Idle;
                    CycleOutcome::Completed(last_post_used)
                } else {
                    self.state = CycleState::InCycle { last_post_used };
                    CycleOutcome::Continue
                }
            }
        }
    }
}

fn starts_cycle(event_type: GcEventType) -> bool {
    event_type == GcEventType::ConcurrentMarking
}

fn completes_cycle(event_type: GcEventType) -> bool {
    matches!(
        event_type,
        GcEventType::ConcurrentResetBitmaps | GcEventType::ConcurrentCleanup
    )
}

fn cancels_cycle(event_type: GcEventType) -> bool {
    event_type == GcEventType::CancelConcurrentMark
}
