//! Event aggregation: the append-only model and its running statistics.

pub mod cycle;
pub mod stats;
pub mod store;
pub mod summary;

pub use cycle::{CycleOutcome, CycleState, CycleTracker};
pub use stats::Stats;
pub use store::GcModel;
pub use summary::{CategorySummary, ModelSummary};
