/// Per-family line grammars and detectors

pub mod shenandoah;

pub use shenandoah::{ShenandoahClassifier, ShenandoahDetector};
