//! Model: ReaderConfig.

use serde::{Deserialize, Serialize};

use crate::parser::{GcFormat, DETECTION_SAMPLE_SIZE, MAX_LINE_SIZE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Skip detection and parse with this family
    pub format: Option<GcFormat>,
    /// Lines sampled from the head of the log for format detection
    pub detection_sample_size: usize,
    /// Longer lines are skipped with a warning
    pub max_line_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            format: None,
            detection_sample_size: DETECTION_SAMPLE_SIZE,
            max_line_size: MAX_LINE_SIZE,
        }
    }
}
