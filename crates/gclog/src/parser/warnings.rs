//! Per-line warning reporting.
//!
//! The reader never decides where warnings go; callers inject a sink.

use super::model::ParseWarning;

/// Receives recognized-but-unusable lines.
pub trait WarningSink {
    fn warn(&mut self, warning: ParseWarning);

    /// Warnings received so far.
    fn count(&self) -> usize;
}

impl<S: WarningSink + ?Sized> WarningSink for &mut S {
    fn warn(&mut self, warning: ParseWarning) {
        (**self).warn(warning)
    }

    fn count(&self) -> usize {
        (**self).count()
    }
}

/// Emits each warning as a `tracing` event and keeps a count.
#[derive(Debug, Default)]
pub struct TracingSink {
    count: usize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: ParseWarning) {
        self.count += 1;
        tracing::warn!(
            line_number = warning.line_number,
            line = %warning.line,
            "Skipping gc log line: {}",
            warning.reason
        );
    }

    fn count(&self) -> usize {
        self.count
    }
}

/// Keeps every warning in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: Vec<ParseWarning>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }
}

impl WarningSink for CollectingSink {
    fn warn(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    fn count(&self) -> usize {
        self.warnings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::model::WarningReason;

    fn warning(n: usize) -> ParseWarning {
        ParseWarning {
            line_number: n,
            line: "1.0: [Pause Final Mark]".to_string(),
            reason: WarningReason::Malformed("missing fields".to_string()),
        }
    }

    #[test]
    fn test_collecting_sink() {
        let mut sink = CollectingSink::new();
        sink.warn(warning(3));
        sink.warn(warning(7));

        assert_eq!(sink.count(), 2);
        assert_eq!(sink.warnings()[1].line_number, 7);
    }

    #[test]
    fn test_tracing_sink_counts() {
        let mut sink = TracingSink::new();
        sink.warn(warning(1));
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn test_borrowed_sink_forwards() {
        fn report<S: WarningSink>(mut sink: S) -> usize {
            sink.warn(warning(1));
            sink.count()
        }

        let mut sink = CollectingSink::new();
        assert_eq!(report(&mut sink), 1);
        assert_eq!(sink.count(), 1);
    }
}
