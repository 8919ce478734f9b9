//! Drives one log through detection, classification and aggregation.
//!
//! Lines are handled strictly in input order; every event is appended to
//! the model before the next line is read.

use std::io::{self, BufRead, Read};

use tracing::{debug, info};

use crate::conf::ReaderConfig;
use crate::error::{GcLogError, GcLogResult};
use crate::event::EventFactory;
use crate::model::GcModel;
use crate::parser::metrics::{MetricsSnapshot, ParseMetrics};
use crate::parser::{
    FormatRegistry, GcFormat, LineClassifier, LineMatch, ParseWarning, WarningReason, WarningSink,
};

/// Longest prefix of an offending line kept in a warning.
const WARNING_EXCERPT_LEN: usize = 256;

pub struct GcLogReader<S: WarningSink> {
    config: ReaderConfig,
    registry: FormatRegistry,
    sink: S,
    metrics: ParseMetrics,
}

impl<S: WarningSink> GcLogReader<S> {
    pub fn new(config: ReaderConfig, sink: S) -> Self {
        Self {
            config,
            registry: FormatRegistry::new(),
            sink,
            metrics: ParseMetrics::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Counters for the most recent read.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn read_str(&mut self, text: &str) -> GcLogResult<GcModel> {
        self.read(text.as_bytes())
    }

    /// Parse a whole log. Only I/O failures and an undetectable format are
    /// errors; bad lines go to the warning sink.
    pub fn read<R: BufRead>(&mut self, mut input: R) -> GcLogResult<GcModel> {
        self.metrics = ParseMetrics::new();
        let mut model = GcModel::new();

        // Sample the head of the log before committing to a grammar.
        let max_line_size = self.config.max_line_size;
        let mut head: Vec<RawLine> = Vec::new();
        while head.len() < self.config.detection_sample_size {
            match next_line(&mut input, max_line_size)? {
                Some(line) => head.push(line),
                None => break,
            }
        }

        if head.is_empty() {
            info!("Empty gc log, nothing to parse");
            return Ok(model);
        }

        let format = match self.config.format {
            Some(format) => format,
            None => self.detect(&head),
        };
        let classifier = self
            .registry
            .classifier(format)
            .ok_or(GcLogError::UnrecognizedFormat(head.len()))?;

        model.commit_format(format)?;
        self.metrics.record_format(format);
        info!(format = format.as_str(), "Parsing gc log");

        let factory = EventFactory::new(classifier.type_table());
        let mut line_number = 0;

        for line in &head {
            line_number += 1;
            self.process_line(line_number, line, classifier.as_ref(), &factory, &mut model);
        }
        drop(head);

        while let Some(line) = next_line(&mut input, max_line_size)? {
            line_number += 1;
            self.process_line(line_number, &line, classifier.as_ref(), &factory, &mut model);
        }

        let snapshot = self.metrics.snapshot();
        info!(
            events = snapshot.events,
            warnings = snapshot.warnings,
            lines = snapshot.lines_read,
            "Finished parsing gc log"
        );

        Ok(model)
    }

    fn detect(&self, head: &[RawLine]) -> GcFormat {
        let samples: Vec<&str> = head
            .iter()
            .filter_map(|line| std::str::from_utf8(&line.bytes).ok())
            .map(str::trim_end)
            .collect();

        self.registry.detect(&samples).format
    }

    fn process_line(
        &mut self,
        line_number: usize,
        line: &RawLine,
        classifier: &dyn LineClassifier,
        factory: &EventFactory,
        model: &mut GcModel,
    ) {
        self.metrics.record_line();
        let raw = line.bytes.as_slice();

        if line.len > self.config.max_line_size {
            let reason = WarningReason::LineTooLarge(line.len, self.config.max_line_size);
            self.warn(line_number, raw, reason);
            return;
        }

        let text = match std::str::from_utf8(raw) {
            Ok(text) => text,
            Err(_) => {
                self.warn(line_number, raw, WarningReason::NonUtf8);
                return;
            }
        };

        match classifier.classify(text) {
            Ok(None) => self.metrics.record_unmatched(),
            Ok(Some(line)) => {
                let is_marker = line == LineMatch::Marker;
                match factory.create(line) {
                    Some(event) => {
                        model.append(event);
                        self.metrics.record_event();
                    }
                    None if is_marker => self.metrics.record_marker(),
                    None => {
                        debug!(line_number, "Recognized line produced no event");
                        self.metrics.record_dropped();
                    }
                }
            }
            Err(reason) => self.warn(line_number, raw, reason),
        }
    }

    fn warn(&mut self, line_number: usize, raw: &[u8], reason: WarningReason) {
        self.metrics.record_warning();
        let excerpt = &raw[..raw.len().min(WARNING_EXCERPT_LEN)];
        self.sink.warn(ParseWarning {
            line_number,
            line: String::from_utf8_lossy(excerpt).into_owned(),
            reason,
        });
    }
}

/// One input line without its terminator.
struct RawLine {
    /// At most `max_line_size + 1` bytes of the line
    bytes: Vec<u8>,
    /// Full length of the line, including any bytes not kept
    len: usize,
}

/// Next line, `None` at end of input. Lines longer than `max_line_size`
/// are truncated and the remainder is consumed without buffering.
fn next_line<R: BufRead>(input: &mut R, max_line_size: usize) -> GcLogResult<Option<RawLine>> {
    let limit = max_line_size.saturating_add(1);
    let mut bytes = Vec::new();
    let read = input
        .by_ref()
        .take(limit as u64)
        .read_until(b'\n', &mut bytes)?;
    if read == 0 {
        return Ok(None);
    }

    let skipped = if read == limit && bytes.last() != Some(&b'\n') {
        skip_line(input)?
    } else {
        0
    };

    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    let len = bytes.len() + skipped;
    Ok(Some(RawLine { bytes, len }))
}

/// Consume the rest of the current line; returns the content bytes dropped,
/// terminator excluded.
fn skip_line<R: BufRead>(input: &mut R) -> io::Result<usize> {
    let mut skipped = 0;
    let mut pending_cr = false;
    loop {
        let available = input.fill_buf()?;
        if available.is_empty() {
            return Ok(skipped);
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(idx) => {
                let cr = if idx > 0 { available[idx - 1] == b'\r' } else { pending_cr };
                input.consume(idx + 1);
                return Ok(skipped + idx - usize::from(cr));
            }
            None => {
                let consumed = available.len();
                pending_cr = available[consumed - 1] == b'\r';
                input.consume(consumed);
                skipped += consumed;
            }
        }
    }
}
