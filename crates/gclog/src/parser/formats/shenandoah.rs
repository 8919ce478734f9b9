use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::event::types::SHENANDOAH_TABLE;
use crate::event::{HeapOccupancy, TypeTable};
use crate::parser::traits::{
    DetectionResult, FieldRecord, FormatDetector, GcFormat, LineClassifier, LineMatch, WarningReason,
};

/// `[<datestamp>: ]<uptime>: [`
const LINE_PREFIX: &str = r"^\s*(?:(?P<date>\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{4}):\s+)?(?P<ts>\d+[.,]\d+):\s+\[";

const DATESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

// Most field-rich shape first.
static HEAP_LINE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"{LINE_PREFIX}(?P<tag>[^\[\]]+?)\s+(?P<pre>\d+)(?P<pre_unit>[BKMG])->(?P<post>\d+)(?P<post_unit>[BKMG])\((?P<total>\d+)(?P<total_unit>[BKMG])\),\s*(?P<ms>\d+[.,]\d+)\s*ms\]"
    ))
});

static DURATION_LINE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(r"{LINE_PREFIX}(?P<tag>[^\[\]]+?),\s*(?P<ms>\d+[.,]\d+)\s*ms\]"))
});

static TAGGED_LINE: Lazy<Regex> = Lazy::new(|| compile(&format!(r"{LINE_PREFIX}(?P<body>.*)$")));

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in gc line pattern: {}", e),
    }
}

/// Banner and heuristics lines. Recognized, never events.
const MARKER_PHRASES: [&str; 9] = [
    "Using Shenandoah",
    "Shenandoah heuristics",
    "Heuristics ergonomically sets",
    "Initialize Shenandoah heap",
    "Cancelling concurrent GC",
    "Capacity:",
    "Periodic GC",
    "Pacer for",
    "Free:",
];

pub struct ShenandoahDetector;

impl FormatDetector for ShenandoahDetector {
    fn detect(&self, sample: &str) -> DetectionResult {
        if sample.contains("Shenandoah") {
            return DetectionResult::new(GcFormat::Shenandoah, 0.95);
        }

        match ShenandoahClassifier.classify(sample) {
            Ok(Some(LineMatch::Record(_))) => DetectionResult::new(GcFormat::Shenandoah, 0.9),
            Err(WarningReason::Malformed(_)) => DetectionResult::new(GcFormat::Shenandoah, 0.5),
            _ => DetectionResult::no_match(),
        }
    }

    fn format(&self) -> GcFormat {
        GcFormat::Shenandoah
    }
}

/// Line grammar for Shenandoah `-XX:+PrintGCDetails` output.
///
/// ```text
/// 13.976: [Pause Init Mark, 0.630 ms]
/// 13.977: [Concurrent marking 1435M->1447M(2048M), 12.576 ms]
/// 43.948: [Pause Full (Allocation Failure)  7943M->6013M(8192M), 14289.335 ms]
/// ```
pub struct ShenandoahClassifier;

impl LineClassifier for ShenandoahClassifier {
    fn classify(&self, line: &str) -> Result<Option<LineMatch>, WarningReason> {
        let line = line.trim_end();
        if line.is_empty() {
            return Ok(None);
        }

        let table = self.type_table();

        if let Some(caps) = HEAP_LINE.captures(line) {
            if table.lookup(&caps["tag"]).is_some() {
                let heap = HeapOccupancy::new(
                    parse_size(&caps["pre"], &caps["pre_unit"])?,
                    parse_size(&caps["post"], &caps["post_unit"])?,
                    parse_size(&caps["total"], &caps["total_unit"])?,
                );
                return record(&caps, Some(heap)).map(|r| Some(LineMatch::Record(r)));
            }
        }

        if let Some(caps) = DURATION_LINE.captures(line) {
            if let Some(info) = table.lookup(&caps["tag"]) {
                if info.requires_heap {
                    return Err(WarningReason::Malformed(format!(
                        "'{}' without heap occupancy",
                        info.tag
                    )));
                }
                return record(&caps, None).map(|r| Some(LineMatch::Record(r)));
            }
        }

        if MARKER_PHRASES.iter().any(|phrase| line.contains(phrase)) {
            return Ok(Some(LineMatch::Marker));
        }

        if let Some(caps) = TAGGED_LINE.captures(line) {
            if let Some(info) = table.lookup_prefix(caps["body"].trim_start()) {
                return Err(WarningReason::Malformed(format!(
                    "'{}' with missing or unreadable fields",
                    info.tag
                )));
            }
        }

        Ok(None)
    }

    fn type_table(&self) -> &'static TypeTable {
        &SHENANDOAH_TABLE
    }

    fn format(&self) -> GcFormat {
        GcFormat::Shenandoah
    }
}

fn record(caps: &Captures<'_>, heap: Option<HeapOccupancy>) -> Result<FieldRecord, WarningReason> {
    let datestamp = caps
        .name("date")
        .map(|m| parse_datestamp(m.as_str()))
        .transpose()?;

    Ok(FieldRecord {
        tag: caps["tag"].trim().to_string(),
        timestamp: parse_decimal(&caps["ts"])?,
        datestamp,
        duration: Some(parse_decimal(&caps["ms"])? / 1000.0),
        heap,
    })
}

/// Accepts `.` or `,` as decimal separator.
fn parse_decimal(text: &str) -> Result<f64, WarningReason> {
    text.replace(',', ".")
        .parse::<f64>()
        .map_err(|_| WarningReason::Malformed(format!("invalid number '{}'", text)))
}

fn parse_datestamp(text: &str) -> Result<DateTime<FixedOffset>, WarningReason> {
    DateTime::parse_from_str(text, DATESTAMP_FORMAT)
        .map_err(|e| WarningReason::Malformed(format!("invalid datestamp '{}': {}", text, e)))
}

/// `"33"` + `"K"` → 33792 bytes
fn parse_size(value: &str, unit: &str) -> Result<u64, WarningReason> {
    let multiplier: u64 = match unit {
        "B" => 1,
        "K" => 1 << 10,
        "M" => 1 << 20,
        "G" => 1 << 30,
        other => {
            return Err(WarningReason::Malformed(format!("unknown size unit '{}'", other)));
        }
    };

    value
        .parse::<u64>()
        .ok()
        .and_then(|v| v.checked_mul(multiplier))
        .ok_or_else(|| WarningReason::Malformed(format!("heap size out of range '{}{}'", value, unit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_of(line: &str) -> FieldRecord {
        match ShenandoahClassifier.classify(line) {
            Ok(Some(LineMatch::Record(record))) => record,
            other => panic!("expected record for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_classify_duration_only() {
        let record = record_of("13.976: [Pause Init Mark, 0.630 ms]");
        assert_eq!(record.tag, "Pause Init Mark");
        assert_eq!(record.timestamp, 13.976);
        assert!((record.duration.unwrap() - 0.000630).abs() < 1e-12);
        assert_eq!(record.heap, None);
        assert_eq!(record.datestamp, None);
    }

    #[test]
    fn test_classify_with_heap() {
        let record = record_of("13.977: [Concurrent marking 1435M->1447M(2048M), 12.576 ms]");
        assert_eq!(record.tag, "Concurrent marking");
        let heap = record.heap.unwrap();
        assert_eq!(heap.pre_used, 1435 * 1024 * 1024);
        assert_eq!(heap.post_used, 1447 * 1024 * 1024);
        assert_eq!(heap.total, 2048 * 1024 * 1024);
    }

    #[test]
    fn test_classify_allocation_failure_double_space() {
        let record =
            record_of("43.948: [Pause Full (Allocation Failure)  7943K->6013K(8192K), 14289.335 ms]");
        assert_eq!(record.tag, "Pause Full (Allocation Failure)");
        assert_eq!(record.heap.unwrap().pre_used, 7943 * 1024);
        assert!((record.duration.unwrap() - 14.289335).abs() < 1e-9);
    }

    #[test]
    fn test_classify_comma_decimal_separator() {
        let record = record_of("1,337: [Pause Full (System.gc()) 10K->1K(128K), 30,125 ms]");
        assert_eq!(record.timestamp, 1.337);
        assert_eq!(record.tag, "Pause Full (System.gc())");
    }

    #[test]
    fn test_classify_with_datestamp() {
        let record =
            record_of("2017-05-10T21:13:46.158+0200: 1.002: [Pause Init Mark, 0.617 ms]");
        assert_eq!(record.timestamp, 1.002);
        let date = record.datestamp.unwrap();
        assert_eq!(date.to_rfc3339(), "2017-05-10T21:13:46.158+02:00");
    }

    #[test]
    fn test_invalid_datestamp_is_malformed() {
        let result =
            ShenandoahClassifier.classify("2017-13-40T21:13:46.158+0200: 1.002: [Pause Init Mark, 0.617 ms]");
        assert!(matches!(result, Err(WarningReason::Malformed(_))));
    }

    #[test]
    fn test_banners_are_markers() {
        for line in [
            "Using Shenandoah",
            "Shenandoah heuristics: passive",
            "Heuristics ergonomically sets -XX:+ExplicitGCInvokesConcurrent",
            "1.500: [Cancelling concurrent GC: Allocation Failure]",
            "Capacity: 262144K, Peak Occupancy: 258973K, Lowest Free: 3171K, Free Threshold: 7864K",
        ] {
            assert_eq!(ShenandoahClassifier.classify(line), Ok(Some(LineMatch::Marker)), "{}", line);
        }
    }

    #[test]
    fn test_noise_is_silent() {
        for line in [
            "",
            "   ",
            "Java HotSpot(TM) 64-Bit Server VM (25.131-b11) for linux-amd64",
            "1.000: [GC (Allocation Failure) 1024K->512K(2048K), 0.001 secs]",
            "1.000: [Pause Young (G1 Evacuation Pause) 24M->4M(256M), 3.000 ms]",
        ] {
            assert_eq!(ShenandoahClassifier.classify(line), Ok(None), "{}", line);
        }
    }

    #[test]
    fn test_missing_duration_is_malformed() {
        let result = ShenandoahClassifier.classify("13.990: [Pause Final Mark 1447M->1446M(2048M)]");
        assert!(matches!(result, Err(WarningReason::Malformed(_))));
    }

    #[test]
    fn test_missing_required_heap_is_malformed() {
        let result = ShenandoahClassifier.classify("13.990: [Pause Final Mark, 0.641 ms]");
        assert!(matches!(result, Err(WarningReason::Malformed(_))));
    }

    #[test]
    fn test_inconsistent_heap_is_forwarded() {
        let record = record_of("2.000: [Pause Final Mark 10K->20K(8K), 0.500 ms]");
        let heap = record.heap.unwrap();
        assert!(heap.post_used > heap.pre_used);
        assert!(heap.pre_used > heap.total);
    }

    #[test]
    fn test_oversized_heap_is_malformed() {
        let result =
            ShenandoahClassifier.classify("2.000: [Pause Final Mark 99999999999999999G->1K(8K), 0.500 ms]");
        assert!(matches!(result, Err(WarningReason::Malformed(_))));
    }

    #[test]
    fn test_parse_size_units() {
        assert_eq!(parse_size("7", "B"), Ok(7));
        assert_eq!(parse_size("33", "K"), Ok(33792));
        assert_eq!(parse_size("2", "G"), Ok(2 * 1024 * 1024 * 1024));
        assert!(parse_size("1", "T").is_err());
    }

    #[test]
    fn test_detect() {
        let detector = ShenandoahDetector;
        assert_eq!(detector.detect("Using Shenandoah").format, GcFormat::Shenandoah);
        assert!(detector.detect("Using Shenandoah").is_high_confidence());
        assert_eq!(
            detector.detect("13.976: [Pause Init Mark, 0.630 ms]").format,
            GcFormat::Shenandoah
        );
        assert_eq!(detector.detect("plain text").format, GcFormat::Unknown);
    }
}
