use std::collections::HashMap;

use super::formats::*;
use super::traits::*;

/// Picks the grammar family for a log from its first lines and hands out
/// the matching classifier.
///
/// Detectors vote per sampled line; lines no detector claims (JVM banners,
/// blank lines, application output) do not vote.
pub struct FormatRegistry {
    detectors: Vec<Box<dyn FormatDetector>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        let detectors: Vec<Box<dyn FormatDetector>> = vec![
            Box::new(ShenandoahDetector),
        ];

        Self { detectors }
    }

    /// Most confident detector verdict for one line.
    pub fn detect_single(&self, sample: &str) -> DetectionResult {
        self.detectors
            .iter()
            .map(|detector| detector.detect(sample))
            .filter(DetectionResult::is_match)
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .unwrap_or_else(DetectionResult::no_match)
    }

    /// The format claimed by the most sampled lines, with the mean
    /// confidence of those lines.
    pub fn detect(&self, samples: &[&str]) -> DetectionResult {
        let mut votes: HashMap<GcFormat, (usize, f32)> = HashMap::new();
        for result in samples.iter().map(|sample| self.detect_single(sample)) {
            if result.is_match() {
                let (lines, confidence) = votes.entry(result.format).or_default();
                *lines += 1;
                *confidence += result.confidence;
            }
        }

        let result = votes
            .into_iter()
            .max_by(|(_, (a_lines, a_conf)), (_, (b_lines, b_conf))| {
                a_lines.cmp(b_lines).then(a_conf.total_cmp(b_conf))
            })
            .map(|(format, (lines, confidence))| {
                DetectionResult::new(format, confidence / lines as f32)
            })
            .unwrap_or_else(DetectionResult::no_match);

        tracing::debug!(
            format = result.format.as_str(),
            confidence = result.confidence,
            sampled = samples.len(),
            "gc log format detection finished"
        );
        result
    }

    /// Classifier for a committed format. `None` for `Unknown`.
    pub fn classifier(&self, format: GcFormat) -> Option<Box<dyn LineClassifier>> {
        match format {
            GcFormat::Shenandoah => Some(Box::new(ShenandoahClassifier)),
            GcFormat::Unknown => None,
        }
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_single_banner() {
        let registry = FormatRegistry::new();
        let result = registry.detect_single("Using Shenandoah");
        assert_eq!(result.format, GcFormat::Shenandoah);
        assert!(result.is_high_confidence());
    }

    #[test]
    fn test_detect_ignores_leading_noise() {
        let registry = FormatRegistry::new();
        let samples = [
            "OpenJDK 64-Bit Server VM (25.71-b00) for linux-amd64",
            "Memory: 4k page, physical 16318008k(5519964k free)",
            "CommandLine flags: -XX:+UseShenandoahGC -XX:+PrintGCDetails",
            "13.976: [Pause Init Mark, 0.630 ms]",
            "13.977: [Concurrent marking 1435M->1447M(2048M), 12.576 ms]",
        ];

        let result = registry.detect(&samples);
        assert_eq!(result.format, GcFormat::Shenandoah);
        assert!(result.confidence > 0.9);
    }

    #[test]
    fn test_confidence_averages_claimed_lines_only() {
        let registry = FormatRegistry::new();
        let samples = [
            "Using Shenandoah",
            "JVM banner",
            "1.000: [Pause Init Mark, 0.500 ms]",
            "1.100: [Pause Init Mark]",
        ];

        let single: Vec<f32> = samples
            .iter()
            .map(|s| registry.detect_single(s))
            .filter(DetectionResult::is_match)
            .map(|r| r.confidence)
            .collect();
        assert_eq!(single.len(), 3);

        let result = registry.detect(&samples);
        assert_eq!(result.format, GcFormat::Shenandoah);
        let expected = single.iter().sum::<f32>() / 3.0;
        assert!((result.confidence - expected).abs() < 1e-6);
    }

    #[test]
    fn test_detect_nothing_recognized() {
        let registry = FormatRegistry::new();
        let samples = ["hello", "world", ""];

        let result = registry.detect(&samples);
        assert_eq!(result.format, GcFormat::Unknown);
        assert!(!result.is_match());
    }

    #[test]
    fn test_detect_empty() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.detect(&[]).format, GcFormat::Unknown);
    }

    #[test]
    fn test_classifier_per_format() {
        let registry = FormatRegistry::new();
        let classifier = registry.classifier(GcFormat::Shenandoah).unwrap();
        assert_eq!(classifier.format(), GcFormat::Shenandoah);
        assert!(registry.classifier(GcFormat::Unknown).is_none());
    }
}
