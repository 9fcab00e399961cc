use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Use cases report through this trait so the CLI, tests and any embedding
/// application can observe a run without touching orchestration code.
pub trait PipelineLogger: Send {
    /// Report frame-level progress. `total` is 0 when unknown.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. region count).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Aggregates per-stage timings and metrics and reports them through the
/// `log` facade.
///
/// Progress lines are throttled to one every `throttle_frames` frames.
pub struct LogPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    frames_seen: usize,
    messages: Vec<String>,
}

impl LogPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames_seen;
        let mut lines = vec![format!(
            "Motion summary ({frames} frames, {:.2}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = mean(durations);
            let max_ms = durations.iter().copied().fold(0.0, f64::max);
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:7.2}ms  max {max_ms:7.2}ms  total {total_ms:8.1}ms"
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let values = &self.metrics[name];
            let total: f64 = values.iter().sum();
            lines.push(format!("  {name}: avg {:.1}  total {total:.0}", mean(values)));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(25)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = current;
        if current % self.throttle_frames != 0 && current != total {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processed {current}/{total} frames ({pct:.1}%)");
        } else {
            log::info!("Processed {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("differencing", 5.0);
        logger.metric("regions", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = LogPipelineLogger::new(10);
        logger.timing("differencing", 2.0);
        logger.timing("differencing", 4.0);
        logger.timing("write", 7.5);

        assert_eq!(logger.timings_for("differencing").unwrap(), &[2.0, 4.0]);
        assert_eq!(logger.timings_for("write").unwrap(), &[7.5]);
        assert!(logger.timings_for("annotate").is_none());
    }

    #[test]
    fn test_metric_records_values() {
        let mut logger = LogPipelineLogger::new(10);
        logger.metric("regions", 3.0);
        logger.metric("regions", 4.0);

        let values = logger.metrics_for("regions").unwrap();
        assert_relative_eq!(mean(values), 3.5);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = LogPipelineLogger::new(10);
        logger.progress(10, 10);
        logger.timing("differencing", 1.0);
        logger.timing("write", 3.0);
        logger.metric("regions", 2.0);
        logger.metric("regions", 4.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Motion summary (10 frames"));
        assert!(summary.contains("differencing"));
        assert!(summary.contains("write"));
        assert!(summary.contains("regions: avg 3.0  total 6"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_frames_seen() {
        let mut logger = LogPipelineLogger::new(10);
        for i in 1..=23 {
            logger.progress(i, 0);
        }
        assert_eq!(logger.frames_seen, 23);
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = LogPipelineLogger::new(10);
        logger.info("opened 3 frames");
        assert_eq!(logger.messages, vec!["opened 3 frames".to_string()]);
    }

    #[test]
    fn test_throttle_is_at_least_one() {
        assert_eq!(LogPipelineLogger::new(0).throttle_frames, 1);
        assert_eq!(LogPipelineLogger::default().throttle_frames, 25);
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_relative_eq!(mean(&[]), 0.0);
    }
}
