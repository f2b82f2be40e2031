//! Observability for the engine
//!
//! Provides:
//! - Prometheus metrics (tracked entries, predictions, prediction latency, run
//!   actions, file operations)
//! - Structured logging of engine events with tracing

use crate::error::ModelError;
use crate::models::{FeatureVector, Label, ManagementAction, RunOutcome};
use crate::predictor::{ModelSource, Predictor};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Histogram buckets for a single prediction (in seconds)
const PREDICTION_LATENCY_BUCKETS: &[f64] = &[0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0];

/// Engine metrics for Prometheus exposition
///
/// Each handle owns its own registry, so several engines (or tests) in one
/// process never collide on metric names.
#[derive(Clone)]
pub struct EngineMetrics {
    registry: Registry,
    entries_tracked: IntGauge,
    predictions_total: IntCounter,
    run_actions_total: IntCounterVec,
    file_operations_total: IntCounterVec,
    prediction_latency_seconds: Histogram,
}

impl EngineMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let entries_tracked = IntGauge::new(
            "dirman_entries_tracked",
            "Number of directory entries currently tracked",
        )?;
        let predictions_total = IntCounter::new(
            "dirman_predictions_total",
            "Total number of classifier predictions made during runs",
        )?;
        let run_actions_total = IntCounterVec::new(
            Opts::new(
                "dirman_run_actions_total",
                "Management actions selected during runs",
            ),
            &["action"],
        )?;
        let file_operations_total = IntCounterVec::new(
            Opts::new(
                "dirman_file_operations_total",
                "File create/remove operations performed",
            ),
            &["operation"],
        )?;
        let prediction_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "dirman_prediction_latency_seconds",
                "Time spent on one classifier prediction",
            )
            .buckets(PREDICTION_LATENCY_BUCKETS.to_vec()),
        )?;

        registry.register(Box::new(entries_tracked.clone()))?;
        registry.register(Box::new(predictions_total.clone()))?;
        registry.register(Box::new(run_actions_total.clone()))?;
        registry.register(Box::new(file_operations_total.clone()))?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        Ok(Self {
            registry,
            entries_tracked,
            predictions_total,
            run_actions_total,
            file_operations_total,
            prediction_latency_seconds,
        })
    }

    pub fn set_entries_tracked(&self, count: usize) {
        self.entries_tracked.set(count as i64);
    }

    /// Record the outcomes of a completed run
    pub fn record_run(&self, outcomes: &[RunOutcome]) {
        self.predictions_total.inc_by(outcomes.len() as u64);
        for outcome in outcomes {
            self.run_actions_total
                .with_label_values(&[outcome.action.as_str()])
                .inc();
        }
    }

    pub fn observe_prediction_latency(&self, seconds: f64) {
        self.prediction_latency_seconds.observe(seconds);
    }

    /// Wrap `inner` so every prediction is timed into this handle
    pub fn timed<'a, P: Predictor + ?Sized>(&'a self, inner: &'a P) -> TimedPredictor<'a, P> {
        TimedPredictor {
            inner,
            metrics: self,
        }
    }

    pub fn inc_file_operation(&self, operation: &str) {
        self.file_operations_total
            .with_label_values(&[operation])
            .inc();
    }

    pub fn predictions_total(&self) -> u64 {
        self.predictions_total.get()
    }

    /// Prometheus text exposition of every metric
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Predictor adapter recording `dirman_prediction_latency_seconds`
pub struct TimedPredictor<'a, P: ?Sized> {
    inner: &'a P,
    metrics: &'a EngineMetrics,
}

impl<P: Predictor + ?Sized> Predictor for TimedPredictor<'_, P> {
    fn predict(&self, features: &FeatureVector) -> Result<Label, ModelError> {
        let start = Instant::now();
        let result = self.inner.predict(features);
        self.metrics
            .observe_prediction_latency(start.elapsed().as_secs_f64());
        result
    }

    fn feature_dimensionality(&self) -> Option<usize> {
        self.inner.feature_dimensionality()
    }
}

/// Structured logger for engine events
///
/// Keeps event names consistent across the model and registry paths.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Log one entry's run outcome; flagged entries are warnings
    pub fn log_run_outcome(&self, outcome: &RunOutcome) {
        match outcome.action {
            ManagementAction::Flag => warn!(
                event = "entry_managed",
                instance = %self.instance,
                entry = %outcome.entry,
                features = ?outcome.features.values(),
                label = outcome.label,
                action = %outcome.action,
                "Entry flagged for attention"
            ),
            ManagementAction::Archive => info!(
                event = "entry_managed",
                instance = %self.instance,
                entry = %outcome.entry,
                features = ?outcome.features.values(),
                label = outcome.label,
                action = %outcome.action,
                "Entry is an archive candidate"
            ),
            ManagementAction::Ignore => debug!(
                event = "entry_managed",
                instance = %self.instance,
                entry = %outcome.entry,
                label = outcome.label,
                action = %outcome.action,
                "Entry ignored"
            ),
        }
    }

    /// Log how the model became ready
    pub fn log_model_ready(&self, source: ModelSource, path: &str, samples: usize) {
        match source {
            ModelSource::Loaded => info!(
                event = "model_ready",
                instance = %self.instance,
                source = "artifact",
                path = %path,
                samples = samples,
                "AI model loaded successfully"
            ),
            ModelSource::Bootstrapped => warn!(
                event = "model_ready",
                instance = %self.instance,
                source = "bootstrap",
                path = %path,
                samples = samples,
                "AI model trained on bootstrap sample and saved"
            ),
        }
    }

    /// Log engine startup
    pub fn log_startup(&self, version: &str, entries: usize) {
        info!(
            event = "engine_started",
            instance = %self.instance,
            engine_version = %version,
            entries = entries,
            "Directory engine started"
        );
    }

    /// Log a command that completed
    pub fn log_command(&self, command: &str, succeeded: bool) {
        if succeeded {
            debug!(event = "command_executed", instance = %self.instance, command = %command, "Command succeeded");
        } else {
            warn!(event = "command_failed", instance = %self.instance, command = %command, "Command failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(action: ManagementAction) -> RunOutcome {
        RunOutcome {
            entry: "/tmp/a".to_string(),
            features: FeatureVector(vec![1.0, 2.0]),
            label: 0,
            action,
        }
    }

    #[test]
    fn test_metrics_are_independent_per_handle() {
        let first = EngineMetrics::new().unwrap();
        let second = EngineMetrics::new().unwrap();

        first.record_run(&[outcome(ManagementAction::Ignore)]);
        assert_eq!(first.predictions_total(), 1);
        assert_eq!(second.predictions_total(), 0);
    }

    #[test]
    fn test_render_contains_recorded_metrics() {
        let metrics = EngineMetrics::new().unwrap();
        metrics.set_entries_tracked(3);
        metrics.record_run(&[
            outcome(ManagementAction::Flag),
            outcome(ManagementAction::Flag),
            outcome(ManagementAction::Ignore),
        ]);
        metrics.inc_file_operation("create");

        let text = metrics.render();
        assert!(text.contains("dirman_entries_tracked 3"));
        assert!(text.contains("dirman_predictions_total 3"));
        assert!(text.contains("dirman_run_actions_total{action=\"flag\"} 2"));
        assert!(text.contains("dirman_file_operations_total{operation=\"create\"} 1"));
    }

    struct FixedPredictor;

    impl Predictor for FixedPredictor {
        fn predict(&self, _features: &FeatureVector) -> Result<Label, ModelError> {
            Ok(1)
        }

        fn feature_dimensionality(&self) -> Option<usize> {
            Some(2)
        }
    }

    #[test]
    fn test_timed_predictor_observes_each_call() {
        let metrics = EngineMetrics::new().unwrap();
        let timed = metrics.timed(&FixedPredictor);
        let features = FeatureVector(vec![1.0, 2.0]);

        assert_eq!(timed.predict(&features).unwrap(), 1);
        assert_eq!(timed.predict(&features).unwrap(), 1);
        assert_eq!(timed.feature_dimensionality(), Some(2));

        let text = metrics.render();
        assert!(
            text.contains("dirman_prediction_latency_seconds_count 2"),
            "render was: {}",
            text
        );
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-instance");
        assert_eq!(logger.instance(), "test-instance");
        logger.log_run_outcome(&outcome(ManagementAction::Archive));
    }
}
