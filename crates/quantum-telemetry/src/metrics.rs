//! Prometheus metrics for Quantum-Chain admission.
//!
//! All metrics follow the naming convention: `qc_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., state_commits_total)
//! - **Gauge**: Value that can go up or down (e.g., state_delta_elements)
//! - **Histogram**: Distribution of values (e.g., state_commit_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, GaugeVec, Histogram, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // VALIDATION METRICS
    // =========================================================================

    /// Entity validation results by severity and facility
    pub static ref VALIDATION_RESULTS: CounterVec = CounterVec::new(
        Opts::new("qc_validation_results_total", "Entity validation results"),
        &["severity", "facility"]
    ).expect("metric creation failed");

    /// Entity validation duration
    pub static ref VALIDATION_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "qc_validation_entity_duration_seconds",
            "Time spent validating one entity"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).unwrap())
    ).expect("metric creation failed");

    /// Observer failures while executing notifications
    pub static ref OBSERVER_ERRORS: Counter = Counter::new(
        "qc_validation_observer_errors_total",
        "Total observer errors during execution"
    ).expect("metric creation failed");

    // =========================================================================
    // STATE METRICS
    // =========================================================================

    /// Total deltas committed
    pub static ref STATE_COMMITS: Counter = Counter::new(
        "qc_state_commits_total",
        "Total number of deltas committed to base state"
    ).expect("metric creation failed");

    /// Total deltas discarded
    pub static ref STATE_ROLLBACKS: Counter = Counter::new(
        "qc_state_rollbacks_total",
        "Total number of deltas discarded without commit"
    ).expect("metric creation failed");

    /// Commit duration
    pub static ref STATE_COMMIT_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "qc_state_commit_duration_seconds",
            "Time spent merging a delta into base state"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).unwrap())
    ).expect("metric creation failed");

    /// Elements in the last committed delta
    pub static ref STATE_DELTA_ELEMENTS: GaugeVec = GaugeVec::new(
        Opts::new("qc_state_delta_elements", "Elements in the last committed delta"),
        &["kind"]  // kind: added/removed/copied
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Validation
        Box::new(VALIDATION_RESULTS.clone()),
        Box::new(VALIDATION_DURATION.clone()),
        Box::new(OBSERVER_ERRORS.clone()),
        // State
        Box::new(STATE_COMMITS.clone()),
        Box::new(STATE_ROLLBACKS.clone()),
        Box::new(STATE_COMMIT_DURATION.clone()),
        Box::new(STATE_DELTA_ELEMENTS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
