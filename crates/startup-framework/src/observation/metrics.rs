//! RED (rate, errors, duration) metric family shared by all operations of a component.

use crate::error::InstrumentationError;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use tracing::warn;

/// Options for [`RedMetrics::new`].
#[derive(Clone, Debug)]
pub struct RedMetricsOptions {
    pub labels: Vec<String>,
    pub count_help: String,
    pub duration_help: String,
    pub errors_help: String,
    pub duration_buckets: Vec<f64>,
}

impl Default for RedMetricsOptions {
    fn default() -> Self {
        Self {
            labels: vec!["op".to_string()],
            count_help: "Total number of method invocations.".to_string(),
            duration_help: "Time in seconds spent performing operations.".to_string(),
            errors_help: "Total number of method invocations that resulted in an error."
                .to_string(),
            duration_buckets: prometheus::DEFAULT_BUCKETS.to_vec(),
        }
    }
}

impl RedMetricsOptions {
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_count_help(mut self, help: impl Into<String>) -> Self {
        self.count_help = help.into();
        self
    }

    pub fn with_duration_buckets(mut self, buckets: Vec<f64>) -> Self {
        self.duration_buckets = buckets;
        self
    }
}

/// One counter/histogram family per component, disambiguated by label values.
///
/// Registers three collectors under `prefix`:
///
/// | Metric | Type |
/// |--------|------|
/// | `<prefix>_total` | counter |
/// | `<prefix>_duration_seconds` | histogram |
/// | `<prefix>_errors_total` | counter |
///
/// The prometheus vectors synchronize internally, so a single family can be
/// incremented from any number of concurrent calls.
#[derive(Clone)]
pub struct RedMetrics {
    prefix: String,
    count: IntCounterVec,
    duration: HistogramVec,
    errors: IntCounterVec,
}

impl RedMetrics {
    /// Creates the family and registers it into `registry`.
    ///
    /// # Errors
    ///
    /// [`InstrumentationError::AlreadyRegistered`] if a family with this prefix already
    /// lives in `registry`. Nothing is left registered on failure.
    pub fn new(
        registry: &Registry,
        prefix: &str,
        opts: RedMetricsOptions,
    ) -> Result<Self, InstrumentationError> {
        let labels: Vec<&str> = opts.labels.iter().map(String::as_str).collect();

        let count = IntCounterVec::new(
            Opts::new(format!("{prefix}_total"), opts.count_help.clone()),
            &labels,
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new(
                format!("{prefix}_duration_seconds"),
                opts.duration_help.clone(),
            )
            .buckets(opts.duration_buckets.clone()),
            &labels,
        )?;
        let errors = IntCounterVec::new(
            Opts::new(format!("{prefix}_errors_total"), opts.errors_help.clone()),
            &labels,
        )?;

        let metrics = Self {
            prefix: prefix.to_string(),
            count,
            duration,
            errors,
        };
        metrics.register(registry)?;
        Ok(metrics)
    }

    fn register(&self, registry: &Registry) -> Result<(), InstrumentationError> {
        let map_err = |e: prometheus::Error| match e {
            prometheus::Error::AlreadyReg => {
                InstrumentationError::AlreadyRegistered(self.prefix.clone())
            }
            other => InstrumentationError::Metrics(other),
        };

        registry
            .register(Box::new(self.count.clone()))
            .map_err(map_err)?;
        if let Err(e) = registry.register(Box::new(self.duration.clone())) {
            let _ = registry.unregister(Box::new(self.count.clone()));
            return Err(map_err(e));
        }
        if let Err(e) = registry.register(Box::new(self.errors.clone())) {
            let _ = registry.unregister(Box::new(self.count.clone()));
            let _ = registry.unregister(Box::new(self.duration.clone()));
            return Err(map_err(e));
        }
        Ok(())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Increments the invocation counter.
    pub fn inc_count(&self, label_values: &[&str]) {
        match self.count.get_metric_with_label_values(label_values) {
            Ok(counter) => counter.inc(),
            Err(e) => warn!(prefix = %self.prefix, error = %e, "count label mismatch"),
        }
    }

    /// Records the duration of a finished call, and an error if it failed.
    pub fn observe(&self, secs: f64, is_error: bool, label_values: &[&str]) {
        match self.duration.get_metric_with_label_values(label_values) {
            Ok(histogram) => histogram.observe(secs),
            Err(e) => warn!(prefix = %self.prefix, error = %e, "duration label mismatch"),
        }
        if is_error {
            match self.errors.get_metric_with_label_values(label_values) {
                Ok(counter) => counter.inc(),
                Err(e) => warn!(prefix = %self.prefix, error = %e, "errors label mismatch"),
            }
        }
    }

    /// Invocations recorded for `label_values`.
    pub fn count(&self, label_values: &[&str]) -> u64 {
        self.count
            .get_metric_with_label_values(label_values)
            .map(|c| c.get())
            .unwrap_or_default()
    }

    /// Failed invocations recorded for `label_values`.
    pub fn errors(&self, label_values: &[&str]) -> u64 {
        self.errors
            .get_metric_with_label_values(label_values)
            .map(|c| c.get())
            .unwrap_or_default()
    }

    /// Finished invocations (successful or not) recorded for `label_values`.
    pub fn observations(&self, label_values: &[&str]) -> u64 {
        self.duration
            .get_metric_with_label_values(label_values)
            .map(|h| h.get_sample_count())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for RedMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedMetrics")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
