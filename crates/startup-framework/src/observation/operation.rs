//! Operation handles and the per-call bracket they hand out.

use super::metrics::RedMetrics;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::field::{display, Empty};
use tracing::{info_span, Instrument, Span};

/// Description of an operation, consumed by
/// [`ObservationContext::operation`](super::ObservationContext::operation).
#[derive(Clone, Debug, Default)]
pub struct Op {
    /// Fully-qualified name, used for the trace span.
    pub name: String,
    /// Values selecting this operation's series in `metrics`.
    pub metric_label_values: Vec<String>,
    pub metrics: Option<Arc<RedMetrics>>,
}

/// An immutable, pre-built handle recording metrics and traces for one named operation.
///
/// Cloning is cheap and clones share everything; a handle can be used from any number of
/// concurrent calls.
#[derive(Clone, Debug)]
pub struct Operation {
    inner: Arc<Op>,
}

impl Operation {
    pub(crate) fn new(op: Op) -> Self {
        Self { inner: Arc::new(op) }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn label_values(&self) -> &[String] {
        &self.inner.metric_label_values
    }

    pub fn metrics(&self) -> Option<&Arc<RedMetrics>> {
        self.inner.metrics.as_ref()
    }

    /// Begins one invocation: bumps the invocation counter and opens a span.
    pub fn start(&self) -> ActiveOperation {
        let span = info_span!(
            "operation",
            otel.name = %self.name(),
            op = ?self.label_values(),
            error = Empty
        );
        if let Some(metrics) = self.metrics() {
            metrics.inc_count(&self.label_refs());
        }
        ActiveOperation {
            operation: self.clone(),
            span,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Brackets `fut` with [`start`](Self::start) and [`ActiveOperation::finish`].
    pub async fn observe<F, T, E>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let active = self.start();
        let result = fut.instrument(active.span().clone()).await;
        match &result {
            Ok(_) => active.finish(false),
            Err(e) => active.finish_with_error(e),
        }
        result
    }

    fn label_refs(&self) -> Vec<&str> {
        self.inner
            .metric_label_values
            .iter()
            .map(String::as_str)
            .collect()
    }
}

/// One in-flight invocation of an [`Operation`].
///
/// Dropping it without calling `finish` records the call as failed, which is what
/// happens when the surrounding future is cancelled.
#[derive(Debug)]
pub struct ActiveOperation {
    operation: Operation,
    span: Span,
    started: Instant,
    finished: bool,
}

impl ActiveOperation {
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Records the duration, and an error when `is_error` is set.
    pub fn finish(mut self, is_error: bool) {
        self.record(is_error);
    }

    /// Like [`finish`](Self::finish) for a failed call; also attaches `error` to the span.
    pub fn finish_with_error(mut self, error: &dyn Display) {
        self.span.record("error", display(error));
        self.record(true);
    }

    fn record(&mut self, is_error: bool) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Some(metrics) = self.operation.metrics() {
            metrics.observe(
                self.started.elapsed().as_secs_f64(),
                is_error,
                &self.operation.label_refs(),
            );
        }
    }
}

impl Drop for ActiveOperation {
    fn drop(&mut self) {
        self.record(true);
    }
}
