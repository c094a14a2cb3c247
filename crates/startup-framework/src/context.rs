//! # Startup Context
//!
//! The `context` argument handed to every initializer. It ties the work done by a
//! module back to the startup pass: initializers that spawn background tasks should
//! parent their spans on [`StartupContext::span`] so the whole boot shows up as one
//! tree in the logs.

use std::time::{Duration, Instant};
use tracing::{info_span, Span};

/// Shared, read-only context for one startup pass.
#[derive(Clone, Debug)]
pub struct StartupContext {
    span: Span,
    started_at: Instant,
}

impl StartupContext {
    /// Creates a context whose root span is tagged with `scope` (e.g. `"enterprise"`).
    pub fn new(scope: &'static str) -> Self {
        Self {
            span: info_span!("startup", scope),
            started_at: Instant::now(),
        }
    }

    /// The root span of the startup pass.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Time since the pass began.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for StartupContext {
    fn default() -> Self {
        Self::new("default")
    }
}
