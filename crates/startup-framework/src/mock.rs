//! # Test Doubles
//!
//! Initializers for exercising the orchestrator without real subsystems.
//!
//! | Double | Behavior |
//! |--------|----------|
//! | [`RecordingInitializer`] | Logs its name, optionally mutates the registry, succeeds |
//! | [`FailingInitializer`] | Logs its name, returns an error |
//!
//! Both write into a shared [`CallLog`], so a test can assert on the exact sequence of
//! invocations across a whole pass.
//!
//! ```rust
//! use startup_framework::mock::{CallLog, FailingInitializer, RecordingInitializer};
//! use startup_framework::{orchestrator, ModuleTable, StartupContext};
//!
//! #[tokio::main]
//! async fn main() {
//!     let log = CallLog::default();
//!     let table: ModuleTable<Vec<String>, ()> = ModuleTable::new(
//!         "executor",
//!         RecordingInitializer::new("executor", log.clone()),
//!     )
//!     .with("batches", FailingInitializer::new("batches", log.clone(), "boom"))
//!     .unwrap();
//!
//!     let mut registry = Vec::new();
//!     let result = orchestrator::run(&StartupContext::default(), &mut registry, &(), table).await;
//!
//!     assert!(result.is_err());
//!     assert_eq!(log.calls(), vec!["batches"]);
//! }
//! ```

use crate::context::StartupContext;
use crate::error::BoxError;
use crate::module::Initializer;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Shared record of which initializers ran, in order.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_of(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }
}

type Effect<R> = Box<dyn Fn(&mut R) -> Result<(), BoxError> + Send + Sync>;

/// Succeeds after logging its name and applying an optional effect to the registry.
pub struct RecordingInitializer<R> {
    name: String,
    log: CallLog,
    effect: Option<Effect<R>>,
}

impl<R> RecordingInitializer<R> {
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            log,
            effect: None,
        }
    }

    /// Runs `effect` against the registry when invoked. Its error is returned as-is.
    pub fn with_effect(
        mut self,
        effect: impl Fn(&mut R) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.effect = Some(Box::new(effect));
        self
    }
}

#[async_trait]
impl<R: Send, D: Sync> Initializer<R, D> for RecordingInitializer<R> {
    async fn init(
        &self,
        _ctx: &StartupContext,
        registry: &mut R,
        _deps: &D,
    ) -> Result<(), BoxError> {
        self.log.record(&self.name);
        match &self.effect {
            Some(effect) => effect(registry),
            None => Ok(()),
        }
    }
}

/// Always fails with the configured message.
pub struct FailingInitializer {
    name: String,
    log: CallLog,
    message: String,
}

impl FailingInitializer {
    pub fn new(name: impl Into<String>, log: CallLog, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log,
            message: message.into(),
        }
    }
}

#[async_trait]
impl<R: Send, D: Sync> Initializer<R, D> for FailingInitializer {
    async fn init(
        &self,
        _ctx: &StartupContext,
        _registry: &mut R,
        _deps: &D,
    ) -> Result<(), BoxError> {
        self.log.record(&self.name);
        Err(self.message.clone().into())
    }
}
