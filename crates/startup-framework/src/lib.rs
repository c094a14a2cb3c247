//! # Startup Framework
//!
//! Building blocks for booting a process out of independently developed modules, and
//! for instrumenting the client components those modules hand out.
//!
//! ## Two Mechanisms
//!
//! ### Module orchestration
//!
//! A process is assembled from *modules* (auth, batches, code intelligence, ...). Each
//! one contributes capabilities to a shared **service registry** during a single startup
//! pass. The framework separates three concerns:
//!
//! 1. **Contract** ([`Initializer`]): what a module must provide
//! 2. **Table** ([`ModuleTable`]): which modules exist, plus the one that must run last
//! 3. **Pass** ([`orchestrator::run`]): sequential, fail-fast initialization
//!
//! The *final* module exists because some capabilities are assembled from what other
//! modules registered (an executor proxy serving the queues registered by batches and
//! code intelligence, for instance). The table makes that produce-then-consume
//! dependency structural instead of relying on per-module dependency declarations.
//!
//! ### Operation instrumentation
//!
//! A client component declares its operation names once; the [`observation`] module
//! turns them into pre-built [`Operation`] handles sharing one RED (rate, errors,
//! duration) metric family and opening one tracing span per call.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use startup_framework::{orchestrator, BoxError, Initializer, ModuleTable, StartupContext};
//!
//! #[derive(Default, Debug)]
//! struct Services { queues: Vec<String>, proxy: Option<Vec<String>> }
//! struct Deps { region: &'static str }
//!
//! struct Batches;
//! #[async_trait]
//! impl Initializer<Services, Deps> for Batches {
//!     async fn init(&self, _: &StartupContext, s: &mut Services, _: &Deps) -> Result<(), BoxError> {
//!         s.queues.push("batches".into());
//!         Ok(())
//!     }
//! }
//!
//! struct Executor;
//! #[async_trait]
//! impl Initializer<Services, Deps> for Executor {
//!     async fn init(&self, _: &StartupContext, s: &mut Services, _: &Deps) -> Result<(), BoxError> {
//!         s.proxy = Some(s.queues.clone());
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table: ModuleTable<Services, Deps> =
//!         ModuleTable::new("executor", Executor).with("batches", Batches)?;
//!
//!     let mut services = Services::default();
//!     let deps = Deps { region: "eu" };
//!     orchestrator::run(&StartupContext::new("demo"), &mut services, &deps, table).await?;
//!
//!     assert_eq!(services.proxy, Some(vec!["batches".to_string()]));
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Model
//!
//! Every error here is a startup error ([`StartupError`]). The framework never exits
//! the process; it returns the first failure to the single top-level caller, which is
//! expected to log it and terminate.
//!
//! ## Testing
//!
//! The [`mock`] module provides recording and failing initializers that log into a
//! shared call log, so ordering and fail-fast behavior can be asserted directly.

pub mod context;
pub mod error;
pub mod mock;
pub mod module;
pub mod observation;
pub mod orchestrator;
pub mod tracing;

// Re-export core types for convenience
pub use context::StartupContext;
pub use error::{BoxError, InstrumentationError, StartupError};
pub use module::{Initializer, ModuleEntry, ModuleTable};
pub use observation::{ObservationContext, Operation, Operations};
pub use orchestrator::{ModuleTiming, StartupReport};
