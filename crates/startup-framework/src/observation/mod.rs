//! # Operation Instrumentation
//!
//! Uniform RED metrics and tracing for the named operations of a client component.
//!
//! ## How It Fits Together
//!
//! 1. The host builds one [`ObservationContext`] around an explicit
//!    `prometheus::Registry` and scopes it with a namespace.
//! 2. A client component declares its operations once, at construction time, with
//!    [`OperationSet`] (or [`build_operations`]). This registers **one**
//!    [`RedMetrics`] family for the whole component, keyed by the `op` label.
//! 3. Each call is bracketed with its [`Operation`]: `start()` before the work,
//!    `finish()` after, or [`Operation::observe`] to do both around a future.
//!
//! ```rust
//! use startup_framework::observation::{build_operations, ObservationContext};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let ctx = ObservationContext::default().scoped("apiworker.apiclient");
//! let ops = build_operations(&ctx, "files", &["Exists", "Get"]).unwrap();
//!
//! let exists = ops.get("Exists").unwrap();
//! let found: Result<bool, std::io::Error> = exists.observe(async { Ok(true) }).await;
//! assert!(found.unwrap());
//!
//! assert_eq!(ops.metrics().count(&["Exists"]), 1);
//! assert_eq!(ops.metrics().count(&["Get"]), 0);
//! # }
//! ```
//!
//! Building the same component twice against one registry fails with
//! [`InstrumentationError::AlreadyRegistered`](crate::InstrumentationError::AlreadyRegistered),
//! so a repeated setup can never double count.

mod context;
mod metrics;
mod operation;
mod operations;

pub use context::ObservationContext;
pub use metrics::{RedMetrics, RedMetricsOptions};
pub use operation::{ActiveOperation, Op, Operation};
pub use operations::{build_operations, OperationSet, Operations};
