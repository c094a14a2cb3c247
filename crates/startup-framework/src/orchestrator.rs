//! # Module Orchestrator
//!
//! Boots every module of a [`ModuleTable`] into a shared registry in a single,
//! sequential pass.
//!
//! ## Ordering
//!
//! 1. Every regular module is initialized. No order among them is promised.
//! 2. Only once **all** of them have succeeded, the table's final module runs. It may
//!    read whatever the others registered.
//!
//! ## Failure
//!
//! The first error stops the pass: the remaining modules are skipped, the final module
//! never runs, and [`StartupError::Initialization`] is returned with the failing
//! module's name. The orchestrator never exits the process itself; the top-level caller
//! decides what a failed startup means (the host binary exits with a non-zero status).
//!
//! ## Concurrency
//!
//! Initializers run one at a time on the calling task. The registry is handed out as
//! `&mut R`, so no locking is involved; once `run` returns the registry belongs to the
//! caller again.

use crate::context::StartupContext;
use crate::error::StartupError;
use crate::module::{ModuleEntry, ModuleTable};
use std::time::{Duration, Instant};
use tracing::{error, info, info_span, Instrument};

/// Timing of one successfully initialized module.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleTiming {
    pub name: String,
    pub elapsed: Duration,
}

/// Outcome of a successful pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StartupReport {
    pub modules: Vec<ModuleTiming>,
}

impl StartupReport {
    /// Module names in invocation order. The final module is always last.
    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn total(&self) -> Duration {
        self.modules.iter().map(|m| m.elapsed).sum()
    }
}

/// Runs one orchestration pass over `table`.
///
/// # Errors
///
/// [`StartupError::Initialization`] for the first initializer that fails.
pub async fn run<R, D>(
    ctx: &StartupContext,
    registry: &mut R,
    deps: &D,
    table: ModuleTable<R, D>,
) -> Result<StartupReport, StartupError> {
    let (entries, last) = table.into_parts();
    info!(parent: ctx.span(), modules = entries.len(), last = %last.name, "Initializing modules");

    let mut report = StartupReport::default();
    for entry in entries {
        report.modules.push(init_module(ctx, registry, deps, entry).await?);
    }

    // Runs last: it consumes what the others registered.
    report.modules.push(init_module(ctx, registry, deps, last).await?);

    info!(
        parent: ctx.span(),
        modules = report.modules.len(),
        elapsed_ms = ctx.elapsed().as_millis() as u64,
        "Startup complete"
    );
    Ok(report)
}

async fn init_module<R, D>(
    ctx: &StartupContext,
    registry: &mut R,
    deps: &D,
    entry: ModuleEntry<R, D>,
) -> Result<ModuleTiming, StartupError> {
    let span = info_span!(parent: ctx.span(), "module", name = %entry.name);
    let started = Instant::now();

    match entry.init.init(ctx, registry, deps).instrument(span.clone()).await {
        Ok(()) => {
            let elapsed = started.elapsed();
            span.in_scope(|| info!(elapsed_ms = elapsed.as_millis() as u64, "Initialized"));
            Ok(ModuleTiming {
                name: entry.name,
                elapsed,
            })
        }
        Err(source) => {
            span.in_scope(|| error!(name = %entry.name, error = %source, "failed to initialize"));
            Err(StartupError::Initialization {
                module: entry.name,
                source,
            })
        }
    }
}
