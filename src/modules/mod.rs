//! # Enterprise Modules
//!
//! Every subsystem that contributes to [`EnterpriseServices`] at startup, and the table
//! that wires them together. [`executor`] is the final module: it runs after all the
//! others because it serves the queues they register.

pub mod authz;
pub mod batches;
pub mod codeintel;
pub mod executor;
pub mod insights;
pub mod licensing;
pub mod resolvers;

use crate::dependencies::Dependencies;
use crate::services::{EnterpriseServices, QueueOptions};
use resolvers::ResolverModule;
use startup_framework::{ModuleTable, StartupError};

pub const FINAL_MODULE: &str = "executor";

const DEFAULT_MAX_QUEUE_SIZE: usize = 100;

pub type EnterpriseModules = ModuleTable<EnterpriseServices, Dependencies>;

/// The standard module table.
pub fn enterprise_modules() -> Result<EnterpriseModules, StartupError> {
    ModuleTable::new(FINAL_MODULE, executor::Executor)
        .with("app", ResolverModule::new("app").with_route("/.api/app", "app updates"))?
        .with("authz", authz::Authz)?
        .with("batches", batches::Batches)?
        .with("codeintel", codeintel::CodeIntel)?
        .with("codemonitors", ResolverModule::new("codemonitors"))?
        .with(
            "compute",
            ResolverModule::new("compute").with_route("/.api/compute/stream", "compute stream"),
        )?
        .with("dotcom", ResolverModule::new("dotcom"))?
        .with("insights", insights::Insights)?
        .with("licensing", licensing::Licensing)?
        .with("notebooks", ResolverModule::new("notebooks"))?
        .with("searchcontexts", ResolverModule::new("searchcontexts"))
}

fn queue_options(store: &str, deps: &Dependencies) -> QueueOptions {
    QueueOptions {
        store: store.to_string(),
        max_queue_size: deps
            .config
            .current()
            .executor_max_queue_size
            .unwrap_or(DEFAULT_MAX_QUEUE_SIZE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_runs_executor_last() {
        let table = enterprise_modules().unwrap();
        let names: Vec<&str> = table.names().collect();

        assert_eq!(names.len(), 12);
        assert_eq!(names.last(), Some(&FINAL_MODULE));
        assert_eq!(table.final_module(), FINAL_MODULE);
    }

    #[test]
    fn test_table_rejects_second_executor() {
        let err = enterprise_modules()
            .unwrap()
            .with(FINAL_MODULE, executor::Executor)
            .unwrap_err();
        assert!(matches!(err, StartupError::DuplicateModule(name) if name == FINAL_MODULE));
    }
}
