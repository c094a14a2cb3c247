//! Batch changes: resolver, webhooks and the `batches` executor queue.

use super::queue_options;
use crate::dependencies::Dependencies;
use crate::services::EnterpriseServices;
use async_trait::async_trait;
use startup_framework::{BoxError, Initializer, StartupContext};

pub const QUEUE: &str = "batches";

pub struct Batches;

#[async_trait]
impl Initializer<EnterpriseServices, Dependencies> for Batches {
    async fn init(
        &self,
        _ctx: &StartupContext,
        services: &mut EnterpriseServices,
        deps: &Dependencies,
    ) -> Result<(), BoxError> {
        services.register_resolver("batches");
        services.register_handler("/.api/github-webhooks", "batch changes webhooks");
        services.register_queue(
            QUEUE,
            queue_options("batch_spec_workspace_execution_jobs", deps),
        );
        Ok(())
    }
}
