//! Code intelligence: upload endpoint and the `codeintel` executor queue.

use super::queue_options;
use crate::dependencies::Dependencies;
use crate::services::EnterpriseServices;
use async_trait::async_trait;
use startup_framework::{BoxError, Initializer, StartupContext};
use tracing::debug;

pub const QUEUE: &str = "codeintel";

pub struct CodeIntel;

#[async_trait]
impl Initializer<EnterpriseServices, Dependencies> for CodeIntel {
    async fn init(
        &self,
        _ctx: &StartupContext,
        services: &mut EnterpriseServices,
        deps: &Dependencies,
    ) -> Result<(), BoxError> {
        services.register_resolver("codeintel");
        services.register_handler(
            "/.api/lsif/upload",
            &format!("uploads into {}", deps.codeintel.upload_bucket),
        );
        services.register_queue(QUEUE, queue_options("lsif_indexes", deps));
        debug!(bucket = %deps.codeintel.upload_bucket, "Upload handler registered");
        Ok(())
    }
}
