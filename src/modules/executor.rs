//! # Executor Queue
//!
//! The final module. It serves every executor queue the other modules registered, so
//! it must run after them and fails if an expected queue is missing.
//!
//! Queue operations are instrumented under the host namespace, component
//! `executorqueue`. File access for executors goes through a [`FilesClient`] over the
//! code intelligence upload store.

use super::{batches, codeintel};
use crate::clients::FilesClient;
use crate::dependencies::Dependencies;
use crate::services::{EnterpriseServices, ExecutorProxy};
use async_trait::async_trait;
use startup_framework::observation::build_operations;
use startup_framework::{BoxError, Initializer, StartupContext};
use tracing::{info, warn};

const REQUIRED_QUEUES: [&str; 2] = [batches::QUEUE, codeintel::QUEUE];

const OPERATIONS: [&str; 4] = ["Dequeue", "AddExecutionLogEntry", "MarkComplete", "Heartbeat"];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExecutorError {
    #[error("executor queue {0:?} was not registered")]
    MissingQueue(&'static str),
}

pub struct Executor;

#[async_trait]
impl Initializer<EnterpriseServices, Dependencies> for Executor {
    async fn init(
        &self,
        _ctx: &StartupContext,
        services: &mut EnterpriseServices,
        deps: &Dependencies,
    ) -> Result<(), BoxError> {
        for queue in REQUIRED_QUEUES {
            if !services.executor_queues.contains_key(queue) {
                return Err(ExecutorError::MissingQueue(queue).into());
            }
        }
        if deps.config.current().executors_access_token.is_none() {
            warn!("No executors access token configured, executor requests will be rejected");
        }

        let operations = build_operations(&deps.observation, "executorqueue", &OPERATIONS)?;
        let files = FilesClient::new(deps.codeintel.upload_store.clone(), &deps.observation)?;

        let queues: Vec<String> = services.executor_queues.keys().cloned().collect();
        info!(?queues, "Serving executor queues");

        services.register_handler("/.executors/queue", "executor queue proxy");
        services.executor_proxy = Some(ExecutorProxy {
            queues,
            operations,
            files,
        });
        Ok(())
    }
}
