//! # Enterprise Services
//!
//! The shared registry that modules populate during startup. It starts out as
//! [`EnterpriseServices::default`], each module adds its own capabilities, and after
//! the pass the host freezes it behind an `Arc`.

use crate::clients::FilesClient;
use crate::dependencies::BlobStore;
use startup_framework::Operations;
use std::collections::{BTreeMap, BTreeSet};

/// How an executor queue is served.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueOptions {
    /// Name of the store the queue's jobs are read from.
    pub store: String,
    pub max_queue_size: usize,
}

/// Licensed plan, parsed from the site configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseInfo {
    pub plan: String,
    pub max_users: u32,
}

/// Serves executor queues registered by other modules. Built by the final module.
#[derive(Debug, Clone)]
pub struct ExecutorProxy {
    pub queues: Vec<String>,
    pub operations: Operations,
    pub files: FilesClient<BlobStore>,
}

#[derive(Debug, Default)]
pub struct EnterpriseServices {
    /// GraphQL resolvers, by module name.
    pub resolvers: BTreeSet<String>,
    /// HTTP handlers, route to description.
    pub handlers: BTreeMap<String, String>,
    pub auth_providers: Vec<String>,
    pub executor_queues: BTreeMap<String, QueueOptions>,
    pub license: Option<LicenseInfo>,
    pub executor_proxy: Option<ExecutorProxy>,
}

impl EnterpriseServices {
    pub fn register_resolver(&mut self, name: &str) {
        self.resolvers.insert(name.to_string());
    }

    pub fn register_handler(&mut self, route: &str, description: &str) {
        self.handlers
            .insert(route.to_string(), description.to_string());
    }

    pub fn register_queue(&mut self, name: &str, options: QueueOptions) {
        self.executor_queues.insert(name.to_string(), options);
    }
}
