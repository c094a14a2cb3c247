//! The read-only bundle handed to every module initializer.

use crate::config::SiteConfig;
use startup_framework::ObservationContext;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

/// Persistence handle. Connections are opened lazily by the subsystems that need them.
#[derive(Debug, Clone)]
pub struct Database {
    dsn: String,
}

impl Database {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self { dsn: dsn.into() }
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }
}

/// In-process object storage keyed by `(bucket, path)`.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    objects: Arc<RwLock<BTreeMap<(String, String), Vec<u8>>>>,
}

impl BlobStore {
    pub async fn put(&self, bucket: &str, path: &str, content: Vec<u8>) {
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), path.to_string()), content);
    }

    pub async fn get(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    pub async fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects
            .read()
            .await
            .contains_key(&(bucket.to_string(), path.to_string()))
    }
}

/// Code intelligence services that exist before any module runs.
#[derive(Debug, Clone)]
pub struct CodeIntelServices {
    pub upload_bucket: String,
    pub upload_store: BlobStore,
}

impl Default for CodeIntelServices {
    fn default() -> Self {
        Self {
            upload_bucket: "codeintel-uploads".to_string(),
            upload_store: BlobStore::default(),
        }
    }
}

/// Read side of the site configuration channel.
#[derive(Debug, Clone)]
pub struct WatchableConfig {
    receiver: watch::Receiver<SiteConfig>,
}

impl WatchableConfig {
    /// A config channel starting at `initial`, plus its sender.
    pub fn channel(initial: SiteConfig) -> (watch::Sender<SiteConfig>, Self) {
        let (sender, receiver) = watch::channel(initial);
        (sender, Self { receiver })
    }

    /// Snapshot of the current site configuration.
    pub fn current(&self) -> SiteConfig {
        self.receiver.borrow().clone()
    }

    /// A receiver that observes future updates.
    pub fn subscribe(&self) -> watch::Receiver<SiteConfig> {
        self.receiver.clone()
    }
}

/// Startup dependencies shared (read-only) by all initializers.
#[derive(Debug, Clone)]
pub struct Dependencies {
    pub db: Database,
    pub codeintel: CodeIntelServices,
    pub config: WatchableConfig,
    pub observation: ObservationContext,
}
