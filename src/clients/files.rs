//! # Files Client
//!
//! Checks for and fetches files from executor-visible storage. The transport is
//! pluggable ([`FileTransport`]); this client only adds instrumentation.
//!
//! Every call is recorded under the `apiworker.apiclient.files` operations:
//!
//! | Operation | Span name | Label |
//! |-----------|-----------|-------|
//! | exists | `apiworker.apiclient.files.Exists` | `op="Exists"` |
//! | get | `apiworker.apiclient.files.Get` | `op="Get"` |
//!
//! Both share the `apiworker_apiclient_files_*` metric family.

use crate::dependencies::BlobStore;
use async_trait::async_trait;
use startup_framework::observation::OperationSet;
use startup_framework::{InstrumentationError, ObservationContext, Operation, Operations};
use tracing::debug;

const NAMESPACE: &str = "apiworker.apiclient";
const COMPONENT: &str = "files";

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FilesError {
    #[error("file not found: {bucket}/{path}")]
    NotFound { bucket: String, path: String },
    #[error("transport error: {0}")]
    Transport(String),
}

/// The underlying file API.
#[async_trait]
pub trait FileTransport: Send + Sync {
    async fn exists(&self, bucket: &str, path: &str) -> Result<bool, FilesError>;
    async fn get(&self, bucket: &str, path: &str) -> Result<Vec<u8>, FilesError>;
}

#[async_trait]
impl FileTransport for BlobStore {
    async fn exists(&self, bucket: &str, path: &str) -> Result<bool, FilesError> {
        Ok(self.contains(bucket, path).await)
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Vec<u8>, FilesError> {
        BlobStore::get(self, bucket, path)
            .await
            .ok_or_else(|| FilesError::NotFound {
                bucket: bucket.to_string(),
                path: path.to_string(),
            })
    }
}

#[derive(Debug, Clone)]
struct FileOperations {
    all: Operations,
    exists: Operation,
    get: Operation,
}

impl FileOperations {
    fn new(ctx: &ObservationContext) -> Result<Self, InstrumentationError> {
        let ctx = ObservationContext::new(ctx.registry().clone()).scoped(NAMESPACE);
        let all = OperationSet::new(COMPONENT, ["Exists", "Get"]).build(&ctx)?;

        // Both names were just declared, so the lookups cannot miss.
        let op = |name: &str| {
            all.get(name)
                .cloned()
                .ok_or_else(|| InstrumentationError::InvalidOperation(name.to_string()))
        };
        Ok(Self {
            exists: op("Exists")?,
            get: op("Get")?,
            all,
        })
    }
}

/// Instrumented client over a [`FileTransport`].
#[derive(Debug, Clone)]
pub struct FilesClient<T> {
    transport: T,
    operations: FileOperations,
}

impl<T: FileTransport> FilesClient<T> {
    /// Builds the client and registers its metric family into `ctx`'s registry.
    ///
    /// # Errors
    ///
    /// [`InstrumentationError::AlreadyRegistered`] if a files client was already built
    /// against the same registry.
    pub fn new(transport: T, ctx: &ObservationContext) -> Result<Self, InstrumentationError> {
        Ok(Self {
            transport,
            operations: FileOperations::new(ctx)?,
        })
    }

    /// Whether `bucket/path` exists.
    pub async fn exists(&self, bucket: &str, path: &str) -> Result<bool, FilesError> {
        debug!(bucket, path, "Checking file");
        self.operations
            .exists
            .observe(self.transport.exists(bucket, path))
            .await
    }

    /// Contents of `bucket/path`.
    pub async fn get(&self, bucket: &str, path: &str) -> Result<Vec<u8>, FilesError> {
        debug!(bucket, path, "Fetching file");
        self.operations
            .get
            .observe(self.transport.get(bucket, path))
            .await
    }

    /// The operations backing this client, e.g. for reading its counters.
    pub fn operations(&self) -> &Operations {
        &self.operations.all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fails every call.
    struct Unreachable;

    #[async_trait]
    impl FileTransport for Unreachable {
        async fn exists(&self, _: &str, _: &str) -> Result<bool, FilesError> {
            Err(FilesError::Transport("connection refused".into()))
        }
        async fn get(&self, _: &str, _: &str) -> Result<Vec<u8>, FilesError> {
            Err(FilesError::Transport("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_exists_and_get_are_counted_separately() {
        let store = BlobStore::default();
        store.put("uploads", "a.lsif", b"lsif".to_vec()).await;
        let ctx = ObservationContext::default();
        let client = FilesClient::new(store, &ctx).unwrap();

        assert!(client.exists("uploads", "a.lsif").await.unwrap());
        assert!(!client.exists("uploads", "b.lsif").await.unwrap());
        assert_eq!(client.get("uploads", "a.lsif").await.unwrap(), b"lsif");
        assert!(matches!(
            client.get("uploads", "b.lsif").await,
            Err(FilesError::NotFound { .. })
        ));

        let metrics = client.operations().metrics();
        assert_eq!(metrics.prefix(), "apiworker_apiclient_files");
        assert_eq!(metrics.count(&["Exists"]), 2);
        assert_eq!(metrics.errors(&["Exists"]), 0);
        assert_eq!(metrics.count(&["Get"]), 2);
        assert_eq!(metrics.errors(&["Get"]), 1);

        let rendered = ctx.render().unwrap();
        assert!(rendered.contains("apiworker_apiclient_files_total{op=\"Exists\"} 2"));
        assert!(rendered.contains("apiworker_apiclient_files_errors_total{op=\"Get\"} 1"));
    }

    #[tokio::test]
    async fn test_transport_errors_are_recorded() {
        let client = FilesClient::new(Unreachable, &ObservationContext::default()).unwrap();

        for _ in 0..3 {
            assert!(client.exists("uploads", "a.lsif").await.is_err());
        }

        let metrics = client.operations().metrics();
        assert_eq!(metrics.count(&["Exists"]), 3);
        assert_eq!(metrics.errors(&["Exists"]), 3);
        assert_eq!(metrics.count(&["Get"]), 0);
    }

    #[test]
    fn test_operation_names_ignore_host_namespace() {
        let ctx = ObservationContext::default().scoped("frontend");
        let client = FilesClient::new(BlobStore::default(), &ctx).unwrap();

        let names: Vec<&str> = client
            .operations()
            .iter()
            .map(|(_, op)| op.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "apiworker.apiclient.files.Exists",
                "apiworker.apiclient.files.Get"
            ]
        );
        assert!(matches!(
            FilesClient::new(BlobStore::default(), &ctx),
            Err(InstrumentationError::AlreadyRegistered(_))
        ));
    }
}
